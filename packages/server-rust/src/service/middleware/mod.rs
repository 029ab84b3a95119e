//! Tower middleware layers for the handling pipeline.
//!
//! - [`instrumenting`]: Request count and latency via the `metrics` crate
//! - [`logging`]: One structured `tracing` record per request
//! - [`pipeline`]: Composes the layers around the core service

pub mod instrumenting;
pub mod logging;
pub mod pipeline;

pub use instrumenting::InstrumentingLayer;
pub use logging::LoggingLayer;
pub use pipeline::build_handling_pipeline;
