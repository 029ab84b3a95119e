//! Handling server: the cargo handling-event registration service, its
//! decorators, HTTP transport and process supervisor.

pub mod app;
pub mod config;
pub mod network;
pub mod routing;
pub mod service;
pub mod storage;
pub mod supervisor;

pub use app::Application;
pub use config::{Args, ServerConfig};
pub use supervisor::{terminate_signal, ProcessState, Supervisor, Termination};
