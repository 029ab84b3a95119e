//! Networking types, configuration, HTTP handlers and listener lifecycle.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod module;

pub use config::*;
pub use handlers::AppState;
pub use middleware::{build_http_layers, AccessControlLayer};
pub use module::{build_router, NetworkModule};
