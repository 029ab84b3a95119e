//! Network configuration types for the handling server.

use std::time::Duration;

/// Port used when neither a listen address nor `PORT` is supplied.
pub const DEFAULT_PORT: &str = "8082";

/// Top-level network configuration for the server.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Address the HTTP listener binds to, as `host:port`.
    pub http_addr: String,
    /// Maximum time to wait for a request to complete.
    pub request_timeout: Duration,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            http_addr: bind_addr(&format!(":{DEFAULT_PORT}")),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Normalizes a listen address into something [`tokio::net::TcpListener`] accepts.
///
/// A bare `:port` binds all interfaces.
#[must_use]
pub fn bind_addr(addr: &str) -> String {
    if addr.starts_with(':') {
        format!("0.0.0.0{addr}")
    } else {
        addr.to_string()
    }
}
