//! Network module with deferred startup lifecycle.
//!
//! `new()` takes the address and router, `start()` binds the TCP listener,
//! and `serve()` accepts connections. Binding separately lets callers learn
//! the actual port (for `:0`) before the server starts.

use std::io;
use std::net::SocketAddr;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use super::config::NetworkConfig;
use super::handlers::{metrics_handler, not_found_handler, register_incident_handler, AppState};
use super::middleware::{build_http_layers, AccessControlLayer};

/// Assembles the axum router with all routes and middleware.
///
/// Routes:
/// - `POST /handling/v1/incidents` -- register a handling event
/// - `GET  /metrics` -- Prometheus exposition
/// - anything else -- JSON 404 fallback
///
/// Access control applies to every path except `/metrics`, so `OPTIONS` is
/// answered for the bare prefix, its trailing-slash form and unknown paths
/// alike. `/metrics` is routed after the layer and stays outside it.
pub fn build_router(state: AppState, config: &NetworkConfig) -> Router {
    Router::new()
        .route("/handling/v1/incidents", post(register_incident_handler))
        .fallback(not_found_handler)
        .layer(AccessControlLayer)
        .route("/metrics", get(metrics_handler))
        .layer(build_http_layers(config))
        .with_state(state)
}

/// Owns the HTTP listener lifecycle.
///
/// 1. `new()` -- stores the address and router
/// 2. `start()` -- binds the TCP listener
/// 3. `serve()` -- accepts connections until the task is dropped or I/O fails
pub struct NetworkModule {
    addr: String,
    router: Router,
    listener: Option<TcpListener>,
}

impl NetworkModule {
    /// Creates a new network module without binding any port.
    #[must_use]
    pub fn new(addr: impl Into<String>, router: Router) -> Self {
        Self {
            addr: addr.into(),
            router,
            listener: None,
        }
    }

    /// Binds the TCP listener to the configured address.
    ///
    /// Returns the actual bound address, which differs from the configured one
    /// when port 0 is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound (e.g., port in use).
    pub async fn start(&mut self) -> io::Result<SocketAddr> {
        let listener = TcpListener::bind(&self.addr).await?;
        let local = listener.local_addr()?;

        info!(transport = "http", address = %local, "listening");

        self.listener = Some(listener);
        Ok(local)
    }

    /// Serves connections on the bound listener.
    ///
    /// Only returns on a fatal I/O error; shutdown is done by dropping the future.
    ///
    /// # Errors
    ///
    /// Returns an error if `start()` was not called first or the server fails.
    pub async fn serve(self) -> io::Result<()> {
        let Some(listener) = self.listener else {
            return Err(io::Error::other("start() must be called before serve()"));
        };
        axum::serve(listener, self.router).await
    }

    /// Binds (unless already bound) and serves.
    ///
    /// # Errors
    ///
    /// Returns the bind or serve error.
    pub async fn run(mut self) -> io::Result<()> {
        if self.listener.is_none() {
            self.start().await?;
        }
        self.serve().await
    }
}
