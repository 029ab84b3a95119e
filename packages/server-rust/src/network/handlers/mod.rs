//! HTTP handler definitions for the handling server.
//!
//! This module defines `AppState` (the shared state carried through axum
//! extractors) and re-exports all handler functions for convenient access
//! when building the router.

pub mod incidents;
pub mod metrics;

pub use incidents::{not_found_handler, register_incident_handler};
pub use self::metrics::metrics_handler;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::service::{BoxHandlingService, RegisterIncidentEndpoint};

/// Shared application state passed to all axum handlers via `State` extraction.
///
/// Both fields are cheap handles, so cloning per request is fine.
#[derive(Clone)]
pub struct AppState {
    /// Endpoint wrapping the fully decorated handling service.
    pub register_incident: RegisterIncidentEndpoint<BoxHandlingService>,
    /// Renders the process metrics in Prometheus text format.
    pub metrics: PrometheusHandle,
}
