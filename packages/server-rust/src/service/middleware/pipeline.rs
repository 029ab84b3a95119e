//! Pipeline composition: wraps the core handling service with its decorators.

use metrics::Recorder;
use tower::util::BoxCloneSyncService;
use tower::{Service, ServiceBuilder};

use super::instrumenting::InstrumentingLayer;
use super::logging::LoggingLayer;
use crate::service::operation::{BoxHandlingService, HandlingError, RegisterHandlingEvent};

/// Build the handling pipeline around `inner`.
///
/// Layer order (outermost to innermost):
/// 1. `InstrumentingLayer` -- count and time every call
/// 2. `LoggingLayer` -- one record per call with inputs and outcome
/// 3. `inner` -- the core handling service
///
/// The result is type-erased so it can be cloned into every request handler.
pub fn build_handling_pipeline<S>(inner: S, recorder: &dyn Recorder) -> BoxHandlingService
where
    S: Service<RegisterHandlingEvent, Response = (), Error = HandlingError>
        + Clone
        + Send
        + Sync
        + 'static,
    S::Future: Send + 'static,
{
    let svc = ServiceBuilder::new()
        .layer(InstrumentingLayer::new(recorder))
        .layer(LoggingLayer)
        .service(inner);
    BoxCloneSyncService::new(svc)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
