//! Logging decorator for the handling service.
//!
//! Emits one structured record per call carrying the request inputs, the
//! outcome and the time spent in the wrapped service.

use std::task::{Context, Poll};
use std::time::Instant;

use handling_core::VoyageNumber;
use tower::{Layer, Service};
use tracing::{info, warn};

use crate::service::operation::{
    method_names, HandlingError, HandlingFuture, RegisterHandlingEvent,
};

// ---------------------------------------------------------------------------
// LoggingLayer
// ---------------------------------------------------------------------------

/// Tower layer that logs every handling request after it completes.
#[derive(Debug, Clone)]
pub struct LoggingLayer;

impl<S> Layer<S> for LoggingLayer {
    type Service = LoggingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggingService { inner }
    }
}

// ---------------------------------------------------------------------------
// LoggingService
// ---------------------------------------------------------------------------

/// Service wrapper that logs inputs, outcome and elapsed time.
///
/// The wrapped service's result is returned unchanged.
#[derive(Debug, Clone)]
pub struct LoggingService<S> {
    inner: S,
}

impl<S> Service<RegisterHandlingEvent> for LoggingService<S>
where
    S: Service<RegisterHandlingEvent, Response = (), Error = HandlingError> + Send,
    S::Future: Send + 'static,
{
    type Response = ();
    type Error = HandlingError;
    type Future = HandlingFuture;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: RegisterHandlingEvent) -> Self::Future {
        let logged = req.clone();
        let start = Instant::now();
        let fut = self.inner.call(req);

        Box::pin(async move {
            let result = fut.await;

            #[allow(clippy::cast_possible_truncation)]
            let took_us = start.elapsed().as_micros() as u64;
            let voyage = logged
                .voyage_number
                .as_ref()
                .map_or("", VoyageNumber::as_str);

            match &result {
                Ok(()) => info!(
                    component = "handling",
                    method = method_names::REGISTER_INCIDENT,
                    tracking_id = %logged.tracking_id,
                    location = %logged.location,
                    voyage = voyage,
                    event_type = %logged.event_type,
                    completion_time = %logged.completion_time.to_rfc3339(),
                    took_us,
                    "handling event registered"
                ),
                Err(e) => warn!(
                    component = "handling",
                    method = method_names::REGISTER_INCIDENT,
                    tracking_id = %logged.tracking_id,
                    location = %logged.location,
                    voyage = voyage,
                    event_type = %logged.event_type,
                    completion_time = %logged.completion_time.to_rfc3339(),
                    took_us,
                    error = %e,
                    "handling event rejected"
                ),
            }

            result
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
