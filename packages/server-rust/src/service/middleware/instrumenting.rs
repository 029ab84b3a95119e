//! Instrumenting decorator for the handling service.
//!
//! Counts requests and observes their latency in microseconds, labelled by
//! method. Both metrics are recorded whatever the outcome of the call.

use std::task::{Context, Poll};
use std::time::Instant;

use metrics::{Counter, Histogram, Key, KeyName, Label, Level, Metadata, Recorder, Unit};
use tower::{Layer, Service};

use crate::service::operation::{
    method_names, HandlingError, HandlingFuture, RegisterHandlingEvent,
};

/// Number of requests received, by method.
pub const REQUEST_COUNT: &str = "api_handling_service_request_count";

/// Total duration of requests in microseconds, by method.
pub const REQUEST_LATENCY: &str = "api_handling_service_request_latency_microseconds";

// ---------------------------------------------------------------------------
// InstrumentingLayer
// ---------------------------------------------------------------------------

/// Tower layer that records request count and latency.
///
/// Metric handles are registered once against the given recorder and shared
/// by every service the layer produces.
#[derive(Clone)]
pub struct InstrumentingLayer {
    request_count: Counter,
    request_latency: Histogram,
}

impl InstrumentingLayer {
    /// Describes and registers the handling metrics on `recorder`.
    #[must_use]
    pub fn new(recorder: &dyn Recorder) -> Self {
        recorder.describe_counter(
            KeyName::from(REQUEST_COUNT),
            Some(Unit::Count),
            "Number of requests received.".into(),
        );
        recorder.describe_histogram(
            KeyName::from(REQUEST_LATENCY),
            Some(Unit::Microseconds),
            "Total duration of requests in microseconds.".into(),
        );

        let metadata = Metadata::new(module_path!(), Level::INFO, Some(module_path!()));
        let labels = || vec![Label::new("method", method_names::REGISTER_INCIDENT)];

        Self {
            request_count: recorder
                .register_counter(&Key::from_parts(REQUEST_COUNT, labels()), &metadata),
            request_latency: recorder
                .register_histogram(&Key::from_parts(REQUEST_LATENCY, labels()), &metadata),
        }
    }
}

impl<S> Layer<S> for InstrumentingLayer {
    type Service = InstrumentingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        InstrumentingService {
            inner,
            request_count: self.request_count.clone(),
            request_latency: self.request_latency.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// InstrumentingService
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct InstrumentingService<S> {
    inner: S,
    request_count: Counter,
    request_latency: Histogram,
}

impl<S> Service<RegisterHandlingEvent> for InstrumentingService<S>
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
        let request_count = self.request_count.clone();
        let request_latency = self.request_latency.clone();
        let start = Instant::now();
        let fut = self.inner.call(req);

        Box::pin(async move {
            let result = fut.await;
            request_count.increment(1);
            request_latency.record(start.elapsed().as_secs_f64() * 1_000_000.0);
            result
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use handling_core::{HandlingEventType, TrackingId, UnLocode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use tower::ServiceExt;

    use super::*;

    #[derive(Clone)]
    struct FixedService(Result<(), HandlingError>);

    impl Service<RegisterHandlingEvent> for FixedService {
        type Response = ();
        type Error = HandlingError;
        type Future = HandlingFuture;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, _req: RegisterHandlingEvent) -> Self::Future {
            let result = self.0.clone();
            Box::pin(async move { result })
        }
    }

    fn request() -> RegisterHandlingEvent {
        RegisterHandlingEvent {
            completion_time: DateTime::<Utc>::UNIX_EPOCH,
            tracking_id: TrackingId::from("ABC123"),
            voyage_number: None,
            location: UnLocode::from("SESTO"),
            event_type: HandlingEventType::Claim,
        }
    }

    #[tokio::test]
    async fn counts_successes_and_failures() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let layer = InstrumentingLayer::new(&recorder);

        layer
            .layer(FixedService(Ok(())))
            .oneshot(request())
            .await
            .unwrap();
        let err = layer
            .layer(FixedService(Err(HandlingError::InvalidArgument(
                "tracking id is required",
            ))))
            .oneshot(request())
            .await
            .unwrap_err();
        assert_eq!(err, HandlingError::InvalidArgument("tracking id is required"));

        let rendered = handle.render();
        assert!(rendered.contains(
            "api_handling_service_request_count{method=\"register_incident\"} 2"
        ));
        assert!(rendered.contains(
            "api_handling_service_request_latency_microseconds_count{method=\"register_incident\"} 2"
        ));
    }

    #[test]
    fn metrics_are_described() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let layer = InstrumentingLayer::new(&recorder);
        layer.request_count.increment(0);

        let rendered = handle.render();
        assert!(rendered.contains("# HELP api_handling_service_request_count Number of requests received."));
        assert!(rendered.contains("# TYPE api_handling_service_request_count counter"));
    }
}
