//! Endpoint adapter between the transport and the handling service.
//!
//! Service errors are carried inside [`RegisterIncidentResponse`] rather than
//! failing the endpoint, so the transport always has a response to encode.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use chrono::{DateTime, Utc};
use handling_core::{HandlingEventType, TrackingId, UnLocode, VoyageNumber};
use tower::{Service, ServiceExt};

use crate::service::operation::{HandlingError, RegisterHandlingEvent};

/// Transport-neutral request for registering an incident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterIncidentRequest {
    pub id: TrackingId,
    pub location: UnLocode,
    pub voyage: Option<VoyageNumber>,
    pub event_type: HandlingEventType,
    pub completion_time: DateTime<Utc>,
}

impl From<RegisterIncidentRequest> for RegisterHandlingEvent {
    fn from(req: RegisterIncidentRequest) -> Self {
        Self {
            completion_time: req.completion_time,
            tracking_id: req.id,
            voyage_number: req.voyage,
            location: req.location,
            event_type: req.event_type,
        }
    }
}

/// Outcome of an incident registration. `err` is `None` on success.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterIncidentResponse {
    pub err: Option<HandlingError>,
}

impl RegisterIncidentResponse {
    /// The service error carried by this response, if any.
    #[must_use]
    pub fn error(&self) -> Option<&HandlingError> {
        self.err.as_ref()
    }
}

/// Adapts a handling service into an infallible request/response endpoint.
#[derive(Debug, Clone)]
pub struct RegisterIncidentEndpoint<S> {
    service: S,
}

impl<S> RegisterIncidentEndpoint<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }
}

impl<S> Service<RegisterIncidentRequest> for RegisterIncidentEndpoint<S>
where
    S: Service<RegisterHandlingEvent, Response = (), Error = HandlingError>
        + Clone
        + Send
        + 'static,
    S::Future: Send,
{
    type Response = RegisterIncidentResponse;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<RegisterIncidentResponse, Infallible>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: RegisterIncidentRequest) -> Self::Future {
        let service = self.service.clone();
        Box::pin(async move {
            let err = service.oneshot(req.into()).await.err();
            Ok(RegisterIncidentResponse { err })
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use handling_core::FactoryError;
    use tower::service_fn;

    use super::*;

    fn request(voyage: Option<&str>) -> RegisterIncidentRequest {
        RegisterIncidentRequest {
            id: TrackingId::from("ABC123"),
            location: UnLocode::from("SESTO"),
            voyage: voyage.map(VoyageNumber::from),
            event_type: HandlingEventType::Load,
            completion_time: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[test]
    fn request_maps_onto_service_arguments() {
        let event: RegisterHandlingEvent = request(Some("V100")).into();
        assert_eq!(event.tracking_id, TrackingId::from("ABC123"));
        assert_eq!(event.location, UnLocode::from("SESTO"));
        assert_eq!(event.voyage_number, Some(VoyageNumber::from("V100")));
        assert_eq!(event.event_type, HandlingEventType::Load);
        assert_eq!(event.completion_time, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[tokio::test]
    async fn success_has_no_error() {
        let endpoint = RegisterIncidentEndpoint::new(service_fn(
            |_req: RegisterHandlingEvent| async { Ok::<(), HandlingError>(()) },
        ));
        let response = endpoint.oneshot(request(Some("V100"))).await.unwrap();
        assert_eq!(response, RegisterIncidentResponse::default());
        assert!(response.error().is_none());
    }

    #[tokio::test]
    async fn service_error_is_embedded_in_response() {
        let endpoint = RegisterIncidentEndpoint::new(service_fn(
            |req: RegisterHandlingEvent| async move {
                Err::<(), HandlingError>(FactoryError::VoyageRequired(req.event_type).into())
            },
        ));
        let response = endpoint.oneshot(request(None)).await.unwrap();
        assert_eq!(
            response.error(),
            Some(&HandlingError::Validation(FactoryError::VoyageRequired(
                HandlingEventType::Load
            )))
        );
    }
}
