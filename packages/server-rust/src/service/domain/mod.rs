//! Core handling service.
//!
//! Turns a [`RegisterHandlingEvent`] into a validated, persisted
//! [`HandlingEvent`] and notifies the post-registration handler.

use std::sync::Arc;
use std::task::{Context, Poll};

use chrono::Utc;
use handling_core::{HandlingActivity, HandlingEventFactory, HandlingEventRepository};
use tower::Service;

use crate::service::inspection::HandlingEventHandler;
use crate::service::operation::{HandlingError, HandlingFuture, RegisterHandlingEvent};

/// Innermost service of the handling pipeline.
///
/// Always ready; holds no per-request state, so clones are cheap and
/// independent.
#[derive(Clone)]
pub struct HandlingService {
    events: Arc<dyn HandlingEventRepository>,
    factory: Arc<dyn HandlingEventFactory>,
    handler: Arc<dyn HandlingEventHandler>,
}

impl HandlingService {
    #[must_use]
    pub fn new(
        events: Arc<dyn HandlingEventRepository>,
        factory: Arc<dyn HandlingEventFactory>,
        handler: Arc<dyn HandlingEventHandler>,
    ) -> Self {
        Self {
            events,
            factory,
            handler,
        }
    }

    /// Validates, stores and announces a single handling event.
    ///
    /// The handler is only invoked after the event has been stored.
    ///
    /// # Errors
    ///
    /// Returns [`HandlingError::InvalidArgument`] for an empty tracking id or
    /// location, [`HandlingError::Validation`] if the factory rejects the event
    /// and [`HandlingError::Persistence`] if it cannot be stored.
    pub fn register_handling_event(&self, req: RegisterHandlingEvent) -> Result<(), HandlingError> {
        if req.tracking_id.is_empty() {
            return Err(HandlingError::InvalidArgument("tracking id is required"));
        }
        if req.location.is_empty() {
            return Err(HandlingError::InvalidArgument("location is required"));
        }

        let activity = HandlingActivity {
            event_type: req.event_type,
            location: req.location,
            voyage_number: req.voyage_number,
        };
        let event = self.factory.create_handling_event(
            Utc::now(),
            req.completion_time,
            req.tracking_id,
            activity,
        )?;

        self.events.store(event.clone())?;
        self.handler.handle(&event);
        Ok(())
    }
}

impl Service<RegisterHandlingEvent> for HandlingService {
    type Response = ();
    type Error = HandlingError;
    type Future = HandlingFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: RegisterHandlingEvent) -> Self::Future {
        let svc = self.clone();
        Box::pin(async move { svc.register_handling_event(req) })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
