//! Request, response and error types flowing through the handling pipeline.

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use handling_core::{
    FactoryError, HandlingEventType, RepositoryError, TrackingId, UnLocode, VoyageNumber,
};
use tower::util::BoxCloneSyncService;

/// Logical method names reported by the decorators.
pub mod method_names {
    pub const REGISTER_INCIDENT: &str = "register_incident";
}

/// A request to register that a cargo was handled.
///
/// `voyage_number` is `None` for events that do not involve a carrier
/// (receive, claim, customs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterHandlingEvent {
    pub completion_time: DateTime<Utc>,
    pub tracking_id: TrackingId,
    pub voyage_number: Option<VoyageNumber>,
    pub location: UnLocode,
    pub event_type: HandlingEventType,
}

/// Errors returned by the handling service chain.
///
/// Callers distinguish failures by variant; decorators pass them through untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandlingError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error(transparent)]
    Validation(#[from] FactoryError),
    #[error("failed to store handling event: {0}")]
    Persistence(#[from] RepositoryError),
}

/// Future returned by every service in the handling pipeline.
pub type HandlingFuture = Pin<Box<dyn Future<Output = Result<(), HandlingError>> + Send>>;

/// Type-erased, cloneable handle to a fully composed handling service.
///
/// Each inbound request clones the handle, so no mutable state is shared
/// between concurrent calls.
pub type BoxHandlingService = BoxCloneSyncService<RegisterHandlingEvent, (), HandlingError>;
