//! Errors raised by the handling factory and the repositories.

use crate::cargo::TrackingId;
use crate::handling::HandlingEventType;
use crate::location::UnLocode;
use crate::voyage::VoyageNumber;

/// Reasons the handling event factory refuses a combination of inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FactoryError {
    #[error("unknown cargo: {0}")]
    UnknownCargo(TrackingId),
    #[error("unknown location: {0}")]
    UnknownLocation(UnLocode),
    #[error("unknown voyage: {0}")]
    UnknownVoyage(VoyageNumber),
    #[error("{0} events require a voyage number")]
    VoyageRequired(HandlingEventType),
    #[error("{0} events cannot be associated with a voyage")]
    VoyageNotAllowed(HandlingEventType),
}

impl FactoryError {
    /// Returns `true` when the error names an entity that does not exist,
    /// as opposed to an invalid combination of otherwise known values.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UnknownCargo(_) | Self::UnknownLocation(_) | Self::UnknownVoyage(_)
        )
    }
}

/// Failures reported by repository implementations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
