//! Handling events and the factory that validates them.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cargo::{CargoRepository, TrackingId};
use crate::error::{FactoryError, RepositoryError};
use crate::location::{LocationRepository, UnLocode};
use crate::voyage::{VoyageNumber, VoyageRepository};

/// Kind of physical operation a cargo underwent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HandlingEventType {
    Receive,
    Load,
    Unload,
    Claim,
    Customs,
}

impl HandlingEventType {
    /// Every event type, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Receive,
        Self::Load,
        Self::Unload,
        Self::Customs,
        Self::Claim,
    ];

    /// Whether events of this type must name the voyage that carried the cargo.
    ///
    /// Carrier events (load/unload) require one; all other events forbid one.
    #[must_use]
    pub fn requires_voyage(self) -> bool {
        matches!(self, Self::Load | Self::Unload)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Receive => "Receive",
            Self::Load => "Load",
            Self::Unload => "Unload",
            Self::Claim => "Claim",
            Self::Customs => "Customs",
        }
    }
}

impl fmt::Display for HandlingEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a handling event type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown handling event type: {0:?}")]
pub struct ParseEventTypeError(String);

impl FromStr for HandlingEventType {
    type Err = ParseEventTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseEventTypeError(s.to_string()))
    }
}

impl TryFrom<String> for HandlingEventType {
    type Error = ParseEventTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HandlingEventType> for String {
    fn from(value: HandlingEventType) -> Self {
        value.as_str().to_string()
    }
}

/// What happened, where, and on which voyage (if any).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlingActivity {
    pub event_type: HandlingEventType,
    pub location: UnLocode,
    pub voyage_number: Option<VoyageNumber>,
}

/// A registered handling of a cargo.
///
/// `completion_time` is when the handling actually happened;
/// `registration_time` is when the system learned about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlingEvent {
    pub tracking_id: TrackingId,
    pub activity: HandlingActivity,
    pub completion_time: DateTime<Utc>,
    pub registration_time: DateTime<Utc>,
}

/// All handling events registered for one cargo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandlingHistory {
    pub events: Vec<HandlingEvent>,
}

impl HandlingHistory {
    /// The event with the latest completion time, if any.
    #[must_use]
    pub fn most_recently_completed_event(&self) -> Option<&HandlingEvent> {
        self.events.iter().max_by_key(|e| e.completion_time)
    }
}

/// Storage of handling events.
///
/// Appends are not deduplicated: storing the same event twice records it twice.
pub trait HandlingEventRepository: Send + Sync {
    /// Appends an event.
    ///
    /// # Errors
    ///
    /// Returns a [`RepositoryError`] if the backing store rejects the write.
    fn store(&self, event: HandlingEvent) -> Result<(), RepositoryError>;

    /// Returns every event registered for `id`, in insertion order.
    fn query_handling_history(&self, id: &TrackingId) -> HandlingHistory;
}

/// Builds validated handling events from raw registration inputs.
pub trait HandlingEventFactory: Send + Sync {
    /// Creates a handling event for `tracking_id`.
    ///
    /// # Errors
    ///
    /// Returns a [`FactoryError`] when the cargo, voyage or location is unknown,
    /// or when the voyage does not fit the event type.
    fn create_handling_event(
        &self,
        registered: DateTime<Utc>,
        completed: DateTime<Utc>,
        tracking_id: TrackingId,
        activity: HandlingActivity,
    ) -> Result<HandlingEvent, FactoryError>;
}

/// [`HandlingEventFactory`] that checks every reference against the repositories.
#[derive(Clone)]
pub struct CargoHandlingEventFactory {
    cargos: Arc<dyn CargoRepository>,
    voyages: Arc<dyn VoyageRepository>,
    locations: Arc<dyn LocationRepository>,
}

impl CargoHandlingEventFactory {
    #[must_use]
    pub fn new(
        cargos: Arc<dyn CargoRepository>,
        voyages: Arc<dyn VoyageRepository>,
        locations: Arc<dyn LocationRepository>,
    ) -> Self {
        Self {
            cargos,
            voyages,
            locations,
        }
    }
}

impl HandlingEventFactory for CargoHandlingEventFactory {
    fn create_handling_event(
        &self,
        registered: DateTime<Utc>,
        completed: DateTime<Utc>,
        tracking_id: TrackingId,
        activity: HandlingActivity,
    ) -> Result<HandlingEvent, FactoryError> {
        if self.cargos.find(&tracking_id).is_none() {
            return Err(FactoryError::UnknownCargo(tracking_id));
        }

        match (&activity.voyage_number, activity.event_type.requires_voyage()) {
            (None, true) => return Err(FactoryError::VoyageRequired(activity.event_type)),
            (Some(_), false) => return Err(FactoryError::VoyageNotAllowed(activity.event_type)),
            (Some(number), true) if self.voyages.find(number).is_none() => {
                return Err(FactoryError::UnknownVoyage(number.clone()));
            }
            _ => {}
        }

        if self.locations.find(&activity.location).is_none() {
            return Err(FactoryError::UnknownLocation(activity.location));
        }

        Ok(HandlingEvent {
            tracking_id,
            activity,
            completion_time: completed,
            registration_time: registered,
        })
    }
}
