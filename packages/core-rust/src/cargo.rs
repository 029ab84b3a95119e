//! Cargo identity, routing and delivery progress.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RepositoryError;
use crate::handling::{HandlingEvent, HandlingEventType, HandlingHistory};
use crate::location::UnLocode;
use crate::voyage::VoyageNumber;

/// Unique identifier of a cargo (e.g. `ABC123`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingId(String);

impl TrackingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TrackingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackingId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Where a cargo has to go and by when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSpecification {
    pub origin: UnLocode,
    pub destination: UnLocode,
    pub arrival_deadline: DateTime<Utc>,
}

/// One voyage segment of an itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leg {
    pub voyage_number: VoyageNumber,
    pub load_location: UnLocode,
    pub unload_location: UnLocode,
    pub load_time: DateTime<Utc>,
    pub unload_time: DateTime<Utc>,
}

/// Planned route of a cargo as a sequence of legs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Itinerary {
    pub legs: Vec<Leg>,
}

impl Itinerary {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }
}

/// Coarse physical state of a cargo, derived from its last handling event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportStatus {
    NotReceived,
    InPort,
    OnboardCarrier,
    Claimed,
}

/// Delivery progress, recomputed from the handling history after each event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub last_event: Option<HandlingEvent>,
    pub transport_status: TransportStatus,
    pub last_known_location: Option<UnLocode>,
    pub current_voyage: Option<VoyageNumber>,
    pub is_unloaded_at_destination: bool,
}

impl Delivery {
    /// Derives delivery progress from the most recently completed event in `history`.
    #[must_use]
    pub fn derive_from(route: &RouteSpecification, history: &HandlingHistory) -> Self {
        let last_event = history.most_recently_completed_event().cloned();

        let Some(event) = &last_event else {
            return Self {
                last_event: None,
                transport_status: TransportStatus::NotReceived,
                last_known_location: None,
                current_voyage: None,
                is_unloaded_at_destination: false,
            };
        };

        let activity = &event.activity;
        let transport_status = match activity.event_type {
            HandlingEventType::Load => TransportStatus::OnboardCarrier,
            HandlingEventType::Unload | HandlingEventType::Receive | HandlingEventType::Customs => {
                TransportStatus::InPort
            }
            HandlingEventType::Claim => TransportStatus::Claimed,
        };
        let current_voyage = match transport_status {
            TransportStatus::OnboardCarrier => activity.voyage_number.clone(),
            _ => None,
        };
        let is_unloaded_at_destination = activity.event_type == HandlingEventType::Unload
            && activity.location == route.destination;

        Self {
            transport_status,
            last_known_location: Some(activity.location.clone()),
            current_voyage,
            is_unloaded_at_destination,
            last_event,
        }
    }
}

/// A cargo booked for transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cargo {
    pub tracking_id: TrackingId,
    pub origin: UnLocode,
    pub route_specification: RouteSpecification,
    pub itinerary: Itinerary,
    pub delivery: Delivery,
}

impl Cargo {
    /// Books a new, unrouted cargo.
    #[must_use]
    pub fn new(tracking_id: TrackingId, route_specification: RouteSpecification) -> Self {
        let delivery = Delivery::derive_from(&route_specification, &HandlingHistory::default());
        Self {
            tracking_id,
            origin: route_specification.origin.clone(),
            route_specification,
            itinerary: Itinerary::default(),
            delivery,
        }
    }

    /// Recomputes delivery progress from the complete handling history.
    pub fn derive_delivery_progress(&mut self, history: &HandlingHistory) {
        self.delivery = Delivery::derive_from(&self.route_specification, history);
    }
}

/// Storage of booked cargos.
pub trait CargoRepository: Send + Sync {
    /// Inserts or replaces a cargo.
    ///
    /// # Errors
    ///
    /// Returns a [`RepositoryError`] if the backing store rejects the write.
    fn store(&self, cargo: Cargo) -> Result<(), RepositoryError>;

    /// Returns the cargo with `id`, or `None` if it is not booked.
    fn find(&self, id: &TrackingId) -> Option<Cargo>;

    /// Returns every booked cargo.
    fn find_all(&self) -> Vec<Cargo>;
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::handling::HandlingActivity;

    fn route() -> RouteSpecification {
        RouteSpecification {
            origin: UnLocode::from("SESTO"),
            destination: UnLocode::from("CNHKG"),
            arrival_deadline: Utc::now() + Duration::days(14),
        }
    }

    fn event(event_type: HandlingEventType, location: &str, voyage: Option<&str>, minutes: i64) -> HandlingEvent {
        let at = DateTime::<Utc>::UNIX_EPOCH + Duration::minutes(minutes);
        HandlingEvent {
            tracking_id: TrackingId::from("ABC123"),
            activity: HandlingActivity {
                event_type,
                location: UnLocode::from(location),
                voyage_number: voyage.map(VoyageNumber::from),
            },
            completion_time: at,
            registration_time: at,
        }
    }

    #[test]
    fn new_cargo_is_not_received() {
        let cargo = Cargo::new(TrackingId::from("ABC123"), route());
        assert_eq!(cargo.origin, UnLocode::from("SESTO"));
        assert_eq!(cargo.delivery.transport_status, TransportStatus::NotReceived);
        assert!(cargo.delivery.last_known_location.is_none());
        assert!(cargo.itinerary.is_empty());
    }

    #[test]
    fn load_puts_cargo_onboard_the_voyage() {
        let mut cargo = Cargo::new(TrackingId::from("ABC123"), route());
        let history = HandlingHistory {
            events: vec![
                event(HandlingEventType::Receive, "SESTO", None, 0),
                event(HandlingEventType::Load, "SESTO", Some("0400S"), 10),
            ],
        };

        cargo.derive_delivery_progress(&history);

        assert_eq!(cargo.delivery.transport_status, TransportStatus::OnboardCarrier);
        assert_eq!(cargo.delivery.current_voyage, Some(VoyageNumber::from("0400S")));
        assert_eq!(cargo.delivery.last_known_location, Some(UnLocode::from("SESTO")));
    }

    #[test]
    fn latest_completion_time_wins_regardless_of_order() {
        let mut cargo = Cargo::new(TrackingId::from("ABC123"), route());
        let history = HandlingHistory {
            events: vec![
                event(HandlingEventType::Unload, "CNHKG", Some("0400S"), 30),
                event(HandlingEventType::Load, "SESTO", Some("0400S"), 10),
            ],
        };

        cargo.derive_delivery_progress(&history);

        assert_eq!(cargo.delivery.transport_status, TransportStatus::InPort);
        assert!(cargo.delivery.current_voyage.is_none());
        assert!(cargo.delivery.is_unloaded_at_destination);
    }

    #[test]
    fn claim_marks_cargo_claimed() {
        let mut cargo = Cargo::new(TrackingId::from("ABC123"), route());
        let history = HandlingHistory {
            events: vec![event(HandlingEventType::Claim, "CNHKG", None, 5)],
        };

        cargo.derive_delivery_progress(&history);

        assert_eq!(cargo.delivery.transport_status, TransportStatus::Claimed);
        assert!(!cargo.delivery.is_unloaded_at_destination);
    }
}
