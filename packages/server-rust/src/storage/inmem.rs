//! In-memory repositories backed by [`DashMap`].
//!
//! Provide concurrent read/write access without external locking. Writes for
//! different keys proceed in parallel; writes for the same key are serialized
//! by the map's shard lock only for the duration of the insert.

use dashmap::DashMap;
use handling_core::location::samples as sample_locations;
use handling_core::voyage::samples as sample_voyages;
use handling_core::{
    Cargo, CargoRepository, HandlingEvent, HandlingEventRepository, HandlingHistory, Location,
    LocationRepository, RepositoryError, TrackingId, UnLocode, Voyage, VoyageNumber,
    VoyageRepository,
};

// ---------------------------------------------------------------------------
// Cargos
// ---------------------------------------------------------------------------

/// Cargo storage keyed by tracking id.
pub struct InMemoryCargoRepository {
    cargos: DashMap<TrackingId, Cargo>,
}

impl InMemoryCargoRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cargos: DashMap::new(),
        }
    }
}

impl Default for InMemoryCargoRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl CargoRepository for InMemoryCargoRepository {
    fn store(&self, cargo: Cargo) -> Result<(), RepositoryError> {
        self.cargos.insert(cargo.tracking_id.clone(), cargo);
        Ok(())
    }

    fn find(&self, id: &TrackingId) -> Option<Cargo> {
        self.cargos.get(id).map(|c| c.clone())
    }

    fn find_all(&self) -> Vec<Cargo> {
        self.cargos.iter().map(|entry| entry.value().clone()).collect()
    }
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

/// Location lookup, pre-populated with the sample locations.
pub struct InMemoryLocationRepository {
    locations: DashMap<UnLocode, Location>,
}

impl InMemoryLocationRepository {
    /// Creates a repository holding every sample location.
    #[must_use]
    pub fn with_samples() -> Self {
        let locations = sample_locations::all()
            .into_iter()
            .map(|l| (l.un_locode.clone(), l))
            .collect();
        Self { locations }
    }
}

impl LocationRepository for InMemoryLocationRepository {
    fn find(&self, code: &UnLocode) -> Option<Location> {
        self.locations.get(code).map(|l| l.clone())
    }

    fn find_all(&self) -> Vec<Location> {
        self.locations.iter().map(|entry| entry.value().clone()).collect()
    }
}

// ---------------------------------------------------------------------------
// Voyages
// ---------------------------------------------------------------------------

/// Voyage lookup, pre-populated with the sample voyages.
pub struct InMemoryVoyageRepository {
    voyages: DashMap<VoyageNumber, Voyage>,
}

impl InMemoryVoyageRepository {
    /// Creates a repository holding every sample voyage.
    #[must_use]
    pub fn with_samples() -> Self {
        let voyages = sample_voyages::all()
            .into_iter()
            .map(|v| (v.number.clone(), v))
            .collect();
        Self { voyages }
    }
}

impl VoyageRepository for InMemoryVoyageRepository {
    fn find(&self, number: &VoyageNumber) -> Option<Voyage> {
        self.voyages.get(number).map(|v| v.clone())
    }
}

// ---------------------------------------------------------------------------
// Handling events
// ---------------------------------------------------------------------------

/// Append-only handling event log, grouped by tracking id.
///
/// Duplicate events are kept: this layer performs no deduplication.
pub struct InMemoryHandlingEventRepository {
    events: DashMap<TrackingId, Vec<HandlingEvent>>,
}

impl InMemoryHandlingEventRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: DashMap::new(),
        }
    }
}

impl Default for InMemoryHandlingEventRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl HandlingEventRepository for InMemoryHandlingEventRepository {
    fn store(&self, event: HandlingEvent) -> Result<(), RepositoryError> {
        self.events
            .entry(event.tracking_id.clone())
            .or_default()
            .push(event);
        Ok(())
    }

    fn query_handling_history(&self, id: &TrackingId) -> HandlingHistory {
        let events = self
            .events
            .get(id)
            .map(|events| events.clone())
            .unwrap_or_default();
        HandlingHistory { events }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use handling_core::{HandlingActivity, HandlingEventType, RouteSpecification};

    use super::*;

    fn event(id: &str) -> HandlingEvent {
        let now = Utc::now();
        HandlingEvent {
            tracking_id: TrackingId::from(id),
            activity: HandlingActivity {
                event_type: HandlingEventType::Receive,
                location: UnLocode::from("SESTO"),
                voyage_number: None,
            },
            completion_time: now,
            registration_time: now,
        }
    }

    #[test]
    fn cargo_store_replaces_existing_entry() {
        let repo = InMemoryCargoRepository::new();
        let spec = RouteSpecification {
            origin: UnLocode::from("SESTO"),
            destination: UnLocode::from("CNHKG"),
            arrival_deadline: Utc::now(),
        };
        let mut cargo = Cargo::new(TrackingId::from("ABC123"), spec);
        repo.store(cargo.clone()).unwrap();

        cargo.origin = UnLocode::from("AUMEL");
        repo.store(cargo).unwrap();

        assert_eq!(repo.find_all().len(), 1);
        let found = repo.find(&TrackingId::from("ABC123")).unwrap();
        assert_eq!(found.origin, UnLocode::from("AUMEL"));
        assert!(repo.find(&TrackingId::from("FTL456")).is_none());
    }

    #[test]
    fn sample_locations_and_voyages_are_loaded() {
        let locations = InMemoryLocationRepository::with_samples();
        assert!(locations.find(&UnLocode::from("SESTO")).is_some());
        assert!(locations.find(&UnLocode::from("XXXXX")).is_none());
        assert_eq!(locations.find_all().len(), 9);

        let voyages = InMemoryVoyageRepository::with_samples();
        assert!(voyages.find(&VoyageNumber::from("V100")).is_some());
        assert!(voyages.find(&VoyageNumber::from("V999")).is_none());
    }

    #[test]
    fn handling_history_keeps_duplicates_per_cargo() {
        let repo = InMemoryHandlingEventRepository::new();
        let duplicate = event("ABC123");
        repo.store(duplicate.clone()).unwrap();
        repo.store(duplicate).unwrap();
        repo.store(event("FTL456")).unwrap();

        assert_eq!(repo.query_handling_history(&TrackingId::from("ABC123")).events.len(), 2);
        assert_eq!(repo.query_handling_history(&TrackingId::from("FTL456")).events.len(), 1);
        assert!(repo
            .query_handling_history(&TrackingId::from("NOPE"))
            .events
            .is_empty());
    }
}
