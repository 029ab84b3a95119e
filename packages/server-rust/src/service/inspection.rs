//! Post-registration processing: cargo inspection triggered by new handling events.
//!
//! Inspection runs on its own task so that its outcome can never change the
//! result of the registration that triggered it.

use std::sync::{Arc, Mutex, PoisonError};

use handling_core::{
    CargoRepository, HandlingEvent, HandlingEventRepository, RepositoryError, TrackingId,
};
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Reacts to a successfully stored handling event.
///
/// Implementations own their failures: nothing is returned to the caller.
pub trait HandlingEventHandler: Send + Sync {
    fn handle(&self, event: &HandlingEvent);
}

/// Re-evaluates a cargo's delivery progress.
pub trait InspectionService: Send + Sync {
    /// Inspects the cargo identified by `id`.
    ///
    /// # Errors
    ///
    /// Returns an [`InspectionError`] if the cargo is unknown or cannot be stored.
    fn inspect_cargo(&self, id: &TrackingId) -> Result<(), InspectionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum InspectionError {
    #[error("cannot inspect unknown cargo {0}")]
    UnknownCargo(TrackingId),
    #[error(transparent)]
    Store(#[from] RepositoryError),
}

// ---------------------------------------------------------------------------
// CargoInspectionService
// ---------------------------------------------------------------------------

/// Recomputes delivery progress from the cargo's full handling history.
///
/// Inspections run one at a time. Events are stored before their inspection
/// is spawned, so the inspection that writes last has read every event stored
/// so far and an older history never overwrites a newer delivery.
pub struct CargoInspectionService {
    cargos: Arc<dyn CargoRepository>,
    events: Arc<dyn HandlingEventRepository>,
    serial: Mutex<()>,
}

impl CargoInspectionService {
    #[must_use]
    pub fn new(cargos: Arc<dyn CargoRepository>, events: Arc<dyn HandlingEventRepository>) -> Self {
        Self {
            cargos,
            events,
            serial: Mutex::new(()),
        }
    }
}

impl InspectionService for CargoInspectionService {
    fn inspect_cargo(&self, id: &TrackingId) -> Result<(), InspectionError> {
        // Held from read to write.
        let _serial = self.serial.lock().unwrap_or_else(PoisonError::into_inner);

        let mut cargo = self
            .cargos
            .find(id)
            .ok_or_else(|| InspectionError::UnknownCargo(id.clone()))?;

        let history = self.events.query_handling_history(id);
        cargo.derive_delivery_progress(&history);

        let delivery = cargo.delivery.clone();
        self.cargos.store(cargo)?;

        if delivery.is_unloaded_at_destination {
            info!(tracking_id = %id, "cargo has arrived at its final destination");
        } else {
            debug!(
                tracking_id = %id,
                transport_status = ?delivery.transport_status,
                "cargo inspected"
            );
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// InspectionEventHandler
// ---------------------------------------------------------------------------

/// [`HandlingEventHandler`] that spawns a short-lived inspection task per event.
pub struct InspectionEventHandler {
    inspection: Arc<dyn InspectionService>,
    runtime: Handle,
}

impl InspectionEventHandler {
    /// Creates a handler that spawns inspections onto `runtime`.
    #[must_use]
    pub fn new(inspection: Arc<dyn InspectionService>, runtime: Handle) -> Self {
        Self {
            inspection,
            runtime,
        }
    }
}

impl HandlingEventHandler for InspectionEventHandler {
    fn handle(&self, event: &HandlingEvent) {
        let inspection = Arc::clone(&self.inspection);
        let tracking_id = event.tracking_id.clone();

        self.runtime.spawn(async move {
            if let Err(e) = inspection.inspect_cargo(&tracking_id) {
                warn!(tracking_id = %tracking_id, error = %e, "cargo inspection failed");
            }
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
