//! Cargo, location and voyage models, handling events, and the factory that
//! validates new handling events against the repositories.

pub mod cargo;
pub mod error;
pub mod handling;
pub mod location;
pub mod voyage;

pub use cargo::{
    Cargo, CargoRepository, Delivery, Itinerary, Leg, RouteSpecification, TrackingId,
    TransportStatus,
};
pub use error::{FactoryError, RepositoryError};
pub use handling::{
    CargoHandlingEventFactory, HandlingActivity, HandlingEvent, HandlingEventFactory,
    HandlingEventRepository, HandlingEventType, HandlingHistory, ParseEventTypeError,
};
pub use location::{Location, LocationRepository, UnLocode};
pub use voyage::{CarrierMovement, Schedule, Voyage, VoyageNumber, VoyageRepository};
