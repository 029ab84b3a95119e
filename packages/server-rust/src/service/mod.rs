//! Handling service and its request pipeline.
//!
//! 1. **Domain** (`domain`): the core service that validates and stores events
//! 2. **Inspection** (`inspection`): fire-and-forget cargo inspection after registration
//! 3. **Middleware** (`middleware`): Tower layers (instrumenting, logging)
//! 4. **Endpoint** (`endpoint`): transport-neutral request/response adapter

pub mod domain;
pub mod endpoint;
pub mod inspection;
pub mod middleware;
pub mod operation;

// Re-export key types for convenient access.
pub use domain::HandlingService;
pub use endpoint::{RegisterIncidentEndpoint, RegisterIncidentRequest, RegisterIncidentResponse};
pub use inspection::{
    CargoInspectionService, HandlingEventHandler, InspectionError, InspectionEventHandler,
    InspectionService,
};
pub use middleware::build_handling_pipeline;
pub use operation::{
    method_names, BoxHandlingService, HandlingError, HandlingFuture, RegisterHandlingEvent,
};
