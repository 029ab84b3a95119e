//! Application composition.
//!
//! Wires repositories, the event factory, the inspection handler, the routing
//! client and the decorated handling service into a ready-to-serve router.

use std::sync::Arc;

use anyhow::Context as _;
use axum::Router;
use chrono::{Duration, Utc};
use handling_core::location::samples as locations;
use handling_core::{
    Cargo, CargoHandlingEventFactory, CargoRepository, HandlingEventRepository,
    RouteSpecification, TrackingId, UnLocode,
};
use metrics_exporter_prometheus::PrometheusRecorder;
use tokio::runtime::Handle;
use tracing::info;

use crate::config::ServerConfig;
use crate::network::{build_router, AppState};
use crate::routing::{ProxyRoutingService, RoutingService};
use crate::service::{
    build_handling_pipeline, CargoInspectionService, HandlingService, InspectionEventHandler,
    RegisterIncidentEndpoint,
};
use crate::storage::{
    InMemoryCargoRepository, InMemoryHandlingEventRepository, InMemoryLocationRepository,
    InMemoryVoyageRepository,
};

/// The composed handling application.
pub struct Application {
    router: Router,
    cargos: Arc<InMemoryCargoRepository>,
    handling_events: Arc<InMemoryHandlingEventRepository>,
    routing: Arc<dyn RoutingService>,
}

impl Application {
    /// Builds every component and the HTTP router.
    ///
    /// Metrics are registered on `recorder`, whose handle also backs
    /// `/metrics`. Must be called from within a tokio runtime, which runs the
    /// post-registration inspections.
    ///
    /// # Errors
    ///
    /// Returns an error if no runtime is available or the sample cargos
    /// cannot be stored.
    pub fn build(config: &ServerConfig, recorder: &PrometheusRecorder) -> anyhow::Result<Self> {
        let runtime =
            Handle::try_current().context("application must be built inside a tokio runtime")?;

        let cargos = Arc::new(InMemoryCargoRepository::new());
        let handling_events = Arc::new(InMemoryHandlingEventRepository::new());
        store_sample_cargos(cargos.as_ref()).context("failed to store sample cargos")?;

        let factory = Arc::new(CargoHandlingEventFactory::new(
            cargos.clone(),
            Arc::new(InMemoryVoyageRepository::with_samples()),
            Arc::new(InMemoryLocationRepository::with_samples()),
        ));
        let inspection = Arc::new(CargoInspectionService::new(
            cargos.clone(),
            handling_events.clone(),
        ));
        let handler = Arc::new(InspectionEventHandler::new(inspection, runtime));
        let routing: Arc<dyn RoutingService> =
            Arc::new(ProxyRoutingService::new(&config.routing_service_url));

        let core = HandlingService::new(handling_events.clone(), factory, handler);
        let state = AppState {
            register_incident: RegisterIncidentEndpoint::new(build_handling_pipeline(
                core, recorder,
            )),
            metrics: recorder.handle(),
        };
        let router = build_router(state, &config.network);

        info!(
            routing_service = %config.routing_service_url,
            http_addr = %config.network.http_addr,
            "application composed"
        );

        Ok(Self {
            router,
            cargos,
            handling_events,
            routing,
        })
    }

    /// Router serving the handling API and `/metrics`.
    #[must_use]
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    #[must_use]
    pub fn cargos(&self) -> Arc<dyn CargoRepository> {
        self.cargos.clone()
    }

    #[must_use]
    pub fn handling_events(&self) -> Arc<dyn HandlingEventRepository> {
        self.handling_events.clone()
    }

    #[must_use]
    pub fn routing(&self) -> Arc<dyn RoutingService> {
        Arc::clone(&self.routing)
    }
}

/// Seeds the two demo cargos, with deadlines relative to now.
fn store_sample_cargos(cargos: &dyn CargoRepository) -> anyhow::Result<()> {
    let now = Utc::now();
    let samples = [
        ("FTL456", locations::AUMEL, locations::SESTO, Duration::days(7)),
        ("ABC123", locations::SESTO, locations::CNHKG, Duration::days(14)),
    ];

    for (id, origin, destination, lead_time) in samples {
        cargos.store(Cargo::new(
            TrackingId::from(id),
            RouteSpecification {
                origin: UnLocode::from(origin),
                destination: UnLocode::from(destination),
                arrival_deadline: now + lead_time,
            },
        ))?;
    }
    Ok(())
}
