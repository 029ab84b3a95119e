//! Client for the external routing service.
//!
//! The routing service proposes itineraries for a route specification. The
//! handling server constructs the client at startup; incident registration
//! never calls it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use handling_core::{Itinerary, Leg, RouteSpecification, UnLocode, VoyageNumber};
use serde::Deserialize;

/// Default base URL of the routing service.
pub const DEFAULT_ROUTING_SERVICE_URL: &str = "http://localhost:7878";

/// Source of candidate itineraries.
#[async_trait]
pub trait RoutingService: Send + Sync {
    /// Returns every itinerary that satisfies `spec`'s origin and destination.
    async fn fetch_routes_for_specification(
        &self,
        spec: &RouteSpecification,
    ) -> anyhow::Result<Vec<Itinerary>>;
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct PathsResponse {
    #[serde(default)]
    paths: Vec<TransitPath>,
}

#[derive(Debug, Deserialize)]
struct TransitPath {
    #[serde(default)]
    edges: Vec<TransitEdge>,
}

#[derive(Debug, Deserialize)]
struct TransitEdge {
    voyage: VoyageNumber,
    origin: UnLocode,
    destination: UnLocode,
    departure: DateTime<Utc>,
    arrival: DateTime<Utc>,
}

impl From<TransitPath> for Itinerary {
    fn from(path: TransitPath) -> Self {
        let legs = path
            .edges
            .into_iter()
            .map(|edge| Leg {
                voyage_number: edge.voyage,
                load_location: edge.origin,
                unload_location: edge.destination,
                load_time: edge.departure,
                unload_time: edge.arrival,
            })
            .collect();
        Itinerary { legs }
    }
}

// ---------------------------------------------------------------------------
// ProxyRoutingService
// ---------------------------------------------------------------------------

/// [`RoutingService`] backed by the routing service's HTTP API.
#[derive(Debug, Clone)]
pub struct ProxyRoutingService {
    client: reqwest::Client,
    base_url: String,
}

impl ProxyRoutingService {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn paths_url(&self) -> String {
        format!("{}/paths", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl RoutingService for ProxyRoutingService {
    async fn fetch_routes_for_specification(
        &self,
        spec: &RouteSpecification,
    ) -> anyhow::Result<Vec<Itinerary>> {
        let response = self
            .client
            .get(self.paths_url())
            .query(&[
                ("from", spec.origin.as_str()),
                ("to", spec.destination.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: PathsResponse = response.json().await?;
        Ok(body.paths.into_iter().map(Itinerary::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::extract::Query;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use super::*;

    fn spec() -> RouteSpecification {
        RouteSpecification {
            origin: UnLocode::from("SESTO"),
            destination: UnLocode::from("CNHKG"),
            arrival_deadline: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[test]
    fn paths_url_ignores_trailing_slash() {
        assert_eq!(
            ProxyRoutingService::new("http://routing:7878/").paths_url(),
            "http://routing:7878/paths"
        );
        assert_eq!(
            ProxyRoutingService::new(DEFAULT_ROUTING_SERVICE_URL).paths_url(),
            "http://localhost:7878/paths"
        );
    }

    #[test]
    fn transit_path_becomes_itinerary() {
        let body: PathsResponse = serde_json::from_value(json!({
            "paths": [{
                "edges": [
                    {"voyage": "0100S", "origin": "SESTO", "destination": "DEHAM",
                     "departure": "2024-01-01T00:00:00Z", "arrival": "2024-01-03T00:00:00Z"},
                    {"voyage": "0400S", "origin": "DEHAM", "destination": "CNHKG",
                     "departure": "2024-01-04T00:00:00Z", "arrival": "2024-01-20T00:00:00Z"}
                ]
            }]
        }))
        .unwrap();

        let itineraries: Vec<Itinerary> = body.paths.into_iter().map(Itinerary::from).collect();
        assert_eq!(itineraries.len(), 1);
        let legs = &itineraries[0].legs;
        assert_eq!(legs.len(), 2);
        assert_eq!(legs[0].voyage_number, VoyageNumber::from("0100S"));
        assert_eq!(legs[0].unload_location, UnLocode::from("DEHAM"));
        assert_eq!(legs[1].load_location, UnLocode::from("DEHAM"));
    }

    #[tokio::test]
    async fn fetches_paths_from_routing_service() {
        async fn paths(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
            let from = params.get("from").cloned().unwrap_or_default();
            let to = params.get("to").cloned().unwrap_or_default();
            Json(json!({
                "paths": [{
                    "edges": [{"voyage": "V100", "origin": from, "destination": to,
                               "departure": "2024-01-01T00:00:00Z",
                               "arrival": "2024-01-02T00:00:00Z"}]
                }]
            }))
        }

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, Router::new().route("/paths", get(paths)))
                .await
                .unwrap();
        });

        let routing = ProxyRoutingService::new(format!("http://{addr}"));
        let itineraries = routing.fetch_routes_for_specification(&spec()).await.unwrap();

        assert_eq!(itineraries.len(), 1);
        assert_eq!(itineraries[0].legs[0].load_location, UnLocode::from("SESTO"));
        assert_eq!(itineraries[0].legs[0].unload_location, UnLocode::from("CNHKG"));
        server.abort();
    }

    #[tokio::test]
    async fn unreachable_service_is_an_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let routing = ProxyRoutingService::new(format!("http://{addr}"));
        assert!(routing.fetch_routes_for_specification(&spec()).await.is_err());
    }
}
