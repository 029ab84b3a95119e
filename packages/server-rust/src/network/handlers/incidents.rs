//! Incident registration over HTTP.
//!
//! Decodes the JSON body into a [`RegisterIncidentRequest`], runs it through
//! the endpoint and encodes the outcome. Every failure is answered with a
//! JSON body of the form `{"error": "<message>"}`.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use handling_core::{HandlingEventType, TrackingId, UnLocode, VoyageNumber};
use serde::Deserialize;
use serde_json::json;
use tower::ServiceExt;
use tracing::debug;

use super::AppState;
use crate::service::{HandlingError, RegisterIncidentRequest, RegisterIncidentResponse};

/// Wire form of an incident registration.
///
/// Field names are snake_case; camelCase spellings are accepted as aliases.
/// An empty or missing `voyage` means the event involves no carrier.
#[derive(Debug, Deserialize)]
pub struct RegisterIncidentBody {
    #[serde(alias = "completionTime")]
    pub completion_time: DateTime<Utc>,
    #[serde(alias = "trackingId", alias = "trackingID")]
    pub tracking_id: TrackingId,
    #[serde(default)]
    pub voyage: Option<String>,
    pub location: UnLocode,
    #[serde(alias = "eventType")]
    pub event_type: HandlingEventType,
}

impl From<RegisterIncidentBody> for RegisterIncidentRequest {
    fn from(body: RegisterIncidentBody) -> Self {
        Self {
            id: body.tracking_id,
            location: body.location,
            voyage: body
                .voyage
                .filter(|v| !v.is_empty())
                .map(VoyageNumber::new),
            event_type: body.event_type,
            completion_time: body.completion_time,
        }
    }
}

/// `POST /handling/v1/incidents`
pub async fn register_incident_handler(
    State(state): State<AppState>,
    body: Result<Json<RegisterIncidentBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            debug!(error = %rejection.body_text(), "rejected incident body");
            return error_response(rejection.status(), rejection.body_text());
        }
    };

    match state.register_incident.clone().oneshot(body.into()).await {
        Ok(response) => encode_response(&response),
        Err(never) => match never {},
    }
}

/// Fallback for unknown paths under the handling prefix.
pub async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "not found".to_string())
}

/// Encodes an endpoint response: `200 {}` on success, an error body otherwise.
#[must_use]
pub fn encode_response(response: &RegisterIncidentResponse) -> Response {
    match response.error() {
        Some(err) => error_response(status_for(err), err.to_string()),
        None => (StatusCode::OK, Json(json!({}))).into_response(),
    }
}

/// Maps a service error onto the HTTP status reported to the caller.
#[must_use]
pub fn status_for(err: &HandlingError) -> StatusCode {
    match err {
        HandlingError::Validation(e) if e.is_not_found() => StatusCode::NOT_FOUND,
        HandlingError::Validation(_) | HandlingError::InvalidArgument(_) => {
            StatusCode::BAD_REQUEST
        }
        HandlingError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

#[cfg(test)]
mod tests {
    use handling_core::{FactoryError, RepositoryError};

    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn decodes_snake_case_body() {
        let body: RegisterIncidentBody = serde_json::from_str(
            r#"{"completion_time":"2024-01-01T00:00:00Z","tracking_id":"ABC123",
                "voyage":"","location":"SESTO","event_type":"Claim"}"#,
        )
        .unwrap();
        let req = RegisterIncidentRequest::from(body);

        assert_eq!(req.id, TrackingId::from("ABC123"));
        assert_eq!(req.location, UnLocode::from("SESTO"));
        assert_eq!(req.voyage, None);
        assert_eq!(req.event_type, HandlingEventType::Claim);
        assert_eq!(req.completion_time.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn decodes_camel_case_aliases_and_voyage() {
        let body: RegisterIncidentBody = serde_json::from_str(
            r#"{"completionTime":"2024-01-01T00:00:00Z","trackingId":"ABC123",
                "voyage":"V100","location":"SESTO","eventType":"Load"}"#,
        )
        .unwrap();
        let req = RegisterIncidentRequest::from(body);

        assert_eq!(req.voyage, Some(VoyageNumber::from("V100")));
        assert_eq!(req.event_type, HandlingEventType::Load);
    }

    #[test]
    fn unknown_event_type_fails_to_decode() {
        let result: Result<RegisterIncidentBody, _> = serde_json::from_str(
            r#"{"completion_time":"2024-01-01T00:00:00Z","tracking_id":"ABC123",
                "location":"SESTO","event_type":"Teleport"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn status_mapping_follows_error_kind() {
        assert_eq!(
            status_for(&FactoryError::UnknownCargo(TrackingId::from("X")).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&FactoryError::UnknownLocation(UnLocode::from("XXXXX")).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&FactoryError::VoyageRequired(HandlingEventType::Load).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&HandlingError::InvalidArgument("location is required")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&RepositoryError::Unavailable("down".to_string()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn success_encodes_empty_object() {
        let response = encode_response(&RegisterIncidentResponse::default());
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({}));
    }

    #[tokio::test]
    async fn error_encodes_message() {
        let err: HandlingError = FactoryError::VoyageRequired(HandlingEventType::Load).into();
        let message = err.to_string();
        let response = encode_response(&RegisterIncidentResponse { err: Some(err) });

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({ "error": message }));
    }
}
