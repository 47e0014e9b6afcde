//! Data transfer objects for web requests and responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::domain::Station;
use crate::probe::StationOverview;

/// A station in list responses.
#[derive(Debug, Serialize)]
pub struct StationResult {
    /// Directory identifier
    pub id: String,

    /// Display name
    pub label: String,

    /// Operational status label
    pub status: String,

    /// Whether the station can currently be contacted
    pub reachable: bool,

    /// Host of the station's own API
    pub host: String,

    /// Port of the station's own API
    pub port: u16,

    /// Free-text description of the test the station runs
    pub test_description: Option<String>,

    /// When the directory last confirmed this record (RFC 3339)
    pub last_seen: String,
}

impl StationResult {
    /// Create from a domain Station.
    pub fn from_station(station: &Station) -> Self {
        Self {
            id: station.id.as_str().to_string(),
            label: station.label.clone(),
            status: station.status.display_text().to_string(),
            reachable: station.is_reachable(),
            host: station.host.clone(),
            port: station.port,
            test_description: station.test_description.clone(),
            last_seen: station.last_seen.to_rfc3339(),
        }
    }
}

/// Response for the station list endpoint.
#[derive(Debug, Serialize)]
pub struct StationListResponse {
    /// Whether the initial directory fetch is still in flight
    pub loading: bool,

    /// Whether the last directory fetch failed
    pub error: bool,

    /// Seconds until the next automatic retry, if a countdown is running
    pub retry_in_secs: Option<u32>,

    /// Number of known stations
    pub station_count: usize,

    /// Stations in display order
    pub stations: Vec<StationResult>,
}

/// Response for the station detail endpoint.
#[derive(Debug, Serialize)]
pub struct StationDetailResponse {
    /// The station record
    pub station: StationResult,

    /// Station software version, if the overview probe succeeded
    pub software_version: Option<String>,

    /// Name of the currently running test, if any
    pub running_test: Option<String>,
}

impl StationDetailResponse {
    /// Create from a domain Station plus an optional probed overview.
    pub fn from_parts(station: &Station, overview: Option<&StationOverview>) -> Self {
        Self {
            station: StationResult::from_station(station),
            software_version: overview.and_then(|o| o.software_version.clone()),
            running_test: overview
                .and_then(|o| o.running_test.as_ref())
                .map(|t| t.name.clone()),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Application-level error for route handlers.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message.clone()),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message.clone()),
        };

        tracing::error!(status = %status, message = %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{StationId, StationStatus};
    use chrono::Utc;

    #[test]
    fn station_result_carries_display_status() {
        let station = Station {
            id: StationId::parse("bench-1").unwrap(),
            label: "Bench 1".to_string(),
            status: StationStatus::Unreachable,
            host: "10.0.0.7".to_string(),
            port: 8888,
            test_description: None,
            last_seen: Utc::now(),
        };

        let result = StationResult::from_station(&station);
        assert_eq!(result.status, "Unreachable");
        assert!(!result.reachable);
        assert_eq!(result.id, "bench-1");
    }

    #[test]
    fn detail_response_without_overview() {
        let station = Station {
            id: StationId::parse("bench-1").unwrap(),
            label: "Bench 1".to_string(),
            status: StationStatus::Online,
            host: "10.0.0.7".to_string(),
            port: 8888,
            test_description: None,
            last_seen: Utc::now(),
        };

        let response = StationDetailResponse::from_parts(&station, None);
        assert!(response.software_version.is_none());
        assert!(response.running_test.is_none());
    }
}
