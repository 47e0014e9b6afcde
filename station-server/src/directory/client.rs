//! Discovery feed client.

use serde::{Deserialize, Serialize};

use super::error::DirectoryError;

/// Default base URL for the discovery feed.
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:12000";

/// Wrapper for the stations response.
#[derive(Debug, Deserialize)]
pub struct StationsResponse {
    pub stations: Vec<StationRecord>,
}

/// Wire record for one discovered station.
///
/// Status is deliberately absent: reachability is determined by probing
/// each station directly, never trusted from the feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationRecord {
    /// Explicit identifier, if the feed assigns one. Derived from the
    /// endpoint otherwise.
    #[serde(default)]
    pub station_id: Option<String>,

    /// Display name.
    pub label: String,

    /// Host the station's API listens on.
    pub host: String,

    /// Port the station's API listens on.
    pub port: u16,

    /// Free-text description of the test the station runs.
    #[serde(default)]
    pub test_description: Option<String>,
}

/// Configuration for the discovery feed client.
#[derive(Debug, Clone)]
pub struct DirectoryClientConfig {
    /// Base URL of the feed
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl DirectoryClientConfig {
    /// Create a new config with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 10,
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for DirectoryClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Client for the discovery feed.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl DirectoryClient {
    /// Create a new discovery feed client.
    pub fn new(config: DirectoryClientConfig) -> Result<Self, DirectoryError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Fetch all currently discoverable stations from the feed.
    pub async fn fetch_all(&self) -> Result<Vec<StationRecord>, DirectoryError> {
        let url = format!("{}/stations", self.base_url);

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DirectoryError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let response: StationsResponse =
            serde_json::from_str(&body).map_err(|e| DirectoryError::Json {
                message: e.to_string(),
            })?;

        Ok(response.stations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = DirectoryClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn config_with_timeout() {
        let config = DirectoryClientConfig::new("http://feed.lab:12000").with_timeout(2);
        assert_eq!(config.base_url, "http://feed.lab:12000");
        assert_eq!(config.timeout_secs, 2);
    }

    #[test]
    fn record_parses_minimal_json() {
        let json = r#"{"label": "Bench 1", "host": "10.0.0.7", "port": 8888}"#;
        let record: StationRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.label, "Bench 1");
        assert!(record.station_id.is_none());
        assert!(record.test_description.is_none());
    }

    #[test]
    fn record_parses_full_json() {
        let json = r#"{
            "stationId": "bench-1",
            "label": "Bench 1",
            "host": "10.0.0.7",
            "port": 8888,
            "testDescription": "Camera module focus sweep"
        }"#;
        let record: StationRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.station_id.as_deref(), Some("bench-1"));
        assert_eq!(
            record.test_description.as_deref(),
            Some("Camera module focus sweep")
        );
    }
}
