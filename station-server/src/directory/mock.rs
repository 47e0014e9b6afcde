//! Mock discovery feed for testing without a live feed.
//!
//! Loads a sample station list from a JSON file and serves it as if it
//! were a live feed response.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::client::{StationRecord, StationsResponse};
use super::error::DirectoryError;

/// Mock directory client that serves data from a JSON file.
///
/// This is useful for development and testing without a running discovery
/// feed. Mimics the real `DirectoryClient::fetch_all` interface.
#[derive(Clone)]
pub struct MockDirectoryClient {
    records: Arc<RwLock<Vec<StationRecord>>>,
}

impl MockDirectoryClient {
    /// Create a new mock client by loading a stations JSON file.
    ///
    /// Expects the same shape as the live feed response:
    /// `{"stations": [...]}`.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let path = path.as_ref();

        let json = std::fs::read_to_string(path).map_err(|e| DirectoryError::Api {
            status: 0,
            message: format!("Failed to read {:?}: {}", path, e),
        })?;

        let response: StationsResponse =
            serde_json::from_str(&json).map_err(|e| DirectoryError::Json {
                message: format!("Failed to parse {:?}: {}", path, e),
            })?;

        Ok(Self {
            records: Arc::new(RwLock::new(response.stations)),
        })
    }

    /// Fetch all stations.
    ///
    /// Mimics the real `DirectoryClient::fetch_all` interface.
    pub async fn fetch_all(&self) -> Result<Vec<StationRecord>, DirectoryError> {
        let records = self.records.read().await;
        Ok(records.clone())
    }

    /// Reload mock data from disk (useful for development).
    pub async fn reload(&self, path: impl AsRef<Path>) -> Result<(), DirectoryError> {
        let new_client = Self::new(path)?;
        let mut records = self.records.write().await;
        let new_records = new_client.records.read().await;
        *records = new_records.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_mock_data() {
        let client = MockDirectoryClient::new("data/mock_stations.json").unwrap();
        let records = client.fetch_all().await.unwrap();

        assert!(!records.is_empty());
        assert!(records.iter().any(|r| r.label == "Bench 1"));
    }

    #[tokio::test]
    async fn missing_file_returns_error() {
        let result = MockDirectoryClient::new("data/no_such_file.json");
        assert!(result.is_err());
    }
}
