//! Disk-based cache of the last-known station list.
//!
//! A dashboard restart should not present an empty directory while the
//! first live fetch is in flight, so the most recent successful station
//! list is persisted and reloaded at startup (statuses reset to unknown
//! until probed).

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::domain::Station;

use super::client::StationRecord;
use super::error::DirectoryError;

/// Default cache TTL: 24 hours.
const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Cached station list with metadata.
#[derive(Debug, Serialize, Deserialize)]
struct CachedStations {
    /// Unix timestamp when the cache was written.
    cached_at_secs: u64,
    /// The cached station records.
    stations: Vec<StationRecord>,
}

/// Configuration for the feed disk cache.
#[derive(Debug, Clone)]
pub struct FeedCacheConfig {
    /// Path to the cache file.
    pub path: PathBuf,
    /// How long the cache remains valid.
    pub ttl: Duration,
}

impl FeedCacheConfig {
    /// Create a new cache config with the given path and default TTL (24 hours).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ttl: DEFAULT_TTL,
        }
    }

    /// Set a custom TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for FeedCacheConfig {
    fn default() -> Self {
        // Default to a cache file in the current directory
        Self::new("stations_cache.json")
    }
}

/// Disk cache for the station list.
#[derive(Debug, Clone)]
pub struct FeedCache {
    config: FeedCacheConfig,
}

impl FeedCache {
    /// Create a new feed cache with the given config.
    pub fn new(config: FeedCacheConfig) -> Self {
        Self { config }
    }

    /// Try to load station records from the cache.
    ///
    /// Returns `None` if the cache doesn't exist, is invalid, or has expired.
    pub fn load(&self) -> Option<Vec<StationRecord>> {
        let contents = std::fs::read_to_string(&self.config.path).ok()?;
        let cached: CachedStations = serde_json::from_str(&contents).ok()?;

        // Check if cache has expired
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .ok()?
            .as_secs();

        let age_secs = now.saturating_sub(cached.cached_at_secs);
        if age_secs >= self.config.ttl.as_secs() {
            return None;
        }

        Some(cached.stations)
    }

    /// Save station records to the cache.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save(&self, stations: &[StationRecord]) -> Result<(), DirectoryError> {
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_err(|_| DirectoryError::Cache {
                message: "system time before unix epoch".to_string(),
            })?
            .as_secs();

        let cached = CachedStations {
            cached_at_secs: now,
            stations: stations.to_vec(),
        };

        // Create parent directories if needed
        if let Some(parent) = self.config.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| DirectoryError::Cache {
                message: format!("failed to create cache directory: {}", e),
            })?;
        }

        let json = serde_json::to_string_pretty(&cached).map_err(|e| DirectoryError::Cache {
            message: format!("failed to serialize cache: {}", e),
        })?;

        std::fs::write(&self.config.path, json).map_err(|e| DirectoryError::Cache {
            message: format!("failed to write cache file: {}", e),
        })?;

        Ok(())
    }

    /// Get the cache file path.
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Get the cache TTL.
    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }
}

impl From<&Station> for StationRecord {
    fn from(station: &Station) -> Self {
        Self {
            station_id: Some(station.id.as_str().to_string()),
            label: station.label.clone(),
            host: station.host.clone(),
            port: station.port,
            test_description: station.test_description.clone(),
        }
    }
}
