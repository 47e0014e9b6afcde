//! Caching layer for station overview fetches.
//!
//! The detail page fetches a station's overview document on every load.
//! Overviews change slowly (a test phase lasts seconds to hours), so a
//! short-TTL cache keyed by endpoint keeps repeated page loads from
//! hammering the station itself.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::probe::{ProbeClient, ProbeError, StationOverview};

/// Cache key: the station's network endpoint.
type OverviewKey = (String, u16);

/// Configuration for the overview cache.
#[derive(Debug, Clone)]
pub struct ProbeCacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for ProbeCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5),
            max_capacity: 256,
        }
    }
}

/// Probe client with overview caching.
///
/// Wraps a [`ProbeClient`] and caches `fetch_overview` responses. `ping` is
/// deliberately not cached: reachability must be observed live.
pub struct CachedProbeClient {
    client: ProbeClient,
    overviews: MokaCache<OverviewKey, Arc<StationOverview>>,
}

impl CachedProbeClient {
    /// Create a new cached client.
    pub fn new(client: ProbeClient, config: &ProbeCacheConfig) -> Self {
        let overviews = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { client, overviews }
    }

    /// Fetch a station overview, using the cache if available.
    pub async fn fetch_overview(
        &self,
        host: &str,
        port: u16,
    ) -> Result<Arc<StationOverview>, ProbeError> {
        let key = (host.to_string(), port);

        if let Some(cached) = self.overviews.get(&key).await {
            return Ok(cached);
        }

        let overview = Arc::new(self.client.fetch_overview(host, port).await?);
        self.overviews.insert(key, overview.clone()).await;

        Ok(overview)
    }

    /// Access the underlying client for operations that bypass the cache.
    pub fn client(&self) -> &ProbeClient {
        &self.client
    }

    /// Get cache statistics.
    pub fn entry_count(&self) -> u64 {
        self.overviews.entry_count()
    }

    /// Invalidate all cached entries. Used by the manual-reload path so a
    /// reload reflects station state immediately.
    pub fn invalidate_all(&self) {
        self.overviews.invalidate_all();
    }
}
