//! HTTP client for station APIs.

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::domain::StationStatus;

use super::error::ProbeError;
use super::types::StationOverview;

/// Default per-request timeout. Stations are on the local network; anything
/// slower than this is as good as down.
const DEFAULT_TIMEOUT_SECS: u64 = 3;

/// Default maximum concurrent probes.
const DEFAULT_MAX_CONCURRENT: usize = 16;

/// Configuration for the probe client.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum concurrent requests across all stations
    pub max_concurrent: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }
}

impl ProbeConfig {
    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }
}

/// Client for the HTTP API each station exposes.
///
/// A refresh probes every discovered station at once, so a semaphore caps
/// how many requests are in flight at any moment.
#[derive(Debug, Clone)]
pub struct ProbeClient {
    http: reqwest::Client,
    semaphore: Arc<Semaphore>,
}

impl ProbeClient {
    /// Create a new probe client with the given configuration.
    pub fn new(config: ProbeConfig) -> Result<Self, ProbeError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Fetch a station's overview document.
    pub async fn fetch_overview(
        &self,
        host: &str,
        port: u16,
    ) -> Result<StationOverview, ProbeError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ProbeError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("http://{host}:{port}/station");

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProbeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let overview: StationOverview =
            serde_json::from_str(&body).map_err(|e| ProbeError::Json {
                message: e.to_string(),
            })?;

        Ok(overview)
    }

    /// Probe a station's reachability.
    ///
    /// Total over every outcome: any failure maps to `Unreachable` rather
    /// than an error, so one dead station never fails a directory refresh.
    pub async fn ping(&self, host: &str, port: u16) -> StationStatus {
        match self.fetch_overview(host, port).await {
            Ok(overview) if overview.running_test.is_some() => StationStatus::Running,
            Ok(_) => StationStatus::Online,
            Err(e) => {
                tracing::debug!(%host, port, error = %e, "station probe failed");
                StationStatus::Unreachable
            }
        }
    }
}
