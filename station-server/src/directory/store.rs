//! Authoritative station collection.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tokio::sync::RwLock;

use crate::domain::{Station, StationId, StationStatus};
use crate::probe::ProbeClient;

use super::client::{DirectoryClient, StationRecord};
use super::error::DirectoryError;

/// Thread-safe station collection with support for background refresh.
///
/// The mapping is unordered as stored; ordering is applied by the view at
/// render time. Consumers receive cloned snapshots and never mutate the
/// collection.
#[derive(Clone)]
pub struct StationDirectory {
    inner: Arc<RwLock<HashMap<StationId, Station>>>,
    client: DirectoryClient,
    prober: ProbeClient,
}

impl StationDirectory {
    /// Create an empty directory (populated by `seed` or the first refresh).
    pub fn empty(client: DirectoryClient, prober: ProbeClient) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            client,
            prober,
        }
    }

    /// Create a directory by fetching from the feed.
    ///
    /// This will fail if the feed is unreachable.
    pub async fn fetch(
        client: DirectoryClient,
        prober: ProbeClient,
    ) -> Result<Self, DirectoryError> {
        let directory = Self::empty(client, prober);
        directory.refresh().await?;
        Ok(directory)
    }

    /// Re-fetch the station list and probe every station's reachability.
    ///
    /// On success the mapping is replaced wholesale. On failure the existing
    /// mapping is preserved and the error is returned.
    pub async fn refresh(&self) -> Result<usize, DirectoryError> {
        let records = self.client.fetch_all().await?;
        let stations = self.resolve(records).await;
        let count = stations.len();

        let mut guard = self.inner.write().await;
        *guard = stations;

        Ok(count)
    }

    /// Pre-populate the directory from cached records, without probing.
    ///
    /// Cached records predate this process, so every station starts as
    /// `Unknown` until the first live refresh.
    pub async fn seed(&self, records: Vec<StationRecord>) -> usize {
        let now = Utc::now();
        let stations: HashMap<StationId, Station> = records
            .into_iter()
            .filter_map(|r| station_from_record(r, StationStatus::Unknown, now))
            .collect();
        let count = stations.len();

        let mut guard = self.inner.write().await;
        *guard = stations;

        count
    }

    /// Clone out the current station collection.
    pub async fn snapshot(&self) -> HashMap<StationId, Station> {
        let guard = self.inner.read().await;
        guard.clone()
    }

    /// Look up a single station.
    pub async fn get(&self, id: &StationId) -> Option<Station> {
        let guard = self.inner.read().await;
        guard.get(id).cloned()
    }

    /// Get the number of known stations.
    pub async fn len(&self) -> usize {
        let guard = self.inner.read().await;
        guard.len()
    }

    /// Check if no stations are known.
    pub async fn is_empty(&self) -> bool {
        let guard = self.inner.read().await;
        guard.is_empty()
    }

    /// Turn feed records into station entries, probing each concurrently.
    async fn resolve(&self, records: Vec<StationRecord>) -> HashMap<StationId, Station> {
        let now = Utc::now();

        let accepted: Vec<(StationId, StationRecord)> = records
            .into_iter()
            .filter_map(|r| match record_id(&r) {
                Ok(id) => Some((id, r)),
                Err(e) => {
                    tracing::debug!(label = %r.label, error = %e, "skipping station with invalid id");
                    None
                }
            })
            .collect();

        let statuses = join_all(
            accepted
                .iter()
                .map(|(_, r)| self.prober.ping(&r.host, r.port)),
        )
        .await;

        accepted
            .into_iter()
            .zip(statuses)
            .filter_map(|((_, record), status)| station_from_record(record, status, now))
            .collect()
    }
}

/// Identifier for a record: explicit id if the feed assigned one, else
/// derived from the endpoint.
fn record_id(record: &StationRecord) -> Result<StationId, crate::domain::InvalidStationId> {
    match &record.station_id {
        Some(raw) => StationId::parse(raw),
        None => StationId::from_endpoint(&record.host, record.port),
    }
}

/// Build a station entry from a feed record. Returns `None` (logged) when
/// the record's id is invalid.
fn station_from_record(
    record: StationRecord,
    status: StationStatus,
    now: DateTime<Utc>,
) -> Option<(StationId, Station)> {
    let id = match record_id(&record) {
        Ok(id) => id,
        Err(e) => {
            tracing::debug!(label = %record.label, error = %e, "skipping station with invalid id");
            return None;
        }
    };

    let station = Station {
        id: id.clone(),
        label: record.label,
        status,
        host: record.host,
        port: record.port,
        test_description: record.test_description.filter(|d| !d.trim().is_empty()),
        last_seen: now,
    };

    Some((id, station))
}
