//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedProbeClient;
use crate::directory::{FeedHandle, StationDirectory};

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Authoritative station collection
    pub directory: StationDirectory,

    /// Handle to the background feed (connection phase, countdown, retry)
    pub feed: FeedHandle,

    /// Cached client for station overview probes
    pub probes: Arc<CachedProbeClient>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(directory: StationDirectory, feed: FeedHandle, probes: CachedProbeClient) -> Self {
        Self {
            directory,
            feed,
            probes: Arc::new(probes),
        }
    }
}
