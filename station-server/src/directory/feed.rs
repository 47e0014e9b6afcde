//! Background refresh loop and connection state.
//!
//! The feed drives the [`StationDirectory`] and publishes the state the
//! dashboard observes: the connection phase and, after a failure, a
//! once-per-second countdown to the next automatic retry. Both are watch
//! channels, so observers always see the latest value and their
//! subscriptions are released when the receiver is dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Notify, watch};

use super::client::StationRecord;
use super::disk::FeedCache;
use super::store::StationDirectory;

/// Connection phase of the directory feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    /// The initial fetch has not completed yet.
    Loading,

    /// The last fetch succeeded.
    Connected,

    /// The last fetch failed; an automatic retry is pending.
    Errored,
}

/// Configuration for the feed loop.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Interval between routine refreshes while connected.
    pub refresh_interval: Duration,

    /// Delay before an automatic retry after a failed fetch.
    pub retry_delay: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(30),
            retry_delay: Duration::from_secs(10),
        }
    }
}

/// Cheap-to-clone handle for observing and driving the feed.
#[derive(Clone)]
pub struct FeedHandle {
    phase_rx: watch::Receiver<FeedPhase>,
    countdown_rx: watch::Receiver<Option<u32>>,
    kick: Arc<Notify>,
}

impl FeedHandle {
    /// The current connection phase.
    pub fn phase(&self) -> FeedPhase {
        *self.phase_rx.borrow()
    }

    /// Whether the initial fetch is still in flight.
    pub fn is_loading(&self) -> bool {
        self.phase() == FeedPhase::Loading
    }

    /// Whether the last fetch failed.
    pub fn has_error(&self) -> bool {
        self.phase() == FeedPhase::Errored
    }

    /// Latest countdown value in seconds, or `None` if no countdown has
    /// been emitted since the last state change.
    pub fn countdown(&self) -> Option<u32> {
        *self.countdown_rx.borrow()
    }

    /// Subscribe to countdown updates.
    ///
    /// The subscription lasts exactly as long as the returned receiver:
    /// dropping it releases it on every exit path.
    pub fn subscribe_countdown(&self) -> watch::Receiver<Option<u32>> {
        self.countdown_rx.clone()
    }

    /// Request an immediate re-fetch, bypassing any pending countdown.
    ///
    /// Serves both user intents: "Refresh station list" while connected and
    /// "Try again." while errored.
    pub fn refresh_now(&self) {
        self.kick.notify_one();
    }
}

/// The background task that keeps the directory fresh.
pub struct DirectoryFeed {
    directory: StationDirectory,
    config: FeedConfig,
    disk: Option<FeedCache>,
    phase_tx: watch::Sender<FeedPhase>,
    countdown_tx: watch::Sender<Option<u32>>,
    kick: Arc<Notify>,
}

impl DirectoryFeed {
    /// Create the feed and its observer handle.
    ///
    /// `initial_phase` is `Connected` when the directory was seeded from the
    /// disk cache (last-known stations are worth showing), `Loading`
    /// otherwise.
    pub fn new(
        directory: StationDirectory,
        config: FeedConfig,
        initial_phase: FeedPhase,
        disk: Option<FeedCache>,
    ) -> (Self, FeedHandle) {
        let (phase_tx, phase_rx) = watch::channel(initial_phase);
        let (countdown_tx, countdown_rx) = watch::channel(None);
        let kick = Arc::new(Notify::new());

        let handle = FeedHandle {
            phase_rx,
            countdown_rx,
            kick: kick.clone(),
        };

        let feed = Self {
            directory,
            config,
            disk,
            phase_tx,
            countdown_tx,
            kick,
        };

        (feed, handle)
    }

    /// Run the refresh loop until the process exits.
    pub async fn run(self) {
        loop {
            match self.directory.refresh().await {
                Ok(count) => {
                    tracing::debug!(stations = count, "directory refresh complete");
                    self.persist().await;
                    self.phase_tx.send_replace(FeedPhase::Connected);
                    self.countdown_tx.send_replace(None);

                    // Wait out the refresh interval, or wake early on a
                    // manual reload.
                    tokio::select! {
                        _ = tokio::time::sleep(self.config.refresh_interval) => {}
                        _ = self.kick.notified() => {}
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "directory refresh failed");
                    self.phase_tx.send_replace(FeedPhase::Errored);
                    self.count_down().await;
                }
            }
        }
    }

    /// Write the current station list to the disk cache.
    async fn persist(&self) {
        let Some(cache) = &self.disk else {
            return;
        };

        let snapshot = self.directory.snapshot().await;
        let records: Vec<StationRecord> = snapshot.values().map(StationRecord::from).collect();

        if let Err(e) = cache.save(&records) {
            tracing::warn!(path = %cache.path().display(), error = %e, "failed to write station cache");
        }
    }

    /// Emit the retry countdown once per second, descending, then clear it.
    /// A manual retry ends the countdown early.
    async fn count_down(&self) {
        let total = self.config.retry_delay.as_secs() as u32;

        for remaining in (1..=total).rev() {
            self.countdown_tx.send_replace(Some(remaining));
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(1)) => {}
                _ = self.kick.notified() => break,
            }
        }

        self.countdown_tx.send_replace(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{DirectoryClient, DirectoryClientConfig};
    use crate::probe::{ProbeClient, ProbeConfig};

    fn test_feed(retry_secs: u64) -> (DirectoryFeed, FeedHandle) {
        let client = DirectoryClient::new(DirectoryClientConfig::default()).unwrap();
        let prober = ProbeClient::new(ProbeConfig::default()).unwrap();
        let directory = StationDirectory::empty(client, prober);

        let config = FeedConfig {
            refresh_interval: Duration::from_secs(30),
            retry_delay: Duration::from_secs(retry_secs),
        };

        DirectoryFeed::new(directory, config, FeedPhase::Loading, None)
    }

    #[tokio::test]
    async fn handle_reports_initial_phase() {
        let (_feed, handle) = test_feed(10);

        assert_eq!(handle.phase(), FeedPhase::Loading);
        assert!(handle.is_loading());
        assert!(!handle.has_error());
        assert_eq!(handle.countdown(), None);
    }

    #[tokio::test]
    async fn phase_updates_are_observed() {
        let (feed, handle) = test_feed(10);

        feed.phase_tx.send_replace(FeedPhase::Errored);
        assert!(handle.has_error());
        assert!(!handle.is_loading());

        feed.phase_tx.send_replace(FeedPhase::Connected);
        assert_eq!(handle.phase(), FeedPhase::Connected);
    }

    #[tokio::test]
    async fn countdown_shows_latest_value_only() {
        let (feed, handle) = test_feed(10);

        feed.countdown_tx.send_replace(Some(7));
        assert_eq!(handle.countdown(), Some(7));

        feed.countdown_tx.send_replace(Some(3));
        assert_eq!(handle.countdown(), Some(3));

        feed.countdown_tx.send_replace(None);
        assert_eq!(handle.countdown(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_emits_descending_then_clears() {
        let (feed, handle) = test_feed(3);

        let mut rx = handle.subscribe_countdown();
        let collector = tokio::spawn(async move {
            let mut seen = Vec::new();
            while rx.changed().await.is_ok() {
                seen.push(*rx.borrow());
                if seen.len() == 4 {
                    break;
                }
            }
            seen
        });

        feed.count_down().await;

        let seen = collector.await.unwrap();
        assert_eq!(seen, vec![Some(3), Some(2), Some(1), None]);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_retry_short_circuits_countdown() {
        let (feed, handle) = test_feed(30);

        // The pending permit makes the first countdown tick return
        // immediately, as if the user had already clicked "Try again."
        handle.refresh_now();

        feed.count_down().await;
        assert_eq!(handle.countdown(), None);
    }
}
