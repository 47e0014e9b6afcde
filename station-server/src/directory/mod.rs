//! Station directory: discovery feed client, authoritative station
//! collection, and the background refresh loop.
//!
//! The directory owns everything the dashboard observes: which stations
//! exist, whether they are reachable, whether the feed connection itself is
//! healthy, and the countdown to the next automatic retry after a failure.
//! The web layer only ever reads snapshots of this state.

mod client;
mod disk;
mod error;
mod feed;
mod mock;
mod store;

pub use client::{DirectoryClient, DirectoryClientConfig, StationRecord};
pub use disk::{FeedCache, FeedCacheConfig};
pub use error::DirectoryError;
pub use feed::{DirectoryFeed, FeedConfig, FeedHandle, FeedPhase};
pub use mock::MockDirectoryClient;
pub use store::StationDirectory;
