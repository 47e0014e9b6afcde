//! Station HTTP API client.
//!
//! Each test station exposes a small HTTP API of its own. This module
//! contacts it for two purposes:
//!
//! - reachability probes during a directory refresh (`ping`), which map
//!   any failure to a status rather than an error
//! - the overview document shown on the station detail page
//!   (`fetch_overview`)

mod client;
mod error;
mod types;

pub use client::{ProbeClient, ProbeConfig};
pub use error::ProbeError;
pub use types::{RunningTest, StationOverview};
