//! Station operational status.

use serde::{Deserialize, Serialize};

/// Operational state of a discovered test station.
///
/// The discovery feed reports status as an open set of strings; anything
/// this server does not recognise degrades to [`StationStatus::Unknown`]
/// rather than failing the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StationStatus {
    /// Reachable and idle.
    Online,

    /// Reachable and currently executing a test.
    Running,

    /// Known but not contactable.
    Unreachable,

    /// Status could not be determined (unrecognised value, or not yet probed).
    #[serde(other)]
    Unknown,
}

impl StationStatus {
    /// Every status variant, for exhaustiveness checks in tests.
    pub const ALL: [StationStatus; 4] = [
        StationStatus::Online,
        StationStatus::Running,
        StationStatus::Unreachable,
        StationStatus::Unknown,
    ];

    /// Human-readable label for this status.
    pub fn display_text(self) -> &'static str {
        match self {
            StationStatus::Online => "Online",
            StationStatus::Running => "Running test",
            StationStatus::Unreachable => "Unreachable",
            StationStatus::Unknown => "Unknown",
        }
    }

    /// Whether a station in this state can currently be contacted.
    ///
    /// `Unknown` counts as unreachable until a probe proves otherwise.
    pub fn is_reachable(self) -> bool {
        matches!(self, StationStatus::Online | StationStatus::Running)
    }
}
