//! Wire types for the station API.

use serde::Deserialize;

/// Overview document served by a station at `GET /station`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationOverview {
    /// Version of the test-runner software on the station.
    #[serde(default)]
    pub software_version: Option<String>,

    /// The test currently executing, if any.
    #[serde(default)]
    pub running_test: Option<RunningTest>,
}

/// A test in progress on a station.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningTest {
    /// Test name.
    pub name: String,

    /// Free-text description, if the station provides one.
    #[serde(default)]
    pub description: Option<String>,
}
