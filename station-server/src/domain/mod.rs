//! Core domain types for the station dashboard.

mod station;
mod status;

pub use station::{InvalidStationId, Station, StationId};
pub use status::StationStatus;
