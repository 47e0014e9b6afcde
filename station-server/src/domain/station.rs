//! Station identity and record types.

use std::fmt;

use chrono::{DateTime, Utc};

use super::status::StationStatus;

/// Error returned when parsing an invalid station identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station id: {reason}")]
pub struct InvalidStationId {
    reason: &'static str,
}

/// A valid station identifier.
///
/// Identifiers are non-empty, at most 64 bytes, and restricted to ASCII
/// alphanumerics plus `-`, `_`, `.` and `:` so they can appear in URL paths
/// unescaped. This type guarantees that any `StationId` value is valid by
/// construction.
///
/// # Examples
///
/// ```
/// use station_server::domain::StationId;
///
/// let id = StationId::parse("rack-4:8888").unwrap();
/// assert_eq!(id.as_str(), "rack-4:8888");
///
/// // Whitespace is rejected
/// assert!(StationId::parse("rack 4").is_err());
///
/// // Empty ids are rejected
/// assert!(StationId::parse("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(String);

impl StationId {
    /// Parse a station identifier from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidStationId> {
        if s.is_empty() {
            return Err(InvalidStationId {
                reason: "must not be empty",
            });
        }

        if s.len() > 64 {
            return Err(InvalidStationId {
                reason: "must be at most 64 bytes",
            });
        }

        for b in s.bytes() {
            if !(b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b':')) {
                return Err(InvalidStationId {
                    reason: "must be ASCII alphanumeric or one of - _ . :",
                });
            }
        }

        Ok(Self(s.to_string()))
    }

    /// Derive an identifier from a station's network endpoint.
    ///
    /// Used when the discovery feed does not supply an explicit id.
    pub fn from_endpoint(host: &str, port: u16) -> Result<Self, InvalidStationId> {
        Self::parse(&format!("{host}:{port}"))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

/// One discovered test station.
///
/// Records are owned by the directory; the web layer only ever reads
/// snapshots of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    /// Stable identifier within the directory.
    pub id: StationId,

    /// Display name.
    pub label: String,

    /// Operational state, as determined by the last probe.
    pub status: StationStatus,

    /// Host the station's own API listens on.
    pub host: String,

    /// Port the station's own API listens on.
    pub port: u16,

    /// Free-text description of the test the station runs, if any.
    /// Normalised at ingest: blank descriptions become `None`.
    pub test_description: Option<String>,

    /// When the directory feed last confirmed this record.
    pub last_seen: DateTime<Utc>,
}

impl Station {
    /// The station's network address, as shown to the user.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether the station can currently be contacted.
    pub fn is_reachable(&self) -> bool {
        self.status.is_reachable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_endpoint_style_ids() {
        let id = StationId::parse("bench-02.lab:8888").unwrap();
        assert_eq!(id.as_str(), "bench-02.lab:8888");
    }

    #[test]
    fn parse_rejects_empty() {
        assert!(StationId::parse("").is_err());
    }

    #[test]
    fn parse_rejects_whitespace_and_slashes() {
        assert!(StationId::parse("bench 02").is_err());
        assert!(StationId::parse("bench/02").is_err());
    }

    #[test]
    fn parse_rejects_overlong() {
        let long = "a".repeat(65);
        assert!(StationId::parse(&long).is_err());
        assert!(StationId::parse(&long[..64]).is_ok());
    }

    #[test]
    fn from_endpoint_formats_host_port() {
        let id = StationId::from_endpoint("10.0.0.7", 8888).unwrap();
        assert_eq!(id.as_str(), "10.0.0.7:8888");
    }

    #[test]
    fn address_formats_host_port() {
        let station = Station {
            id: StationId::parse("s1").unwrap(),
            label: "Bench 1".to_string(),
            status: StationStatus::Online,
            host: "10.0.0.7".to_string(),
            port: 8888,
            test_description: None,
            last_seen: Utc::now(),
        };

        assert_eq!(station.address(), "10.0.0.7:8888");
        assert!(station.is_reachable());
    }
}
