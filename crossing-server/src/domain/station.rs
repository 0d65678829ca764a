//! Station code types.

use std::fmt;

/// Longest station code accepted. Feed codes are of the form `S01145`.
const MAX_LEN: usize = 16;

/// Error returned when parsing an invalid station code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code {code:?}: {reason}")]
pub struct InvalidStationId {
    code: String,
    reason: &'static str,
}

/// A station code as understood by the realtime feed (e.g. `S01145`).
///
/// Codes are non-empty ASCII alphanumeric strings. They are interpolated into
/// the feed URL, so anything else is rejected at construction.
///
/// # Examples
///
/// ```
/// use crossing_server::domain::StationId;
///
/// let station = StationId::parse("S01145").unwrap();
/// assert_eq!(station.as_str(), "S01145");
///
/// assert!(StationId::parse("").is_err());
/// assert!(StationId::parse("S01145&x=1").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StationId(String);

impl StationId {
    /// Parse a station code, trimming surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, InvalidStationId> {
        let trimmed = s.trim();
        let invalid = |reason| InvalidStationId {
            code: s.to_string(),
            reason,
        };

        if trimmed.is_empty() {
            return Err(invalid("must not be empty"));
        }

        if trimmed.len() > MAX_LEN {
            return Err(invalid("too long"));
        }

        if !trimmed.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(invalid("must be ASCII letters and digits"));
        }

        Ok(StationId(trimmed.to_string()))
    }

    /// Parse a comma-separated list of station codes, skipping empty entries.
    pub fn parse_list(s: &str) -> Result<Vec<Self>, InvalidStationId> {
        s.split(',')
            .filter(|part| !part.trim().is_empty())
            .map(Self::parse)
            .collect()
    }

    /// Returns the station code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
