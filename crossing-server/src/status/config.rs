//! Classification windows for the crossing status.

use chrono_tz::Tz;

use crate::domain::MINUTES_PER_DAY;

/// Error returned when window sizes would make the bands overlap.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid windows: {reason}")]
pub struct InvalidWindows {
    reason: &'static str,
}

/// Window sizes (minutes) used to classify the next train.
///
/// Bands, in evaluation order:
/// - CLOSED: `-grace_mins <= minutes_until <= closed_mins`
/// - WARNING: `minutes_until <= warning_mins`
/// - OPEN: otherwise
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    /// How far ahead an upcoming train is still relevant.
    pub lookahead_mins: i64,

    /// How long after its expected time a train still counts.
    pub grace_mins: i64,

    /// Upper bound of the CLOSED band.
    pub closed_mins: i64,

    /// Upper bound of the WARNING band.
    pub warning_mins: i64,

    /// Civil timezone the station feeds report in.
    pub timezone: Tz,
}

impl WindowConfig {
    /// Create a configuration, checking that the bands stay ordered.
    pub fn new(
        lookahead_mins: i64,
        grace_mins: i64,
        closed_mins: i64,
        warning_mins: i64,
        timezone: Tz,
    ) -> Result<Self, InvalidWindows> {
        let config = Self {
            lookahead_mins,
            grace_mins,
            closed_mins,
            warning_mins,
            timezone,
        };
        config.validate()?;
        Ok(config)
    }

    /// The earlier, wider windows: CLOSED within 5 minutes either side,
    /// WARNING up to 12 minutes ahead.
    pub fn legacy() -> Self {
        Self {
            grace_mins: 5,
            closed_mins: 5,
            warning_mins: 12,
            ..Self::default()
        }
    }

    /// Check the invariants the classifier relies on.
    pub fn validate(&self) -> Result<(), InvalidWindows> {
        if self.grace_mins < 0 || self.closed_mins < 0 || self.lookahead_mins < 0 {
            return Err(InvalidWindows {
                reason: "window sizes must not be negative",
            });
        }
        if self.closed_mins >= self.warning_mins {
            return Err(InvalidWindows {
                reason: "closed window must be shorter than warning window",
            });
        }
        if self.lookahead_mins >= MINUTES_PER_DAY {
            return Err(InvalidWindows {
                reason: "lookahead must be shorter than a day",
            });
        }
        if self.grace_mins >= MINUTES_PER_DAY {
            return Err(InvalidWindows {
                reason: "grace must be shorter than a day",
            });
        }
        Ok(())
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            lookahead_mins: 90,
            grace_mins: 1,
            closed_mins: 2,
            warning_mins: 7,
            timezone: chrono_tz::Europe::Rome,
        }
    }
}
