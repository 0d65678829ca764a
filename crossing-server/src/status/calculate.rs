//! Crossing state classification.
//!
//! Given every known train movement and a reference instant, pick the single
//! most relevant train and map its distance in minutes onto OPEN, WARNING or
//! CLOSED. The upcoming and the just-passed train are tracked separately so
//! that neither can hide the other.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::domain::{
    MINUTES_PER_DAY, TrainEvent, expected_minutes_of_day, minutes_of_day_in, parse_delay_minutes,
    parse_minutes_of_day,
};

use super::config::WindowConfig;

pub const MESSAGE_NO_TRAIN: &str = "Nessun treno in arrivo a breve.";
pub const MESSAGE_CLOSED: &str = "Attenzione! Passaggio a livello probabilmente CHIUSO.";
pub const MESSAGE_WARNING: &str = "Il passaggio a livello potrebbe chiudersi a breve.";
pub const MESSAGE_OPEN: &str = "Via libera (per ora).";

/// Estimated state of the level crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CrossingState {
    Open,
    Closed,
    Warning,
}

impl CrossingState {
    /// Fixed user-facing message for a state with a selected train.
    pub fn message(self) -> &'static str {
        match self {
            CrossingState::Open => MESSAGE_OPEN,
            CrossingState::Closed => MESSAGE_CLOSED,
            CrossingState::Warning => MESSAGE_WARNING,
        }
    }
}

/// The train the state was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextTrainInfo {
    #[serde(flatten)]
    pub event: TrainEvent,

    /// Minutes from now to the expected time; negative if just passed.
    pub minutes_until: i64,

    pub label: String,
}

/// Result of one classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossingStatus {
    pub state: CrossingState,
    pub message: String,
    pub next_train: Option<NextTrainInfo>,
}

impl CrossingStatus {
    fn no_train() -> Self {
        Self {
            state: CrossingState::Open,
            message: MESSAGE_NO_TRAIN.to_string(),
            next_train: None,
        }
    }
}

/// A train with its signed distance from now.
#[derive(Debug, Clone, Copy)]
struct Candidate<'a> {
    event: &'a TrainEvent,
    minutes_until: i64,
}

/// Pure classifier over an explicit reference instant.
///
/// Holds no state between calls and is safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct StatusCalculator {
    windows: WindowConfig,
}

impl StatusCalculator {
    /// Create a calculator with the given windows.
    pub fn new(windows: WindowConfig) -> Self {
        Self { windows }
    }

    /// The windows this calculator classifies with.
    pub fn windows(&self) -> &WindowConfig {
        &self.windows
    }

    /// Classify the crossing at `now` from the merged arrivals and departures.
    ///
    /// Events without a readable time are ignored. If no event falls inside
    /// the lookahead or grace window the crossing is reported OPEN with no
    /// train; callers should surface that as uncertain.
    pub fn calculate<'a, I>(&self, events: I, now: DateTime<Utc>) -> CrossingStatus
    where
        I: IntoIterator<Item = &'a TrainEvent>,
    {
        let now_mins = minutes_of_day_in(now, self.windows.timezone);

        let mut nearest_upcoming: Option<Candidate<'a>> = None;
        let mut nearest_recent: Option<Candidate<'a>> = None;

        for event in events {
            if event.has_unknown_time() || !event.orario.contains(':') {
                continue;
            }
            let Some(scheduled) = parse_minutes_of_day(&event.orario) else {
                continue;
            };

            let delay = parse_delay_minutes(&event.ritardo);
            let expected = expected_minutes_of_day(scheduled, delay);
            let (upcoming, recent) = self.distances(expected, now_mins);

            if let Some(minutes_until) = upcoming
                && nearest_upcoming.is_none_or(|c| minutes_until < c.minutes_until)
            {
                nearest_upcoming = Some(Candidate {
                    event,
                    minutes_until,
                });
            }

            if let Some(minutes_until) = recent
                && nearest_recent.is_none_or(|c| minutes_until > c.minutes_until)
            {
                nearest_recent = Some(Candidate {
                    event,
                    minutes_until,
                });
            }
        }

        let Some(selected) = nearest_upcoming.or(nearest_recent) else {
            debug!(now_mins, "no train inside the lookahead or grace window");
            return CrossingStatus::no_train();
        };

        let state = self.classify(selected.minutes_until);
        debug!(
            now_mins,
            numero = %selected.event.numero,
            orario = %selected.event.orario,
            minutes_until = selected.minutes_until,
            ?state,
            "selected train"
        );

        CrossingStatus {
            state,
            message: state.message().to_string(),
            next_train: Some(NextTrainInfo {
                label: selected.event.label(),
                event: selected.event.clone(),
                minutes_until: selected.minutes_until,
            }),
        }
    }

    /// Map a signed distance onto a state. Bands are checked in order.
    pub fn classify(&self, minutes_until: i64) -> CrossingState {
        let w = &self.windows;
        if minutes_until >= -w.grace_mins && minutes_until <= w.closed_mins {
            CrossingState::Closed
        } else if minutes_until <= w.warning_mins {
            CrossingState::Warning
        } else {
            CrossingState::Open
        }
    }

    /// Forward and backward distance from `now` to `expected`, each
    /// considering both sides of midnight and bounded by its window.
    fn distances(&self, expected: u16, now: u16) -> (Option<i64>, Option<i64>) {
        let direct = i64::from(expected) - i64::from(now);

        let upcoming = [direct, direct + MINUTES_PER_DAY]
            .into_iter()
            .filter(|d| (0..=self.windows.lookahead_mins).contains(d))
            .min();

        let recent = [direct, direct - MINUTES_PER_DAY]
            .into_iter()
            .filter(|d| *d < 0 && *d >= -self.windows.grace_mins)
            .max();

        (upcoming, recent)
    }
}
