//! Concurrent fan-out over station feeds.
//!
//! One fetch per configured station runs concurrently, each under its own
//! timeout, so a cycle takes about as long as the slowest source (capped at
//! the budget) rather than the sum. Results are merged only after every
//! fetch has settled; nothing is shared between fetches.

mod fetch;
#[cfg(test)]
mod test_feed;

use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use tracing::info;

use crate::domain::{StationId, TrainEvent};
use crate::feed::StationFeed;
use crate::status::{CrossingStatus, StatusCalculator};

pub use fetch::{SourceOutcome, fetch_source};

/// How many sources contributed to a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceStatus {
    /// Every source answered
    Full,
    /// Some but not all sources answered
    Partial,
    /// No source answered
    Unavailable,
}

impl SourceStatus {
    /// Degradation level for `ready` successful sources out of `total`.
    pub fn from_counts(ready: usize, total: usize) -> Self {
        if ready == 0 {
            SourceStatus::Unavailable
        } else if ready == total {
            SourceStatus::Full
        } else {
            SourceStatus::Partial
        }
    }
}

/// Merged boards of every source that answered.
///
/// Serializes as `{arrivi, partenze}` for debug output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateSnapshot {
    #[serde(rename = "arrivi")]
    pub arrivals: Vec<TrainEvent>,

    #[serde(rename = "partenze")]
    pub departures: Vec<TrainEvent>,

    #[serde(skip)]
    pub source_status: SourceStatus,
}

impl AggregateSnapshot {
    /// Merge outcomes in source order.
    pub fn from_outcomes(outcomes: Vec<SourceOutcome>) -> Self {
        let total = outcomes.len();
        let ready = outcomes.iter().filter(|o| o.is_ready()).count();
        let mut arrivals = Vec::new();
        let mut departures = Vec::new();

        for outcome in outcomes {
            if let SourceOutcome::Ready(snapshot) = outcome {
                arrivals.extend(snapshot.arrivals);
                departures.extend(snapshot.departures);
            }
        }

        Self {
            arrivals,
            departures,
            source_status: SourceStatus::from_counts(ready, total),
        }
    }

    /// All events, arrivals first.
    pub fn events(&self) -> impl Iterator<Item = &TrainEvent> {
        self.arrivals.iter().chain(self.departures.iter())
    }
}

/// Fetch every station concurrently and merge what answered.
pub async fn aggregate<F: StationFeed>(
    feed: &F,
    stations: &[StationId],
    per_source_timeout: Duration,
) -> AggregateSnapshot {
    let outcomes = join_all(
        stations
            .iter()
            .map(|station| fetch_source(feed, station, per_source_timeout)),
    )
    .await;

    AggregateSnapshot::from_outcomes(outcomes)
}

/// Outcome of one full cycle.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub snapshot: AggregateSnapshot,

    /// `None` when no source answered; the calculator is not run.
    pub status: Option<CrossingStatus>,
}

/// A configured set of stations, a feed to read them from, and the
/// classifier to apply to the merged result.
#[derive(Debug)]
pub struct Aggregator<F> {
    feed: F,
    stations: Vec<StationId>,
    per_source_timeout: Duration,
    calculator: StatusCalculator,
}

impl<F: StationFeed> Aggregator<F> {
    /// Create an aggregator over the given stations.
    pub fn new(
        feed: F,
        stations: Vec<StationId>,
        per_source_timeout: Duration,
        calculator: StatusCalculator,
    ) -> Self {
        Self {
            feed,
            stations,
            per_source_timeout,
            calculator,
        }
    }

    /// Stations polled each cycle.
    pub fn stations(&self) -> &[StationId] {
        &self.stations
    }

    /// Fetch and merge all sources.
    pub async fn aggregate(&self) -> AggregateSnapshot {
        aggregate(&self.feed, &self.stations, self.per_source_timeout).await
    }

    /// Fetch and merge all sources, then classify.
    ///
    /// `clock` is read once every fetch has settled, so the reference
    /// instant reflects when the boards were actually received.
    pub async fn evaluate<C>(&self, clock: C) -> Evaluation
    where
        C: FnOnce() -> DateTime<Utc>,
    {
        let snapshot = self.aggregate().await;
        let now = clock();

        let status = match snapshot.source_status {
            SourceStatus::Unavailable => None,
            _ => Some(self.calculator.calculate(snapshot.events(), now)),
        };

        info!(
            source_status = ?snapshot.source_status,
            events = snapshot.arrivals.len() + snapshot.departures.len(),
            state = ?status.as_ref().map(|s| s.state),
            "evaluated crossing"
        );

        Evaluation { snapshot, status }
    }
}
