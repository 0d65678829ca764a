//! Single-source fetch under a timeout budget.

use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::StationId;
use crate::feed::{SourceSnapshot, StationFeed};

/// Result of fetching one source: a normalized board or nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    Ready(SourceSnapshot),
    Absent,
}

impl SourceOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, SourceOutcome::Ready(_))
    }
}

/// Fetch one station's board, giving up after `budget`.
///
/// Never fails: network errors, bad status codes, undecodable bodies and
/// timeouts are logged and reported as [`SourceOutcome::Absent`]. On timeout
/// the in-flight request is dropped; other fetches are unaffected.
#[tracing::instrument(skip_all, fields(station = %station))]
pub async fn fetch_source<F: StationFeed>(
    feed: &F,
    station: &StationId,
    budget: Duration,
) -> SourceOutcome {
    match tokio::time::timeout(budget, feed.fetch_board(station)).await {
        Ok(Ok(snapshot)) => {
            debug!(
                arrivals = snapshot.arrivals.len(),
                departures = snapshot.departures.len(),
                "source ready"
            );
            SourceOutcome::Ready(snapshot)
        }
        Ok(Err(e)) => {
            warn!(error = %e, "source unavailable");
            SourceOutcome::Absent
        }
        Err(_) => {
            warn!(budget_ms = budget.as_millis() as u64, "source timed out");
            SourceOutcome::Absent
        }
    }
}
