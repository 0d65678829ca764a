//! Scripted feed for aggregation tests.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;

use crate::domain::StationId;
use crate::feed::{FeedError, SourceSnapshot, StationFeed, normalize_payload};

/// How a scripted station responds.
pub enum Script {
    /// Serve this payload after a delay
    Board { payload: Value, delay: Duration },
    /// Fail immediately, like a refused connection
    Fail,
    /// Never answer within any reasonable budget
    Hang,
}

impl Script {
    pub fn board(payload: Value) -> Self {
        Script::Board {
            payload,
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(payload: Value, delay: Duration) -> Self {
        Script::Board { payload, delay }
    }
}

/// Feed whose stations behave as scripted. Unknown stations fail.
#[derive(Default)]
pub struct ScriptedFeed {
    scripts: HashMap<StationId, Script>,
}

impl ScriptedFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, station: &str, script: Script) -> Self {
        self.scripts.insert(StationId::parse(station).unwrap(), script);
        self
    }
}

impl StationFeed for ScriptedFeed {
    async fn fetch_board(&self, station: &StationId) -> Result<SourceSnapshot, FeedError> {
        match self.scripts.get(station) {
            Some(Script::Board { payload, delay }) => {
                tokio::time::sleep(*delay).await;
                Ok(normalize_payload(payload))
            }
            Some(Script::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(FeedError::Api { status: 504 })
            }
            Some(Script::Fail) | None => Err(FeedError::Api { status: 503 }),
        }
    }
}
