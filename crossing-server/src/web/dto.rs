//! Response bodies for the crossing status API.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::aggregate::{AggregateSnapshot, Evaluation, SourceStatus};
use crate::status::{CrossingState, NextTrainInfo};

/// Message when no station feed answered.
pub const MESSAGE_UNAVAILABLE: &str = "Dati treni non disponibili al momento.";

/// Message when the handler itself failed.
pub const MESSAGE_INTERNAL_FAILURE: &str = "Impossibile recuperare i dati.";

/// Appended to the message when only some feeds answered.
pub const PARTIAL_SUFFIX: &str = " (dati parziali)";

/// Crossing state as reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    Open,
    Closed,
    Warning,
    /// No data to base an estimate on
    Unknown,
}

impl From<CrossingState> for ResponseStatus {
    fn from(state: CrossingState) -> Self {
        match state {
            CrossingState::Open => ResponseStatus::Open,
            CrossingState::Closed => ResponseStatus::Closed,
            CrossingState::Warning => ResponseStatus::Warning,
        }
    }
}

/// Body of `GET /api/crossing-status`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossingStatusResponse {
    pub status: ResponseStatus,
    pub message: String,
    pub next_train: Option<NextTrainInfo>,
    pub source_status: SourceStatus,

    /// RFC 3339, UTC, millisecond precision
    pub last_updated: String,

    /// Set when the estimate should not be taken at face value: no train
    /// was found, or some feeds did not answer.
    pub data_uncertain: bool,

    /// Merged boards, only when debug output is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<AggregateSnapshot>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CrossingStatusResponse {
    /// Build the response for one evaluation cycle.
    pub fn from_evaluation(evaluation: Evaluation, now: DateTime<Utc>, include_raw: bool) -> Self {
        let Evaluation { snapshot, status } = evaluation;
        let source_status = snapshot.source_status;
        let raw = include_raw.then_some(snapshot);

        let Some(status) = status else {
            return Self {
                status: ResponseStatus::Unknown,
                message: MESSAGE_UNAVAILABLE.to_string(),
                next_train: None,
                source_status,
                last_updated: timestamp(now),
                data_uncertain: true,
                raw,
                error: None,
            };
        };

        let mut message = status.message;
        if source_status == SourceStatus::Partial {
            message.push_str(PARTIAL_SUFFIX);
        }

        Self {
            status: status.state.into(),
            message,
            data_uncertain: status.next_train.is_none() || source_status != SourceStatus::Full,
            next_train: status.next_train,
            source_status,
            last_updated: timestamp(now),
            raw,
            error: None,
        }
    }

    /// Build the response for a failure inside the handler.
    pub fn internal_failure(detail: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            status: ResponseStatus::Unknown,
            message: MESSAGE_INTERNAL_FAILURE.to_string(),
            next_train: None,
            source_status: SourceStatus::Unavailable,
            last_updated: timestamp(now),
            data_uncertain: true,
            raw: None,
            error: Some(detail.into()),
        }
    }

    /// Whether the response reports a total outage.
    pub fn is_unavailable(&self) -> bool {
        self.source_status == SourceStatus::Unavailable
    }
}

fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}
