//! Mock feed for running without network access.
//!
//! Loads sample boards from JSON files and serves them as if they were live
//! responses. Payloads go through the same normalization as real ones.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::domain::StationId;

use super::StationFeed;
use super::error::FeedError;
use super::normalize::{SourceSnapshot, normalize_payload};

/// Feed that serves boards from memory, keyed by station.
#[derive(Debug, Clone, Default)]
pub struct MockFeed {
    boards: Arc<HashMap<StationId, Value>>,
}

impl MockFeed {
    /// Load boards from a directory.
    ///
    /// Expects files named `{station}.json` (e.g. `S01145.json`). Other files
    /// are ignored.
    pub fn from_dir(data_dir: impl AsRef<Path>) -> Result<Self, FeedError> {
        let data_dir = data_dir.as_ref();
        let mut boards = HashMap::new();

        let entries = std::fs::read_dir(data_dir).map_err(|e| FeedError::MockData {
            message: format!("failed to read {}: {}", data_dir.display(), e),
        })?;

        for entry in entries {
            let path = entry
                .map_err(|e| FeedError::MockData {
                    message: format!("failed to read directory entry: {}", e),
                })?
                .path();

            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| FeedError::MockData {
                    message: format!("invalid filename: {}", path.display()),
                })?;

            let station = StationId::parse(stem).map_err(|e| FeedError::MockData {
                message: format!("{}: {}", path.display(), e),
            })?;

            let json = std::fs::read_to_string(&path).map_err(|e| FeedError::MockData {
                message: format!("failed to read {}: {}", path.display(), e),
            })?;

            // Undecodable files behave like a feed returning garbage: skip
            // them at load time so the station reads as unavailable.
            match serde_json::from_str::<Value>(&json) {
                Ok(board) => {
                    boards.insert(station, board);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping undecodable mock board");
                }
            }
        }

        if boards.is_empty() {
            return Err(FeedError::MockData {
                message: format!("no mock board files found in {}", data_dir.display()),
            });
        }

        Ok(Self {
            boards: Arc::new(boards),
        })
    }

    /// Build a mock feed from in-memory payloads.
    pub fn from_boards(boards: impl IntoIterator<Item = (StationId, Value)>) -> Self {
        Self {
            boards: Arc::new(boards.into_iter().collect()),
        }
    }

    /// Stations with a loaded board.
    pub fn available_stations(&self) -> Vec<StationId> {
        let mut stations: Vec<_> = self.boards.keys().cloned().collect();
        stations.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        stations
    }
}

impl StationFeed for MockFeed {
    async fn fetch_board(&self, station: &StationId) -> Result<SourceSnapshot, FeedError> {
        let board = self
            .boards
            .get(station)
            .ok_or_else(|| FeedError::MissingMockData {
                station: station.to_string(),
            })?;

        Ok(normalize_payload(board))
    }
}
