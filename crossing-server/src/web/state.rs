//! Application state for the web layer.

use std::sync::Arc;

use crate::aggregate::Aggregator;
use crate::feed::Feed;

/// Shared application state.
///
/// Immutable after startup; cloned into every request.
#[derive(Clone)]
pub struct AppState {
    /// Station fan-out and classifier
    pub aggregator: Arc<Aggregator<Feed>>,

    /// Attach the merged boards to every response
    pub include_raw: bool,
}

impl AppState {
    /// Create a new app state.
    pub fn new(aggregator: Aggregator<Feed>, include_raw: bool) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            include_raw,
        }
    }
}
