//! Station feed access.
//!
//! Each station publishes a realtime board of arrivals and departures:
//!
//! ```text
//! GET {base}?codSito=S01145&type=T
//! {"arrivi": [...], "partenze": [...]}
//! ```
//!
//! Record field names and time encodings vary, so payloads are decoded as
//! untyped JSON and normalized record by record (see [`normalize_payload`]).

mod client;
mod error;
mod mock;
mod normalize;

use std::future::Future;

use crate::domain::StationId;

pub use client::{DEFAULT_BASE_URL, FeedClient, FeedConfig};
pub use error::FeedError;
pub use mock::MockFeed;
pub use normalize::{SourceSnapshot, normalize_payload};

/// Something that can produce one station's board.
///
/// Implementations perform a single attempt with no retry and no timeout;
/// callers bound the returned future.
pub trait StationFeed: Send + Sync {
    fn fetch_board(
        &self,
        station: &StationId,
    ) -> impl Future<Output = Result<SourceSnapshot, FeedError>> + Send;
}

/// The feed the server runs against, chosen at startup.
#[derive(Debug, Clone)]
pub enum Feed {
    Http(FeedClient),
    Mock(MockFeed),
}

impl StationFeed for Feed {
    async fn fetch_board(&self, station: &StationId) -> Result<SourceSnapshot, FeedError> {
        match self {
            Feed::Http(client) => client.fetch_board(station).await,
            Feed::Mock(mock) => mock.fetch_board(station).await,
        }
    }
}
