//! Station feed error types.

/// Errors from fetching a station feed.
///
/// None of these escape an aggregation cycle: the fetcher logs them and
/// reports the source as unavailable.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// HTTP request failed (connection refused, reset, DNS, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Feed answered with a non-success status
    #[error("feed returned status {status}")]
    Api { status: u16 },

    /// Body was not valid JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Client could not be built from its configuration
    #[error("invalid feed configuration: {message}")]
    Config { message: String },

    /// Mock feed has no board for this station
    #[error("no mock data for station {station}")]
    MissingMockData { station: String },

    /// Mock data directory could not be loaded
    #[error("mock data error: {message}")]
    MockData { message: String },
}
