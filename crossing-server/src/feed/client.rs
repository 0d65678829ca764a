//! Realtime station board HTTP client.

use reqwest::header::{ACCEPT, CACHE_CONTROL, HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;

use crate::domain::StationId;

use super::StationFeed;
use super::error::FeedError;
use super::normalize::{SourceSnapshot, normalize_payload};

/// Default base URL for the realtime board endpoint.
pub const DEFAULT_BASE_URL: &str = "https://eticket.ferrovienordbarese.it/b2c/json/realtime/dati";

/// User agent sent with every request.
const DEFAULT_USER_AGENT: &str = "BitontoCrossingMonitor/1.0";

/// Configuration for the feed client.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Board endpoint; the station code is passed as `codSito`
    pub base_url: String,
    /// Value of the User-Agent header
    pub user_agent: String,
}

impl FeedConfig {
    /// Create a config pointing at the production feed.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set a custom User-Agent.
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP client for per-station realtime boards.
///
/// Holds no timeout of its own: each fetch is bounded by the caller, so
/// dropping the returned future cancels only that request.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    base_url: String,
}

impl FeedClient {
    /// Create a new feed client with the given configuration.
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let agent = HeaderValue::from_str(&config.user_agent).map_err(|_| FeedError::Config {
            message: format!("invalid user agent: {:?}", config.user_agent),
        })?;
        headers.insert(USER_AGENT, agent);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Fetch a station board as undecoded JSON.
    pub async fn fetch_raw(&self, station: &StationId) -> Result<Value, FeedError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("codSito", station.as_str()), ("type", "T")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Api {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| FeedError::Json {
            message: e.to_string(),
        })
    }
}

impl StationFeed for FeedClient {
    async fn fetch_board(&self, station: &StationId) -> Result<SourceSnapshot, FeedError> {
        let payload = self.fetch_raw(station).await?;
        Ok(normalize_payload(&payload))
    }
}
