use std::process::ExitCode;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crossing_server::aggregate::Aggregator;
use crossing_server::config::{AppConfig, FeedSource};
use crossing_server::feed::{Feed, FeedClient, FeedConfig, MockFeed};
use crossing_server::status::StatusCalculator;
use crossing_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("crossing_server=info,info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    // Create the station feed
    let feed = match &config.feed {
        FeedSource::Http { base_url } => {
            FeedClient::new(FeedConfig::new().with_base_url(base_url)).map(Feed::Http)
        }
        FeedSource::Mock { data_dir } => MockFeed::from_dir(data_dir).map(|mock| {
            let available = mock.available_stations();
            info!(dir = %data_dir.display(), stations = ?available, "using mock station boards");
            for station in config.stations.iter().filter(|s| !available.contains(s)) {
                warn!(%station, "no mock board for configured station");
            }
            Feed::Mock(mock)
        }),
    };
    let feed = match feed {
        Ok(feed) => feed,
        Err(e) => {
            error!(error = %e, "failed to create station feed");
            return ExitCode::FAILURE;
        }
    };

    let aggregator = Aggregator::new(
        feed,
        config.stations.clone(),
        config.source_timeout,
        StatusCalculator::new(config.windows.clone()),
    );
    info!(
        stations = ?aggregator.stations(),
        timeout_ms = config.source_timeout.as_millis() as u64,
        "polling stations"
    );
    let app = create_router(AppState::new(aggregator, config.include_raw));

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.bind_addr, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    info!(addr = %config.bind_addr, "crossing status server listening");
    info!("  GET  /health               - Health check");
    info!("  GET  /api/crossing-status  - Crossing status estimate");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
