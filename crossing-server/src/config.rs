//! Server configuration, read from `CROSSING_*` environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;

use crate::domain::{InvalidStationId, StationId};
use crate::feed::DEFAULT_BASE_URL;
use crate::status::{InvalidWindows, WindowConfig};

/// Stations polled when none are configured.
pub const DEFAULT_STATIONS: &str = "S01145,S01144";

/// Per-source fetch budget when none is configured.
pub const DEFAULT_SOURCE_TIMEOUT_MS: u64 = 6500;

/// Listen address when none is configured.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Errors in server configuration. Only raised at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("CROSSING_STATIONS: {0}")]
    InvalidStation(#[from] InvalidStationId),

    #[error("CROSSING_STATIONS: no stations configured")]
    EmptyStations,

    #[error("{var}: expected a non-negative integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("CROSSING_SOURCE_TIMEOUT_MS: timeout must be greater than zero")]
    ZeroTimeout,

    #[error("CROSSING_TIMEZONE: unknown timezone {0:?}")]
    InvalidTimezone(String),

    #[error(transparent)]
    InvalidWindows(#[from] InvalidWindows),

    #[error("CROSSING_BIND_ADDR: invalid address {0:?}")]
    InvalidAddress(String),
}

/// Where station boards come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    /// The live feed at this URL
    Http { base_url: String },
    /// Sample boards loaded from a directory
    Mock { data_dir: PathBuf },
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub stations: Vec<StationId>,
    pub feed: FeedSource,
    pub source_timeout: Duration,
    pub windows: WindowConfig,
    pub bind_addr: SocketAddr,

    /// Include the merged boards in every response.
    pub include_raw: bool,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`. Unset and blank variables take
    /// their defaults.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let stations = StationId::parse_list(
            var("CROSSING_STATIONS").as_deref().unwrap_or(DEFAULT_STATIONS),
        )?;
        if stations.is_empty() {
            return Err(ConfigError::EmptyStations);
        }

        let feed = match var("CROSSING_MOCK_DIR") {
            Some(dir) => FeedSource::Mock {
                data_dir: PathBuf::from(dir),
            },
            None => FeedSource::Http {
                base_url: var("CROSSING_FEED_URL")
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            },
        };

        let timeout_ms = number(
            "CROSSING_SOURCE_TIMEOUT_MS",
            var("CROSSING_SOURCE_TIMEOUT_MS"),
            DEFAULT_SOURCE_TIMEOUT_MS,
        )?;
        if timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let defaults = WindowConfig::default();
        let timezone = match var("CROSSING_TIMEZONE") {
            Some(name) => name
                .trim()
                .parse::<Tz>()
                .map_err(|_| ConfigError::InvalidTimezone(name))?,
            None => defaults.timezone,
        };
        let windows = WindowConfig::new(
            minutes("CROSSING_LOOKAHEAD_MINS", &var, defaults.lookahead_mins)?,
            minutes("CROSSING_GRACE_MINS", &var, defaults.grace_mins)?,
            minutes("CROSSING_CLOSED_MINS", &var, defaults.closed_mins)?,
            minutes("CROSSING_WARNING_MINS", &var, defaults.warning_mins)?,
            timezone,
        )?;

        let bind = var("CROSSING_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(bind.clone()))?;

        let include_raw = var("CROSSING_DEBUG_RAW").is_some_and(|v| is_truthy(&v));

        Ok(Self {
            stations,
            feed,
            source_timeout: Duration::from_millis(timeout_ms),
            windows,
            bind_addr,
            include_raw,
        })
    }
}

fn number(var: &'static str, value: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match value {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { var, value: v }),
        None => Ok(default),
    }
}

fn minutes<V>(name: &'static str, var: &V, default: i64) -> Result<i64, ConfigError>
where
    V: Fn(&str) -> Option<String>,
{
    let default = u64::try_from(default).unwrap_or_default();
    let value = number(name, var(name), default)?;
    i64::try_from(value).map_err(|_| ConfigError::InvalidNumber {
        var: name,
        value: value.to_string(),
    })
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]).unwrap();

        let codes: Vec<_> = config.stations.iter().map(|s| s.as_str()).collect();
        assert_eq!(codes, vec!["S01145", "S01144"]);
        assert_eq!(
            config.feed,
            FeedSource::Http {
                base_url: DEFAULT_BASE_URL.to_string()
            }
        );
        assert_eq!(config.source_timeout, Duration::from_millis(6500));
        assert_eq!(config.windows, WindowConfig::default());
        assert_eq!(config.bind_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert!(!config.include_raw);
    }

    #[test]
    fn overrides() {
        let config = load(&[
            ("CROSSING_STATIONS", " s1 , S2 "),
            ("CROSSING_FEED_URL", "http://localhost:9000/dati"),
            ("CROSSING_SOURCE_TIMEOUT_MS", "250"),
            ("CROSSING_LOOKAHEAD_MINS", "60"),
            ("CROSSING_GRACE_MINS", "5"),
            ("CROSSING_CLOSED_MINS", "5"),
            ("CROSSING_WARNING_MINS", "12"),
            ("CROSSING_TIMEZONE", "Europe/London"),
            ("CROSSING_BIND_ADDR", "0.0.0.0:8080"),
            ("CROSSING_DEBUG_RAW", "true"),
        ])
        .unwrap();

        let codes: Vec<_> = config.stations.iter().map(|s| s.as_str()).collect();
        assert_eq!(codes, vec!["s1", "S2"]);
        assert_eq!(
            config.feed,
            FeedSource::Http {
                base_url: "http://localhost:9000/dati".to_string()
            }
        );
        assert_eq!(config.source_timeout, Duration::from_millis(250));
        assert_eq!(config.windows.lookahead_mins, 60);
        assert_eq!(config.windows.grace_mins, 5);
        assert_eq!(config.windows.closed_mins, 5);
        assert_eq!(config.windows.warning_mins, 12);
        assert_eq!(config.windows.timezone, chrono_tz::Europe::London);
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert!(config.include_raw);
    }

    #[test]
    fn mock_dir_takes_precedence_over_feed_url() {
        let config = load(&[
            ("CROSSING_MOCK_DIR", "/tmp/boards"),
            ("CROSSING_FEED_URL", "http://localhost:9000/dati"),
        ])
        .unwrap();

        assert_eq!(
            config.feed,
            FeedSource::Mock {
                data_dir: PathBuf::from("/tmp/boards")
            }
        );
    }

    #[test]
    fn blank_values_use_defaults() {
        let config = load(&[("CROSSING_STATIONS", "  "), ("CROSSING_TIMEZONE", "")]).unwrap();
        assert_eq!(config.stations.len(), 2);
        assert_eq!(config.windows.timezone, chrono_tz::Europe::Rome);
    }

    #[test]
    fn debug_raw_flag_values() {
        for value in ["1", "yes", "ON", "True"] {
            assert!(load(&[("CROSSING_DEBUG_RAW", value)]).unwrap().include_raw);
        }
        for value in ["0", "false", "no"] {
            assert!(!load(&[("CROSSING_DEBUG_RAW", value)]).unwrap().include_raw);
        }
    }

    #[test]
    fn rejects_invalid_station() {
        let err = load(&[("CROSSING_STATIONS", "S01145,S-1")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidStation(_)));
    }

    #[test]
    fn rejects_empty_station_list() {
        let err = load(&[("CROSSING_STATIONS", ",")]).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyStations));
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = load(&[("CROSSING_SOURCE_TIMEOUT_MS", "soon")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidNumber {
                var: "CROSSING_SOURCE_TIMEOUT_MS",
                ..
            }
        ));

        let err = load(&[("CROSSING_GRACE_MINS", "-1")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidNumber {
                var: "CROSSING_GRACE_MINS",
                ..
            }
        ));
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = load(&[("CROSSING_SOURCE_TIMEOUT_MS", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroTimeout));

        let config = load(&[("CROSSING_SOURCE_TIMEOUT_MS", "1")]).unwrap();
        assert_eq!(config.source_timeout, Duration::from_millis(1));
    }

    #[test]
    fn rejects_overlapping_windows() {
        let err = load(&[("CROSSING_CLOSED_MINS", "7")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWindows(_)));
    }

    #[test]
    fn rejects_unknown_timezone() {
        let err = load(&[("CROSSING_TIMEZONE", "Mars/Olympus")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimezone(_)));
    }

    #[test]
    fn rejects_bad_bind_address() {
        let err = load(&[("CROSSING_BIND_ADDR", "localhost")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAddress(_)));
    }
}
