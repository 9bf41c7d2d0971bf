use log::warn;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, SurveyError};
use crate::feed::MAX_SNAPSHOT;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind: SocketAddr,
    pub postcode_table: Option<PathBuf>,
    pub snapshot_limit: u32,
    pub feed_interval: Duration,
    pub session_idle: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url =
            var("DATABASE_URL").unwrap_or_else(|| "sqlite:policy_survey.db".to_string());

        let bind_raw = var("SURVEY_HTTP_BIND").unwrap_or_else(|| "127.0.0.1:8080".to_string());
        let bind = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| SurveyError::config(format!("SURVEY_HTTP_BIND {:?}: {}", bind_raw, e)))?;

        let postcode_table = var("POSTCODE_TABLE_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let snapshot_limit = bounded(&var, "SNAPSHOT_LIMIT", 1, MAX_SNAPSHOT as u64, MAX_SNAPSHOT as u64) as u32;
        let feed_interval = Duration::from_secs(bounded(&var, "FEED_INTERVAL_SECONDS", 1, 300, 5));
        let session_idle = Duration::from_secs(60 * bounded(&var, "SESSION_IDLE_MINUTES", 1, 1440, 30));

        Ok(Self {
            database_url,
            bind,
            postcode_table,
            snapshot_limit,
            feed_interval,
            session_idle,
        })
    }
}

// Out-of-range or unparsable values fall back to the default.
fn bounded(var: &impl Fn(&str) -> Option<String>, key: &str, min: u64, max: u64, default: u64) -> u64 {
    match var(key) {
        None => default,
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(v) if (min..=max).contains(&v) => v,
            _ => {
                warn!("Ignoring {}={:?}, expected {}..={}; using {}", key, raw, min, max, default);
                default
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.database_url, "sqlite:policy_survey.db");
        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.postcode_table, None);
        assert_eq!(config.snapshot_limit, 1000);
        assert_eq!(config.feed_interval, Duration::from_secs(5));
        assert_eq!(config.session_idle, Duration::from_secs(30 * 60));
    }

    #[test]
    fn session_idle_is_in_minutes() {
        let config = load(&[("SESSION_IDLE_MINUTES", "5")]).unwrap();
        assert_eq!(config.session_idle, Duration::from_secs(300));
        let config = load(&[("SESSION_IDLE_MINUTES", "0")]).unwrap();
        assert_eq!(config.session_idle, Duration::from_secs(30 * 60));
    }

    #[test]
    fn out_of_range_values_fall_back() {
        let config = load(&[("SNAPSHOT_LIMIT", "5000"), ("FEED_INTERVAL_SECONDS", "zero")]).unwrap();
        assert_eq!(config.snapshot_limit, 1000);
        assert_eq!(config.feed_interval, Duration::from_secs(5));

        let config = load(&[("SNAPSHOT_LIMIT", "250"), ("POSTCODE_TABLE_PATH", "/data/postcodes.json")]).unwrap();
        assert_eq!(config.snapshot_limit, 250);
        assert_eq!(config.postcode_table, Some(PathBuf::from("/data/postcodes.json")));
    }

    #[test]
    fn bad_bind_address_is_an_error() {
        assert!(matches!(
            load(&[("SURVEY_HTTP_BIND", "localhost")]),
            Err(SurveyError::Config(_))
        ));
    }
}
