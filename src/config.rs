//! Planner configuration from environment.

use std::env;

use crate::http_sink::HttpSinkConfig;
use crate::models::{DEFAULT_SAFETY_MARGIN_RATIO, Depot};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a number, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub safety_margin_ratio: f64,
    pub hub: Depot,
    /// When unset, telemetry goes to stdout as JSON lines.
    pub telemetry_url: Option<String>,
    pub telemetry_timeout_secs: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            safety_margin_ratio: DEFAULT_SAFETY_MARGIN_RATIO,
            hub: Depot::new("GLS Hungary", 47.340793, 19.160145),
            telemetry_url: None,
            telemetry_timeout_secs: 10,
        }
    }
}

impl PlannerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; missing keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let hub_name = lookup("PLANNER_HUB_NAME").unwrap_or(defaults.hub.name);
        let hub_lat = number(&lookup, "PLANNER_HUB_LAT")?.unwrap_or(defaults.hub.coordinate.lat);
        let hub_lon = number(&lookup, "PLANNER_HUB_LON")?.unwrap_or(defaults.hub.coordinate.lon);

        Ok(Self {
            safety_margin_ratio: number(&lookup, "PLANNER_SAFETY_MARGIN")?
                .unwrap_or(defaults.safety_margin_ratio),
            hub: Depot::new(hub_name, hub_lat, hub_lon),
            telemetry_url: lookup("TELEMETRY_URL").filter(|url| !url.trim().is_empty()),
            telemetry_timeout_secs: number(&lookup, "TELEMETRY_TIMEOUT_SECS")?
                .unwrap_or(defaults.telemetry_timeout_secs),
        })
    }

    pub fn http_sink(&self) -> Option<HttpSinkConfig> {
        self.telemetry_url.as_ref().map(|url| HttpSinkConfig {
            url: url.clone(),
            timeout_secs: self.telemetry_timeout_secs,
        })
    }
}

fn number<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
    }
}
