//! Runtime configuration read from the environment (and `.env`).

use std::path::PathBuf;

use thiserror::Error;

use crate::api::market::MarketDataClient;

pub const API_URL_VAR: &str = "REVANALYTICA_API_URL";
pub const CHART_PATH_VAR: &str = "REVANALYTICA_CHART_PATH";
pub const CHART_WIDTH_VAR: &str = "REVANALYTICA_CHART_WIDTH";
pub const CHART_HEIGHT_VAR: &str = "REVANALYTICA_CHART_HEIGHT";

const DEFAULT_CHART_PATH: &str = "market_overview.png";
const DEFAULT_CHART_WIDTH: u32 = 1280;
const DEFAULT_CHART_HEIGHT: u32 = 720;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{key} must be a positive integer, got '{value}'")]
    InvalidDimension { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub chart_path: PathBuf,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; unset or blank keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_url = get(API_URL_VAR).unwrap_or_else(|| MarketDataClient::DEFAULT_BASE_URL.to_string());
        let chart_path = get(CHART_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CHART_PATH));
        let chart_width = parse_dimension(CHART_WIDTH_VAR, get(CHART_WIDTH_VAR), DEFAULT_CHART_WIDTH)?;
        let chart_height = parse_dimension(CHART_HEIGHT_VAR, get(CHART_HEIGHT_VAR), DEFAULT_CHART_HEIGHT)?;

        Ok(Config {
            api_url,
            chart_path,
            chart_width,
            chart_height,
        })
    }
}

fn parse_dimension(key: &'static str, value: Option<String>, default: u32) -> Result<u32, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => match raw.parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ConfigError::InvalidDimension { key, value: raw }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_url, "https://www.mfamanagement.co.in");
        assert_eq!(config.chart_path, PathBuf::from("market_overview.png"));
        assert_eq!((config.chart_width, config.chart_height), (1280, 720));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            (API_URL_VAR, "http://localhost:5000"),
            (CHART_PATH_VAR, "/tmp/chart.png"),
            (CHART_WIDTH_VAR, " 800 "),
            (CHART_HEIGHT_VAR, "600"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "http://localhost:5000");
        assert_eq!(config.chart_path, PathBuf::from("/tmp/chart.png"));
        assert_eq!((config.chart_width, config.chart_height), (800, 600));
    }

    #[test]
    fn test_blank_value_uses_default() {
        let config = Config::from_lookup(lookup(&[(CHART_WIDTH_VAR, "  ")])).unwrap();
        assert_eq!(config.chart_width, 1280);
    }

    #[test]
    fn test_invalid_dimension() {
        let err = Config::from_lookup(lookup(&[(CHART_HEIGHT_VAR, "0")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidDimension {
                key: CHART_HEIGHT_VAR,
                value: "0".to_string()
            }
        );

        assert!(Config::from_lookup(lookup(&[(CHART_WIDTH_VAR, "wide")])).is_err());
    }
}
