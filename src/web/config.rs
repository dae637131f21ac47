use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::enrich::EnrichOptions;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid timeout '{0}': {1}")]
    Timeout(String, String),
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub overpass: OverpassConfig,
    #[serde(default)]
    pub enrich: EnrichConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverpassConfig {
    #[serde(default = "default_overpass_url")]
    pub url: String,
    /// Per-request timeout, humantime syntax ("10s", "1m 30s").
    #[serde(default = "default_timeout")]
    pub timeout: String,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            url: default_overpass_url(),
            timeout: default_timeout(),
        }
    }
}

impl OverpassConfig {
    pub fn timeout_duration(&self) -> Result<Duration, ConfigError> {
        humantime::parse_duration(self.timeout.trim())
            .map_err(|e| ConfigError::Timeout(self.timeout.clone(), e.to_string()))
    }
}

fn default_overpass_url() -> String {
    "https://overpass-api.de/api/interpreter".to_string()
}

fn default_timeout() -> String {
    "10s".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnrichConfig {
    #[serde(default = "default_max_distance_m")]
    pub max_distance_m: f64,
    #[serde(default = "default_min_interval_km")]
    pub min_interval_km: f64,
    /// Recognized for compatibility; the sampling formula does not
    /// consume it.
    #[serde(default = "default_max_interval_km")]
    pub max_interval_km: f64,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            max_distance_m: default_max_distance_m(),
            min_interval_km: default_min_interval_km(),
            max_interval_km: default_max_interval_km(),
        }
    }
}

impl EnrichConfig {
    pub fn to_options(&self) -> EnrichOptions {
        EnrichOptions {
            max_distance_m: self.max_distance_m,
            min_interval_km: self.min_interval_km,
            max_interval_km: self.max_interval_km,
        }
    }
}

fn default_max_distance_m() -> f64 {
    1_000.0
}

fn default_min_interval_km() -> f64 {
    50.0
}

fn default_max_interval_km() -> f64 {
    80.0
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_all_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.web.bind, "0.0.0.0:8080");
        assert_eq!(config.enrich.min_interval_km, 50.0);
        assert_eq!(config.enrich.max_distance_m, 1_000.0);
        assert_eq!(
            config.overpass.timeout_duration().unwrap(),
            Duration::from_secs(10)
        );
    }

    #[test]
    fn partial_overrides_keep_remaining_defaults() {
        let yaml = "enrich:\n  min_interval_km: 40\noverpass:\n  timeout: 5s\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.enrich.min_interval_km, 40.0);
        assert_eq!(config.enrich.max_interval_km, 80.0);
        assert_eq!(
            config.overpass.timeout_duration().unwrap(),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn bad_timeout_is_a_config_error() {
        let config = OverpassConfig {
            url: default_overpass_url(),
            timeout: "soon".to_string(),
        };
        assert!(config.timeout_duration().is_err());
    }
}
