use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    #[serde(default)]
    pub heatmap: HeatmapConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_folder")]
    pub folder: PathBuf,
    /// Age after which cached element sets are refetched.
    #[serde(default = "default_refresh_interval", deserialize_with = "humantime_duration")]
    pub refresh_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            folder: default_cache_folder(),
            refresh_interval: default_refresh_interval(),
        }
    }
}

fn default_cache_folder() -> PathBuf {
    PathBuf::from("tle-cache")
}

fn default_refresh_interval() -> Duration {
    Duration::from_secs(6 * 3600)
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout", deserialize_with = "humantime_duration")]
    pub timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://celestrak.org/NORAD/elements/gp.php".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(15)
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationConfig {
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
        }
    }
}

fn default_max_concurrency() -> usize {
    8
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeatmapConfig {
    #[serde(default = "default_point_spacing_km")]
    pub point_spacing_km: f64,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            point_spacing_km: default_point_spacing_km(),
        }
    }
}

fn default_point_spacing_km() -> f64 {
    300.0
}

fn humantime_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }
}
