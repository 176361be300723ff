use crate::search::SearchConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Index document location
    #[serde(default)]
    pub index: IndexConfig,

    /// Matcher and pagination tuning
    #[serde(default)]
    pub search: SearchConfig,

    /// Curated feature documents location
    #[serde(default)]
    pub features: FeaturesConfig,

    /// Index producer paths
    #[serde(default)]
    pub producer: ProducerConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// The file at `$CONFIG_PATH` (default `config/local.toml`) is optional.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/local.toml".to_string());
        Self::build(&config_path, false)
    }

    /// Load with an explicit override file, which must exist
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::build(config_path, true)
    }

    fn build(config_path: &str, required: bool) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file
            .add_source(config::File::with_name(config_path).required(required))
            // Override with environment variables (prefix: DJADB_)
            .add_source(
                config::Environment::with_prefix("DJADB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// File path or http(s) URL of the index document
    #[serde(default = "default_index_location")]
    pub location: String,

    /// HTTP fetch timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            location: default_index_location(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturesConfig {
    /// Directory or http(s) base URL holding the feature documents
    #[serde(default = "default_features_location")]
    pub location: String,

    /// HTTP fetch timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            location: default_features_location(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProducerConfig {
    /// Directory holding works.json and circles.json
    #[serde(default = "default_catalog_dir")]
    pub catalog_dir: PathBuf,

    /// Where the generated index document is written
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            catalog_dir: default_catalog_dir(),
            output: default_output(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,

    /// Enable Prometheus metrics
    #[serde(default = "default_true")]
    pub prometheus_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
            prometheus_enabled: default_true(),
        }
    }
}

// Default value functions
fn default_index_location() -> String {
    "public/data/search-index.json".to_string()
}

fn default_features_location() -> String {
    "data".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_catalog_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_output() -> PathBuf {
    PathBuf::from("public/data/search-index.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        assert_eq!(default_timeout(), 10);
        assert_eq!(default_log_level(), "info");
        assert!(default_true());
    }

    #[test]
    fn test_embedded_defaults_deserialize() {
        let config = Config::build("/nonexistent/djadb-config", false).unwrap();
        assert_eq!(config.index.location, "public/data/search-index.json");
        assert_eq!(config.search.threshold, 0.4);
        assert_eq!(config.search.initial_page_size, 50);
        assert_eq!(config.search.max_display_results, 300);
        assert_eq!(config.producer.catalog_dir, PathBuf::from("data"));
        assert_eq!(config.features.location, "data");
        assert!(config.observability.prometheus_enabled);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        assert!(Config::load_from(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("override.toml");
        std::fs::write(
            &path,
            "[index]\nlocation = \"https://example.com/search-index.json\"\n\n[search]\nthreshold = 0.2\n",
        )
        .unwrap();

        let config = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.index.location, "https://example.com/search-index.json");
        assert_eq!(config.index.timeout_secs, 10);
        assert_eq!(config.search.threshold, 0.2);
    }
}
