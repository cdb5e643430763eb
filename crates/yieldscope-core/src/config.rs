//! Configuration loading and typed config structures for Yieldscope.
//!
//! The canonical configuration lives in `yieldscope.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads the file with defaults for
//! every field.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level application configuration.
///
/// Mirrors the structure of `yieldscope.yaml`. All fields have defaults,
/// so an absent or empty file yields a runnable configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppConfig {
    /// Dataset file paths and the crops-of-interest allow-list.
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Timeline animation settings.
    #[serde(default)]
    pub timeline: TimelineConfig,

    /// HTTP server bind settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for the two data paths:
    /// - `YIELDSCOPE_DATA_CSV` overrides `dataset.csv_path`
    /// - `YIELDSCOPE_WORLD_GEOJSON` overrides `dataset.world_geojson_path`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.dataset.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.dataset.apply_env_overrides();
        Ok(config)
    }
}

/// Dataset file locations and load-time filtering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatasetConfig {
    /// Path to the crop observation CSV.
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,

    /// Path to the GeoJSON file of country polygons for the maps.
    #[serde(default = "default_world_geojson_path")]
    pub world_geojson_path: PathBuf,

    /// Crops to keep at load time; empty keeps every crop.
    #[serde(default)]
    pub crops_of_interest: Vec<String>,
}

impl DatasetConfig {
    /// Override data paths with environment variables when set.
    ///
    /// This lets a deployment point at other files without modifying the
    /// YAML config file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("YIELDSCOPE_DATA_CSV") {
            self.csv_path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("YIELDSCOPE_WORLD_GEOJSON") {
            self.world_geojson_path = PathBuf::from(val);
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
            world_geojson_path: default_world_geojson_path(),
            crops_of_interest: Vec::new(),
        }
    }
}

/// Timeline animation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimelineConfig {
    /// Milliseconds between interval ticks. Fixed for the process
    /// lifetime; the value is served to clients, never adjusted at
    /// runtime.
    #[serde(default = "default_period_ms")]
    pub period_ms: u64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            period_ms: default_period_ms(),
        }
    }
}

/// HTTP server bind settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Bind host.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_csv_path() -> PathBuf {
    PathBuf::from("data/final_crop_data.csv")
}

fn default_world_geojson_path() -> PathBuf {
    PathBuf::from("assets/world_countries.geojson")
}

const fn default_period_ms() -> u64 {
    1000
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.timeline.period_ms, 1000);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
        assert!(config.dataset.crops_of_interest.is_empty());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
dataset:
  csv_path: "testdata/crops.csv"
  world_geojson_path: "testdata/world.geojson"
  crops_of_interest:
    - Wheat
    - Maize

timeline:
  period_ms: 500

server:
  host: "127.0.0.1"
  port: 9090

logging:
  level: "debug"
"#;
        let config = AppConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.dataset.csv_path, PathBuf::from("testdata/crops.csv"));
        assert_eq!(config.dataset.crops_of_interest, ["Wheat", "Maize"]);
        assert_eq!(config.timeline.period_ms, 500);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "timeline:\n  period_ms: 250\n";
        let config = AppConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        // Period is overridden
        assert_eq!(config.timeline.period_ms, 250);
        // Everything else uses defaults
        assert_eq!(config.server.port, 8080);
        assert_eq!(
            config.dataset.csv_path,
            PathBuf::from("data/final_crop_data.csv")
        );
    }

    #[test]
    fn parse_empty_yaml() {
        let yaml = "";
        let config = AppConfig::parse(yaml);
        assert!(config.is_ok());
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("yieldscope.yaml");
        if path.exists() {
            let config = AppConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
