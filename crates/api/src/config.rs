//! Service Configuration

use crate::error::ConfigError;
use inference_engine::{DatasetSources, ForestConfig};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::Level;

/// Prefix for environment overrides, e.g. `PRICER__SERVER__BIND_ADDR`
pub const ENV_PREFIX: &str = "PRICER";

/// Default config file name (extension resolved by the `config` crate)
pub const DEFAULT_CONFIG_FILE: &str = "pricer";

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: String,
    /// Allow cross-origin requests from any origin
    pub permissive_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            permissive_cors: false,
        }
    }
}

/// Top-level service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    /// Training dataset locations
    pub data: DatasetSources,
    /// Random forest hyperparameters
    pub forest: ForestConfig,
    /// Maximum log level (trace, debug, info, warn, error)
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Load from an optional file plus `PRICER__*` environment variables.
    ///
    /// An explicit `path` must exist; the default `pricer.*` file is optional.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let file = config::File::with_name(path.unwrap_or(DEFAULT_CONFIG_FILE))
            .required(path.is_some());

        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Parsed log level, `info` when unset
    pub fn log_level(&self) -> Result<Level, ConfigError> {
        match &self.log_level {
            None => Ok(Level::INFO),
            Some(level) => {
                Level::from_str(level).map_err(|_| ConfigError::InvalidLogLevel(level.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.forest.n_estimators, 100);
        assert_eq!(config.forest.random_state, 42);
        assert_eq!(config.log_level().unwrap(), Level::INFO);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("pricer-test-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
log_level = "debug"

[server]
bind_addr = "127.0.0.1:9000"

[data]
bikes_path = "/srv/bikes.csv"

[forest]
n_estimators = 12
"#
        )
        .unwrap();

        let config = AppConfig::load(path.to_str()).unwrap();
        assert_eq!(config.server.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.data.bikes_path.to_str(), Some("/srv/bikes.csv"));
        assert_eq!(config.data.cars_path.to_str(), Some("data/used_cars.csv"));
        assert_eq!(config.forest.n_estimators, 12);
        assert_eq!(config.forest.random_state, 42);
        assert_eq!(config.log_level().unwrap(), Level::DEBUG);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        assert!(AppConfig::load(Some("/nonexistent/pricer.toml")).is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let config = AppConfig {
            log_level: Some("loud".into()),
            ..Default::default()
        };
        assert!(matches!(
            config.log_level(),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }
}
