//! Configuration management for signaltrail.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.
//!
//! Test overrides for the signal source and the geolocation resolver live
//! here rather than in process-wide mutable state: the harness (or a user
//! simulating conditions) sets them in the config, and the runtime injects
//! fixed implementations at construction time.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "signaltrail";

/// Default route log file name.
const ROUTE_LOG_FILE_NAME: &str = "route.csv";

/// Default IP geolocation endpoint.
const DEFAULT_GEO_ENDPOINT: &str = "http://ip-api.com/json";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `SIGNALTRAIL_`, sections
///    separated by double underscores: `SIGNALTRAIL_SIGNAL__POLL_INTERVAL_MS`)
/// 2. TOML config file at `~/.config/signaltrail/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Signal polling configuration.
    pub signal: SignalConfig,
    /// Geolocation configuration.
    pub geo: GeoConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the route log CSV file.
    /// Defaults to `~/.local/share/signaltrail/route.csv`
    pub route_log_path: Option<PathBuf>,
}

/// Signal-polling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Interval between Wi-Fi signal polls in milliseconds.
    pub poll_interval_ms: u64,
    /// Fixed quality percentage (0-100) used instead of the OS query.
    /// When set, samples carry no network identity (simulated signal).
    pub quality_override: Option<u8>,
}

/// Geolocation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoConfig {
    /// URL of the IP geolocation endpoint.
    pub endpoint: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Delay between a connect trigger and the geolocation lookup,
    /// letting the network stack settle, in milliseconds.
    pub settle_delay_ms: u64,
    /// Fixed location used instead of the real endpoint.
    pub fix_override: Option<FixOverride>,
}

/// A fixed geolocation used in place of the real resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixOverride {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// City name.
    pub city: String,
    /// Region or state name.
    pub region: String,
    /// Country name.
    pub country: String,
}

impl Default for FixOverride {
    fn default() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            city: String::new(),
            region: String::new(),
            country: String::new(),
        }
    }
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 3000,
            quality_override: None,
        }
    }
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GEO_ENDPOINT.to_string(),
            timeout_secs: 5,
            settle_delay_ms: 2000,
            fix_override: None,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `SIGNALTRAIL_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("SIGNALTRAIL_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.signal.poll_interval_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "poll_interval_ms must be greater than 0".to_string(),
            });
        }

        if let Some(quality) = self.signal.quality_override {
            if quality > 100 {
                return Err(Error::ConfigValidation {
                    message: format!("quality_override ({quality}) must be at most 100"),
                });
            }
        }

        if self.geo.timeout_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "timeout_secs must be greater than 0".to_string(),
            });
        }

        if self.geo.endpoint.is_empty() {
            return Err(Error::ConfigValidation {
                message: "geo endpoint must not be empty".to_string(),
            });
        }

        if let Some(fix) = &self.geo.fix_override {
            if !fix.latitude.is_finite() || fix.latitude.abs() > 90.0 {
                return Err(Error::ConfigValidation {
                    message: format!("fix_override latitude ({}) out of range", fix.latitude),
                });
            }
            if !fix.longitude.is_finite() || fix.longitude.abs() > 180.0 {
                return Err(Error::ConfigValidation {
                    message: format!("fix_override longitude ({}) out of range", fix.longitude),
                });
            }
        }

        Ok(())
    }

    /// Get the route log path, resolving defaults if not set.
    #[must_use]
    pub fn route_log_path(&self) -> PathBuf {
        self.storage
            .route_log_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(ROUTE_LOG_FILE_NAME))
    }

    /// Get the poll interval as a Duration.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.signal.poll_interval_ms)
    }

    /// Get the settle delay as a Duration.
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.geo.settle_delay_ms)
    }

    /// Get the geolocation request timeout as a Duration.
    #[must_use]
    pub fn geo_timeout(&self) -> Duration {
        Duration::from_secs(self.geo.timeout_secs)
    }
}
