//! Configuration loading for Verdant services
//!
//! Settings sources priority:
//! 1. Command-line arguments (applied by the binary on top of the loaded config)
//! 2. Environment variables (`VERDANT_CONFIG` for the file location)
//! 3. TOML configuration file (`~/.config/verdant/config.toml` or `/etc/verdant/config.toml`)
//! 4. Built-in defaults (code constants)
//!
//! All settings are bootstrap-only: the service must restart to pick up changes.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Service configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct VerdantConfig {
    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Device identifier attached to uploaded cycles
    ///
    /// Explicitly configured rather than read from process-global state so
    /// aggregation and upload stay pure with respect to caller context.
    #[serde(default = "default_device_id")]
    pub device_id: String,

    /// Seconds between aggregation cycles
    #[serde(default = "default_cycle_period_secs")]
    pub cycle_period_secs: u64,

    /// Per-source fetch deadline in seconds
    #[serde(default = "default_source_timeout_secs")]
    pub source_timeout_secs: u64,

    /// Green-space search radius in meters
    #[serde(default = "default_places_radius_meters")]
    pub places_radius_meters: u32,

    /// Environment source endpoints
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Upload collaborator endpoint; uploads are disabled when unset
    #[serde(default)]
    pub upload_endpoint: Option<String>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Base URLs for the consumed environment sources
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    /// Weather forecast API (Open-Meteo compatible)
    #[serde(default = "default_weather_url")]
    pub weather_url: String,

    /// Air quality API (Open-Meteo compatible)
    #[serde(default = "default_air_quality_url")]
    pub air_quality_url: String,

    /// Places API (Overpass compatible)
    #[serde(default = "default_places_url")]
    pub places_url: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
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

fn default_port() -> u16 {
    5760
}

fn default_device_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn default_cycle_period_secs() -> u64 {
    30
}

fn default_source_timeout_secs() -> u64 {
    10
}

fn default_places_radius_meters() -> u32 {
    5000
}

fn default_weather_url() -> String {
    "https://api.open-meteo.com".to_string()
}

fn default_air_quality_url() -> String {
    "https://air-quality-api.open-meteo.com".to_string()
}

fn default_places_url() -> String {
    "https://overpass-api.de".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for VerdantConfig {
    fn default() -> Self {
        // serde defaults and built-in defaults must agree; round-trip an
        // empty document to keep a single source of truth
        toml::from_str("").expect("empty config must deserialize")
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        toml::from_str("").expect("empty sources config must deserialize")
    }
}

impl VerdantConfig {
    /// Load configuration from an explicit path, the `VERDANT_CONFIG`
    /// environment variable, or the platform config directory, falling back
    /// to built-in defaults when no file exists.
    pub fn load(explicit_path: Option<&PathBuf>) -> Result<Self> {
        let path = match explicit_path {
            Some(p) => Some(p.clone()),
            None => match std::env::var("VERDANT_CONFIG") {
                Ok(p) => Some(PathBuf::from(p)),
                Err(_) => find_config_file(),
            },
        };

        match path {
            Some(path) if path.exists() => {
                info!("Loading configuration from {}", path.display());
                let contents = std::fs::read_to_string(&path)?;
                toml::from_str(&contents)
                    .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
            }
            Some(path) => Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            ))),
            None => {
                debug!("No config file found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn cycle_period(&self) -> Duration {
        Duration::from_secs(self.cycle_period_secs)
    }

    pub fn source_timeout(&self) -> Duration {
        Duration::from_secs(self.source_timeout_secs)
    }
}

/// Locate the default config file: user config dir first, then /etc on unix
fn find_config_file() -> Option<PathBuf> {
    if let Some(user_config) = dirs::config_dir().map(|d| d.join("verdant").join("config.toml")) {
        if user_config.exists() {
            return Some(user_config);
        }
    }

    #[cfg(unix)]
    {
        let system_config = PathBuf::from("/etc/verdant/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}
