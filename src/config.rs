//! Configuration management for the `ER Finder` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::ErFinderError;
use ::config::{Config, Environment, File, FileFormat};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `ER Finder` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ErFinderConfig {
    /// Facility data source configuration
    pub data: DataConfig,
    /// Dashboard service configuration
    pub dashboard: DashboardConfig,
    /// Language-model and chat configuration
    pub messaging: MessagingConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Facility CSV settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the facility CSV file
    #[serde(default = "default_csv_path")]
    pub csv_path: String,
    /// Text encoding label of the CSV file (WHATWG label)
    #[serde(default = "default_encoding")]
    pub encoding: String,
}

/// Dashboard service and query defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Reference latitude used when a query omits one
    #[serde(default = "default_latitude")]
    pub default_latitude: f64,
    /// Reference longitude used when a query omits one
    #[serde(default = "default_longitude")]
    pub default_longitude: f64,
    /// Search radius used when a query omits one
    #[serde(default = "default_radius")]
    pub default_radius_km: f64,
    /// Smallest radius a query may ask for
    #[serde(default = "default_min_radius")]
    pub min_radius_km: f64,
    /// Largest radius a query may ask for
    #[serde(default = "default_max_radius")]
    pub max_radius_km: f64,
    /// Radius slider step
    #[serde(default = "default_radius_step")]
    pub radius_step_km: f64,
    /// Initial map zoom level
    #[serde(default = "default_map_zoom")]
    pub map_zoom: u8,
    /// Selectable map tile styles, first one is the default
    #[serde(default = "default_tile_styles")]
    pub tile_styles: Vec<String>,
}

/// Language-model and chat settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagingConfig {
    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,
    /// Chat completion model
    #[serde(default = "default_model")]
    pub model: String,
    /// API key, falls back to `OPENAI_API_KEY`
    pub openai_api_key: Option<String>,
    /// Base URL of the Slack Web API
    #[serde(default = "default_slack_base_url")]
    pub slack_base_url: String,
    /// Bot token, falls back to `SLACK_BOT_TOKEN`
    pub slack_bot_token: Option<String>,
    /// Destination channel
    #[serde(default = "default_channel")]
    pub channel: String,
    /// Prompt sent to the language model
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_csv_path() -> String {
    "./seoul_emer.csv".to_string()
}

fn default_encoding() -> String {
    "windows-949".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_latitude() -> f64 {
    37.5665
}

fn default_longitude() -> f64 {
    126.9780
}

fn default_radius() -> f64 {
    5.0
}

fn default_min_radius() -> f64 {
    1.0
}

fn default_max_radius() -> f64 {
    20.0
}

fn default_radius_step() -> f64 {
    0.5
}

fn default_map_zoom() -> u8 {
    12
}

fn default_tile_styles() -> Vec<String> {
    vec!["OpenStreetMap".to_string(), "CartoDB positron".to_string()]
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_slack_base_url() -> String {
    "https://slack.com/api".to_string()
}

fn default_channel() -> String {
    "#oss".to_string()
}

fn default_prompt() -> String {
    "oss에 대한 tmi를 하나 던져줘.".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
            encoding: default_encoding(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            default_latitude: default_latitude(),
            default_longitude: default_longitude(),
            default_radius_km: default_radius(),
            min_radius_km: default_min_radius(),
            max_radius_km: default_max_radius(),
            radius_step_km: default_radius_step(),
            map_zoom: default_map_zoom(),
            tile_styles: default_tile_styles(),
        }
    }
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            openai_base_url: default_openai_base_url(),
            model: default_model(),
            openai_api_key: None,
            slack_base_url: default_slack_base_url(),
            slack_bot_token: None,
            channel: default_channel(),
            prompt: default_prompt(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ErFinderConfig {
    /// Load configuration from `config_path`, or the default locations when
    /// `None`, then overlay `ER_FINDER_*` environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(FileFormat::Toml),
            );
        }

        // ER_FINDER_DASHBOARD__PORT=9000 overrides dashboard.port
        builder = builder.add_source(
            Environment::with_prefix("ER_FINDER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: ErFinderConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("er-finder").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.data.csv_path.is_empty() {
            self.data.csv_path = default_csv_path();
        }
        if self.data.encoding.is_empty() {
            self.data.encoding = default_encoding();
        }
        if self.dashboard.host.is_empty() {
            self.dashboard.host = default_host();
        }
        if self.dashboard.tile_styles.is_empty() {
            self.dashboard.tile_styles = default_tile_styles();
        }
        if self.messaging.model.is_empty() {
            self.messaging.model = default_model();
        }
        if self.messaging.channel.is_empty() {
            self.messaging.channel = default_channel();
        }
        if self.messaging.prompt.is_empty() {
            self.messaging.prompt = default_prompt();
        }
        if self.messaging.timeout_seconds == 0 {
            self.messaging.timeout_seconds = default_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_dashboard()?;
        self.validate_messaging()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_dashboard(&self) -> Result<()> {
        let dashboard = &self.dashboard;

        if !(dashboard.min_radius_km > 0.0) || !dashboard.max_radius_km.is_finite() {
            return Err(ErFinderError::config(
                "Radius bounds must be positive and finite",
            )
            .into());
        }

        if dashboard.min_radius_km > dashboard.max_radius_km {
            return Err(ErFinderError::config(format!(
                "Minimum radius {} km exceeds maximum radius {} km",
                dashboard.min_radius_km, dashboard.max_radius_km
            ))
            .into());
        }

        if dashboard.default_radius_km < dashboard.min_radius_km
            || dashboard.default_radius_km > dashboard.max_radius_km
        {
            return Err(ErFinderError::config(format!(
                "Default radius {} km must lie within {}..={} km",
                dashboard.default_radius_km, dashboard.min_radius_km, dashboard.max_radius_km
            ))
            .into());
        }

        if !(dashboard.radius_step_km > 0.0) {
            return Err(ErFinderError::config("Radius step must be positive").into());
        }

        if !(-90.0..=90.0).contains(&dashboard.default_latitude)
            || !(-180.0..=180.0).contains(&dashboard.default_longitude)
        {
            return Err(ErFinderError::config(
                "Default reference coordinates are out of range",
            )
            .into());
        }

        Ok(())
    }

    fn validate_messaging(&self) -> Result<()> {
        if self.messaging.timeout_seconds > 300 {
            return Err(
                ErFinderError::config("Messaging timeout cannot exceed 300 seconds").into(),
            );
        }

        for (name, url) in [
            ("OpenAI", &self.messaging.openai_base_url),
            ("Slack", &self.messaging.slack_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ErFinderError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ErFinderError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ErFinderError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if encoding_rs::Encoding::for_label(self.data.encoding.as_bytes()).is_none() {
            return Err(ErFinderError::config(format!(
                "Unknown CSV encoding '{}'",
                self.data.encoding
            ))
            .into());
        }

        Ok(())
    }
}
