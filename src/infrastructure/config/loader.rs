use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid order_value_threshold: {0}. Must be a positive number")]
    InvalidThreshold(f64),

    #[error("Invalid check_interval_seconds: {0}. Must be at least 1")]
    InvalidCheckInterval(u64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Missing required setting: {0}. Set it in orderwatch.yaml or via ORDERWATCH_{1}")]
    MissingSetting(&'static str, &'static str),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. orderwatch.yaml (project config)
    /// 3. orderwatch.local.yaml (local overrides, optional)
    /// 4. Environment variables (ORDERWATCH_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file("orderwatch.yaml"))
            .merge(Yaml::file("orderwatch.local.yaml"))
            .merge(Env::prefixed("ORDERWATCH_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("ORDERWATCH_").split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if !config.order_value_threshold.is_finite() || config.order_value_threshold <= 0.0 {
            return Err(ConfigError::InvalidThreshold(config.order_value_threshold));
        }

        if config.check_interval_seconds == 0 {
            return Err(ConfigError::InvalidCheckInterval(
                config.check_interval_seconds,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }

    /// Check that the settings polling needs are all present.
    ///
    /// These have no sensible defaults; they come from the setup flow.
    pub fn require_polling_settings(config: &Config) -> Result<(), ConfigError> {
        let required: [(&str, &'static str, &'static str); 5] = [
            (&config.api_key, "api_key", "API_KEY"),
            (&config.user_id, "user_id", "USER_ID"),
            (
                &config.shopify_credential_id,
                "shopify_credential_id",
                "SHOPIFY_CREDENTIAL_ID",
            ),
            (
                &config.slack_credential_id,
                "slack_credential_id",
                "SLACK_CREDENTIAL_ID",
            ),
            (
                &config.slack_channel_id,
                "slack_channel_id",
                "SLACK_CHANNEL_ID",
            ),
        ];
        for (value, name, env_name) in required {
            if value.is_empty() {
                return Err(ConfigError::MissingSetting(name, env_name));
            }
        }
        Ok(())
    }
}
