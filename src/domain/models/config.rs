use serde::{Deserialize, Serialize};

/// Main configuration structure for orderwatch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Connectivity API key (also settable via ORDERWATCH_API_KEY)
    #[serde(default)]
    pub api_key: String,

    /// API version pinned in every gateway request header
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Connectivity user that scopes all credential and execution calls
    #[serde(default)]
    pub user_id: String,

    /// Credential created for the Shopify connector
    #[serde(default)]
    pub shopify_credential_id: String,

    /// Credential created for the Slack connector
    #[serde(default)]
    pub slack_credential_id: String,

    /// Shopify connector identifier in the gateway catalog
    #[serde(default = "default_shopify_connector_id")]
    pub shopify_connector_id: String,

    /// Slack connector identifier in the gateway catalog
    #[serde(default = "default_slack_connector_id")]
    pub slack_connector_id: String,

    /// Minimum order total that triggers a notification
    #[serde(default = "default_order_value_threshold")]
    pub order_value_threshold: f64,

    /// Slack channel that receives notifications
    #[serde(default)]
    pub slack_channel_id: String,

    /// Shopify store subdomain; enables the admin deep-link button
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_domain: Option<String>,

    /// Sleep between cycles in continuous mode, seconds
    #[serde(default = "default_check_interval_seconds")]
    pub check_interval_seconds: u64,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_api_version() -> String {
    "2025-09".to_string()
}

fn default_shopify_connector_id() -> String {
    "shopify".to_string()
}

fn default_slack_connector_id() -> String {
    "slack".to_string()
}

const fn default_order_value_threshold() -> f64 {
    500.0
}

const fn default_check_interval_seconds() -> u64 {
    300
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_version: default_api_version(),
            user_id: String::new(),
            shopify_credential_id: String::new(),
            slack_credential_id: String::new(),
            shopify_connector_id: default_shopify_connector_id(),
            slack_connector_id: default_slack_connector_id(),
            order_value_threshold: default_order_value_threshold(),
            slack_channel_id: String::new(),
            store_domain: None,
            check_interval_seconds: default_check_interval_seconds(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
