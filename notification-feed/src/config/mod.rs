use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Feed client configuration, read from `NOTIFICATION_FEED_*` variables
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Base URL of the notification service (e.g. "http://localhost:5000")
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Default tracing filter, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_api_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_user_agent() -> String {
    concat!("notification-feed/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            user_agent: default_user_agent(),
        }
    }
}

impl FeedConfig {
    pub const ENV_PREFIX: &'static str = "NOTIFICATION_FEED_";

    /// Load from the process environment, after an optional `.env` file
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: FeedConfig = envy::prefixed(Self::ENV_PREFIX).from_iter(vars)?;
        config.base_url()?;
        Ok(config)
    }

    /// Parsed and validated API base URL
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: self.api_base_url.clone(),
            reason,
        };

        let url = Url::parse(&self.api_base_url).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(invalid(format!("unsupported scheme {}", scheme))),
        }
    }
}
