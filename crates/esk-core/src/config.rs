//! Configuration management
//!
//! Handles configuration from environment variables and TOML files
//! with sensible defaults. Provider credentials are read from the same
//! environment variables the hosted tool uses (`TEXTRAZOR_TOKEN`,
//! `GOOGLE_KEY`).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Which NLP provider to analyze with
    pub provider: ProviderKind,

    /// TextRazor API key
    pub textrazor_api_key: Option<String>,

    /// Google Natural Language API key
    pub google_api_key: Option<String>,

    /// Page fetch configuration
    pub fetch: FetchConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(provider) = std::env::var("ESK_PROVIDER") {
            config.provider = provider.parse()?;
        }
        if let Ok(token) = std::env::var("TEXTRAZOR_TOKEN") {
            config.textrazor_api_key = Some(token);
        }
        if let Ok(key) = std::env::var("GOOGLE_KEY") {
            config.google_api_key = Some(key);
        }
        if let Ok(secs) = std::env::var("ESK_FETCH_TIMEOUT_SECS") {
            config.fetch.timeout_secs = secs.parse().map_err(|_| ConfigError::InvalidValue {
                key: "ESK_FETCH_TIMEOUT_SECS".to_string(),
                value: secs,
            })?;
        }
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// The credential for the configured provider, if present.
    pub fn credential(&self) -> Option<&str> {
        match self.provider {
            ProviderKind::TextRazor => self.textrazor_api_key.as_deref(),
            ProviderKind::GoogleNlp => self.google_api_key.as_deref(),
        }
    }
}

/// Supported NLP providers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    TextRazor,
    GoogleNlp,
}

impl std::str::FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "textrazor" | "text_razor" => Ok(Self::TextRazor),
            "google" | "google_nlp" => Ok(Self::GoogleNlp),
            _ => Err(ConfigError::InvalidValue {
                key: "ESK_PROVIDER".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Page fetch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Fetch timeout in seconds
    pub timeout_secs: u64,

    /// User agent sent with page fetches
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            user_agent: "esk-fetch/0.1".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
