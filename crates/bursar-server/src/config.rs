//! Configuration file parsing for the server.
//!
//! Loads settings from TOML: bind address, model selection, upload limits,
//! and an optional policy table override. The API key is read from the
//! process environment, never from the file.

use bursar_domain::PolicyRules;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required configuration field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// The API key environment variable is not set
    #[error("API key environment variable not set: {0}")]
    MissingApiKey(String),

    /// Invalid policy table
    #[error("Invalid policy table: {0}")]
    InvalidPolicy(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g. "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g. 8000)
    pub bind_port: u16,

    /// Model name passed to the provider
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Sampling temperature for generation
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Upload size limit per file, in megabytes
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,

    /// Reimbursement policy table; defaults match the published policy
    #[serde(default)]
    pub policy: PolicyRules,
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_max_upload_mb() -> usize {
    50
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&contents)?;

        if config.bind_address.is_empty() {
            return Err(ConfigError::MissingField("bind_address".to_string()));
        }
        config
            .policy
            .validate()
            .map_err(ConfigError::InvalidPolicy)?;

        Ok(config)
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        ServerConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8000,
            model: default_model(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            max_upload_mb: default_max_upload_mb(),
            policy: PolicyRules::default(),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }

    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Result<String, ConfigError> {
        std::env::var(&self.api_key_env)
            .map_err(|_| ConfigError::MissingApiKey(self.api_key_env.clone()))
    }

    /// Upload size limit in bytes
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }
}
