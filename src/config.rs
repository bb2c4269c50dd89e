//! Configuration management for flume-zabbix-exporter
//!
//! Handles loading and validating configuration from YAML files.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error reading the configuration file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Error parsing the configuration file
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Zabbix server and host identity
    #[serde(default)]
    pub zabbix: ZabbixConfig,

    /// Jolokia endpoint configuration
    #[serde(default)]
    pub jolokia: JolokiaConfig,

    /// Fixed component names for exact-mode monitoring
    #[serde(default)]
    pub flume: FlumeConfig,

    /// Poll loop configuration
    #[serde(default)]
    pub poll: PollConfig,
}

/// Zabbix configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZabbixConfig {
    /// Host name items are reported under (defaults to the local host name)
    #[serde(default = "default_zabbix_hostname")]
    pub hostname: String,

    /// Zabbix server address for the sender protocol
    #[serde(default = "default_zabbix_server")]
    pub server: String,

    /// Zabbix trapper port
    #[serde(default = "default_zabbix_port")]
    pub port: u16,
}

/// Jolokia endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JolokiaConfig {
    /// Jolokia agent host
    #[serde(default = "default_jolokia_host")]
    pub host: String,

    /// Jolokia agent port
    #[serde(default = "default_jolokia_port")]
    pub port: u16,

    /// Jolokia context path
    #[serde(default = "default_jolokia_context")]
    pub context: String,

    /// Request timeout in seconds
    #[serde(default = "default_jolokia_timeout")]
    pub timeout_secs: u64,
}

impl JolokiaConfig {
    /// Base URL of the Jolokia endpoint, trailing slash included
    /// (Jolokia redirects POSTs without it).
    pub fn base_url(&self) -> String {
        format!("http://{}:{}{}/", self.host, self.port, self.context)
    }
}

/// Fixed component names, one per category
///
/// A set name switches that category from wildcard discovery to exact mode:
/// only the named component is queried and no discovery items are emitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlumeConfig {
    /// Channel name to watch instead of discovering all channels
    pub channel: Option<String>,

    /// Sink name to watch instead of discovering all sinks
    pub sink: Option<String>,

    /// Source name to watch instead of discovering all sources
    pub source: Option<String>,
}

/// Poll loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Seconds between poll cycles
    #[serde(default = "default_poll_interval")]
    pub interval_secs: u64,

    /// Item queue capacity
    #[serde(default = "default_queue_size")]
    pub queue_size: usize,
}

/// Local host name, detected once
static LOCAL_HOSTNAME: Lazy<String> = Lazy::new(|| {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "localhost".to_string())
});

// Default value functions
fn default_zabbix_hostname() -> String {
    LOCAL_HOSTNAME.clone()
}

fn default_zabbix_server() -> String {
    "localhost".to_string()
}

fn default_zabbix_port() -> u16 {
    10051
}

fn default_jolokia_host() -> String {
    "localhost".to_string()
}

fn default_jolokia_port() -> u16 {
    8778
}

fn default_jolokia_context() -> String {
    "/jolokia".to_string()
}

fn default_jolokia_timeout() -> u64 {
    10
}

fn default_poll_interval() -> u64 {
    60
}

fn default_queue_size() -> usize {
    1024
}

impl Default for ZabbixConfig {
    fn default() -> Self {
        Self {
            hostname: default_zabbix_hostname(),
            server: default_zabbix_server(),
            port: default_zabbix_port(),
        }
    }
}

impl Default for JolokiaConfig {
    fn default() -> Self {
        Self {
            host: default_jolokia_host(),
            port: default_jolokia_port(),
            context: default_jolokia_context(),
            timeout_secs: default_jolokia_timeout(),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval(),
            queue_size: default_queue_size(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    ///
    /// # Note
    /// - If the file doesn't exist, returns `ConfigError::ReadError`
    /// - Use `Config::load_or_default()` if you want fallback to defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file, falling back to defaults if not found
    ///
    /// Use this for optional configuration files (e.g., when running without explicit config)
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        Self::load(path)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.zabbix.hostname.is_empty() {
            return Err(ConfigError::ValidationError(
                "Zabbix hostname must not be empty".to_string(),
            ));
        }

        if self.jolokia.port == 0 {
            return Err(ConfigError::ValidationError(
                "Jolokia port must be greater than 0".to_string(),
            ));
        }

        if !self.jolokia.context.starts_with('/') {
            return Err(ConfigError::ValidationError(
                "Jolokia context must start with '/'".to_string(),
            ));
        }

        if self.poll.interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "Poll interval must be greater than 0".to_string(),
            ));
        }

        if self.poll.queue_size == 0 {
            return Err(ConfigError::ValidationError(
                "Queue size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
