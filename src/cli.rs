//! CLI argument parsing for flume-zabbix-exporter
//!
//! This module provides the command-line interface using clap derive macros.
//!
//! # Options
//!
//! - `--config` / `-c`: Configuration file path (default: config.yaml, env: FLUME_ZBX_CONFIG)
//! - `--jolokia-host`: Jolokia agent host (overrides config file, env: FLUME_ZBX_JOLOKIA_HOST)
//! - `--jolokia-port`: Jolokia agent port (env: FLUME_ZBX_JOLOKIA_PORT)
//! - `--zabbix-server`: Zabbix server address (env: FLUME_ZBX_ZABBIX_SERVER)
//! - `--interval`: Seconds between poll cycles (env: FLUME_ZBX_INTERVAL)
//! - `--validate`: Validate configuration without starting the poller
//! - `--log-level` / `-l`: Log level (trace/debug/info/warn/error, env: FLUME_ZBX_LOG_LEVEL)
//!
//! # Precedence
//!
//! Configuration values are resolved in the following order (highest to lowest priority):
//! 1. CLI arguments
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::Config;

/// flume-zabbix-exporter - Apache Flume JMX metrics exporter for Zabbix
///
/// Polls channel, sink, and source counters from a Flume process via
/// Jolokia and ships them to a Zabbix server as sender items.
///
/// Environment variables can be used for all configuration options.
/// CLI arguments take precedence over environment variables,
/// which take precedence over config file values.
#[derive(Parser, Debug)]
#[command(name = "flume-zabbix-exporter")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config.yaml",
        env = "FLUME_ZBX_CONFIG"
    )]
    pub config: PathBuf,

    /// Jolokia agent host (overrides config file)
    #[arg(long, value_name = "HOST", env = "FLUME_ZBX_JOLOKIA_HOST")]
    pub jolokia_host: Option<String>,

    /// Jolokia agent port (overrides config file)
    #[arg(long, value_name = "PORT", env = "FLUME_ZBX_JOLOKIA_PORT")]
    pub jolokia_port: Option<u16>,

    /// Zabbix server address (overrides config file)
    #[arg(long, value_name = "HOST", env = "FLUME_ZBX_ZABBIX_SERVER")]
    pub zabbix_server: Option<String>,

    /// Seconds between poll cycles (overrides config file)
    #[arg(long, value_name = "SECS", env = "FLUME_ZBX_INTERVAL")]
    pub interval: Option<u64>,

    /// Validate configuration without starting the poller
    #[arg(long)]
    pub validate: bool,

    /// Log level
    #[arg(
        short,
        long,
        value_enum,
        default_value = "info",
        env = "FLUME_ZBX_LOG_LEVEL"
    )]
    pub log_level: LogLevel,
}

impl Cli {
    /// Apply CLI overrides on top of a loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(ref host) = self.jolokia_host {
            config.jolokia.host = host.clone();
        }
        if let Some(port) = self.jolokia_port {
            config.jolokia.port = port;
        }
        if let Some(ref server) = self.zabbix_server {
            config.zabbix.server = server.clone();
        }
        if let Some(interval) = self.interval {
            config.poll.interval_secs = interval;
        }
    }
}

/// Log level options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Trace level - most verbose
    Trace,
    /// Debug level
    Debug,
    /// Info level - default
    Info,
    /// Warn level
    Warn,
    /// Error level - least verbose
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}
