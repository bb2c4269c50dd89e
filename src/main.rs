//! flume-zabbix-exporter - Apache Flume metrics exporter for Zabbix
//!
//! This binary polls a Flume process via Jolokia on a fixed interval and
//! ships channel/sink/source counters to a Zabbix server.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use flume_zabbix_exporter::{cli::Cli, config::Config, poller};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    flume_zabbix_exporter::init_logging(&cli.log_level.to_string())?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting flume-zabbix-exporter"
    );

    // Load configuration and apply CLI overrides
    let mut config = Config::load_or_default(&cli.config)?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    if cli.validate {
        println!("Configuration OK");
        return Ok(());
    }

    // Run the poll loop
    poller::run(config).await?;

    Ok(())
}
