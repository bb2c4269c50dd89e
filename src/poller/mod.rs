//! Poll loop
//!
//! Owns the Jolokia client, the item queue, the Zabbix sender task, and the
//! interval timer that triggers poll cycles until shutdown.

mod cycle;

pub use cycle::PollCycle;

use std::time::Duration;

use anyhow::Result;
use tokio::signal;
use tracing::info;

use crate::collector::JolokiaClient;
use crate::config::Config;
use crate::zabbix::{run_sender, ItemQueue, ZabbixSender};

/// Items per sender batch
const SENDER_BATCH_MAX: usize = 250;

/// Seconds between sender flushes
const SENDER_FLUSH_SECS: u64 = 1;

/// Sender connection/response timeout in seconds
const SENDER_TIMEOUT_SECS: u64 = 10;

/// Run the poller until a shutdown signal arrives
///
/// # Arguments
/// * `config` - Application configuration
///
/// # Errors
/// Returns an error if the Jolokia client cannot be constructed
pub async fn run(config: Config) -> Result<()> {
    let client = JolokiaClient::new(&config.jolokia.base_url(), config.jolokia.timeout_secs)?;

    let (queue, rx) = ItemQueue::bounded(config.poll.queue_size);
    let sender = ZabbixSender::new(&config.zabbix.server, config.zabbix.port, SENDER_TIMEOUT_SECS);
    let sender_task = tokio::spawn(run_sender(
        rx,
        sender,
        SENDER_BATCH_MAX,
        Duration::from_secs(SENDER_FLUSH_SECS),
    ));

    let mut cycle = PollCycle::new(client, queue, &config);

    info!(
        endpoint = %config.jolokia.base_url(),
        zabbix = %config.zabbix.server,
        interval_secs = config.poll.interval_secs,
        "Poller started"
    );

    let mut ticker = tokio::time::interval(Duration::from_secs(config.poll.interval_secs));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                cycle.run_once().await;
            }
            _ = shutdown_signal() => {
                break;
            }
        }
    }

    // Dropping the cycle closes the queue; the sender flushes what is left
    // and exits.
    drop(cycle);
    let _ = sender_task.await;

    info!("Poller shutdown complete");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}
