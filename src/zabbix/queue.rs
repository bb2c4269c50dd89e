//! Bounded item queue between the poller and the sender task
//!
//! Enqueueing never blocks the poll cycle: a full queue drops that one item
//! and reports it, the rest of the batch continues.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::error::QueueError;

use super::item::ZabbixItem;

/// Sending half of the item queue
#[derive(Clone)]
pub struct ItemQueue {
    tx: mpsc::Sender<ZabbixItem>,
}

impl ItemQueue {
    /// Create a bounded queue, returning the enqueue handle and the
    /// receiver for the sender task
    pub fn bounded(capacity: usize) -> (Self, mpsc::Receiver<ZabbixItem>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Non-blocking enqueue
    pub fn enqueue(&self, item: ZabbixItem) -> Result<(), QueueError> {
        self.tx.try_send(item).map_err(|e| match e {
            TrySendError::Full(_) => QueueError::Full,
            TrySendError::Closed(_) => QueueError::Closed,
        })
    }
}
