//! One poll cycle over the three component categories
//!
//! Channel, then sink, then source, strictly in sequence. A failure in one
//! category is logged and never stops the others, and a tracker is only
//! touched after its category's response parsed completely.

use std::collections::BTreeSet;

use tracing::{debug, info, instrument, warn};

use crate::collector::{qualifier_of, JolokiaClient, ReadValue};
use crate::config::Config;
use crate::error::{AppResult, CollectorError};
use crate::items::{extract, Category, MBeanTracker, Scope};
use crate::zabbix::{discovery_payload, ItemQueue, ZabbixItem};

/// Per-category poll state
struct CategoryJob {
    category: Category,
    /// Exact-mode component name; `None` means wildcard discovery
    exact: Option<String>,
    tracker: MBeanTracker,
}

/// Executes poll cycles against one Flume process
pub struct PollCycle {
    client: JolokiaClient,
    queue: ItemQueue,
    hostname: String,
    jobs: Vec<CategoryJob>,
}

impl PollCycle {
    /// Build the per-category jobs from configuration
    ///
    /// Trackers live here for the whole process lifetime; they are never
    /// recreated between cycles.
    pub fn new(client: JolokiaClient, queue: ItemQueue, config: &Config) -> Self {
        let jobs = Category::ALL
            .into_iter()
            .map(|category| {
                let exact = match category {
                    Category::Channel => config.flume.channel.clone(),
                    Category::Sink => config.flume.sink.clone(),
                    Category::Source => config.flume.source.clone(),
                };
                CategoryJob {
                    category,
                    exact,
                    tracker: MBeanTracker::new(),
                }
            })
            .collect();

        Self {
            client,
            queue,
            hostname: config.zabbix.hostname.clone(),
            jobs,
        }
    }

    /// Run one full cycle
    ///
    /// Errors are per-category: logged, and the remaining categories still
    /// run.
    pub async fn run_once(&mut self) {
        for job in &mut self.jobs {
            if let Err(e) = poll_category(&self.client, &self.queue, &self.hostname, job).await {
                warn!(category = %job.category, error = %e, "Category poll failed");
            }
        }
    }
}

#[instrument(skip_all, fields(category = %job.category))]
async fn poll_category(
    client: &JolokiaClient,
    queue: &ItemQueue,
    hostname: &str,
    job: &mut CategoryJob,
) -> AppResult<()> {
    let set = job.category.attribute_set();

    let items = match &job.exact {
        None => {
            let read = client
                .read_mbean(&set.mbean_pattern(), set.attributes())
                .await?;

            // A wildcard matching no MBeans comes back as an empty object,
            // which the parser cannot tell apart from a flat map.
            let new_mbeans: BTreeSet<String> = match &read.value {
                ReadValue::Grouped(groups) => groups.keys().cloned().collect(),
                ReadValue::Flat(attrs) if attrs.is_empty() => BTreeSet::new(),
                ReadValue::Flat(_) => {
                    return Err(CollectorError::MalformedResponse(
                        "expected grouped response for wildcard query".to_string(),
                    )
                    .into());
                }
            };
            if job.tracker.differs(&new_mbeans) {
                job.tracker.replace(new_mbeans);
                info!(
                    count = job.tracker.current().len(),
                    "Component set changed, emitting discovery"
                );

                let payload =
                    discovery_payload(job.tracker.current().iter().map(|m| qualifier_of(m)));
                enqueue(
                    queue,
                    ZabbixItem::discovery(hostname, set.discovery_key(), payload),
                );
            }

            extract(&read, set, Scope::Discovered(job.tracker.current()), hostname)?
        }
        Some(name) => {
            let read = client
                .read_mbean(&set.exact_pattern(name), set.attributes())
                .await?;

            extract(&read, set, Scope::Named(name), hostname)?
        }
    };

    debug!(count = items.len(), "Extracted items");
    for item in items {
        enqueue(queue, item);
    }

    Ok(())
}

/// Enqueue one item; a full or closed queue loses only this item
fn enqueue(queue: &ItemQueue, item: ZabbixItem) {
    if let Err(e) = queue.enqueue(item) {
        warn!(error = %e, "Dropping item");
    }
}
