//! Flume item catalog, discovery tracking, and metric extraction
//!
//! This is the domain core: what to read per category, how to notice the
//! component set changing, and how to turn attribute values into uniquely
//! keyed Zabbix items.

mod catalog;
mod extractor;
mod tracker;

pub use catalog::{AttributeSet, Category, CHANNEL_ITEMS, SINK_ITEMS, SOURCE_ITEMS};
pub use extractor::{extract, Scope};
pub use tracker::MBeanTracker;
