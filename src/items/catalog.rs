//! Static per-category item definitions
//!
//! One immutable `AttributeSet` per Flume component category. The attribute
//! lists and key formats are fixed: existing Zabbix templates and dashboards
//! address items by these exact keys.

use std::fmt;

/// Flume component category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Channel,
    Sink,
    Source,
}

impl Category {
    /// All categories, in poll order
    pub const ALL: [Category; 3] = [Category::Channel, Category::Sink, Category::Source];

    /// Lowercase category name, used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Channel => "channel",
            Category::Sink => "sink",
            Category::Source => "source",
        }
    }

    /// The attribute set for this category
    pub fn attribute_set(&self) -> &'static AttributeSet {
        match self {
            Category::Channel => &CHANNEL_ITEMS,
            Category::Sink => &SINK_ITEMS,
            Category::Source => &SOURCE_ITEMS,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable description of what to read for one category and how to key it
#[derive(Debug)]
pub struct AttributeSet {
    /// MBean domain, e.g. "org.apache.flume.channel"
    domain: &'static str,
    /// Zabbix key prefix, e.g. "flume.channel"
    key_prefix: &'static str,
    /// Attributes to read, in declared order
    attributes: &'static [&'static str],
}

impl AttributeSet {
    /// Wildcard pattern matching every component of this category
    pub fn mbean_pattern(&self) -> String {
        format!("{}:type=*", self.domain)
    }

    /// Pattern addressing a single named component
    pub fn exact_pattern(&self, name: &str) -> String {
        format!("{}:type={}", self.domain, name)
    }

    /// Attributes to read, in declared order
    pub fn attributes(&self) -> &'static [&'static str] {
        self.attributes
    }

    /// Zabbix item key for one (component, attribute) pair
    ///
    /// `qualifier` is the ObjectName part after the domain, e.g. "type=ch1".
    pub fn item_key(&self, qualifier: &str, attribute: &str) -> String {
        format!("{}[{},{}]", self.key_prefix, qualifier, attribute)
    }

    /// Zabbix low-level-discovery key for this category
    pub fn discovery_key(&self) -> String {
        format!("{}.discovery", self.key_prefix)
    }
}

/// Channel counters
pub static CHANNEL_ITEMS: AttributeSet = AttributeSet {
    domain: "org.apache.flume.channel",
    key_prefix: "flume.channel",
    attributes: &[
        "ChannelCapacity",
        "ChannelFillPercentage",
        "ChannelSize",
        "EventPutAttemptCount",
        "EventPutSuccessCount",
        "EventTakeAttemptCount",
        "EventTakeSuccessCount",
        "StartTime",
        "StopTime",
    ],
};

/// Sink counters
pub static SINK_ITEMS: AttributeSet = AttributeSet {
    domain: "org.apache.flume.sink",
    key_prefix: "flume.sink",
    attributes: &[
        "BatchCompleteCount",
        "BatchEmptyCount",
        "BatchUnderflowCount",
        "ConnectionClosedCount",
        "ConnectionCreatedCount",
        "ConnectionFailedCount",
        "EventDrainAttemptCount",
        "EventDrainSuccessCount",
        "StartTime",
        "StopTime",
    ],
};

/// Source counters
pub static SOURCE_ITEMS: AttributeSet = AttributeSet {
    domain: "org.apache.flume.source",
    key_prefix: "flume.source",
    attributes: &[
        "AppendAcceptedCount",
        "AppendBatchAcceptedCount",
        "AppendBatchReceivedCount",
        "AppendReceivedCount",
        "EventAcceptedCount",
        "EventReceivedCount",
        "OpenConnectionCount",
        "StartTime",
        "StopTime",
    ],
};
