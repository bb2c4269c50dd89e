//! Zabbix sender item model
//!
//! One `ZabbixItem` per metric sample, serialized into the `data` array of a
//! sender-protocol request. Discovery items carry a JSON string payload and
//! no clock; the server stamps them on receipt.

use serde::Serialize;
use serde_json::json;

/// A single Zabbix sender item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZabbixItem {
    /// Monitored host name the item belongs to
    pub host: String,
    /// Item key, e.g. `flume.channel[type=ch1,ChannelSize]`
    pub key: String,
    /// Item value
    pub value: ItemValue,
    /// Sample timestamp (epoch seconds); unset for discovery items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock: Option<i64>,
}

/// Item value, serialized as a native JSON scalar
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ItemValue {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl ZabbixItem {
    /// Metric item with a remote-supplied clock
    pub fn metric(host: &str, key: String, value: ItemValue, clock: i64) -> Self {
        Self {
            host: host.to_string(),
            key,
            value,
            clock: Some(clock),
        }
    }

    /// Low-level-discovery item; the clock is assigned downstream
    pub fn discovery(host: &str, key: String, payload: String) -> Self {
        Self {
            host: host.to_string(),
            key,
            value: ItemValue::Text(payload),
            clock: None,
        }
    }
}

/// Build the LLD payload for a set of component qualifiers
///
/// Shape expected by Zabbix discovery rules:
/// `{"data":[{"{#MBEAN}":"type=ch1"},...]}`
pub fn discovery_payload<'a>(qualifiers: impl IntoIterator<Item = &'a str>) -> String {
    let data: Vec<serde_json::Value> = qualifiers
        .into_iter()
        .map(|q| json!({"{#MBEAN}": q}))
        .collect();

    json!({ "data": data }).to_string()
}
