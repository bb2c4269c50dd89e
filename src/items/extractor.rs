//! Metric item extraction
//!
//! Turns one parsed Jolokia read into Zabbix items, one per
//! (component, attribute) pair. Pure transformation: the caller owns
//! enqueueing and error reporting.

use std::collections::{BTreeSet, HashMap};

use crate::collector::{qualifier_of, JolokiaRead, MetricValue, ReadValue};
use crate::error::ExtractError;
use crate::zabbix::{ItemValue, ZabbixItem};

use super::catalog::AttributeSet;

/// Which components of a read to extract
#[derive(Debug, Clone, Copy)]
pub enum Scope<'a> {
    /// Wildcard mode: every component in the tracked set, in set order
    Discovered(&'a BTreeSet<String>),
    /// Exact mode: the single configured component, response is a flat
    /// attribute map
    Named(&'a str),
}

/// Extract one item per (component, attribute) pair
///
/// Attributes are visited in declared catalog order; components in the order
/// of the tracked set. A declared attribute missing from the response aborts
/// the whole batch with `ExtractError::MissingAttribute` - that is schema
/// drift, not a value to skip.
///
/// Wildcard output length is |components| x |attributes|, exact mode is
/// |attributes|; every key is unique within the batch.
pub fn extract(
    read: &JolokiaRead,
    set: &AttributeSet,
    scope: Scope<'_>,
    host: &str,
) -> Result<Vec<ZabbixItem>, ExtractError> {
    match scope {
        Scope::Discovered(mbeans) => {
            // An empty component set extracts nothing; the response shape is
            // irrelevant (Jolokia returns an empty object for a wildcard
            // matching no MBeans).
            if mbeans.is_empty() {
                return Ok(Vec::new());
            }

            let ReadValue::Grouped(groups) = &read.value else {
                return Err(ExtractError::UnexpectedShape { expected: "grouped" });
            };

            let mut items = Vec::with_capacity(mbeans.len() * set.attributes().len());
            for mbean in mbeans {
                let attrs = groups
                    .get(mbean)
                    .ok_or_else(|| ExtractError::MissingMBean(mbean.clone()))?;
                let qualifier = qualifier_of(mbean);
                extract_component(attrs, set, mbean, qualifier, read.timestamp, host, &mut items)?;
            }
            Ok(items)
        }
        Scope::Named(name) => {
            let ReadValue::Flat(attrs) = &read.value else {
                return Err(ExtractError::UnexpectedShape { expected: "flat" });
            };

            let mut items = Vec::with_capacity(set.attributes().len());
            extract_component(attrs, set, name, name, read.timestamp, host, &mut items)?;
            Ok(items)
        }
    }
}

fn extract_component(
    attrs: &HashMap<String, MetricValue>,
    set: &AttributeSet,
    mbean: &str,
    qualifier: &str,
    clock: i64,
    host: &str,
    items: &mut Vec<ZabbixItem>,
) -> Result<(), ExtractError> {
    for attribute in set.attributes() {
        let value = attrs
            .get(*attribute)
            .ok_or_else(|| ExtractError::MissingAttribute {
                mbean: mbean.to_string(),
                attribute: attribute.to_string(),
            })?;

        items.push(ZabbixItem::metric(
            host,
            set.item_key(qualifier, attribute),
            normalize(value),
            clock,
        ));
    }
    Ok(())
}

/// Normalize an attribute value for emission
///
/// Floats are rounded to 6 decimal digits; everything else passes through.
fn normalize(value: &MetricValue) -> ItemValue {
    match value {
        MetricValue::Integer(i) => ItemValue::Int(*i),
        MetricValue::Float(f) => ItemValue::Float(round6(*f)),
        MetricValue::Text(s) => ItemValue::Text(s.clone()),
        MetricValue::Bool(b) => ItemValue::Bool(*b),
    }
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}
