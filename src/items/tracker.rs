//! Discovered component set tracking
//!
//! One tracker per category holds the MBean names seen on the previous poll.
//! A discovery item is only worth sending when that set actually changes, so
//! the poll cycle asks `differs` first and calls `replace` after.

use std::collections::BTreeSet;

/// Previously observed MBean set for one category
///
/// The set is ordered so that extraction iterates components
/// deterministically. Comparison is pure set equality: reordered or
/// duplicated input never counts as a change.
#[derive(Debug, Default)]
pub struct MBeanTracker {
    mbeans: BTreeSet<String>,
}

impl MBeanTracker {
    /// Create an empty tracker
    ///
    /// The first comparison against a non-empty set always reports a change.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `new_mbeans` differs from the stored set
    ///
    /// Pure comparison, no mutation.
    pub fn differs(&self, new_mbeans: &BTreeSet<String>) -> bool {
        self.mbeans != *new_mbeans
    }

    /// Overwrite the stored set
    ///
    /// Callers only invoke this after `differs` returned true; the tracker
    /// itself does not enforce that.
    pub fn replace(&mut self, new_mbeans: BTreeSet<String>) {
        self.mbeans = new_mbeans;
    }

    /// The currently stored set
    pub fn current(&self) -> &BTreeSet<String> {
        &self.mbeans
    }
}
