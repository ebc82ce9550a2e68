//! Per-class coverage counters
//!
//! A `ClassRecord` is identified by its fully-qualified dotted class
//! name and carries a line-number → hit-count map. The persistence and
//! segregation layers treat it as opaque beyond `name()` and `merge()`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::namespace;

/// Coverage counters for one class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRecord {
    /// Fully-qualified dotted class name, unique within a snapshot
    name: String,
    /// Hit count per source line
    line_hits: BTreeMap<u32, u64>,
}

impl ClassRecord {
    /// Create an empty record for the given fully-qualified class name
    pub fn new(name: impl Into<String>) -> Self {
        ClassRecord {
            name: name.into(),
            line_hits: BTreeMap::new(),
        }
    }

    /// Fully-qualified class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dotted package this class belongs to (empty for the default package)
    pub fn package_name(&self) -> &str {
        namespace::package_of(&self.name)
    }

    /// Record `count` additional hits on `line`
    pub fn add_hits(&mut self, line: u32, count: u64) {
        *self.line_hits.entry(line).or_insert(0) += count;
    }

    /// Record one hit on `line`
    pub fn touch_line(&mut self, line: u32) {
        self.add_hits(line, 1);
    }

    /// Hit count for `line` (zero if never touched)
    pub fn hits_for(&self, line: u32) -> u64 {
        self.line_hits.get(&line).copied().unwrap_or(0)
    }

    /// Total hits across all lines
    pub fn total_hits(&self) -> u64 {
        self.line_hits.values().sum()
    }

    /// Number of distinct lines with at least one recorded hit
    pub fn line_count(&self) -> usize {
        self.line_hits.len()
    }

    /// Fold another record's counters into this one.
    ///
    /// Hit counts add per line; lines unknown to either side are
    /// unioned. Associative and commutative over the counter values.
    pub fn merge(&mut self, other: &ClassRecord) {
        for (&line, &count) in &other.line_hits {
            self.add_hits(line, count);
        }
    }
}
