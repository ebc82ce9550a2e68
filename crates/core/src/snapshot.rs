//! The root coverage aggregate
//!
//! A `CoverageSnapshot` maps fully-qualified class names to their
//! `ClassRecord`s. It is both the in-memory accumulator built by a
//! producer and the unit persisted to disk by the durability layer.
//!
//! Class names are unique keys: adding or merging a class that already
//! exists combines counters instead of duplicating the entry.

use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::record::ClassRecord;

/// The full coverage aggregate for a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageSnapshot {
    classes: BTreeMap<String, ClassRecord>,
}

impl CoverageSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class record, merging counters if the name already exists
    pub fn add_class(&mut self, record: ClassRecord) {
        match self.classes.entry(record.name().to_string()) {
            Entry::Occupied(mut existing) => existing.get_mut().merge(&record),
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
        }
    }

    /// Fold another snapshot into this one.
    ///
    /// Disjoint class names union; colliding names combine their
    /// counters via `ClassRecord::merge`. Never drops or duplicates an
    /// entry.
    pub fn merge(&mut self, other: &CoverageSnapshot) {
        for record in other.classes.values() {
            self.add_class(record.clone());
        }
    }

    /// Look up one class by fully-qualified name
    pub fn class(&self, name: &str) -> Option<&ClassRecord> {
        self.classes.get(name)
    }

    /// Whether a class with this name is present
    pub fn contains_class(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Iterate all class records in name order
    pub fn classes(&self) -> impl Iterator<Item = &ClassRecord> {
        self.classes.values()
    }

    /// Iterate all class names in order
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Number of distinct classes
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// True when no classes have been recorded
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, line: u32, hits: u64) -> ClassRecord {
        let mut r = ClassRecord::new(name);
        r.add_hits(line, hits);
        r
    }

    #[test]
    fn test_add_class_unique_names() {
        let mut snapshot = CoverageSnapshot::new();
        snapshot.add_class(record("a.B", 1, 1));
        snapshot.add_class(record("a.C", 1, 1));
        assert_eq!(snapshot.class_count(), 2);
        assert!(snapshot.contains_class("a.B"));
        assert!(snapshot.contains_class("a.C"));
    }

    #[test]
    fn test_add_class_merges_duplicate_name() {
        let mut snapshot = CoverageSnapshot::new();
        snapshot.add_class(record("a.B", 1, 2));
        snapshot.add_class(record("a.B", 1, 3));
        assert_eq!(snapshot.class_count(), 1);
        let merged = snapshot.class("a.B").unwrap();
        assert_eq!(merged.hits_for(1), 5);
    }

    #[test]
    fn test_merge_disjoint_is_union() {
        let mut a = CoverageSnapshot::new();
        a.add_class(record("p.A", 1, 1));
        let mut b = CoverageSnapshot::new();
        b.add_class(record("p.B", 1, 1));

        a.merge(&b);
        assert_eq!(a.class_count(), 2);
        assert!(a.contains_class("p.A"));
        assert!(a.contains_class("p.B"));
    }

    #[test]
    fn test_merge_colliding_combines_counters() {
        let mut a = CoverageSnapshot::new();
        a.add_class(record("p.A", 7, 10));
        let mut b = CoverageSnapshot::new();
        b.add_class(record("p.A", 7, 4));

        a.merge(&b);
        assert_eq!(a.class_count(), 1);
        assert_eq!(a.class("p.A").unwrap().hits_for(7), 14);
    }

    #[test]
    fn test_class_names_sorted() {
        let mut snapshot = CoverageSnapshot::new();
        snapshot.add_class(record("z.Z", 1, 1));
        snapshot.add_class(record("a.A", 1, 1));
        let names: Vec<&str> = snapshot.class_names().collect();
        assert_eq!(names, vec!["a.A", "z.Z"]);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = CoverageSnapshot::new();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.class_count(), 0);
        assert!(snapshot.class("missing").is_none());
    }
}
