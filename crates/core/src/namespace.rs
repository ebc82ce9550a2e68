//! Derived namespace view over a snapshot's class names
//!
//! Namespaces (dotted packages) are not persisted; they are computed on
//! demand by grouping class names on their dotted prefix. The
//! segregation layer walks this view to bucket classes, and never
//! mutates it.

use std::collections::BTreeMap;

use crate::record::ClassRecord;
use crate::snapshot::CoverageSnapshot;

/// Dotted package of a class name: everything before the last `.`.
///
/// Classes without a dot live in the default package, named `""`.
pub fn package_of(class_name: &str) -> &str {
    class_name
        .rfind('.')
        .map_or("", |dot| &class_name[..dot])
}

/// Group every class in the snapshot by its package, sorted by package
/// name.
pub fn packages(snapshot: &CoverageSnapshot) -> BTreeMap<&str, Vec<&ClassRecord>> {
    let mut grouped: BTreeMap<&str, Vec<&ClassRecord>> = BTreeMap::new();
    for record in snapshot.classes() {
        grouped.entry(record.package_name()).or_default().push(record);
    }
    grouped
}

/// Every package node whose name is `prefix` or begins with `prefix.`,
/// depth-unbounded, sorted by package name.
pub fn packages_under<'a>(
    snapshot: &'a CoverageSnapshot,
    prefix: &str,
) -> BTreeMap<&'a str, Vec<&'a ClassRecord>> {
    packages(snapshot)
        .into_iter()
        .filter(|&(name, _)| is_within(name, prefix))
        .collect()
}

/// Whether `package` equals `prefix` or sits somewhere below it.
///
/// Plain `starts_with` would also match sibling packages sharing a
/// textual prefix (`org.foobar` under `org.foo`), so the boundary must
/// be a dot.
pub fn is_within(package: &str, prefix: &str) -> bool {
    match package.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest.starts_with('.'),
        None => false,
    }
}
