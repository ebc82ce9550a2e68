//! Segregation of one snapshot into per-package shard files
//!
//! A deep namespace hierarchy would otherwise produce a single unwieldy
//! report. Segregation flattens the subtree under a dotted prefix into
//! one shard per *immediate* child package: every deeper package
//! collapses into the child that owns it, and classes living directly
//! in the prefix package form the prefix's own nominal root bucket.
//!
//! Shards are persisted through `DataStore::save`, so re-running
//! against a non-empty destination merges into the existing shard files
//! instead of overwriting them.

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, error, info};

use covstore_core::{namespace, CoverageSnapshot};
use covstore_durability::{DataStore, SNAPSHOT_EXTENSION};

/// Partition `snapshot`'s subtree under `package` into per-bucket
/// shard files inside `destination`.
///
/// The destination directory is expected to exist already; when it
/// does not, the precondition failure is logged and the run proceeds
/// best-effort (the data store still creates per-file parent
/// directories, so shards land wherever they can).
pub fn segregate(
    store: &DataStore,
    snapshot: &CoverageSnapshot,
    package: &str,
    destination: &Path,
) {
    if !destination.is_dir() {
        error!(
            target: "covstore::segregate",
            path = %destination.display(),
            "destination directory does not exist"
        );
    }

    let mut buckets: BTreeMap<String, CoverageSnapshot> = BTreeMap::new();
    for (package_name, classes) in namespace::packages_under(snapshot, package) {
        let bucket = bucket_name(package, package_name);
        let accumulator = buckets.entry(bucket).or_default();
        for class in classes {
            // Add-once: a class contributed by several package nodes
            // must not be counted twice within one run.
            if !accumulator.contains_class(class.name()) {
                accumulator.add_class(class.clone());
            }
        }
    }

    for (bucket, shard) in &buckets {
        let path = destination.join(shard_file_name(bucket));
        debug!(
            target: "covstore::segregate",
            bucket,
            classes = shard.class_count(),
            path = %path.display(),
            "saving shard"
        );
        store.save(shard, &path);
    }

    info!(
        target: "covstore::segregate",
        package,
        buckets = buckets.len(),
        "segregation complete"
    );
}

/// The immediate child of `prefix` that owns `package`.
///
/// `rest` is everything after the prefix; it is split on `.` into at
/// most three parts. One part or fewer means the package *is* the
/// prefix, which forms its own root bucket. Otherwise the bucket is
/// the first dotted component after the prefix, however deep the
/// package actually nests. A package outside the prefix entirely maps
/// to the root bucket rather than panicking.
pub fn bucket_name(prefix: &str, package: &str) -> String {
    let rest = package.strip_prefix(prefix).unwrap_or("");
    let parts: Vec<&str> = rest.splitn(3, '.').collect();
    if parts.len() <= 1 {
        prefix.to_string()
    } else {
        format!("{prefix}.{}", parts[1])
    }
}

/// Shard file name for a bucket: dots mangled to underscores plus the
/// snapshot extension.
pub fn shard_file_name(bucket: &str) -> String {
    format!("{}.{}", bucket.replace('.', "_"), SNAPSHOT_EXTENSION)
}
