//! Coverage data model for covstore
//!
//! This crate defines the in-memory shape of coverage data:
//!
//! - `ClassRecord`: per-class line-hit counters
//! - `CoverageSnapshot`: the root aggregate, a class-name-keyed map
//! - `namespace`: a derived view grouping class names by dotted package
//!
//! The snapshot is the unit of persistence; merging two snapshots never
//! duplicates a class name. How counters combine lives entirely inside
//! `ClassRecord::merge`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod namespace;
pub mod record;
pub mod snapshot;

pub use error::{Error, Result};
pub use record::ClassRecord;
pub use snapshot::CoverageSnapshot;
