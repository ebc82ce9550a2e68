//! Durability layer for covstore
//!
//! Everything that touches disk lives here:
//!
//! - `filelock`: cross-process mutual exclusion over a data file via a
//!   companion `<path>.lock` sentinel and an OS advisory lock
//! - `gate`: the in-process critical section per data-file path,
//!   acquired before the cross-process lock
//! - `config`: layered resolution of the shared data-file location
//! - `datafile`: the load-merge-save protocol that turns a transient
//!   increment into a durable, cumulative snapshot
//!
//! The `DataStore` boundary never propagates errors: every failure
//! converges to a logged message and an absent/void result.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod datafile;
pub mod filelock;
pub mod gate;

pub use config::{ConfigResource, StoreConfig};
pub use datafile::{DataStore, SNAPSHOT_EXTENSION};
pub use filelock::{sentinel_path, FileLocker, LockBackend, LockHandle};
