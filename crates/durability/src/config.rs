//! Layered resolution of the shared data-file location
//!
//! The default path is looked up through three layers, first match
//! wins:
//!
//! 1. `COVSTORE_DATAFILE` environment variable
//! 2. `datafile` key in the `covstore.toml` resource (located by
//!    `COVSTORE_CONFIG`, else `/etc/covstore.toml`)
//! 3. the hardcoded fallback `covstore-####.cov`
//!
//! The `####` token in layers 2 and 3 is replaced by the process id, so
//! independent runtimes writing to a shared working directory land on
//! distinct files unless explicitly configured otherwise. Resolution
//! happens once per `StoreConfig` and is memoized.
//!
//! OS-level locking can be switched off entirely through the
//! `COVSTORE_OS_LOCKING` environment variable or the `os_locking`
//! resource key; the in-process gate then carries the (weaker)
//! guarantee alone.

use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable overriding the data-file path
pub const DATAFILE_ENV: &str = "COVSTORE_DATAFILE";
/// Environment variable overriding the OS-locking switch
pub const OS_LOCKING_ENV: &str = "COVSTORE_OS_LOCKING";
/// Environment variable pointing at the configuration resource
pub const CONFIG_PATH_ENV: &str = "COVSTORE_CONFIG";
/// Default location of the configuration resource
pub const DEFAULT_CONFIG_PATH: &str = "/etc/covstore.toml";
/// Hardcoded fallback data-file name
pub const DEFAULT_DATAFILE_TEMPLATE: &str = "covstore-####.cov";
/// Token in a configured data-file name substituted with the process id
pub const RUNTIME_ID_TOKEN: &str = "####";

/// Keys read from the `covstore.toml` configuration resource
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigResource {
    /// Shared data-file path (may contain the `####` token)
    pub datafile: Option<String>,
    /// Whether OS-level file locking is enabled
    pub os_locking: Option<bool>,
}

impl ConfigResource {
    /// Load the resource from the configured location.
    ///
    /// A missing file is normal (debug log, empty resource); a present
    /// but unparsable file is reported and likewise ignored.
    pub fn load() -> Self {
        let location = env::var(CONFIG_PATH_ENV)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::from_file(Path::new(&location))
    }

    /// Parse the resource from an explicit file path
    pub fn from_file(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                debug!(
                    target: "covstore::config",
                    path = %path.display(),
                    error = %e,
                    "no configuration resource, using built-in defaults"
                );
                return Self::default();
            }
        };
        match toml::from_str(&content) {
            Ok(resource) => resource,
            Err(e) => {
                warn!(
                    target: "covstore::config",
                    path = %path.display(),
                    error = %e,
                    "unparsable configuration resource, using built-in defaults"
                );
                Self::default()
            }
        }
    }
}

/// Configuration handed to the data store at startup.
///
/// Holds the explicit overrides plus the loaded resource, and memoizes
/// the resolved data-file path for the lifetime of the value.
#[derive(Debug, Default)]
pub struct StoreConfig {
    datafile: Option<PathBuf>,
    os_locking: Option<bool>,
    resource: ConfigResource,
    resolved: OnceCell<PathBuf>,
}

impl StoreConfig {
    /// Configuration from the environment and the on-disk resource
    pub fn from_env() -> Self {
        StoreConfig {
            datafile: None,
            os_locking: None,
            resource: ConfigResource::load(),
            resolved: OnceCell::new(),
        }
    }

    /// Configuration backed by an explicit resource (tests, embedding)
    pub fn with_resource(resource: ConfigResource) -> Self {
        StoreConfig {
            resource,
            ..Self::default()
        }
    }

    /// Explicitly pin the data-file path, bypassing all other layers
    pub fn with_datafile(mut self, path: impl Into<PathBuf>) -> Self {
        self.datafile = Some(path.into());
        self
    }

    /// Explicitly enable or disable OS-level locking
    pub fn with_os_locking(mut self, enabled: bool) -> Self {
        self.os_locking = Some(enabled);
        self
    }

    /// Whether OS-level file locking is in effect.
    ///
    /// Explicit setting > environment switch > resource key > enabled.
    pub fn os_locking(&self) -> bool {
        if let Some(explicit) = self.os_locking {
            return explicit;
        }
        if let Ok(value) = env::var(OS_LOCKING_ENV) {
            return parse_bool(&value);
        }
        self.resource.os_locking.unwrap_or(true)
    }

    /// The shared data-file location, resolved once and cached.
    pub fn resolve_datafile(&self) -> &Path {
        self.resolved.get_or_init(|| {
            if let Some(explicit) = &self.datafile {
                return explicit.clone();
            }
            if let Ok(value) = env::var(DATAFILE_ENV) {
                return PathBuf::from(substitute_runtime_id(&value));
            }
            if let Some(value) = &self.resource.datafile {
                return PathBuf::from(substitute_runtime_id(value));
            }
            PathBuf::from(substitute_runtime_id(DEFAULT_DATAFILE_TEMPLATE))
        })
    }
}

/// Replace the `####` token with the current process id
pub fn substitute_runtime_id(name: &str) -> String {
    name.replace(RUNTIME_ID_TOKEN, &std::process::id().to_string())
}

fn parse_bool(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "false" | "0" | "no" | "off"
    )
}
