//! Persisted per-detector enable/disable configuration.
//!
//! The store owns the on-disk JSON file and an in-memory map guarded by
//! a lock, so several conversations can share one store: reads take a
//! cloned snapshot, and a toggle is a single read-modify-persist
//! critical section. Persistence is synchronous on every mutation, so a
//! crash never loses more than the toggle in flight.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::contextual::EntityCategory;
use crate::error::Result;
use crate::registry::PatternRegistry;

/// Outcome of a toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// The flag was flipped.
    ///
    /// `persisted` is false when the flip could not be written to disk;
    /// the in-memory value keeps the new state either way.
    Switched {
        /// The new enabled state.
        enabled: bool,
        /// Whether the new state reached durable storage.
        persisted: bool,
    },
    /// No detector with the requested name exists; nothing changed.
    Unknown,
}

/// A point-in-time view of every detector's enabled flag.
///
/// Snapshots are plain owned values passed explicitly into each
/// sanitize call, so a concurrent toggle can never produce a torn read
/// mid-pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterConfig {
    enabled: BTreeMap<String, bool>,
}

impl FilterConfig {
    /// A configuration with every registry detector enabled.
    #[must_use]
    pub fn all_enabled(registry: &PatternRegistry) -> Self {
        Self {
            enabled: registry
                .detector_names()
                .map(|name| (name.to_string(), true))
                .collect(),
        }
    }

    /// Merge persisted flags with the current registry.
    ///
    /// Registry detectors absent from `loaded` default to enabled;
    /// loaded keys that no longer correspond to a registry detector are
    /// dropped.
    #[must_use]
    pub fn reconcile(loaded: &BTreeMap<String, bool>, registry: &PatternRegistry) -> Self {
        Self {
            enabled: registry
                .detector_names()
                .map(|name| (name.to_string(), loaded.get(name).copied().unwrap_or(true)))
                .collect(),
        }
    }

    /// Whether the named detector is enabled. Unknown names are
    /// treated as disabled.
    #[must_use]
    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled.get(name).copied().unwrap_or(false)
    }

    /// The enabled flag for a known detector name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<bool> {
        self.enabled.get(name).copied()
    }

    /// The contextual categories currently enabled.
    #[must_use]
    pub fn enabled_categories(&self) -> Vec<EntityCategory> {
        EntityCategory::ALL
            .into_iter()
            .filter(|c| self.is_enabled(c.config_name()))
            .collect()
    }

    /// Every (name, enabled) pair, in name order.
    pub fn flags(&self) -> impl Iterator<Item = (&str, bool)> {
        self.enabled.iter().map(|(name, on)| (name.as_str(), *on))
    }
}

/// The filter configuration store.
#[derive(Debug)]
pub struct FilterStore {
    path: PathBuf,
    config: RwLock<FilterConfig>,
}

impl FilterStore {
    /// Open the store, loading persisted flags from `path`.
    ///
    /// A missing, unreadable, or malformed file falls back to
    /// all-enabled defaults; the failure is logged, never raised.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>, registry: &PatternRegistry) -> Self {
        let path = path.into();
        let config = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, bool>>(&raw) {
                Ok(loaded) => {
                    info!(path = %path.display(), "filter configuration loaded");
                    FilterConfig::reconcile(&loaded, registry)
                }
                Err(err) => {
                    warn!(path = %path.display(), %err, "malformed filter configuration, using defaults");
                    FilterConfig::all_enabled(registry)
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no filter configuration found, using defaults");
                FilterConfig::all_enabled(registry)
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "unreadable filter configuration, using defaults");
                FilterConfig::all_enabled(registry)
            }
        };

        Self {
            path,
            config: RwLock::new(config),
        }
    }

    /// Create an in-memory store with all detectors enabled.
    ///
    /// Toggles still persist to `path` on mutation.
    #[must_use]
    pub fn with_defaults(path: impl Into<PathBuf>, registry: &PatternRegistry) -> Self {
        Self {
            path: path.into(),
            config: RwLock::new(FilterConfig::all_enabled(registry)),
        }
    }

    /// Where the configuration is persisted.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A cloned snapshot of the current configuration.
    #[must_use]
    pub fn snapshot(&self) -> FilterConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Flip the flag for `name` and persist the full configuration.
    ///
    /// The write happens inside the same critical section as the flip,
    /// so concurrent toggles serialize and snapshots observe either the
    /// pre- or post-toggle state, never a mixture.
    pub fn toggle(&self, name: &str) -> Toggle {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);

        let Some(flag) = config.enabled.get_mut(name) else {
            return Toggle::Unknown;
        };
        *flag = !*flag;
        let enabled = *flag;

        let persisted = match Self::write(&self.path, &config) {
            Ok(()) => true,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "filter configuration not persisted");
                false
            }
        };

        Toggle::Switched { enabled, persisted }
    }

    /// Persist the current configuration.
    ///
    /// A failure leaves the in-memory state intact.
    pub fn save(&self) -> Result<()> {
        let config = self.config.read().unwrap_or_else(PoisonError::into_inner);
        Self::write(&self.path, &config)
    }

    fn write(path: &Path, config: &FilterConfig) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        fs::write(path, json)?;
        Ok(())
    }
}
