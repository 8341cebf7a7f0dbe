use std::sync::Arc;

use super::codec::PrivacySet;
use crate::apps::scanner::AppEntry;
use crate::common::errors::Result;
use crate::settings::{read_seeded, SettingsStore};

/// Reads and flips per-package "hide thumbnail" flags in the settings store.
///
/// Every call is a fresh read-modify-write of one shared value. Callers on
/// different threads or processes race; the last write wins.
#[derive(Clone)]
pub struct PrivacyToggleService {
    store: Arc<dyn SettingsStore>,
    key: String,
}

impl PrivacyToggleService {
    pub fn new(store: Arc<dyn SettingsStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current package set, seeding the key with `""` when absent
    pub fn current(&self) -> Result<PrivacySet> {
        let raw = read_seeded(self.store.as_ref(), &self.key)?;
        Ok(PrivacySet::decode(Some(&raw)))
    }

    /// Add or remove `package` and return the resulting state.
    ///
    /// A request that changes nothing (enable when already enabled, disable
    /// when absent) writes nothing and returns `!enabled`, not the actual
    /// membership. Callers store the return value as the new state.
    pub fn set_enabled(&self, package: &str, enabled: bool) -> Result<bool> {
        let mut set = self.current()?;
        let changed = if enabled {
            set.insert(package)
        } else {
            set.remove(package)
        };

        if !changed {
            tracing::debug!(package, enabled, "privacy flag unchanged, skipping write");
            return Ok(!enabled);
        }

        self.store.put(&self.key, &set.encode())?;
        tracing::info!(package, enabled, "privacy flag updated");
        Ok(enabled)
    }

    pub fn is_enabled(&self, package: &str) -> Result<bool> {
        Ok(self.current()?.contains(package))
    }

    /// Flip the flag of a scanned entry and store the returned state on it
    pub fn toggle(&self, entry: &mut AppEntry) -> Result<bool> {
        let state = self.set_enabled(&entry.package, !entry.privacy_hidden)?;
        entry.privacy_hidden = state;
        Ok(state)
    }

    /// Clear the hidden flag for every package
    pub fn reset(&self) -> Result<()> {
        self.store.put(&self.key, "")?;
        tracing::info!(key = %self.key, "privacy list reset");
        Ok(())
    }
}

impl std::fmt::Debug for PrivacyToggleService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivacyToggleService")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
