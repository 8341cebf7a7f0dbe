use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::common::errors::{GuardError, LookupError, Result};

/// An installed application as reported by the OS registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationInfo {
    pub package: String,
    pub title: String,
    pub uid: u32,
    pub enabled: bool,
}

/// An activity that answers the home intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeActivity {
    /// Package declaring the activity
    pub package: String,
    /// Package named by the activity's "alternate home" metadata
    #[serde(default)]
    pub alternate_home_package: Option<String>,
}

/// Read-only view of the device's application registry.
///
/// Per-package lookups return `LookupError` for missing packages or I/O
/// trouble; the scanner absorbs those and never aborts on them.
pub trait AppRegistry: Send + Sync {
    fn installed_applications(&self) -> Vec<ApplicationInfo>;

    /// Whether the app's icon differs from the platform fallback icon
    fn has_custom_icon(&self, package: &str) -> std::result::Result<bool, LookupError>;

    /// Whether two packages are signed by the same identity
    fn signatures_match(&self, first: &str, second: &str) -> std::result::Result<bool, LookupError>;

    fn home_activities(&self) -> Vec<HomeActivity>;
}

/// One `[[apps]]` table of a device snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotApp {
    pub package: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub uid: u32,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub custom_icon: bool,
    #[serde(default)]
    pub signing_identity: Option<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    apps: Vec<SnapshotApp>,
    #[serde(default)]
    home_activities: Vec<HomeActivity>,
}

/// Registry backed by a TOML device snapshot.
///
/// ```toml
/// [[apps]]
/// package = "com.example.mail"
/// title = "Mail"
/// uid = 10042
/// signing_identity = "example-release"
///
/// [[home_activities]]
/// package = "com.example.launcher"
/// alternate_home_package = "com.example.launcher.proxy"
/// ```
#[derive(Debug, Clone, Default)]
pub struct SnapshotRegistry {
    apps: Vec<SnapshotApp>,
    by_package: HashMap<String, usize>,
    home_activities: Vec<HomeActivity>,
}

impl SnapshotRegistry {
    pub fn new(apps: Vec<SnapshotApp>, home_activities: Vec<HomeActivity>) -> Self {
        let by_package = apps
            .iter()
            .enumerate()
            .map(|(idx, app)| (app.package.clone(), idx))
            .collect();
        Self {
            apps,
            by_package,
            home_activities,
        }
    }

    /// Parse a snapshot from TOML text
    pub fn from_toml(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        let snapshot: Snapshot = toml::from_str(contents)?;
        Ok(Self::new(snapshot.apps, snapshot.home_activities))
    }

    /// Load a snapshot file
    pub fn load(path: &Path) -> Result<Self> {
        let registry_error = |message: String| GuardError::RegistryError {
            path: path.to_path_buf(),
            message,
        };
        let contents = std::fs::read_to_string(path).map_err(|e| registry_error(e.to_string()))?;
        let registry = Self::from_toml(&contents).map_err(|e| registry_error(e.to_string()))?;
        tracing::debug!(
            apps = registry.apps.len(),
            home_activities = registry.home_activities.len(),
            path = %path.display(),
            "device snapshot loaded"
        );
        Ok(registry)
    }

    fn app(&self, package: &str) -> std::result::Result<&SnapshotApp, LookupError> {
        self.by_package
            .get(package)
            .map(|&idx| &self.apps[idx])
            .ok_or_else(|| LookupError::PackageNotFound(package.to_string()))
    }
}

impl AppRegistry for SnapshotRegistry {
    fn installed_applications(&self) -> Vec<ApplicationInfo> {
        self.apps
            .iter()
            .map(|app| ApplicationInfo {
                package: app.package.clone(),
                title: app.title.clone(),
                uid: app.uid,
                enabled: app.enabled,
            })
            .collect()
    }

    fn has_custom_icon(&self, package: &str) -> std::result::Result<bool, LookupError> {
        Ok(self.app(package)?.custom_icon)
    }

    fn signatures_match(&self, first: &str, second: &str) -> std::result::Result<bool, LookupError> {
        let first = self.app(first)?;
        let second = self.app(second)?;
        match (&first.signing_identity, &second.signing_identity) {
            (Some(a), Some(b)) => Ok(a == b),
            _ => Ok(false),
        }
    }

    fn home_activities(&self) -> Vec<HomeActivity> {
        self.home_activities.clone()
    }
}
