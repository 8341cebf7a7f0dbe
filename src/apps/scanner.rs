use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use super::filters::{self, ExclusionReason};
use super::registry::{AppRegistry, ApplicationInfo};
use crate::common::errors::Result;
use crate::privacy::PrivacyToggleService;

/// An application offered for thumbnail hiding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppEntry {
    pub title: String,
    pub package: String,
    pub uid: u32,
    pub enabled: bool,
    pub privacy_hidden: bool,
}

/// An installed application left out of the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExcludedApp {
    pub package: String,
    pub title: String,
    pub reason: ExclusionReason,
}

/// Full output of one catalog scan
#[derive(Debug, Clone, Serialize)]
pub struct ScanResults {
    pub entries: Vec<AppEntry>,
    pub excluded: Vec<ExcludedApp>,
    pub duration_secs: f64,
    pub scanned_at: chrono::DateTime<chrono::Utc>,
}

impl ScanResults {
    pub fn hidden_count(&self) -> usize {
        self.entries.iter().filter(|e| e.privacy_hidden).count()
    }
}

/// Builds the sorted list of apps whose thumbnails can be hidden.
///
/// Scanning only reads: the registry, and the settings store through the
/// toggle service (which may seed an absent key). Dropping a scan midway
/// leaves nothing to undo.
#[derive(Clone)]
pub struct AppCatalogScanner {
    registry: Arc<dyn AppRegistry>,
    privacy: PrivacyToggleService,
}

impl AppCatalogScanner {
    pub fn new(registry: Arc<dyn AppRegistry>, privacy: PrivacyToggleService) -> Self {
        Self { registry, privacy }
    }

    /// Sorted entries for display
    pub fn scan(&self) -> Result<Vec<AppEntry>> {
        Ok(self.scan_detailed()?.entries)
    }

    /// Sorted entries plus the packages each filter removed
    pub fn scan_detailed(&self) -> Result<ScanResults> {
        let start = Instant::now();
        let hidden = self.privacy.current()?;
        let registry = self.registry.as_ref();
        let home_packages = filters::resolve_home_packages(registry);
        let applications = registry.installed_applications();

        let classified: Vec<(ApplicationInfo, Option<ExclusionReason>)> = applications
            .into_par_iter()
            .map(|app| {
                let reason = filters::classify(&app, registry, &home_packages);
                (app, reason)
            })
            .collect();

        let mut entries = Vec::new();
        let mut excluded = Vec::new();
        for (app, reason) in classified {
            match reason {
                Some(reason) => {
                    tracing::debug!(package = %app.package, %reason, "excluded from catalog");
                    excluded.push(ExcludedApp {
                        package: app.package,
                        title: app.title,
                        reason,
                    });
                }
                None => {
                    let privacy_hidden = hidden.contains(&app.package);
                    entries.push(AppEntry {
                        title: app.title,
                        package: app.package,
                        uid: app.uid,
                        enabled: app.enabled,
                        privacy_hidden,
                    });
                }
            }
        }

        sort_entries(&mut entries);

        tracing::debug!(
            entries = entries.len(),
            excluded = excluded.len(),
            "catalog scan finished"
        );

        Ok(ScanResults {
            entries,
            excluded,
            duration_secs: start.elapsed().as_secs_f64(),
            scanned_at: chrono::Utc::now(),
        })
    }
}

/// Hidden apps first, then by title ignoring case
pub fn sort_entries(entries: &mut [AppEntry]) {
    entries.sort_by(|a, b| {
        b.privacy_hidden
            .cmp(&a.privacy_hidden)
            .then_with(|| compare_ignore_case(&a.title, &b.title))
    });
}

fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}
