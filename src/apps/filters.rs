use serde::Serialize;
use std::collections::HashSet;

use super::registry::{AppRegistry, ApplicationInfo};

/// System components that must never be offered for hiding
pub const EXCLUDED_PACKAGES: &[&str] = &[
    "com.android.systemui",
    "com.cyanogenmod.trebuchet",
    "com.android.inputmethod.latin",
    "com.vzw.apnservice",
    "com.android.providers.settings",
    "com.android.nfc",
    "com.android.mms.service",
    "com.android.providers.calendar",
    "android",
];

/// Why an installed application was left out of the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    Blocklisted,
    NoCustomIcon,
    HomeApp,
    Disabled,
}

impl std::fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExclusionReason::Blocklisted => write!(f, "System component"),
            ExclusionReason::NoCustomIcon => write!(f, "No icon"),
            ExclusionReason::HomeApp => write!(f, "Home app"),
            ExclusionReason::Disabled => write!(f, "Disabled"),
        }
    }
}

/// Exact match against the fixed exclusion list
pub fn is_excluded(package: &str) -> bool {
    EXCLUDED_PACKAGES.contains(&package)
}

/// An icon lookup failure counts as having an icon.
pub fn has_icon(registry: &dyn AppRegistry, package: &str) -> bool {
    match registry.has_custom_icon(package) {
        Ok(custom) => custom,
        Err(e) => {
            tracing::debug!(package, error = %e, "icon lookup failed, keeping app");
            true
        }
    }
}

/// A signature lookup failure counts as a mismatch.
pub fn signatures_match(registry: &dyn AppRegistry, first: &str, second: &str) -> bool {
    match registry.signatures_match(first, second) {
        Ok(matched) => matched,
        Err(e) => {
            tracing::debug!(first, second, error = %e, "signature check failed");
            false
        }
    }
}

/// Packages acting as the home screen.
///
/// Each home activity's own package is included. An alternate package
/// named in its metadata is included only when it is signed like the
/// declaring package.
pub fn resolve_home_packages(registry: &dyn AppRegistry) -> HashSet<String> {
    let mut home = HashSet::new();
    for activity in registry.home_activities() {
        if let Some(alternate) = activity.alternate_home_package.as_deref() {
            if signatures_match(registry, alternate, &activity.package) {
                home.insert(alternate.to_string());
            }
        }
        home.insert(activity.package);
    }
    home
}

/// Apply the exclusion filters in order, stopping at the first hit.
pub fn classify(
    app: &ApplicationInfo,
    registry: &dyn AppRegistry,
    home_packages: &HashSet<String>,
) -> Option<ExclusionReason> {
    if is_excluded(&app.package) {
        Some(ExclusionReason::Blocklisted)
    } else if !has_icon(registry, &app.package) {
        Some(ExclusionReason::NoCustomIcon)
    } else if home_packages.contains(&app.package) {
        Some(ExclusionReason::HomeApp)
    } else if !app.enabled {
        Some(ExclusionReason::Disabled)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apps::registry::{HomeActivity, SnapshotApp, SnapshotRegistry};

    fn app(package: &str, signing: Option<&str>) -> SnapshotApp {
        SnapshotApp {
            package: package.to_string(),
            title: package.to_string(),
            uid: 10000,
            enabled: true,
            custom_icon: true,
            signing_identity: signing.map(str::to_string),
        }
    }

    fn home(package: &str, alternate: Option<&str>) -> HomeActivity {
        HomeActivity {
            package: package.to_string(),
            alternate_home_package: alternate.map(str::to_string),
        }
    }

    #[test]
    fn test_fixed_exclusions_are_exact() {
        assert!(is_excluded("android"));
        assert!(is_excluded("com.android.systemui"));
        assert!(!is_excluded("android.test"));
        assert!(!is_excluded("com.android.systemui.extra"));
    }

    #[test]
    fn test_alternate_home_requires_matching_signature() {
        let registry = SnapshotRegistry::new(
            vec![
                app("com.launcher", Some("vendor")),
                app("com.launcher.proxy", Some("vendor")),
                app("com.other.proxy", Some("someone-else")),
            ],
            vec![
                home("com.launcher", Some("com.launcher.proxy")),
                home("com.launcher", Some("com.other.proxy")),
            ],
        );
        let packages = resolve_home_packages(&registry);
        assert!(packages.contains("com.launcher"));
        assert!(packages.contains("com.launcher.proxy"));
        assert!(!packages.contains("com.other.proxy"));
    }

    #[test]
    fn test_missing_alternate_package_is_not_home() {
        let registry = SnapshotRegistry::new(
            vec![app("com.launcher", Some("vendor"))],
            vec![home("com.launcher", Some("com.gone"))],
        );
        let packages = resolve_home_packages(&registry);
        assert_eq!(packages.len(), 1);
        assert!(packages.contains("com.launcher"));
    }

    #[test]
    fn test_icon_lookup_failure_keeps_app() {
        let registry = SnapshotRegistry::default();
        assert!(has_icon(&registry, "com.not.installed"));
    }

    #[test]
    fn test_classify_order() {
        let mut iconless = app("com.android.systemui", None);
        iconless.custom_icon = false;
        let registry = SnapshotRegistry::new(vec![iconless], vec![]);
        let info = ApplicationInfo {
            package: "com.android.systemui".to_string(),
            title: "System UI".to_string(),
            uid: 1000,
            enabled: false,
        };
        assert_eq!(
            classify(&info, &registry, &HashSet::new()),
            Some(ExclusionReason::Blocklisted)
        );
    }
}
