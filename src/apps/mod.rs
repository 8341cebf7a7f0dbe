pub mod filters;
pub mod loader;
pub mod registry;
pub mod scanner;
pub mod sections;

pub use filters::{ExclusionReason, EXCLUDED_PACKAGES};
pub use loader::ScanTask;
pub use registry::{AppRegistry, ApplicationInfo, HomeActivity, SnapshotApp, SnapshotRegistry};
pub use scanner::{sort_entries, AppCatalogScanner, AppEntry, ExcludedApp, ScanResults};
pub use sections::{section_label, Section, SectionIndex};
