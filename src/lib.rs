//! # recentsguard
//!
//! Picks which installed apps get their task-switcher thumbnails hidden.
//!
//! - **Catalog scan**: enumerates installed apps, drops system components,
//!   icon-less apps, home screens and disabled apps, and sorts the rest with
//!   hidden apps first
//! - **Section index**: first-letter jump list for fast scrolling
//! - **Privacy list**: one comma-joined settings value holding the hidden
//!   packages, with toggle and reset operations
//!
//! The OS registry and the settings store are traits, so the same logic runs
//! against a device snapshot file, a JSON store, or in-memory fakes.

pub mod apps;
pub mod cli;
pub mod common;
pub mod privacy;
pub mod settings;

pub use apps::{AppCatalogScanner, AppEntry, AppRegistry, ScanResults, ScanTask, SectionIndex, SnapshotRegistry};
pub use common::errors::{GuardError, LookupError};
pub use privacy::{PrivacySet, PrivacyToggleService};
pub use settings::{FileSettingsStore, MemorySettingsStore, SettingsStore};
