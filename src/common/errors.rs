use std::path::PathBuf;

/// Error types for recentsguard operations.
/// The binary wraps these in `anyhow` for reporting, but library modules
/// return them directly so callers can tell a broken store from a bad config.
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    /// The settings store cannot be read or written
    #[error("Settings store unavailable at '{}': {message}", .path.display())]
    StoreUnavailable { path: PathBuf, message: String },

    /// Configuration file is invalid
    #[error("Config error in '{}': {message}", .path.display())]
    ConfigError { path: PathBuf, message: String },

    /// Device snapshot cannot be loaded
    #[error("Registry error in '{}': {message}", .path.display())]
    RegistryError { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, GuardError>;

/// Failure of a single per-package lookup (icon, signature).
///
/// These never abort a scan; filters fall back to the conservative answer.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("package '{0}' not found")]
    PackageNotFound(String),

    #[error("lookup failed for '{package}': {message}")]
    Io { package: String, message: String },
}
