use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::errors::GuardError;

/// Settings key the task switcher reads its hidden-package list from
pub const DEFAULT_SETTINGS_KEY: &str = "sysui_recents_privacy";

/// Global recentsguard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Key holding the comma-joined package list
    #[serde(default = "default_settings_key")]
    pub settings_key: String,

    /// Settings store file (defaults to ~/.recentsguard/settings.json)
    #[serde(default)]
    pub store_path: Option<PathBuf>,

    /// Device snapshot file (defaults to ~/.recentsguard/registry.toml)
    #[serde(default)]
    pub registry_path: Option<PathBuf>,

    /// Also write logs to ~/.recentsguard/logs
    #[serde(default)]
    pub log_to_file: bool,

    /// Output format preference
    #[serde(default)]
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Quiet,
}

fn default_settings_key() -> String {
    DEFAULT_SETTINGS_KEY.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settings_key: default_settings_key(),
            store_path: None,
            registry_path: None,
            log_to_file: false,
            output_format: OutputFormat::Human,
        }
    }
}

impl Config {
    /// Get the recentsguard data directory (~/.recentsguard)
    pub fn data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".recentsguard")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    /// Get the logs directory
    pub fn logs_dir() -> PathBuf {
        Self::data_dir().join("logs")
    }

    /// Load config from the default location, or defaults if not present
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let config: Config = toml::from_str(&contents).map_err(|e| GuardError::ConfigError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save config to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config dir: {}", dir.display()))?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Initialize all recentsguard directories
    pub fn init_dirs() -> Result<()> {
        for dir in &[Self::data_dir(), Self::logs_dir()] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        Ok(())
    }

    /// Resolved settings store file
    pub fn store_file(&self) -> PathBuf {
        self.store_path
            .clone()
            .unwrap_or_else(|| Self::data_dir().join("settings.json"))
    }

    /// Resolved device snapshot file
    pub fn registry_file(&self) -> PathBuf {
        self.registry_path
            .clone()
            .unwrap_or_else(|| Self::data_dir().join("registry.toml"))
    }

    /// Set a single value by key, as used by `config set`
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "settings_key" => {
                if value.is_empty() {
                    anyhow::bail!("settings_key cannot be empty");
                }
                self.settings_key = value.to_string();
            }
            "store_path" => self.store_path = non_empty_path(value),
            "registry_path" => self.registry_path = non_empty_path(value),
            "log_to_file" => {
                self.log_to_file = value
                    .parse()
                    .with_context(|| format!("Invalid boolean for log_to_file: {}", value))?;
            }
            "output_format" => {
                self.output_format = match value {
                    "human" => OutputFormat::Human,
                    "json" => OutputFormat::Json,
                    "quiet" => OutputFormat::Quiet,
                    other => anyhow::bail!("Unknown output format: {}", other),
                };
            }
            other => anyhow::bail!("Unknown config key: {}", other),
        }
        Ok(())
    }
}

fn non_empty_path(value: &str) -> Option<PathBuf> {
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}
