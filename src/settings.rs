//! User settings
//!
//! Stored as `settings.ron` in the per-user config directory, with
//! environment variable overrides.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Overrides the tier file path
pub const TIERS_ENV: &str = "RANKLINE_TIERS";
/// Overrides the log filter (env_logger syntax)
pub const LOG_ENV: &str = "RANKLINE_LOG";

/// How rank info is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RON tier file; the built-in table is used when unset
    pub tiers_path: Option<PathBuf>,
    pub log_filter: String,
    pub output: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tiers_path: None,
            log_filter: "warn".to_string(),
            output: OutputFormat::Json,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
}

impl Settings {
    /// Parse settings from RON source
    pub fn from_ron(content: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(content)
    }

    /// Apply overrides from a variable lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(TIERS_ENV).filter(|v| !v.is_empty()) {
            log::debug!("{} overrides tiers path: {}", TIERS_ENV, path);
            self.tiers_path = Some(PathBuf::from(path));
        }
        if let Some(filter) = lookup(LOG_ENV).filter(|v| !v.is_empty()) {
            self.log_filter = filter;
        }
        self
    }
}

/// Get the settings file path
pub fn settings_path() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "rankline", "Rankline") {
        let mut path = proj_dirs.config_dir().to_path_buf();
        path.push("settings.ron");
        path
    } else {
        PathBuf::from("./settings.ron")
    }
}

/// Load settings (or defaults), then apply environment overrides
pub fn load_settings() -> Settings {
    load_settings_from(&settings_path()).with_overrides(|key| env::var(key).ok())
}

/// Load settings from a file, falling back to defaults when missing or malformed
pub fn load_settings_from(path: &Path) -> Settings {
    if !path.exists() {
        log::debug!("No settings at {:?}, using defaults", path);
        return Settings::default();
    }

    match fs::read_to_string(path) {
        Ok(data) => match Settings::from_ron(&data) {
            Ok(loaded) => {
                log::debug!("Settings loaded from {:?}", path);
                loaded
            }
            Err(e) => {
                log::warn!("Failed to parse settings: {}, using defaults", e);
                Settings::default()
            }
        },
        Err(e) => {
            log::warn!("Failed to read settings: {}, using defaults", e);
            Settings::default()
        }
    }
}

/// Save settings to the config directory
pub fn save_settings(settings: &Settings) -> Result<(), SettingsError> {
    save_settings_to(&settings_path(), settings)
}

/// Save settings to a file, creating parent directories
pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = ron::ser::to_string_pretty(settings, ron::ser::PrettyConfig::default())?;
    fs::write(path, content)?;

    log::info!("Settings saved to {:?}", path);
    Ok(())
}
