//! User settings, persisted as TOML.
//!
//! Stored in the platform config folder unless `--settings` names a file:
//! - macOS: ~/Library/Application Support/dev.catalog.Catalog/
//! - Windows: %APPDATA%/catalog/Catalog/config/
//! - Linux: ~/.config/catalog/

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use catalog_core::BrowseOptions;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const APP_QUALIFIER: &str = "dev";
const APP_ORG: &str = "catalog";
const APP_NAME: &str = "Catalog";
const CONFIG_FILENAME: &str = "settings.toml";

/// Application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub browse: BrowseOptions,
    pub display: DisplaySettings,
}

/// How result tables are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Prefix for prices.
    pub currency: String,
    /// Notable attributes shown per row; 0 hides the column.
    pub notable_limit: usize,
    /// Show facet tags as a column in result tables.
    pub show_tags: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            currency: "$".to_string(),
            notable_limit: 3,
            show_tags: false,
        }
    }
}

/// Platform settings file, if the platform has a config folder.
pub fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Load settings.
///
/// An explicit path must exist and parse. The platform file is optional:
/// when it is missing or invalid, defaults are used.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        let content = fs::read_to_string(path)
            .with_context(|| format!("read settings {}", path.display()))?;
        let settings = parse_settings(&content)
            .with_context(|| format!("parse settings {}", path.display()))?;
        info!(path = %path.display(), "loaded settings");
        return Ok(settings);
    }

    let Some(path) = settings_path() else {
        warn!("could not determine settings path, using defaults");
        return Ok(Settings::default());
    };
    let settings = match fs::read_to_string(&path) {
        Ok(content) => match parse_settings(&content) {
            Ok(settings) => {
                info!(path = %path.display(), "loaded settings");
                settings
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "invalid settings file, using defaults");
                Settings::default()
            }
        },
        Err(error) if error.kind() == ErrorKind::NotFound => Settings::default(),
        Err(error) => {
            warn!(path = %path.display(), %error, "unreadable settings file, using defaults");
            Settings::default()
        }
    };
    Ok(settings)
}

pub fn parse_settings(content: &str) -> Result<Settings> {
    Ok(toml::from_str(content)?)
}

/// Render settings as they would be saved.
pub fn render_settings(settings: &Settings) -> Result<String> {
    toml::to_string_pretty(settings).context("serialize settings")
}

/// Write settings to `path`, creating its parent directory.
pub fn save_settings(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config directory {}", parent.display()))?;
    }
    fs::write(path, render_settings(settings)?)
        .with_context(|| format!("write settings {}", path.display()))?;
    info!(path = %path.display(), "saved settings");
    Ok(())
}
