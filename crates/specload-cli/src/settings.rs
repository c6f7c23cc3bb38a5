//! User settings, loaded from `settings.toml`.
//!
//! The default location is the platform config directory:
//! - Linux: ~/.config/specload/
//! - macOS: ~/Library/Application Support/org.specload.specload/
//! - Windows: %APPDATA%/specload/specload/config/

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::render::OutputFormat;

const APP_QUALIFIER: &str = "org";
const APP_ORG: &str = "specload";
const APP_NAME: &str = "specload";
const CONFIG_FILENAME: &str = "settings.toml";
const LOADER_DIR: &str = "loaders";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub output: OutputSettings,
    pub repository: RepositorySettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Format used when `--format` is not given.
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositorySettings {
    /// Directory holding stored loader configurations.
    pub dir: Option<PathBuf>,
}

impl Settings {
    /// Configured repository directory, or the platform data directory.
    pub fn repository_dir(&self) -> Option<PathBuf> {
        self.repository.dir.clone().or_else(|| {
            ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
                .map(|dirs| dirs.data_dir().join(LOADER_DIR))
        })
    }
}

/// Default settings file path; `None` when no home directory is known.
pub fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Load settings from `explicit` or the default path.
///
/// Returns defaults when the file is missing, unreadable or malformed.
pub fn load_settings(explicit: Option<&Path>) -> Settings {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match settings_path() {
            Some(path) => path,
            None => {
                tracing::warn!("could not determine settings path, using defaults");
                return Settings::default();
            }
        },
    };

    match fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                tracing::debug!(path = %path.display(), "loaded settings");
                settings
            }
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    %error,
                    "failed to parse settings file, using defaults"
                );
                Settings::default()
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            if explicit.is_some() {
                tracing::warn!(path = %path.display(), "settings file not found, using defaults");
            } else {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
            }
            Settings::default()
        }
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                %error,
                "failed to read settings file, using defaults"
            );
            Settings::default()
        }
    }
}
