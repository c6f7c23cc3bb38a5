//! Loader repository for persisting and reusing loader configurations.
//!
//! Each configuration is stored as YAML under `{name}.yaml`, with the name
//! reduced to characters that are safe in file names. A stored configuration
//! can later be checked against a new file with [`crate::check_config`].

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use specload_model::LoaderConfig;

use crate::template::{TemplateId, select_template};

const SUFFIX: &str = "yaml";

/// Directory of stored loader configurations.
#[derive(Debug, Clone)]
pub struct LoaderRepository {
    base_dir: PathBuf,
}

/// Summary of one stored configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderMetadata {
    pub name: String,
    pub file_path: PathBuf,
    pub extension: Vec<String>,
    pub template: TemplateId,
}

impl LoaderRepository {
    /// Open the repository at `base_dir`, creating the directory if needed.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).with_context(|| {
            format!("Failed to create loader repository: {}", base_dir.display())
        })?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Write `config`, replacing any stored configuration with the same name.
    ///
    /// Distinct names can share a file stem (`a b` and `a_b`); saving over a
    /// file that holds a different loader is refused.
    pub fn save(&self, config: &LoaderConfig) -> Result<PathBuf> {
        let path = self.path_for(config.name());
        if let Ok(stored) = read_config(&path)
            && stored.name() != config.name()
        {
            bail!(
                "Cannot save loader '{}': {} already holds loader '{}'",
                config.name(),
                path.display(),
                stored.name()
            );
        }
        let yaml = serde_yaml::to_string(config)
            .with_context(|| format!("Failed to serialize loader {}", config.name()))?;
        fs::write(&path, yaml)
            .with_context(|| format!("Failed to write loader to {}", path.display()))?;
        tracing::info!(name = config.name(), path = %path.display(), "saved loader configuration");
        Ok(path)
    }

    /// Load a configuration by name. Returns `None` if none is stored.
    pub fn load(&self, name: &str) -> Result<Option<LoaderConfig>> {
        let path = self.path_for(name);
        if !path.exists() {
            return Ok(None);
        }
        let config = read_config(&path)?;
        if config.name() != name {
            tracing::debug!(
                name,
                stored = config.name(),
                path = %path.display(),
                "loader file holds a different name"
            );
            return Ok(None);
        }
        Ok(Some(config))
    }

    /// Every readable configuration, sorted by name.
    ///
    /// Files that do not parse as a loader configuration are skipped.
    pub fn list(&self) -> Result<Vec<LoaderMetadata>> {
        let mut metadata = Vec::new();

        for entry in fs::read_dir(&self.base_dir)
            .with_context(|| format!("Failed to read repository: {}", self.base_dir.display()))?
        {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(SUFFIX) {
                continue;
            }
            match read_config(&path) {
                Ok(config) => metadata.push(LoaderMetadata {
                    name: config.name().to_string(),
                    template: select_template(&config),
                    extension: config.extension().to_vec(),
                    file_path: path,
                }),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable loader");
                }
            }
        }

        metadata.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(metadata)
    }

    /// Delete a stored configuration, returning whether it existed.
    pub fn delete(&self, name: &str) -> Result<bool> {
        let path = self.path_for(name);
        if self.load(name)?.is_some() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to delete loader: {}", path.display()))?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn exists(&self, name: &str) -> bool {
        self.load(name).is_ok_and(|config| config.is_some())
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.base_dir.join(format!("{}.{SUFFIX}", file_stem(name)))
    }
}

/// Read one configuration file.
pub fn read_config(path: &Path) -> Result<LoaderConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read loader from {}", path.display()))?;
    serde_yaml::from_str(&contents)
        .with_context(|| format!("Failed to parse loader from {}", path.display()))
}

/// Reduce a loader name to a file-name-safe stem.
fn file_stem(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
