//! Datasets and the file-level tree that holds them.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::component::Component;
use crate::error::{ModelError, Result};

/// One self-contained data unit inside a file (an HDU, a table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    index: usize,
    label: String,
    components: Vec<Component>,
    meta: BTreeMap<String, String>,
}

impl Dataset {
    pub fn new(index: usize, label: impl Into<String>) -> Self {
        Self {
            index,
            label: label.into(),
            components: Vec::new(),
            meta: BTreeMap::new(),
        }
    }

    /// Append a component; discovery order is preserved.
    #[must_use]
    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    #[must_use]
    pub fn with_components(mut self, components: impl IntoIterator<Item = Component>) -> Self {
        self.components.extend(components);
        self
    }

    #[must_use]
    pub fn with_meta(mut self, meta: BTreeMap<String, String>) -> Self {
        self.meta = meta;
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn meta(&self) -> &BTreeMap<String, String> {
        &self.meta
    }

    /// Look up a component by exact name.
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name() == name)
    }

    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(Component::name)
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// The first world-coordinate axis component, if the dataset has one.
    pub fn wcs_axis(&self) -> Option<&Component> {
        self.components.iter().find(|c| c.is_wcs_axis())
    }

    fn validate(&self, position: usize) -> Result<()> {
        if self.index != position {
            return Err(ModelError::DatasetIndexMismatch {
                position,
                index: self.index,
            });
        }
        let mut seen = BTreeSet::new();
        for component in &self.components {
            if component.dataset() != position {
                return Err(ModelError::DatasetIndexMismatch {
                    position,
                    index: component.dataset(),
                });
            }
            if !seen.insert(component.name()) {
                return Err(ModelError::DuplicateComponent {
                    dataset: position,
                    component: component.name().to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Root of the generic dataset model: a file and its ordered datasets.
///
/// Read-only once built. Every component belongs to exactly one dataset
/// and names are unique within a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFile {
    path: PathBuf,
    datasets: Vec<Dataset>,
}

impl DataFile {
    /// Assemble a file model, rejecting files without datasets.
    pub fn new(path: impl Into<PathBuf>, datasets: Vec<Dataset>) -> Result<Self> {
        let path = path.into();
        if datasets.is_empty() {
            return Err(ModelError::EmptyFile { path });
        }
        for (position, dataset) in datasets.iter().enumerate() {
            dataset.validate(position)?;
        }
        Ok(Self { path, datasets })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    pub fn dataset(&self, index: usize) -> Option<&Dataset> {
        self.datasets.get(index)
    }

    /// Resolve a component by dataset index and component name.
    pub fn component(&self, dataset: usize, name: &str) -> Option<&Component> {
        self.dataset(dataset).and_then(|d| d.component(name))
    }

    /// All components in file order, dataset by dataset.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.datasets.iter().flat_map(|d| d.components().iter())
    }

    pub fn component_count(&self) -> usize {
        self.datasets.iter().map(|d| d.components().len()).sum()
    }

    /// Rewrite every component in place of the tree.
    ///
    /// The closure must keep names and origins; only representation details
    /// (shape, unit) are expected to change.
    #[must_use]
    pub fn map_components(self, mut f: impl FnMut(Component) -> Component) -> Self {
        let datasets = self
            .datasets
            .into_iter()
            .map(|dataset| Dataset {
                components: dataset.components.into_iter().map(&mut f).collect(),
                ..dataset
            })
            .collect();
        Self {
            path: self.path,
            datasets,
        }
    }
}
