//! Format adapter trait and suffix-based registry.

use std::path::Path;

use specload_model::{DataFile, FormatTag};

use crate::error::{IngestError, Result};
use crate::fits::FitsAdapter;
use crate::simplify::simplify_arrays;
use crate::table::{AsciiAdapter, EcsvAdapter};

/// Turns a file on disk into the generic dataset model.
///
/// `parse` opens and releases the file itself; a failed parse never yields a
/// partial model.
pub trait FormatAdapter: Send + Sync {
    fn format(&self) -> FormatTag;

    /// Lower-case file suffixes this adapter claims, without the dot.
    fn suffixes(&self) -> &'static [&'static str];

    fn parse(&self, path: &Path) -> Result<DataFile>;

    /// Collapse redundant array representations.
    fn simplify(&self, file: DataFile) -> DataFile {
        simplify_arrays(file)
    }

    fn accepts(&self, path: &Path) -> bool {
        suffix(path).is_some_and(|s| self.suffixes().contains(&s.as_str()))
    }
}

/// A parsed and simplified file together with the format that produced it.
#[derive(Debug, Clone)]
pub struct OpenedFile {
    pub format: FormatTag,
    pub file: DataFile,
}

/// Ordered set of adapters; the first one that accepts a path wins.
pub struct AdapterRegistry {
    adapters: Vec<Box<dyn FormatAdapter>>,
}

impl AdapterRegistry {
    /// Registry without any adapter.
    pub fn empty() -> Self {
        Self {
            adapters: Vec::new(),
        }
    }

    /// Registry with the FITS, ECSV and delimited text adapters.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(FitsAdapter);
        registry.register(EcsvAdapter);
        registry.register(AsciiAdapter);
        registry
    }

    pub fn register(&mut self, adapter: impl FormatAdapter + 'static) {
        self.adapters.push(Box::new(adapter));
    }

    pub fn get(&self, format: FormatTag) -> Option<&dyn FormatAdapter> {
        self.adapters
            .iter()
            .find(|a| a.format() == format)
            .map(|a| a.as_ref())
    }

    /// Every claimed suffix, in registration order.
    pub fn suffixes(&self) -> Vec<&'static str> {
        self.adapters
            .iter()
            .flat_map(|a| a.suffixes().iter().copied())
            .collect()
    }

    pub fn for_path(&self, path: &Path) -> Result<&dyn FormatAdapter> {
        self.adapters
            .iter()
            .find(|a| a.accepts(path))
            .map(|a| a.as_ref())
            .ok_or_else(|| IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
                expected: self
                    .suffixes()
                    .iter()
                    .map(|s| format!(".{s}"))
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Parse and simplify `path` with the adapter its suffix selects.
    pub fn open(&self, path: &Path) -> Result<OpenedFile> {
        let adapter = self.for_path(path)?;
        tracing::info!(path = %path.display(), format = %adapter.format(), "opening file");
        let file = adapter.simplify(adapter.parse(path)?);
        tracing::info!(
            path = %path.display(),
            datasets = file.datasets().len(),
            components = file.component_count(),
            "file adapted"
        );
        Ok(OpenedFile {
            format: adapter.format(),
            file,
        })
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Open `path` with the default registry.
pub fn open_file(path: &Path) -> Result<OpenedFile> {
    AdapterRegistry::new().open(path)
}

fn suffix(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_for_path_is_case_insensitive() {
        let registry = AdapterRegistry::new();
        let adapter = registry.for_path(Path::new("/data/SPEC.FITS")).unwrap();
        assert_eq!(adapter.format(), FormatTag::Fits);
        let adapter = registry.for_path(Path::new("table.Ecsv")).unwrap();
        assert_eq!(adapter.format(), FormatTag::Ecsv);
        let adapter = registry.for_path(Path::new("table.txt")).unwrap();
        assert_eq!(adapter.format(), FormatTag::Ascii);
    }

    #[test]
    fn test_unknown_suffix_is_unsupported() {
        let registry = AdapterRegistry::new();
        for name in ["spectrum.h5", "no_suffix"] {
            let err = registry.for_path(&PathBuf::from(name)).err().unwrap();
            assert!(matches!(err, IngestError::UnsupportedFormat { .. }));
        }
        let err = registry.for_path(Path::new("x.h5")).err().unwrap();
        assert_eq!(
            err.to_string(),
            "unsupported file format: x.h5 (expected one of: .fits, .fit, .fts, .ecsv, .dat, .txt)"
        );
    }

    #[test]
    fn test_empty_registry_rejects_everything() {
        let registry = AdapterRegistry::empty();
        assert!(registry.for_path(Path::new("x.fits")).is_err());
        assert!(registry.get(FormatTag::Fits).is_none());
    }
}
