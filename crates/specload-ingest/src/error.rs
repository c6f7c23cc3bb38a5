//! Error types for format adaptation.

use std::path::{Path, PathBuf};

use specload_model::ModelError;
use thiserror::Error;

/// Errors that can occur while turning a file into a dataset model.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Dispatch ===
    /// No adapter handles the file's suffix.
    #[error("unsupported file format: {path} (expected one of: {expected})")]
    UnsupportedFormat { path: PathBuf, expected: String },

    // === File System Errors ===
    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parsing Errors ===
    /// Structurally invalid FITS file.
    #[error("invalid FITS file {path}: {message}")]
    FitsParse { path: PathBuf, message: String },

    /// Structurally invalid ECSV or delimited text table.
    #[error("failed to parse table {path}: {message}")]
    TableParse { path: PathBuf, message: String },

    // === Model Errors ===
    /// The parsed content violates a model invariant (e.g. no datasets).
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl IngestError {
    /// Classify an I/O failure on `path`.
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub(crate) fn fits(path: &Path, message: impl Into<String>) -> Self {
        Self::FitsParse {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub(crate) fn table(path: &Path, message: impl Into<String>) -> Self {
        Self::TableParse {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// True when the failure means the file had nothing to import.
    pub fn is_empty_file(&self) -> bool {
        matches!(self, Self::Model(ModelError::EmptyFile { .. }))
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
