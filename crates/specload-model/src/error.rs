//! Error types for dataset model construction.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while assembling a [`DataFile`](crate::DataFile).
#[derive(Debug, Error)]
pub enum ModelError {
    /// The adapter found no datasets in the file.
    #[error("file contains no datasets: {path}")]
    EmptyFile { path: PathBuf },

    /// Two components of one dataset share a name.
    #[error("dataset {dataset} has more than one component named '{component}'")]
    DuplicateComponent { dataset: usize, component: String },

    /// A dataset (or one of its components) claims a position other than its own.
    #[error("dataset at position {position} is labelled as index {index}")]
    DatasetIndexMismatch { position: usize, index: usize },
}

pub type Result<T> = std::result::Result<T, ModelError>;
