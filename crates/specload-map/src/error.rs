//! Error types for role assignment and synthesis.

use specload_model::Role;
use thiserror::Error;

/// Errors from assigning roles or synthesizing a loader configuration.
///
/// Both variants are recoverable: the session that produced them is left
/// exactly as it was before the failing call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// The referenced dataset or component does not exist in the file.
    #[error("unknown component: dataset {dataset} has no component named '{component}'")]
    UnknownComponent { dataset: usize, component: String },

    /// Synthesis was requested before every mandatory role was assigned.
    #[error("assignment incomplete: no component assigned to the {missing} role")]
    IncompleteAssignment { missing: Role },
}

/// Result type for mapping operations.
pub type Result<T> = std::result::Result<T, MappingError>;
