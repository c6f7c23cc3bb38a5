//! Role assignment and loader configuration synthesis.
//!
//! The flow for one opened file is:
//!
//! 1. [`ImportSession::new`] wraps the file model in a [`RoleAssignmentSession`].
//! 2. The caller assigns components to roles, optionally starting from
//!    [`suggest_roles`].
//! 3. [`ImportSession::confirm`] runs [`synthesize`] once, picks a template
//!    with [`select_template`] and hands both to a [`LoaderRenderer`].
//!
//! Stored configurations live in a [`LoaderRepository`] and can be checked
//! against new files with [`check_config`].

pub mod check;
pub mod driver;
pub mod error;
pub mod repository;
pub mod session;
pub mod suggest;
pub mod synthesize;
pub mod template;

pub use check::{ConfigMismatch, check_config};
pub use driver::{ConfirmError, ImportSession, LoaderRenderer};
pub use error::{MappingError, Result};
pub use repository::{LoaderMetadata, LoaderRepository, read_config};
pub use session::{
    Binding, MaskBinding, RoleAssignment, RoleAssignmentSession, UncertaintyBinding,
};
pub use suggest::{RoleSuggestion, normalize_text, role_score, suggest_roles};
pub use synthesize::synthesize;
pub use template::{TemplateId, select_template};
