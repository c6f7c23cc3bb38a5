//! Import session driver.
//!
//! An [`ImportSession`] ties one opened file to its role assignment and ends
//! in exactly one of two ways: [`ImportSession::cancel`], which produces
//! nothing, or a successful [`ImportSession::confirm`], which synthesizes
//! once and hands the record to a [`LoaderRenderer`]. Both consume the
//! session, so the file model is released when the import ends.

use std::fmt;
use std::sync::Arc;

use specload_model::{DataFile, FormatTag, LoaderConfig, Role, RoleSpec};

use crate::error::{MappingError, Result};
use crate::session::{RoleAssignment, RoleAssignmentSession};
use crate::suggest::{RoleSuggestion, suggest_roles};
use crate::synthesize::synthesize;
use crate::template::{TemplateId, select_template};

/// Consumer of a synthesized configuration.
pub trait LoaderRenderer {
    type Output;

    fn render(&mut self, template: TemplateId, config: LoaderConfig) -> anyhow::Result<Self::Output>;
}

/// Why a confirmation did not produce a rendered loader.
pub enum ConfirmError {
    /// A mandatory role is unassigned; the session is handed back unchanged.
    Incomplete {
        session: Box<ImportSession>,
        missing: Role,
    },
    /// The renderer rejected the record.
    Render(anyhow::Error),
}

impl ConfirmError {
    /// Recover the session from an incomplete confirmation.
    pub fn into_session(self) -> Option<ImportSession> {
        match self {
            ConfirmError::Incomplete { session, .. } => Some(*session),
            ConfirmError::Render(_) => None,
        }
    }
}

impl fmt::Debug for ConfirmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfirmError::Incomplete { missing, .. } => f
                .debug_struct("Incomplete")
                .field("missing", missing)
                .finish_non_exhaustive(),
            ConfirmError::Render(err) => f.debug_tuple("Render").field(err).finish(),
        }
    }
}

impl fmt::Display for ConfirmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfirmError::Incomplete { missing, .. } => {
                write!(f, "cannot confirm: no component assigned to the {missing} role")
            }
            ConfirmError::Render(err) => write!(f, "failed to render loader: {err}"),
        }
    }
}

impl std::error::Error for ConfirmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfirmError::Incomplete { .. } => None,
            ConfirmError::Render(err) => Some(&**err),
        }
    }
}

/// One interactive import of one file.
#[derive(Debug)]
pub struct ImportSession {
    file: Arc<DataFile>,
    format: FormatTag,
    session: RoleAssignmentSession,
}

impl ImportSession {
    pub fn new(file: DataFile, format: FormatTag) -> Self {
        let file = Arc::new(file);
        tracing::info!(
            path = %file.path().display(),
            format = %format,
            datasets = file.datasets().len(),
            "import session started"
        );
        Self {
            session: RoleAssignmentSession::new(Arc::clone(&file)),
            file,
            format,
        }
    }

    pub fn file(&self) -> &DataFile {
        &self.file
    }

    pub fn format(&self) -> FormatTag {
        self.format
    }

    pub fn assign(&mut self, spec: RoleSpec, dataset: usize, component: &str) -> Result<()> {
        self.session.assign(spec, dataset, component)
    }

    pub fn is_complete(&self) -> bool {
        self.session.is_complete()
    }

    pub fn snapshot(&self) -> RoleAssignment {
        self.session.snapshot()
    }

    pub fn suggestions(&self) -> Vec<RoleSuggestion> {
        suggest_roles(&self.file)
    }

    /// Assign every suggested role that is still unassigned.
    ///
    /// Returns the number of roles filled in.
    pub fn apply_suggestions(&mut self) -> usize {
        let mut applied = 0;
        for suggestion in self.suggestions() {
            if self.session.assignment().binding(suggestion.role()).is_some() {
                continue;
            }
            if self
                .session
                .assign(suggestion.spec, suggestion.dataset, &suggestion.component)
                .is_ok()
            {
                applied += 1;
            }
        }
        applied
    }

    /// Synthesize the current assignment without ending the session.
    pub fn preview(&self, name: Option<&str>) -> Result<(TemplateId, LoaderConfig)> {
        let config = synthesize(self.session.assignment(), self.format, name)?;
        Ok((select_template(&config), config))
    }

    /// Discard the session. No record is produced.
    pub fn cancel(self) {
        tracing::info!(path = %self.file.path().display(), "import cancelled");
    }

    /// Synthesize once and pass the record with its template to `renderer`.
    pub fn confirm<R: LoaderRenderer>(
        self,
        name: Option<&str>,
        renderer: &mut R,
    ) -> std::result::Result<R::Output, ConfirmError> {
        let config = match synthesize(self.session.assignment(), self.format, name) {
            Ok(config) => config,
            Err(MappingError::IncompleteAssignment { missing }) => {
                tracing::debug!(%missing, "confirmation refused");
                return Err(ConfirmError::Incomplete {
                    session: Box::new(self),
                    missing,
                });
            }
            Err(err) => return Err(ConfirmError::Render(err.into())),
        };
        let template = select_template(&config);
        tracing::info!(
            path = %self.file.path().display(),
            name = config.name(),
            template = %template,
            "import confirmed"
        );
        renderer.render(template, config).map_err(ConfirmError::Render)
    }
}
