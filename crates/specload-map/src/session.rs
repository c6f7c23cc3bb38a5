//! Role assignment state for one opened file.
//!
//! A [`RoleAssignmentSession`] accumulates the user's choice of component for
//! each [`Role`]. Every assignment is validated against the file model; a
//! rejected assignment leaves the session untouched. [`RoleAssignmentSession::snapshot`]
//! hands out an independent copy that synthesis works from.

use std::sync::Arc;

use specload_model::{
    ComponentKind, DataFile, MaskDefinition, Role, RoleSpec, UncertaintyKind,
};

use crate::error::{MappingError, Result};

/// A component chosen for a role, as seen at assignment time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub dataset: usize,
    pub component: String,
    pub kind: ComponentKind,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UncertaintyBinding {
    pub binding: Binding,
    pub kind: UncertaintyKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskBinding {
    pub binding: Binding,
    pub definition: MaskDefinition,
}

/// Immutable view of a role assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleAssignment {
    pub dispersion: Option<Binding>,
    pub data: Option<Binding>,
    pub uncertainty: Option<UncertaintyBinding>,
    pub mask: Option<MaskBinding>,
}

impl RoleAssignment {
    /// The component bound to `role`, without role-specific options.
    pub fn binding(&self, role: Role) -> Option<&Binding> {
        match role {
            Role::Dispersion => self.dispersion.as_ref(),
            Role::Data => self.data.as_ref(),
            Role::Uncertainty => self.uncertainty.as_ref().map(|u| &u.binding),
            Role::Mask => self.mask.as_ref().map(|m| &m.binding),
        }
    }

    /// First mandatory role without a component, in [`Role::MANDATORY`] order.
    pub fn missing_role(&self) -> Option<Role> {
        Role::MANDATORY
            .into_iter()
            .find(|role| self.binding(*role).is_none())
    }

    pub fn is_complete(&self) -> bool {
        self.missing_role().is_none()
    }

    /// Roles with a component, in [`Role::ALL`] order.
    pub fn assigned_roles(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| self.binding(*role).is_some())
            .collect()
    }

    /// Role specification (with options) currently bound to `role`.
    pub fn spec(&self, role: Role) -> Option<RoleSpec> {
        match role {
            Role::Dispersion => self.dispersion.as_ref().map(|_| RoleSpec::Dispersion),
            Role::Data => self.data.as_ref().map(|_| RoleSpec::Data),
            Role::Uncertainty => self
                .uncertainty
                .as_ref()
                .map(|u| RoleSpec::Uncertainty(u.kind)),
            Role::Mask => self.mask.as_ref().map(|m| RoleSpec::Mask(m.definition)),
        }
    }
}

/// In-progress role assignment over one file model.
#[derive(Debug, Clone)]
pub struct RoleAssignmentSession {
    file: Arc<DataFile>,
    assignment: RoleAssignment,
}

impl RoleAssignmentSession {
    pub fn new(file: Arc<DataFile>) -> Self {
        Self {
            file,
            assignment: RoleAssignment::default(),
        }
    }

    pub fn file(&self) -> &DataFile {
        &self.file
    }

    /// Record or overwrite the component for the role named by `spec`.
    ///
    /// Fails with [`MappingError::UnknownComponent`] when `dataset` or
    /// `component` does not exist in the file; other roles are never touched.
    pub fn assign(&mut self, spec: RoleSpec, dataset: usize, component: &str) -> Result<()> {
        let Some(found) = self.file.component(dataset, component) else {
            tracing::debug!(role = %spec.role(), dataset, component, "rejected assignment");
            return Err(MappingError::UnknownComponent {
                dataset,
                component: component.to_string(),
            });
        };

        let binding = Binding {
            dataset,
            component: found.name().to_string(),
            kind: found.kind(),
            unit: found.unit().map(str::to_string),
        };
        tracing::debug!(role = %spec, dataset, component, kind = %binding.kind, "assigned role");

        match spec {
            RoleSpec::Dispersion => self.assignment.dispersion = Some(binding),
            RoleSpec::Data => self.assignment.data = Some(binding),
            RoleSpec::Uncertainty(kind) => {
                self.assignment.uncertainty = Some(UncertaintyBinding { binding, kind });
            }
            RoleSpec::Mask(definition) => {
                self.assignment.mask = Some(MaskBinding {
                    binding,
                    definition,
                });
            }
        }
        Ok(())
    }

    /// Remove the assignment for `role`, returning whether one existed.
    pub fn clear(&mut self, role: Role) -> bool {
        let slot_was_set = self.assignment.binding(role).is_some();
        match role {
            Role::Dispersion => self.assignment.dispersion = None,
            Role::Data => self.assignment.data = None,
            Role::Uncertainty => self.assignment.uncertainty = None,
            Role::Mask => self.assignment.mask = None,
        }
        slot_was_set
    }

    /// True iff dispersion and data are both assigned.
    pub fn is_complete(&self) -> bool {
        self.assignment.is_complete()
    }

    pub fn missing_role(&self) -> Option<Role> {
        self.assignment.missing_role()
    }

    pub fn assignment(&self) -> &RoleAssignment {
        &self.assignment
    }

    /// Copy of the current assignment; later calls to `assign` do not affect it.
    pub fn snapshot(&self) -> RoleAssignment {
        self.assignment.clone()
    }
}
