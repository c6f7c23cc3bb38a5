//! Loader configuration synthesis.

use specload_model::{
    ColumnSource, ComponentKind, DispersionRule, DispersionSource, FormatTag, LoaderConfig,
    MaskSource, Role, UncertaintySource,
};
use uuid::Uuid;

use crate::error::{MappingError, Result};
use crate::session::{Binding, RoleAssignment};

/// Build the loader configuration described by a completed assignment.
///
/// The result depends only on the inputs, except that a missing or blank
/// `name` is replaced by a fresh random token on every call.
pub fn synthesize(
    assignment: &RoleAssignment,
    format: FormatTag,
    name: Option<&str>,
) -> Result<LoaderConfig> {
    let (Some(dispersion), Some(data)) = (&assignment.dispersion, &assignment.data) else {
        let missing = assignment.missing_role().unwrap_or(Role::Dispersion);
        tracing::debug!(%missing, "synthesis refused");
        return Err(MappingError::IncompleteAssignment { missing });
    };

    let name = name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_string);
    let policy = format.policy();

    let dispersion = match (dispersion.kind, policy.dispersion) {
        (ComponentKind::WcsAxis, DispersionRule::WcsAware) => DispersionSource::Wcs {
            wcs_hdu: dispersion.dataset,
        },
        _ => DispersionSource::Component {
            dispersion: column_source(dispersion),
        },
    };

    let uncertainty = assignment
        .uncertainty
        .as_ref()
        .map(|u| UncertaintySource {
            hdu: u.binding.dataset,
            col: u.binding.component.clone(),
            kind: u.kind,
        });

    let mask = assignment.mask.as_ref().map(|m| MaskSource {
        hdu: m.binding.dataset,
        col: m.binding.component.clone(),
        definition: m.definition.standard(),
    });

    let config = LoaderConfig::new(
        name,
        policy.extension,
        dispersion,
        column_source(data),
        uncertainty,
        mask,
    );
    tracing::info!(
        name = config.name(),
        format = %format,
        wcs = config.dispersion().is_wcs(),
        "synthesized loader configuration"
    );
    Ok(config)
}

fn column_source(binding: &Binding) -> ColumnSource {
    ColumnSource {
        hdu: binding.dataset,
        col: binding.component.clone(),
        unit: binding.unit.clone(),
    }
}
