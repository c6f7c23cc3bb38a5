//! Role suggestions from component names.
//!
//! Each role has a small vocabulary of names it usually goes by. A
//! component's score for a role is the best Jaro-Winkler similarity between
//! its normalized name and any vocabulary term. Suggestions are advisory:
//! nothing here touches a session.

use rapidfuzz::distance::jaro_winkler::similarity as jaro_similarity;
use specload_model::{Component, DataFile, MaskDefinition, Role, RoleSpec, UncertaintyKind};

/// Minimum similarity for a name-based suggestion.
pub const MIN_SCORE: f64 = 0.85;

const DISPERSION_TERMS: &[&str] = &[
    "wavelength",
    "wave",
    "lambda",
    "loglam",
    "dispersion",
    "spectral axis",
    "frequency",
    "freq",
    "energy",
    "wavenumber",
];
const DATA_TERMS: &[&str] = &[
    "flux", "data", "sci", "spectrum", "spec", "intensity", "counts", "flam", "fnu",
];
const UNCERTAINTY_TERMS: &[&str] = &[
    "error",
    "err",
    "uncertainty",
    "sigma",
    "stddev",
    "std",
    "noise",
    "ivar",
    "inverse variance",
    "flux error",
];
const MASK_TERMS: &[&str] = &["mask", "dq", "quality", "flag", "flags", "bitmask", "and mask"];

/// A proposed assignment for one role.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleSuggestion {
    pub spec: RoleSpec,
    pub dataset: usize,
    pub component: String,
    /// Similarity in `[0, 1]`; spectral WCS axes score `1.0` for dispersion.
    pub score: f64,
}

impl RoleSuggestion {
    pub fn role(&self) -> Role {
        self.spec.role()
    }
}

/// Lowercase, treat separators as spaces and collapse runs of whitespace.
pub fn normalize_text(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(['_', '-', '.', '/', '\\', ':'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn terms(role: Role) -> &'static [&'static str] {
    match role {
        Role::Dispersion => DISPERSION_TERMS,
        Role::Data => DATA_TERMS,
        Role::Uncertainty => UNCERTAINTY_TERMS,
        Role::Mask => MASK_TERMS,
    }
}

/// Similarity of `component` to `role`.
pub fn role_score(component: &Component, role: Role) -> f64 {
    if component.is_wcs_axis() {
        return if role == Role::Dispersion { 1.0 } else { 0.0 };
    }
    let name = normalize_text(component.name());
    terms(role)
        .iter()
        .map(|term| jaro_similarity(name.chars(), term.chars()))
        .fold(0.0, f64::max)
}

fn uncertainty_kind(name: &str) -> UncertaintyKind {
    let name = normalize_text(name);
    if name.contains("ivar") || name.contains("inverse") || name.contains("inv var") {
        UncertaintyKind::InverseVariance
    } else {
        UncertaintyKind::StdDev
    }
}

/// Propose one component per role, in [`Role::ALL`] order.
///
/// A component is suggested for at most one role. Equal scores resolve to a
/// WCS axis first, then the earlier dataset, then the earlier component.
pub fn suggest_roles(file: &DataFile) -> Vec<RoleSuggestion> {
    let mut taken: Vec<(usize, &str)> = Vec::new();
    let mut suggestions = Vec::new();

    for role in Role::ALL {
        let mut best: Option<(&Component, f64)> = None;
        for component in file.components() {
            if taken.contains(&(component.dataset(), component.name())) {
                continue;
            }
            let score = role_score(component, role);
            if score < MIN_SCORE {
                continue;
            }
            let better = best.is_none_or(|(current, top)| {
                score > top || (score == top && component.is_wcs_axis() && !current.is_wcs_axis())
            });
            if better {
                best = Some((component, score));
            }
        }

        let Some((component, score)) = best else {
            continue;
        };
        let spec = match role {
            Role::Dispersion => RoleSpec::Dispersion,
            Role::Data => RoleSpec::Data,
            Role::Uncertainty => RoleSpec::Uncertainty(uncertainty_kind(component.name())),
            Role::Mask => RoleSpec::Mask(MaskDefinition::Custom),
        };
        tracing::debug!(
            role = %role,
            dataset = component.dataset(),
            component = component.name(),
            score,
            "suggested role"
        );
        taken.push((component.dataset(), component.name()));
        suggestions.push(RoleSuggestion {
            spec,
            dataset: component.dataset(),
            component: component.name().to_string(),
            score,
        });
    }
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  FLUX_ERR "), "flux err");
        assert_eq!(normalize_text("WCS::WAVE"), "wcs wave");
        assert_eq!(normalize_text("and-mask"), "and mask");
    }

    #[test]
    fn test_uncertainty_kind_from_name() {
        assert_eq!(uncertainty_kind("IVAR"), UncertaintyKind::InverseVariance);
        assert_eq!(uncertainty_kind("flux_inverse_variance"), UncertaintyKind::InverseVariance);
        assert_eq!(uncertainty_kind("ERR"), UncertaintyKind::StdDev);
    }
}
