//! Semantic roles a component can play in a loader configuration.
//!
//! A role assignment maps each role onto one component of one dataset.
//! Dispersion and data are mandatory; uncertainty and mask are optional and
//! carry a sub-option describing how the values are encoded.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Semantic purpose of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Spectral axis (wavelength, frequency, energy).
    Dispersion,
    /// Flux or other measured values.
    Data,
    /// Per-element uncertainty of the data.
    Uncertainty,
    /// Per-element quality or bit mask.
    Mask,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Dispersion, Role::Data, Role::Uncertainty, Role::Mask];

    /// Roles that must be assigned before a configuration can be synthesized.
    pub const MANDATORY: [Role; 2] = [Role::Dispersion, Role::Data];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Dispersion => "dispersion",
            Role::Data => "data",
            Role::Uncertainty => "uncertainty",
            Role::Mask => "mask",
        }
    }

    pub fn is_mandatory(&self) -> bool {
        matches!(self, Role::Dispersion | Role::Data)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dispersion" | "spectral_axis" | "wavelength" => Ok(Role::Dispersion),
            "data" | "flux" => Ok(Role::Data),
            "uncertainty" | "error" => Ok(Role::Uncertainty),
            "mask" => Ok(Role::Mask),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// How uncertainty values are represented in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UncertaintyKind {
    /// Standard deviation, in the same units as the data.
    #[serde(rename = "std")]
    StdDev,
    /// Inverse variance.
    #[serde(rename = "ivar")]
    InverseVariance,
}

impl UncertaintyKind {
    pub const ALL: [UncertaintyKind; 2] = [UncertaintyKind::StdDev, UncertaintyKind::InverseVariance];

    pub fn as_str(&self) -> &'static str {
        match self {
            UncertaintyKind::StdDev => "std",
            UncertaintyKind::InverseVariance => "ivar",
        }
    }
}

impl fmt::Display for UncertaintyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UncertaintyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "std" | "stddev" | "sigma" => Ok(UncertaintyKind::StdDev),
            "ivar" | "inverse_variance" => Ok(UncertaintyKind::InverseVariance),
            other => Err(format!("unknown uncertainty type '{other}'")),
        }
    }
}

/// Named bit-mask definitions understood by downstream loaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StandardMask {
    Jwst,
    Hst,
    Sdss,
}

impl StandardMask {
    pub const ALL: [StandardMask; 3] = [StandardMask::Jwst, StandardMask::Hst, StandardMask::Sdss];

    pub fn as_str(&self) -> &'static str {
        match self {
            StandardMask::Jwst => "jwst",
            StandardMask::Hst => "hst",
            StandardMask::Sdss => "sdss",
        }
    }
}

impl fmt::Display for StandardMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bit-definition choice attached to a mask assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskDefinition {
    /// Bits are defined by the rendered loader itself.
    Custom,
    Standard(StandardMask),
}

impl MaskDefinition {
    /// The named definition, or `None` for custom definitions.
    pub fn standard(&self) -> Option<StandardMask> {
        match self {
            MaskDefinition::Custom => None,
            MaskDefinition::Standard(mask) => Some(*mask),
        }
    }
}

impl fmt::Display for MaskDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaskDefinition::Custom => f.write_str("custom"),
            MaskDefinition::Standard(mask) => f.write_str(mask.as_str()),
        }
    }
}

impl FromStr for MaskDefinition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "custom" => Ok(MaskDefinition::Custom),
            "jwst" => Ok(MaskDefinition::Standard(StandardMask::Jwst)),
            "hst" => Ok(MaskDefinition::Standard(StandardMask::Hst)),
            "sdss" => Ok(MaskDefinition::Standard(StandardMask::Sdss)),
            other => Err(format!("unknown mask definition '{other}'")),
        }
    }
}

/// A role together with its role-specific options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleSpec {
    Dispersion,
    Data,
    Uncertainty(UncertaintyKind),
    Mask(MaskDefinition),
}

impl RoleSpec {
    pub fn role(&self) -> Role {
        match self {
            RoleSpec::Dispersion => Role::Dispersion,
            RoleSpec::Data => Role::Data,
            RoleSpec::Uncertainty(_) => Role::Uncertainty,
            RoleSpec::Mask(_) => Role::Mask,
        }
    }
}

impl fmt::Display for RoleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleSpec::Uncertainty(kind) => write!(f, "uncertainty ({kind})"),
            RoleSpec::Mask(definition) => write!(f, "mask ({definition})"),
            other => f.write_str(other.role().as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mandatory_roles() {
        for role in Role::ALL {
            assert_eq!(role.is_mandatory(), Role::MANDATORY.contains(&role));
        }
    }

    #[test]
    fn uncertainty_kind_round_trips_through_str() {
        for kind in UncertaintyKind::ALL {
            assert_eq!(kind.as_str().parse::<UncertaintyKind>(), Ok(kind));
        }
        assert!("var".parse::<UncertaintyKind>().is_err());
    }

    #[test]
    fn custom_mask_has_no_standard() {
        assert_eq!(MaskDefinition::Custom.standard(), None);
        assert_eq!(
            "SDSS".parse::<MaskDefinition>().map(|d| d.standard()),
            Ok(Some(StandardMask::Sdss))
        );
    }

    #[test]
    fn role_spec_display() {
        assert_eq!(RoleSpec::Data.to_string(), "data");
        assert_eq!(
            RoleSpec::Uncertainty(UncertaintyKind::InverseVariance).to_string(),
            "uncertainty (ivar)"
        );
        assert_eq!(RoleSpec::Mask(MaskDefinition::Custom).to_string(), "mask (custom)");
    }
}
