//! Loader configuration records.
//!
//! A record is the declarative description of a completed role assignment.
//! Field order is the order of keys in the rendered artifact:
//!
//! ```text
//! name, extension, wcs_hdu | dispersion, data,
//! uncertainty_hdu, uncertainty_col, uncertainty_type, mask, meta_author
//! ```

use serde::{Deserialize, Serialize};

use crate::role::{StandardMask, UncertaintyKind};

/// Origin marker written into every record produced by the wizard.
pub const META_AUTHOR: &str = "Wizard";

/// A component looked up by dataset index and component name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSource {
    pub hdu: usize,
    pub col: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// Where the spectral axis comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DispersionSource {
    /// The world coordinate system of a dataset; no component name applies.
    Wcs { wcs_hdu: usize },
    /// A named component.
    Component { dispersion: ColumnSource },
}

impl DispersionSource {
    pub fn hdu(&self) -> usize {
        match self {
            DispersionSource::Wcs { wcs_hdu } => *wcs_hdu,
            DispersionSource::Component { dispersion } => dispersion.hdu,
        }
    }

    pub fn is_wcs(&self) -> bool {
        matches!(self, DispersionSource::Wcs { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UncertaintySource {
    #[serde(rename = "uncertainty_hdu")]
    pub hdu: usize,
    #[serde(rename = "uncertainty_col")]
    pub col: String,
    #[serde(rename = "uncertainty_type")]
    pub kind: UncertaintyKind,
}

/// Mask descriptor; custom bit definitions leave `definition` unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskSource {
    pub hdu: usize,
    pub col: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<StandardMask>,
}

/// Declarative loader configuration.
///
/// Records are produced whole and never edited afterwards; a changed
/// assignment yields a new record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    name: String,
    extension: Vec<String>,
    #[serde(flatten)]
    dispersion: DispersionSource,
    data: ColumnSource,
    #[serde(flatten)]
    uncertainty: Option<UncertaintySource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mask: Option<MaskSource>,
    meta_author: String,
}

impl LoaderConfig {
    pub fn new(
        name: impl Into<String>,
        extension: &[&str],
        dispersion: DispersionSource,
        data: ColumnSource,
        uncertainty: Option<UncertaintySource>,
        mask: Option<MaskSource>,
    ) -> Self {
        Self {
            name: name.into(),
            extension: extension.iter().map(|e| (*e).to_string()).collect(),
            dispersion,
            data,
            uncertainty,
            mask,
            meta_author: META_AUTHOR.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extension(&self) -> &[String] {
        &self.extension
    }

    pub fn dispersion(&self) -> &DispersionSource {
        &self.dispersion
    }

    pub fn data(&self) -> &ColumnSource {
        &self.data
    }

    pub fn uncertainty(&self) -> Option<&UncertaintySource> {
        self.uncertainty.as_ref()
    }

    pub fn mask(&self) -> Option<&MaskSource> {
        self.mask.as_ref()
    }

    pub fn meta_author(&self) -> &str {
        &self.meta_author
    }

    /// True when both records describe the same mapping, whatever their names.
    pub fn same_mapping(&self, other: &LoaderConfig) -> bool {
        self.extension == other.extension
            && self.dispersion == other.dispersion
            && self.data == other.data
            && self.uncertainty == other.uncertainty
            && self.mask == other.mask
            && self.meta_author == other.meta_author
    }
}
