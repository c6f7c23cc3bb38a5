//! Supported source formats and their per-format synthesis policy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a supported source format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatTag {
    /// Multi-HDU FITS files.
    Fits,
    /// Enhanced character-separated values tables.
    Ecsv,
    /// Plain delimited text tables.
    Ascii,
}

/// How the dispersion descriptor is derived for a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispersionRule {
    /// A `wcs-axis` component is recorded as a direct WCS reference.
    WcsAware,
    /// Dispersion is always looked up by dataset index and component name.
    ComponentOnly,
}

/// The small set of facts that differ between formats during synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatPolicy {
    /// File suffixes written into the `extension` field of a record.
    pub extension: &'static [&'static str],
    pub dispersion: DispersionRule,
}

impl FormatTag {
    pub const ALL: [FormatTag; 3] = [FormatTag::Fits, FormatTag::Ecsv, FormatTag::Ascii];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fits => "fits",
            Self::Ecsv => "ecsv",
            Self::Ascii => "ascii",
        }
    }

    pub fn policy(self) -> FormatPolicy {
        match self {
            Self::Fits => FormatPolicy {
                extension: &["fits"],
                dispersion: DispersionRule::WcsAware,
            },
            Self::Ecsv => FormatPolicy {
                extension: &["ecsv"],
                dispersion: DispersionRule::ComponentOnly,
            },
            Self::Ascii => FormatPolicy {
                extension: &["dat"],
                dispersion: DispersionRule::ComponentOnly,
            },
        }
    }

    /// Display label for datasets of this format.
    pub fn dataset_label(&self) -> &'static str {
        match self {
            Self::Fits => "HDU",
            Self::Ecsv | Self::Ascii => "Table",
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fits" => Ok(Self::Fits),
            "ecsv" => Ok(Self::Ecsv),
            "ascii" | "dat" | "txt" => Ok(Self::Ascii),
            other => Err(format!("unknown format '{other}'")),
        }
    }
}
