//! Components: the addressable pieces of data inside a dataset.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What kind of data a component addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentKind {
    /// A standalone array, e.g. the data segment of an image HDU.
    Array,
    /// A named column of a table.
    Column,
    /// A world-coordinate axis described by header keywords.
    WcsAxis,
}

impl ComponentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::Column => "column",
            Self::WcsAxis => "wcs-axis",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format-specific locator for re-reading a component.
///
/// Holds positions only; no file handle or data is retained.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceHandle {
    /// Data segment of an image HDU, as a byte offset into the file.
    ImageData { data_offset: u64 },
    /// Zero-based field position in a table.
    TableColumn { position: usize },
    /// One-based WCS axis number, as used by `CTYPEn` keywords.
    WcsAxis { axis: usize },
}

/// Back-reference from a component to where it lives in the source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OriginRef {
    pub dataset: usize,
    pub handle: SourceHandle,
}

/// One named, addressable piece of data within a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    name: String,
    kind: ComponentKind,
    origin: OriginRef,
    shape: Vec<usize>,
    unit: Option<String>,
}

impl Component {
    pub fn new(name: impl Into<String>, kind: ComponentKind, origin: OriginRef) -> Self {
        Self {
            name: name.into(),
            kind,
            origin,
            shape: Vec::new(),
            unit: None,
        }
    }

    /// Set the array shape (outermost dimension first).
    #[must_use]
    pub fn with_shape(mut self, shape: Vec<usize>) -> Self {
        self.shape = shape;
        self
    }

    /// Set the unit string; blank units are treated as absent.
    #[must_use]
    pub fn with_unit(mut self, unit: Option<String>) -> Self {
        self.unit = unit
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn origin(&self) -> &OriginRef {
        &self.origin
    }

    pub fn dataset(&self) -> usize {
        self.origin.dataset
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn is_wcs_axis(&self) -> bool {
        self.kind == ComponentKind::WcsAxis
    }

    /// Total element count, or `None` when no shape is known.
    pub fn element_count(&self) -> Option<usize> {
        if self.shape.is_empty() {
            None
        } else {
            Some(self.shape.iter().product())
        }
    }

    /// Shape rendered as `4000` or `1x4000`, empty when unknown.
    pub fn shape_label(&self) -> String {
        self.shape
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join("x")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str) -> Component {
        Component::new(
            name,
            ComponentKind::Column,
            OriginRef {
                dataset: 1,
                handle: SourceHandle::TableColumn { position: 0 },
            },
        )
    }

    #[test]
    fn blank_unit_is_dropped() {
        let c = column("FLUX").with_unit(Some("  ".to_string()));
        assert_eq!(c.unit(), None);

        let c = column("FLUX").with_unit(Some(" erg/s/cm2/A ".to_string()));
        assert_eq!(c.unit(), Some("erg/s/cm2/A"));
    }

    #[test]
    fn shape_helpers() {
        let c = column("FLUX");
        assert_eq!(c.element_count(), None);
        assert_eq!(c.shape_label(), "");

        let c = c.with_shape(vec![1, 4000]);
        assert_eq!(c.element_count(), Some(4000));
        assert_eq!(c.shape_label(), "1x4000");
        assert_eq!(c.dataset(), 1);
    }

    #[test]
    fn kind_labels() {
        assert_eq!(ComponentKind::WcsAxis.to_string(), "wcs-axis");
        assert!(column("x").kind() == ComponentKind::Column);
    }
}
