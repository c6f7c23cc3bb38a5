//! Template selection for rendered loaders.

use std::fmt;

use serde::{Deserialize, Serialize};
use specload_model::{LoaderConfig, UncertaintyKind};

/// Rendering template for a loader configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateId {
    /// No uncertainty descriptor.
    #[serde(rename = "base_template")]
    Base,
    /// Uncertainty given as standard deviation.
    #[serde(rename = "stddev_template")]
    Stddev,
    /// Uncertainty given as inverse variance.
    #[serde(rename = "ivar_template")]
    Ivar,
}

impl TemplateId {
    pub const ALL: [TemplateId; 3] = [TemplateId::Base, TemplateId::Stddev, TemplateId::Ivar];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::Base => "base_template",
            TemplateId::Stddev => "stddev_template",
            TemplateId::Ivar => "ivar_template",
        }
    }

    /// Template file name a renderer looks up.
    pub fn file_name(&self) -> &'static str {
        match self {
            TemplateId::Base => "loader_base.py.tmpl",
            TemplateId::Stddev => "loader_uncertainty_stddev.py.tmpl",
            TemplateId::Ivar => "loader_uncertainty_ivar.py.tmpl",
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the template for `config` from its uncertainty descriptor alone.
pub fn select_template(config: &LoaderConfig) -> TemplateId {
    match config.uncertainty().map(|u| u.kind) {
        None => TemplateId::Base,
        Some(UncertaintyKind::StdDev) => TemplateId::Stddev,
        Some(UncertaintyKind::InverseVariance) => TemplateId::Ivar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_names() {
        let names: Vec<&str> = TemplateId::ALL.iter().map(TemplateId::as_str).collect();
        assert_eq!(names, vec!["base_template", "stddev_template", "ivar_template"]);
        assert_eq!(
            serde_json::to_string(&TemplateId::Ivar).unwrap(),
            "\"ivar_template\""
        );
    }
}
