//! Text rendering of synthesized loader configurations.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use specload_map::{LoaderRenderer, TemplateId};
use specload_model::LoaderConfig;

/// Serialization used when printing a configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// A configuration rendered to text, with the template it selects.
#[derive(Debug, Clone)]
pub struct RenderedLoader {
    pub template: TemplateId,
    pub config: LoaderConfig,
    pub text: String,
}

/// Renders configurations as YAML or pretty JSON.
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer {
    format: OutputFormat,
}

impl TextRenderer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl LoaderRenderer for TextRenderer {
    type Output = RenderedLoader;

    fn render(&mut self, template: TemplateId, config: LoaderConfig) -> Result<RenderedLoader> {
        let text = match self.format {
            OutputFormat::Yaml => serde_yaml::to_string(&config).context("serialize yaml")?,
            OutputFormat::Json => {
                let mut text =
                    serde_json::to_string_pretty(&config).context("serialize json")?;
                text.push('\n');
                text
            }
        };
        tracing::info!(
            name = config.name(),
            template = %template,
            "rendered loader configuration"
        );
        Ok(RenderedLoader {
            template,
            config,
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use specload_model::{ColumnSource, DispersionSource};

    fn config() -> LoaderConfig {
        LoaderConfig::new(
            "demo",
            &["dat"],
            DispersionSource::Component {
                dispersion: ColumnSource {
                    hdu: 0,
                    col: "wave".to_string(),
                    unit: None,
                },
            },
            ColumnSource {
                hdu: 0,
                col: "flux".to_string(),
                unit: None,
            },
            None,
            None,
        )
    }

    #[test]
    fn test_render_yaml() {
        let rendered = TextRenderer::new(OutputFormat::Yaml)
            .render(TemplateId::Base, config())
            .unwrap();
        assert_eq!(rendered.template, TemplateId::Base);
        insta::assert_snapshot!(rendered.text, @r"
        name: demo
        extension:
        - dat
        dispersion:
          hdu: 0
          col: wave
        data:
          hdu: 0
          col: flux
        meta_author: Wizard
        ");
    }

    #[test]
    fn test_render_json() {
        let rendered = TextRenderer::new(OutputFormat::Json)
            .render(TemplateId::Base, config())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered.text).unwrap();
        assert_eq!(value["dispersion"]["col"], "wave");
        assert!(rendered.text.ends_with("}\n"));
    }
}
