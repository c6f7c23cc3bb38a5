//! CLI argument definitions for the loader wizard.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use specload_model::{MaskDefinition, StandardMask, UncertaintyKind};

use crate::render::OutputFormat;

#[derive(Parser)]
#[command(
    name = "specload",
    version,
    about = "Spectral loader wizard - map file components to loader roles",
    long_about = "Inspect spectral data files and build loader configurations.\n\n\
                  Reads FITS, ECSV and delimited text files, assigns components to the\n\
                  dispersion, data, uncertainty and mask roles, and renders the\n\
                  resulting loader configuration with its template."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Settings file (default: settings.toml in the user config directory).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the datasets and components of a file.
    Inspect(FileArgs),

    /// Propose a component for each role from component names.
    Suggest(FileArgs),

    /// Assign roles and render the loader configuration.
    Synthesize(SynthesizeArgs),

    /// Verify a stored loader configuration against a file.
    Check(CheckArgs),

    /// List stored loader configurations.
    List,
}

#[derive(Parser)]
pub struct FileArgs {
    /// Spectral data file (.fits, .ecsv, .dat, ...).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Parser)]
pub struct SynthesizeArgs {
    /// Spectral data file (.fits, .ecsv, .dat, ...).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Component holding the spectral axis, as DATASET:NAME.
    #[arg(long = "dispersion", value_name = "D:NAME")]
    pub dispersion: Option<ComponentRef>,

    /// Component holding the flux values, as DATASET:NAME.
    #[arg(long = "data", value_name = "D:NAME")]
    pub data: Option<ComponentRef>,

    /// Component holding the flux uncertainty, as DATASET:NAME.
    #[arg(long = "uncertainty", value_name = "D:NAME")]
    pub uncertainty: Option<ComponentRef>,

    /// How the uncertainty values are expressed.
    #[arg(
        long = "uncertainty-type",
        value_enum,
        default_value = "std",
        requires = "uncertainty"
    )]
    pub uncertainty_type: UncertaintyArg,

    /// Component holding the quality mask, as DATASET:NAME.
    #[arg(long = "mask", value_name = "D:NAME")]
    pub mask: Option<ComponentRef>,

    /// Bit definition of the mask.
    #[arg(
        long = "mask-definition",
        value_enum,
        default_value = "custom",
        requires = "mask"
    )]
    pub mask_definition: MaskDefinitionArg,

    /// Loader name (default: a generated identifier).
    #[arg(long = "name")]
    pub name: Option<String>,

    /// Start from name-based role suggestions; explicit roles override them.
    #[arg(long = "suggest")]
    pub suggest: bool,

    /// Output format for the rendered configuration (default from settings).
    #[arg(long = "format", value_enum)]
    pub format: Option<OutputFormat>,

    /// Also store the configuration in the loader repository.
    #[arg(long = "save")]
    pub save: bool,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Stored loader configuration (YAML file or repository name).
    #[arg(id = "loader_config", value_name = "CONFIG")]
    pub config: String,

    /// Spectral data file to verify against.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// A `DATASET:NAME` component reference.
///
/// Only the first colon separates the dataset index, so component names
/// may themselves contain colons (`0:WCS::WAVE`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRef {
    pub dataset: usize,
    pub name: String,
}

impl FromStr for ComponentRef {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let Some((dataset, name)) = raw.split_once(':') else {
            return Err(format!("expected DATASET:NAME, got '{raw}'"));
        };
        let dataset = dataset
            .trim()
            .parse()
            .map_err(|_| format!("invalid dataset index '{dataset}'"))?;
        if name.is_empty() {
            return Err(format!("missing component name in '{raw}'"));
        }
        Ok(Self {
            dataset,
            name: name.to_string(),
        })
    }
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.dataset, self.name)
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum UncertaintyArg {
    Std,
    Ivar,
}

impl From<UncertaintyArg> for UncertaintyKind {
    fn from(arg: UncertaintyArg) -> Self {
        match arg {
            UncertaintyArg::Std => UncertaintyKind::StdDev,
            UncertaintyArg::Ivar => UncertaintyKind::InverseVariance,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MaskDefinitionArg {
    Custom,
    Jwst,
    Hst,
    Sdss,
}

impl From<MaskDefinitionArg> for MaskDefinition {
    fn from(arg: MaskDefinitionArg) -> Self {
        match arg {
            MaskDefinitionArg::Custom => MaskDefinition::Custom,
            MaskDefinitionArg::Jwst => MaskDefinition::Standard(StandardMask::Jwst),
            MaskDefinitionArg::Hst => MaskDefinition::Standard(StandardMask::Hst),
            MaskDefinitionArg::Sdss => MaskDefinition::Standard(StandardMask::Sdss),
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
