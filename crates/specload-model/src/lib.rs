//! Format-independent model of spectral data files.
//!
//! A [`DataFile`] is an ordered list of [`Dataset`]s, each holding ordered
//! [`Component`]s. The model is produced by a format adapter and never
//! mutated afterwards. Role vocabulary and [`LoaderConfig`] records live here
//! too so that every crate speaks the same types.

pub mod component;
pub mod config;
pub mod dataset;
pub mod error;
pub mod format;
pub mod role;

pub use component::{Component, ComponentKind, OriginRef, SourceHandle};
pub use config::{
    ColumnSource, DispersionSource, LoaderConfig, META_AUTHOR, MaskSource, UncertaintySource,
};
pub use dataset::{DataFile, Dataset};
pub use error::{ModelError, Result};
pub use format::{DispersionRule, FormatPolicy, FormatTag};
pub use role::{MaskDefinition, Role, RoleSpec, StandardMask, UncertaintyKind};
