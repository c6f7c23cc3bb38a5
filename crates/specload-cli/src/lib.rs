//! Command-line front end for the spectral loader wizard.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod render;
pub mod settings;
pub mod summary;
