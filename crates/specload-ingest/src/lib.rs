//! Format adapters for spectral data files.
//!
//! Each adapter reads a file's structure (datasets, component names, shapes
//! and units) into the [`specload_model::DataFile`] model. Values are never
//! loaded. [`AdapterRegistry`] picks the adapter from the file suffix.

pub mod adapter;
pub mod error;
pub mod fits;
pub mod naming;
pub mod simplify;
pub mod table;

pub use adapter::{AdapterRegistry, FormatAdapter, OpenedFile, open_file};
pub use error::{IngestError, Result};
pub use fits::FitsAdapter;
pub use simplify::simplify_arrays;
pub use table::{AsciiAdapter, EcsvAdapter};
