//! Row-column text adapters: ECSV and delimited text.

mod ascii;
mod ecsv;

pub use ascii::AsciiAdapter;
pub use ecsv::EcsvAdapter;

use specload_model::{Component, ComponentKind, Dataset, OriginRef, SourceHandle};

use crate::naming::unique_names;

/// Label of the single dataset a text table produces.
pub const TABLE_LABEL: &str = "Table";

/// Column description gathered by a table reader.
#[derive(Debug, Clone, Default)]
pub(crate) struct ColumnSpec {
    pub name: String,
    pub unit: Option<String>,
    /// Per-row dimensions for multidimensional cells.
    pub dims: Vec<usize>,
}

impl ColumnSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Build dataset 0 from column descriptions and a row count.
pub(crate) fn table_dataset(columns: Vec<ColumnSpec>, rows: usize) -> Dataset {
    let names = unique_names(&columns.iter().map(|c| c.name.clone()).collect::<Vec<_>>(), 0);
    let components = columns
        .into_iter()
        .zip(names)
        .enumerate()
        .map(|(position, (column, name))| {
            let mut shape = vec![rows];
            shape.extend(column.dims);
            Component::new(
                name,
                ComponentKind::Column,
                OriginRef {
                    dataset: 0,
                    handle: SourceHandle::TableColumn { position },
                },
            )
            .with_shape(shape)
            .with_unit(column.unit)
        });
    Dataset::new(0, TABLE_LABEL).with_components(components)
}
