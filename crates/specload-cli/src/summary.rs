use std::path::Path;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use specload_map::{ConfigMismatch, LoaderMetadata, RoleSuggestion};
use specload_model::{Component, ComponentKind, DataFile, FormatTag, RoleSpec};

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn dim_cell(value: &str) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn kind_cell(kind: ComponentKind) -> Cell {
    let cell = Cell::new(kind.as_str());
    match kind {
        ComponentKind::WcsAxis => cell.fg(Color::Cyan),
        ComponentKind::Array => cell.fg(Color::Green),
        ComponentKind::Column => cell,
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

/// Build the dataset/component tree of an opened file.
pub fn file_table(file: &DataFile) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Component"),
        header_cell("Kind"),
        header_cell("Shape"),
        header_cell("Unit"),
    ]);
    apply_table_style(&mut table);
    for dataset in file.datasets() {
        let label = format!("{} {}", dataset.index(), dataset.label());
        if dataset.is_empty() {
            table.add_row(vec![
                Cell::new(label),
                dim_cell("(no components)"),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
            ]);
            continue;
        }
        for (position, component) in dataset.components().iter().enumerate() {
            let dataset_cell = if position == 0 {
                Cell::new(&label).add_attribute(Attribute::Bold)
            } else {
                Cell::new("")
            };
            table.add_row(component_row(dataset_cell, component));
        }
    }
    table
}

fn component_row(dataset_cell: Cell, component: &Component) -> Vec<Cell> {
    vec![
        dataset_cell,
        Cell::new(component.name()),
        kind_cell(component.kind()),
        Cell::new(component.shape_label()),
        optional_cell(component.unit()),
    ]
}

pub fn print_file(path: &Path, format: FormatTag, file: &DataFile) {
    println!("File: {}", path.display());
    println!("Format: {format}");
    println!("{}", file_table(file));
}

pub fn suggestion_table(suggestions: &[RoleSuggestion]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Role"),
        header_cell("Component"),
        header_cell("Score"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for suggestion in suggestions {
        let role = match suggestion.spec {
            RoleSpec::Uncertainty(kind) => {
                format!("{} ({})", suggestion.role(), kind.as_str())
            }
            _ => suggestion.role().to_string(),
        };
        table.add_row(vec![
            Cell::new(role).fg(Color::Cyan),
            Cell::new(format!("{}:{}", suggestion.dataset, suggestion.component)),
            Cell::new(format!("{:.2}", suggestion.score)),
        ]);
    }
    table
}

pub fn loader_table(loaders: &[LoaderMetadata]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Name"),
        header_cell("Extension"),
        header_cell("Template"),
        header_cell("Path"),
    ]);
    apply_table_style(&mut table);
    for loader in loaders {
        table.add_row(vec![
            Cell::new(&loader.name).add_attribute(Attribute::Bold),
            Cell::new(loader.extension.join(", ")),
            Cell::new(loader.template.as_str()),
            dim_cell(&loader.file_path.display().to_string()),
        ]);
    }
    table
}

pub fn print_mismatches(name: &str, path: &Path, mismatches: &[ConfigMismatch]) {
    if mismatches.is_empty() {
        println!("Loader '{name}' applies to {}", path.display());
        return;
    }
    eprintln!(
        "Loader '{name}' does not apply to {} ({} problem{}):",
        path.display(),
        mismatches.len(),
        if mismatches.len() == 1 { "" } else { "s" }
    );
    for mismatch in mismatches {
        eprintln!("- {mismatch}");
    }
}
