//! Delimited text adapter (`.dat`, `.txt`).

use std::path::Path;

use specload_model::{DataFile, FormatTag};

use super::{ColumnSpec, table_dataset};
use crate::adapter::FormatAdapter;
use crate::error::{IngestError, Result};

#[derive(Debug, Default, Clone, Copy)]
pub struct AsciiAdapter;

impl FormatAdapter for AsciiAdapter {
    fn format(&self) -> FormatTag {
        FormatTag::Ascii
    }

    fn suffixes(&self) -> &'static [&'static str] {
        &["dat", "txt"]
    }

    fn parse(&self, path: &Path) -> Result<DataFile> {
        let text = std::fs::read_to_string(path).map_err(|e| IngestError::io(path, e))?;
        parse_ascii(path, &text)
    }
}

pub(crate) fn parse_ascii(path: &Path, text: &str) -> Result<DataFile> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .collect();
    let Some(first) = lines.first() else {
        return Ok(DataFile::new(path, Vec::new())?);
    };

    let rows = if first.contains(',') {
        split_comma(path, &lines)?
    } else {
        lines
            .iter()
            .map(|l| l.split_whitespace().map(str::to_string).collect())
            .collect()
    };

    let (columns, data) = match rows.split_first() {
        Some((head, rest)) if head.iter().any(|t| t.parse::<f64>().is_err()) => {
            (head.iter().map(ColumnSpec::named).collect::<Vec<_>>(), rest)
        }
        _ => {
            let width = rows.first().map_or(0, Vec::len);
            let names = (1..=width).map(|n| ColumnSpec::named(format!("col{n}"))).collect();
            (names, rows.as_slice())
        }
    };

    for (line, row) in data.iter().enumerate() {
        if row.len() != columns.len() {
            tracing::warn!(
                path = %path.display(),
                expected = columns.len(),
                found = row.len(),
                "row width does not match header"
            );
            return Err(IngestError::table(
                path,
                format!(
                    "data row {} has {} values, expected {}",
                    line + 1,
                    row.len(),
                    columns.len()
                ),
            ));
        }
    }
    tracing::debug!(path = %path.display(), columns = columns.len(), rows = data.len(), "read text table");

    Ok(DataFile::new(path, vec![table_dataset(columns, data.len())])?)
}

fn split_comma(path: &Path, lines: &[&str]) -> Result<Vec<Vec<String>>> {
    let body = lines.join("\n");
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());
    reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .map_err(|e| IngestError::table(path, e.to_string()))
        })
        .collect()
}
