//! Enhanced character-separated values (ECSV) adapter.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_yaml::Value;
use specload_model::{DataFile, FormatTag};

use super::{ColumnSpec, table_dataset};
use crate::adapter::FormatAdapter;
use crate::error::{IngestError, Result};

const BANNER: &str = "# %ECSV";

#[derive(Debug, Default, Clone, Copy)]
pub struct EcsvAdapter;

impl FormatAdapter for EcsvAdapter {
    fn format(&self) -> FormatTag {
        FormatTag::Ecsv
    }

    fn suffixes(&self) -> &'static [&'static str] {
        &["ecsv"]
    }

    fn parse(&self, path: &Path) -> Result<DataFile> {
        let text = std::fs::read_to_string(path).map_err(|e| IngestError::io(path, e))?;
        parse_ecsv(path, &text)
    }
}

#[derive(Debug, Deserialize)]
struct EcsvHeader {
    #[serde(default)]
    delimiter: Option<String>,
    datatype: Vec<EcsvColumn>,
    #[serde(default)]
    meta: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct EcsvColumn {
    name: String,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    subtype: Option<String>,
}

pub(crate) fn parse_ecsv(path: &Path, text: &str) -> Result<DataFile> {
    if text.trim().is_empty() {
        return Ok(DataFile::new(path, Vec::new())?);
    }
    if !text.starts_with(BANNER) {
        return Err(IngestError::table(path, "missing '# %ECSV' banner"));
    }

    let mut yaml = String::new();
    let mut body = String::new();
    for line in text.lines().skip(1) {
        if let Some(rest) = line.strip_prefix('#') {
            let rest = rest.strip_prefix(' ').unwrap_or(rest);
            if rest.trim() != "---" {
                yaml.push_str(strip_omap_tag(rest));
                yaml.push('\n');
            }
        } else if !line.trim().is_empty() {
            body.push_str(line);
            body.push('\n');
        }
    }

    let header: EcsvHeader = serde_yaml::from_str(&yaml)
        .map_err(|e| IngestError::table(path, format!("invalid ECSV header: {e}")))?;
    let delimiter = match header.delimiter.as_deref() {
        None | Some(" ") => b' ',
        Some(",") => b',',
        Some(other) => {
            return Err(IngestError::table(
                path,
                format!("unsupported delimiter {other:?}"),
            ));
        }
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let declared: Vec<&str> = header.datatype.iter().map(|c| c.name.as_str()).collect();
    let names: Vec<String> = reader
        .headers()
        .map_err(|e| IngestError::table(path, e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();
    if names != declared {
        return Err(IngestError::table(
            path,
            format!(
                "column names {names:?} do not match header declaration {declared:?}"
            ),
        ));
    }

    let mut rows = 0;
    for record in reader.records() {
        record.map_err(|e| IngestError::table(path, e.to_string()))?;
        rows += 1;
    }
    tracing::debug!(path = %path.display(), columns = names.len(), rows, "read ECSV table");

    let columns = header
        .datatype
        .into_iter()
        .map(|c| ColumnSpec {
            dims: c
                .subtype
                .as_deref()
                .map(|subtype| subtype_dims(path, &c.name, subtype))
                .unwrap_or_default(),
            name: c.name,
            unit: c.unit,
        })
        .collect();
    let dataset = table_dataset(columns, rows).with_meta(flatten_meta(header.meta));
    Ok(DataFile::new(path, vec![dataset])?)
}

/// `meta: !!omap` is read as a plain sequence of single-key maps.
fn strip_omap_tag(line: &str) -> &str {
    match line.trim_end().strip_suffix("!!omap") {
        Some(key) if key.trim() == "meta:" => key.trim_end(),
        _ => line,
    }
}

/// Cell dimensions of a subtype such as `float64[3,2]`.
///
/// Dimensions stop at the first variable-length one (`null`), which is
/// reported with a warning.
fn subtype_dims(path: &Path, column: &str, subtype: &str) -> Vec<usize> {
    let Some(start) = subtype.find('[') else {
        return Vec::new();
    };
    let mut dims = Vec::new();
    for dim in subtype[start + 1..].trim_end_matches(']').split(',') {
        match dim.trim().parse() {
            Ok(dim) => dims.push(dim),
            Err(_) => {
                tracing::warn!(
                    path = %path.display(),
                    column,
                    subtype,
                    "variable-length cell dimension, shape truncated"
                );
                break;
            }
        }
    }
    dims
}

/// Header metadata as keyword/display pairs; sequences of maps are merged.
fn flatten_meta(meta: Option<Value>) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    let mut pending = meta.into_iter().collect::<Vec<_>>();
    while let Some(value) = pending.pop() {
        match value {
            Value::Tagged(tagged) => pending.push(tagged.value),
            Value::Sequence(items) => pending.extend(items.into_iter().rev()),
            Value::Mapping(map) => {
                for (key, value) in map {
                    out.entry(display(&key)).or_insert_with(|| display(&value));
                }
            }
            _ => {}
        }
    }
    out
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
