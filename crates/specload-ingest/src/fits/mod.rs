//! FITS adapter.
//!
//! Walks the HDU sequence and describes each one by its header alone. Data
//! segments are skipped by size; no pixel or table value is read.

mod header;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use specload_model::{
    Component, ComponentKind, DataFile, Dataset, FormatTag, OriginRef, SourceHandle,
};

pub use header::{BLOCK_SIZE, CARD_SIZE, Card, Header, HeaderValue, parse_card};

use crate::adapter::FormatAdapter;
use crate::error::{IngestError, Result};
use crate::naming::unique_names;

/// CTYPE prefixes of spectral world coordinate axes.
const SPECTRAL_CTYPES: [&str; 10] = [
    "WAVE", "AWAV", "FREQ", "ENER", "WAVN", "VRAD", "VOPT", "ZOPT", "VELO", "BETA",
];

/// TFORM codes whose repeat count is a string width or heap descriptor.
const SCALAR_CODES: [char; 3] = ['A', 'P', 'Q'];

#[derive(Debug, Default, Clone, Copy)]
pub struct FitsAdapter;

impl FormatAdapter for FitsAdapter {
    fn format(&self) -> FormatTag {
        FormatTag::Fits
    }

    fn suffixes(&self) -> &'static [&'static str] {
        &["fits", "fit", "fts"]
    }

    fn parse(&self, path: &Path) -> Result<DataFile> {
        let headers = read_headers(path)?;
        let datasets = headers
            .iter()
            .enumerate()
            .map(|(index, (header, data_offset))| describe_hdu(index, header, *data_offset))
            .collect();
        Ok(DataFile::new(path, datasets)?)
    }
}

/// Read every HDU header, returning each with the offset of its data segment.
pub fn read_headers(path: &Path) -> Result<Vec<(Header, u64)>> {
    let file = File::open(path).map_err(|e| IngestError::io(path, e))?;
    let file_len = file.metadata().map_err(|e| IngestError::io(path, e))?.len();
    let mut reader = BufReader::new(file);

    let mut headers = Vec::new();
    let mut offset = 0u64;
    while let Some((header, consumed)) = header::read_header(&mut reader, path)? {
        let index = headers.len();
        let first = header.first_keyword().unwrap_or_default();
        if index == 0 && first != "SIMPLE" {
            return Err(IngestError::fits(path, "primary header does not start with SIMPLE"));
        }
        if index > 0 && first != "XTENSION" {
            tracing::warn!(
                path = %path.display(),
                hdu = index,
                "trailing bytes after last extension ignored"
            );
            break;
        }

        offset += consumed;
        let data_offset = offset;
        let overflow = || IngestError::fits(path, format!("HDU {index} data size overflows"));
        let size = data_size(&header).and_then(padded).ok_or_else(overflow)?;
        let end = data_offset.checked_add(size).ok_or_else(overflow)?;
        if end > file_len {
            return Err(IngestError::fits(
                path,
                format!("data segment of HDU {index} runs past end of file"),
            ));
        }
        let skip = i64::try_from(size)
            .map_err(|_| IngestError::fits(path, format!("HDU {index} is too large")))?;
        reader
            .seek_relative(skip)
            .map_err(|e| IngestError::io(path, e))?;
        offset += size;

        tracing::debug!(path = %path.display(), hdu = index, data_offset, size, "read HDU header");
        headers.push((header, data_offset));
        if offset == file_len {
            break;
        }
    }

    Ok(headers)
}

/// Bytes in the data segment, before padding; `None` on overflow.
fn data_size(header: &Header) -> Option<u64> {
    let bitpix = header.int("BITPIX").unwrap_or(8).unsigned_abs();
    let axes = header.axis_lengths().unwrap_or_default();
    if axes.is_empty() {
        return Some(0);
    }
    let pcount = header.int("PCOUNT").unwrap_or(0).max(0).unsigned_abs();
    let gcount = header.int("GCOUNT").unwrap_or(1).max(1).unsigned_abs();
    let product = axes.iter().try_fold(1u64, |acc, &n| {
        acc.checked_mul(u64::try_from(n).ok()?)
    })?;
    (bitpix / 8)
        .checked_mul(gcount)?
        .checked_mul(pcount.checked_add(product)?)
}

fn padded(size: u64) -> Option<u64> {
    let block = BLOCK_SIZE as u64;
    size.div_ceil(block).checked_mul(block)
}

fn describe_hdu(index: usize, header: &Header, data_offset: u64) -> Dataset {
    let dataset = Dataset::new(index, format!("HDU {index}")).with_meta(header.meta());
    let components = match header.text("XTENSION") {
        Some("BINTABLE") | Some("TABLE") => table_components(index, header),
        _ => image_components(index, header, data_offset),
    };
    tracing::debug!(hdu = index, components = components.len(), "described HDU");
    dataset.with_components(components)
}

fn image_components(index: usize, header: &Header, data_offset: u64) -> Vec<Component> {
    let axes = header.axis_lengths().unwrap_or_default();
    if axes.is_empty() || axes.contains(&0) {
        return Vec::new();
    }

    let array_name = header.text("EXTNAME").unwrap_or("DATA");
    let mut components = vec![
        Component::new(
            array_name,
            ComponentKind::Array,
            OriginRef {
                dataset: index,
                handle: SourceHandle::ImageData { data_offset },
            },
        )
        .with_shape(axes.iter().rev().copied().collect())
        .with_unit(header.text("BUNIT").map(str::to_string)),
    ];

    if let Some(axis) = spectral_axis(header, &axes) {
        let mut name = match header.text(&format!("CTYPE{axis}")) {
            Some(ctype) => format!("WCS::{ctype}"),
            None => format!("WCS::AXIS{axis}"),
        };
        if name == array_name {
            name = unique_names(&[array_name.to_string(), name], index).remove(1);
        }
        components.push(
            Component::new(
                name,
                ComponentKind::WcsAxis,
                OriginRef {
                    dataset: index,
                    handle: SourceHandle::WcsAxis { axis },
                },
            )
            .with_shape(vec![axes[axis - 1]])
            .with_unit(header.text(&format!("CUNIT{axis}")).map(str::to_string)),
        );
    }

    components
}

/// One-based index of the spectral axis, if the header declares one.
fn spectral_axis(header: &Header, axes: &[usize]) -> Option<usize> {
    let by_ctype = (1..=axes.len()).find(|n| {
        header
            .text(&format!("CTYPE{n}"))
            .is_some_and(|ctype| SPECTRAL_CTYPES.iter().any(|p| ctype.starts_with(p)))
    });
    if by_ctype.is_some() {
        return by_ctype;
    }

    // An effectively one-dimensional image with a linear axis description.
    let mut long = (1..=axes.len()).filter(|&n| axes[n - 1] > 1);
    let axis = match (long.next(), long.next()) {
        (Some(n), None) => n,
        (None, None) if axes.len() == 1 => 1,
        _ => return None,
    };
    let linear = header.contains(&format!("CRVAL{axis}"))
        && (header.contains(&format!("CDELT{axis}"))
            || header.contains(&format!("CD{axis}_{axis}")));
    linear.then_some(axis)
}

fn table_components(index: usize, header: &Header) -> Vec<Component> {
    let rows = header.int("NAXIS2").and_then(|n| usize::try_from(n).ok()).unwrap_or(0);
    let fields = header.int("TFIELDS").and_then(|n| usize::try_from(n).ok()).unwrap_or(0);

    let raw_names: Vec<String> = (1..=fields)
        .map(|n| {
            header
                .text(&format!("TTYPE{n}"))
                .map_or_else(|| format!("col{n}"), str::to_string)
        })
        .collect();
    let names = unique_names(&raw_names, index);

    names
        .into_iter()
        .enumerate()
        .map(|(position, name)| {
            let n = position + 1;
            let mut shape = vec![rows];
            shape.extend(field_dims(header, n));
            Component::new(
                name,
                ComponentKind::Column,
                OriginRef {
                    dataset: index,
                    handle: SourceHandle::TableColumn { position },
                },
            )
            .with_shape(shape)
            .with_unit(header.text(&format!("TUNIT{n}")).map(str::to_string))
        })
        .collect()
}

/// Per-row dimensions of field `n`, from `TDIMn` or the TFORM repeat count.
fn field_dims(header: &Header, n: usize) -> Vec<usize> {
    if let Some(tdim) = header.text(&format!("TDIM{n}")) {
        let dims: Option<Vec<usize>> = tdim
            .trim_start_matches('(')
            .trim_end_matches(')')
            .split(',')
            .map(|d| d.trim().parse().ok())
            .collect();
        if let Some(dims) = dims {
            return dims.into_iter().rev().collect();
        }
    }

    let Some(tform) = header.text(&format!("TFORM{n}")) else {
        return Vec::new();
    };
    let digits: String = tform.chars().take_while(char::is_ascii_digit).collect();
    let code = tform[digits.len()..].chars().next();
    let repeat = digits.parse::<usize>().unwrap_or(1);
    match code {
        Some(code) if SCALAR_CODES.contains(&code) => Vec::new(),
        _ if repeat > 1 => vec![repeat],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::header::tests::card;
    use super::*;

    fn header(lines: &[&str]) -> Header {
        Header::from_cards(lines.iter().map(|l| parse_card(card(l).as_bytes())).collect())
    }

    #[test]
    fn test_data_size_is_padded() {
        let h = header(&["SIMPLE  = T", "BITPIX  = -32", "NAXIS   = 1", "NAXIS1  = 4000"]);
        assert_eq!(data_size(&h), Some(16000));
        assert_eq!(data_size(&h).and_then(padded), Some(17280));
        assert_eq!(padded(0), Some(0));
    }

    #[test]
    fn test_data_size_overflow() {
        let h = header(&[
            "SIMPLE  = T",
            "BITPIX  = -64",
            "NAXIS   = 2",
            "NAXIS1  = 4294967296",
            "NAXIS2  = 4294967296",
        ]);
        assert_eq!(data_size(&h), None);
        assert_eq!(padded(u64::MAX), None);
    }

    #[test]
    fn test_spectral_axis_from_ctype() {
        let h = header(&["NAXIS   = 3", "CTYPE3  = 'WAVE    '"]);
        assert_eq!(spectral_axis(&h, &[10, 10, 500]), Some(3));
    }

    #[test]
    fn test_spectral_axis_from_linear_one_dimensional() {
        let h = header(&["CRVAL1  = 3500.0", "CDELT1  = 1.0"]);
        assert_eq!(spectral_axis(&h, &[4000, 1]), Some(1));
        assert_eq!(spectral_axis(&h, &[4000, 3]), None);
        assert_eq!(spectral_axis(&header(&[]), &[4000]), None);
    }

    #[test]
    fn test_field_dims() {
        let h = header(&[
            "TFORM1  = '4000E   '",
            "TFORM2  = '20A     '",
            "TFORM3  = '6E      '",
            "TDIM3   = '(3,2)   '",
            "TFORM4  = 'D       '",
        ]);
        assert_eq!(field_dims(&h, 1), vec![4000]);
        assert!(field_dims(&h, 2).is_empty());
        assert_eq!(field_dims(&h, 3), vec![2, 3]);
        assert!(field_dims(&h, 4).is_empty());
    }
}
