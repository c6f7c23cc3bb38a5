//! Adapter tests against files written to a temporary directory.

use std::path::PathBuf;

use specload_ingest::{AdapterRegistry, FormatAdapter, IngestError, open_file};
use specload_model::{Component, ComponentKind, FormatTag, SourceHandle};
use tempfile::TempDir;

const BLOCK: usize = 2880;

fn card(keyword: &str, value: &str) -> String {
    format!("{keyword:<8}= {value:>20}").chars().chain(std::iter::repeat(' ')).take(80).collect()
}

fn text(value: &str) -> String {
    format!("'{value:<8}'")
}

/// Header blocks followed by `data_len` zero bytes, both padded.
fn hdu(cards: &[(&str, String)], data_len: usize) -> Vec<u8> {
    let mut bytes: Vec<u8> = cards
        .iter()
        .flat_map(|(k, v)| card(k, v).into_bytes())
        .collect();
    bytes.extend(format!("{:<80}", "END").into_bytes());
    bytes.resize(bytes.len().div_ceil(BLOCK) * BLOCK, b' ');
    let data = data_len.div_ceil(BLOCK) * BLOCK;
    bytes.extend(std::iter::repeat_n(0u8, data));
    bytes
}

fn primary_spectrum(naxis: &[usize]) -> Vec<u8> {
    let mut cards = vec![
        ("SIMPLE", "T".to_string()),
        ("BITPIX", "-32".to_string()),
        ("NAXIS", naxis.len().to_string()),
    ];
    for (i, n) in naxis.iter().enumerate() {
        cards.push((["NAXIS1", "NAXIS2", "NAXIS3"][i], n.to_string()));
    }
    cards.extend([
        ("EXTEND", "T".to_string()),
        ("BUNIT", text("erg/s/cm2/A")),
        ("CRVAL1", "3500.0".to_string()),
        ("CDELT1", "1.5".to_string()),
        ("CUNIT1", text("Angstrom")),
        ("OBJECT", text("NGC 1275")),
    ]);
    hdu(&cards, 4 * naxis.iter().product::<usize>())
}

fn coadd_table(rows: usize) -> Vec<u8> {
    let cards = vec![
        ("XTENSION", text("BINTABLE")),
        ("BITPIX", "8".to_string()),
        ("NAXIS", "2".to_string()),
        ("NAXIS1", "12".to_string()),
        ("NAXIS2", rows.to_string()),
        ("PCOUNT", "0".to_string()),
        ("GCOUNT", "1".to_string()),
        ("TFIELDS", "3".to_string()),
        ("TTYPE1", text("loglam")),
        ("TFORM1", text("E")),
        ("TTYPE2", text("flux")),
        ("TFORM2", text("E")),
        ("TUNIT2", text("1e-17 erg/s/cm2/A")),
        ("TTYPE3", text("ivar")),
        ("TFORM3", text("E")),
        ("EXTNAME", text("COADD")),
    ];
    hdu(&cards, 12 * rows)
}

fn write(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).expect("write fixture");
    path
}

#[test]
fn fits_primary_image_and_table() {
    let dir = TempDir::new().unwrap();
    let mut bytes = primary_spectrum(&[4000]);
    bytes.extend(coadd_table(25));
    let path = write(&dir, "spec.fits", &bytes);

    let opened = open_file(&path).unwrap();
    assert_eq!(opened.format, FormatTag::Fits);
    let file = opened.file;
    assert_eq!(file.datasets().len(), 2);

    let primary = file.dataset(0).unwrap();
    assert_eq!(primary.label(), "HDU 0");
    assert_eq!(primary.meta().get("OBJECT").map(String::as_str), Some("NGC 1275"));
    let data = primary.component("DATA").unwrap();
    assert_eq!(data.kind(), ComponentKind::Array);
    assert_eq!(data.shape(), &[4000]);
    assert_eq!(data.unit(), Some("erg/s/cm2/A"));
    assert_eq!(
        data.origin().handle,
        SourceHandle::ImageData {
            data_offset: BLOCK as u64
        }
    );

    let wcs = primary.wcs_axis().unwrap();
    assert_eq!(wcs.name(), "WCS::AXIS1");
    assert_eq!(wcs.unit(), Some("Angstrom"));
    assert_eq!(wcs.shape(), &[4000]);

    let table = file.dataset(1).unwrap();
    assert_eq!(table.label(), "HDU 1");
    let names: Vec<&str> = table.component_names().collect();
    assert_eq!(names, vec!["loglam", "flux", "ivar"]);
    let flux = table.component("flux").unwrap();
    assert_eq!(flux.kind(), ComponentKind::Column);
    assert_eq!(flux.shape(), &[25]);
    assert_eq!(flux.unit(), Some("1e-17 erg/s/cm2/A"));
    assert_eq!(
        flux.origin().handle,
        SourceHandle::TableColumn { position: 1 }
    );
}

#[test]
fn fits_open_squeezes_length_one_axes() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "row.fits", &primary_spectrum(&[4000, 1]));

    let registry = AdapterRegistry::new();
    let adapter = registry.get(FormatTag::Fits).unwrap();
    let raw = adapter.parse(&path).unwrap();
    assert_eq!(raw.component(0, "DATA").map(Component::shape), Some(&[1, 4000][..]));

    let opened = registry.open(&path).unwrap();
    assert_eq!(
        opened.file.component(0, "DATA").map(Component::shape),
        Some(&[4000][..])
    );
    assert!(opened.file.component(0, "WCS::AXIS1").is_some());
}

#[test]
fn fits_named_spectral_axis() {
    let dir = TempDir::new().unwrap();
    let cards = vec![
        ("SIMPLE", "T".to_string()),
        ("BITPIX", "16".to_string()),
        ("NAXIS", "3".to_string()),
        ("NAXIS1", "4".to_string()),
        ("NAXIS2", "4".to_string()),
        ("NAXIS3", "50".to_string()),
        ("CTYPE3", text("WAVE-LOG")),
        ("EXTNAME", text("SCI")),
    ];
    let path = write(&dir, "cube.fts", &hdu(&cards, 2 * 4 * 4 * 50));
    let file = open_file(&path).unwrap().file;
    let names: Vec<&str> = file.components().map(Component::name).collect();
    assert_eq!(names, vec!["SCI", "WCS::WAVE-LOG"]);
    assert_eq!(file.component(0, "SCI").unwrap().shape(), &[50, 4, 4]);
    assert_eq!(
        file.component(0, "WCS::WAVE-LOG").unwrap().origin().handle,
        SourceHandle::WcsAxis { axis: 3 }
    );
}

#[test]
fn fits_structural_errors() {
    let dir = TempDir::new().unwrap();

    let mut truncated = primary_spectrum(&[4000]);
    truncated.truncate(BLOCK + 100);
    let path = write(&dir, "short.fits", &truncated);
    assert!(matches!(
        open_file(&path),
        Err(IngestError::FitsParse { .. })
    ));

    let path = write(&dir, "notfits.fits", &hdu(&[("NAXIS", "0".to_string())], 0));
    let err = open_file(&path).unwrap_err();
    assert!(err.to_string().contains("SIMPLE"));

    let path = write(&dir, "empty.fits", &[]);
    assert!(open_file(&path).unwrap_err().is_empty_file());

    let missing = dir.path().join("missing.fits");
    assert!(matches!(
        open_file(&missing),
        Err(IngestError::FileNotFound { .. })
    ));
}

#[test]
fn fits_oversized_data_segment_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let cards = [
        ("SIMPLE", "T".to_string()),
        ("BITPIX", "-64".to_string()),
        ("NAXIS", "2".to_string()),
        ("NAXIS1", "4294967296".to_string()),
        ("NAXIS2", "4294967296".to_string()),
    ];
    let path = write(&dir, "huge.fits", &hdu(&cards, 0));
    match open_file(&path) {
        Err(IngestError::FitsParse { message, .. }) => {
            assert_eq!(message, "HDU 0 data size overflows");
        }
        other => panic!("expected a FITS parse error, got {other:?}"),
    }

    let cards = [
        ("SIMPLE", "T".to_string()),
        ("BITPIX", "8".to_string()),
        ("NAXIS", "1".to_string()),
        ("NAXIS1", "1.0E30".to_string()),
    ];
    let path = write(&dir, "real_axis.fits", &hdu(&cards, 0));
    assert!(open_file(&path).is_ok_and(|opened| opened.file.datasets()[0].is_empty()));
}

#[test]
fn ecsv_and_text_through_registry() {
    let dir = TempDir::new().unwrap();
    let ecsv = write(
        &dir,
        "spec.ECSV",
        b"# %ECSV 1.0\n# ---\n# datatype:\n# - {name: wave, unit: nm, datatype: float64}\n# - {name: flux, datatype: float64}\nwave flux\n500.0 1.0\n501.0 2.0\n",
    );
    let opened = open_file(&ecsv).unwrap();
    assert_eq!(opened.format, FormatTag::Ecsv);
    assert_eq!(opened.file.component(0, "wave").unwrap().unit(), Some("nm"));

    let dat = write(&dir, "spec.dat", b"# lambda flux\n500 1\n501 2\n502 3\n");
    let opened = open_file(&dat).unwrap();
    assert_eq!(opened.format, FormatTag::Ascii);
    let names: Vec<&str> = opened.file.components().map(Component::name).collect();
    assert_eq!(names, vec!["col1", "col2"]);
}

#[test]
fn unsupported_suffix() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "spec.h5", b"\x89HDF");
    let err = open_file(&path).unwrap_err();
    assert!(matches!(err, IngestError::UnsupportedFormat { .. }));
}
