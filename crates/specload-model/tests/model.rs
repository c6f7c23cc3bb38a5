//! Tests for specload-model types.

use specload_model::{
    ColumnSource, Component, ComponentKind, DataFile, Dataset, DispersionSource, LoaderConfig,
    MaskSource, ModelError, OriginRef, SourceHandle, StandardMask, UncertaintyKind,
    UncertaintySource,
};

fn column(dataset: usize, position: usize, name: &str) -> Component {
    Component::new(
        name,
        ComponentKind::Column,
        OriginRef {
            dataset,
            handle: SourceHandle::TableColumn { position },
        },
    )
}

fn wcs(dataset: usize) -> Component {
    Component::new(
        "WCS::WAVE",
        ComponentKind::WcsAxis,
        OriginRef {
            dataset,
            handle: SourceHandle::WcsAxis { axis: 1 },
        },
    )
}

fn two_hdu_file() -> DataFile {
    DataFile::new(
        "spec.fits",
        vec![
            Dataset::new(0, "HDU 0").with_component(wcs(0)),
            Dataset::new(1, "HDU 1").with_components([
                column(1, 0, "WAVE"),
                column(1, 1, "FLUX").with_shape(vec![1, 10]),
                column(1, 2, "ERR"),
            ]),
        ],
    )
    .expect("valid file")
}

#[test]
fn empty_file_is_rejected() {
    let err = DataFile::new("empty.fits", vec![]).unwrap_err();
    assert!(matches!(err, ModelError::EmptyFile { .. }));
    assert_eq!(err.to_string(), "file contains no datasets: empty.fits");
}

#[test]
fn duplicate_component_names_are_rejected() {
    let err = DataFile::new(
        "dup.ecsv",
        vec![Dataset::new(0, "Table").with_components([column(0, 0, "A"), column(0, 1, "A")])],
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ModelError::DuplicateComponent { dataset: 0, ref component } if component == "A"
    ));
}

#[test]
fn misplaced_dataset_is_rejected() {
    let err = DataFile::new("x.fits", vec![Dataset::new(3, "HDU 3")]).unwrap_err();
    assert!(matches!(
        err,
        ModelError::DatasetIndexMismatch {
            position: 0,
            index: 3
        }
    ));

    let err = DataFile::new(
        "x.fits",
        vec![Dataset::new(0, "HDU 0").with_component(column(2, 0, "FLUX"))],
    )
    .unwrap_err();
    assert!(matches!(err, ModelError::DatasetIndexMismatch { .. }));
}

#[test]
fn lookup_by_dataset_and_name() {
    let file = two_hdu_file();
    assert_eq!(file.datasets().len(), 2);
    assert_eq!(file.component_count(), 4);

    let flux = file.component(1, "FLUX").expect("FLUX exists");
    assert_eq!(flux.kind(), ComponentKind::Column);
    assert_eq!(flux.dataset(), 1);

    assert!(file.component(0, "FLUX").is_none());
    assert!(file.component(7, "FLUX").is_none());
    assert!(file.dataset(0).and_then(Dataset::wcs_axis).is_some());
    assert!(file.dataset(1).and_then(Dataset::wcs_axis).is_none());

    let names: Vec<&str> = file.components().map(Component::name).collect();
    assert_eq!(names, vec!["WCS::WAVE", "WAVE", "FLUX", "ERR"]);
}

#[test]
fn map_components_keeps_structure() {
    let file = two_hdu_file();
    let mapped = file.clone().map_components(|c| c.with_unit(Some("Angstrom".into())));
    assert_eq!(mapped.datasets().len(), file.datasets().len());
    for (before, after) in file.components().zip(mapped.components()) {
        assert_eq!(before.name(), after.name());
        assert_eq!(before.origin(), after.origin());
        assert_eq!(after.unit(), Some("Angstrom"));
    }
}

fn full_record() -> LoaderConfig {
    LoaderConfig::new(
        "sdss-spec",
        &["fits"],
        DispersionSource::Component {
            dispersion: ColumnSource {
                hdu: 1,
                col: "loglam".to_string(),
                unit: None,
            },
        },
        ColumnSource {
            hdu: 1,
            col: "flux".to_string(),
            unit: Some("1e-17 erg/s/cm2/A".to_string()),
        },
        Some(UncertaintySource {
            hdu: 1,
            col: "ivar".to_string(),
            kind: UncertaintyKind::InverseVariance,
        }),
        Some(MaskSource {
            hdu: 1,
            col: "and_mask".to_string(),
            definition: Some(StandardMask::Sdss),
        }),
    )
}

#[test]
fn record_serializes_keys_in_order() {
    let record = LoaderConfig::new(
        "wcs-only",
        &["fits"],
        DispersionSource::Wcs { wcs_hdu: 0 },
        ColumnSource {
            hdu: 0,
            col: "FLUX".to_string(),
            unit: None,
        },
        None,
        None,
    );
    let json = serde_json::to_string(&record).expect("serialize record");
    assert_eq!(
        json,
        r#"{"name":"wcs-only","extension":["fits"],"wcs_hdu":0,"data":{"hdu":0,"col":"FLUX"},"meta_author":"Wizard"}"#
    );
}

#[test]
fn full_record_serializes_flat_uncertainty() {
    let json = serde_json::to_string(&full_record()).expect("serialize record");
    assert_eq!(
        json,
        concat!(
            r#"{"name":"sdss-spec","extension":["fits"],"#,
            r#""dispersion":{"hdu":1,"col":"loglam"},"#,
            r#""data":{"hdu":1,"col":"flux","unit":"1e-17 erg/s/cm2/A"},"#,
            r#""uncertainty_hdu":1,"uncertainty_col":"ivar","uncertainty_type":"ivar","#,
            r#""mask":{"hdu":1,"col":"and_mask","definition":"sdss"},"#,
            r#""meta_author":"Wizard"}"#
        )
    );
}

#[test]
fn record_reads_back_from_yaml() {
    let record = full_record();
    let yaml = serde_yaml::to_string(&record).expect("serialize yaml");
    let parsed: LoaderConfig = serde_yaml::from_str(&yaml).expect("parse yaml");
    assert_eq!(parsed, record);

    let wcs_yaml = "name: x\nextension:\n- fits\nwcs_hdu: 2\ndata:\n  hdu: 2\n  col: SCI\nmeta_author: Wizard\n";
    let parsed: LoaderConfig = serde_yaml::from_str(wcs_yaml).expect("parse wcs yaml");
    assert_eq!(parsed.dispersion(), &DispersionSource::Wcs { wcs_hdu: 2 });
    assert!(parsed.uncertainty().is_none());
    assert!(parsed.mask().is_none());
}

#[test]
fn same_mapping_ignores_name() {
    let a = full_record();
    let b = LoaderConfig::new(
        "another-name",
        &["fits"],
        a.dispersion().clone(),
        a.data().clone(),
        a.uncertainty().cloned(),
        a.mask().cloned(),
    );
    assert_ne!(a, b);
    assert!(a.same_mapping(&b));
    assert_eq!(b.meta_author(), "Wizard");
}
