//! Verify a stored configuration against a file.

use std::fmt;

use specload_model::{ColumnSource, DataFile, DispersionSource, LoaderConfig, Role};

/// One descriptor of a configuration that does not resolve in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigMismatch {
    MissingDataset { role: Role, dataset: usize },
    MissingComponent { role: Role, dataset: usize, component: String },
    /// WCS dispersion on a dataset without a spectral coordinate axis.
    MissingWcs { dataset: usize },
}

impl fmt::Display for ConfigMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigMismatch::MissingDataset { role, dataset } => {
                write!(f, "{role}: file has no dataset {dataset}")
            }
            ConfigMismatch::MissingComponent {
                role,
                dataset,
                component,
            } => write!(f, "{role}: dataset {dataset} has no component '{component}'"),
            ConfigMismatch::MissingWcs { dataset } => {
                write!(f, "dispersion: dataset {dataset} has no spectral WCS axis")
            }
        }
    }
}

/// Every descriptor of `config` that `file` cannot satisfy, in record order.
///
/// An empty result means the configuration applies to the file.
pub fn check_config(config: &LoaderConfig, file: &DataFile) -> Vec<ConfigMismatch> {
    let mut mismatches = Vec::new();

    match config.dispersion() {
        DispersionSource::Wcs { wcs_hdu } => match file.dataset(*wcs_hdu) {
            None => mismatches.push(ConfigMismatch::MissingDataset {
                role: Role::Dispersion,
                dataset: *wcs_hdu,
            }),
            Some(dataset) if dataset.wcs_axis().is_none() => {
                mismatches.push(ConfigMismatch::MissingWcs { dataset: *wcs_hdu });
            }
            Some(_) => {}
        },
        DispersionSource::Component { dispersion } => {
            lookup(&mut mismatches, file, Role::Dispersion, dispersion.hdu, &dispersion.col);
        }
    }

    let data: &ColumnSource = config.data();
    lookup(&mut mismatches, file, Role::Data, data.hdu, &data.col);
    if let Some(uncertainty) = config.uncertainty() {
        lookup(&mut mismatches, file, Role::Uncertainty, uncertainty.hdu, &uncertainty.col);
    }
    if let Some(mask) = config.mask() {
        lookup(&mut mismatches, file, Role::Mask, mask.hdu, &mask.col);
    }

    tracing::debug!(
        name = config.name(),
        path = %file.path().display(),
        mismatches = mismatches.len(),
        "checked loader configuration"
    );
    mismatches
}

fn lookup(
    mismatches: &mut Vec<ConfigMismatch>,
    file: &DataFile,
    role: Role,
    dataset: usize,
    component: &str,
) {
    if file.dataset(dataset).is_none() {
        mismatches.push(ConfigMismatch::MissingDataset { role, dataset });
    } else if file.component(dataset, component).is_none() {
        mismatches.push(ConfigMismatch::MissingComponent {
            role,
            dataset,
            component: component.to_string(),
        });
    }
}
