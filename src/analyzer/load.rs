use std::{
    fs,
    path::{Path, PathBuf},
};

use itertools::Itertools;

use crate::{analyzer::record::EnergyRecord, prelude::*};

/// Outcome of loading a batch of artifacts.
///
/// A broken file never spoils the rest of the batch, it ends up in `failures` instead.
#[must_use]
#[derive(Default)]
pub struct LoadReport {
    pub records: Vec<(PathBuf, EnergyRecord)>,
    pub failures: Vec<Error>,
}

impl LoadReport {
    /// Drop the paths.
    #[must_use]
    pub fn into_records(self) -> Vec<EnergyRecord> {
        self.records.into_iter().map(|(_, record)| record).collect()
    }
}

/// Load the artifacts, directories are expanded to the `*.json` files they contain.
#[instrument(skip_all)]
pub fn load<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> LoadReport {
    let mut report = LoadReport::default();
    for path in paths {
        let path = path.as_ref();
        let files = if path.is_dir() {
            match list_artifacts(path) {
                Ok(files) => files,
                Err(error) => {
                    warn!(path = %path.display(), "failed to list the directory");
                    report.failures.push(error);
                    continue;
                }
            }
        } else {
            vec![path.to_path_buf()]
        };
        for file in files {
            match EnergyRecord::read_from(&file) {
                Ok(record) => report.records.push((file, record)),
                Err(error) => {
                    warn!(path = %file.display(), "skipping: {error:#}");
                    report.failures.push(error);
                }
            }
        }
    }
    info!(n_records = report.records.len(), n_failures = report.failures.len(), "loaded");
    report
}

fn list_artifacts(directory: &Path) -> Result<Vec<PathBuf>, Error> {
    let entries = fs::read_dir(directory).map_err(|error| Error::io(directory, error))?;
    let mut files = entries
        .map_ok(|entry| entry.path())
        .filter_ok(|path| {
            path.is_file() && path.extension().is_some_and(|extension| extension == "json")
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(|error| Error::io(directory, error))?;
    files.sort();
    Ok(files)
}
