use std::{fs, path::PathBuf, thread, time::Duration};

use bon::Builder;

use crate::{
    api::fusion_solar::{Api, Transport, WINDOW_DAYS},
    core::{Credential, DateRange},
    prelude::*,
};

/// Downloads energy balance artifacts, one file per day.
#[derive(Builder)]
pub struct Fetcher<T> {
    api: Api<T>,

    #[builder(into)]
    output_dir: PathBuf,

    /// Pause between consecutive requests.
    #[builder(default)]
    delay: Duration,
}

impl<T: Transport> Fetcher<T> {
    /// Fetch the range window by window and persist each response verbatim.
    ///
    /// Stops at the first failure. Artifacts written before it stay on disk.
    #[instrument(skip_all, fields(date_range = %date_range))]
    pub fn fetch(
        &self,
        date_range: DateRange,
        credential: &Credential,
    ) -> Result<Vec<PathBuf>, Error> {
        let mut paths = Vec::new();
        for (index, window) in date_range.windows(WINDOW_DAYS).enumerate() {
            if index != 0 && !self.delay.is_zero() {
                debug!(delay = ?self.delay, "sleeping…");
                thread::sleep(self.delay);
            }
            let body = self.api.get_energy_balance(window, credential)?;
            let path = self.write_artifact(window, &body)?;
            info!(%window, path = %path.display(), n_bytes = body.len(), "saved");
            paths.push(path);
        }
        info!(n_artifacts = paths.len(), output_dir = %self.output_dir.display(), "done");
        Ok(paths)
    }

    fn write_artifact(&self, window: DateRange, body: &[u8]) -> Result<PathBuf, Error> {
        fs::create_dir_all(&self.output_dir).map_err(|error| Error::io(&self.output_dir, error))?;
        let path = self.artifact_path(window);
        fs::write(&path, body).map_err(|error| Error::io(&path, error))?;
        Ok(path)
    }

    #[must_use]
    pub fn artifact_path(&self, window: DateRange) -> PathBuf {
        self.output_dir.join(window.file_name())
    }
}
