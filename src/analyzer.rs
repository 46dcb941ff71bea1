//! Turns persisted artifacts into an average daily profile:
//! [`load`] → [`flatten`] → [`aggregate`] → [`crate::tables::build_profile_table`].

pub mod aggregate;
pub mod bucket;
pub mod flatten;
pub mod load;
pub mod metric;
pub mod record;

pub use self::{
    aggregate::{ProfileCell, ProfileTable, aggregate},
    bucket::Bucket,
    flatten::flatten,
    load::{LoadReport, load},
    record::{EnergyRecord, Observation},
};

#[cfg(test)]
mod tests {
    use std::fs;

    use approx::assert_abs_diff_eq;
    use chrono::NaiveTime;
    use tempfile::TempDir;

    use super::*;
    use crate::prelude::*;

    #[test]
    fn test_pipeline_over_artifacts() -> Result {
        let directory = TempDir::new()?;
        fs::write(
            directory.path().join("2024-01-01.json"),
            r#"{"data":{"xAxis":["2024-01-01 08:00"],"usePower":["100"]}}"#,
        )?;
        fs::write(
            directory.path().join("2024-01-02.json"),
            r#"{"data":{"xAxis":["2024-01-02 08:00"],"usePower":["200"]}}"#,
        )?;
        fs::write(directory.path().join("2024-01-03.json"), "<html>session expired</html>")?;

        let report = load([directory.path()]);
        assert_eq!(report.failures.len(), 1);
        let records = report.into_records();
        let profile = aggregate(flatten(&records), bucket::time_of_day);

        let eight = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        assert_eq!(profile.len(), 1);
        assert_abs_diff_eq!(profile.get(&eight, "usePower").unwrap(), 150.0);
        Ok(())
    }
}
