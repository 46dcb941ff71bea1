use std::{collections::BTreeMap, fs, path::Path};

use chrono::NaiveDateTime;
use itertools::Itertools;
use serde::Deserialize;
use serde_json::Value;

use crate::prelude::*;

/// Parsed energy balance document.
///
/// Every metric series is aligned with [`EnergyRecord::timestamps`], which are sorted.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct EnergyRecord {
    timestamps: Vec<NaiveDateTime>,
    series: BTreeMap<String, Vec<Option<f64>>>,
}

/// Single flattened measurement.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Observation<'a> {
    pub timestamp: NaiveDateTime,
    pub metric: &'a str,
    pub value: f64,
}

impl EnergyRecord {
    #[instrument(skip_all, level = Level::DEBUG, fields(path = %path.display()))]
    pub fn read_from(path: &Path) -> Result<Self, Error> {
        let bytes = fs::read(path).map_err(|error| Error::io(path, error))?;
        let this =
            Self::from_slice(&bytes).map_err(|error| Error::malformed(path, format!("{error:#}")))?;
        debug!(n_timestamps = this.timestamps().len(), n_series = this.series.len(), "parsed");
        Ok(this)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let data = serde_json::from_slice::<Document>(bytes)
            .context("not an energy balance document")?
            .data;
        let timestamps =
            data.x_axis.iter().map(|label| parse_timestamp(label)).collect::<Result<Vec<_>>>()?;
        let order = (0..timestamps.len()).sorted_by_key(|index| timestamps[*index]).collect_vec();

        let mut series = BTreeMap::new();
        for (metric, value) in data.other {
            let Value::Array(values) = value else { continue };
            ensure!(
                values.len() == timestamps.len(),
                "series `{metric}` has {} values for {} timestamps",
                values.len(),
                timestamps.len(),
            );
            let values = order.iter().map(|index| parse_value(&values[*index])).collect_vec();
            series.insert(metric, values);
        }
        ensure!(!series.is_empty(), "no measurement series next to `xAxis`");

        let timestamps = order.iter().map(|index| timestamps[*index]).collect();
        Ok(Self { timestamps, series })
    }

    #[must_use]
    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    /// Present values in chronological order, metrics sorted by name within a timestamp.
    pub fn observations(&self) -> impl Iterator<Item = Observation<'_>> {
        self.timestamps.iter().enumerate().flat_map(move |(index, timestamp)| {
            self.series.iter().filter_map(move |(metric, values)| {
                values[index].map(|value| Observation {
                    timestamp: *timestamp,
                    metric: metric.as_str(),
                    value,
                })
            })
        })
    }
}

#[derive(Deserialize)]
struct Document {
    data: Data,
}

#[derive(Deserialize)]
struct Data {
    #[serde(rename = "xAxis")]
    x_axis: Vec<String>,

    #[serde(flatten)]
    other: serde_json::Map<String, Value>,
}

const TIMESTAMP_FORMATS: [&str; 4] =
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

fn parse_timestamp(label: &str) -> Result<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(label, format).ok())
        .with_context(|| format!("invalid timestamp `{label}`"))
}

/// The dashboard sends numbers as strings, and `--` when there is no value.
fn parse_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(string) => string.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    use super::*;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, day).unwrap().and_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_from_slice_ok() -> Result {
        // language=JSON
        const DOCUMENT: &[u8] = br#"
            {
                "success": true,
                "data": {
                    "xAxis": ["2025-08-12 00:00", "2025-08-12 00:05", "2025-08-12 00:10"],
                    "productPower": ["--", "0.00", "0.12"],
                    "usePower": ["0.512", 0.498, null],
                    "totalUsePower": "12.45"
                },
                "failCode": 0
            }
        "#;
        let record = EnergyRecord::from_slice(DOCUMENT)?;
        assert_eq!(record.timestamps(), [at(12, 0, 0), at(12, 0, 5), at(12, 0, 10)]);
        assert_eq!(record.series.keys().collect_vec(), ["productPower", "usePower"]);

        let observations = record.observations().collect_vec();
        assert_eq!(observations.len(), 4);
        assert_eq!(observations[0].metric, "usePower");
        assert_abs_diff_eq!(observations[0].value, 0.512);
        assert_eq!(observations[1].metric, "productPower");
        assert_eq!(observations[1].timestamp, at(12, 0, 5));
        assert_abs_diff_eq!(observations[3].value, 0.12);
        Ok(())
    }

    #[test]
    fn test_from_slice_sorts_timestamps() -> Result {
        // language=JSON
        const DOCUMENT: &[u8] = br#"
            {"data": {"xAxis": ["2025-08-12 00:05:00", "2025-08-12 00:00:00"], "usePower": ["2", "1"]}}
        "#;
        let record = EnergyRecord::from_slice(DOCUMENT)?;
        assert_eq!(record.timestamps(), [at(12, 0, 0), at(12, 0, 5)]);
        let values = record.observations().map(|observation| observation.value).collect_vec();
        assert_eq!(values, [1.0, 2.0]);
        Ok(())
    }

    #[test]
    fn test_from_slice_missing_axis() {
        assert!(EnergyRecord::from_slice(br#"{"data": {"usePower": []}}"#).is_err());
        assert!(EnergyRecord::from_slice(br#"{"success": false}"#).is_err());
    }

    #[test]
    fn test_from_slice_invalid_timestamp() {
        let result = EnergyRecord::from_slice(br#"{"data": {"xAxis": ["yesterday"]}}"#);
        assert!(format!("{:#}", result.unwrap_err()).contains("yesterday"));
    }

    #[test]
    fn test_from_slice_truncated_series() {
        // language=JSON
        let result = EnergyRecord::from_slice(
            br#"{"data": {"xAxis": ["2025-08-12 00:00", "2025-08-12 00:05"], "usePower": ["1.0"]}}"#,
        );
        assert!(format!("{:#}", result.unwrap_err()).contains("`usePower` has 1 values for 2"));
    }

    #[test]
    fn test_from_slice_without_series() {
        // language=JSON
        let result = EnergyRecord::from_slice(
            br#"{"data": {"xAxis": ["2025-08-12 00:00"], "totalUsePower": "12.45"}}"#,
        );
        assert!(format!("{:#}", result.unwrap_err()).contains("no measurement series"));
    }

    #[test]
    fn test_parse_timestamp_iso() -> Result {
        assert_eq!(parse_timestamp("2025-08-12T08:00")?, at(12, 8, 0));
        assert_eq!(parse_timestamp("2025-08-12T08:00:00")?, at(12, 8, 0));
        assert_eq!(parse_timestamp("2025-08-12 08:00")?, at(12, 8, 0));
        Ok(())
    }

    #[test]
    fn test_parse_value_rejects_non_finite() {
        assert_eq!(parse_value(&Value::from("NaN")), None);
        assert_eq!(parse_value(&Value::from("inf")), None);
        assert_eq!(parse_value(&Value::from("--")), None);
        assert_eq!(parse_value(&Value::from(" 1.5 ")), Some(1.5));
    }

    #[test]
    fn test_read_from_invalid_json() -> Result {
        let file = tempfile::NamedTempFile::new()?;
        fs::write(file.path(), "{not json")?;
        let result = EnergyRecord::read_from(file.path());
        assert!(matches!(result, Err(Error::MalformedData { path, .. }) if path == file.path()));
        Ok(())
    }
}
