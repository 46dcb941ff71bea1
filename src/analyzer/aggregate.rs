use std::collections::{BTreeMap, BTreeSet};

use average::{Estimate, Mean};
use chrono::NaiveDateTime;

use crate::analyzer::record::Observation;

/// Averaged observations: buckets are rows, metrics are columns.
///
/// Only buckets with at least one observation are present, nothing is zero-filled.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileTable<K> {
    rows: BTreeMap<K, BTreeMap<String, ProfileCell>>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProfileCell {
    pub mean: f64,
    pub n_observations: u64,
}

/// Group the observations by the bucket and metric, and average each group.
pub fn aggregate<'a, K: Ord>(
    observations: impl IntoIterator<Item = Observation<'a>>,
    bucket: impl Fn(NaiveDateTime) -> K,
) -> ProfileTable<K> {
    let mut estimates: BTreeMap<K, BTreeMap<&'a str, Mean>> = BTreeMap::new();
    for observation in observations {
        estimates
            .entry(bucket(observation.timestamp))
            .or_default()
            .entry(observation.metric)
            .or_insert_with(Mean::new)
            .add(observation.value);
    }
    let rows = estimates
        .into_iter()
        .map(|(key, metrics)| {
            let cells = metrics
                .into_iter()
                .map(|(metric, estimate)| {
                    let cell =
                        ProfileCell { mean: estimate.mean(), n_observations: estimate.len() };
                    (metric.to_string(), cell)
                })
                .collect();
            (key, cells)
        })
        .collect();
    ProfileTable { rows }
}

impl<K: Ord> ProfileTable<K> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn get(&self, bucket: &K, metric: &str) -> Option<f64> {
        self.rows.get(bucket)?.get(metric).map(|cell| cell.mean)
    }

    pub fn rows(&self) -> impl Iterator<Item = (&K, &BTreeMap<String, ProfileCell>)> {
        self.rows.iter()
    }

    /// All metrics present in at least one bucket, sorted by name.
    #[must_use]
    pub fn metrics(&self) -> BTreeSet<&str> {
        self.rows.values().flat_map(BTreeMap::keys).map(String::as_str).collect()
    }

    /// Averages of the metric across the buckets where it is present.
    pub fn column<'a>(&'a self, metric: &'a str) -> impl Iterator<Item = f64> + 'a {
        self.rows.values().filter_map(move |cells| cells.get(metric)).map(|cell| cell.mean)
    }
}
