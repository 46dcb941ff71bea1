use itertools::Itertools;

use crate::analyzer::record::{EnergyRecord, Observation};

/// Merge the records into a single chronological stream of observations.
///
/// Lazy and side-effect free: calling it again on the same records yields the same stream.
pub fn flatten(records: &[EnergyRecord]) -> impl Iterator<Item = Observation<'_>> {
    records
        .iter()
        .map(EnergyRecord::observations)
        .kmerge_by(|left, right| left.timestamp < right.timestamp)
}
