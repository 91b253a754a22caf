//! Milestone crossings of a scaled counter.
//!
//! `cases` is bucketed by `scale_factor` (one million for the world feed); a
//! crossing is the bucket strictly increasing between two observations.

use super::Snapshot;
use crate::store::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdTracker {
    scale_factor: i64,
}

impl ThresholdTracker {
    /// `scale_factor` below 1 is treated as 1.
    pub fn new(scale_factor: u64) -> Self {
        Self {
            scale_factor: i64::try_from(scale_factor).unwrap_or(i64::MAX).max(1),
        }
    }

    pub fn scale_factor(&self) -> i64 {
        self.scale_factor
    }

    /// `floor(cases / scale_factor)`.
    pub fn scaled_value(&self, snapshot: &Snapshot) -> i64 {
        snapshot.cases.div_euclid(self.scale_factor)
    }

    /// True when `latest` sits in a higher bucket than `previous`.
    pub fn crossed(&self, previous: &Snapshot, latest: &Snapshot) -> bool {
        self.scaled_value(latest) > self.scaled_value(previous)
    }

    /// Number of records whose bucket lies in `[from, to)`: the days spent
    /// between the previous milestone and the current one.
    pub fn elapsed_days<'a>(&self, records: impl IntoIterator<Item = &'a Record>, from: i64, to: i64) -> usize {
        records
            .into_iter()
            .map(|r| self.scaled_value(&r.snapshot))
            .filter(|v| (from..to).contains(v))
            .count()
    }
}
