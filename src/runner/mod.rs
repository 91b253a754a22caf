//! # Run decision
//! Turns today's snapshot into "nothing to say" or a notification.
//!
//! Both runners share the same bookkeeping for today's record: add it when
//! absent, update it when the new snapshot differs, and stop early when it is
//! unchanged (unless `skip_delta_check` forces the update through). The store
//! write always happens before any notification is composed.

pub mod daily;
pub mod threshold;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use daily::DailyStatsRunner;
pub use threshold::ThresholdRunner;

use crate::error::StoreError;
use crate::notify::{MessageTemplate, Notification};
use crate::stats::day::RunDays;
use crate::stats::{delta::delta, Snapshot};
use crate::store::RecordStore;

/// Why a run produced no notification. Not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressReason {
    /// Today's record already holds this exact snapshot.
    Unchanged,
    /// No record for yesterday to compare against.
    NoBaseline,
    /// Today equals yesterday on every counter.
    NoChange,
    /// The milestone bucket for today was already reported earlier today.
    AlreadyReported,
    /// The scaled counter did not move past yesterday's bucket.
    NoCrossing,
}

impl fmt::Display for SuppressReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SuppressReason::Unchanged => "today's record has not changed",
            SuppressReason::NoBaseline => "no record for yesterday",
            SuppressReason::NoChange => "today and yesterday are equal",
            SuppressReason::AlreadyReported => "milestone already reported today",
            SuppressReason::NoCrossing => "no milestone crossed since yesterday",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Suppressed(SuppressReason),
    Emit(Notification),
}

impl Outcome {
    pub fn notification(&self) -> Option<&Notification> {
        match self {
            Outcome::Emit(n) => Some(n),
            Outcome::Suppressed(_) => None,
        }
    }

    pub fn is_suppressed(&self) -> bool {
        matches!(self, Outcome::Suppressed(_))
    }
}

/// A decision procedure over one source's store.
pub trait Runner {
    fn decide(
        &self,
        latest: &Snapshot,
        store: &mut RecordStore,
        days: &RunDays,
        template: &MessageTemplate,
    ) -> Result<Outcome, StoreError>;

    fn name(&self) -> &'static str;
}

/// Runner selection as it appears in the sources file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunnerKind {
    Daily(DailyStatsRunner),
    Threshold(ThresholdRunner),
}

impl RunnerKind {
    pub fn set_skip_delta_check(&mut self, skip: bool) {
        match self {
            RunnerKind::Daily(r) => r.skip_delta_check = skip,
            RunnerKind::Threshold(r) => r.skip_delta_check = skip,
        }
    }
}

impl Runner for RunnerKind {
    fn decide(
        &self,
        latest: &Snapshot,
        store: &mut RecordStore,
        days: &RunDays,
        template: &MessageTemplate,
    ) -> Result<Outcome, StoreError> {
        match self {
            RunnerKind::Daily(r) => r.decide(latest, store, days, template),
            RunnerKind::Threshold(r) => r.decide(latest, store, days, template),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            RunnerKind::Daily(r) => r.name(),
            RunnerKind::Threshold(r) => r.name(),
        }
    }
}

/// Result of writing today's snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Observation {
    /// First record for today.
    Fresh,
    /// Today's record was replaced; holds the snapshot it had before.
    Changed(Snapshot),
    /// Identical to the stored record; nothing written.
    Unchanged,
}

pub(crate) fn record_today(
    store: &mut RecordStore,
    day: &str,
    latest: &Snapshot,
    skip_delta_check: bool,
) -> Result<Observation, StoreError> {
    let Some(existing) = store.find(day).map(|r| r.snapshot) else {
        tracing::info!(day, "no record for today, adding");
        store.add(day, *latest)?;
        return Ok(Observation::Fresh);
    };

    if delta(latest, &existing).is_zero() && !skip_delta_check {
        tracing::info!(day, "record has not changed, skipping");
        return Ok(Observation::Unchanged);
    }

    tracing::info!(day, "record is out of date, updating");
    let updated = store.update(day, *latest);
    debug_assert!(
        !matches!(updated, Err(StoreError::NotFound(_))),
        "record for {day} vanished between find and update"
    );
    updated?;
    Ok(Observation::Changed(existing))
}
