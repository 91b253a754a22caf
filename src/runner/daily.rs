use serde::{Deserialize, Serialize};

use super::{record_today, Observation, Outcome, Runner, SuppressReason};
use crate::error::StoreError;
use crate::notify::compose::{compose, daily_body, MessageTemplate, Placeholders};
use crate::stats::day::RunDays;
use crate::stats::delta::{delta, trend};
use crate::stats::Snapshot;
use crate::store::RecordStore;

/// Reports day-over-day changes for every counter, with a trend glyph when a
/// record from two days ago exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStatsRunner {
    /// Rewrite and re-report even when today's snapshot is unchanged.
    #[serde(default)]
    pub skip_delta_check: bool,
}

impl DailyStatsRunner {
    pub fn new(skip_delta_check: bool) -> Self {
        Self { skip_delta_check }
    }
}

impl Runner for DailyStatsRunner {
    fn decide(
        &self,
        latest: &Snapshot,
        store: &mut RecordStore,
        days: &RunDays,
        template: &MessageTemplate,
    ) -> Result<Outcome, StoreError> {
        tracing::info!(day = %days.today, "running daily stats");

        if record_today(store, &days.today, latest, self.skip_delta_check)? == Observation::Unchanged {
            return Ok(Outcome::Suppressed(SuppressReason::Unchanged));
        }

        let Some(yesterday) = store.find(&days.yesterday).map(|r| r.snapshot) else {
            tracing::info!(day = %days.yesterday, "no baseline, cannot calc stats");
            return Ok(Outcome::Suppressed(SuppressReason::NoBaseline));
        };

        let delta_today = delta(latest, &yesterday);
        if delta_today.is_zero() {
            tracing::info!(today = %days.today, yesterday = %days.yesterday, "days are equal, skipping");
            return Ok(Outcome::Suppressed(SuppressReason::NoChange));
        }

        let trends = store
            .find(&days.before_yesterday)
            .map(|r| trend(&delta_today, &yesterday, &r.snapshot));

        tracing::info!(day = %days.today, with_trend = trends.is_some(), "notifying daily stats");
        let body = daily_body(latest, &delta_today, trends.as_ref());
        Ok(Outcome::Emit(compose(template, body, &Placeholders::new())))
    }

    fn name(&self) -> &'static str {
        "daily"
    }
}
