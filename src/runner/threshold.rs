use serde::{Deserialize, Serialize};

use super::{record_today, Observation, Outcome, Runner, SuppressReason};
use crate::error::StoreError;
use crate::notify::compose::{compose, format_days, threshold_body, MessageTemplate, Placeholders};
use crate::stats::day::RunDays;
use crate::stats::threshold::ThresholdTracker;
use crate::stats::Snapshot;
use crate::store::RecordStore;

fn default_scale_factor() -> u64 {
    1_000_000
}

/// Reports the first observation of each new `cases / scale_factor` bucket,
/// with the number of days spent in the previous bucket range.
///
/// Template placeholders: `{days}` and `{time}` (elapsed days, pluralized),
/// `{valueBefore}` (yesterday's bucket), `{valueNow}` (today's bucket).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdRunner {
    #[serde(default = "default_scale_factor")]
    pub scale_factor: u64,
    /// Rewrite today's record even when unchanged. A bucket is still only
    /// reported once per day.
    #[serde(default)]
    pub skip_delta_check: bool,
}

impl Default for ThresholdRunner {
    fn default() -> Self {
        Self {
            scale_factor: default_scale_factor(),
            skip_delta_check: false,
        }
    }
}

impl ThresholdRunner {
    pub fn new(scale_factor: u64, skip_delta_check: bool) -> Self {
        Self {
            scale_factor,
            skip_delta_check,
        }
    }
}

impl Runner for ThresholdRunner {
    fn decide(
        &self,
        latest: &Snapshot,
        store: &mut RecordStore,
        days: &RunDays,
        template: &MessageTemplate,
    ) -> Result<Outcome, StoreError> {
        tracing::info!(day = %days.today, scale_factor = self.scale_factor, "running daily threshold");
        let tracker = ThresholdTracker::new(self.scale_factor);
        let scaled_today = tracker.scaled_value(latest);

        match record_today(store, &days.today, latest, self.skip_delta_check)? {
            Observation::Unchanged => return Ok(Outcome::Suppressed(SuppressReason::Unchanged)),
            Observation::Changed(previous) if !tracker.crossed(&previous, latest) => {
                tracing::info!(day = %days.today, scaled = scaled_today, "bucket already seen today, skipping");
                return Ok(Outcome::Suppressed(SuppressReason::AlreadyReported));
            }
            Observation::Changed(_) | Observation::Fresh => {}
        }

        let Some(yesterday) = store.find(&days.yesterday).map(|r| r.snapshot) else {
            tracing::info!(day = %days.yesterday, "no baseline, cannot calc threshold");
            return Ok(Outcome::Suppressed(SuppressReason::NoBaseline));
        };

        let scaled_yesterday = tracker.scaled_value(&yesterday);
        if !tracker.crossed(&yesterday, latest) {
            tracing::info!(
                today = scaled_today,
                yesterday = scaled_yesterday,
                "scaled cases not higher than yesterday, skipping"
            );
            return Ok(Outcome::Suppressed(SuppressReason::NoCrossing));
        }

        let elapsed = tracker.elapsed_days(store.scan_ascending(), scaled_yesterday, scaled_today);
        tracing::info!(
            day = %days.today,
            from = scaled_yesterday,
            to = scaled_today,
            elapsed,
            "threshold crossed, notifying"
        );

        let placeholders = Placeholders::new()
            .with("days", format_days(elapsed))
            .with("time", format_days(elapsed))
            .with("valueBefore", scaled_yesterday.to_string())
            .with("valueNow", scaled_today.to_string());
        Ok(Outcome::Emit(compose(template, threshold_body(latest), &placeholders)))
    }

    fn name(&self) -> &'static str {
        "threshold"
    }
}
