//! # Pipeline
//! One cycle over all configured sources: fetch → extract → decide → notify.
//!
//! Sources run strictly one after another. A failure in one source (fetch,
//! extraction, store) is logged and counted, and the cycle moves on.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::Instrument;

use crate::config::{AppConfig, SourceConfig};
use crate::fetch::Fetcher;
use crate::notify::{self, DeliveryStatus, Notifier};
use crate::runner::{Outcome, Runner};
use crate::stats::day::RunDays;
use crate::stats::Snapshot;
use crate::store::StoreRegistry;

/// One-time metrics registration (so series show up once a recorder is installed).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("tracker_runs_total", "Source runs started.");
        describe_counter!(
            "tracker_source_errors_total",
            "Source runs aborted by fetch, extraction or store errors."
        );
        describe_counter!(
            "tracker_notifications_total",
            "Composed notifications handed to a sink, by delivery status."
        );
        describe_counter!(
            "tracker_suppressed_total",
            "Source runs that ended without a notification."
        );
        describe_gauge!("tracker_last_run_ts", "Unix ts when the last cycle finished.");
    });
}

/// Result of one source in a cycle.
#[derive(Debug)]
pub struct SourceReport {
    pub id: String,
    pub result: Result<DeliveryStatus>,
}

impl SourceReport {
    pub fn status(&self) -> Option<DeliveryStatus> {
        self.result.as_ref().ok().copied()
    }
}

/// Owns the sources, their stores and their sinks for the life of the process.
pub struct Tracker {
    sources: Vec<SourceConfig>,
    fetcher: Box<dyn Fetcher>,
    registry: StoreRegistry,
    sinks: HashMap<String, Arc<dyn Notifier>>,
}

impl Tracker {
    pub fn new(config: AppConfig, fetcher: Box<dyn Fetcher>) -> Self {
        let sinks: HashMap<String, Arc<dyn Notifier>> = config
            .sources
            .iter()
            .map(|s| (s.id.clone(), Arc::from(notify::sink_for(s.webhook.as_deref()))))
            .collect();
        Self {
            registry: StoreRegistry::new(config.data_dir),
            sources: config.sources,
            fetcher,
            sinks,
        }
    }

    /// Routes every source to `sink` instead of its configured one.
    pub fn with_sink(mut self, sink: Arc<dyn Notifier>) -> Self {
        for target in self.sinks.values_mut() {
            *target = Arc::clone(&sink);
        }
        self
    }

    pub fn registry(&self) -> &StoreRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut StoreRegistry {
        &mut self.registry
    }

    /// Runs every source once for `today`, in configuration order.
    pub async fn run_cycle(&mut self, today: NaiveDate) -> Vec<SourceReport> {
        ensure_metrics_described();
        let days = RunDays::for_date(today);
        tracing::info!(day = %days.today, sources = self.sources.len(), "running sources");

        let mut reports = Vec::with_capacity(self.sources.len());
        for src in &self.sources {
            let sink = self
                .sinks
                .get(&src.id)
                .cloned()
                .unwrap_or_else(|| Arc::from(notify::sink_for(None)));
            let span = tracing::info_span!("source", id = %src.id, runner = src.runner.name());
            let result = run_source(src, self.fetcher.as_ref(), &mut self.registry, sink.as_ref(), &days)
                .instrument(span)
                .await;

            match &result {
                Ok(status) => tracing::info!(source = %src.id, ?status, "source done"),
                Err(e) => {
                    tracing::warn!(source = %src.id, error = %format!("{e:#}"), "source run failed");
                    counter!("tracker_source_errors_total", "source" => src.id.clone()).increment(1);
                }
            }
            reports.push(SourceReport {
                id: src.id.clone(),
                result,
            });
        }

        gauge!("tracker_last_run_ts").set(chrono::Utc::now().timestamp() as f64);
        tracing::info!("all sources done");
        reports
    }
}

/// Fetches and decides for one source, then hands any notification to `sink`.
///
/// `Skipped` means the decision suppressed the notification; delivery failures
/// come back as `Failed`, not as an error.
pub async fn run_source(
    src: &SourceConfig,
    fetcher: &dyn Fetcher,
    registry: &mut StoreRegistry,
    sink: &dyn Notifier,
    days: &RunDays,
) -> Result<DeliveryStatus> {
    counter!("tracker_runs_total", "source" => src.id.clone()).increment(1);

    let latest = fetch_snapshot(src, fetcher).await?;
    tracing::debug!(?latest, "extracted snapshot");

    let store = registry
        .open(&src.id)
        .with_context(|| format!("open store for {}", src.id))?;
    let outcome = src
        .runner
        .decide(&latest, store, days, &src.template)
        .with_context(|| format!("decide for {}", src.id))?;

    match outcome {
        Outcome::Suppressed(reason) => {
            tracing::info!(%reason, "nothing to notify");
            counter!("tracker_suppressed_total", "source" => src.id.clone()).increment(1);
            Ok(DeliveryStatus::Skipped)
        }
        Outcome::Emit(notification) => {
            let status = notify::deliver(sink, &notification).await;
            counter!(
                "tracker_notifications_total",
                "source" => src.id.clone(),
                "status" => format!("{status:?}").to_ascii_lowercase()
            )
            .increment(1);
            Ok(status)
        }
    }
}

/// Tries the source's URLs in order; the first one that fetches and extracts wins.
pub async fn fetch_snapshot(src: &SourceConfig, fetcher: &dyn Fetcher) -> Result<Snapshot> {
    let mut last_err = None;
    for url in src.urls.iter().filter(|u| !u.trim().is_empty()) {
        let attempt = async {
            let body = fetcher.fetch(url).await?;
            src.format
                .extract(&body)
                .with_context(|| format!("extract {:?} from {url}", src.format))
        };
        match attempt.await {
            Ok(snapshot) => return Ok(snapshot),
            Err(e) => {
                tracing::warn!(url = %url, error = %format!("{e:#}"), "source url failed");
                last_err = Some(e);
            }
        }
    }
    Err(last_err
        .unwrap_or_else(|| anyhow!("no urls configured"))
        .context(format!("no snapshot for {}", src.id)))
}
