//! Outbreak notifier: binary entrypoint.
//! Loads the sources config, then runs one cycle (or one per
//! `CHECK_INTERVAL_SECS` when set) over every source.

use anyhow::Result;
use tokio::time;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use outbreak_notifier::fetch::HttpFetcher;
use outbreak_notifier::stats::day::today_local;
use outbreak_notifier::{AppConfig, Tracker};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("outbreak_notifier=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = AppConfig::load_default()?;
    let interval = config.interval_secs.filter(|s| *s > 0);
    tracing::info!(
        sources = config.sources.len(),
        data_dir = %config.data_dir.display(),
        interval_secs = ?interval,
        "config loaded"
    );

    let mut tracker = Tracker::new(config, Box::new(HttpFetcher::new()));

    let Some(secs) = interval else {
        tracker.run_cycle(today_local()).await;
        return Ok(());
    };

    let mut ticker = time::interval(time::Duration::from_secs(secs));
    loop {
        ticker.tick().await;
        tracker.run_cycle(today_local()).await;
    }
}
