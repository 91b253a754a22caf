//! Sources configuration.
//!
//! Lookup order: `$SOURCES_CONFIG_PATH`, `config/sources.toml`,
//! `config/sources.json`. Environment overrides are applied after parsing.

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::{env, fs};

use crate::extract::SourceFormat;
use crate::notify::MessageTemplate;
use crate::runner::RunnerKind;

pub const ENV_CONFIG_PATH: &str = "SOURCES_CONFIG_PATH";
pub const ENV_DATA_DIR: &str = "DATA_DIR";
pub const ENV_WEBHOOK: &str = "DISCORD_WEBHOOK_URL";
pub const ENV_STATS_SKIP: &str = "STATS_SKIP_DELTA_CHECK";
pub const ENV_THRESHOLD_SKIP: &str = "THRESHOLD_SKIP_DELTA_CHECK";
pub const ENV_INTERVAL: &str = "CHECK_INTERVAL_SECS";

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// One tracked source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub id: String,
    /// Tried in order; the first one that fetches and extracts wins.
    pub urls: Vec<String>,
    #[serde(default)]
    pub format: SourceFormat,
    pub runner: RunnerKind,
    /// Literal webhook URL, or "ENV" to read `DISCORD_WEBHOOK_URL`.
    #[serde(default)]
    pub webhook: Option<String>,
    #[serde(flatten)]
    pub template: MessageTemplate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub interval_secs: Option<u64>,
    pub sources: Vec<SourceConfig>,
}

impl AppConfig {
    /// Loads an explicit file (TOML or JSON, by extension with content fallback).
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading sources config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        parse_config(&content, &ext).with_context(|| format!("parsing {}", path.display()))
    }

    /// Env path, then `config/sources.toml`, then `config/sources.json`;
    /// overrides from the environment applied and the result validated.
    pub fn load_default() -> Result<Self> {
        let path = match env::var(ENV_CONFIG_PATH) {
            Ok(p) => {
                let pb = PathBuf::from(p);
                if !pb.exists() {
                    bail!("{ENV_CONFIG_PATH} points to non-existent path {}", pb.display());
                }
                pb
            }
            Err(_) => ["config/sources.toml", "config/sources.json"]
                .iter()
                .map(PathBuf::from)
                .find(|p| p.exists())
                .ok_or_else(|| anyhow!("no sources config found (config/sources.toml or config/sources.json)"))?,
        };
        let mut cfg = Self::load_from(&path)?;
        cfg.apply_env();
        cfg.validate()?;
        Ok(cfg)
    }

    /// `DATA_DIR`, `CHECK_INTERVAL_SECS`, the skip-delta flags and `"ENV"` webhooks.
    pub fn apply_env(&mut self) {
        if let Ok(dir) = env::var(ENV_DATA_DIR) {
            if !dir.trim().is_empty() {
                self.data_dir = PathBuf::from(dir.trim());
            }
        }
        if let Some(secs) = env::var(ENV_INTERVAL).ok().and_then(|v| v.trim().parse().ok()) {
            self.interval_secs = Some(secs);
        }

        let stats_skip = env_flag(ENV_STATS_SKIP);
        let threshold_skip = env_flag(ENV_THRESHOLD_SKIP);
        let env_webhook = env::var(ENV_WEBHOOK).ok().filter(|w| !w.trim().is_empty());

        for src in &mut self.sources {
            let force = match src.runner {
                RunnerKind::Daily(_) => stats_skip,
                RunnerKind::Threshold(_) => threshold_skip,
            };
            if force {
                src.runner.set_skip_delta_check(true);
            }
            if src
                .webhook
                .as_deref()
                .is_some_and(|w| w.trim().eq_ignore_ascii_case("env"))
            {
                if env_webhook.is_none() {
                    tracing::warn!(source = %src.id, "{ENV_WEBHOOK} not set, notifications go to the log");
                }
                src.webhook = env_webhook.clone();
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            bail!("no sources configured");
        }
        let mut seen = HashSet::new();
        for src in &self.sources {
            let id = src.id.trim();
            if id.is_empty() {
                bail!("source with empty id");
            }
            if !seen.insert(id) {
                bail!("duplicate source id {id:?}");
            }
            if src.urls.iter().all(|u| u.trim().is_empty()) {
                bail!("source {id:?} has no urls");
            }
            if let RunnerKind::Threshold(t) = &src.runner {
                if t.scale_factor == 0 {
                    bail!("source {id:?}: scale_factor must be > 0");
                }
            }
        }
        Ok(())
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

fn parse_config(s: &str, hint_ext: &str) -> Result<AppConfig> {
    if hint_ext == "json" {
        return serde_json::from_str(s).context("invalid json sources config");
    }
    match toml::from_str(s) {
        Ok(cfg) => Ok(cfg),
        Err(toml_err) => serde_json::from_str(s)
            .map_err(|_| anyhow!(toml_err))
            .context("unsupported sources config format"),
    }
}
