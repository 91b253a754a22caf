//! # Extractors
//! Pure functions from raw source content to a [`Snapshot`].

pub mod vost;
pub mod worldometer;

use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ExtractError;
use crate::stats::{neutralize, Snapshot};

/// Content format of a source URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// Worldometer country/world page (HTML counters).
    #[default]
    Worldometer,
    /// covid19-api.vost.pt daily entry (JSON).
    Vost,
}

impl SourceFormat {
    pub fn extract(self, raw: &str) -> Result<Snapshot, ExtractError> {
        match self {
            SourceFormat::Worldometer => worldometer::extract(raw),
            SourceFormat::Vost => vost::extract(raw),
        }
    }
}

/// Keeps digits, `-` and `.` and parses the rest; `NaN` when nothing parses.
pub fn sanitize_number(text: &str) -> f64 {
    static RE_NON_NUMERIC: OnceCell<Regex> = OnceCell::new();
    let re = RE_NON_NUMERIC.get_or_init(|| Regex::new(r"[^0-9.\-]").expect("static regex"));
    re.replace_all(text, "").parse::<f64>().unwrap_or(f64::NAN)
}

/// Builds a snapshot from raw (possibly NaN) counters. `active` is derived
/// before normalization, so an unknown counter yields `active = 0`.
pub(crate) fn snapshot_from_raw(cases: f64, deaths: f64, recoveries: f64) -> Snapshot {
    Snapshot::new(
        neutralize(cases),
        neutralize(deaths),
        neutralize(recoveries),
        neutralize(cases - deaths - recoveries),
    )
}
