use serde_json::Value;

use super::snapshot_from_raw;
use crate::error::ExtractError;
use crate::stats::Snapshot;

/// Reads `confirmados`, `obitos` and `recuperados` from a VOST daily entry.
/// Each field is an object keyed by row index; the first value is used.
pub fn extract(raw: &str) -> Result<Snapshot, ExtractError> {
    let data: Value = serde_json::from_str(raw)?;
    if !data.is_object() {
        return Err(ExtractError::MissingField("confirmados"));
    }

    let first = |key: &str| -> Option<f64> {
        data.get(key)
            .and_then(Value::as_object)
            .and_then(|obj| obj.values().next())
            .and_then(Value::as_f64)
    };

    let cases = first("confirmados").ok_or(ExtractError::MissingField("confirmados"))?;
    // absent optional columns count as zero
    let deaths = first("obitos").unwrap_or(0.0);
    let recoveries = first("recuperados").unwrap_or(0.0);
    Ok(snapshot_from_raw(cases, deaths, recoveries))
}
