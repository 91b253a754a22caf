use once_cell::sync::OnceCell;
use regex::Regex;

use super::{sanitize_number, snapshot_from_raw};
use crate::error::ExtractError;
use crate::stats::Snapshot;

/// Reads the first three `maincounter-number` blocks as cases, deaths and
/// recoveries. Missing or unparsable blocks count as unknown.
pub fn extract(html: &str) -> Result<Snapshot, ExtractError> {
    static RE_COUNTER: OnceCell<Regex> = OnceCell::new();
    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_counter = RE_COUNTER.get_or_init(|| {
        Regex::new(r#"(?is)<div[^>]*class\s*=\s*"[^"]*\bmaincounter-number\b[^"]*"[^>]*>(.*?)</div>"#)
            .expect("static regex")
    });
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").expect("static regex"));

    let values: Vec<f64> = re_counter
        .captures_iter(html)
        .take(3)
        .map(|cap| {
            let inner = cap.get(1).map(|m| m.as_str()).unwrap_or_default();
            let text = re_tags.replace_all(inner, "");
            sanitize_number(&html_escape::decode_html_entities(&text))
        })
        .collect();

    if values.is_empty() {
        return Err(ExtractError::MissingField("maincounter-number"));
    }

    let at = |i: usize| values.get(i).copied().unwrap_or(f64::NAN);
    Ok(snapshot_from_raw(at(0), at(1), at(2)))
}
