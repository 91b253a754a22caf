//! Renders snapshots, deltas and trends into a Discord-style embed.

use serde::{Deserialize, Serialize};

use super::{Embed, Notification};
use crate::stats::{Counter, Delta, Snapshot, Trend};

pub const GLYPH_STEADY: &str = ":red_circle:";
pub const GLYPH_DOWN: &str = ":small_red_triangle_down:";
pub const GLYPH_UP: &str = ":small_red_triangle:";

/// Static framing of a source's messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub lines_before: Vec<String>,
    #[serde(default)]
    pub lines_after: Vec<String>,
}

/// `{name}` → value pairs substituted into the final description.
#[derive(Debug, Clone, Default)]
pub struct Placeholders(Vec<(&'static str, String)>);

impl Placeholders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.0.push((name, value.into()));
        self
    }

    pub fn apply(&self, text: &str) -> String {
        self.0.iter().fold(text.to_string(), |acc, (name, value)| {
            acc.replace(&format!("{{{name}}}"), value)
        })
    }
}

/// Groups thousands with a single space: `1234567` → `1 234 567`.
pub fn format_number(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

/// `1 day` / `N days`.
pub fn format_days(days: usize) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{days} days")
    }
}

/// Sign glyph for a trend value; `None` for NaN and infinities.
pub fn trend_glyph(trend: f64) -> Option<&'static str> {
    if !trend.is_finite() {
        None
    } else if trend == 0.0 {
        Some(GLYPH_STEADY)
    } else if trend < 0.0 {
        Some(GLYPH_DOWN)
    } else {
        Some(GLYPH_UP)
    }
}

/// `:icon: <value> <label>[, **±delta**][ glyph]`, or `None` when the counter is zero.
pub fn daily_line(counter: Counter, value: i64, delta: Option<i64>, trend: Option<f64>) -> Option<String> {
    if value == 0 {
        return None;
    }
    let mut line = format!(":{}: {} {}", counter.icon(), format_number(value), counter.label());
    if let Some(d) = delta {
        let sign = if d < 0 { '-' } else { '+' };
        line.push_str(&format!(", **{sign}{}**", format_number(d.saturating_abs())));
    }
    if let Some(glyph) = trend.and_then(trend_glyph) {
        line.push(' ');
        line.push_str(glyph);
    }
    Some(line)
}

/// `:icon: **<value>** <label>`, or `None` when the counter is zero.
pub fn threshold_line(counter: Counter, value: i64) -> Option<String> {
    if value == 0 {
        return None;
    }
    Some(format!(":{}: **{}** {}", counter.icon(), format_number(value), counter.label()))
}

/// Body lines for the daily report, one per counter.
pub fn daily_body(latest: &Snapshot, delta: &Delta, trend: Option<&Trend>) -> Vec<Option<String>> {
    Counter::ALL
        .iter()
        .map(|&c| daily_line(c, latest.get(c), Some(delta.get(c)), trend.map(|t| t.get(c))))
        .collect()
}

/// Body lines for the milestone report, one per counter.
pub fn threshold_body(latest: &Snapshot) -> Vec<Option<String>> {
    Counter::ALL
        .iter()
        .map(|&c| threshold_line(c, latest.get(c)))
        .collect()
}

/// Wraps body lines with the template's framing and builds the notification.
///
/// Before-lines are followed by a blank spacer, after-lines preceded by one;
/// `None` lines are dropped before joining.
pub fn compose(template: &MessageTemplate, body: Vec<Option<String>>, placeholders: &Placeholders) -> Notification {
    let mut lines: Vec<Option<String>> = Vec::with_capacity(body.len() + 8);
    if !template.lines_before.is_empty() {
        lines.extend(template.lines_before.iter().cloned().map(Some));
        lines.push(Some(" ".to_string()));
    }
    lines.extend(body);
    if !template.lines_after.is_empty() {
        lines.push(Some(" ".to_string()));
        lines.extend(template.lines_after.iter().cloned().map(Some));
    }

    let description = lines
        .into_iter()
        .flatten()
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    Notification {
        content: template.content.clone(),
        embeds: vec![Embed {
            title: template.title.clone(),
            description: placeholders.apply(&description),
        }],
    }
}
