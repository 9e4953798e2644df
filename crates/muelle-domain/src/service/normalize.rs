//! Normalization of raw field values into canonical scalars

use std::sync::OnceLock;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use regex::Regex;
use serde_json::Value;

/// Coerce any raw value to trimmed text. Null becomes the empty string.
pub fn normalize_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string().trim().to_string(),
    }
}

/// Uppercase and keep only `[A-Z0-9]`
pub fn normalize_plate(raw: &str) -> Option<String> {
    let plate: String = raw
        .trim()
        .to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .collect();
    non_empty(plate)
}

/// Uppercase and drop whitespace only
pub fn normalize_seal(raw: &str) -> Option<String> {
    let seal: String = raw
        .trim()
        .to_uppercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    non_empty(seal)
}

pub fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn clock_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d{1,2}):(\d{2})").expect("valid clock regex"))
}

/// First `H:MM`/`HH:MM` in `text`, anchored to today's local date.
///
/// Records imported around midnight can land on the wrong calendar day.
pub fn parse_clock_time(text: &str) -> Option<DateTime<Utc>> {
    parse_clock_time_on(text, Local::now().date_naive())
}

/// Same as [`parse_clock_time`] with an explicit calendar date
pub fn parse_clock_time_on(text: &str, date: NaiveDate) -> Option<DateTime<Utc>> {
    let caps = clock_pattern().captures(text)?;
    let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = caps.get(2)?.as_str().parse().ok()?;
    let naive = date.and_hms_opt(hour, minute, 0)?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

/// Local `HH:MM` rendering of a timestamp, `-` when absent
pub fn format_clock_time(time: Option<DateTime<Utc>>) -> String {
    match time {
        Some(t) => t.with_timezone(&Local).format("%H:%M").to_string(),
        None => "-".to_string(),
    }
}
