//! Display formatting shared by the pages.

use std::sync::LazyLock;

use chrono::{Local, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::transcript::{Latency, StartTime, TokenUsage, ToolArguments, UNKNOWN};

pub const UNKNOWN_DATE: &str = "Unknown Date";

static TIMESTAMP_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}").expect("Invalid timestamp prefix regex")
});

pub fn is_timestamp_like(s: &str) -> bool {
    TIMESTAMP_PREFIX_RE.is_match(s)
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Re-indent `s` if it is JSON, otherwise leave it alone.
pub fn pretty_print_json(s: &str) -> String {
    serde_json::from_str::<serde_json::Value>(s)
        .ok()
        .and_then(|v| serde_json::to_string_pretty(&v).ok())
        .unwrap_or_else(|| s.to_string())
}

pub fn truncate_message(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

pub fn format_start_time(start_time: &StartTime) -> String {
    match start_time {
        StartTime::Known(ts) => ts
            .with_timezone(&Local)
            .format("%-m/%-d/%Y, %-I:%M:%S %p")
            .to_string(),
        StartTime::Unknown => UNKNOWN.to_string(),
    }
}

pub fn format_latency(latency: &Latency) -> String {
    match latency {
        Latency::Millis(ms) => format!("{ms}ms"),
        Latency::Unknown => UNKNOWN.to_string(),
    }
}

pub fn format_token_total(usage: &TokenUsage) -> String {
    match usage.total {
        Some(total) => format!("{total} tokens total"),
        None => UNKNOWN.to_string(),
    }
}

pub fn format_token_split(usage: &TokenUsage) -> Option<String> {
    let prompt = usage.prompt?;
    let completion = usage
        .completion
        .map(|c| c.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    Some(format!("({prompt} prompt, {completion} completion)"))
}

pub fn format_arguments(arguments: &ToolArguments) -> String {
    match arguments {
        ToolArguments::Raw(raw) => raw.clone(),
        ToolArguments::Structured(serde_json::Value::Null) => String::new(),
        ToolArguments::Structured(value) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
    }
}

/// The calendar date of a timestamp-like string as written, ignoring
/// any offset.
pub fn timestamp_date(timestamp: &str) -> Option<NaiveDateTime> {
    if !is_timestamp_like(timestamp) {
        return None;
    }
    let prefix = timestamp.get(..19).unwrap_or(timestamp);
    NaiveDateTime::parse_from_str(prefix, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(&format!("{prefix}:00"), "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

/// `("Mon, Jan 1, 2024", "09:05 AM")` for timestamp-like strings,
/// `("Unknown Date", timestamp)` for anything else.
pub fn display_date_time(timestamp: &str) -> (String, String) {
    match timestamp_date(timestamp) {
        Some(ts) => (
            format_display_date(ts.date()),
            ts.format("%I:%M %p").to_string(),
        ),
        None => (UNKNOWN_DATE.to_string(), timestamp.to_string()),
    }
}

pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%a, %b %-d, %Y").to_string()
}
