//! Turn differencing.
//!
//! Each logged call re-sends the whole conversation so far. To make a
//! session readable, every entry is split into the messages the reader
//! has already seen (context) and the ones this turn introduced (new).
//! Entry 0 has no previous turn: its system prompt is context and
//! everything else is new. Every later entry uses the previous entry's
//! full message list as context and keeps, as new, each message that
//! differs from the message at the same position in that list.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Offset, TimeZone};
use serde::{Serialize, Serializer};
use serde_json::Value;

use super::entry::RawLogEntry;
use super::message::{CanonicalMessage, extract};

pub const UNKNOWN: &str = "Unknown";
const UNKNOWN_LABEL: &str = "unknown";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Latency {
    Millis(i64),
    Unknown,
}

impl Serialize for Latency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Latency::Millis(ms) => serializer.serialize_i64(*ms),
            Latency::Unknown => serializer.serialize_str(UNKNOWN),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartTime {
    Known(DateTime<FixedOffset>),
    Unknown,
}

impl Serialize for StartTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StartTime::Known(ts) => serializer.serialize_str(&ts.to_rfc3339()),
            StartTime::Unknown => serializer.serialize_str(UNKNOWN),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EntryMetadata {
    pub model: String,
    pub provider: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TokenUsage {
    pub total: Option<u64>,
    pub prompt: Option<u64>,
    pub completion: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ViewModelEntry {
    pub index: usize,
    pub start_time: StartTime,
    pub latency_ms: Latency,
    pub metadata: EntryMetadata,
    pub token_usage: TokenUsage,
    pub context_messages: Vec<CanonicalMessage>,
    pub new_messages: Vec<CanonicalMessage>,
}

/// Parse a logged timestamp. RFC 3339 strings keep their offset. Naive
/// date-times (what Python's `isoformat()` produces without a tz) are
/// read as local time the same way a browser would.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts);
    }
    let naive = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())?;
    let local = Local.from_local_datetime(&naive).earliest()?;
    let offset = local.offset().fix();
    Some(local.with_timezone(&offset))
}

fn start_time(entry: &RawLogEntry) -> StartTime {
    entry
        .start_time()
        .and_then(parse_timestamp)
        .map(StartTime::Known)
        .unwrap_or(StartTime::Unknown)
}

fn latency(entry: &RawLogEntry) -> Latency {
    let precomputed = entry
        .latency_ms()
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f.round() as i64)));
    if let Some(ms) = precomputed {
        return Latency::Millis(ms);
    }

    let start = entry.start_time().and_then(parse_timestamp);
    let end = entry.end_time().and_then(parse_timestamp);
    match (start, end) {
        (Some(start), Some(end)) => Latency::Millis((end - start).num_milliseconds()),
        _ => Latency::Unknown,
    }
}

fn token_usage(entry: &RawLogEntry) -> TokenUsage {
    let read = |field| entry.usage(field).and_then(Value::as_u64);
    TokenUsage {
        total: read("total_tokens"),
        prompt: read("prompt_tokens"),
        completion: read("completion_tokens"),
    }
}

fn metadata(entry: &RawLogEntry) -> EntryMetadata {
    EntryMetadata {
        model: entry.model().unwrap_or(UNKNOWN_LABEL).to_string(),
        provider: entry.provider().unwrap_or(UNKNOWN_LABEL).to_string(),
    }
}

/// Split `current` into `(context, new)` relative to the previous turn.
fn split_turn(
    previous: Option<&[CanonicalMessage]>,
    current: &[CanonicalMessage],
) -> (Vec<CanonicalMessage>, Vec<CanonicalMessage>) {
    match previous {
        None => current.iter().cloned().partition(CanonicalMessage::is_system),
        Some(previous) => {
            let new = current
                .iter()
                .enumerate()
                .filter(|(pos, msg)| previous.get(*pos) != Some(*msg))
                .map(|(_, msg)| msg.clone())
                .collect();
            (previous.to_vec(), new)
        }
    }
}

/// Build one view model entry per raw entry, in order.
pub fn diff(entries: &[RawLogEntry]) -> Vec<ViewModelEntry> {
    let mut view_entries = Vec::with_capacity(entries.len());
    let mut previous: Option<Vec<CanonicalMessage>> = None;

    for (index, entry) in entries.iter().enumerate() {
        let messages = extract(entry);
        let (context_messages, new_messages) = split_turn(previous.as_deref(), &messages);

        view_entries.push(ViewModelEntry {
            index,
            start_time: start_time(entry),
            latency_ms: latency(entry),
            metadata: metadata(entry),
            token_usage: token_usage(entry),
            context_messages,
            new_messages,
        });
        previous = Some(messages);
    }

    view_entries
}
