//! A single logged API call as it was written to disk.
//!
//! Nothing about the shape of an entry is trusted. Every field is read
//! through [`RawLogEntry::navigate`] which resolves to `None` for any
//! missing segment, `null`, or segment applied to the wrong kind of
//! JSON value.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use Segment::{Index, Key};

/// One step along a JSON path.
#[derive(Debug, Clone, Copy)]
pub enum Segment<'a> {
    Key(&'a str),
    Index(usize),
}

/// Follow `path` from `root`, treating `null` as absent.
pub fn navigate<'v>(root: &'v Value, path: &[Segment<'_>]) -> Option<&'v Value> {
    let mut current = root;
    for segment in path {
        current = match (segment, current) {
            (Segment::Key(key), Value::Object(map)) => map.get(*key)?,
            (Segment::Index(idx), Value::Array(items)) => items.get(*idx)?,
            _ => return None,
        };
    }
    if current.is_null() { None } else { Some(current) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawLogEntry(Value);

impl RawLogEntry {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn navigate(&self, path: &[Segment<'_>]) -> Option<&Value> {
        navigate(&self.0, path)
    }

    /// A string field, with empty strings treated as absent.
    pub fn non_empty_str(&self, path: &[Segment<'_>]) -> Option<&str> {
        self.navigate(path)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn start_time(&self) -> Option<&str> {
        self.navigate(&[Key("start_time")]).and_then(Value::as_str)
    }

    pub fn end_time(&self) -> Option<&str> {
        self.navigate(&[Key("end_time")]).and_then(Value::as_str)
    }

    pub fn latency_ms(&self) -> Option<&Value> {
        self.navigate(&[Key("latency_ms")])
    }

    pub fn request_messages(&self) -> Option<&Vec<Value>> {
        self.navigate(&[Key("request_body"), Key("kwargs"), Key("messages")])
            .and_then(Value::as_array)
    }

    pub fn reply_message(&self) -> Option<&Value> {
        self.navigate(&[
            Key("response"),
            Key("choices"),
            Index(0),
            Key("message"),
        ])
    }

    pub fn usage(&self, field: &str) -> Option<&Value> {
        self.navigate(&[Key("response"), Key("usage"), Key(field)])
    }

    pub fn provider(&self) -> Option<&str> {
        self.non_empty_str(&[Key("provider")])
    }

    /// The first non-empty of `response.model` and `request_body.kwargs.model`.
    pub fn model(&self) -> Option<&str> {
        self.non_empty_str(&[Key("response"), Key("model")])
            .or_else(|| {
                self.non_empty_str(&[Key("request_body"), Key("kwargs"), Key("model")])
            })
    }
}

impl From<Value> for RawLogEntry {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}
