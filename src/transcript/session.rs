//! The shape check a session payload must pass before it is diffed.

use serde_json::Value;
use thiserror::Error;

use super::diff::{ViewModelEntry, diff};
use super::entry::RawLogEntry;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid session format. Expected an array of log entries but got {0}")]
    InvalidFormat(&'static str),
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub fn parse_session(value: Value) -> Result<Vec<RawLogEntry>, SessionError> {
    match value {
        Value::Array(items) => Ok(items.into_iter().map(RawLogEntry::new).collect()),
        other => Err(SessionError::InvalidFormat(kind(&other))),
    }
}

/// Check the payload shape and diff every entry.
pub fn session_view(value: Value) -> Result<Vec<ViewModelEntry>, SessionError> {
    let entries = parse_session(value)?;
    Ok(diff(&entries))
}
