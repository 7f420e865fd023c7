//! Read-only access to the session logs on disk.
//!
//! The logger writes one file per conversation thread named
//! `thread_<static_id>.json` holding a JSON array of log entries. This
//! module never writes to the log directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::transcript::{RawLogEntry, extract, parse_timestamp};

static SESSION_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.:-]+$").expect("Invalid session id regex"));
static SESSION_FILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^thread_(?P<id>[A-Za-z0-9_.:-]+)\.json$").expect("Invalid session file regex")
});

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid session id: {0}")]
    InvalidSessionId(String),
    #[error("Session {0} not found")]
    NotFound(String),
    #[error("Failed to read session log: {0}")]
    Io(#[from] std::io::Error),
    #[error("Session log is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MostRecentMessage {
    pub starttime: Option<String>,
    pub sender_role: String,
    pub message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub static_id: String,
    pub most_recent_message: Option<MostRecentMessage>,
}

impl SessionSummary {
    /// Summarize a session from its last logged call.
    pub fn from_entries(static_id: &str, entries: &[RawLogEntry]) -> Self {
        let most_recent_message = entries.last().map(|last| {
            let message = extract(last).pop();
            MostRecentMessage {
                starttime: last.start_time().map(str::to_string),
                sender_role: message
                    .as_ref()
                    .map(|m| m.role.to_string())
                    .filter(|role| !role.is_empty())
                    .unwrap_or_else(|| "assistant".to_string()),
                message: message.and_then(|m| m.content),
            }
        });

        Self {
            static_id: static_id.to_string(),
            most_recent_message,
        }
    }

    pub fn starttime(&self) -> Option<&str> {
        self.most_recent_message
            .as_ref()
            .and_then(|m| m.starttime.as_deref())
    }

    /// Case-insensitive match on the id, sender role and message.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        let message = self.most_recent_message.as_ref();
        [
            Some(self.static_id.as_str()),
            message.map(|m| m.sender_role.as_str()),
            message.and_then(|m| m.message.as_deref()),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&term))
    }

    /// Calendar date of the most recent call as written in the log.
    pub fn date(&self) -> Option<NaiveDate> {
        let raw = self.starttime()?;
        parse_timestamp(raw)
            .map(|ts| ts.date_naive())
            .or_else(|| NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok())
    }
}

pub fn validate_session_id(id: &str) -> Result<(), StoreError> {
    if id.contains("..") || !SESSION_ID_RE.is_match(id) {
        return Err(StoreError::InvalidSessionId(id.to_string()));
    }
    Ok(())
}

#[derive(Clone, Debug)]
pub struct LogStore {
    log_dir: PathBuf,
}

impl LogStore {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
        }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn session_path(&self, id: &str) -> Result<PathBuf, StoreError> {
        validate_session_id(id)?;
        Ok(self.log_dir.join(format!("thread_{id}.json")))
    }

    /// Read and parse any session file. The shape of the payload is
    /// left for the caller to check.
    pub async fn read_session_file(path: &Path) -> Result<Value, StoreError> {
        let raw = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub async fn load_session(&self, id: &str) -> Result<Value, StoreError> {
        let path = self.session_path(id)?;
        match Self::read_session_file(&path).await {
            Err(StoreError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound(id.to_string()))
            }
            result => result,
        }
    }

    /// List sessions newest first, optionally only those whose most
    /// recent call happened on `date`.
    pub async fn list_sessions(
        &self,
        date: Option<NaiveDate>,
    ) -> Result<Vec<SessionSummary>, StoreError> {
        let mut dir = match tokio::fs::read_dir(&self.log_dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("Log directory {} does not exist", self.log_dir.display());
                return Ok(vec![]);
            }
            Err(e) => return Err(e.into()),
        };

        let mut sessions = Vec::new();
        while let Some(file) = dir.next_entry().await? {
            let file_name = file.file_name();
            let Some(caps) = file_name.to_str().and_then(|n| SESSION_FILE_RE.captures(n)) else {
                continue;
            };
            let id = &caps["id"];

            let entries = match Self::read_session_file(&file.path()).await {
                Ok(Value::Array(items)) => items
                    .into_iter()
                    .map(RawLogEntry::new)
                    .collect::<Vec<_>>(),
                Ok(_) => {
                    tracing::warn!("Skipping session {}: not a list of entries", id);
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Skipping session {}: {}", id, e);
                    continue;
                }
            };

            let summary = SessionSummary::from_entries(id, &entries);
            if date.is_none() || summary.date() == date {
                sessions.push(summary);
            }
        }

        sessions.sort_by(|a, b| {
            let a_ts = a.starttime().and_then(parse_timestamp);
            let b_ts = b.starttime().and_then(parse_timestamp);
            // Option orders None first so compare b to a for newest first
            // and push sessions without a time to the end
            b_ts.cmp(&a_ts)
                .then_with(|| a.static_id.cmp(&b.static_id))
        });

        Ok(sessions)
    }
}
