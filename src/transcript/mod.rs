//! Turn-by-turn view of a logged LLM session.
//!
//! [`extract`] normalizes one logged call into [`CanonicalMessage`]s and
//! [`diff`] folds a whole session into [`ViewModelEntry`]s. Neither can
//! fail: missing or malformed fields fall back to defaults. The only hard
//! failure is a payload that isn't a list of entries, see
//! [`parse_session`].

pub mod diff;
pub mod entry;
pub mod message;
pub mod session;

pub use diff::{
    EntryMetadata, Latency, StartTime, TokenUsage, UNKNOWN, ViewModelEntry, diff,
    parse_timestamp,
};
pub use entry::{RawLogEntry, Segment};
pub use message::{CanonicalMessage, Role, ToolArguments, ToolCall, extract};
pub use session::{SessionError, parse_session, session_view};
