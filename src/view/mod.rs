//! Server side rendering of the session list and the entry viewer.
//!
//! Rendering is a pure function of its inputs. The entry being viewed
//! is passed in explicitly, there is no navigation state on the server.

pub mod format;
mod templates;

use anyhow::Result;
use chrono::NaiveDate;
use handlebars::Handlebars;
use itertools::Itertools;
use serde::Serialize;

use crate::store::SessionSummary;
use crate::transcript::{CanonicalMessage, Role, ViewModelEntry};
use format::{
    UNKNOWN_DATE, capitalize, display_date_time, format_arguments, format_display_date,
    format_latency, format_start_time, format_token_split, format_token_total, is_timestamp_like,
    timestamp_date, truncate_message,
};
pub use templates::Page;

const MESSAGE_PREVIEW_CHARS: usize = 100;
const SHORT_ID_CHARS: usize = 8;

#[derive(Serialize)]
struct ToolCallView {
    name: String,
    arguments: String,
}

#[derive(Serialize)]
struct MessageView {
    role: String,
    class: &'static str,
    tool_calls: Vec<ToolCallView>,
    tool_response: Option<String>,
    text: String,
}

impl MessageView {
    fn new(message: &CanonicalMessage, class: &'static str) -> Self {
        let tool_calls = message
            .tool_calls
            .iter()
            .flatten()
            .map(|tc| ToolCallView {
                name: tc.function_name.clone().unwrap_or_default(),
                arguments: format_arguments(&tc.arguments),
            })
            .collect();

        let content = message.content.as_deref().filter(|c| !c.is_empty());
        let tool_response = match message.role {
            Role::Tool => content.map(str::to_string),
            _ => None,
        };

        Self {
            role: message.role.to_string(),
            class,
            tool_calls,
            tool_response,
            text: content.unwrap_or("[no content]").to_string(),
        }
    }
}

#[derive(Serialize)]
struct EntryView {
    index: usize,
    time: String,
    model: String,
    provider: String,
    latency: String,
    tokens_total: String,
    tokens_split: Option<String>,
    context_count: usize,
    context_messages: Vec<MessageView>,
    new_messages: Vec<MessageView>,
}

impl From<&ViewModelEntry> for EntryView {
    fn from(entry: &ViewModelEntry) -> Self {
        Self {
            index: entry.index,
            time: format_start_time(&entry.start_time),
            model: entry.metadata.model.clone(),
            provider: entry.metadata.provider.clone(),
            latency: format_latency(&entry.latency_ms),
            tokens_total: format_token_total(&entry.token_usage),
            tokens_split: format_token_split(&entry.token_usage),
            context_count: entry.context_messages.len(),
            context_messages: entry
                .context_messages
                .iter()
                .map(|m| MessageView::new(m, "context-message"))
                .collect(),
            new_messages: entry
                .new_messages
                .iter()
                .map(|m| MessageView::new(m, "message"))
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct SessionPage {
    title: String,
    base_url: String,
    session_href: String,
    total: usize,
    has_prev: bool,
    prev_index: usize,
    has_next: bool,
    next_index: usize,
    entry: EntryView,
}

#[derive(Serialize)]
struct SessionItem {
    href: String,
    sender: String,
    message: Option<String>,
    short_id: String,
    display_time: String,
}

#[derive(Serialize)]
struct DateGroup {
    date: String,
    sessions: Vec<SessionItem>,
}

#[derive(Serialize)]
struct SessionListPage {
    title: String,
    base_url: String,
    date: String,
    search: String,
    groups: Vec<DateGroup>,
}

#[derive(Serialize)]
struct ErrorPage {
    title: String,
    base_url: String,
    message: String,
}

/// Which entry to show: the requested one clamped into range, or the
/// latest entry when nothing was requested. `None` for an empty
/// session.
pub fn resolve_position(requested: Option<usize>, len: usize) -> Option<usize> {
    let last = len.checked_sub(1)?;
    Some(requested.map_or(last, |pos| pos.min(last)))
}

/// Group sessions by the day of their most recent call. Days are
/// newest first with undated sessions last.
fn group_sessions_by_date(
    sessions: &[SessionSummary],
    base_url: &str,
) -> Vec<DateGroup> {
    let groups = sessions.iter().into_group_map_by(|s| {
        let timestamp = s.starttime().unwrap_or(&s.static_id);
        timestamp_date(timestamp).map(|ts| ts.date())
    });

    groups
        .into_iter()
        .sorted_by(|(a, _), (b, _)| match (a, b) {
            (None, None) => std::cmp::Ordering::Equal,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (Some(_), None) => std::cmp::Ordering::Less,
            (Some(a), Some(b)) => b.cmp(a),
        })
        .map(|(date, mut members)| {
            members.sort_by(|a, b| {
                if is_timestamp_like(&a.static_id) && is_timestamp_like(&b.static_id) {
                    b.static_id.cmp(&a.static_id)
                } else {
                    a.static_id.cmp(&b.static_id)
                }
            });
            DateGroup {
                date: date
                    .map(format_display_date)
                    .unwrap_or_else(|| UNKNOWN_DATE.to_string()),
                sessions: members
                    .into_iter()
                    .map(|s| session_item(s, base_url))
                    .collect(),
            }
        })
        .collect()
}

fn session_item(summary: &SessionSummary, base_url: &str) -> SessionItem {
    let message = summary.most_recent_message.as_ref();
    let timestamp = summary.starttime().unwrap_or(&summary.static_id);
    let (_, display_time) = display_date_time(timestamp);
    SessionItem {
        href: format!(
            "{}/sessions/{}",
            base_url,
            urlencoding::encode(&summary.static_id)
        ),
        sender: capitalize(message.map_or("assistant", |m| m.sender_role.as_str())),
        message: message
            .and_then(|m| m.message.as_deref())
            .filter(|m| !m.is_empty())
            .map(|m| truncate_message(m, MESSAGE_PREVIEW_CHARS)),
        short_id: summary.static_id.chars().take(SHORT_ID_CHARS).collect(),
        display_time,
    }
}

pub struct Views {
    registry: Handlebars<'static>,
    base_url: String,
}

impl Views {
    pub fn new(base_url: &str) -> Self {
        Self {
            registry: templates::templates(),
            base_url: base_url.to_string(),
        }
    }

    pub fn session_list(
        &self,
        sessions: &[SessionSummary],
        date: Option<NaiveDate>,
        search: Option<&str>,
    ) -> Result<String> {
        let search = search.map(str::trim).unwrap_or_default();
        let filtered: Vec<SessionSummary> = sessions
            .iter()
            .filter(|s| search.is_empty() || s.matches(search))
            .cloned()
            .collect();

        let page = SessionListPage {
            title: "Sessions".to_string(),
            base_url: self.base_url.clone(),
            date: date.map(|d| d.to_string()).unwrap_or_default(),
            search: search.to_string(),
            groups: group_sessions_by_date(&filtered, &self.base_url),
        };
        Ok(self
            .registry
            .render(&Page::SessionList.to_string(), &page)?)
    }

    /// Render the entry at `position` (see [`resolve_position`]). An empty
    /// session renders as an error page.
    pub fn session(
        &self,
        session_id: &str,
        entries: &[ViewModelEntry],
        position: Option<usize>,
    ) -> Result<String> {
        let Some(position) = resolve_position(position, entries.len()) else {
            return self.error("This session has no entries.");
        };
        let last = entries.len() - 1;

        let page = SessionPage {
            title: format!("Session {session_id}"),
            base_url: self.base_url.clone(),
            session_href: urlencoding::encode(session_id).into_owned(),
            total: entries.len(),
            has_prev: position > 0,
            prev_index: position.saturating_sub(1),
            has_next: position < last,
            next_index: (position + 1).min(last),
            entry: EntryView::from(&entries[position]),
        };
        Ok(self.registry.render(&Page::Session.to_string(), &page)?)
    }

    pub fn error(&self, message: &str) -> Result<String> {
        let page = ErrorPage {
            title: "Error".to_string(),
            base_url: self.base_url.clone(),
            message: message.to_string(),
        };
        Ok(self.registry.render(&Page::Error.to_string(), &page)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MostRecentMessage;
    use crate::transcript::{RawLogEntry, diff};
    use serde_json::json;

    fn summary(id: &str, starttime: Option<&str>, message: &str) -> SessionSummary {
        SessionSummary {
            static_id: id.to_string(),
            most_recent_message: Some(MostRecentMessage {
                starttime: starttime.map(str::to_string),
                sender_role: "assistant".to_string(),
                message: Some(message.to_string()),
            }),
        }
    }

    fn session_entries() -> Vec<ViewModelEntry> {
        let system = json!({"role": "system", "content": "Be nice"});
        let user = json!({"role": "user", "content": "<script>alert(1)</script>"});
        diff(&[
            RawLogEntry::new(json!({
                "start_time": "2024-01-01T00:00:00Z",
                "end_time": "2024-01-01T00:00:01Z",
                "provider": "openai",
                "request_body": {"kwargs": {"model": "gpt-4o", "messages": [system, user]}},
                "response": {
                    "usage": {"total_tokens": 50, "prompt_tokens": 40, "completion_tokens": 10},
                    "choices": [{"message": {
                        "role": "assistant",
                        "content": null,
                        "tool_calls": [{"id": "1", "function": {"name": "lookup", "arguments": "{\"q\":\"x\"}"}}]
                    }}]
                }
            })),
            RawLogEntry::new(json!({
                "request_body": {"kwargs": {"messages": [
                    system,
                    user,
                    {"role": "assistant", "content": null, "tool_calls": [{"id": "1", "function": {"name": "lookup", "arguments": "{\"q\":\"x\"}"}}]},
                    {"role": "tool", "tool_call_id": "1", "content": "{\"answer\":42}"}
                ]}}
            })),
        ])
    }

    #[test]
    fn it_resolves_the_viewed_entry() {
        assert_eq!(resolve_position(None, 3), Some(2));
        assert_eq!(resolve_position(Some(0), 3), Some(0));
        assert_eq!(resolve_position(Some(10), 3), Some(2));
        assert_eq!(resolve_position(None, 0), None);
    }

    #[test]
    fn it_groups_sessions_by_day() {
        let sessions = vec![
            summary("b", Some("2024-01-01T10:00:00"), "one"),
            summary("a", Some("2024-01-01T11:00:00"), "two"),
            summary("c", Some("2024-01-02T09:00:00"), "three"),
            summary("d", None, "four"),
        ];
        let groups = group_sessions_by_date(&sessions, "");

        let dates: Vec<&str> = groups.iter().map(|g| g.date.as_str()).collect();
        assert_eq!(dates, vec!["Tue, Jan 2, 2024", "Mon, Jan 1, 2024", UNKNOWN_DATE]);

        let ids: Vec<&str> = groups[1].sessions.iter().map(|s| s.short_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(groups[2].sessions[0].display_time, "d");
    }

    #[test]
    fn it_renders_the_session_list() {
        let views = Views::new("/viewer");
        let html = views
            .session_list(
                &[summary("3f2a9c1e77", Some("2024-01-01T10:00:00"), "Hello <b>there</b>")],
                None,
                None,
            )
            .unwrap();

        assert!(html.contains("href=\"/viewer/sessions/3f2a9c1e77\""));
        assert!(html.contains("3f2a9c1e..."));
        assert!(html.contains("Hello &lt;b&gt;there&lt;/b&gt;"));
        assert!(html.contains("Assistant"));
    }

    #[test]
    fn it_filters_the_session_list() {
        let views = Views::new("");
        let sessions = vec![
            summary("first", Some("2024-01-01T10:00:00"), "Weather in Paris"),
            summary("second", Some("2024-01-01T11:00:00"), "Stock prices"),
        ];
        let html = views.session_list(&sessions, None, Some("paris")).unwrap();
        assert!(html.contains("Weather in Paris"));
        assert!(!html.contains("Stock prices"));

        let html = views.session_list(&sessions, None, Some("tokyo")).unwrap();
        assert!(html.contains("No sessions found."));
    }

    #[test]
    fn it_renders_an_entry() {
        let views = Views::new("");
        let entries = session_entries();
        let html = views.session("abc", &entries, Some(0)).unwrap();

        assert!(html.contains("Entry 1 of 2"));
        assert!(html.contains("gpt-4o (openai)"));
        assert!(html.contains("1000ms"));
        assert!(html.contains("50 tokens total"));
        assert!(html.contains("(40 prompt, 10 completion)"));
        assert!(html.contains("<strong>Tool:</strong> lookup"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("id=\"next-btn\">Next</a>"));
        assert!(html.contains("<span class=\"disabled\" id=\"prev-btn\">"));
    }

    #[test]
    fn it_renders_the_latest_entry_by_default() {
        let views = Views::new("");
        let entries = session_entries();
        let html = views.session("abc", &entries, None).unwrap();

        assert!(html.contains("Entry 2 of 2"));
        assert!(html.contains("Tool Response:"));
        assert!(html.contains("Latency:</strong> Unknown"));
        assert!(html.contains("unknown (unknown)"));
        assert!(html.contains("<span class=\"disabled\" id=\"next-btn\">"));
        assert!(html.contains("href=\"/sessions/abc?entry=0\" id=\"prev-btn\""));
    }

    #[test]
    fn it_renders_an_empty_session_as_an_error() {
        let views = Views::new("");
        let html = views.session("abc", &[], None).unwrap();
        assert!(html.contains("This session has no entries."));
    }
}
