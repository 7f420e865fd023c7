//! Canonical messages extracted from a logged request/response pair.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::entry::RawLogEntry;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
    // Anything else a provider sends is kept verbatim
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
            Role::Other(role) => role,
        }
    }
}

impl From<&str> for Role {
    fn from(role: &str) -> Self {
        match role {
            "system" => Role::System,
            "user" => Role::User,
            "assistant" => Role::Assistant,
            "tool" => Role::Tool,
            other => Role::Other(other.to_string()),
        }
    }
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        Role::from(role.as_str())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> String {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Function arguments exactly as the model produced them. Most
/// providers send a JSON encoded string but some send an object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolArguments {
    Raw(String),
    Structured(Value),
}

impl From<&Value> for ToolArguments {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(s) => ToolArguments::Raw(s.clone()),
            other => ToolArguments::Structured(other.clone()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: Option<String>,
    pub function_name: Option<String>,
    pub arguments: ToolArguments,
}

impl ToolCall {
    pub fn new(id: &str, function_name: &str, arguments: ToolArguments) -> Self {
        Self {
            id: Some(id.to_string()),
            function_name: Some(function_name.to_string()),
            arguments,
        }
    }

    fn from_raw(raw: &Value) -> Self {
        let function = raw.get("function");
        Self {
            id: raw.get("id").and_then(Value::as_str).map(str::to_string),
            function_name: function
                .and_then(|f| f.get("name"))
                .and_then(Value::as_str)
                .map(str::to_string),
            arguments: function
                .and_then(|f| f.get("arguments"))
                .map(ToolArguments::from)
                .unwrap_or(ToolArguments::Structured(Value::Null)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanonicalMessage {
    pub role: Role,
    // `None` means the message had no content at all which is not the
    // same as an empty reply
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl CanonicalMessage {
    pub fn new(role: Role, content: &str) -> Self {
        Self {
            role,
            content: Some(content.to_string()),
            tool_call_id: None,
            tool_calls: None,
        }
    }

    pub fn new_tool_call_request(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content: None,
            tool_call_id: None,
            tool_calls: Some(tool_calls),
        }
    }

    pub fn new_tool_call_response(content: &str, tool_call_id: &str) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.to_string()),
            tool_call_id: Some(tool_call_id.to_string()),
            tool_calls: None,
        }
    }

    /// Normalize one raw message. Slots that aren't JSON objects
    /// (`null`, `false`, stray strings) carry no message and are skipped.
    pub fn from_raw(raw: &Value) -> Option<Self> {
        let obj = raw.as_object()?;

        let role = obj
            .get("role")
            .and_then(Value::as_str)
            .map(Role::from)
            .unwrap_or_else(|| Role::Other(String::new()));

        let content = match obj.get("content") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            // Content part arrays and the like are kept as compact JSON
            Some(other) => Some(other.to_string()),
        };

        let tool_calls = obj
            .get("tool_calls")
            .and_then(Value::as_array)
            .filter(|calls| !calls.is_empty())
            .map(|calls| calls.iter().map(ToolCall::from_raw).collect());

        Some(Self {
            role,
            content,
            tool_call_id: obj
                .get("tool_call_id")
                .and_then(Value::as_str)
                .map(str::to_string),
            tool_calls,
        })
    }

    pub fn is_system(&self) -> bool {
        self.role == Role::System
    }
}

/// The request messages of `entry` followed by the model's reply, if
/// there was one.
pub fn extract(entry: &RawLogEntry) -> Vec<CanonicalMessage> {
    entry
        .request_messages()
        .into_iter()
        .flatten()
        .chain(entry.reply_message())
        .filter_map(CanonicalMessage::from_raw)
        .collect()
}
