//! Test utilities for integration tests
use std::fs;
use std::path::Path;
use std::sync::Arc;

use axum::{Router, body::Body};
use serde_json::{Value, json};
use tempfile::TempDir;

use llm_logger::api::AppState;
use llm_logger::api::app;
use llm_logger::core::AppConfig;

/// Creates a test application router reading logs from a fresh
/// temporary directory seeded with a few sessions.
///
/// The directory is removed when the returned `TempDir` is dropped so
/// keep it alive for the duration of the test.
pub fn test_app() -> (Router, TempDir) {
    let dir = TempDir::new().expect("Failed to create log directory");
    seed_sessions(dir.path());

    let app_config = AppConfig {
        log_dir: dir.path().to_path_buf(),
        static_dir: "./static".into(),
        base_url: String::new(),
    };
    let app_state = AppState::new(app_config);
    (app(Arc::new(app_state)), dir)
}

pub fn write_session(dir: &Path, id: &str, payload: &Value) {
    fs::write(dir.join(format!("thread_{id}.json")), payload.to_string())
        .expect("Failed to write session");
}

pub fn weather_session() -> Value {
    let system = json!({"role": "system", "content": "You are a weather bot"});
    let user = json!({"role": "user", "content": "Weather in Paris?"});
    let tool_call = json!({
        "role": "assistant",
        "content": null,
        "tool_calls": [{
            "id": "call_1",
            "type": "function",
            "function": {"name": "get_weather", "arguments": "{\"city\":\"Paris\"}"}
        }]
    });
    let tool_result = json!({"role": "tool", "tool_call_id": "call_1", "content": "{\"temp\":21}"});

    json!([
        {
            "start_time": "2024-01-01T10:00:00",
            "end_time": "2024-01-01T10:00:01.500000",
            "provider": "openai",
            "request_body": {"kwargs": {"model": "gpt-4o", "messages": [system, user]}},
            "response": {
                "model": "gpt-4o-2024-08-06",
                "usage": {"prompt_tokens": 40, "completion_tokens": 10, "total_tokens": 50},
                "choices": [{"message": tool_call}]
            }
        },
        {
            "start_time": "2024-01-01T10:00:02",
            "latency_ms": 800,
            "provider": "openai",
            "request_body": {"kwargs": {"model": "gpt-4o", "messages": [system, user, tool_call, tool_result]}},
            "response": {
                "choices": [{"message": {"role": "assistant", "content": "It is 21C and <b>sunny</b> in Paris."}}]
            }
        }
    ])
}

fn seed_sessions(dir: &Path) {
    write_session(dir, "weather", &weather_session());
    write_session(
        dir,
        "stocks",
        &json!([{
            "start_time": "2024-01-02T09:00:00",
            "provider": "anthropic",
            "request_body": {"kwargs": {"model": "claude", "messages": [{"role": "user", "content": "Stock prices"}]}},
            "response": {"choices": [{"message": {"role": "assistant", "content": "Up 2%"}}]}
        }]),
    );
    write_session(dir, "empty", &json!([]));
    write_session(dir, "object", &json!({"not": "a list"}));
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not utf-8")
}
