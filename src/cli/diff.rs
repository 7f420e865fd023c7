use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::core::AppConfig;
use crate::store::LogStore;
use crate::transcript::session_view;

/// Load a session from a file path if one exists, otherwise treat
/// `session` as an id in the log directory.
pub async fn load(session: &str, store: &LogStore) -> Result<Value> {
    let path = Path::new(session);
    if path.is_file() {
        return LogStore::read_session_file(path)
            .await
            .with_context(|| format!("Failed to load {}", path.display()));
    }
    store
        .load_session(session)
        .await
        .with_context(|| format!("Failed to load session {session}"))
}

pub async fn run(session: String, log_dir: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::default().with_log_dir(log_dir);
    let store = LogStore::new(&config.log_dir);
    let payload = load(&session, &store).await?;
    let entries = session_view(payload)?;
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}
