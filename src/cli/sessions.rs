use std::path::PathBuf;

use anyhow::Result;

use crate::api::public::sessions::parse_date_filter;
use crate::core::AppConfig;
use crate::store::LogStore;

pub async fn run(date: Option<String>, log_dir: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::default().with_log_dir(log_dir);
    let date = parse_date_filter(date.as_deref())?;
    let sessions = LogStore::new(&config.log_dir).list_sessions(date).await?;
    println!("{}", serde_json::to_string_pretty(&sessions)?);
    Ok(())
}
