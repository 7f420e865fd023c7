use std::path::PathBuf;

use anyhow::Result;

use crate::api;
use crate::core::AppConfig;

pub async fn run(host: String, port: String, log_dir: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::default().with_log_dir(log_dir);
    api::serve(host, port, config).await
}
