use std::env;
use std::path::{Path, PathBuf};

const PROJECT_MARKERS: [&str; 4] = [".git", "pyproject.toml", "setup.py", "Cargo.toml"];

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub log_dir: PathBuf,
    pub static_dir: PathBuf,
    // Prefix for every link the pages emit when served below a sub path
    pub base_url: String,
}

/// Walk up from `start` to the first directory that looks like a
/// project root, falling back to `start` itself.
pub fn find_project_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| PROJECT_MARKERS.iter().any(|m| dir.join(m).exists()))
        .unwrap_or(start)
        .to_path_buf()
}

pub fn default_log_dir() -> PathBuf {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_project_root(&cwd).join(".llm_logger").join("logs")
}

impl AppConfig {
    pub fn with_log_dir(mut self, log_dir: Option<PathBuf>) -> Self {
        if let Some(log_dir) = log_dir {
            self.log_dir = log_dir;
        }
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let log_dir = env::var("LLM_LOGGER_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_log_dir());
        let static_dir = env::var("LLM_LOGGER_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./static"));
        let base_url = env::var("LLM_LOGGER_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_default();

        Self {
            log_dir,
            static_dir,
            base_url,
        }
    }
}
