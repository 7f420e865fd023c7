use crate::core::AppConfig;
use crate::store::LogStore;
use crate::view::Views;

pub struct AppState {
    pub store: LogStore,
    pub views: Views,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            store: LogStore::new(&config.log_dir),
            views: Views::new(&config.base_url),
            config,
        }
    }
}
