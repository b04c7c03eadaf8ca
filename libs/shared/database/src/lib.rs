pub mod postgres;

use shared_config::AppConfig;

use crate::postgres::Database;

/// Shared application state handed to every cell router. The pool is built
/// once at process startup and injected here; cells never open their own
/// connections.
pub struct AppState {
    pub config: AppConfig,
    pub db: Database,
}

impl AppState {
    pub fn new(config: AppConfig, db: Database) -> Self {
        Self { config, db }
    }
}
