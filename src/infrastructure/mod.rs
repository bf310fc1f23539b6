// Storage infrastructure
pub mod database;              // Store interface and PostgreSQL implementation
pub mod sqlite_database;       // SQLite implementation (file or in-memory)

use std::sync::Arc;

pub use database::{NewsStore, PostgresStore};
pub use sqlite_database::SqliteStore;

use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};

/// Open the store named by the URL scheme and make sure its tables exist.
pub async fn connect_store(config: &DatabaseConfig) -> AppResult<Arc<dyn NewsStore>> {
    let store: Arc<dyn NewsStore> = if config.url.starts_with("postgres") {
        Arc::new(PostgresStore::connect(&config.url, config.max_connections).await?)
    } else if config.url.starts_with("sqlite:") {
        Arc::new(SqliteStore::connect(&config.url, config.max_connections).await?)
    } else {
        return Err(AppError::ConfigurationError(format!(
            "Unsupported DATABASE_URL scheme: {}",
            config.url
        )));
    };

    store.initialize().await?;
    tracing::info!(dialect = ?store.dialect(), "Connected to news store");
    Ok(store)
}
