use std::sync::Arc;
use crate::{
    config::Config,
    error::AppResult,
    infrastructure::{connect_store, NewsStore},
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn NewsStore>,
    pub config: Config,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let store = connect_store(&config.database).await?;
        Ok(Self { store, config })
    }

    /// Wrap an already opened store, e.g. an in-memory one in tests.
    pub fn with_store(store: Arc<dyn NewsStore>, config: Config) -> Self {
        Self { store, config }
    }
}
