//! Application state for mesa-server

use std::path::PathBuf;
use std::sync::Arc;

use crate::BoxError;
use crate::config::Config;
use crate::db::{MemoryStore, OrderStore, PgStore};
use crate::orders::OrdersManager;

/// Shared application state
#[derive(Clone, Debug)]
pub struct AppState {
    /// Order lifecycle over the configured store
    pub orders: OrdersManager,
    /// Front-end directory served as the fallback
    pub static_dir: PathBuf,
    /// Wrap the router in a permissive CORS layer
    pub cors_enabled: bool,
}

impl AppState {
    /// Connect the configured store
    ///
    /// PostgreSQL when `DATABASE_URL` is set, otherwise an in-memory store
    /// seeded with `memory_tables` tables.
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let store: Arc<dyn OrderStore> = match &config.database_url {
            Some(url) => Arc::new(PgStore::connect(url, config.db_max_connections).await?),
            None => {
                tracing::warn!(
                    tables = config.memory_tables,
                    "DATABASE_URL not set, using in-memory store (data is lost on restart)"
                );
                Arc::new(MemoryStore::with_tables(
                    (1..=config.memory_tables).map(|n| format!("Mesa {n}")),
                ))
            }
        };
        Ok(Self::with_store(store, config))
    }

    /// State over an already built store
    pub fn with_store(store: Arc<dyn OrderStore>, config: &Config) -> Self {
        Self {
            orders: OrdersManager::new(store),
            static_dir: PathBuf::from(&config.static_dir),
            cors_enabled: config.cors_enabled,
        }
    }
}
