// src/application/state.rs
//
// Wiring for the entry points: store first, then services.

use std::sync::Arc;

use log::info;

use crate::config::{AppConfig, StoreConfig};
use crate::error::AppResult;
use crate::integrations::MovieSearchApi;
use crate::repositories::{DocumentStore, RecordKeys, RedisDocumentStore, SqliteDocumentStore};
use crate::services::{IngestionService, StatisticsService};

/// Everything one run needs, shared behind `Arc`s.
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn DocumentStore>,
    pub statistics_service: Arc<StatisticsService>,
}

impl AppState {
    pub fn initialize(config: AppConfig) -> AppResult<Self> {
        let store = open_store(&config.store)?;
        let statistics_service = Arc::new(StatisticsService::new(
            store.clone(),
            config.record_keys(),
        ));

        Ok(Self {
            config,
            store,
            statistics_service,
        })
    }

    pub fn record_keys(&self) -> RecordKeys {
        self.config.record_keys()
    }

    /// Ingestion is the only operation that talks to the search API
    pub fn ingestion_service(&self, search_api: Arc<dyn MovieSearchApi>) -> IngestionService {
        IngestionService::new(search_api, self.store.clone(), self.record_keys())
    }
}

/// Open the configured backend. SQLite schemas are initialized on open.
pub fn open_store(config: &StoreConfig) -> AppResult<Arc<dyn DocumentStore>> {
    match config {
        StoreConfig::Redis { url, pool_size } => {
            info!("Using Redis document store (pool size {})", pool_size);
            Ok(Arc::new(RedisDocumentStore::connect(url, *pool_size)?))
        }
        StoreConfig::Sqlite { path, pool_size } => {
            info!("Using SQLite document store at {}", path.display());
            Ok(Arc::new(SqliteDocumentStore::open(path, *pool_size)?))
        }
    }
}
