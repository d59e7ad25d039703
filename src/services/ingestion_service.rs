// src/services/ingestion_service.rs
use std::sync::Arc;

use log::{debug, info};

use crate::domain::{validate_search_query, SearchQuery};
use crate::error::AppResult;
use crate::integrations::MovieSearchApi;
use crate::repositories::{DocumentStore, RecordKeys};

/// Replaces the cached generation of movie records with a fresh search result.
///
/// Delete and rewrite are two separate phases with no atomicity: a reader
/// scanning meanwhile may see an empty or partial set, and a failed write
/// leaves the records written before it in place.
pub struct IngestionService {
    search_api: Arc<dyn MovieSearchApi>,
    store: Arc<dyn DocumentStore>,
    keys: RecordKeys,
}

impl IngestionService {
    pub fn new(
        search_api: Arc<dyn MovieSearchApi>,
        store: Arc<dyn DocumentStore>,
        keys: RecordKeys,
    ) -> Self {
        Self {
            search_api,
            store,
            keys,
        }
    }

    /// Fetch, clear, write. Returns the number of records written.
    pub fn ingest(&self, query: &SearchQuery) -> AppResult<usize> {
        validate_search_query(query)?;

        let results = self.search_api.advanced_search(query)?;
        info!("Number of search results: {}", results.len());

        let removed = self.store.delete_by_prefix(&self.keys.member_prefix())?;
        debug!(
            "Removed {} cached records under '{}'",
            removed,
            self.keys.member_prefix()
        );

        for (index, movie) in results.iter().enumerate() {
            let key = self.keys.record_key(index);
            self.store.set_document(&key, movie)?;
            debug!("Stored {}", key);
        }

        info!(
            "Stored {} records under '{}'",
            results.len(),
            self.keys.member_prefix()
        );
        Ok(results.len())
    }
}
