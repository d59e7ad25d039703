// src/services/ingestion_service_tests.rs

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mockall::Sequence;
    use serde_json::{json, Value};

    use crate::domain::SearchQuery;
    use crate::error::{AppError, StoreError};
    use crate::integrations::MockMovieSearchApi;
    use crate::repositories::{DocumentStore, MockDocumentStore, RecordKeys, SqliteDocumentStore};
    use crate::services::{IngestionService, StatisticsService};

    // ========================================================================
    // TEST HELPERS
    // ========================================================================

    fn query() -> SearchQuery {
        SearchQuery::new(2019, 2023, "movie", 5.0, 9.0, "english")
    }

    fn scenario_results() -> Vec<Value> {
        vec![
            json!({"title": "A", "genre": ["Drama"], "imdbrating": 7.0}),
            json!({"title": "B", "genre": ["Drama", "Comedy"], "imdbrating": 9.0}),
        ]
    }

    fn api_returning(batches: Vec<Vec<Value>>) -> Arc<MockMovieSearchApi> {
        let mut api = MockMovieSearchApi::new();
        let mut seq = Sequence::new();
        for batch in batches {
            api.expect_advanced_search()
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |_| Ok(batch.clone()));
        }
        Arc::new(api)
    }

    fn sqlite_store() -> Arc<SqliteDocumentStore> {
        Arc::new(SqliteDocumentStore::in_memory().unwrap())
    }

    fn record_count(store: &dyn DocumentStore) -> usize {
        store
            .scan_keys(&RecordKeys::default().member_prefix())
            .unwrap()
            .len()
    }

    // ========================================================================
    // INGESTION INTO A REAL STORE
    // ========================================================================

    #[test]
    fn test_ingest_writes_one_document_per_result() {
        let store = sqlite_store();
        let service = IngestionService::new(
            api_returning(vec![scenario_results()]),
            store.clone(),
            RecordKeys::default(),
        );

        assert_eq!(service.ingest(&query()).unwrap(), 2);

        let raw = store.get_document("data:movies:1").unwrap().unwrap();
        assert_eq!(
            serde_json::from_str::<Value>(&raw).unwrap(),
            scenario_results()[1]
        );
        assert_eq!(record_count(store.as_ref()), 2);
    }

    #[test]
    fn test_reingest_does_not_accumulate() {
        let store = sqlite_store();
        let service = IngestionService::new(
            api_returning(vec![scenario_results(), scenario_results()]),
            store.clone(),
            RecordKeys::default(),
        );

        assert_eq!(service.ingest(&query()).unwrap(), 2);
        assert_eq!(record_count(store.as_ref()), 2);

        assert_eq!(service.ingest(&query()).unwrap(), 2);
        assert_eq!(record_count(store.as_ref()), 2);
    }

    #[test]
    fn test_smaller_generation_leaves_no_stale_records() {
        let store = sqlite_store();
        let first: Vec<Value> = (0..5)
            .map(|i| json!({"title": format!("T{}", i), "genre": [], "imdbrating": 6.0}))
            .collect();
        let second = vec![json!({"title": "Only", "genre": ["Drama"], "imdbrating": 8.0})];

        let service = IngestionService::new(
            api_returning(vec![first, second]),
            store.clone(),
            RecordKeys::default(),
        );

        assert_eq!(service.ingest(&query()).unwrap(), 5);
        assert_eq!(service.ingest(&query()).unwrap(), 1);

        let keys = store.scan_keys("data:movies:").unwrap();
        assert_eq!(keys, vec!["data:movies:0"]);
    }

    #[test]
    fn test_ingest_leaves_other_prefixes_alone() {
        let store = sqlite_store();
        store.set_document("data:shows:0", &json!({"title": "S"})).unwrap();

        let service = IngestionService::new(
            api_returning(vec![scenario_results()]),
            store.clone(),
            RecordKeys::default(),
        );
        service.ingest(&query()).unwrap();

        assert!(store.get_document("data:shows:0").unwrap().is_some());
    }

    #[test]
    fn test_empty_result_then_top_ratings_fails() {
        let store = sqlite_store();
        store
            .set_document("data:movies:0", &scenario_results()[0])
            .unwrap();

        let service = IngestionService::new(
            api_returning(vec![Vec::new()]),
            store.clone(),
            RecordKeys::default(),
        );
        assert_eq!(service.ingest(&query()).unwrap(), 0);
        assert_eq!(record_count(store.as_ref()), 0);

        let statistics = StatisticsService::new(store, RecordKeys::default());
        let err = statistics.top_ratings(15).unwrap_err();
        assert!(matches!(err, AppError::EmptyDataset(_)));
    }

    #[test]
    fn test_upstream_failure_keeps_previous_generation() {
        let store = sqlite_store();
        store
            .set_document("data:movies:0", &scenario_results()[0])
            .unwrap();

        let mut api = MockMovieSearchApi::new();
        api.expect_advanced_search()
            .times(1)
            .returning(|_| Err(AppError::Upstream("no results field".to_string())));

        let service = IngestionService::new(Arc::new(api), store.clone(), RecordKeys::default());
        let err = service.ingest(&query()).unwrap_err();

        assert!(matches!(err, AppError::Upstream(_)));
        assert_eq!(record_count(store.as_ref()), 1);
    }

    #[test]
    fn test_invalid_query_never_calls_api() {
        let mut api = MockMovieSearchApi::new();
        api.expect_advanced_search().never();

        let service = IngestionService::new(Arc::new(api), sqlite_store(), RecordKeys::default());
        let reversed = SearchQuery::new(2023, 2019, "movie", 5.0, 9.0, "english");

        let err = service.ingest(&reversed).unwrap_err();
        assert!(matches!(err, AppError::Domain(_)));
    }

    // ========================================================================
    // ORDERING AND PARTIAL FAILURE
    // ========================================================================

    #[test]
    fn test_write_failure_midway_propagates() {
        let mut store = MockDocumentStore::new();
        let mut seq = Sequence::new();

        store
            .expect_delete_by_prefix()
            .withf(|prefix| prefix.ends_with("data:movies:"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(4));
        store
            .expect_set_document()
            .withf(|key, _| key.ends_with(":0"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        store
            .expect_set_document()
            .withf(|key, _| key.ends_with(":1"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(AppError::Store(StoreError::Pool("connection reset".to_string()))));

        let results = vec![
            json!({"title": "A"}),
            json!({"title": "B"}),
            json!({"title": "C"}),
        ];
        let service = IngestionService::new(
            api_returning(vec![results]),
            Arc::new(store),
            RecordKeys::default(),
        );

        let err = service.ingest(&query()).unwrap_err();
        assert!(matches!(err, AppError::Store(StoreError::Pool(_))));
    }

    #[test]
    fn test_custom_prefix_is_used_for_keys() {
        let store = sqlite_store();
        let service = IngestionService::new(
            api_returning(vec![scenario_results()]),
            store.clone(),
            RecordKeys::new("cache:films"),
        );

        service.ingest(&query()).unwrap();

        assert_eq!(
            store.scan_keys("cache:films:").unwrap(),
            vec!["cache:films:0", "cache:films:1"]
        );
    }
}
