// src/repositories/sqlite/sqlite_document_store.rs
//
// Document store over a single SQLite table, using the JSON1 functions for
// path access. The scan cursor is the rowid of the last key returned.

use std::path::Path;
use std::sync::Arc;

use log::debug;
use rusqlite::params;
use serde_json::Value;

use crate::db::{
    count_documents, create_connection_pool, create_memory_pool, get_connection,
    initialize_database, ConnectionPool,
};
use crate::error::{AppError, AppResult};
use crate::repositories::document_store::{DocumentStore, JsonPath, ScanPage, SCAN_PAGE_SIZE};

pub struct SqliteDocumentStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteDocumentStore {
    /// Wrap an existing pool. The schema must already be initialized.
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Open (or create) a database file and initialize its schema
    pub fn open(path: &Path, pool_size: u32) -> AppResult<Self> {
        let pool = create_connection_pool(path, pool_size)?;
        {
            let conn = get_connection(&pool)?;
            initialize_database(&conn)?;
            debug!(
                "Opened {} holding {} documents",
                path.display(),
                count_documents(&conn)?
            );
        }
        Ok(Self::new(Arc::new(pool)))
    }

    /// Private in-memory database, gone when the store is dropped
    pub fn in_memory() -> AppResult<Self> {
        let pool = create_memory_pool()?;
        {
            let conn = get_connection(&pool)?;
            initialize_database(&conn)?;
        }
        Ok(Self::new(Arc::new(pool)))
    }
}

impl DocumentStore for SqliteDocumentStore {
    fn set_document(&self, key: &str, document: &Value) -> AppResult<()> {
        let conn = self.pool.get()?;
        let body = serde_json::to_string(document)?;

        conn.execute(
            "INSERT OR REPLACE INTO documents (key, body) VALUES (?1, json(?2))",
            params![key, body],
        )?;
        Ok(())
    }

    fn get_document(&self, key: &str) -> AppResult<Option<String>> {
        let conn = self.pool.get()?;

        match conn.query_row(
            "SELECT body FROM documents WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        ) {
            Ok(body) => Ok(Some(body)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::from(e)),
        }
    }

    fn get_path(&self, key: &str, path: &JsonPath) -> AppResult<Option<String>> {
        let conn = self.pool.get()?;

        // `->` yields the JSON text of the match, or NULL when the path is absent
        match conn.query_row(
            "SELECT body -> ?2 FROM documents WHERE key = ?1",
            params![key, path.to_string()],
            |row| row.get::<_, Option<String>>(0),
        ) {
            Ok(value) => Ok(value),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::from(e)),
        }
    }

    fn array_len(&self, key: &str, path: &JsonPath) -> AppResult<Option<usize>> {
        let conn = self.pool.get()?;

        match conn.query_row(
            "SELECT json_array_length(body, ?2) FROM documents WHERE key = ?1",
            params![key, path.to_string()],
            |row| row.get::<_, Option<i64>>(0),
        ) {
            Ok(len) => Ok(len.map(|n| n as usize)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::from(e)),
        }
    }

    fn delete_by_prefix(&self, prefix: &str) -> AppResult<usize> {
        let conn = self.pool.get()?;

        let removed = conn.execute(
            "DELETE FROM documents WHERE substr(key, 1, length(?1)) = ?1",
            params![prefix],
        )?;
        Ok(removed)
    }

    fn scan_page(&self, prefix: &str, cursor: u64) -> AppResult<ScanPage> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT rowid, key FROM documents
             WHERE rowid > ?1 AND substr(key, 1, length(?2)) = ?2
             ORDER BY rowid
             LIMIT ?3",
        )?;

        let rows: Vec<(i64, String)> = stmt
            .query_map(
                params![cursor as i64, prefix, SCAN_PAGE_SIZE as i64],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?
            .collect::<Result<Vec<_>, _>>()?;

        let next = match rows.last() {
            Some((rowid, _)) if rows.len() == SCAN_PAGE_SIZE => *rowid as u64,
            _ => 0,
        };

        Ok(ScanPage {
            cursor: next,
            keys: rows.into_iter().map(|(_, key)| key).collect(),
        })
    }
}
