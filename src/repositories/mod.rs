// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Stores are DUMB key/document mappers
// - NO aggregation logic
// - NO knowledge of the upstream API
// - Explicit commands/SQL only

pub mod document_store;
pub mod redis;
pub mod sqlite;

pub use document_store::{
    DocumentStore, JsonPath, PathSegment, RecordKeys, ScanPage, SCAN_PAGE_SIZE,
};
pub use self::redis::RedisDocumentStore;
pub use sqlite::SqliteDocumentStore;

#[cfg(test)]
pub use document_store::MockDocumentStore;
