// src/repositories/sqlite/mod.rs

pub mod sqlite_document_store;

pub use sqlite_document_store::SqliteDocumentStore;
