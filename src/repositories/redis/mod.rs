// src/repositories/redis/mod.rs

pub mod redis_document_store;

pub use redis_document_store::RedisDocumentStore;
