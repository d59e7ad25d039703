//! Movie invariants:
//!
//! 1. A record's identity is its position in the ingestion run that wrote it
//! 2. Records are replaced wholesale by the next ingestion, never merged
//! 3. A search query must describe a non-empty year and rating window

pub mod entity;
pub mod invariants;

pub use entity::{MovieRecord, SearchQuery};
pub use invariants::{validate_search_query, MAX_IMDB_RATING};
