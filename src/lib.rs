// src/lib.rs
// Movie Insights - cached movie metadata and chart generation
//
// Architecture:
// - Domain-centric: records, queries and summaries live in domain/
// - Explicit: every store round trip goes through the DocumentStore trait
// - Backend-agnostic: Redis (RedisJSON) or SQLite hold the same documents
// - Entry points: one binary per operation under src/bin

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;
pub mod integrations;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    median,
    validate_search_query,
    // Statistics
    GenreCount,
    // Movie
    MovieRecord,
    RatedTitle,
    RatingsByGenre,
    SearchQuery,
    TopRatings,
};

// ============================================================================
// PUBLIC API - Errors and Configuration
// ============================================================================

pub use config::{ApiConfig, AppConfig, StoreConfig};
pub use error::{AppError, AppResult, StoreError};

// ============================================================================
// PUBLIC API - Document Store
// ============================================================================

pub use repositories::{
    DocumentStore, JsonPath, RecordKeys, RedisDocumentStore, ScanPage, SqliteDocumentStore,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{IngestionService, StatisticsService, DEFAULT_TOP_N};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::{init_logging, open_store, AppState};
pub use integrations::{MovieSearchApi, OttDetailsClient};
