// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod ingestion_service;
pub mod statistics_service;

#[cfg(test)]
mod ingestion_service_tests;

pub use ingestion_service::IngestionService;

pub use statistics_service::{StatisticsService, DEFAULT_TOP_N};
