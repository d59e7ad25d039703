// src/bin/ingest_movies.rs
//
// Fetch one page of advanced-search results and replace the cached
// movie records with it.

use std::sync::Arc;

use anyhow::Context;
use log::info;

use movie_insights::application::{init_logging, AppState};
use movie_insights::config::{ApiConfig, AppConfig};
use movie_insights::domain::SearchQuery;
use movie_insights::integrations::{MovieSearchApi, OttDetailsClient};

const START_YEAR: i32 = 2019;
const END_YEAR: i32 = 2023;
const CONTENT_TYPE: &str = "movie";
const MIN_IMDB: f64 = 5.0;
const MAX_IMDB: f64 = 9.0;
const LANGUAGE: &str = "english";

fn main() -> anyhow::Result<()> {
    init_logging();

    let api_config = ApiConfig::from_env().context("loading search API settings")?;
    let state = AppState::initialize(AppConfig::from_env()?).context("opening document store")?;

    let search_api: Arc<dyn MovieSearchApi> = Arc::new(OttDetailsClient::new(&api_config)?);
    let ingestion = state.ingestion_service(search_api);

    let query = SearchQuery::new(START_YEAR, END_YEAR, CONTENT_TYPE, MIN_IMDB, MAX_IMDB, LANGUAGE);
    let written = ingestion.ingest(&query)?;

    info!(
        "Cached {} records under '{}'",
        written,
        state.record_keys().member_prefix()
    );
    Ok(())
}
