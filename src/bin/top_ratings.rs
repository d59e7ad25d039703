// src/bin/top_ratings.rs

use anyhow::Context;

use movie_insights::application::{
    chart_path, init_logging, render_top_ratings, AppState, TOP_RATINGS_FILE,
};
use movie_insights::config::AppConfig;
use movie_insights::services::DEFAULT_TOP_N;

fn main() -> anyhow::Result<()> {
    init_logging();

    let state = AppState::initialize(AppConfig::from_env()?).context("opening document store")?;
    let top = state.statistics_service.top_ratings(DEFAULT_TOP_N)?;

    let path = chart_path(&state.config.chart_dir, TOP_RATINGS_FILE)?;
    render_top_ratings(&top, &path)?;
    Ok(())
}
