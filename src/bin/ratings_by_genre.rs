// src/bin/ratings_by_genre.rs

use anyhow::Context;

use movie_insights::application::{
    chart_path, init_logging, render_ratings_by_genre, AppState, RATINGS_BY_GENRE_FILE,
};
use movie_insights::config::AppConfig;

fn main() -> anyhow::Result<()> {
    init_logging();

    let state = AppState::initialize(AppConfig::from_env()?).context("opening document store")?;
    let grouped = state.statistics_service.ratings_by_genre()?;

    let path = chart_path(&state.config.chart_dir, RATINGS_BY_GENRE_FILE)?;
    render_ratings_by_genre(&grouped, &path)?;
    Ok(())
}
