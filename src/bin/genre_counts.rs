// src/bin/genre_counts.rs

use anyhow::Context;

use movie_insights::application::{
    chart_path, init_logging, render_genre_counts, AppState, GENRE_COUNTS_FILE,
};
use movie_insights::config::AppConfig;

fn main() -> anyhow::Result<()> {
    init_logging();

    let state = AppState::initialize(AppConfig::from_env()?).context("opening document store")?;
    let counts = state.statistics_service.genre_counts()?;

    let path = chart_path(&state.config.chart_dir, GENRE_COUNTS_FILE)?;
    render_genre_counts(&counts, &path)?;
    Ok(())
}
