// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - Sits between the entry points (src/bin) and the services
// - Owns process concerns: wiring, logging, chart output
// - Never talks to the store directly except to open it

pub mod charts;
pub mod logging;
pub mod state;

pub use charts::{
    chart_path, render_genre_counts, render_ratings_by_genre, render_top_ratings,
    GENRE_COUNTS_FILE, RATINGS_BY_GENRE_FILE, TOP_RATINGS_FILE,
};
pub use logging::init_logging;
pub use state::{open_store, AppState};
