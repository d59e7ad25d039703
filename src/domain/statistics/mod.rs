//! Statistics invariants:
//!
//! 1. Summaries are ALWAYS derived from the cached records, NEVER stored
//! 2. Summaries are recomputed from scratch on every run
//! 3. A record's rating is counted once under each genre it lists
//! 4. Unrated records count as rating 0

pub mod entity;
pub use entity::{median, GenreCount, RatedTitle, RatingsByGenre, TopRatings};
