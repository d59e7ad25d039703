// src/integrations/mod.rs
//
// External Integrations Module

pub mod ott;

pub use ott::client::{extract_results, MovieSearchApi, OttDetailsClient};

#[cfg(test)]
pub use ott::client::MockMovieSearchApi;
