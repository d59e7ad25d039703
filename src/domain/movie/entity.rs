use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::domain::{DomainError, DomainResult};

/// One cached movie document as returned by the search API.
///
/// Only the fields the aggregators read are typed. Everything else the API
/// sends is kept in `extra` so the stored document round-trips unchanged.
/// The rating is kept as sent and only parsed when an aggregator asks for it,
/// so a record with an odd rating still counts towards its genres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    /// Display title (empty when the API omitted it or sent null)
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    /// Genres in API order
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre: Vec<String>,

    /// IMDb rating as sent: a number, a numeric string, or absent
    #[serde(rename = "imdbrating", default, skip_serializing_if = "Option::is_none")]
    pub imdb_rating: Option<Value>,

    /// Passthrough fields (imdbid, released, synopsis, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MovieRecord {
    /// Parsed rating. `None` for a missing, null or blank rating.
    pub fn rating(&self) -> DomainResult<Option<f64>> {
        match &self.imdb_rating {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => s.trim().parse::<f64>().map(Some).map_err(|_| {
                DomainError::InvariantViolation(format!(
                    "Invalid imdbrating '{}' for '{}'",
                    s, self.title
                ))
            }),
            Some(other) => Err(DomainError::InvariantViolation(format!(
                "Invalid imdbrating {} for '{}'",
                other, self.title
            ))),
        }
    }

    /// Rating used by the rating aggregators. Unrated records count as 0.
    pub fn rating_or_zero(&self) -> DomainResult<f64> {
        Ok(self.rating()?.unwrap_or(0.0))
    }

    /// Genre names with surrounding quote characters stripped
    pub fn genres(&self) -> impl Iterator<Item = &str> {
        self.genre.iter().map(|g| g.trim_matches('"'))
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Filters for one advanced-search request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub start_year: i32,
    pub end_year: i32,
    /// "movie" or "show"
    pub content_type: String,
    pub min_imdb: f64,
    pub max_imdb: f64,
    pub language: String,
}

impl SearchQuery {
    pub fn new(
        start_year: i32,
        end_year: i32,
        content_type: impl Into<String>,
        min_imdb: f64,
        max_imdb: f64,
        language: impl Into<String>,
    ) -> Self {
        Self {
            start_year,
            end_year,
            content_type: content_type.into(),
            min_imdb,
            max_imdb,
            language: language.into(),
        }
    }

    /// Query-string pairs in the order the upstream API documents them
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("start_year", self.start_year.to_string()),
            ("end_year", self.end_year.to_string()),
            ("type", self.content_type.clone()),
            ("min_imdb", self.min_imdb.to_string()),
            ("max_imdb", self.max_imdb.to_string()),
            ("language", self.language.clone()),
        ]
    }
}
