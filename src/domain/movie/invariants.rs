use super::entity::SearchQuery;
use crate::domain::{DomainError, DomainResult};

/// Highest rating IMDb hands out
pub const MAX_IMDB_RATING: f64 = 10.0;

/// Validates a search query before anything is fetched or deleted
pub fn validate_search_query(query: &SearchQuery) -> DomainResult<()> {
    validate_year_range(query)?;
    validate_rating_range(query)?;
    validate_not_blank("content type", &query.content_type)?;
    validate_not_blank("language", &query.language)?;
    Ok(())
}

fn validate_year_range(query: &SearchQuery) -> DomainResult<()> {
    if query.start_year > query.end_year {
        return Err(DomainError::InvariantViolation(format!(
            "Start year {} cannot be after end year {}",
            query.start_year, query.end_year
        )));
    }
    Ok(())
}

/// Both bounds inside 0..=10 and min <= max
fn validate_rating_range(query: &SearchQuery) -> DomainResult<()> {
    for bound in [query.min_imdb, query.max_imdb] {
        if !(0.0..=MAX_IMDB_RATING).contains(&bound) {
            return Err(DomainError::InvariantViolation(format!(
                "IMDb rating bound {} is outside 0..={}",
                bound, MAX_IMDB_RATING
            )));
        }
    }
    if query.min_imdb > query.max_imdb {
        return Err(DomainError::InvariantViolation(format!(
            "Minimum rating {} cannot exceed maximum rating {}",
            query.min_imdb, query.max_imdb
        )));
    }
    Ok(())
}

fn validate_not_blank(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::InvariantViolation(format!(
            "Search {} cannot be empty",
            field
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> SearchQuery {
        SearchQuery::new(2019, 2023, "movie", 5.0, 9.0, "english")
    }

    #[test]
    fn test_valid_query() {
        assert!(validate_search_query(&query()).is_ok());
    }

    #[test]
    fn test_single_year_is_valid() {
        let q = SearchQuery {
            end_year: 2019,
            ..query()
        };
        assert!(validate_search_query(&q).is_ok());
    }

    #[test]
    fn test_reversed_years_fail() {
        let q = SearchQuery {
            start_year: 2024,
            ..query()
        };
        assert!(validate_search_query(&q).is_err());
    }

    #[test]
    fn test_reversed_ratings_fail() {
        let q = SearchQuery {
            min_imdb: 9.5,
            ..query()
        };
        assert!(validate_search_query(&q).is_err());
    }

    #[test]
    fn test_out_of_range_rating_fails() {
        let q = SearchQuery {
            max_imdb: 11.0,
            ..query()
        };
        assert!(validate_search_query(&q).is_err());
    }

    #[test]
    fn test_blank_language_fails() {
        let q = SearchQuery {
            language: "  ".to_string(),
            ..query()
        };
        assert!(validate_search_query(&q).is_err());
    }
}
