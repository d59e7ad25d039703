use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::movie::MovieRecord;
use crate::domain::DomainResult;

/// Occurrences of each genre across all records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenreCount(BTreeMap<String, u32>);

impl GenreCount {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a MovieRecord>,
    {
        let mut counts = Self::default();
        for record in records {
            counts.add(record);
        }
        counts
    }

    /// Counts every genre the record lists. An empty list adds nothing.
    pub fn add(&mut self, record: &MovieRecord) {
        for genre in record.genres() {
            *self.0.entry(genre.to_string()).or_insert(0) += 1;
        }
    }

    pub fn get(&self, genre: &str) -> u32 {
        self.0.get(genre).copied().unwrap_or(0)
    }

    /// Number of (record, genre) pairs counted
    pub fn total(&self) -> u64 {
        self.0.values().map(|&c| u64::from(c)).sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(g, &c)| (g.as_str(), c))
    }

    /// Most frequent first; equal counts fall back to genre name
    pub fn sorted_desc(&self) -> Vec<(&str, u32)> {
        let mut entries: Vec<(&str, u32)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    pub fn into_inner(self) -> BTreeMap<String, u32> {
        self.0
    }
}

/// A title with the rating it was ranked by
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatedTitle {
    pub title: String,
    pub rating: f64,
}

/// Highest rated titles, best first
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopRatings(Vec<RatedTitle>);

impl TopRatings {
    /// Sorts by rating descending and keeps the first `n`.
    /// The sort is stable, so equal ratings keep their scan order.
    pub fn rank<'a, I>(records: I, n: usize) -> DomainResult<Self>
    where
        I: IntoIterator<Item = &'a MovieRecord>,
    {
        let mut rated = records
            .into_iter()
            .map(|record| {
                Ok(RatedTitle {
                    title: record.title.clone(),
                    rating: record.rating_or_zero()?,
                })
            })
            .collect::<DomainResult<Vec<RatedTitle>>>()?;

        rated.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        rated.truncate(n);
        Ok(Self(rated))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> &[RatedTitle] {
        &self.0
    }

    pub fn titles(&self) -> Vec<&str> {
        self.0.iter().map(|r| r.title.as_str()).collect()
    }

    pub fn ratings(&self) -> Vec<f64> {
        self.0.iter().map(|r| r.rating).collect()
    }
}

/// Ratings of every record listing a genre, grouped by that genre
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RatingsByGenre(BTreeMap<String, Vec<f64>>);

impl RatingsByGenre {
    pub fn from_records<'a, I>(records: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = &'a MovieRecord>,
    {
        let mut grouped = Self::default();
        for record in records {
            grouped.add(record)?;
        }
        Ok(grouped)
    }

    /// Appends the record's rating under each of its genres
    pub fn add(&mut self, record: &MovieRecord) -> DomainResult<()> {
        let rating = record.rating_or_zero()?;
        for genre in record.genres() {
            self.0.entry(genre.to_string()).or_default().push(rating);
        }
        Ok(())
    }

    pub fn get(&self, genre: &str) -> Option<&[f64]> {
        self.0.get(genre).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.0.iter().map(|(g, r)| (g.as_str(), r.as_slice()))
    }

    /// Median rating per genre, in genre order
    pub fn medians(&self) -> Vec<(&str, f64)> {
        self.iter()
            .filter_map(|(genre, ratings)| median(ratings).map(|m| (genre, m)))
            .collect()
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<f64>> {
        self.0
    }
}

/// Median of the values; the mean of the two middle values for even lengths
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
