// src/services/statistics_service.rs
use std::sync::Arc;

use log::{debug, info, warn};

use crate::domain::{GenreCount, MovieRecord, RatingsByGenre, TopRatings};
use crate::error::{AppError, AppResult};
use crate::repositories::{DocumentStore, RecordKeys};

/// Default length of the top-ratings list
pub const DEFAULT_TOP_N: usize = 15;

/// The three aggregators. Each one scans the whole cached generation, reads
/// every document once, and reduces it into a summary. Nothing is persisted.
pub struct StatisticsService {
    store: Arc<dyn DocumentStore>,
    keys: RecordKeys,
}

impl StatisticsService {
    pub fn new(store: Arc<dyn DocumentStore>, keys: RecordKeys) -> Self {
        Self { store, keys }
    }

    /// Occurrences of each genre across all records. Ratings are never read,
    /// so a record with an unreadable rating still counts.
    pub fn genre_counts(&self) -> AppResult<GenreCount> {
        let records = self.load_records()?;
        let counts = GenreCount::from_records(&records);
        info!("Genre counts: {:?}", counts.sorted_desc());
        Ok(counts)
    }

    /// The `n` highest rated titles, best first.
    /// Fails with `EmptyDataset` when nothing is cached.
    pub fn top_ratings(&self, n: usize) -> AppResult<TopRatings> {
        let records = self.load_records()?;
        if records.is_empty() {
            return Err(self.empty_dataset());
        }
        Ok(TopRatings::rank(&records, n)?)
    }

    /// Ratings grouped under every genre their record lists
    pub fn ratings_by_genre(&self) -> AppResult<RatingsByGenre> {
        let records = self.load_records()?;
        Ok(RatingsByGenre::from_records(&records)?)
    }

    /// Every cached record in scan order.
    ///
    /// Keys under the prefix that are not `<prefix>:<index>` are ignored, and
    /// a key deleted between the scan and the read is skipped.
    fn load_records(&self) -> AppResult<Vec<MovieRecord>> {
        let keys = self.store.scan_keys(&self.keys.member_prefix())?;

        let mut records = Vec::with_capacity(keys.len());
        for key in keys {
            if self.keys.index_of(&key).is_none() {
                warn!("Ignoring non-record key '{}'", key);
                continue;
            }

            let Some(body) = self.store.get_document(&key)? else {
                debug!("'{}' vanished during scan", key);
                continue;
            };

            records.push(serde_json::from_str::<MovieRecord>(&body)?);
        }

        debug!("Loaded {} records", records.len());
        Ok(records)
    }

    fn empty_dataset(&self) -> AppError {
        AppError::EmptyDataset(format!("no records under '{}'", self.keys.member_prefix()))
    }
}
