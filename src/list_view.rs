//! Incremental image feed: batches fetched by count, merged into a single
//! deduplicated list sorted by date descending.
//!
//! The count endpoint returns random historical entries, not a contiguous
//! page, so the merge has to tolerate duplicates both within a batch and
//! across batches.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::apod_client::FeedSource;
use crate::db::FavoritesStore;
use crate::models::{Apod, MediaType};

/// Batch size for each `load_more` call.
pub const PAGE_SIZE: u32 = 10;

pub struct ListViewModel<S, F> {
    feed: S,
    favorites: F,
    page_size: u32,
    frontier: Option<NaiveDate>,
    pub items: Vec<Apod>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub favorite_statuses: HashMap<String, bool>,
}

impl<S: FeedSource, F: FavoritesStore> ListViewModel<S, F> {
    pub fn new(feed: S, favorites: F) -> Self {
        Self {
            feed,
            favorites,
            page_size: PAGE_SIZE,
            frontier: None,
            items: Vec::new(),
            is_loading: false,
            error_message: None,
            favorite_statuses: HashMap::new(),
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// One day before the oldest date loaded so far.
    pub fn frontier(&self) -> Option<NaiveDate> {
        self.frontier
    }

    /// Fetches the next batch and merges it in. The presentation layer calls
    /// this when the user reaches the end of the loaded list. A call while a
    /// fetch is already in flight is ignored.
    pub async fn load_more(&mut self) {
        if self.is_loading {
            return;
        }
        self.is_loading = true;
        self.error_message = None;

        match self.feed.fetch_by_count(self.page_size).await {
            Ok(batch) => {
                self.merge(batch);
                self.refresh_favorite_statuses();
            }
            Err(e) => {
                warn!(error = %e, "load_more failed");
                self.error_message = Some(e.to_string());
            }
        }
        self.is_loading = false;
    }

    /// Adds unseen image entries and re-sorts. Entries whose date is already
    /// present are dropped, so feeding the same batch twice is a no-op.
    fn merge(&mut self, batch: Vec<Apod>) {
        if let Some(oldest) = batch.iter().filter_map(|a| a.parsed_date()).min() {
            let next = oldest.pred_opt().unwrap_or(oldest);
            self.frontier = Some(self.frontier.map_or(next, |f| f.min(next)));
        }

        let before = self.items.len();
        for apod in batch {
            if apod.media_type != MediaType::Image {
                continue;
            }
            if self.items.iter().any(|e| e.date == apod.date) {
                continue;
            }
            self.items.push(apod);
        }
        self.items.sort_by(|a, b| b.date.cmp(&a.date));
        debug!(
            added = self.items.len() - before,
            total = self.items.len(),
            "merged batch"
        );
    }

    /// Re-resolves favorite status for every loaded item in one pass. Store
    /// errors leave the previous cached value in place.
    fn refresh_favorite_statuses(&mut self) {
        let mut resolved = Vec::with_capacity(self.items.len());
        for apod in &self.items {
            if let Ok(is_favorite) = self.favorites.contains(apod) {
                resolved.push((apod.date.clone(), is_favorite));
            }
        }
        for (date, is_favorite) in resolved {
            self.favorite_statuses.insert(date, is_favorite);
        }
    }

    /// Adds or removes a record from favorites, updating its cache entry. An
    /// `Ok(false)` from the store means the record was already in the target
    /// state, so the cache is set to it either way.
    pub fn toggle_favorite(&mut self, apod: &Apod) {
        let currently = self.is_favorite(apod);
        let result = if currently {
            self.favorites.remove(apod).map(|_| false)
        } else {
            self.favorites.add(apod).map(|_| true)
        };
        match result {
            Ok(target) => {
                self.favorite_statuses.insert(apod.date.clone(), target);
            }
            Err(e) => {
                warn!(error = %e, date = %apod.date, "favorite toggle failed");
                self.error_message = Some(format!("failed to update favorites: {e}"));
            }
        }
    }

    /// Cache lookup; dates not yet resolved default to not-favorite.
    pub fn is_favorite(&self, apod: &Apod) -> bool {
        self.favorite_statuses
            .get(&apod.date)
            .copied()
            .unwrap_or(false)
    }
}
