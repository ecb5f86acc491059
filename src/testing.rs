//! Mock collaborators for the view-model tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::apod_client::FeedSource;
use crate::db::{FavoriteApod, FavoritesStore};
use crate::error::{ApodError, Result};
use crate::models::{Apod, MediaType};

pub fn apod(date: &str) -> Apod {
    Apod {
        date: date.to_string(),
        title: format!("Title {date}"),
        explanation: "Explanation".to_string(),
        media_type: MediaType::Image,
        url: Some(format!("https://example.com/{date}.jpg")),
        hdurl: None,
        service_version: "v1".to_string(),
    }
}

pub fn video(date: &str) -> Apod {
    Apod {
        media_type: MediaType::Video,
        url: None,
        ..apod(date)
    }
}

/// Canned feed: returns its records on every call, or a transport failure
/// when constructed with `failing()`. Counts calls so tests can assert that
/// stale or suppressed fetches never reached the network.
pub struct MockFeed {
    records: Vec<Apod>,
    failing: bool,
    calls: Arc<AtomicUsize>,
}

impl MockFeed {
    pub fn new(records: Vec<Apod>) -> Self {
        Self {
            records,
            failing: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            records: Vec::new(),
            failing: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Handle that stays valid after the mock moves into a view model.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    fn check(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            Err(ApodError::Transport("mock network failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl FeedSource for MockFeed {
    async fn fetch_one(&self, _date: Option<NaiveDate>) -> Result<Apod> {
        self.check()?;
        self.records.first().cloned().ok_or(ApodError::NotFound)
    }

    async fn fetch_range(&self, _start: NaiveDate, _end: NaiveDate) -> Result<Vec<Apod>> {
        self.check()?;
        Ok(self.records.clone())
    }

    async fn fetch_by_count(&self, _count: u32) -> Result<Vec<Apod>> {
        self.check()?;
        Ok(self.records.clone())
    }
}

/// In-memory favorites store with deterministic, strictly increasing
/// timestamps.
pub struct MemoryStore {
    entries: Mutex<Vec<FavoriteApod>>,
    clock: AtomicUsize,
    failing: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            clock: AtomicUsize::new(0),
            failing: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::new()
        }
    }

    fn tick(&self) -> DateTime<Utc> {
        let n = self.clock.fetch_add(1, Ordering::SeqCst) as i64;
        Utc.timestamp_opt(1_700_000_000 + n, 0).unwrap()
    }

    fn check(&self) -> Result<()> {
        if self.failing {
            Err(ApodError::Storage("mock storage failure".to_string()))
        } else {
            Ok(())
        }
    }
}

impl FavoritesStore for MemoryStore {
    fn add(&self, apod: &Apod) -> Result<bool> {
        self.check()?;
        let mut entries = self.entries.lock().unwrap();
        if entries.iter().any(|f| f.apod.date == apod.date) {
            return Ok(false);
        }
        entries.push(FavoriteApod {
            apod: apod.clone(),
            favorited_at: self.tick(),
        });
        Ok(true)
    }

    fn remove(&self, apod: &Apod) -> Result<bool> {
        self.check()?;
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|f| f.apod.date != apod.date);
        Ok(entries.len() < before)
    }

    fn contains(&self, apod: &Apod) -> Result<bool> {
        self.check()?;
        let entries = self.entries.lock().unwrap();
        Ok(entries.iter().any(|f| f.apod.date == apod.date))
    }

    fn list(&self) -> Result<Vec<FavoriteApod>> {
        self.check()?;
        let mut entries = self.entries.lock().unwrap().clone();
        entries.sort_by(|a, b| b.favorited_at.cmp(&a.favorited_at));
        Ok(entries)
    }
}
