//! Single-day viewer state: a selected date, the record loaded for it, and
//! its favorite status. Rapid day navigation is debounced so only the last
//! selected date is fetched.

use std::time::Duration;

use chrono::{Local, NaiveDate};
use tracing::{debug, warn};

use crate::apod_client::FeedSource;
use crate::db::FavoritesStore;
use crate::models::Apod;

const DEBOUNCE: Duration = Duration::from_millis(300);

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub struct DayViewModel<S, F> {
    feed: S,
    favorites: F,
    selected_date: NaiveDate,
    generation: u64,
    debounce: Duration,
    pub current: Option<Apod>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub is_favorite: bool,
}

impl<S: FeedSource, F: FavoritesStore> DayViewModel<S, F> {
    pub fn new(feed: S, favorites: F) -> Self {
        Self {
            feed,
            favorites,
            selected_date: today(),
            generation: 0,
            debounce: DEBOUNCE,
            current: None,
            is_loading: false,
            error_message: None,
            is_favorite: false,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    pub fn is_today(&self) -> bool {
        self.selected_date >= today()
    }

    /// Selects a date and returns a generation token for `debounced_fetch`.
    /// Each call invalidates all previously issued tokens.
    pub fn set_selected_date(&mut self, date: NaiveDate) -> u64 {
        self.selected_date = date;
        self.generation += 1;
        self.generation
    }

    /// Waits out the debounce window, then fetches the selected date.
    /// Does nothing if a newer selection has superseded `generation`.
    pub async fn debounced_fetch(&mut self, generation: u64) {
        tokio::time::sleep(self.debounce).await;
        if generation != self.generation {
            debug!(generation, current = self.generation, "dropping stale fetch");
            return;
        }
        self.fetch(Some(self.selected_date)).await;
    }

    /// Fetches a record. `None` asks the endpoint for today's entry. On
    /// failure the previously loaded record stays visible alongside the
    /// error message.
    pub async fn fetch(&mut self, date: Option<NaiveDate>) {
        self.is_loading = true;
        self.error_message = None;

        match self.feed.fetch_one(date).await {
            Ok(apod) => {
                self.is_favorite = self.favorites.contains(&apod).unwrap_or(false);
                self.current = Some(apod);
            }
            Err(e) => {
                warn!(error = %e, "fetch failed");
                self.error_message = Some(e.to_string());
            }
        }
        self.is_loading = false;
    }

    /// Adds or removes the current record from favorites, flipping the
    /// cached status. An `Ok(false)` from the store means the record was
    /// already in the target state, so the cache is set to it either way.
    pub fn toggle_favorite(&mut self) {
        let Some(apod) = self.current.clone() else {
            return;
        };
        let result = if self.is_favorite {
            self.favorites.remove(&apod).map(|_| false)
        } else {
            self.favorites.add(&apod).map(|_| true)
        };
        match result {
            Ok(target) => self.is_favorite = target,
            Err(e) => {
                warn!(error = %e, date = %apod.date, "favorite toggle failed");
                self.error_message = Some(format!("failed to update favorites: {e}"));
            }
        }
    }

    pub fn go_to_previous_day(&mut self) -> u64 {
        let date = self.selected_date.pred_opt().unwrap_or(self.selected_date);
        self.set_selected_date(date)
    }

    /// No-op when the selected date is already today; dates after today are
    /// not valid to request.
    pub fn go_to_next_day(&mut self) -> u64 {
        if self.is_today() {
            return self.generation;
        }
        let date = self.selected_date.succ_opt().unwrap_or(self.selected_date);
        self.set_selected_date(date)
    }

    pub fn go_to_today(&mut self) -> u64 {
        self.set_selected_date(today())
    }
}
