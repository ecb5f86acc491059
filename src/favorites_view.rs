//! Saved-favorites list state. Removal splices the in-memory list by date
//! instead of re-reading the store.

use tracing::warn;

use crate::db::{FavoriteApod, FavoritesStore};
use crate::models::Apod;

pub struct FavoritesViewModel<F> {
    favorites: F,
    pub items: Vec<FavoriteApod>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl<F: FavoritesStore> FavoritesViewModel<F> {
    pub fn new(favorites: F) -> Self {
        Self {
            favorites,
            items: Vec::new(),
            is_loading: false,
            error_message: None,
        }
    }

    /// Reloads the full favorites list, most recently favorited first.
    pub fn refresh(&mut self) {
        self.is_loading = true;
        self.error_message = None;

        match self.favorites.list() {
            Ok(items) => self.items = items,
            Err(e) => {
                warn!(error = %e, "failed to load favorites");
                self.error_message = Some(e.to_string());
            }
        }
        self.is_loading = false;
    }

    /// Removes a favorite. Only a confirmed deletion (`Ok(true)`) splices
    /// the matching entry out of the loaded list.
    pub fn remove(&mut self, apod: &Apod) {
        match self.favorites.remove(apod) {
            Ok(true) => self.items.retain(|f| f.apod.date != apod.date),
            Ok(false) => {}
            Err(e) => {
                warn!(error = %e, date = %apod.date, "failed to remove favorite");
                self.error_message = Some(format!("failed to remove favorite: {e}"));
            }
        }
    }
}
