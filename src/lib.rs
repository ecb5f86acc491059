//! NASA Astronomy Picture of the Day browser core: a remote feed client, a
//! persistent favorites store, and the view models that coordinate them.

pub mod apod_client;
pub mod config;
pub mod day_view;
pub mod db;
pub mod error;
pub mod favorites_view;
pub mod list_view;
pub mod models;

#[cfg(test)]
pub(crate) mod testing;

pub use apod_client::{ApodClient, FeedSource};
pub use config::ServiceConfig;
pub use day_view::DayViewModel;
pub use db::{Database, FavoriteApod, FavoritesStore};
pub use error::{ApodError, Result};
pub use favorites_view::FavoritesViewModel;
pub use list_view::{ListViewModel, PAGE_SIZE};
pub use models::{Apod, MediaType};
