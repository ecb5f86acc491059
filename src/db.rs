use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::error::{ApodError, Result};
use crate::models::{Apod, MediaType};

/// A favorited record plus the moment it was favorited. `favorited_at` is
/// set once at insertion and never updated; re-favoriting after a removal is
/// a fresh event with a fresh timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteApod {
    pub apod: Apod,
    pub favorited_at: DateTime<Utc>,
}

/// Persistent favorites, keyed by record date.
pub trait FavoritesStore: Send + Sync {
    /// Insert if no entry with that date exists. Returns `true` iff inserted.
    fn add(&self, apod: &Apod) -> Result<bool>;

    /// Delete the entry with that date. Returns `true` iff one existed.
    fn remove(&self, apod: &Apod) -> Result<bool>;

    /// Existence check by date.
    fn contains(&self, apod: &Apod) -> Result<bool>;

    /// All favorites, most recently favorited first.
    fn list(&self) -> Result<Vec<FavoriteApod>>;
}

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Opens (creating if needed) the favorites database under the user's
    /// home directory.
    pub fn new() -> Result<Self> {
        let dir = Self::app_data_dir()?;
        if !dir.exists() {
            std::fs::create_dir_all(&dir)
                .map_err(|e| ApodError::Storage(e.to_string()))?;
        }
        Self::open(dir.join("favorites.db"))
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Private in-memory database, used by tests and throwaway sessions.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS favorites (
                date TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                explanation TEXT NOT NULL,
                media_type TEXT NOT NULL,
                url TEXT,
                hdurl TEXT,
                service_version TEXT NOT NULL,
                favorited_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn app_data_dir() -> Result<PathBuf> {
        let home = dirs_next::home_dir()
            .ok_or_else(|| ApodError::Storage("could not find home directory".to_string()))?;
        Ok(home.join(".apod_reader"))
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| ApodError::Storage("database connection lock poisoned".to_string()))
    }

    /// Insert with an explicit timestamp. The single-statement upsert keeps
    /// the existence check and the insert atomic on the connection.
    fn add_at(&self, apod: &Apod, favorited_at: DateTime<Utc>) -> Result<bool> {
        let conn = self.lock()?;
        let inserted = conn.execute(
            "INSERT INTO favorites
                (date, title, explanation, media_type, url, hdurl, service_version, favorited_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(date) DO NOTHING",
            params![
                apod.date,
                apod.title,
                apod.explanation,
                media_type_str(apod.media_type),
                apod.url,
                apod.hdurl,
                apod.service_version,
                favorited_at.to_rfc3339(),
            ],
        )?;
        debug!(date = %apod.date, inserted = inserted > 0, "add favorite");
        Ok(inserted > 0)
    }
}

impl FavoritesStore for Database {
    fn add(&self, apod: &Apod) -> Result<bool> {
        self.add_at(apod, Utc::now())
    }

    fn remove(&self, apod: &Apod) -> Result<bool> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM favorites WHERE date = ?1", params![apod.date])?;
        debug!(date = %apod.date, deleted = deleted > 0, "remove favorite");
        Ok(deleted > 0)
    }

    fn contains(&self, apod: &Apod) -> Result<bool> {
        let conn = self.lock()?;
        let found = conn
            .query_row(
                "SELECT 1 FROM favorites WHERE date = ?1",
                params![apod.date],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn list(&self) -> Result<Vec<FavoriteApod>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT date, title, explanation, media_type, url, hdurl, service_version, favorited_at
             FROM favorites
             ORDER BY favorited_at DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            let media_type: String = row.get(3)?;
            let favorited_at: String = row.get(7)?;
            Ok(FavoriteApod {
                apod: Apod {
                    date: row.get(0)?,
                    title: row.get(1)?,
                    explanation: row.get(2)?,
                    media_type: parse_media_type(&media_type),
                    url: row.get(4)?,
                    hdurl: row.get(5)?,
                    service_version: row.get(6)?,
                },
                favorited_at: DateTime::parse_from_rfc3339(&favorited_at)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
            })
        })?;

        let mut favorites = Vec::new();
        for row in rows {
            favorites.push(row?);
        }
        Ok(favorites)
    }
}

fn media_type_str(media_type: MediaType) -> &'static str {
    match media_type {
        MediaType::Image => "image",
        MediaType::Video => "video",
    }
}

fn parse_media_type(s: &str) -> MediaType {
    match s {
        "video" => MediaType::Video,
        _ => MediaType::Image,
    }
}
