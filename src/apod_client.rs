use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ServiceConfig;
use crate::error::{ApodError, Result};
use crate::models::{format_date, Apod};

/// Remote source of APOD records. The view models depend on this trait so
/// tests can swap in canned responses.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch a single record. `None` means "today" on the server side.
    async fn fetch_one(&self, date: Option<NaiveDate>) -> Result<Apod>;

    /// Fetch all records between `start` and `end` inclusive. The endpoint
    /// does not guarantee ordering; callers must sort.
    async fn fetch_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Apod>>;

    /// Fetch `count` arbitrary historical records. The endpoint returns them
    /// in no particular order and may repeat entries across calls.
    async fn fetch_by_count(&self, count: u32) -> Result<Vec<Apod>>;
}

pub struct ApodClient {
    http: reqwest::Client,
    config: ServiceConfig,
}

impl ApodClient {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("apod_reader/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApodError::InvalidRequest(e.to_string()))?;
        Ok(Self { http, config })
    }

    fn endpoint(&self, extra: &[(&str, String)]) -> Result<Url> {
        let mut params: Vec<(&str, String)> =
            vec![("api_key", self.config.api_key.clone())];
        params.extend_from_slice(extra);
        Url::parse_with_params(&self.config.base_url, params)
            .map_err(|e| ApodError::InvalidRequest(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(%url, "requesting APOD endpoint");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ApodError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| ApodError::Transport(e.to_string()))?;
        let body = response
            .text()
            .await
            .map_err(|e| ApodError::Transport(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| ApodError::Decoding(e.to_string()))
    }
}

#[async_trait]
impl FeedSource for ApodClient {
    async fn fetch_one(&self, date: Option<NaiveDate>) -> Result<Apod> {
        let mut extra = Vec::new();
        if let Some(date) = date {
            extra.push(("date", format_date(date)));
        }
        let url = self.endpoint(&extra)?;
        self.get_json(url).await
    }

    async fn fetch_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Apod>> {
        if start > end {
            return Err(ApodError::InvalidRequest(format!(
                "start date {} is after end date {}",
                format_date(start),
                format_date(end)
            )));
        }
        let url = self.endpoint(&[
            ("start_date", format_date(start)),
            ("end_date", format_date(end)),
        ])?;
        self.get_json(url).await
    }

    async fn fetch_by_count(&self, count: u32) -> Result<Vec<Apod>> {
        if count == 0 {
            return Err(ApodError::InvalidRequest(
                "count must be positive".to_string(),
            ));
        }
        let url = self.endpoint(&[("count", count.to_string())])?;
        self.get_json(url).await
    }
}
