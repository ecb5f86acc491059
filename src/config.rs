//! Endpoint configuration. The API key is supplied by the environment; the
//! crate itself never embeds one.

pub const DEFAULT_BASE_URL: &str = "https://api.nasa.gov/planetary/apod";

/// NASA issues per-user keys; `DEMO_KEY` works with tight rate limits.
pub const DEMO_KEY: &str = "DEMO_KEY";

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub base_url: String,
    pub api_key: String,
}

impl ServiceConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Reads `NASA_API_KEY`, falling back to the demo key.
    pub fn from_env() -> Self {
        let key = std::env::var("NASA_API_KEY").unwrap_or_else(|_| DEMO_KEY.to_string());
        Self::new(key)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new(DEMO_KEY)
    }
}
