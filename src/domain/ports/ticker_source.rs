use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP or network error, including timeouts and non-2xx statuses
    #[error("Network error: {0}")]
    Network(String),
    /// Response body could not be read
    #[error("Body error: {0}")]
    Body(String),
}

/// Somewhere the raw ticker page can be fetched from.
#[async_trait]
pub trait TickerSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch the page and return its HTML.
    async fn fetch_page(&self) -> Result<String, FeedError>;
}
