use crate::domain::ports::ticker_source::{FeedError, TickerSource};
use async_trait::async_trait;
use std::time::Duration;

pub const DEFAULT_TICKER_URL: &str = "https://agmarknet.gov.in/agnew/namticker.aspx";

/// AGMARKNET rejects clients that do not look like a browser.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/91.0.4472.124 Safari/537.36";

/// Fetches the AGMARKNET commodity ticker page.
pub struct AgmarknetFeed {
    url: String,
    client: reqwest::Client,
}

impl AgmarknetFeed {
    pub fn new(url: String, timeout: Duration) -> Self {
        Self {
            url,
            client: reqwest::Client::builder()
                .user_agent(BROWSER_USER_AGENT)
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }
}

impl Default for AgmarknetFeed {
    fn default() -> Self {
        Self::new(DEFAULT_TICKER_URL.to_string(), Duration::from_secs(10))
    }
}

#[async_trait]
impl TickerSource for AgmarknetFeed {
    fn name(&self) -> &str {
        "agmarknet"
    }

    async fn fetch_page(&self) -> Result<String, FeedError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(FeedError::Network(format!(
                "AGMARKNET returned {}",
                resp.status()
            )));
        }

        resp.text()
            .await
            .map_err(|e| FeedError::Body(e.to_string()))
    }
}
