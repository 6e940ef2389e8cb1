use crate::error::{ConnectorError, Result};
use crate::record::AdvertiserRecord;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

const DEFAULT_BASE_URL: &str = "https://www.searchapi.io/api/v1";

/// Client for the ad-transparency search API.
///
/// Given a keyword and an optional region, returns the advertisers currently
/// running ads for that keyword. The response shape is treated as a black box:
/// records are deserialized with every non-identity field optional.
pub struct AdLibraryClient {
    client: Client,
    api_key: String,
    base_url: String,
    pacing: Duration,
}

impl AdLibraryClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_timeout(api_key, 10)
    }

    pub fn with_timeout(api_key: impl Into<String>, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .user_agent("Adscout/0.1 (https://github.com/trapdoorsec/adscout)")
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs / 2))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .redirect(reqwest::redirect::Policy::limited(3))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            pacing: Duration::from_millis(1000),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fixed delay inserted after every request. The upstream API rate-limits
    /// aggressively; one request per second keeps a batch under the cap.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Search the ad library for advertisers matching `keyword`.
    pub async fn search(
        &self,
        keyword: &str,
        region: Option<&str>,
        limit: usize,
    ) -> Result<Vec<AdvertiserRecord>> {
        debug!("Searching ad library for '{}'", keyword);

        let url = format!("{}/search", self.base_url);
        let mut query: Vec<(&str, String)> = vec![
            ("engine", "ads_transparency".to_string()),
            ("q", keyword.to_string()),
            ("num", limit.to_string()),
            ("api_key", self.api_key.clone()),
        ];
        if let Some(region) = region {
            query.push(("region", region.to_string()));
        }

        let response = self.client.get(&url).query(&query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ConnectorError::ApiStatus(status.as_u16()));
        }

        let payload: SearchResponse = response
            .json()
            .await
            .map_err(|e| ConnectorError::MalformedResponse(e.to_string()))?;

        info!(
            "Ad library returned {} advertisers for '{}'",
            payload.advertisers.len(),
            keyword
        );

        tokio::time::sleep(self.pacing).await;

        Ok(payload.advertisers)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    advertisers: Vec<AdvertiserRecord>,
}
