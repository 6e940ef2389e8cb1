use crate::error::{ConnectorError, Result};
use crate::record::PerformanceRecord;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/pagespeedonline/v5";

/// Client for a PageSpeed-style page performance API.
///
/// Given a URL, returns load-time metrics for its landing page. Anything the
/// API does not report comes back as `None` and degrades to an unavailable
/// signal downstream.
pub struct PerformanceClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl PerformanceClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_timeout(api_key, 30)
    }

    pub fn with_timeout(api_key: Option<String>, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .user_agent("Adscout/0.1 (https://github.com/trapdoorsec/adscout)")
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs / 2))
            .pool_max_idle_per_host(10)
            .redirect(reqwest::redirect::Policy::limited(3))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Run a performance audit for `target_url`.
    pub async fn audit(&self, target_url: &str) -> Result<PerformanceRecord> {
        Url::parse(target_url).map_err(|e| ConnectorError::InvalidUrl(e.to_string()))?;

        debug!("Auditing page performance for {}", target_url);

        let url = format!("{}/runPagespeed", self.base_url);
        let mut query: Vec<(&str, String)> = vec![("url", target_url.to_string())];
        if let Some(ref key) = self.api_key {
            query.push(("key", key.clone()));
        }

        let response = self.client.get(&url).query(&query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ConnectorError::ApiStatus(status.as_u16()));
        }

        let payload: PagespeedResponse = response
            .json()
            .await
            .map_err(|e| ConnectorError::MalformedResponse(e.to_string()))?;

        let mut record = PerformanceRecord::new(target_url.to_string());

        if let Some(lighthouse) = payload.lighthouse {
            // Time-to-interactive is the headline number; fall back to speed
            // index when the audit is missing.
            let load_time = lighthouse
                .audits
                .interactive
                .and_then(|a| a.numeric_value)
                .or_else(|| lighthouse.audits.speed_index.and_then(|a| a.numeric_value));

            record.load_time_ms = load_time.map(|ms| ms.round() as u64);
            record.performance_score = lighthouse
                .categories
                .performance
                .and_then(|c| c.score);
        }

        Ok(record)
    }
}

#[derive(Debug, Deserialize)]
struct PagespeedResponse {
    #[serde(rename = "lighthouseResult", default)]
    lighthouse: Option<LighthouseResult>,
}

#[derive(Debug, Default, Deserialize)]
struct LighthouseResult {
    #[serde(default)]
    audits: Audits,
    #[serde(default)]
    categories: Categories,
}

#[derive(Debug, Default, Deserialize)]
struct Audits {
    #[serde(default)]
    interactive: Option<Audit>,
    #[serde(rename = "speed-index", default)]
    speed_index: Option<Audit>,
}

#[derive(Debug, Default, Deserialize)]
struct Audit {
    #[serde(rename = "numericValue", default)]
    numeric_value: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct Categories {
    #[serde(default)]
    performance: Option<Category>,
}

#[derive(Debug, Default, Deserialize)]
struct Category {
    #[serde(default)]
    score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> PerformanceClient {
        PerformanceClient::new(Some("test-key".to_string())).with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_audit_parses_metrics() {
        let mock_server = MockServer::start().await;

        let body = serde_json::json!({
            "lighthouseResult": {
                "audits": {
                    "interactive": {"numericValue": 5234.7},
                    "speed-index": {"numericValue": 3100.0}
                },
                "categories": {
                    "performance": {"score": 0.42}
                }
            }
        });

        Mock::given(method("GET"))
            .and(path("/runPagespeed"))
            .and(query_param("url", "https://slow.example/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        let record = client.audit("https://slow.example/").await.unwrap();

        assert_eq!(record.load_time_ms, Some(5235));
        assert_eq!(record.performance_score, Some(0.42));
        assert!(record.error.is_none());
    }

    #[tokio::test]
    async fn test_audit_falls_back_to_speed_index() {
        let mock_server = MockServer::start().await;

        let body = serde_json::json!({
            "lighthouseResult": {
                "audits": {
                    "speed-index": {"numericValue": 2800.4}
                }
            }
        });

        Mock::given(method("GET"))
            .and(path("/runPagespeed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        let record = client.audit("https://ok.example/").await.unwrap();

        assert_eq!(record.load_time_ms, Some(2800));
        assert_eq!(record.performance_score, None);
    }

    #[tokio::test]
    async fn test_audit_tolerates_empty_payload() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/runPagespeed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        let record = client.audit("https://empty.example/").await.unwrap();

        assert_eq!(record.load_time_ms, None);
        assert_eq!(record.performance_score, None);
    }

    #[tokio::test]
    async fn test_audit_rejects_invalid_url() {
        let mock_server = MockServer::start().await;
        let client = test_client(&mock_server);

        let result = client.audit("not a url").await;
        assert!(matches!(result, Err(ConnectorError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_audit_api_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/runPagespeed"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        let result = client.audit("https://broken.example/").await;

        assert!(matches!(result, Err(ConnectorError::ApiStatus(500))));
    }
}
