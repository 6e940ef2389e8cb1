// End-to-end pipeline tests against mock connector endpoints

use adscout_core::model::{SignalKind, SignalValue};
use adscout_core::pipeline::{HuntOptions, execute_hunt};
use adscout_core::scoring::ScoringConfig;
use adscout_connectors::{AdLibraryClient, PerformanceClient};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn hunt_options(keywords: Vec<&str>) -> HuntOptions {
    HuntOptions {
        keywords: keywords.into_iter().map(String::from).collect(),
        seed_domains: Vec::new(),
        region: Some("US".to_string()),
        target_count: 10,
        workers: 2,
        dry_run: false,
        show_progress_bars: false,
    }
}

fn clients(server: &MockServer) -> (Arc<AdLibraryClient>, Arc<PerformanceClient>) {
    let adlibrary = Arc::new(
        AdLibraryClient::new("test-key")
            .with_base_url(server.uri())
            .with_pacing(Duration::from_millis(0)),
    );
    let performance =
        Arc::new(PerformanceClient::new(Some("test-key".to_string())).with_base_url(server.uri()));
    (adlibrary, performance)
}

async fn mount_search(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_audit(server: &MockServer, target: &str, load_time_ms: f64) {
    Mock::given(method("GET"))
        .and(path("/runPagespeed"))
        .and(query_param("url", target))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "lighthouseResult": {
                "audits": {
                    "interactive": {"numericValue": load_time_ms}
                },
                "categories": {
                    "performance": {"score": 0.5}
                }
            }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_hunt_scores_and_ranks_prospects() {
    let mock_server = MockServer::start().await;

    mount_search(
        &mock_server,
        serde_json::json!({
            "advertisers": [
                {
                    "advertiser": "Acme Plumbing",
                    "domain": "acmeplumbing.example",
                    "ads_count": 7,
                    "creatives": [
                        {"format": "text"},
                        {"format": "text"},
                        {"format": "text"},
                        {"format": "text"}
                    ],
                    "regions": ["US", "CA", "GB", "AU", "DE", "FR"]
                },
                {
                    "advertiser": "Tidy Gutters",
                    "domain": "tidygutters.example",
                    "ads_count": 2
                }
            ]
        }),
    )
    .await;

    mount_audit(&mock_server, "https://acmeplumbing.example/", 5200.0).await;
    mount_audit(&mock_server, "https://tidygutters.example/", 1200.0).await;

    let (adlibrary, performance) = clients(&mock_server);
    let outcome = execute_hunt(
        hunt_options(vec!["plumber minneapolis"]),
        adlibrary,
        performance,
        ScoringConfig::default(),
        None,
    )
    .await
    .unwrap();

    assert_eq!(outcome.discovered.len(), 2);
    assert_eq!(outcome.scored.len(), 2);

    // Acme fires: 3+ ads (+20), low diversity 1/4 (+15), slow page (+20, +10),
    // 5+ regions (+10) = 75. Tidy Gutters fires nothing.
    let best = &outcome.scored[0];
    assert_eq!(best.prospect.domain, "acmeplumbing.example");
    assert_eq!(best.qualification.score, 75);
    assert!(best.qualification.qualified);
    assert_eq!(best.qualification.hits.len(), 5);

    let worst = &outcome.scored[1];
    assert_eq!(worst.prospect.domain, "tidygutters.example");
    assert_eq!(worst.qualification.score, 0);
    assert!(!worst.qualification.qualified);

    let qualified = outcome.qualified();
    assert_eq!(qualified.len(), 1);
    assert_eq!(qualified[0].prospect.domain, "acmeplumbing.example");

    // The signal set backing the score is retained for persistence.
    assert_eq!(
        best.signals.get(SignalKind::LoadTime).value,
        SignalValue::Millis(5200)
    );
}

#[tokio::test]
async fn test_dry_run_discovers_without_scoring() {
    let mock_server = MockServer::start().await;

    mount_search(
        &mock_server,
        serde_json::json!({
            "advertisers": [
                {"advertiser": "Acme Plumbing", "domain": "acmeplumbing.example", "ads_count": 7}
            ]
        }),
    )
    .await;

    let (adlibrary, performance) = clients(&mock_server);
    let mut options = hunt_options(vec!["plumber minneapolis"]);
    options.dry_run = true;

    let outcome = execute_hunt(
        options,
        adlibrary,
        performance,
        ScoringConfig::default(),
        None,
    )
    .await
    .unwrap();

    assert_eq!(outcome.discovered.len(), 1);
    assert!(outcome.scored.is_empty());
}

#[tokio::test]
async fn test_audit_failure_degrades_to_unavailable() {
    let mock_server = MockServer::start().await;

    mount_search(
        &mock_server,
        serde_json::json!({
            "advertisers": [
                {"advertiser": "Acme Plumbing", "domain": "acmeplumbing.example", "ads_count": 7}
            ]
        }),
    )
    .await;

    // Performance API is down for everyone.
    Mock::given(method("GET"))
        .and(path("/runPagespeed"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let (adlibrary, performance) = clients(&mock_server);
    let outcome = execute_hunt(
        hunt_options(vec!["plumber minneapolis"]),
        adlibrary,
        performance,
        ScoringConfig::default(),
        None,
    )
    .await
    .unwrap();

    assert_eq!(outcome.scored.len(), 1);
    let scored = &outcome.scored[0];

    // Ad signals still score; the load time signal is unavailable.
    assert_eq!(scored.qualification.score, 20);
    assert_eq!(
        scored.signals.get(SignalKind::LoadTime).value,
        SignalValue::Unavailable
    );
    assert_eq!(scored.signals.get(SignalKind::LoadTime).confidence, 0.0);
}

#[tokio::test]
async fn test_search_failure_continues_batch() {
    let mock_server = MockServer::start().await;

    // Every search fails; the hunt completes with nothing rather than dying.
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let (adlibrary, performance) = clients(&mock_server);
    let outcome = execute_hunt(
        hunt_options(vec!["plumber minneapolis", "roofer st paul"]),
        adlibrary,
        performance,
        ScoringConfig::default(),
        None,
    )
    .await
    .unwrap();

    assert!(outcome.discovered.is_empty());
    assert!(outcome.scored.is_empty());
}

#[tokio::test]
async fn test_seed_domains_skip_discovery() {
    let mock_server = MockServer::start().await;

    mount_search(
        &mock_server,
        serde_json::json!({
            "advertisers": [
                {"advertiser": "Acme Plumbing", "domain": "acmeplumbing.example", "ads_count": 4}
            ]
        }),
    )
    .await;

    mount_audit(&mock_server, "https://acmeplumbing.example/", 3500.0).await;

    let (adlibrary, performance) = clients(&mock_server);
    let mut options = hunt_options(vec![]);
    options.seed_domains = vec!["acmeplumbing.example".to_string()];

    let outcome = execute_hunt(
        options,
        adlibrary,
        performance,
        ScoringConfig::default(),
        None,
    )
    .await
    .unwrap();

    assert_eq!(outcome.scored.len(), 1);
    let scored = &outcome.scored[0];
    assert_eq!(scored.prospect.company_name, "Acme Plumbing");
    assert_eq!(scored.prospect.discovered_via, "seed");
    // 3+ ads (+20) and slow page (+20).
    assert_eq!(scored.qualification.score, 40);
}

#[tokio::test]
async fn test_hunt_without_input_is_an_error() {
    let mock_server = MockServer::start().await;
    let (adlibrary, performance) = clients(&mock_server);

    let result = execute_hunt(
        hunt_options(vec![]),
        adlibrary,
        performance,
        ScoringConfig::default(),
        None,
    )
    .await;

    assert!(result.is_err());
}
