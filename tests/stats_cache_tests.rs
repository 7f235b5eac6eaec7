// tests/stats_cache_tests.rs

use binlens::clock::ManualClock;
use binlens::stats::{RepoStats, StatsCache, StatsClient, StatsError};
use chrono::{Duration, TimeZone, Utc};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
    ))
}

fn repo_payload() -> serde_json::Value {
    json!({
        "full_name": "octo/widget",
        "description": "A widget.",
        "html_url": "https://github.com/octo/widget",
        "stargazers_count": 1500,
        "forks_count": 120,
        "language": "Rust"
    })
}

async fn mock_repo_endpoint(server: &MockServer, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path("/repos/octo/widget"))
        .respond_with(ResponseTemplate::new(200).set_body_json(repo_payload()))
        .expect(expected_hits)
        .mount(server)
        .await;
}

#[tokio::test]
async fn fetches_and_caches_repo_stats() {
    let mock_server = MockServer::start().await;
    mock_repo_endpoint(&mock_server, 1).await;

    let clock = manual_clock();
    let cache = Arc::new(StatsCache::new(300, clock.clone()));
    let client = StatsClient::new(reqwest::Client::new(), None, cache.clone())
        .with_api_base(mock_server.uri());

    let first = client.repo_stats("octo", "widget").await.expect("fetch should succeed");
    assert_eq!(first.name, "octo/widget");
    assert_eq!(first.stars, 1500);
    assert_eq!(cache.len(), 1);

    // Within the TTL the mock must not be hit again.
    clock.advance(Duration::seconds(100));
    let second = client.repo_stats("octo", "widget").await.expect("cache hit expected");
    assert_eq!(second.stars, 1500);
}

#[tokio::test]
async fn expired_entries_are_refetched() {
    let mock_server = MockServer::start().await;
    mock_repo_endpoint(&mock_server, 2).await;

    let clock = manual_clock();
    let cache = Arc::new(StatsCache::new(300, clock.clone()));
    let client = StatsClient::new(reqwest::Client::new(), None, cache.clone())
        .with_api_base(mock_server.uri());

    client.repo_stats("octo", "widget").await.expect("first fetch");
    clock.advance(Duration::seconds(300));
    client.repo_stats("octo", "widget").await.expect("refetch after expiry");
}

#[tokio::test]
async fn http_failure_surfaces_status_and_key() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let cache = Arc::new(StatsCache::new(300, manual_clock()));
    let client = StatsClient::new(reqwest::Client::new(), None, cache.clone())
        .with_api_base(mock_server.uri());

    let error = client.repo_stats("octo", "missing").await.expect_err("404 expected");
    match error {
        StatsError::Http(status, key) => {
            assert_eq!(status, 404);
            assert_eq!(key, "octo/missing");
        }
        other => panic!("unexpected error variant: {other:?}"),
    }
    // Failures are never cached.
    assert!(cache.is_empty());
}

#[test]
fn cache_get_removes_expired_entry() {
    let clock = manual_clock();
    let cache = StatsCache::new(60, clock.clone());
    cache.put(
        "octo/widget",
        RepoStats {
            name: "octo/widget".to_string(),
            description: None,
            url: "https://github.com/octo/widget".to_string(),
            stars: 10,
            forks: 2,
            language: None,
        },
    );
    assert_eq!(cache.len(), 1);

    clock.advance(Duration::seconds(59));
    assert!(cache.get("octo/widget").is_some());

    clock.advance(Duration::seconds(1));
    assert!(cache.get("octo/widget").is_none());
    assert!(cache.is_empty());
}

#[test]
fn star_labels_abbreviate_counts() {
    let stats = RepoStats {
        name: "octo/widget".to_string(),
        description: Some("A widget.".to_string()),
        url: "https://github.com/octo/widget".to_string(),
        stars: 1500,
        forks: 999,
        language: Some("Rust".to_string()),
    };
    assert_eq!(stats.stars_label(), "1.5k");
    assert_eq!(stats.forks_label(), "999");
}
