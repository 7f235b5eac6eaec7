// src/stats.rs
//
// Repository statistics with an explicit TTL cache. The clock is injected so
// expiry can be driven deterministically in tests.

use crate::clock::Clock;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const GITHUB_API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = "binlens";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoStats {
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    pub stars: i64,
    pub forks: i64,
    pub language: Option<String>,
}

impl RepoStats {
    /// Abbreviated star count for compact display.
    pub fn stars_label(&self) -> String {
        crate::format::format_count(self.stars)
    }

    pub fn forks_label(&self) -> String {
        crate::format::format_count(self.forks)
    }
}

#[derive(Debug, Deserialize)]
struct GitHubRepoPayload {
    full_name: String,
    description: Option<String>,
    html_url: String,
    stargazers_count: i64,
    forks_count: i64,
    language: Option<String>,
}

struct CachedStats {
    stats: RepoStats,
    fetched_at: DateTime<Utc>,
}

pub struct StatsCache {
    entries: DashMap<String, CachedStats>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl StatsCache {
    pub fn new(ttl_secs: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl: Duration::seconds(ttl_secs as i64),
            clock,
        }
    }

    pub fn get(&self, key: &str) -> Option<RepoStats> {
        let entry = self.entries.get(key)?;
        if self.clock.now() - entry.fetched_at >= self.ttl {
            drop(entry);
            self.entries.remove(key);
            tracing::debug!("stats cache entry for {} expired", key);
            return None;
        }
        Some(entry.stats.clone())
    }

    pub fn put(&self, key: &str, stats: RepoStats) {
        self.entries.insert(
            key.to_string(),
            CachedStats {
                stats,
                fetched_at: self.clock.now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("GitHub request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("GitHub returned status {0} for {1}")]
    Http(u16, String),
}

pub struct StatsClient {
    client: reqwest::Client,
    api_base: String,
    token: Option<String>,
    cache: Arc<StatsCache>,
}

impl StatsClient {
    pub fn new(client: reqwest::Client, token: Option<String>, cache: Arc<StatsCache>) -> Self {
        Self {
            client,
            api_base: GITHUB_API_BASE.to_string(),
            token,
            cache,
        }
    }

    /// Override the API base, for tests against a mock server.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    pub async fn repo_stats(&self, owner: &str, repo: &str) -> Result<RepoStats, StatsError> {
        let key = format!("{owner}/{repo}");
        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!("stats cache hit for {}", key);
            return Ok(cached);
        }

        let url = format!("{}/repos/{owner}/{repo}", self.api_base);
        let mut request = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github.v3+json")
            .header(reqwest::header::USER_AGENT, USER_AGENT);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!("failed to fetch stats for {}: {}", key, status);
            return Err(StatsError::Http(status.as_u16(), key));
        }

        let payload: GitHubRepoPayload = response.json().await?;
        let stats = RepoStats {
            name: payload.full_name,
            description: payload.description,
            url: payload.html_url,
            stars: payload.stargazers_count,
            forks: payload.forks_count,
            language: payload.language,
        };
        self.cache.put(&key, stats.clone());
        tracing::info!("fetched stats for {} ({} stars)", key, stats.stars);
        Ok(stats)
    }
}
