use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// Base URL of the external analyzer engine. When unset, analysis
    /// requests fail with an explicit "unavailable" error.
    pub analyzer_url: Option<String>,
    pub sample_url: String,
    pub sample_fallback_url: String,
    pub github_token: Option<String>,
    pub stats_cache_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            analyzer_url: None,
            sample_url: crate::sample::SAMPLE_BINARY_DOWNLOAD_URL.to_string(),
            sample_fallback_url: crate::sample::SAMPLE_BINARY_DOWNLOAD_URL.to_string(),
            github_token: None,
            stats_cache_ttl_secs: 300,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let config = Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| defaults.port.to_string())
                .parse()?,
            analyzer_url: std::env::var("ANALYZER_URL")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            sample_url: std::env::var("SAMPLE_BINARY_URL").unwrap_or(defaults.sample_url),
            sample_fallback_url: std::env::var("SAMPLE_FALLBACK_URL")
                .unwrap_or(defaults.sample_fallback_url),
            github_token: std::env::var("GITHUB_TOKEN")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            stats_cache_ttl_secs: std::env::var("STATS_CACHE_TTL_SECS")
                .unwrap_or_else(|_| defaults.stats_cache_ttl_secs.to_string())
                .parse()?,
        };

        Ok(config)
    }
}
