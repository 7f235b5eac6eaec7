// src/lib.rs
use std::sync::Arc;

pub mod analyzer;
pub mod clock;
pub mod config;
pub mod filter;
pub mod format;
pub mod report;
pub mod routes;
pub mod sample;
pub mod session;
pub mod stats;
pub mod view;

// Re-export AppState so integration tests can build routers easily.
pub use config::Config;

use analyzer::{Analyzer, RemoteAnalyzer, UnavailableAnalyzer};
use clock::SystemClock;
use reqwest::Client;
use stats::{StatsCache, StatsClient};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub client: Client,
    pub analyzer: Arc<dyn Analyzer>,
    pub stats: Arc<StatsClient>,
}

impl AppState {
    /// Build the production state: remote analyzer when an endpoint is
    /// configured, explicit-failure placeholder otherwise.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let client = Client::new();

        let analyzer: Arc<dyn Analyzer> = match &config.analyzer_url {
            Some(endpoint) => Arc::new(RemoteAnalyzer::from_endpoint(client.clone(), endpoint)?),
            None => Arc::new(UnavailableAnalyzer),
        };

        let cache = Arc::new(StatsCache::new(
            config.stats_cache_ttl_secs,
            Arc::new(SystemClock),
        ));
        let stats = Arc::new(StatsClient::new(
            client.clone(),
            config.github_token.clone(),
            cache,
        ));

        Ok(Self {
            config,
            client,
            analyzer,
            stats,
        })
    }
}

pub fn router(state: AppState) -> axum::Router {
    use axum::extract::DefaultBodyLimit;
    use axum::{
        Router,
        http::{Method, header},
        routing::{get, post},
    };
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::trace::TraceLayer;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(routes::inspect::health_check))
        .route("/inspect/analyze", post(routes::inspect::upload_and_analyze))
        .route("/inspect/view", post(routes::inspect::compose_view))
        .route("/inspect/version", get(routes::inspect::analyzer_version))
        .route("/inspect/sample", get(routes::inspect::sample_binary))
        .route("/stats/:owner/:repo", get(routes::stats::repo_stats))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(64 * 1024 * 1024))
        .with_state(state)
}

pub mod server {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    pub async fn run_server(port: u16) -> anyhow::Result<()> {
        dotenvy::dotenv().ok();
        let config = crate::Config::from_env()?;

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "binlens=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer())
            .init();

        let state = crate::AppState::from_config(config)?;
        let app = crate::router(state);

        let listener = tokio::net::TcpListener::bind(&format!("0.0.0.0:{}", port)).await?;
        tracing::info!("Server starting on port {}", port);

        axum::serve(listener, app).await?;
        Ok(())
    }
}
