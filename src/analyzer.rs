// src/analyzer.rs
//
// Capability boundary to the external binary-analysis engine. The engine's
// internals are not part of this crate; everything goes through `analyze`
// and `api_version`.

use crate::report::AnalysisReport;
use async_trait::async_trait;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    /// The analyzer rejected the input (malformed or unsupported binary).
    #[error("{0}")]
    Rejected(String),
    /// No analyzer endpoint is configured for this process.
    #[error("analyzer unavailable: {0}")]
    Unavailable(String),
    #[error("analyzer request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("analyzer returned an unreadable report: {0}")]
    BadReport(#[from] serde_json::Error),
}

#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, bytes: &[u8]) -> Result<AnalysisReport, AnalyzerError>;
    async fn api_version(&self) -> Result<String, AnalyzerError>;
}

/// Analyzer engine reached over HTTP. Raw bytes go out, a JSON report comes
/// back; non-2xx responses carry the rejection reason in the body.
pub struct RemoteAnalyzer {
    client: reqwest::Client,
    base_url: Url,
}

impl RemoteAnalyzer {
    pub fn new(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn from_endpoint(client: reqwest::Client, endpoint: &str) -> anyhow::Result<Self> {
        let base_url = Url::parse(endpoint)?;
        Ok(Self::new(client, base_url))
    }

    fn endpoint(&self, path: &str) -> Result<Url, AnalyzerError> {
        self.base_url
            .join(path)
            .map_err(|e| AnalyzerError::Unavailable(format!("bad analyzer endpoint: {e}")))
    }
}

#[async_trait]
impl Analyzer for RemoteAnalyzer {
    async fn analyze(&self, bytes: &[u8]) -> Result<AnalysisReport, AnalyzerError> {
        let url = self.endpoint("analyze")?;
        tracing::debug!("submitting {} bytes to analyzer at {}", bytes.len(), url);
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            let message = if message.trim().is_empty() {
                format!("analysis failed ({status})")
            } else {
                message
            };
            tracing::warn!("analyzer rejected input: {}", message);
            return Err(AnalyzerError::Rejected(message));
        }

        let body = response.bytes().await?;
        let report: AnalysisReport = serde_json::from_slice(&body)?;
        tracing::info!(
            "analyzer produced report: {} findings, {} sections, {} strings",
            report.findings.len(),
            report.sections.len(),
            report.strings.len()
        );
        Ok(report)
    }

    async fn api_version(&self) -> Result<String, AnalyzerError> {
        let url = self.endpoint("api-version")?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AnalyzerError::Rejected(format!(
                "version lookup failed ({status})"
            )));
        }
        Ok(response.text().await?.trim().to_string())
    }
}

/// Placeholder used when no endpoint is configured. Every call fails
/// explicitly rather than silently doing nothing.
pub struct UnavailableAnalyzer;

#[async_trait]
impl Analyzer for UnavailableAnalyzer {
    async fn analyze(&self, _bytes: &[u8]) -> Result<AnalysisReport, AnalyzerError> {
        Err(AnalyzerError::Unavailable(
            "no analyzer endpoint configured (set ANALYZER_URL)".to_string(),
        ))
    }

    async fn api_version(&self) -> Result<String, AnalyzerError> {
        Err(AnalyzerError::Unavailable(
            "no analyzer endpoint configured (set ANALYZER_URL)".to_string(),
        ))
    }
}
