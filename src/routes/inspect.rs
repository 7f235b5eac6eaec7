// src/routes/inspect.rs
use axum::{
    extract::{Multipart, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};

use super::{ApiError, api_error};
use crate::AppState;
use crate::analyzer::AnalyzerError;
use crate::filter::FilterCriteria;
use crate::report::AnalysisReport;
use crate::sample;
use crate::view::{Tab, TabContent, compose};

// GET /health
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "binlens",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub file_name: String,
    pub size_bytes: u64,
    pub duration_ms: i64,
    pub report: AnalysisReport,
}

fn analyzer_error_status(error: &AnalyzerError) -> StatusCode {
    match error {
        AnalyzerError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AnalyzerError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        AnalyzerError::Transport(_) | AnalyzerError::BadReport(_) => StatusCode::BAD_GATEWAY,
    }
}

// POST /inspect/analyze - upload a binary and run the external analyzer
pub async fn upload_and_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let mut file_name = "unknown".to_string();
    let mut contents = vec![];

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        api_error(
            StatusCode::BAD_REQUEST,
            "multipart_error",
            format!("Failed to parse multipart form: {e}"),
        )
    })? {
        if let Some(name) = field.file_name().map(|s| s.to_string()) {
            file_name = name;
        }
        contents = field
            .bytes()
            .await
            .map_err(|e| {
                api_error(
                    StatusCode::BAD_REQUEST,
                    "read_error",
                    format!("Failed to read file contents: {e}"),
                )
            })?
            .to_vec();
    }

    if contents.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "empty_file",
            "No file content provided",
        ));
    }

    tracing::info!("analyzing upload '{}' ({} bytes)", file_name, contents.len());
    let started = chrono::Utc::now();
    let report = state.analyzer.analyze(&contents).await.map_err(|e| {
        api_error(analyzer_error_status(&e), "analysis_error", e.to_string())
    })?;
    let duration_ms = (chrono::Utc::now() - started).num_milliseconds();

    Ok(Json(AnalyzeResponse {
        file_name,
        size_bytes: contents.len() as u64,
        duration_ms,
        report,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ViewRequest {
    pub report: AnalysisReport,
    #[serde(default)]
    pub criteria: FilterCriteria,
    pub tab: Tab,
}

// POST /inspect/view - compose one tab of a report under filter criteria
pub async fn compose_view(Json(request): Json<ViewRequest>) -> Json<TabContent> {
    Json(compose(&request.report, &request.criteria, request.tab))
}

// GET /inspect/version - external analyzer api version
pub async fn analyzer_version(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let version = state.analyzer.api_version().await.map_err(|e| {
        api_error(analyzer_error_status(&e), "version_error", e.to_string())
    })?;
    Ok(Json(serde_json::json!({ "version": version })))
}

// GET /inspect/sample - proxy the hosted sample binary
pub async fn sample_binary(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let bytes = sample::fetch_sample(&state.client, &state.config.sample_url)
        .await
        .map_err(|e| {
            api_error(
                StatusCode::BAD_GATEWAY,
                "sample_error",
                e.remediation(&state.config.sample_fallback_url),
            )
        })?;

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        bytes,
    ))
}
