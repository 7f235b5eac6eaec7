// src/routes/stats.rs
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use super::{ApiError, api_error};
use crate::AppState;
use crate::stats::{RepoStats, StatsError};

// GET /stats/{owner}/{repo} - cached repository statistics
pub async fn repo_stats(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
) -> Result<Json<RepoStats>, ApiError> {
    let stats = state.stats.repo_stats(&owner, &repo).await.map_err(|e| {
        let status = match &e {
            StatsError::Http(404, _) => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_GATEWAY,
        };
        api_error(status, "stats_error", e.to_string())
    })?;
    Ok(Json(stats))
}
