//! Project popularity counters and the repository listing.

use crate::error::{AppError, StoreResultExt};
use crate::github::RepoSummary;
use crate::model::{ProjectStats, StatCounts};
use crate::response::Failure;
use crate::service::ProjectStatsService;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use std::collections::BTreeMap;

/// GET /api/github-stats: counters for the tracked projects, seeded on first request.
#[utoipa::path(
    get,
    path = "/api/github-stats",
    responses(
        (status = 200, description = "Project id to {stars, forks, watchers}", body = BTreeMap<String, StatCounts>),
        (status = 500, description = "Storage failure", body = Failure)
    ),
    tag = "projects"
)]
pub async fn github_stats(State(state): State<AppState>) -> Result<Json<BTreeMap<String, StatCounts>>, AppError> {
    let counts = ProjectStatsService::new(state.store.as_ref())
        .counts_for(&state.settings.tracked_projects)
        .await
        .or_fail("Failed to fetch GitHub stats")?;
    Ok(Json(counts))
}

/// GET /api/project-stats: every stored counter row.
#[utoipa::path(
    get,
    path = "/api/project-stats",
    responses(
        (status = 200, description = "All stored project stats", body = [ProjectStats]),
        (status = 500, description = "Storage failure", body = Failure)
    ),
    tag = "projects"
)]
pub async fn list_project_stats(State(state): State<AppState>) -> Result<Json<Vec<ProjectStats>>, AppError> {
    let stats = state
        .store
        .get_all_project_stats()
        .await
        .or_fail("Failed to fetch project stats")?;
    Ok(Json(stats))
}

/// GET /api/github-repos: public, non-fork repositories of the configured account.
#[utoipa::path(
    get,
    path = "/api/github-repos",
    responses(
        (status = 200, description = "Repository summaries", body = [RepoSummary]),
        (status = 502, description = "Code-hosting API failed", body = Failure)
    ),
    tag = "projects"
)]
pub async fn github_repos(State(state): State<AppState>) -> Result<Json<Vec<RepoSummary>>, AppError> {
    Ok(Json(state.github.list_repos().await?))
}
