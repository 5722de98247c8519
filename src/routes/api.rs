//! `/api` routes. Unknown paths under the prefix answer with the JSON failure envelope
//! rather than falling through to the static site.

use crate::error::AppError;
use crate::handlers::{
    create_contact, download_resume, github_repos, github_stats, list_contacts, list_project_stats,
    list_subscribers, subscribe,
};
use crate::openapi::openapi_json;
use crate::state::AppState;
use axum::extract::OriginalUri;
use axum::{routing::get, routing::post, Router};

async fn api_not_found(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

/// Mounted under `/api`.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/contact", post(create_contact))
        .route("/contacts", get(list_contacts))
        .route("/blog-subscribe", post(subscribe))
        .route("/blog-subscribers", get(list_subscribers))
        .route("/github-stats", get(github_stats))
        .route("/project-stats", get(list_project_stats))
        .route("/github-repos", get(github_repos))
        .route("/resume", get(download_resume))
        .route("/openapi.json", get(openapi_json))
        .fallback(api_not_found)
        .with_state(state)
}
