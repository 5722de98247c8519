//! OpenAPI description of the `/api` surface, served at `/api/openapi.json`.

use crate::github::RepoSummary;
use crate::handlers;
use crate::model::{BlogSubscriber, Contact, NewBlogSubscriber, NewContact, ProjectStats, StatCounts};
use crate::response::{ContactCreated, Failure, SubscriberCreated};
use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Portfolio API", description = "Contact form, newsletter, project stats and resume download."),
    paths(
        handlers::contact::create_contact,
        handlers::contact::list_contacts,
        handlers::subscriber::subscribe,
        handlers::subscriber::list_subscribers,
        handlers::github::github_stats,
        handlers::github::list_project_stats,
        handlers::github::github_repos,
        handlers::resume::download_resume,
    ),
    components(schemas(
        Contact,
        NewContact,
        ContactCreated,
        BlogSubscriber,
        NewBlogSubscriber,
        SubscriberCreated,
        ProjectStats,
        StatCounts,
        RepoSummary,
        Failure,
    )),
    tags(
        (name = "contact", description = "Contact form messages"),
        (name = "newsletter", description = "Blog update subscriptions"),
        (name = "projects", description = "Project popularity and repositories"),
        (name = "resume", description = "Resume download"),
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_api_path_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/contact",
            "/api/contacts",
            "/api/blog-subscribe",
            "/api/blog-subscribers",
            "/api/github-stats",
            "/api/project-stats",
            "/api/github-repos",
            "/api/resume",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
