//! Client for the public code-hosting API: lists an account's repositories as display summaries.

use crate::case::slug_to_title;
use crate::config::Settings;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use utoipa::ToSchema;

const REPOS_FAILED: &str = "Failed to fetch GitHub repositories";

/// Repository as returned by `GET /users/{user}/repos`. Only the fields we read.
#[derive(Clone, Debug, Deserialize)]
pub struct GithubRepo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: Option<u32>,
    #[serde(default)]
    pub forks_count: Option<u32>,
    #[serde(default)]
    pub watchers_count: Option<u32>,
    pub html_url: String,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub topics: Option<Vec<String>>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct RepoSummary {
    pub id: String,
    pub name: String,
    pub title: String,
    pub description: String,
    pub language: String,
    pub stars: u32,
    pub forks: u32,
    pub watchers: u32,
    pub html_url: String,
    pub homepage: String,
    pub topics: Vec<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Drop forks and private repositories and map the rest for display.
pub fn summarize(repos: Vec<GithubRepo>, username: &str) -> Vec<RepoSummary> {
    repos
        .into_iter()
        .filter(|r| !r.fork && !r.private)
        .map(|r| {
            let homepage = r
                .homepage
                .filter(|h| !h.trim().is_empty())
                .unwrap_or_else(|| format!("https://{}.github.io/{}/", username, r.name));
            RepoSummary {
                id: r.name.clone(),
                title: slug_to_title(&r.name),
                description: r
                    .description
                    .filter(|d| !d.is_empty())
                    .unwrap_or_else(|| "No description available".into()),
                language: r.language.filter(|l| !l.is_empty()).unwrap_or_else(|| "Unknown".into()),
                stars: r.stargazers_count.unwrap_or(0),
                forks: r.forks_count.unwrap_or(0),
                watchers: r.watchers_count.unwrap_or(0),
                html_url: r.html_url,
                homepage,
                topics: r.topics.unwrap_or_default(),
                created_at: r.created_at,
                updated_at: r.updated_at,
                name: r.name,
            }
        })
        .collect()
}

#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_url: String,
    username: String,
}

impl GithubClient {
    pub fn new(settings: &Settings) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|source| AppError::Upstream {
                message: "Failed to build GitHub client",
                source,
            })?;
        Ok(GithubClient {
            http,
            api_url: settings.github_api_url.clone(),
            username: settings.github_username.clone(),
        })
    }

    pub fn repos_url(&self) -> String {
        format!("{}/users/{}/repos?per_page=100&sort=updated", self.api_url, self.username)
    }

    pub async fn list_repos(&self) -> Result<Vec<RepoSummary>, AppError> {
        let url = self.repos_url();
        tracing::debug!(url = %url, "fetching repositories");
        let resp = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|source| AppError::Upstream {
                message: REPOS_FAILED,
                source,
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::UpstreamStatus {
                message: REPOS_FAILED,
                status: axum::http::StatusCode::from_u16(status.as_u16())
                    .unwrap_or(axum::http::StatusCode::BAD_GATEWAY),
            });
        }
        let repos: Vec<GithubRepo> = resp.json().await.map_err(|source| AppError::Upstream {
            message: REPOS_FAILED,
            source,
        })?;
        Ok(summarize(repos, &self.username))
    }
}
