//! Runtime settings for the portfolio server.

use crate::error::ConfigError;
use crate::store::BackendKind;
use std::path::PathBuf;

/// Deployment flavour. Production serves the built front-end from `static_dir`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl std::str::FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ConfigError::Invalid {
                key: "APP_ENV",
                value: other.to_string(),
                reason: "expected development or production".into(),
            }),
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Environment::Development => "development",
            Environment::Production => "production",
        })
    }
}

/// Everything the server reads from its environment, resolved once at startup.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Durable backend connection string. None selects the volatile store.
    pub database_url: Option<String>,
    pub storage_backend: BackendKind,
    /// PostgreSQL schema holding every table of both durable backends.
    pub database_schema: String,
    pub database_max_connections: u32,
    pub database_connect_timeout_secs: u64,
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub static_dir: PathBuf,
    pub resume_path: PathBuf,
    pub resume_filename: String,
    pub github_username: String,
    pub github_api_url: String,
    /// Project ids served by `/api/github-stats`. The response map is keyed and sorted by id.
    pub tracked_projects: Vec<String>,
    pub request_body_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: None,
            storage_backend: BackendKind::Relational,
            database_schema: "portfolio".into(),
            database_max_connections: 5,
            database_connect_timeout_secs: 5,
            host: "0.0.0.0".into(),
            port: 5000,
            environment: Environment::Development,
            static_dir: PathBuf::from("dist/public"),
            resume_path: PathBuf::from("attached_assets/resume.pdf"),
            resume_filename: "resume.pdf".into(),
            github_username: "octocat".into(),
            github_api_url: "https://api.github.com".into(),
            tracked_projects: DEFAULT_TRACKED_PROJECTS.iter().map(|s| s.to_string()).collect(),
            request_body_limit: 64 * 1024,
        }
    }
}

pub const DEFAULT_TRACKED_PROJECTS: &[&str] = &[
    "reservation-system",
    "music-webapp",
    "face-recognition-attendance",
];

impl Settings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
