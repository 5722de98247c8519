//! Load settings from process environment (after `.env`) or from any key lookup.

use crate::config::types::{Environment, Settings};
use crate::config::validate;
use crate::error::ConfigError;
use crate::store::BackendKind;
use std::path::PathBuf;
use std::str::FromStr;

impl Settings {
    /// Read settings from the process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from a key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut settings = Settings::default();

        settings.database_url = get("DATABASE_URL");
        if let Some(v) = get("STORAGE_BACKEND") {
            settings.storage_backend = BackendKind::from_str(&v).map_err(|_| ConfigError::Invalid {
                key: "STORAGE_BACKEND",
                value: v.clone(),
                reason: "expected relational, document or memory".into(),
            })?;
        }
        if let Some(v) = get("DATABASE_SCHEMA") {
            settings.database_schema = v;
        }
        if let Some(v) = get("DATABASE_MAX_CONNECTIONS") {
            settings.database_max_connections = parse_number("DATABASE_MAX_CONNECTIONS", &v)?;
        }
        if let Some(v) = get("DATABASE_CONNECT_TIMEOUT_SECS") {
            settings.database_connect_timeout_secs = parse_number("DATABASE_CONNECT_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = get("HOST") {
            settings.host = v;
        }
        if let Some(v) = get("PORT") {
            settings.port = parse_number("PORT", &v)?;
        }
        if let Some(v) = get("APP_ENV") {
            settings.environment = Environment::from_str(&v)?;
        }
        if let Some(v) = get("STATIC_DIR") {
            settings.static_dir = PathBuf::from(v);
        }
        if let Some(v) = get("RESUME_PATH") {
            settings.resume_path = PathBuf::from(v);
        }
        if let Some(v) = get("RESUME_FILENAME") {
            settings.resume_filename = v;
        }
        if let Some(v) = get("GITHUB_USERNAME") {
            settings.github_username = v;
        }
        if let Some(v) = get("GITHUB_API_URL") {
            settings.github_api_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = get("TRACKED_PROJECTS") {
            settings.tracked_projects = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(v) = get("REQUEST_BODY_LIMIT") {
            settings.request_body_limit = parse_number("REQUEST_BODY_LIMIT", &v)?;
        }

        validate(&settings)?;
        Ok(settings)
    }
}

fn parse_number<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: "expected a non-negative integer".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let env: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn defaults_select_volatile_store_on_port_5000() {
        let s = settings_from(&[]).unwrap();
        assert!(s.database_url.is_none());
        assert_eq!(s.port, 5000);
        assert_eq!(s.environment, Environment::Development);
        assert_eq!(s.tracked_projects.len(), 3);
        assert_eq!(s.bind_address(), "0.0.0.0:5000");
    }

    #[test]
    fn reads_overrides() {
        let s = settings_from(&[
            ("DATABASE_URL", "postgres://localhost/folio"),
            ("STORAGE_BACKEND", "document"),
            ("PORT", "8080"),
            ("APP_ENV", "production"),
            ("GITHUB_API_URL", "http://localhost:9000/"),
            ("TRACKED_PROJECTS", " alpha, ,beta "),
        ])
        .unwrap();
        assert_eq!(s.database_url.as_deref(), Some("postgres://localhost/folio"));
        assert_eq!(s.storage_backend, BackendKind::Document);
        assert_eq!(s.port, 8080);
        assert_eq!(s.environment, Environment::Production);
        assert_eq!(s.github_api_url, "http://localhost:9000");
        assert_eq!(s.tracked_projects, vec!["alpha".to_string(), "beta".to_string()]);
    }

    #[test]
    fn blank_database_url_counts_as_unset() {
        let s = settings_from(&[("DATABASE_URL", "   ")]).unwrap();
        assert!(s.database_url.is_none());
    }

    #[test]
    fn rejects_bad_port() {
        let err = settings_from(&[("PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }

    #[test]
    fn rejects_unknown_backend() {
        let err = settings_from(&[("STORAGE_BACKEND", "mongo")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "STORAGE_BACKEND", .. }));
    }
}
