//! Settings validation: identifiers that end up in SQL and lists that must not be empty.

use crate::config::Settings;
use crate::error::ConfigError;
use regex::Regex;
use std::sync::OnceLock;

fn identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z_][a-z0-9_]{0,62}$").expect("static regex"))
}

pub fn validate(settings: &Settings) -> Result<(), ConfigError> {
    if !identifier_re().is_match(&settings.database_schema) {
        return Err(ConfigError::Invalid {
            key: "DATABASE_SCHEMA",
            value: settings.database_schema.clone(),
            reason: "must be a lowercase SQL identifier".into(),
        });
    }
    if settings.tracked_projects.is_empty() {
        return Err(ConfigError::Invalid {
            key: "TRACKED_PROJECTS",
            value: String::new(),
            reason: "at least one project id required".into(),
        });
    }
    if let Some(p) = settings.tracked_projects.iter().find(|p| p.len() > 100) {
        return Err(ConfigError::Invalid {
            key: "TRACKED_PROJECTS",
            value: p.clone(),
            reason: "project ids are at most 100 characters".into(),
        });
    }
    if settings.database_max_connections == 0 {
        return Err(ConfigError::Invalid {
            key: "DATABASE_MAX_CONNECTIONS",
            value: "0".into(),
            reason: "pool needs at least one connection".into(),
        });
    }
    if settings.github_username.is_empty() || settings.github_username.contains('/') {
        return Err(ConfigError::Invalid {
            key: "GITHUB_USERNAME",
            value: settings.github_username.clone(),
            reason: "must be a bare account name".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_defaults() {
        assert!(validate(&Settings::default()).is_ok());
    }

    #[test]
    fn rejects_schema_that_would_need_quoting() {
        let settings = Settings {
            database_schema: "Portfolio; DROP".into(),
            ..Settings::default()
        };
        assert!(matches!(
            validate(&settings),
            Err(ConfigError::Invalid { key: "DATABASE_SCHEMA", .. })
        ));
    }

    #[test]
    fn rejects_empty_project_list() {
        let settings = Settings {
            tracked_projects: Vec::new(),
            ..Settings::default()
        };
        assert!(validate(&settings).is_err());
    }
}
