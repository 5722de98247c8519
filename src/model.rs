//! Entities persisted by every storage backend, and the payloads that create them.

use crate::service::{normalize_email, FieldFormat, FieldRule, Payload};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Opaque; never leaves the server.
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl Payload for NewContact {
    const RULES: &'static [FieldRule] = &[
        FieldRule::text("name").max_length(100),
        FieldRule::text("email").max_length(255).format(FieldFormat::Email),
        FieldRule::text("subject").max_length(255),
        FieldRule::text("message"),
    ];

    fn normalize(self) -> Self {
        NewContact {
            name: self.name.trim().to_string(),
            email: normalize_email(&self.email),
            subject: self.subject.trim().to_string(),
            message: self.message,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogSubscriber {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct NewBlogSubscriber {
    pub email: String,
}

impl Payload for NewBlogSubscriber {
    const RULES: &'static [FieldRule] = &[FieldRule::text("email").max_length(255).format(FieldFormat::Email)];

    fn normalize(self) -> Self {
        NewBlogSubscriber {
            email: normalize_email(&self.email),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub id: i64,
    pub project_id: String,
    pub stars: i32,
    pub forks: i32,
    pub watchers: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Upsert payload keyed by `project_id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProjectStats {
    pub project_id: String,
    pub stars: i32,
    pub forks: i32,
    pub watchers: i32,
}

/// Counters exposed per project by `/api/github-stats`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatCounts {
    pub stars: i32,
    pub forks: i32,
    pub watchers: i32,
}

impl From<&ProjectStats> for StatCounts {
    fn from(s: &ProjectStats) -> Self {
        StatCounts {
            stars: s.stars,
            forks: s.forks,
            watchers: s.watchers,
        }
    }
}

impl From<&NewProjectStats> for StatCounts {
    fn from(s: &NewProjectStats) -> Self {
        StatCounts {
            stars: s.stars,
            forks: s.forks,
            watchers: s.watchers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_password_is_not_serialized() {
        let user = User {
            id: 1,
            username: "ada".into(),
            password: "hunter2".into(),
            created_at: Utc::now(),
        };
        let v = serde_json::to_value(&user).unwrap();
        assert!(v.get("password").is_none());
        assert_eq!(v["username"], "ada");
        assert!(v.get("createdAt").is_some());
    }

    #[test]
    fn project_stats_use_camel_case_keys() {
        let v = serde_json::to_value(NewProjectStats {
            project_id: "p1".into(),
            stars: 5,
            forks: 1,
            watchers: 2,
        })
        .unwrap();
        assert_eq!(v["projectId"], "p1");
    }

    #[test]
    fn subscriber_email_is_trimmed_and_lowercased() {
        let s = NewBlogSubscriber {
            email: "  Ada@Example.COM ".into(),
        }
        .normalize();
        assert_eq!(s.email, "ada@example.com");
    }
}
