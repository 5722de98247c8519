//! Relational backend: one typed table per entity, uniqueness by constraint,
//! upsert by `INSERT ... ON CONFLICT (project_id) DO UPDATE`.

use crate::error::StoreError;
use crate::model::{
    BlogSubscriber, Contact, NewBlogSubscriber, NewContact, NewProjectStats, NewUser, ProjectStats, User,
};
use crate::store::postgres::{ensure_schema, is_unique_violation, ping, qualified};
use crate::store::{email_taken, username_taken, BackendKind, Storage};
use async_trait::async_trait;
use sqlx::PgPool;

pub struct RelationalStore {
    pool: PgPool,
    users: String,
    contacts: String,
    subscribers: String,
    stats: String,
}

impl RelationalStore {
    /// Create schema and tables if missing. Idempotent.
    pub async fn open(pool: PgPool, schema: String) -> Result<Self, StoreError> {
        ensure_schema(&pool, &schema).await?;
        let store = RelationalStore {
            users: qualified(&schema, "users"),
            contacts: qualified(&schema, "contacts"),
            subscribers: qualified(&schema, "blog_subscribers"),
            stats: qualified(&schema, "project_stats"),
            pool,
        };
        store.ensure_tables().await?;
        Ok(store)
    }

    async fn ensure_tables(&self) -> Result<(), StoreError> {
        let ddl = [
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {} (
                    id BIGSERIAL PRIMARY KEY,
                    username TEXT NOT NULL UNIQUE,
                    password TEXT NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
                "#,
                self.users
            ),
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {} (
                    id BIGSERIAL PRIMARY KEY,
                    name VARCHAR(100) NOT NULL,
                    email VARCHAR(255) NOT NULL,
                    subject VARCHAR(255) NOT NULL,
                    message TEXT NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
                "#,
                self.contacts
            ),
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {} (
                    id BIGSERIAL PRIMARY KEY,
                    email VARCHAR(255) NOT NULL UNIQUE,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
                "#,
                self.subscribers
            ),
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {} (
                    id BIGSERIAL PRIMARY KEY,
                    project_id VARCHAR(100) NOT NULL UNIQUE,
                    stars INTEGER NOT NULL DEFAULT 0,
                    forks INTEGER NOT NULL DEFAULT 0,
                    watchers INTEGER NOT NULL DEFAULT 0,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
                "#,
                self.stats
            ),
        ];
        for sql in &ddl {
            sqlx::query(sql).execute(&self.pool).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for RelationalStore {
    fn backend(&self) -> BackendKind {
        BackendKind::Relational
    }

    async fn ping(&self) -> Result<(), StoreError> {
        ping(&self.pool).await
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT id, username, password, created_at FROM {} WHERE id = $1", self.users);
        Ok(sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let sql = format!(
            "SELECT id, username, password, created_at FROM {} WHERE username = $1",
            self.users
        );
        Ok(sqlx::query_as(&sql).bind(username).fetch_optional(&self.pool).await?)
    }

    async fn create_user(&self, data: NewUser) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO {} (username, password) VALUES ($1, $2) RETURNING id, username, password, created_at",
            self.users
        );
        sqlx::query_as(&sql)
            .bind(&data.username)
            .bind(&data.password)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    username_taken(&data.username)
                } else {
                    StoreError::Db(e)
                }
            })
    }

    async fn create_contact(&self, data: NewContact) -> Result<Contact, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO {} (name, email, subject, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, subject, message, created_at
            "#,
            self.contacts
        );
        Ok(sqlx::query_as(&sql)
            .bind(&data.name)
            .bind(&data.email)
            .bind(&data.subject)
            .bind(&data.message)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn get_contacts(&self) -> Result<Vec<Contact>, StoreError> {
        let sql = format!(
            "SELECT id, name, email, subject, message, created_at FROM {} ORDER BY created_at DESC, id DESC",
            self.contacts
        );
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as(&sql).fetch_all(&self.pool).await?)
    }

    async fn create_blog_subscriber(&self, data: NewBlogSubscriber) -> Result<BlogSubscriber, StoreError> {
        let sql = format!(
            "INSERT INTO {} (email) VALUES ($1) RETURNING id, email, created_at",
            self.subscribers
        );
        sqlx::query_as(&sql)
            .bind(&data.email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    email_taken(&data.email)
                } else {
                    StoreError::Db(e)
                }
            })
    }

    async fn get_blog_subscribers(&self) -> Result<Vec<BlogSubscriber>, StoreError> {
        let sql = format!(
            "SELECT id, email, created_at FROM {} ORDER BY created_at DESC, id DESC",
            self.subscribers
        );
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as(&sql).fetch_all(&self.pool).await?)
    }

    async fn get_project_stats(&self, project_id: &str) -> Result<Option<ProjectStats>, StoreError> {
        let sql = format!(
            "SELECT id, project_id, stars, forks, watchers, created_at, updated_at FROM {} WHERE project_id = $1",
            self.stats
        );
        Ok(sqlx::query_as(&sql).bind(project_id).fetch_optional(&self.pool).await?)
    }

    async fn update_project_stats(&self, data: NewProjectStats) -> Result<ProjectStats, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO {} (project_id, stars, forks, watchers)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (project_id)
            DO UPDATE SET stars = EXCLUDED.stars, forks = EXCLUDED.forks,
                          watchers = EXCLUDED.watchers, updated_at = NOW()
            RETURNING id, project_id, stars, forks, watchers, created_at, updated_at
            "#,
            self.stats
        );
        tracing::debug!(project_id = %data.project_id, "upsert project stats");
        Ok(sqlx::query_as(&sql)
            .bind(&data.project_id)
            .bind(data.stars)
            .bind(data.forks)
            .bind(data.watchers)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn get_all_project_stats(&self) -> Result<Vec<ProjectStats>, StoreError> {
        let sql = format!(
            "SELECT id, project_id, stars, forks, watchers, created_at, updated_at FROM {} ORDER BY project_id COLLATE \"C\"",
            self.stats
        );
        Ok(sqlx::query_as(&sql).fetch_all(&self.pool).await?)
    }
}
