//! Document backend: each entity lives in a collection of schemaless JSONB documents.
//! Uniqueness is a unique expression index on the keyed document field; ids and
//! timestamps are kept beside the document and merged back in when hydrating.

use crate::error::StoreError;
use crate::model::{
    BlogSubscriber, Contact, NewBlogSubscriber, NewContact, NewProjectStats, NewUser, ProjectStats, User,
};
use crate::store::postgres::{ensure_schema, is_unique_violation, ping, qualified, quote_ident};
use crate::store::{email_taken, username_taken, BackendKind, Storage};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;

type DocRow = (i64, Value, DateTime<Utc>, DateTime<Utc>);

const RETURNING: &str = "RETURNING id, doc, created_at, updated_at";

/// A named JSONB collection, optionally unique on one top-level document field.
struct Collection {
    table: String,
    index: String,
    unique_field: Option<&'static str>,
}

impl Collection {
    fn new(schema: &str, name: &str, unique_field: Option<&'static str>) -> Self {
        Collection {
            table: qualified(schema, name),
            index: quote_ident(&format!("{}_unique_key", name)),
            unique_field,
        }
    }

    /// `(doc->>'field')`, the expression both the unique index and conflict target use.
    fn key_expr(field: &str) -> String {
        format!("(doc->>'{}')", field)
    }

    async fn ensure(&self, pool: &PgPool) -> Result<(), StoreError> {
        let ddl = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id BIGSERIAL PRIMARY KEY,
                doc JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            self.table
        );
        sqlx::query(&ddl).execute(pool).await?;
        if let Some(field) = self.unique_field {
            let sql = format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS {} ON {} ({})",
                self.index,
                self.table,
                Self::key_expr(field)
            );
            sqlx::query(&sql).execute(pool).await?;
        }
        Ok(())
    }

    async fn insert<T: Serialize + Sync>(&self, pool: &PgPool, doc: &T) -> Result<DocRow, sqlx::Error> {
        let sql = format!("INSERT INTO {} (doc) VALUES ($1) {}", self.table, RETURNING);
        sqlx::query_as(&sql).bind(sqlx::types::Json(doc)).fetch_one(pool).await
    }

    async fn find_by_id(&self, pool: &PgPool, id: i64) -> Result<Option<DocRow>, StoreError> {
        let sql = format!("SELECT id, doc, created_at, updated_at FROM {} WHERE id = $1", self.table);
        Ok(sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?)
    }

    async fn find_one(&self, pool: &PgPool, field: &str, value: &str) -> Result<Option<DocRow>, StoreError> {
        let sql = format!(
            "SELECT id, doc, created_at, updated_at FROM {} WHERE {} = $1",
            self.table,
            Self::key_expr(field)
        );
        Ok(sqlx::query_as(&sql).bind(value).fetch_optional(pool).await?)
    }

    async fn find_all(&self, pool: &PgPool, order_by: &str) -> Result<Vec<DocRow>, StoreError> {
        let sql = format!(
            "SELECT id, doc, created_at, updated_at FROM {} ORDER BY {}",
            self.table, order_by
        );
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as(&sql).fetch_all(pool).await?)
    }

    /// Replace the document keyed by the collection's unique field, inserting when absent.
    async fn upsert<T: Serialize + Sync>(&self, pool: &PgPool, doc: &T) -> Result<DocRow, StoreError> {
        let field = self
            .unique_field
            .ok_or_else(|| StoreError::Validation(format!("collection {} has no unique key", self.table)))?;
        let sql = format!(
            r#"
            INSERT INTO {table} (doc) VALUES ($1)
            ON CONFLICT ({key})
            DO UPDATE SET doc = EXCLUDED.doc, updated_at = NOW()
            {returning}
            "#,
            table = self.table,
            key = Self::key_expr(field),
            returning = RETURNING
        );
        Ok(sqlx::query_as(&sql).bind(sqlx::types::Json(doc)).fetch_one(pool).await?)
    }
}

/// Merge the row's id and timestamps into its document and decode the entity.
fn hydrate<T: DeserializeOwned>(row: DocRow) -> Result<T, StoreError> {
    let (id, mut doc, created_at, updated_at) = row;
    if let Value::Object(map) = &mut doc {
        map.insert("id".into(), Value::from(id));
        map.insert("createdAt".into(), serde_json::to_value(created_at)?);
        map.insert("updatedAt".into(), serde_json::to_value(updated_at)?);
    }
    Ok(serde_json::from_value(doc)?)
}

fn hydrate_all<T: DeserializeOwned>(rows: Vec<DocRow>) -> Result<Vec<T>, StoreError> {
    rows.into_iter().map(hydrate).collect()
}

const NEWEST_FIRST: &str = "created_at DESC, id DESC";

pub struct DocumentStore {
    pool: PgPool,
    users: Collection,
    contacts: Collection,
    subscribers: Collection,
    stats: Collection,
}

impl DocumentStore {
    /// Create schema, collections and unique indexes if missing. Idempotent.
    pub async fn open(pool: PgPool, schema: String) -> Result<Self, StoreError> {
        ensure_schema(&pool, &schema).await?;
        let store = DocumentStore {
            users: Collection::new(&schema, "doc_users", Some("username")),
            contacts: Collection::new(&schema, "doc_contacts", None),
            subscribers: Collection::new(&schema, "doc_blog_subscribers", Some("email")),
            stats: Collection::new(&schema, "doc_project_stats", Some("projectId")),
            pool,
        };
        for c in [&store.users, &store.contacts, &store.subscribers, &store.stats] {
            c.ensure(&store.pool).await?;
        }
        Ok(store)
    }
}

#[async_trait]
impl Storage for DocumentStore {
    fn backend(&self) -> BackendKind {
        BackendKind::Document
    }

    async fn ping(&self) -> Result<(), StoreError> {
        ping(&self.pool).await
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        self.users.find_by_id(&self.pool, id).await?.map(hydrate).transpose()
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.users
            .find_one(&self.pool, "username", username)
            .await?
            .map(hydrate)
            .transpose()
    }

    async fn create_user(&self, data: NewUser) -> Result<User, StoreError> {
        match self.users.insert(&self.pool, &data).await {
            Ok(row) => hydrate(row),
            Err(e) if is_unique_violation(&e) => Err(username_taken(&data.username)),
            Err(e) => Err(StoreError::Db(e)),
        }
    }

    async fn create_contact(&self, data: NewContact) -> Result<Contact, StoreError> {
        hydrate(self.contacts.insert(&self.pool, &data).await?)
    }

    async fn get_contacts(&self) -> Result<Vec<Contact>, StoreError> {
        hydrate_all(self.contacts.find_all(&self.pool, NEWEST_FIRST).await?)
    }

    async fn create_blog_subscriber(&self, data: NewBlogSubscriber) -> Result<BlogSubscriber, StoreError> {
        match self.subscribers.insert(&self.pool, &data).await {
            Ok(row) => hydrate(row),
            Err(e) if is_unique_violation(&e) => Err(email_taken(&data.email)),
            Err(e) => Err(StoreError::Db(e)),
        }
    }

    async fn get_blog_subscribers(&self) -> Result<Vec<BlogSubscriber>, StoreError> {
        hydrate_all(self.subscribers.find_all(&self.pool, NEWEST_FIRST).await?)
    }

    async fn get_project_stats(&self, project_id: &str) -> Result<Option<ProjectStats>, StoreError> {
        self.stats
            .find_one(&self.pool, "projectId", project_id)
            .await?
            .map(hydrate)
            .transpose()
    }

    async fn update_project_stats(&self, data: NewProjectStats) -> Result<ProjectStats, StoreError> {
        hydrate(self.stats.upsert(&self.pool, &data).await?)
    }

    async fn get_all_project_stats(&self) -> Result<Vec<ProjectStats>, StoreError> {
        hydrate_all(self.stats.find_all(&self.pool, "(doc->>'projectId') COLLATE \"C\"").await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hydrate_merges_row_metadata_into_document() {
        let now = Utc::now();
        let row: DocRow = (
            7,
            json!({ "name": "Ada", "email": "ada@example.com", "subject": "Hi", "message": "Hello" }),
            now,
            now,
        );
        let contact: Contact = hydrate(row).unwrap();
        assert_eq!(contact.id, 7);
        assert_eq!(contact.name, "Ada");
        assert_eq!(contact.created_at, now);
    }

    #[test]
    fn hydrate_reports_shape_mismatch() {
        let now = Utc::now();
        let row: DocRow = (1, json!({ "projectId": "p1" }), now, now);
        assert!(matches!(hydrate::<ProjectStats>(row), Err(StoreError::Decode(_))));
    }

    #[test]
    fn unique_key_expression_matches_index() {
        assert_eq!(Collection::key_expr("email"), "(doc->>'email')");
        let c = Collection::new("portfolio", "doc_blog_subscribers", Some("email"));
        assert_eq!(c.table, "\"portfolio\".\"doc_blog_subscribers\"");
        assert_eq!(c.index, "\"doc_blog_subscribers_unique_key\"");
    }
}
