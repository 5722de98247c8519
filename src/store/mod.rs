//! Storage provider: one contract, three interchangeable backends, chosen once at startup.

pub mod document;
pub mod memory;
pub mod postgres;
pub mod relational;

use crate::config::Settings;
use crate::error::StoreError;
use crate::model::{
    BlogSubscriber, Contact, NewBlogSubscriber, NewContact, NewProjectStats, NewUser, ProjectStats, User,
};
use async_trait::async_trait;
use std::sync::Arc;

pub use document::DocumentStore;
pub use memory::MemoryStore;
pub use relational::RelationalStore;

/// Which backend serves the `Storage` contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    /// Process memory only; lost on restart.
    Memory,
    /// JSONB document collections with unique expression indexes.
    Document,
    /// Typed tables with unique constraints.
    Relational,
}

impl std::str::FromStr for BackendKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(BackendKind::Memory),
            "document" => Ok(BackendKind::Document),
            "relational" => Ok(BackendKind::Relational),
            _ => Err(StoreError::Validation(format!(
                "invalid storage backend: {} (expected memory, document or relational)",
                s
            ))),
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            BackendKind::Memory => "memory",
            BackendKind::Document => "document",
            BackendKind::Relational => "relational",
        })
    }
}

/// Data-access contract shared by every backend. Nothing is ever deleted.
#[async_trait]
pub trait Storage: Send + Sync {
    fn backend(&self) -> BackendKind;

    /// Cheap liveness probe.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    /// Fails with `StoreError::Validation` when the username is taken.
    async fn create_user(&self, data: NewUser) -> Result<User, StoreError>;

    async fn create_contact(&self, data: NewContact) -> Result<Contact, StoreError>;
    /// Newest first.
    async fn get_contacts(&self) -> Result<Vec<Contact>, StoreError>;

    /// Fails with `StoreError::DuplicateKey` when the email is already subscribed.
    async fn create_blog_subscriber(&self, data: NewBlogSubscriber) -> Result<BlogSubscriber, StoreError>;
    /// Newest first.
    async fn get_blog_subscribers(&self) -> Result<Vec<BlogSubscriber>, StoreError>;

    async fn get_project_stats(&self, project_id: &str) -> Result<Option<ProjectStats>, StoreError>;
    /// Upsert by `project_id`: creates when absent, otherwise overwrites the counters and refreshes `updated_at`.
    async fn update_project_stats(&self, data: NewProjectStats) -> Result<ProjectStats, StoreError>;
    /// Ordered by `project_id`.
    async fn get_all_project_stats(&self) -> Result<Vec<ProjectStats>, StoreError>;
}

pub type SharedStore = Arc<dyn Storage>;

pub(crate) fn username_taken(username: &str) -> StoreError {
    StoreError::Validation(format!("username '{}' already exists", username))
}

pub(crate) fn email_taken(email: &str) -> StoreError {
    StoreError::DuplicateKey {
        entity: "blog subscriber",
        field: "email",
        value: email.to_string(),
    }
}

/// Pick the backend for this process. A configured durable backend that cannot be reached
/// falls back to the volatile store; the choice is logged either way.
pub async fn connect(settings: &Settings) -> SharedStore {
    let requested = settings.storage_backend;
    let url = match (&settings.database_url, requested) {
        (_, BackendKind::Memory) => {
            tracing::info!("STORAGE_BACKEND=memory, using in-memory storage");
            return Arc::new(MemoryStore::new());
        }
        (None, _) => {
            tracing::info!("DATABASE_URL not set, using in-memory storage");
            return Arc::new(MemoryStore::new());
        }
        (Some(url), _) => url,
    };

    match open_durable(url, requested, settings).await {
        Ok(store) => {
            tracing::info!(backend = %requested, schema = %settings.database_schema, "using durable storage");
            store
        }
        Err(e) => {
            tracing::warn!(backend = %requested, error = %e, "durable storage unavailable, falling back to in-memory storage");
            Arc::new(MemoryStore::new())
        }
    }
}

async fn open_durable(url: &str, kind: BackendKind, settings: &Settings) -> Result<SharedStore, StoreError> {
    let pool = postgres::connect_pool(url, settings).await?;
    let schema = settings.database_schema.clone();
    Ok(match kind {
        BackendKind::Document => Arc::new(DocumentStore::open(pool, schema).await?),
        _ => Arc::new(RelationalStore::open(pool, schema).await?),
    })
}
