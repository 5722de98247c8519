//! Portfolio API: contact form, newsletter, project stats and resume download over a
//! pluggable storage backend (memory, document, relational).

pub mod case;
pub mod config;
pub mod error;
pub mod extractors;
pub mod github;
pub mod handlers;
pub mod model;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::{Environment, Settings};
pub use error::{AppError, ConfigError, StoreError};
pub use routes::{api_routes, app, common_routes};
pub use state::AppState;
pub use store::{connect, BackendKind, DocumentStore, MemoryStore, RelationalStore, SharedStore, Storage};
