//! Typed errors and HTTP mapping.

use crate::response::Failure;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {key}='{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Failures raised by a storage backend. Identical across backends.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{entity} with {field} '{value}' already exists")]
    DuplicateKey {
        entity: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("validation: {0}")]
    Validation(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("stored document does not match entity: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("in-memory store lock poisoned")]
    Poisoned,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Duplicate(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("{message}: {source}")]
    Storage {
        message: &'static str,
        #[source]
        source: StoreError,
    },
    #[error("{message}: {source}")]
    Upstream {
        message: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{message}: upstream answered {status}")]
    UpstreamStatus {
        message: &'static str,
        status: StatusCode,
    },
    #[error("{message}: {source}")]
    Io {
        message: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl AppError {
    /// Wrap a storage failure with the message shown to clients. Duplicate keys and
    /// validation failures keep their own 400 mapping.
    pub fn storage(message: &'static str, source: StoreError) -> Self {
        match source {
            StoreError::Validation(msg) => AppError::Validation(msg),
            other => AppError::Storage { message, source: other },
        }
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::Duplicate(_) => (StatusCode::BAD_REQUEST, "duplicate_key"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large"),
            AppError::Storage { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
            AppError::Upstream { .. } | AppError::UpstreamStatus { .. } => {
                (StatusCode::BAD_GATEWAY, "upstream_error")
            }
            AppError::Io { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    /// Client-facing text. Internal sources are logged, never returned.
    fn public_message(&self) -> String {
        match self {
            AppError::Config(_) => "Server misconfigured".to_string(),
            AppError::Validation(m)
            | AppError::Duplicate(m)
            | AppError::NotFound(m)
            | AppError::PayloadTooLarge(m) => m.clone(),
            AppError::Storage { message, .. }
            | AppError::Upstream { message, .. }
            | AppError::UpstreamStatus { message, .. }
            | AppError::Io { message, .. } => (*message).to_string(),
        }
    }
}

pub trait StoreResultExt<T> {
    /// Attach the client-facing failure message to a storage result.
    fn or_fail(self, message: &'static str) -> Result<T, AppError>;
}

impl<T> StoreResultExt<T> for Result<T, StoreError> {
    fn or_fail(self, message: &'static str) -> Result<T, AppError> {
        self.map_err(|e| AppError::storage(message, e))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code, "request failed");
        } else {
            tracing::debug!(error = %self, code, "request rejected");
        }
        (status, Json(Failure::new(self.public_message(), code))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn storage_failure_hides_source() {
        let err = AppError::storage(
            "Failed to save contact message",
            StoreError::Db(sqlx::Error::PoolTimedOut),
        );
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Failed to save contact message");
        assert!(!body.to_string().contains("pool"));
    }

    #[tokio::test]
    async fn store_validation_maps_to_400() {
        let err = AppError::storage("Failed", StoreError::Validation("username 'ada' already exists".into()));
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["code"], "validation_error");
    }

    #[tokio::test]
    async fn duplicate_is_400_with_its_message() {
        let resp = AppError::Duplicate("Email already subscribed".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "Email already subscribed");
        assert_eq!(body["code"], "duplicate_key");
    }
}
