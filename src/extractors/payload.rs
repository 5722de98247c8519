//! Extract and validate a JSON request body. Rejections become a 400 failure envelope,
//! or 413 when the body exceeds the configured limit.

use crate::error::AppError;
use crate::service::{Payload, RequestValidator};
use async_trait::async_trait;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

/// Body decoded into `T` after its field rules passed.
#[derive(Clone, Debug)]
pub struct Validated<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: Payload,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| {
                if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    AppError::PayloadTooLarge("Request body too large".into())
                } else {
                    AppError::Validation(rejection.body_text())
                }
            })?;
        Ok(Validated(RequestValidator::parse(body)?))
    }
}
