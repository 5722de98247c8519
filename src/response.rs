//! Standard response envelope helpers.

use crate::model::{BlogSubscriber, Contact};
use axum::{http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

/// `{ success: true, message, ...data }` returned by every mutating handler.
#[derive(Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: &'static str,
    #[serde(flatten)]
    pub data: T,
}

/// `{ success: false, error, code }` returned for every failure.
#[derive(Serialize, ToSchema)]
pub struct Failure {
    pub success: bool,
    pub error: String,
    pub code: String,
}

impl Failure {
    pub fn new(error: impl Into<String>, code: &'static str) -> Self {
        Failure {
            success: false,
            error: error.into(),
            code: code.to_string(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ContactCreated {
    pub contact: Contact,
}

#[derive(Serialize, ToSchema)]
pub struct SubscriberCreated {
    pub subscriber: BlogSubscriber,
}

pub fn success<T: Serialize>(message: &'static str, data: T) -> (StatusCode, Json<Envelope<T>>) {
    (
        StatusCode::OK,
        Json(Envelope {
            success: true,
            message,
            data,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Thing {
        thing: u8,
    }

    #[test]
    fn envelope_flattens_payload_beside_success() {
        let (status, Json(body)) = success("done", Thing { thing: 7 });
        assert_eq!(status, StatusCode::OK);
        let v = serde_json::to_value(body).unwrap();
        assert_eq!(v, serde_json::json!({ "success": true, "message": "done", "thing": 7 }));
    }

    #[test]
    fn failure_shape() {
        let v = serde_json::to_value(Failure::new("nope", "not_found")).unwrap();
        assert_eq!(v, serde_json::json!({ "success": false, "error": "nope", "code": "not_found" }));
    }
}
