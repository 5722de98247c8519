//! Blog newsletter subscriptions.

use crate::error::{AppError, StoreError, StoreResultExt};
use crate::extractors::Validated;
use crate::model::{BlogSubscriber, NewBlogSubscriber};
use crate::response::{success, Failure, SubscriberCreated};
use crate::state::AppState;
use axum::extract::State;
use axum::Json;

/// POST /api/blog-subscribe: subscribe an e-mail once.
#[utoipa::path(
    post,
    path = "/api/blog-subscribe",
    request_body = NewBlogSubscriber,
    responses(
        (status = 200, description = "Subscribed; `{success, message, subscriber}`", body = SubscriberCreated),
        (status = 400, description = "Invalid e-mail, or already subscribed", body = Failure),
        (status = 500, description = "Storage failure", body = Failure)
    ),
    tag = "newsletter"
)]
pub async fn subscribe(
    State(state): State<AppState>,
    Validated(input): Validated<NewBlogSubscriber>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let subscriber = match state.store.create_blog_subscriber(input).await {
        Ok(s) => s,
        Err(StoreError::DuplicateKey { .. }) => {
            return Err(AppError::Duplicate("Email already subscribed".into()));
        }
        Err(e) => return Err(AppError::storage("Failed to subscribe to blog updates", e)),
    };
    tracing::info!(id = subscriber.id, "blog subscriber added");
    Ok(success(
        "Successfully subscribed to blog updates!",
        SubscriberCreated { subscriber },
    ))
}

/// GET /api/blog-subscribers: every subscriber, newest first.
#[utoipa::path(
    get,
    path = "/api/blog-subscribers",
    responses(
        (status = 200, description = "Subscribers, newest first", body = [BlogSubscriber]),
        (status = 500, description = "Storage failure", body = Failure)
    ),
    tag = "newsletter"
)]
pub async fn list_subscribers(State(state): State<AppState>) -> Result<Json<Vec<BlogSubscriber>>, AppError> {
    let subscribers = state
        .store
        .get_blog_subscribers()
        .await
        .or_fail("Failed to fetch blog subscribers")?;
    Ok(Json(subscribers))
}
