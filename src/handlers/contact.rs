//! Contact form submissions.

use crate::error::{AppError, StoreResultExt};
use crate::extractors::Validated;
use crate::model::{Contact, NewContact};
use crate::response::{success, ContactCreated, Failure};
use crate::state::AppState;
use axum::extract::State;
use axum::Json;

/// POST /api/contact: store a contact message.
#[utoipa::path(
    post,
    path = "/api/contact",
    request_body = NewContact,
    responses(
        (status = 200, description = "Stored; `{success, message, contact}`", body = ContactCreated),
        (status = 400, description = "Missing or malformed field", body = Failure),
        (status = 500, description = "Storage failure", body = Failure)
    ),
    tag = "contact"
)]
pub async fn create_contact(
    State(state): State<AppState>,
    Validated(input): Validated<NewContact>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let contact = state
        .store
        .create_contact(input)
        .await
        .or_fail("Failed to save contact message")?;
    tracing::info!(id = contact.id, "contact message stored");
    Ok(success("Message sent successfully!", ContactCreated { contact }))
}

/// GET /api/contacts: every message, newest first.
#[utoipa::path(
    get,
    path = "/api/contacts",
    responses(
        (status = 200, description = "Contacts, newest first", body = [Contact]),
        (status = 500, description = "Storage failure", body = Failure)
    ),
    tag = "contact"
)]
pub async fn list_contacts(State(state): State<AppState>) -> Result<Json<Vec<Contact>>, AppError> {
    let contacts = state.store.get_contacts().await.or_fail("Failed to fetch contacts")?;
    Ok(Json(contacts))
}
