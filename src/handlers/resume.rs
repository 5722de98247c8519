//! Resume download.

use crate::error::AppError;
use crate::response::Failure;
use crate::state::AppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use std::io::ErrorKind;
use tokio_util::io::ReaderStream;

const NOT_FOUND: &str = "Resume file not found";
const DOWNLOAD_FAILED: &str = "Failed to download resume";

/// GET /api/resume: stream the resume PDF as an attachment.
#[utoipa::path(
    get,
    path = "/api/resume",
    responses(
        (status = 200, description = "The resume as an `application/pdf` attachment"),
        (status = 404, description = "No resume file on disk", body = Failure)
    ),
    tag = "resume"
)]
pub async fn download_resume(State(state): State<AppState>) -> Result<Response, AppError> {
    let path = &state.settings.resume_path;
    let file = match tokio::fs::File::open(path).await {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(AppError::NotFound(NOT_FOUND.into())),
        Err(source) => {
            return Err(AppError::Io {
                message: DOWNLOAD_FAILED,
                source,
            })
        }
    };
    let meta = file.metadata().await.map_err(|source| AppError::Io {
        message: DOWNLOAD_FAILED,
        source,
    })?;
    if !meta.is_file() {
        return Err(AppError::NotFound(NOT_FOUND.into()));
    }

    let disposition = format!(
        "attachment; filename=\"{}\"",
        state.settings.resume_filename.replace(['"', '\\'], "")
    );
    let headers = [
        (CONTENT_TYPE, "application/pdf".to_string()),
        (CONTENT_DISPOSITION, disposition),
        (CONTENT_LENGTH, meta.len().to_string()),
    ];
    tracing::debug!(path = %path.display(), bytes = meta.len(), "streaming resume");
    Ok((headers, Body::from_stream(ReaderStream::new(file))).into_response())
}
