//! Router assembly: common routes, the `/api` surface, static assets in production,
//! and the tower-http layers around all of it.

pub mod api;
pub mod common;

pub use api::api_routes;
pub use common::common_routes;

use crate::config::{Environment, Settings};
use crate::response::Failure;
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use std::any::Any;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %detail, "handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(Failure::new("Internal Server Error", "internal_error")),
    )
        .into_response()
}

/// The full application router.
pub fn app(state: AppState) -> Router {
    let settings = state.settings.clone();
    let router = Router::new()
        .merge(common_routes(state.clone()))
        .nest("/api", api_routes(state));

    let router = match settings.environment {
        Environment::Production => {
            let index = settings.static_dir.join("index.html");
            tracing::info!(dir = %settings.static_dir.display(), "serving static assets");
            router.fallback_service(ServeDir::new(&settings.static_dir).fallback(ServeFile::new(index)))
        }
        Environment::Development => {
            tracing::info!("development mode: static assets are served by the front-end dev server");
            router
        }
    };

    with_layers(router, &settings)
}

/// Tracing, CORS, panic recovery and the JSON body limit. Oversized bodies are rejected
/// by the `Json` extractor so they get the failure envelope.
pub fn with_layers(router: Router, settings: &Settings) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(DefaultBodyLimit::max(settings.request_body_limit)),
    )
}
