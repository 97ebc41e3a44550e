//! HTTP API and embedded web page.
//!
//! Endpoints:
//! - GET /health - Health check
//! - POST /api/roast/text - Roast pasted resume text
//! - POST /api/roast/pdf - Roast the first page of an uploaded PDF
//! - Fallback - Embedded single-page UI

mod handlers;
mod types;

use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use rust_embed::Embed;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::model::RoastClient;

pub use types::*;

#[derive(Embed)]
#[folder = "static/"]
struct StaticAssets;

/// Application state shared across handlers.
///
/// Immutable after startup: the config and the constructed client. Each
/// request reads from it; nothing writes, so no locking is needed.
pub struct AppState {
    pub config: Config,
    pub client: RoastClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let client = RoastClient::new(&config);
        Self { config, client }
    }
}

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/roast/text", post(handlers::roast_text))
        .route("/api/roast/pdf", post(handlers::roast_pdf))
        .with_state(Arc::new(state))
        .fallback(static_handler)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Serve embedded static files
async fn static_handler(uri: axum::http::Uri) -> impl IntoResponse {
    let path = uri.path().trim_start_matches('/');
    let path = if path.is_empty() { "index.html" } else { path };

    match StaticAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path)
                .first_or_octet_stream()
                .to_string();
            ([(header::CONTENT_TYPE, mime)], content.data.into_owned()).into_response()
        }
        None => match StaticAssets::get("index.html") {
            Some(content) => (
                [(header::CONTENT_TYPE, "text/html".to_string())],
                content.data.into_owned(),
            )
                .into_response(),
            None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
        },
    }
}
