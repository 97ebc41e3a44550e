//! HTTP handlers for the roast API.
//!
//! One handler per submission flow. Both flows validate their precondition
//! before touching the rasterizer or the model client, so an empty paste or
//! a missing file never costs an upstream call.

use super::types::*;
use super::AppState;
use crate::error::RoastError;
use crate::pdf::{encode_png, render_first_page};
use axum::{
    extract::{Multipart, State},
    Json,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        app: "resume-roaster",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Text roast: one model call with the fixed text instruction.
pub async fn roast_text(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TextRoastRequest>,
) -> Result<Json<TextRoastResponse>, RoastError> {
    if request.text.trim().is_empty() {
        return Err(RoastError::InvalidInput(
            "Paste something first!".to_string(),
        ));
    }

    let start = Instant::now();
    let roast = state.client.roast_text(&request.text).await?;

    let id = uuid::Uuid::new_v4().to_string();
    info!(
        id = %id,
        chars = request.text.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "text roast complete"
    );

    Ok(Json(TextRoastResponse {
        id,
        roast,
        model: state.client.model_name().to_string(),
        created_at: chrono::Utc::now().to_rfc3339(),
    }))
}

/// PDF roast: rasterize page 1, then one model call with the fixed visual
/// instruction. The rendered page is echoed back so the UI can show the
/// image and the critique side by side.
pub async fn roast_pdf(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<PdfRoastResponse>, RoastError> {
    let mut file_data: Option<(String, Vec<u8>)> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();
        if name == "file" {
            let filename = field.file_name().unwrap_or("unknown").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| RoastError::InvalidInput(format!("Failed to read file: {}", e)))?;
            file_data = Some((filename, data.to_vec()));
            break;
        }
    }

    let (filename, data) = file_data.ok_or_else(|| {
        RoastError::InvalidInput("Please upload a PDF file first!".to_string())
    })?;

    let extension = filename.rsplit('.').next().unwrap_or("");
    if !extension.eq_ignore_ascii_case("pdf") {
        return Err(RoastError::InvalidInput(format!(
            "Unsupported file type: .{} (only PDF is accepted)",
            extension
        )));
    }

    let start = Instant::now();

    // The upload is consumed here; nothing outlives the render.
    let page = render_first_page(data, state.config.pdf.max_render_pixels).await?;
    let image = encode_png(&page.image)?;

    let roast = state.client.roast_image(image.clone()).await?;

    let id = uuid::Uuid::new_v4().to_string();
    info!(
        id = %id,
        filename = %filename,
        pages = page.page_count,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "pdf roast complete"
    );

    Ok(Json(PdfRoastResponse {
        id,
        roast,
        model: state.client.model_name().to_string(),
        page_count: page.page_count,
        image,
        created_at: chrono::Utc::now().to_rfc3339(),
    }))
}
