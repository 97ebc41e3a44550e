//! PDF rasterization: first page of uploaded bytes → in-memory image → PNG.
//!
//! pdfium wraps a C++ library with thread-local state that must not run on
//! async worker threads, so rendering happens inside
//! `tokio::task::spawn_blocking`. Only page index 0 is rendered; the rest of
//! the document is opened solely to report its page count. The longest edge
//! of the render is capped so an oversized page cannot exhaust memory.

use crate::error::RoastError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;
use pdfium_render::prelude::*;
use serde::Serialize;
use std::io::Cursor;
use tracing::debug;

/// First page of an uploaded PDF, rendered.
pub struct RenderedPage {
    pub image: DynamicImage,
    /// Total pages in the document. Pages past index 0 are never rendered.
    pub page_count: usize,
}

/// A rendered page encoded as base64 PNG, ready for the model call and for
/// echoing back to the UI.
#[derive(Debug, Clone, Serialize)]
pub struct EncodedImage {
    pub data: String,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
}

/// Rasterize the first page of a PDF held in memory.
pub async fn render_first_page(
    bytes: Vec<u8>,
    max_pixels: u32,
) -> Result<RenderedPage, RoastError> {
    tokio::task::spawn_blocking(move || render_first_page_blocking(&bytes, max_pixels))
        .await
        .map_err(|e| RoastError::Internal(format!("Render task panicked: {}", e)))?
}

/// Blocking implementation of first-page rendering.
fn render_first_page_blocking(bytes: &[u8], max_pixels: u32) -> Result<RenderedPage, RoastError> {
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| RoastError::PdfiumUnavailable(format!("{:?}", e)))?;
    let pdfium = Pdfium::new(bindings);

    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(|e| RoastError::RasterizationFailed(format!("{:?}", e)))?;

    let pages = document.pages();
    let page_count = pages.len() as usize;
    if page_count == 0 {
        return Err(RoastError::EmptyDocument);
    }

    let page = pages
        .get(0)
        .map_err(|e| RoastError::RasterizationFailed(format!("{:?}", e)))?;

    let render_config = PdfRenderConfig::new()
        .set_target_width(max_pixels as i32)
        .set_maximum_height(max_pixels as i32);

    let bitmap = page
        .render_with_config(&render_config)
        .map_err(|e| RoastError::RasterizationFailed(format!("{:?}", e)))?;

    let image = bitmap.as_image();
    debug!(
        "Rendered page 1/{} -> {}x{} px",
        page_count,
        image.width(),
        image.height()
    );

    Ok(RenderedPage { image, page_count })
}

/// Encode a rendered page as base64 PNG.
///
/// PNG over JPEG: lossless compression keeps rendered text crisp, which is
/// what the vision model judges layout and typography from.
pub fn encode_png(img: &DynamicImage) -> Result<EncodedImage, RoastError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| RoastError::Internal(format!("PNG encode failed: {}", e)))?;

    let data = STANDARD.encode(&buf);
    debug!("Encoded page image -> {} bytes base64", data.len());

    Ok(EncodedImage {
        data,
        mime_type: "image/png".to_string(),
        width: img.width(),
        height: img.height(),
    })
}
