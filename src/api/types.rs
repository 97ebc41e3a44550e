//! Request and response types for the roast API.

use crate::pdf::EncodedImage;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct TextRoastRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct TextRoastResponse {
    pub id: String,
    /// The model's critique, verbatim.
    pub roast: String,
    pub model: String,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct PdfRoastResponse {
    pub id: String,
    /// The model's critique, verbatim.
    pub roast: String,
    pub model: String,
    /// Total pages in the uploaded document; only page 1 was judged.
    pub page_count: usize,
    /// The rendered first page, so the UI can show what the model saw.
    pub image: EncodedImage,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub app: &'static str,
    pub version: &'static str,
}
