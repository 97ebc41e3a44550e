//! Unified error handling for Resume Roaster.
//!
//! Both roast flows report failures through the same tagged enum. The
//! variants distinguish bad input, rasterizer problems, and upstream model
//! problems so the UI can show the right hint instead of one generic catch.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

/// Unified error type for roast operations.
#[derive(Debug, Clone)]
pub enum RoastError {
    /// Request failed a precondition (empty text, missing or non-PDF file).
    InvalidInput(String),
    /// No Google API key configured.
    ApiKeyMissing,
    /// The pdfium shared library could not be bound.
    PdfiumUnavailable(String),
    /// The uploaded PDF could not be opened or rendered.
    RasterizationFailed(String),
    /// The PDF opened fine but contains no pages.
    EmptyDocument,
    /// The Gemini API call failed (transport or service error).
    ModelCallFailed(String),
    /// The Gemini API rejected the credential.
    AuthRejected(String),
    /// The Gemini response did not contain the expected text field.
    ParseError(String),
    /// Internal error.
    Internal(String),
}

impl fmt::Display for RoastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "{}", msg),
            Self::ApiKeyMissing => {
                write!(f, "No Google API key configured. Set GOOGLE_API_KEY.")
            }
            Self::PdfiumUnavailable(detail) => write!(
                f,
                "PDF renderer unavailable: {}. Install the pdfium shared library \
                 system-wide or next to the binary.",
                detail
            ),
            Self::RasterizationFailed(detail) => {
                write!(f, "Error processing PDF: {}", detail)
            }
            Self::EmptyDocument => write!(f, "The uploaded PDF contains no pages"),
            Self::ModelCallFailed(msg) => write!(f, "Model call failed: {}", msg),
            Self::AuthRejected(msg) => {
                write!(f, "Gemini rejected the API key: {}", msg)
            }
            Self::ParseError(msg) => write!(f, "Unexpected Gemini response: {}", msg),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for RoastError {}

/// Error response structure for JSON serialization.
#[derive(Serialize)]
struct ErrorResponseBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    message: String,
    r#type: String,
}

impl RoastError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::ApiKeyMissing => StatusCode::SERVICE_UNAVAILABLE,
            Self::PdfiumUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::RasterizationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::EmptyDocument => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ModelCallFailed(_) => StatusCode::BAD_GATEWAY,
            Self::AuthRejected(_) => StatusCode::BAD_GATEWAY,
            Self::ParseError(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type string.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::ApiKeyMissing => "configuration_error",
            Self::PdfiumUnavailable(_) => "rasterizer_missing",
            Self::RasterizationFailed(_) => "rasterization_failed",
            Self::EmptyDocument => "rasterization_failed",
            Self::ModelCallFailed(_) => "model_call_failed",
            Self::AuthRejected(_) => "model_call_failed",
            Self::ParseError(_) => "model_call_failed",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for RoastError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponseBody {
            error: ErrorDetail {
                message: self.to_string(),
                r#type: self.error_type().to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}
