//! Gemini model client.
//!
//! Wraps exactly one `generateContent` call per roast. The request is an
//! ordered pair: the fixed instruction part first, then the content part,
//! which is either the pasted resume text or the rasterized first page as an
//! inline base64 PNG. The response text is returned verbatim; nothing is
//! trimmed, truncated, or sanitized. The client is stateless across calls:
//! no retries, no caching, no shared mutable state.

use crate::config::Config;
use crate::error::RoastError;
use crate::pdf::EncodedImage;
use crate::prompts::{TEXT_ROAST_PROMPT, VISUAL_ROAST_PROMPT};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Content payload for a single roast request.
///
/// Exactly one of the two is populated per invocation; the variants make the
/// text/image exclusivity a type-level fact.
pub enum RoastContent {
    Text(String),
    Image(EncodedImage),
}

/// Client for the Gemini `generateContent` API.
#[derive(Clone)]
pub struct RoastClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    max_output_tokens: u32,
}

impl RoastClient {
    /// Build a client from configuration.
    ///
    /// The API key is carried as-is and checked on first use, matching the
    /// lazily-failing credential contract of the upstream service.
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.model.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            endpoint: config.model.endpoint.trim_end_matches('/').to_string(),
            model: config.model.name.clone(),
            api_key: config.api_keys.google.clone(),
            max_output_tokens: config.model.max_output_tokens,
        }
    }

    /// Model identifier this client sends requests to.
    pub fn model_name(&self) -> &str {
        &self.model
    }

    /// Roast pasted resume text with the fixed text instruction.
    pub async fn roast_text(&self, resume: &str) -> Result<String, RoastError> {
        self.generate(TEXT_ROAST_PROMPT, RoastContent::Text(resume.to_string()))
            .await
    }

    /// Roast a rasterized first page with the fixed visual instruction.
    pub async fn roast_image(&self, image: EncodedImage) -> Result<String, RoastError> {
        self.generate(VISUAL_ROAST_PROMPT, RoastContent::Image(image))
            .await
    }

    /// Issue one `generateContent` call and return the candidate text.
    async fn generate(
        &self,
        instruction: &str,
        content: RoastContent,
    ) -> Result<String, RoastError> {
        let api_key = self.api_key.as_deref().ok_or(RoastError::ApiKeyMissing)?;

        let mut parts = vec![Part::Text {
            text: instruction.to_string(),
        }];
        match content {
            RoastContent::Text(text) => parts.push(Part::Text { text }),
            RoastContent::Image(image) => parts.push(Part::InlineData {
                inline_data: InlineData {
                    mime_type: image.mime_type,
                    data: image.data,
                },
            }),
        }

        let request = GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                max_output_tokens: self.max_output_tokens,
            },
        };

        let url = format!(
            "{}/models/{}:generateContent",
            self.endpoint, self.model
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| RoastError::ModelCallFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .ok()
                .and_then(|e| e.error)
                .map(|e| e.message)
                .unwrap_or(body);

            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    RoastError::AuthRejected(message)
                }
                _ => RoastError::ModelCallFailed(format!("HTTP {}: {}", status, message)),
            });
        }

        let response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| RoastError::ParseError(e.to_string()))?;

        let text: String = response
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .concat()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(RoastError::ParseError(
                "response contained no candidate text".to_string(),
            ));
        }

        Ok(text)
    }
}

// ============================================================================
// Gemini wire types
// ============================================================================

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: Option<ApiErrorDetail>,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use mockito::Matcher;
    use serde_json::json;

    fn test_config(endpoint: &str, key: Option<&str>) -> Config {
        let mut config = Config::default();
        config.model.endpoint = endpoint.to_string();
        config.api_keys.google = key.map(|k| k.to_string());
        config
    }

    #[tokio::test]
    async fn roast_text_sends_instruction_then_resume_and_returns_text_verbatim() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::Json(json!({
                "contents": [{
                    "parts": [
                        {"text": TEXT_ROAST_PROMPT},
                        {"text": "Built a thing"}
                    ]
                }],
                "generationConfig": {"maxOutputTokens": 2048}
            })))
            .with_status(200)
            .with_body(
                json!({
                    "candidates": [{
                        "content": {"parts": [{"text": "  Rejected. Fix it.  "}]}
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = RoastClient::new(&test_config(&server.url(), Some("test-key")));
        let roast = client.roast_text("Built a thing").await.unwrap();

        // Verbatim, including the surrounding whitespace the mock returned.
        assert_eq!(roast, "  Rejected. Fix it.  ");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn roast_image_sends_inline_data_part() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_body(Matcher::Json(json!({
                "contents": [{
                    "parts": [
                        {"text": VISUAL_ROAST_PROMPT},
                        {"inline_data": {"mime_type": "image/png", "data": "QUJD"}}
                    ]
                }],
                "generationConfig": {"maxOutputTokens": 2048}
            })))
            .with_status(200)
            .with_body(
                json!({
                    "candidates": [{
                        "content": {"parts": [{"text": "Ugly layout."}]}
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = RoastClient::new(&test_config(&server.url(), Some("test-key")));
        let image = EncodedImage {
            data: "QUJD".to_string(),
            mime_type: "image/png".to_string(),
            width: 1,
            height: 1,
        };
        let roast = client.roast_image(image).await.unwrap();

        assert_eq!(roast, "Ugly layout.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn multi_part_candidate_text_is_concatenated() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .with_status(200)
            .with_body(
                json!({
                    "candidates": [{
                        "content": {"parts": [{"text": "Reason one. "}, {"text": "Reason two."}]}
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = RoastClient::new(&test_config(&server.url(), Some("test-key")));
        let roast = client.roast_text("snippet").await.unwrap();

        assert_eq!(roast, "Reason one. Reason two.");
    }

    #[tokio::test]
    async fn missing_api_key_fails_without_network_call() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let client = RoastClient::new(&test_config(&server.url(), None));
        let err = client.roast_text("Built a thing").await.unwrap_err();

        assert!(matches!(err, RoastError::ApiKeyMissing));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn forbidden_status_maps_to_auth_rejected() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .with_status(403)
            .with_body(json!({"error": {"message": "API key not valid"}}).to_string())
            .create_async()
            .await;

        let client = RoastClient::new(&test_config(&server.url(), Some("bad-key")));
        let err = client.roast_text("Built a thing").await.unwrap_err();

        match err {
            RoastError::AuthRejected(msg) => assert!(msg.contains("API key not valid")),
            other => panic!("expected AuthRejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn server_error_maps_to_model_call_failed() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let client = RoastClient::new(&test_config(&server.url(), Some("test-key")));
        let err = client.roast_text("Built a thing").await.unwrap_err();

        match err {
            RoastError::ModelCallFailed(msg) => {
                assert!(msg.contains("500"));
                assert!(msg.contains("upstream exploded"));
            }
            other => panic!("expected ModelCallFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_candidates_map_to_parse_error() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .with_status(200)
            .with_body(json!({"candidates": []}).to_string())
            .create_async()
            .await;

        let client = RoastClient::new(&test_config(&server.url(), Some("test-key")));
        let err = client.roast_text("Built a thing").await.unwrap_err();

        assert!(matches!(err, RoastError::ParseError(_)));
    }

    #[tokio::test]
    async fn identical_submissions_issue_independent_calls() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .expect(2)
            .with_status(200)
            .with_body(
                json!({
                    "candidates": [{"content": {"parts": [{"text": "Roast."}]}}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = RoastClient::new(&test_config(&server.url(), Some("test-key")));
        client.roast_text("Built a thing").await.unwrap();
        client.roast_text("Built a thing").await.unwrap();

        mock.assert_async().await;
    }
}
