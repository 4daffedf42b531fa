//! Gemini (Google) image-edit provider.

use crate::edit::provider::EditProvider;
use crate::edit::types::{EditRequest, EditedImage};
use crate::error::{Result, RetouchError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default Gemini image model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

/// Environment variable consulted for the API key when none is given.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

const NO_IMAGE_MESSAGE: &str =
    "No image data found in the API response. The content may have been blocked.";

/// Builder for [`GeminiEditor`].
#[derive(Debug, Clone, Default)]
pub struct GeminiEditorBuilder {
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
}

impl GeminiEditorBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to the `GEMINI_API_KEY` env var.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the Gemini model identifier.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Overrides the API base URL. Mainly for tests against a local server.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Builds the editor, resolving the API key.
    ///
    /// A missing or empty key is reported here, before any network
    /// activity.
    pub fn build(self) -> Result<GeminiEditor> {
        let api_key = self
            .api_key
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()))
            .ok_or_else(|| {
                RetouchError::Config(format!("{API_KEY_ENV} not set and no API key provided"))
            })?;

        Ok(GeminiEditor {
            client: reqwest::Client::new(),
            api_key,
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }
}

/// Gemini image-edit provider.
///
/// Constructed per call site from explicit configuration; there is no
/// process-wide shared client.
#[derive(Debug)]
pub struct GeminiEditor {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiEditor {
    /// Creates a new `GeminiEditorBuilder`.
    pub fn builder() -> GeminiEditorBuilder {
        GeminiEditorBuilder::new()
    }

    /// Returns the model identifier this editor calls.
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn edit_impl(&self, request: &EditRequest) -> Result<EditedImage> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model,
        );

        let body = GeminiRequest::from_edit_request(request);

        tracing::debug!(
            model = %self.model,
            mime_type = %request.mime_type,
            "sending image-edit request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "image-edit request failed");
            return Err(api_error(status.as_u16(), &text));
        }

        let gemini_response: GeminiResponse = response.json().await?;
        extract_first_image(gemini_response)
    }
}

#[async_trait]
impl EditProvider for GeminiEditor {
    async fn edit(&self, request: &EditRequest) -> Result<EditedImage> {
        self.edit_impl(request).await
    }

    fn name(&self) -> &str {
        "Gemini (Google)"
    }
}

/// Maps a non-2xx response to an API error, keeping the provider's own
/// message intact. Gemini wraps errors as `{"error": {"message": ...}}`;
/// that message is surfaced when present, the raw body otherwise.
fn api_error(status: u16, body: &str) -> RetouchError {
    let message = serde_json::from_str::<GeminiErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.to_string());
    RetouchError::Api { status, message }
}

/// Surfaces the first inline-image part of the first candidate.
///
/// Later parts and candidates are ignored on purpose: callers rely on
/// exactly one resulting image per request.
fn extract_first_image(response: GeminiResponse) -> Result<EditedImage> {
    let GeminiResponse {
        candidates,
        prompt_feedback,
    } = response;

    let Some(GeminiCandidate {
        content,
        finish_reason,
    }) = candidates.into_iter().next()
    else {
        return Err(empty_result(prompt_feedback.as_ref(), None));
    };

    let inline = content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .find_map(|part| part.inline_data);

    match inline {
        Some(data) => {
            tracing::debug!(mime_type = %data.mime_type, "received edited image");
            Ok(EditedImage::new(data.mime_type, data.data))
        }
        None => Err(empty_result(
            prompt_feedback.as_ref(),
            finish_reason.as_deref(),
        )),
    }
}

fn empty_result(feedback: Option<&PromptFeedback>, finish_reason: Option<&str>) -> RetouchError {
    let detail = feedback
        .and_then(|f| {
            f.block_reason_message
                .clone()
                .or_else(|| f.block_reason.clone())
        })
        .or_else(|| finish_reason.map(str::to_string));

    let message = match detail {
        Some(detail) => format!("{NO_IMAGE_MESSAGE} ({detail})"),
        None => NO_IMAGE_MESSAGE.to_string(),
    };
    RetouchError::EmptyResult(message)
}

// Request/Response types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiRequestPart>,
}

/// A part in a Gemini request - inline image data or instruction text.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiRequestPart {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiConfig {
    response_modalities: Vec<String>,
}

impl GeminiRequest {
    fn from_edit_request(request: &EditRequest) -> Self {
        // Source image first, instruction second; the payload goes through
        // unchanged.
        let parts = vec![
            GeminiRequestPart::InlineData {
                inline_data: GeminiInlineData {
                    mime_type: request.mime_type.clone(),
                    data: request.base64_data.clone(),
                },
            },
            GeminiRequestPart::Text {
                text: request.instruction.clone(),
            },
        ];

        Self {
            contents: vec![GeminiContent { parts }],
            generation_config: GeminiConfig {
                response_modalities: vec!["IMAGE".to_string()],
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContentResponse>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
    #[serde(default)]
    block_reason_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPartResponse {
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> EditRequest {
        EditRequest::from_base64("AAAA", "image/png", "add a hat")
    }

    #[test]
    fn test_builder_with_explicit_key() {
        let editor = GeminiEditorBuilder::new().api_key("test-key").build();
        assert!(editor.is_ok());
        assert_eq!(editor.unwrap().model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_builder_rejects_empty_key() {
        std::env::remove_var(API_KEY_ENV);
        let err = GeminiEditorBuilder::new().api_key("").build().unwrap_err();
        assert!(matches!(err, RetouchError::Config(_)));
    }

    #[test]
    fn test_request_construction() {
        let request = GeminiRequest::from_edit_request(&sample_request());

        assert_eq!(request.contents.len(), 1);
        assert_eq!(request.contents[0].parts.len(), 2);
        assert_eq!(
            request.generation_config.response_modalities,
            vec!["IMAGE"]
        );
    }

    #[test]
    fn test_request_serialization() {
        let request = GeminiRequest::from_edit_request(&sample_request());
        let json = serde_json::to_value(&request).unwrap();

        // Image part first, instruction second.
        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[0]["inlineData"]["data"], "AAAA");
        assert_eq!(parts[1]["text"], "add a hat");

        assert_eq!(json["generationConfig"]["responseModalities"][0], "IMAGE");
        assert!(json.get("generation_config").is_none());
    }

    #[test]
    fn test_extract_first_image() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"inlineData": {"mimeType": "image/png", "data": "AAAA"}},
                        {"inlineData": {"mimeType": "image/jpeg", "data": "BBBB"}}
                    ]
                },
                "finishReason": "STOP"
            }, {
                "content": {
                    "parts": [{"inlineData": {"mimeType": "image/webp", "data": "CCCC"}}]
                }
            }]
        }"#;
        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        let image = extract_first_image(response).unwrap();
        assert_eq!(image.data_url(), "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_extract_skips_text_parts() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "Here is your edit:"},
                        {"inlineData": {"mimeType": "image/png", "data": "AAAA"}}
                    ]
                }
            }]
        }"#;
        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        let image = extract_first_image(response).unwrap();
        assert_eq!(image.base64_data, "AAAA");
    }

    #[test]
    fn test_extract_no_image_reports_possible_block() {
        let json = r#"{
            "candidates": [{
                "content": {"parts": [{"text": "cannot comply"}]}
            }]
        }"#;
        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        let err = extract_first_image(response).unwrap_err();
        assert!(matches!(err, RetouchError::EmptyResult(_)));
        assert!(err.to_string().contains("may have been blocked"));
    }

    #[test]
    fn test_extract_no_candidates() {
        let response: GeminiResponse = serde_json::from_str("{}").unwrap();
        let err = extract_first_image(response).unwrap_err();
        assert!(matches!(err, RetouchError::EmptyResult(_)));
    }

    #[test]
    fn test_extract_includes_block_reason() {
        let json = r#"{
            "candidates": [],
            "promptFeedback": {
                "blockReason": "SAFETY",
                "blockReasonMessage": "Prompt was blocked due to safety"
            }
        }"#;
        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        let err = extract_first_image(response).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("may have been blocked"));
        assert!(message.contains("Prompt was blocked due to safety"));
    }

    #[test]
    fn test_extract_includes_finish_reason() {
        let json = r#"{
            "candidates": [{"finishReason": "IMAGE_SAFETY"}]
        }"#;
        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        let err = extract_first_image(response).unwrap_err();
        assert!(err.to_string().contains("IMAGE_SAFETY"));
    }

    #[test]
    fn test_api_error_unwraps_provider_message() {
        let body = r#"{"error": {"code": 400, "message": "Invalid image payload", "status": "INVALID_ARGUMENT"}}"#;
        let err = api_error(400, body);
        match err {
            RetouchError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid image payload");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_api_error_falls_back_to_raw_body() {
        let err = api_error(503, "upstream connect error");
        match err {
            RetouchError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "upstream connect error");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
