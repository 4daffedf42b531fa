//! Session state for the edit flow.
//!
//! [`EditSession`] owns the source image, instruction, result and error
//! surface for one editing session and sequences the flow: default-image
//! bootstrap, source replacement, guarded submission. Every failure is
//! recovered here into a user-visible message; nothing escapes as a panic
//! or a process exit.

use crate::codec;
use crate::edit::{EditProvider, EditRequest, EditedImage};
use crate::error::{Result, RetouchError};
use std::path::Path;

const PARSE_FAILURE_MESSAGE: &str = "Invalid image format. Could not parse image data.";
const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred while editing the image.";

/// Observable phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing has happened yet.
    #[default]
    Idle,
    /// The default source image is being fetched.
    LoadingInitial,
    /// Interactive: accepting source changes, instruction edits and
    /// submissions.
    Ready,
    /// An edit request is in flight.
    Submitting,
}

/// Mutable, single-consumer state for one editing session.
///
/// The session is driven through `&mut self`, so there is exactly one
/// mutator and at most one submission in flight at a time. Extra submit
/// triggers are rejected, not queued, and an issued request cannot be
/// cancelled.
#[derive(Debug, Default)]
pub struct EditSession {
    source_image: Option<String>,
    result: Option<EditedImage>,
    instruction: String,
    phase: Phase,
    last_error: Option<String>,
}

impl EditSession {
    /// Creates an empty session in the [`Phase::Idle`] phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The current source image as a data URL, if any.
    pub fn source_image(&self) -> Option<&str> {
        self.source_image.as_deref()
    }

    /// The result of the last successful submission, if any.
    pub fn result(&self) -> Option<&EditedImage> {
        self.result.as_ref()
    }

    /// The current instruction text.
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// The last recorded error message, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Stores the instruction text.
    pub fn set_instruction(&mut self, text: impl Into<String>) {
        self.instruction = text.into();
    }

    /// Whether a submission would currently be accepted: a source image is
    /// present, the instruction is non-blank, and nothing is in flight.
    pub fn can_submit(&self) -> bool {
        self.source_image.is_some()
            && !self.instruction.trim().is_empty()
            && self.phase != Phase::Submitting
    }

    /// Fetches the default source image and installs it.
    ///
    /// On any failure the error message is recorded and the session still
    /// becomes interactive, just without a source image.
    pub async fn load_default_image(&mut self, http: &reqwest::Client, url: &str) {
        self.phase = Phase::LoadingInitial;
        match fetch_as_data_url(http, url).await {
            Ok(data_url) => {
                self.source_image = Some(data_url);
            }
            Err(e) => {
                tracing::warn!(url, "failed to fetch default image: {e}");
                self.last_error = Some(e.to_string());
            }
        }
        self.phase = Phase::Ready;
    }

    /// Replaces the source image with an already-encoded data URL.
    ///
    /// Clears any prior error and result, as selecting a new source starts
    /// the flow over.
    pub fn set_source_data_url(&mut self, data_url: impl Into<String>) {
        self.last_error = None;
        self.result = None;
        self.source_image = Some(data_url.into());
        self.phase = Phase::Ready;
    }

    /// Replaces the source image from a local file.
    ///
    /// Clears any prior error and result first. On failure an error is
    /// recorded and the previous source image is left untouched. Returns
    /// whether the replacement happened.
    pub fn set_source_from_path(&mut self, path: impl AsRef<Path>) -> bool {
        self.last_error = None;
        self.result = None;
        match codec::encode_file(path) {
            Ok(data_url) => {
                self.source_image = Some(data_url);
                self.phase = Phase::Ready;
                true
            }
            Err(e) => {
                tracing::warn!("failed to read source image: {e}");
                self.last_error = Some(format!("Failed to read the uploaded image: {e}"));
                false
            }
        }
    }

    /// Submits the current source and instruction to the provider.
    ///
    /// Returns `true` when a request was actually issued. The trigger is
    /// rejected without invoking the provider when no source image is
    /// present, the instruction is blank after trimming, or a submission is
    /// already in flight. A source that fails to parse as a data URL
    /// records an error and also never reaches the provider.
    ///
    /// The outcome lands on the session: the result on success, the
    /// provider's error message on failure. The prior result and error are
    /// cleared as soon as the request is issued.
    pub async fn submit<P: EditProvider + ?Sized>(&mut self, provider: &P) -> bool {
        if !self.can_submit() {
            return false;
        }

        let Some(parts) = self.source_image.as_deref().and_then(codec::parse) else {
            self.last_error = Some(PARSE_FAILURE_MESSAGE.to_string());
            return false;
        };

        let request = EditRequest::from_base64(
            parts.base64_data,
            parts.mime_type,
            self.instruction.clone(),
        );

        self.result = None;
        self.last_error = None;
        self.phase = Phase::Submitting;

        match provider.edit(&request).await {
            Ok(image) => {
                self.result = Some(image);
            }
            Err(e) => {
                let message = e.to_string();
                self.last_error = Some(if message.is_empty() {
                    UNKNOWN_ERROR_MESSAGE.to_string()
                } else {
                    message
                });
            }
        }
        self.phase = Phase::Ready;
        true
    }
}

/// Fetches a URL and encodes the body as a data URL.
///
/// The MIME type comes from the Content-Type header; when that is absent
/// the bytes are sniffed, with `application/octet-stream` as the last
/// resort.
async fn fetch_as_data_url(http: &reqwest::Client, url: &str) -> Result<String> {
    let response = http.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(RetouchError::Api {
            status: status.as_u16(),
            message: format!("failed to fetch default image from {url}"),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.split(';').next().unwrap_or(value).trim().to_string())
        .filter(|value| !value.is_empty());

    let bytes = response.bytes().await?;

    let mime_type = content_type
        .or_else(|| {
            codec::ImageFormat::from_magic_bytes(&bytes).map(|f| f.mime_type().to_string())
        })
        .unwrap_or_else(|| "application/octet-stream".to_string());

    Ok(codec::encode(&mime_type, &bytes))
}
