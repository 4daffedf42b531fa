//! Request and result types for image editing.

use crate::error::{Result, RetouchError};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A single edit request: one source image plus one instruction.
///
/// Constructed fresh per submission and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditRequest {
    /// Base64-encoded source image payload, handed to the provider verbatim.
    pub base64_data: String,
    /// MIME type of the source image.
    pub mime_type: String,
    /// Free-text edit instruction.
    pub instruction: String,
}

impl EditRequest {
    /// Creates a request from an already base64-encoded payload.
    ///
    /// The payload is not validated here; a syntactically invalid payload
    /// surfaces as an error from the provider.
    pub fn from_base64(
        base64_data: impl Into<String>,
        mime_type: impl Into<String>,
        instruction: impl Into<String>,
    ) -> Self {
        Self {
            base64_data: base64_data.into(),
            mime_type: mime_type.into(),
            instruction: instruction.into(),
        }
    }

    /// Creates a request from raw image bytes.
    pub fn from_bytes(
        data: &[u8],
        mime_type: impl Into<String>,
        instruction: impl Into<String>,
    ) -> Self {
        Self {
            base64_data: base64::engine::general_purpose::STANDARD.encode(data),
            mime_type: mime_type.into(),
            instruction: instruction.into(),
        }
    }
}

/// An edited image as returned by the provider.
///
/// The MIME type and payload are kept exactly as the provider sent them, so
/// [`data_url`](Self::data_url) reproduces the returned image byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "edited image should be saved or displayed"]
pub struct EditedImage {
    /// MIME type reported by the provider.
    pub mime_type: String,
    /// Base64 payload, verbatim.
    pub base64_data: String,
}

impl EditedImage {
    /// Creates an edited image from the provider's MIME type and payload.
    pub fn new(mime_type: impl Into<String>, base64_data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            base64_data: base64_data.into(),
        }
    }

    /// Returns the image as a data URL.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_data)
    }

    /// Decodes the payload into raw image bytes.
    pub fn bytes(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.base64_data)
            .map_err(|e| RetouchError::Decode(e.to_string()))
    }

    /// Saves the decoded image to the given path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.bytes()?)?;
        Ok(())
    }
}
