//! Data-URL codec and image format detection.
//!
//! Images cross the session boundary as data URLs of the form
//! `data:<mimeType>;base64,<payload>`. [`parse`] splits such a string back
//! into its two segments and [`encode`] builds one from raw bytes.

use crate::error::{Result, RetouchError};
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static DATA_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^data:(.+);base64,(.+)$").expect("pattern is valid"));

/// Supported source image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    /// PNG format (lossless).
    #[default]
    Png,
    /// JPEG format (lossy).
    Jpeg,
    /// WebP format (modern, efficient).
    WebP,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    /// Attempts to detect format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 12 {
            return None;
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        None
    }
}

/// The two segments of a parsed data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrlParts {
    /// MIME type segment, e.g. `image/png`.
    pub mime_type: String,
    /// Base64 payload segment, taken verbatim.
    pub base64_data: String,
}

/// Splits a data URL into its MIME type and base64 payload.
///
/// Returns `None` when the string does not have the
/// `data:<mime>;base64,<payload>` shape with both segments non-empty.
/// The payload is not checked for base64 validity and the MIME type is not
/// checked against any registry; both are left to whoever consumes them.
pub fn parse(data_url: &str) -> Option<DataUrlParts> {
    let caps = DATA_URL.captures(data_url)?;
    Some(DataUrlParts {
        mime_type: caps[1].to_string(),
        base64_data: caps[2].to_string(),
    })
}

/// Formats image bytes as a data URL.
pub fn encode(mime_type: &str, data: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime_type,
        base64::engine::general_purpose::STANDARD.encode(data)
    )
}

/// Reads an image file and encodes it as a data URL.
///
/// The MIME type is detected from the file's magic bytes, falling back to
/// the extension. Unreadable files surface the I/O error; files that are
/// not a supported image format fail with a decode error.
pub fn encode_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let format = ImageFormat::from_magic_bytes(&data)
        .or_else(|| {
            path.extension()
                .and_then(|e| e.to_str())
                .and_then(ImageFormat::from_extension)
        })
        .ok_or_else(|| {
            RetouchError::Decode(format!("unrecognized image format: {}", path.display()))
        })?;
    Ok(encode(format.mime_type(), &data))
}
