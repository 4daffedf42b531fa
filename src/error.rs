//! Error types for image editing.

/// Errors that can occur while editing an image.
#[derive(Debug, thiserror::Error)]
pub enum RetouchError {
    /// API key missing or empty.
    #[error("API key is not configured: {0}")]
    Config(String),

    /// Malformed data URL, unreadable file, or undecodable payload.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// The provider answered without any inline image data.
    #[error("no image data in response: {0}")]
    EmptyResult(String),

    /// The provider returned an error response. The message is the
    /// provider's own text, preserved verbatim.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Provider error message.
        message: String,
    },

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// I/O error (e.g., reading or saving a file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid request parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Result type alias for image editing operations.
pub type Result<T> = std::result::Result<T, RetouchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RetouchError::Api {
            status: 429,
            message: "Quota exceeded".into(),
        };
        assert_eq!(err.to_string(), "API error: 429 - Quota exceeded");

        let err = RetouchError::Config("GEMINI_API_KEY not set".into());
        assert_eq!(
            err.to_string(),
            "API key is not configured: GEMINI_API_KEY not set"
        );
    }

    #[test]
    fn test_empty_result_keeps_message() {
        let err = RetouchError::EmptyResult("the content may have been blocked".into());
        assert!(err.to_string().contains("may have been blocked"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.png");
        let err: RetouchError = io.into();
        assert!(matches!(err, RetouchError::Io(_)));
    }
}
