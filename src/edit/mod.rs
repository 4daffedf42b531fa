//! Image editing: request/result types, the provider seam and the Gemini
//! client.

mod gemini;
mod provider;
mod types;

pub use gemini::{GeminiEditor, GeminiEditorBuilder, API_KEY_ENV, DEFAULT_MODEL};
pub use provider::EditProvider;
pub use types::{EditRequest, EditedImage};
