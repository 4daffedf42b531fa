#![warn(missing_docs)]
//! Retouch - natural-language image editing via Gemini image models.
//!
//! Give it an image and an instruction; it sends both to a hosted
//! generative-image model and hands back the edited image.
//!
//! # Quick Start
//!
//! ```no_run
//! use retouch::{EditProvider, EditRequest, GeminiEditor};
//!
//! #[tokio::main]
//! async fn main() -> retouch::Result<()> {
//!     let editor = GeminiEditor::builder().build()?;
//!
//!     let photo = std::fs::read("photo.png")?;
//!     let request = EditRequest::from_bytes(&photo, "image/png", "Add a warm sunset glow");
//!
//!     let edited = editor.edit(&request).await?;
//!     edited.save("edited.png")?;
//!     Ok(())
//! }
//! ```
//!
//! # Session flow
//!
//! [`EditSession`] carries the state a front end needs around the client:
//! the current source image, instruction, result, in-flight flag and last
//! error. It bootstraps from a default image URL, accepts replacement
//! source files, and guards submission (no source, a blank instruction or
//! an in-flight request all reject the trigger).
//!
//! ```no_run
//! use retouch::{EditSession, GeminiEditor};
//!
//! #[tokio::main]
//! async fn main() -> retouch::Result<()> {
//!     let editor = GeminiEditor::builder().build()?;
//!     let mut session = EditSession::new();
//!
//!     session.set_source_from_path("photo.jpg");
//!     session.set_instruction("Turn the sky stormy");
//!     session.submit(&editor).await;
//!
//!     match session.result() {
//!         Some(image) => image.save("stormy.jpg")?,
//!         None => eprintln!("{}", session.last_error().unwrap_or("no result")),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Each submission performs exactly one outbound call: no retries, no
//! caching, no cancellation.

pub mod codec;
pub mod edit;
mod error;
pub mod session;

pub use edit::{EditProvider, EditRequest, EditedImage, GeminiEditor, GeminiEditorBuilder};
pub use error::{Result, RetouchError};
pub use session::{EditSession, Phase};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::edit::{EditProvider, EditRequest, EditedImage, GeminiEditor};
    pub use crate::error::{Result, RetouchError};
    pub use crate::session::{EditSession, Phase};
}
