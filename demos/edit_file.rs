//! Edits a local image with a fixed instruction.
//!
//! Run with: `cargo run --example edit_file -- <input_image.png>`
//!
//! Requires the `GEMINI_API_KEY` environment variable.

use retouch::codec::ImageFormat;
use retouch::{EditProvider, EditRequest, GeminiEditor};

#[tokio::main]
async fn main() -> retouch::Result<()> {
    let input_path = std::env::args()
        .nth(1)
        .expect("Usage: edit_file <input_image.png>");

    let input_bytes = std::fs::read(&input_path)?;
    let mime_type = ImageFormat::from_magic_bytes(&input_bytes)
        .unwrap_or_default()
        .mime_type();

    let editor = GeminiEditor::builder().build()?;

    let request = EditRequest::from_bytes(
        &input_bytes,
        mime_type,
        "Make the colors more vibrant and add a warm sunset glow",
    );

    let image = editor.edit(&request).await?;
    image.save("edited.png")?;
    println!("Edited image saved to edited.png ({})", image.mime_type);

    Ok(())
}
