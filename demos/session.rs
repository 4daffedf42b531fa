//! Full session flow: default-image bootstrap plus one edit.
//!
//! Run with: `cargo run --example session -- "your instruction here"`
//!
//! Requires the `GEMINI_API_KEY` environment variable.

use retouch::{EditSession, GeminiEditor};

const DEFAULT_IMAGE_URL: &str = "https://picsum.photos/id/1018/1024/1024";

#[tokio::main]
async fn main() -> retouch::Result<()> {
    let instruction = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Make it look like an oil painting".to_string());

    let editor = GeminiEditor::builder().build()?;

    let mut session = EditSession::new();
    let http = reqwest::Client::new();
    session.load_default_image(&http, DEFAULT_IMAGE_URL).await;

    if let Some(message) = session.last_error() {
        eprintln!("Could not load the default image: {message}");
        return Ok(());
    }

    session.set_instruction(instruction);
    session.submit(&editor).await;

    match session.result() {
        Some(image) => {
            image.save("session_edit.png")?;
            println!("Edited image saved to session_edit.png");
        }
        None => {
            eprintln!(
                "Edit failed: {}",
                session.last_error().unwrap_or("no result")
            );
        }
    }

    Ok(())
}
