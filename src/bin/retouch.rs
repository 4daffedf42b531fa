//! CLI for retouch - natural-language image editing.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use retouch::{EditProvider, EditSession, GeminiEditor};
use std::path::PathBuf;

const DEFAULT_IMAGE_URL: &str = "https://picsum.photos/id/1018/1024/1024";

#[derive(Parser)]
#[command(name = "retouch")]
#[command(about = "Edit images with natural-language instructions via the Gemini API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Edit an image according to a text instruction
    Edit(EditArgs),

    /// Show provider configuration
    Info,
}

#[derive(Args)]
struct EditArgs {
    /// The edit instruction (e.g. "make the sky more dramatic")
    instruction: String,

    /// Source image (png, jpeg or webp); fetched from --default-url when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file path
    #[arg(short, long)]
    output: PathBuf,

    /// URL fetched for the source image when no --input is given
    #[arg(long, default_value = DEFAULT_IMAGE_URL)]
    default_url: String,

    /// Gemini model to use
    #[arg(long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Edit(args) => edit(args, cli.json).await,
        Commands::Info => info(cli.json),
    }
}

async fn edit(args: EditArgs, json_output: bool) -> anyhow::Result<()> {
    let mut builder = GeminiEditor::builder();
    if let Some(model) = args.model {
        builder = builder.model(model);
    }
    let editor = builder.build()?;

    let mut session = EditSession::new();
    match args.input {
        Some(ref path) => {
            session.set_source_from_path(path);
        }
        None => {
            let http = reqwest::Client::new();
            session.load_default_image(&http, &args.default_url).await;
        }
    }
    if let Some(message) = session.last_error() {
        anyhow::bail!("{message}");
    }

    session.set_instruction(args.instruction.as_str());
    if !session.submit(&editor).await {
        anyhow::bail!("nothing submitted: a source image and a non-empty instruction are required");
    }
    if let Some(message) = session.last_error() {
        anyhow::bail!("{message}");
    }

    let image = session.result().context("no result recorded")?;
    let bytes = image.bytes()?;
    std::fs::write(&args.output, &bytes)
        .with_context(|| format!("writing {}", args.output.display()))?;

    if json_output {
        let result = serde_json::json!({
            "success": true,
            "output": args.output.display().to_string(),
            "size_bytes": bytes.len(),
            "mime_type": image.mime_type,
            "provider": editor.name(),
            "model": editor.model(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "Edited image: {} ({} bytes, {})",
            args.output.display(),
            bytes.len(),
            image.mime_type
        );
    }

    Ok(())
}

fn info(json_output: bool) -> anyhow::Result<()> {
    #[derive(serde::Serialize)]
    struct ProviderInfo {
        name: &'static str,
        default_model: &'static str,
        env_var: &'static str,
        configured: bool,
    }

    let provider = ProviderInfo {
        name: "Gemini (Google)",
        default_model: retouch::edit::DEFAULT_MODEL,
        env_var: retouch::edit::API_KEY_ENV,
        configured: std::env::var(retouch::edit::API_KEY_ENV)
            .map(|v| !v.is_empty())
            .unwrap_or(false),
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&provider)?);
    } else {
        let status = if provider.configured { "✓" } else { "✗" };
        println!("{} {}", status, provider.name);
        println!("  default model: {}", provider.default_model);
        println!("  API key: {}", provider.env_var);
    }

    Ok(())
}
