//! Command-line front-end for the Lumiere generation flows.
//!
//! Stands in for the presentation layer: it encodes a local image,
//! submits it to a generation session, renders state changes as they
//! arrive, and writes the final artifact to disk.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lumiere_core::media::Artifact;
use lumiere_core::progress::DOWNLOAD_MESSAGE;
use lumiere_core::state::GenerationState;
use lumiere_gemini::client::GeminiClient;
use lumiere_gemini::config::GeminiConfig;
use lumiere_gemini::encoder::encode_file;
use lumiere_pipeline::poller::PollerConfig;
use lumiere_pipeline::session::GenerationSession;

#[derive(Parser, Debug)]
#[command(name = "lumiere", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Edit an image with a natural-language prompt.
    Edit(FlowArgs),
    /// Animate an image into a short video.
    Video(FlowArgs),
}

#[derive(Parser, Debug)]
struct FlowArgs {
    /// Input image path (PNG, JPEG, GIF, or WebP).
    #[arg(long)]
    image: PathBuf,

    /// What to do with the image.
    #[arg(long)]
    prompt: String,

    /// Output file path.
    #[arg(long)]
    out: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lumiere=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // The credential is validated once, here; a missing key never gets
    // as far as a flow.
    let config = GeminiConfig::from_env().context("startup configuration")?;
    tracing::info!(api_base = %config.api_base, "Loaded configuration");
    let client = Arc::new(GeminiClient::new(config));

    match cli.cmd {
        Command::Edit(args) => run_flow(client, args, false).await,
        Command::Video(args) => run_flow(client, args, true).await,
    }
}

async fn run_flow(client: Arc<GeminiClient>, args: FlowArgs, video: bool) -> anyhow::Result<()> {
    let payload = encode_file(&args.image).await?;

    let mut session = GenerationSession::new(client, PollerConfig::default());
    let mut rx = session.subscribe();
    if video {
        session.submit_video(Some(payload), args.prompt.as_str())?;
    } else {
        session.submit_edit(Some(payload), args.prompt.as_str())?;
    }

    let artifact = loop {
        {
            let state = rx.borrow_and_update();
            match &*state {
                GenerationState::Submitting => eprintln!("Submitting..."),
                GenerationState::Polling {
                    attempts, message, ..
                } => eprintln!("{message} (poll {attempts})"),
                GenerationState::Downloading => eprintln!("{DOWNLOAD_MESSAGE}"),
                GenerationState::Succeeded { artifact } => break artifact.clone(),
                GenerationState::Failed { error } => anyhow::bail!("{error}"),
                GenerationState::Idle => {}
            }
        }
        rx.changed()
            .await
            .context("generation session ended unexpectedly")?;
    };

    let bytes = match &artifact {
        Artifact::Image(image) => &image.bytes,
        Artifact::Video(clip) => &clip.bytes,
    };
    tokio::fs::write(&args.out, bytes)
        .await
        .with_context(|| format!("write {}", args.out.display()))?;
    println!("Wrote {} bytes to {}", bytes.len(), args.out.display());
    Ok(())
}
