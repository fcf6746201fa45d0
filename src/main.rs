//! fingerspell — static ASL alphabet recognition from hand landmarks.
//!
//! Two independent recognition paths: a local geometric matcher over the
//! 21-point hand topology, and a remote image-classification relay with
//! retry-on-cold-start. Offline, the local path is driven by replaying a
//! recorded landmark stream.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use fingerspell::relay::http::Classifier;
use fingerspell::{gesture, relay, replay, session};

#[derive(Parser, Debug)]
#[command(name = "fingerspell", about = "Static ASL alphabet recognition from hand landmarks")]
struct Cli {
    /// Replay a recorded landmark stream (JSON Lines) through the local recognizer
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Minimum raw gesture score (0-10) for a candidate to surface
    #[arg(long, default_value_t = gesture::scorer::DEFAULT_MIN_SCORE)]
    min_score: f32,

    /// Milliseconds a letter must persist before it joins the word
    #[arg(long, default_value_t = session::word::DEFAULT_HOLD_MS)]
    hold_ms: f64,

    /// Frame interval of the recorded stream, in milliseconds
    #[arg(long, default_value_t = 33.0)]
    frame_interval_ms: f64,

    /// Classify a single image through the remote model endpoint
    #[arg(long)]
    classify: Option<PathBuf>,

    /// Remote model endpoint URL (required with --classify)
    #[arg(long)]
    endpoint: Option<String>,

    /// Show version and exit
    #[arg(long)]
    version: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("fingerspell {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fingerspell=info".into()),
        )
        .init();

    if let Some(path) = cli.replay.as_deref() {
        info!("replaying {}", path.display());
        let summary = replay::run(path, cli.min_score, cli.hold_ms, cli.frame_interval_ms)?;
        println!("frames processed: {}", summary.frames);
        println!("word: {}", summary.word);
        return Ok(());
    }

    if let Some(path) = cli.classify.as_deref() {
        let endpoint = cli
            .endpoint
            .context("--classify requires --endpoint <url>")?;
        let frame = image::open(path).with_context(|| format!("opening {}", path.display()))?;
        let payload = relay::capture::encode_hand_crop(&frame, None)?;

        let mut session = session::remote::RemoteSession::new(session::remote::DEFAULT_INTERVAL_MS);
        session.start();
        let seq = session
            .tick(session::remote::DEFAULT_INTERVAL_MS, true)
            .context("remote session refused to fire")?;

        let mut classifier = relay::http::HttpRelay::new(endpoint);
        match classifier.classify(&payload) {
            Ok(prediction) => session.on_success(seq, prediction),
            Err(e) => session.on_failure(seq, &e),
        }

        match session.prediction() {
            Some(prediction) => {
                println!(
                    "letter: {} ({:.0}%)",
                    prediction.letter,
                    prediction.confidence * 100.0,
                );
            }
            None => bail!(
                "{}",
                session.error().unwrap_or("no prediction from the model endpoint"),
            ),
        }
        return Ok(());
    }

    bail!("nothing to do: pass --replay <frames.jsonl> or --classify <image> --endpoint <url>")
}
