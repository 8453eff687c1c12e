//! gesture_tree: interactive entry point.

use std::path::PathBuf;

use clap::Parser;
use gesture_tree::app::{run, AppConfig};
use pose_catalog::MAX_DECORATIONS;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "gesture_tree")]
#[command(about = "Hand-gesture choreography for a holiday tree scene", long_about = None)]
struct Cli {
    /// Seed for every random layout
    #[arg(long)]
    seed: Option<u64>,

    /// Number of decorations on the tree
    #[arg(long)]
    decorations: Option<usize>,

    /// Number of snow flakes
    #[arg(long)]
    snow: Option<usize>,

    /// Frame rate of the tick loop
    #[arg(long)]
    fps: Option<u32>,

    /// Run without the preview window
    #[arg(long)]
    headless: bool,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Image files to add as photos
    #[arg(long = "photo", value_name = "PATH", num_args = 1..)]
    photos: Vec<PathBuf>,

    /// Replay recorded hand landmarks (JSON lines) instead of the keyboard
    #[arg(long, value_name = "FILE")]
    landmarks: Option<PathBuf>,

    /// Start without the blank placeholder photo
    #[arg(long)]
    no_placeholder: bool,

    /// Use the defaults for everything not given on the command line
    #[arg(long)]
    quick: bool,
}

impl Cli {
    fn into_config(self) -> AppConfig {
        let d = AppConfig::default();
        AppConfig {
            seed:        self.seed.unwrap_or(d.seed),
            decorations: self.decorations.unwrap_or(d.decorations).min(MAX_DECORATIONS),
            snow:        self.snow.unwrap_or(d.snow),
            tree:        d.tree,
            fps:         self.fps.unwrap_or(d.fps).clamp(1, 240),
            placeholder: !self.no_placeholder,
            photos:      self.photos,
            landmarks:   self.landmarks,
            window:      !self.headless,
            frames:      self.frames,
        }
    }
}

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("gesture_tree=info,photo_pool=info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
            )
            .with(env_filter)
            .init();
    }
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    if cli.quick {
        info!("quick start: defaults for anything not given");
    }
    let cfg = cli.into_config();

    info!(
        window      = cfg.window,
        decorations = cfg.decorations,
        photos      = cfg.photos.len(),
        replay      = cfg.landmarks.is_some(),
        "starting gesture_tree"
    );

    if let Err(e) = run(cfg) {
        error!("gesture_tree failed: {}", e);
        std::process::exit(1);
    }
}
