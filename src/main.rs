// SPDX-License-Identifier: GPL-3.0-only

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "procam")]
#[command(about = "Virtual camera: frame a still image and capture what the viewport shows")]
#[command(version = env!("GIT_VERSION"))]
struct Cli {
    /// Config file (default: ~/.config/procam/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Capture viewport overrides
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct ViewportArgs {
    /// Viewport width in logical pixels
    #[arg(long)]
    width: Option<f64>,

    /// Viewport height in logical pixels
    #[arg(long)]
    height: Option<f64>,

    /// Device pixel ratio
    #[arg(long)]
    dpr: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Composite a still image with a transform and save the capture
    Render {
        /// Image to use as the virtual feed
        #[arg(short, long)]
        image: PathBuf,

        #[arg(long, default_value_t = 1.0)]
        scale: f64,

        /// Horizontal offset in logical pixels
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        x: f64,

        /// Vertical offset in logical pixels
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        y: f64,

        /// Rotation in degrees (clockwise)
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        rotation: f64,

        /// Stretch to the viewport instead of covering it
        #[arg(long)]
        stretch: bool,

        #[command(flatten)]
        viewport: ViewportArgs,

        /// Output directory (default: ~/Pictures/procam)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replay a recorded gesture script against an image, then capture
    Replay {
        /// Image to use as the virtual feed
        #[arg(short, long)]
        image: PathBuf,

        /// JSON gesture script
        #[arg(short, long)]
        script: PathBuf,

        #[command(flatten)]
        viewport: ViewportArgs,

        /// Output directory (default: ~/Pictures/procam)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Acquire the device camera and capture one frame
    Camera {
        /// V4L2 node to treat as the rear camera (e.g. /dev/video2)
        #[arg(short, long)]
        device: Option<String>,

        /// Output directory (default: ~/Pictures/procam)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List available cameras
    List,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=procam=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let config = cli::load_config(cli.config.as_deref());

    match cli.command {
        Commands::Render {
            image,
            scale,
            x,
            y,
            rotation,
            stretch,
            viewport,
            output,
        } => {
            let transform = procam::Transform::new(scale, x, y, rotation);
            cli::render(&config, &image, transform, !stretch, viewport, output).await
        }
        Commands::Replay {
            image,
            script,
            viewport,
            output,
        } => cli::replay(&config, &image, &script, viewport, output).await,
        Commands::Camera { device, output } => cli::camera(&config, device, output).await,
        Commands::List => cli::list_cameras(),
    }
}
