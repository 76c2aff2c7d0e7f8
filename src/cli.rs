// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! This module provides command-line functionality for:
//! - Rendering a still image through the virtual feed
//! - Replaying recorded gesture scripts
//! - Capturing from the device camera
//! - Listing available cameras

use crate::ViewportArgs;
use procam::backends::camera::{self, CameraDeviceManager, CameraStatus};
use procam::pipelines::photo::{CaptureOutput, CapturePipeline, CaptureRequest, Viewport};
use procam::session::{GestureInterpreter, ImageHandle, Session, Transform, script};
use procam::storage::{DirectorySink, OutputSink};
use procam::Config;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::warn;

/// Load the config from `path`, or the default location
pub fn load_config(path: Option<&Path>) -> Config {
    match path {
        Some(path) => Config::load_from(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "Failed to load config, using defaults");
            Config::default()
        }),
        None => Config::load(),
    }
}

fn viewport(config: &Config, args: ViewportArgs) -> Viewport {
    Viewport::new(
        args.width.unwrap_or(config.viewport_width),
        args.height.unwrap_or(config.viewport_height),
        args.dpr.unwrap_or(config.device_pixel_ratio),
    )
}

fn sink(config: &Config, output: Option<PathBuf>) -> DirectorySink {
    DirectorySink::new(output.unwrap_or_else(|| config.photo_dir()))
        .open_after(config.open_after_capture)
}

fn load_image(path: &Path) -> Result<ImageHandle, Box<dyn std::error::Error>> {
    ImageHandle::from_path(path)
        .map_err(|e| format!("Failed to read image {}: {}", path.display(), e).into())
}

/// Run a virtual capture and save it; there is no camera in these commands
async fn capture_virtual(
    session: &Session,
    viewport: Viewport,
    sink: &DirectorySink,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = CaptureRequest::snapshot(session, CameraStatus::Simulated, None, viewport)
        .ok_or("Capture unavailable")?;

    let mut pipeline = CapturePipeline::new();
    let output = pipeline
        .run(request)
        .await
        .ok_or("Capture produced no output (see log)")?;

    save(sink, &output, &pipeline)
}

fn save(
    sink: &DirectorySink,
    output: &CaptureOutput,
    pipeline: &CapturePipeline,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = sink.deliver(output)?;

    if let Some(toast) = pipeline.feedback().active_toast(Instant::now()) {
        println!("{}", toast.message);
    }
    println!(
        "{}x{} ({:?}, quality {}): {}",
        output.image.width,
        output.image.height,
        output.mode,
        output.image.quality.jpeg_quality(),
        path.display()
    );
    Ok(())
}

/// Composite a still image with a fixed transform
pub async fn render(
    config: &Config,
    image: &Path,
    transform: Transform,
    maintain_aspect_ratio: bool,
    viewport_args: ViewportArgs,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::new(maintain_aspect_ratio);
    session.select_image_and_activate(load_image(image)?);
    session.commit(transform);

    println!("Transform: {}", session.read());
    capture_virtual(&session, viewport(config, viewport_args), &sink(config, output)).await
}

/// Replay a gesture script, print the resulting history, then capture
pub async fn replay(
    config: &Config,
    image: &Path,
    script_path: &Path,
    viewport_args: ViewportArgs,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let events = script::load(script_path)?;

    let mut session = Session::new(config.maintain_aspect_ratio);
    session.select_image_and_activate(load_image(image)?);

    let mut gestures = GestureInterpreter::new();
    script::replay(&events, &mut gestures, &mut session);

    println!("Replayed {} events", events.len());
    println!("History:");
    let history = session.history();
    for (i, entry) in history.entries().iter().enumerate() {
        let marker = if i == history.index() { ">" } else { " " };
        println!("  {} [{}] {}", marker, i, entry);
    }
    println!();

    capture_virtual(&session, viewport(config, viewport_args), &sink(config, output)).await
}

/// Acquire the device camera and capture one frame (or the placeholder)
pub async fn camera(
    config: &Config,
    device: Option<String>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let capability = camera::platform_camera(device.or_else(|| config.preferred_device.clone()));
    let manager = CameraDeviceManager::mount(capability);

    println!("Waiting for camera... (press Ctrl+C to cancel)");
    let status = tokio::select! {
        status = manager.settled() => status,
        _ = tokio::signal::ctrl_c() => {
            manager.teardown();
            println!("Cancelled");
            return Ok(());
        }
    };
    println!("Camera: {}", status);

    if status == CameraStatus::Live {
        wait_for_frame(&manager).await;
    }

    let session = Session::new(config.maintain_aspect_ratio);
    let mut pipeline = CapturePipeline::new();
    let viewport = Viewport::new(
        config.viewport_width,
        config.viewport_height,
        config.device_pixel_ratio,
    );
    let result = pipeline.capture(&session, &manager, viewport).await;
    manager.teardown();

    let captured = result.ok_or("Capture produced no output (see log)")?;
    save(&sink(config, output), &captured, &pipeline)
}

/// Give the stream a moment to deliver its first frame
async fn wait_for_frame(manager: &CameraDeviceManager) {
    let start = Instant::now();
    let timeout = Duration::from_secs(5);

    while start.elapsed() < timeout {
        if manager.current_frame().is_some() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    warn!("No frame from the camera yet, capturing placeholder");
}

/// List all available cameras
pub fn list_cameras() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(target_os = "linux")]
    {
        let devices = camera::v4l2::list_devices()?;
        if devices.is_empty() {
            println!("No cameras found.");
            return Ok(());
        }

        println!("Available cameras:");
        println!();
        for device in devices {
            println!("  {} - {} ({})", device.path, device.name, device.driver);
        }
        Ok(())
    }

    #[cfg(not(target_os = "linux"))]
    {
        println!("No camera support on this platform.");
        Ok(())
    }
}
