// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 camera capability
//!
//! Each acquired stream owns a capture thread. The thread opens the device,
//! negotiates YUYV or MJPEG, reports the setup result back to the awaiting
//! acquisition and then keeps only the most recent frame around.

use super::format_converters::{mjpeg_to_rgb, yuyv_to_rgb};
use super::types::{CameraDevice, CameraFrame, FacingMode, PixelFormat, StreamConstraints};
use super::{CameraCapability, MediaStream};
use crate::constants::camera::{ENVIRONMENT_HINTS, V4L2_BUFFER_COUNT};
use crate::errors::CameraError;
use futures::future::BoxFuture;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};
use v4l::buffer::Type;
use v4l::capability::Flags;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;
use v4l::FourCC;

type LatestFrame = Arc<Mutex<Option<CameraFrame>>>;

/// Camera capability backed by /dev/video* nodes
#[derive(Debug, Clone, Default)]
pub struct V4l2Camera {
    /// Device path treated as environment-facing
    preferred_device: Option<String>,
}

impl V4l2Camera {
    pub fn new(preferred_device: Option<String>) -> Self {
        Self { preferred_device }
    }

    /// Pick the device for a request
    fn select(&self, constraints: StreamConstraints) -> Result<CameraDevice, CameraError> {
        let devices = list_devices()?;

        match constraints.facing_mode {
            Some(FacingMode::Environment) => {
                if let Some(preferred) = &self.preferred_device {
                    return devices
                        .into_iter()
                        .find(|d| &d.path == preferred)
                        .ok_or_else(|| {
                            CameraError::AcquisitionFailed(format!(
                                "preferred device {} not available",
                                preferred
                            ))
                        });
                }
                devices
                    .into_iter()
                    .find(|d| is_environment_facing(&d.name))
                    .ok_or_else(|| {
                        CameraError::AcquisitionFailed("no environment-facing camera".to_string())
                    })
            }
            Some(FacingMode::User) => devices
                .into_iter()
                .find(|d| !is_environment_facing(&d.name))
                .ok_or_else(|| CameraError::AcquisitionFailed("no user-facing camera".to_string())),
            None => devices
                .into_iter()
                .next()
                .ok_or_else(|| CameraError::AcquisitionFailed("no capture devices".to_string())),
        }
    }
}

impl CameraCapability for V4l2Camera {
    fn is_supported(&self) -> bool {
        let Ok(entries) = std::fs::read_dir("/dev") else {
            return false;
        };
        entries
            .flatten()
            .any(|e| e.file_name().to_string_lossy().starts_with("video"))
    }

    fn acquire(
        &self,
        constraints: StreamConstraints,
    ) -> BoxFuture<'static, Result<Box<dyn MediaStream>, CameraError>> {
        let camera = self.clone();
        Box::pin(async move {
            let device = tokio::task::spawn_blocking(move || camera.select(constraints))
                .await
                .map_err(|e| CameraError::AcquisitionFailed(e.to_string()))??;

            info!(
                device = %device.path,
                name = %device.name,
                ?constraints,
                "Opening V4L2 camera"
            );

            let stream = V4l2Stream::start(device).await?;
            Ok(Box::new(stream) as Box<dyn MediaStream>)
        })
    }
}

/// Card names hinting at a rear / world-facing camera
fn is_environment_facing(card: &str) -> bool {
    let card = card.to_lowercase();
    ENVIRONMENT_HINTS.iter().any(|hint| card.contains(hint))
}

/// Enumerate video capture nodes
///
/// Nodes that cannot be opened are skipped; if every node was refused with a
/// permission error the whole enumeration reports permission denied.
pub fn list_devices() -> Result<Vec<CameraDevice>, CameraError> {
    let entries = std::fs::read_dir("/dev")?;

    let mut paths: Vec<String> = entries
        .flatten()
        .filter_map(|e| {
            let name = e.file_name().to_string_lossy().to_string();
            name.starts_with("video").then(|| format!("/dev/{}", name))
        })
        .collect();
    paths.sort_by_key(|p| {
        p.trim_start_matches("/dev/video")
            .parse::<u32>()
            .unwrap_or(u32::MAX)
    });

    let mut devices = Vec::new();
    let mut denied = None;

    for path in paths {
        let dev = match Device::with_path(&path) {
            Ok(dev) => dev,
            Err(e) => {
                let err = CameraError::from(e);
                debug!(path = %path, error = %err, "Skipping video node");
                if err.is_permission() {
                    denied = Some(err);
                }
                continue;
            }
        };

        let caps = match dev.query_caps() {
            Ok(caps) => caps,
            Err(e) => {
                debug!(path = %path, error = %e, "Failed to query capabilities");
                continue;
            }
        };

        if !caps.capabilities.contains(Flags::VIDEO_CAPTURE) {
            debug!(path = %path, "Not a capture node");
            continue;
        }

        devices.push(CameraDevice {
            name: caps.card,
            path,
            driver: caps.driver,
        });
    }

    match (devices.is_empty(), denied) {
        (true, Some(err)) => Err(err),
        _ => Ok(devices),
    }
}

/// A running V4L2 capture
pub struct V4l2Stream {
    label: String,
    running: Arc<AtomicBool>,
    latest: LatestFrame,
}

impl V4l2Stream {
    /// Spawn the capture thread and wait for it to start streaming
    async fn start(device: CameraDevice) -> Result<Self, CameraError> {
        let running = Arc::new(AtomicBool::new(true));
        let latest: LatestFrame = Arc::new(Mutex::new(None));
        let (ready_tx, ready_rx) = oneshot::channel();

        let path = device.path.clone();
        let running_clone = Arc::clone(&running);
        let latest_clone = Arc::clone(&latest);
        std::thread::spawn(move || capture_loop(&path, ready_tx, running_clone, latest_clone));

        match ready_rx.await {
            Ok(Ok(())) => Ok(Self {
                label: format!("{} ({})", device.name, device.path),
                running,
                latest,
            }),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(CameraError::AcquisitionFailed(
                "capture thread exited during setup".to_string(),
            )),
        }
    }
}

impl MediaStream for V4l2Stream {
    fn label(&self) -> &str {
        &self.label
    }

    fn current_frame(&self) -> Option<CameraFrame> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn stop(&mut self) {
        if self.running.swap(false, Ordering::SeqCst) {
            info!(source = %self.label, "Stopping V4L2 capture");
        }
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

impl Drop for V4l2Stream {
    fn drop(&mut self) {
        // The thread notices on its next dequeue; don't block on it here
        self.running.store(false, Ordering::SeqCst);
    }
}

/// Open, negotiate and stream until `running` is cleared
fn capture_loop(
    path: &str,
    ready: oneshot::Sender<Result<(), CameraError>>,
    running: Arc<AtomicBool>,
    latest: LatestFrame,
) {
    static FRAME_COUNTER: AtomicU64 = AtomicU64::new(0);

    let yuyv = FourCC::new(b"YUYV");
    let mjpg = FourCC::new(b"MJPG");

    let mut dev = match Device::with_path(path) {
        Ok(dev) => dev,
        Err(e) => {
            let _ = ready.send(Err(CameraError::from(e)));
            return;
        }
    };

    let format = match negotiate_format(&mut dev, yuyv, mjpg) {
        Ok(format) => format,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };

    let mut stream = match MmapStream::with_buffers(&mut dev, Type::VideoCapture, V4L2_BUFFER_COUNT)
    {
        Ok(stream) => stream,
        Err(e) => {
            let _ = ready.send(Err(CameraError::from(e)));
            return;
        }
    };

    info!(
        path,
        width = format.width,
        height = format.height,
        fourcc = ?format.fourcc,
        "V4L2 capture stream started"
    );

    if ready.send(Ok(())).is_err() {
        debug!(path, "Acquisition abandoned before stream start");
        return;
    }

    while running.load(Ordering::SeqCst) {
        let buf = match stream.next() {
            Ok((buf, _meta)) => buf,
            Err(e) => {
                warn!(error = %e, "Failed to capture frame");
                std::thread::sleep(std::time::Duration::from_millis(10));
                continue;
            }
        };

        let frame_num = FRAME_COUNTER.fetch_add(1, Ordering::Relaxed);

        let frame = if format.fourcc == mjpg {
            match mjpeg_to_rgb(buf) {
                Ok((width, height, rgb)) => CameraFrame::new(width, height, rgb, PixelFormat::RGB24),
                Err(e) => {
                    if frame_num % 30 == 0 {
                        warn!(frame = frame_num, error = %e, "Dropping undecodable MJPEG frame");
                    }
                    continue;
                }
            }
        } else {
            let rgb = yuyv_to_rgb(buf, format.width, format.height);
            CameraFrame::new(format.width, format.height, rgb, PixelFormat::RGB24)
        };

        if !running.load(Ordering::SeqCst) {
            break;
        }
        *latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(frame);

        if frame_num % 60 == 0 {
            debug!(frame = frame_num, size = buf.len(), "Camera frame captured");
        }
    }

    info!(path, "V4L2 capture loop ended");
}

/// Keep YUYV or MJPEG if already configured, otherwise ask for YUYV
fn negotiate_format(
    dev: &mut Device,
    yuyv: FourCC,
    mjpg: FourCC,
) -> Result<v4l::Format, CameraError> {
    let current = dev.format()?;
    if current.fourcc == yuyv || current.fourcc == mjpg {
        return Ok(current);
    }

    let mut wanted = current;
    wanted.fourcc = yuyv;
    let set = dev.set_format(&wanted)?;
    if set.fourcc != yuyv && set.fourcc != mjpg {
        error!(got = ?set.fourcc, "Device refused YUYV");
        return Err(CameraError::AcquisitionFailed(format!(
            "unsupported pixel format {}",
            set.fourcc
        )));
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_hints() {
        assert!(is_environment_facing("Rear Camera"));
        assert!(is_environment_facing("imx219 back"));
        assert!(is_environment_facing("World-facing sensor"));
        assert!(!is_environment_facing("Integrated Webcam"));
    }
}
