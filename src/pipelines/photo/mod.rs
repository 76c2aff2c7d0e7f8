// SPDX-License-Identifier: GPL-3.0-only

//! Async photo capture pipeline
//!
//! ```text
//! Session + camera ──snapshot──▶ CaptureRequest ──▶ render ──▶ JPEG ──▶ CaptureOutput
//!                                    │
//!                                    ├─ Virtual:     decode → composite  (q 0.92)
//!                                    ├─ Live:        native frame copy   (q 0.85)
//!                                    └─ Placeholder: 640×480 #101010     (q 0.80)
//! ```
//!
//! Inputs are snapshotted when capture is requested, so gestures that land
//! while the image decodes do not leak into the output. Capture never fails
//! towards the caller: errors are logged and the invocation yields nothing.

pub mod capture;
pub mod compositing;
pub mod encoding;

pub use compositing::{Viewport, VirtualScene};
pub use encoding::{EncodedImage, PhotoEncoder};

use crate::backends::camera::{CameraDeviceManager, CameraFrame, CameraStatus};
use crate::constants::CaptureQuality;
use crate::errors::CaptureError;
use crate::feedback::CaptureFeedback;
use crate::session::{ImageHandle, Session};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Which of the three capture paths produced an output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    Virtual,
    Live,
    Placeholder,
}

impl CaptureMode {
    pub fn quality(self) -> CaptureQuality {
        match self {
            CaptureMode::Virtual => CaptureQuality::Virtual,
            CaptureMode::Live => CaptureQuality::Live,
            CaptureMode::Placeholder => CaptureQuality::Placeholder,
        }
    }
}

/// Capture inputs frozen at the moment the shutter was pressed
#[derive(Debug, Clone)]
pub enum CaptureRequest {
    Virtual {
        image: ImageHandle,
        scene: VirtualScene,
    },
    Live {
        frame: CameraFrame,
    },
    Placeholder,
}

impl CaptureRequest {
    /// Pick the capture path for the current state
    ///
    /// Returns `None` while the camera is still initializing; the shutter is
    /// disabled then.
    pub fn snapshot(
        session: &Session,
        status: CameraStatus,
        frame: Option<CameraFrame>,
        viewport: Viewport,
    ) -> Option<Self> {
        if status == CameraStatus::Initializing {
            return None;
        }

        let state = session.state();
        if state.shows_virtual_feed()
            && let Some(image) = state.selected_image()
        {
            return Some(CaptureRequest::Virtual {
                image: image.clone(),
                scene: VirtualScene {
                    transform: state.transform(),
                    aspect: state.aspect_mode(),
                    viewport,
                },
            });
        }

        match (status, frame) {
            (CameraStatus::Live, Some(frame)) => Some(CaptureRequest::Live { frame }),
            _ => Some(CaptureRequest::Placeholder),
        }
    }

    pub fn mode(&self) -> CaptureMode {
        match self {
            CaptureRequest::Virtual { .. } => CaptureMode::Virtual,
            CaptureRequest::Live { .. } => CaptureMode::Live,
            CaptureRequest::Placeholder => CaptureMode::Placeholder,
        }
    }
}

/// One finished capture
#[derive(Debug, Clone)]
pub struct CaptureOutput {
    pub id: Uuid,
    pub mode: CaptureMode,
    pub image: EncodedImage,
}

/// Cancels captures that are still in flight
#[derive(Debug, Clone)]
pub struct CaptureCanceller {
    alive: Arc<AtomicBool>,
}

impl CaptureCanceller {
    pub fn cancel(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

/// Capture orchestration for one camera view
pub struct CapturePipeline {
    encoder: PhotoEncoder,
    feedback: CaptureFeedback,
    alive: Arc<AtomicBool>,
}

impl Default for CapturePipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl CapturePipeline {
    pub fn new() -> Self {
        Self {
            encoder: PhotoEncoder::new(),
            feedback: CaptureFeedback::new(),
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn feedback(&self) -> &CaptureFeedback {
        &self.feedback
    }

    /// Handle for tearing the view down while a capture is running
    pub fn canceller(&self) -> CaptureCanceller {
        CaptureCanceller {
            alive: Arc::clone(&self.alive),
        }
    }

    /// Shutter pressed in the camera view
    pub async fn capture(
        &mut self,
        session: &Session,
        camera: &CameraDeviceManager,
        viewport: Viewport,
    ) -> Option<CaptureOutput> {
        let request = CaptureRequest::snapshot(
            session,
            camera.status(),
            camera.current_frame(),
            viewport,
        );
        match request {
            Some(request) => self.run(request).await,
            None => {
                debug!("Shutter disabled while the camera initializes");
                None
            }
        }
    }

    /// Produce an output for an already-snapshotted request
    pub async fn run(&mut self, request: CaptureRequest) -> Option<CaptureOutput> {
        let mode = request.mode();
        self.feedback.trigger_flash(Instant::now());
        info!(?mode, "Capturing");

        match self.produce(request).await {
            Ok(output) => {
                self.feedback.notify(mode, Instant::now());
                info!(
                    ?mode,
                    width = output.image.width,
                    height = output.image.height,
                    size = output.image.data.len(),
                    "Capture complete"
                );
                Some(output)
            }
            Err(CaptureError::Cancelled) => {
                debug!(?mode, "Capture discarded after teardown");
                None
            }
            Err(e) => {
                error!(?mode, error = %e, "Capture failed");
                None
            }
        }
    }

    async fn produce(&self, request: CaptureRequest) -> Result<CaptureOutput, CaptureError> {
        let mode = request.mode();

        let surface = match request {
            CaptureRequest::Virtual { image, scene } => {
                let source = compositing::decode(&image).await?;
                self.ensure_alive()?;
                tokio::task::spawn_blocking(move || compositing::render_virtual(&source, &scene))
                    .await
                    .map_err(|e| CaptureError::Draw(format!("compositing task error: {}", e)))??
            }
            CaptureRequest::Live { frame } => capture::snapshot_live(&frame)?,
            CaptureRequest::Placeholder => capture::placeholder(),
        };

        let image = self.encoder.encode(surface, mode.quality()).await?;
        self.ensure_alive()?;

        Ok(CaptureOutput {
            id: Uuid::new_v4(),
            mode,
            image,
        })
    }

    fn ensure_alive(&self) -> Result<(), CaptureError> {
        if self.alive.load(Ordering::SeqCst) {
            Ok(())
        } else {
            warn!("Camera view gone, dropping capture result");
            Err(CaptureError::Cancelled)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Transform;

    fn image() -> ImageHandle {
        ImageHandle::from_bytes(vec![0u8; 4])
    }

    #[test]
    fn test_snapshot_gated_while_initializing() {
        let mut session = Session::default();
        session.select_image_and_activate(image());
        assert!(
            CaptureRequest::snapshot(&session, CameraStatus::Initializing, None, Viewport::default())
                .is_none()
        );
    }

    #[test]
    fn test_snapshot_mode_selection() {
        let frame = CameraFrame::new(2, 2, vec![0u8; 12], crate::backends::camera::PixelFormat::RGB24);
        let mut session = Session::default();

        let live = CaptureRequest::snapshot(&session, CameraStatus::Live, Some(frame.clone()), Viewport::default());
        assert_eq!(live.map(|r| r.mode()), Some(CaptureMode::Live));

        let no_frame = CaptureRequest::snapshot(&session, CameraStatus::Live, None, Viewport::default());
        assert_eq!(no_frame.map(|r| r.mode()), Some(CaptureMode::Placeholder));

        let denied = CaptureRequest::snapshot(&session, CameraStatus::PermissionDenied, None, Viewport::default());
        assert_eq!(denied.map(|r| r.mode()), Some(CaptureMode::Placeholder));

        // A selected but inactive image does not switch to the virtual path
        session.select_image(image());
        let inactive = CaptureRequest::snapshot(&session, CameraStatus::Live, Some(frame.clone()), Viewport::default());
        assert_eq!(inactive.map(|r| r.mode()), Some(CaptureMode::Live));

        session.set_active(true);
        let virtual_ = CaptureRequest::snapshot(&session, CameraStatus::Live, Some(frame), Viewport::default());
        assert_eq!(virtual_.map(|r| r.mode()), Some(CaptureMode::Virtual));
    }

    #[test]
    fn test_snapshot_freezes_transform() {
        let mut session = Session::default();
        session.select_image_and_activate(image());
        session.commit(Transform::new(2.0, 0.0, 0.0, 0.0));

        let request =
            CaptureRequest::snapshot(&session, CameraStatus::Simulated, None, Viewport::default())
                .unwrap();
        session.commit(Transform::new(4.0, 0.0, 0.0, 0.0));

        match request {
            CaptureRequest::Virtual { scene, .. } => assert_eq!(scene.transform.scale, 2.0),
            other => panic!("expected virtual request, got {:?}", other.mode()),
        }
    }

    #[tokio::test]
    async fn test_undecodable_image_yields_no_output_or_toast() {
        let mut session = Session::default();
        session.select_image_and_activate(image());
        let request =
            CaptureRequest::snapshot(&session, CameraStatus::Simulated, None, Viewport::default())
                .unwrap();

        let mut pipeline = CapturePipeline::new();
        assert!(pipeline.run(request).await.is_none());

        let now = Instant::now();
        assert!(pipeline.feedback().active_toast(now).is_none());
    }

    #[tokio::test]
    async fn test_cancelled_capture_is_dropped() {
        let mut pipeline = CapturePipeline::new();
        pipeline.canceller().cancel();
        assert!(pipeline.run(CaptureRequest::Placeholder).await.is_none());
    }
}
