// SPDX-License-Identifier: GPL-3.0-only

//! Camera lifecycle manager
//!
//! Acquires the camera when the view mounts and releases it on teardown:
//!
//! ```text
//! Initializing ──(environment ok)──────────────────────────▶ Live
//!      │
//!      ├──(permission error)───────────────────────────────▶ PermissionDenied
//!      ├──(no capability)──────────────────────────────────▶ Simulated
//!      └──(other error)──▶ retry unconstrained ──(ok)──────▶ Live
//!                                 ├──(permission error)────▶ PermissionDenied
//!                                 └──(other error)─────────▶ Simulated
//! ```
//!
//! Acquisition runs as a spawned task. A liveness flag guards every write the
//! task makes, so a result that arrives after teardown is dropped and a late
//! stream is stopped instead of leaked.

use super::types::{CameraFrame, CameraStatus, StreamConstraints};
use super::{CameraCapability, MediaStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// State shared between the manager and its acquisition task
struct Shared {
    /// Cleared on teardown
    alive: AtomicBool,
    /// The acquired stream; only ever touched here
    stream: Mutex<Option<Box<dyn MediaStream>>>,
    status: watch::Sender<CameraStatus>,
}

impl Shared {
    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    fn lock_stream(&self) -> MutexGuard<'_, Option<Box<dyn MediaStream>>> {
        self.stream.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move to a terminal failure state unless torn down
    ///
    /// Status writes happen under the stream lock, which teardown also takes,
    /// so nothing is published once teardown has returned.
    fn settle(&self, status: CameraStatus) {
        let _guard = self.lock_stream();
        if !self.is_alive() {
            debug!(%status, "Ignoring camera result after teardown");
            return;
        }
        self.status.send_replace(status);
    }

    /// Keep the stream and go live, or stop it if the view is gone
    fn install(&self, mut stream: Box<dyn MediaStream>) {
        let mut guard = self.lock_stream();
        if !self.is_alive() {
            drop(guard);
            debug!(source = stream.label(), "Stopping stream that arrived after teardown");
            stream.stop();
            return;
        }

        info!(source = stream.label(), "Camera stream live");
        *guard = Some(stream);
        self.status.send_replace(CameraStatus::Live);
    }
}

/// Camera lifecycle state machine for one mounted view
///
/// Create with [`mount`](Self::mount) when the view appears and call
/// [`teardown`](Self::teardown) (or drop it) when the view goes away. There is
/// no retry: remount to try again.
pub struct CameraDeviceManager {
    shared: Arc<Shared>,
    task: Option<JoinHandle<()>>,
}

impl CameraDeviceManager {
    /// Start acquiring the camera
    ///
    /// Returns immediately in [`CameraStatus::Initializing`]. Must be called
    /// from within a tokio runtime.
    pub fn mount(capability: Arc<dyn CameraCapability>) -> Self {
        info!("Mounting camera view");

        let (status, _) = watch::channel(CameraStatus::Initializing);
        let shared = Arc::new(Shared {
            alive: AtomicBool::new(true),
            stream: Mutex::new(None),
            status,
        });

        let task = tokio::spawn(acquire(Arc::clone(&shared), capability));

        Self {
            shared,
            task: Some(task),
        }
    }

    /// Current lifecycle state
    pub fn status(&self) -> CameraStatus {
        *self.shared.status.borrow()
    }

    /// Watch lifecycle changes
    pub fn subscribe(&self) -> watch::Receiver<CameraStatus> {
        self.shared.status.subscribe()
    }

    /// Wait until acquisition has settled
    ///
    /// Never resolves if the platform request never settles; race it against
    /// your own teardown signal in that case.
    pub async fn settled(&self) -> CameraStatus {
        let mut rx = self.subscribe();
        match rx.wait_for(CameraStatus::is_settled).await {
            Ok(status) => *status,
            Err(_) => self.status(),
        }
    }

    /// Whether the view is still mounted
    pub fn is_mounted(&self) -> bool {
        self.shared.is_alive()
    }

    /// Latest frame from the live stream
    ///
    /// This is the presentation surface: callers get frames, never the stream.
    pub fn current_frame(&self) -> Option<CameraFrame> {
        if !self.shared.is_alive() {
            return None;
        }
        self.shared.lock_stream().as_ref()?.current_frame()
    }

    /// Release the camera
    ///
    /// Stops any acquired stream and makes a still-pending acquisition discard
    /// its result. Safe to call more than once.
    pub fn teardown(&self) {
        if !self.shared.alive.swap(false, Ordering::SeqCst) {
            return;
        }

        info!(status = %self.status(), "Tearing down camera view");

        let stream = self.shared.lock_stream().take();
        if let Some(mut stream) = stream {
            debug!(source = stream.label(), "Stopping camera stream");
            stream.stop();
        }
    }

    /// Wait for the acquisition task to finish
    ///
    /// Useful after [`teardown`](Self::teardown) when the caller wants the late
    /// result to be fully disposed of.
    pub async fn join(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "Camera acquisition task failed");
            }
        }
    }
}

impl Drop for CameraDeviceManager {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Acquisition task: environment camera first, then any camera once
async fn acquire(shared: Arc<Shared>, capability: Arc<dyn CameraCapability>) {
    if !capability.is_supported() {
        warn!("Camera capability not supported, using simulated feed");
        shared.settle(CameraStatus::Simulated);
        return;
    }

    let result = match capability.acquire(StreamConstraints::environment()).await {
        Ok(stream) => Ok(stream),
        Err(e) if e.is_permission() => Err(e),
        Err(e) => {
            if !shared.is_alive() {
                debug!("Teardown during acquisition, skipping fallback");
                return;
            }
            warn!(error = %e, "Environment camera failed, trying fallback");
            capability.acquire(StreamConstraints::any()).await
        }
    };

    match result {
        Ok(stream) => shared.install(stream),
        Err(e) if e.is_permission() => {
            warn!(error = %e, "Camera permission denied");
            shared.settle(CameraStatus::PermissionDenied);
        }
        Err(e) => {
            error!(error = %e, "Camera initialization failed");
            shared.settle(CameraStatus::Simulated);
        }
    }
}
