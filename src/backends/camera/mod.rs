// SPDX-License-Identifier: GPL-3.0-only

//! Camera backend abstraction
//!
//! The core never talks to a platform media API directly. It sees a
//! [`CameraCapability`] that can hand out a [`MediaStream`], and the
//! [`CameraDeviceManager`] that runs the acquisition state machine on top:
//!
//! ```text
//! ┌──────────────────────┐
//! │  Capture pipeline    │  ← reads status + latest frame
//! └──────────┬───────────┘
//!            │
//!            ▼
//! ┌──────────────────────┐
//! │ CameraDeviceManager  │  ← Initializing → Live / PermissionDenied / Simulated
//! └──────────┬───────────┘
//!            │
//!            ▼
//! ┌──────────────────────┐
//! │ CameraCapability     │  ← acquire(constraints) / stream.stop()
//! └──────────┬───────────┘
//!            │
//!            ▼
//!       ┌────────┐
//!       │  V4L2  │  ← Linux implementation
//!       └────────┘
//! ```

pub mod format_converters;
pub mod manager;
pub mod types;
#[cfg(target_os = "linux")]
pub mod v4l2;

pub use manager::CameraDeviceManager;
pub use types::*;

use crate::errors::CameraError;
use futures::future::BoxFuture;
use std::sync::Arc;

/// A running camera stream
///
/// Owned by the [`CameraDeviceManager`]; nothing else holds it.
pub trait MediaStream: Send {
    /// Human-readable source name
    fn label(&self) -> &str;

    /// Latest decoded frame, if the stream has produced one yet
    fn current_frame(&self) -> Option<CameraFrame>;

    /// Stop the stream and release the device. Calling twice is harmless.
    fn stop(&mut self);
}

/// Platform camera access
pub trait CameraCapability: Send + Sync {
    /// Whether the platform offers camera access at all
    fn is_supported(&self) -> bool;

    /// Request a stream matching `constraints`
    ///
    /// Permission failures must be reported as
    /// [`CameraError::PermissionDenied`] so the manager does not retry them.
    fn acquire(
        &self,
        constraints: StreamConstraints,
    ) -> BoxFuture<'static, Result<Box<dyn MediaStream>, CameraError>>;
}

/// Capability for platforms without camera support
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCamera;

impl CameraCapability for NoCamera {
    fn is_supported(&self) -> bool {
        false
    }

    fn acquire(
        &self,
        _constraints: StreamConstraints,
    ) -> BoxFuture<'static, Result<Box<dyn MediaStream>, CameraError>> {
        Box::pin(async { Err(CameraError::Unsupported) })
    }
}

/// The camera capability for this platform
///
/// `preferred_device` names the node treated as environment-facing.
pub fn platform_camera(preferred_device: Option<String>) -> Arc<dyn CameraCapability> {
    #[cfg(target_os = "linux")]
    {
        Arc::new(v4l2::V4l2Camera::new(preferred_device))
    }

    #[cfg(not(target_os = "linux"))]
    {
        let _ = preferred_device;
        Arc::new(NoCamera)
    }
}
