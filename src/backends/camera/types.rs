// SPDX-License-Identifier: GPL-3.0-only
// Shared types for camera backend abstraction

//! Shared types for camera backends

use std::sync::Arc;

/// Lifecycle state of the device camera
///
/// `PermissionDenied` and `Simulated` are terminal for the mounted view; the
/// only way out is tearing down and mounting again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraStatus {
    /// Acquisition in flight
    #[default]
    Initializing,
    /// A stream is running
    Live,
    /// Access was refused
    PermissionDenied,
    /// No usable camera; the view shows a no-signal state
    Simulated,
}

impl CameraStatus {
    /// Acquisition has finished one way or another
    pub fn is_settled(&self) -> bool {
        !matches!(self, CameraStatus::Initializing)
    }
}

impl std::fmt::Display for CameraStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraStatus::Initializing => write!(f, "initializing"),
            CameraStatus::Live => write!(f, "live"),
            CameraStatus::PermissionDenied => write!(f, "permission denied"),
            CameraStatus::Simulated => write!(f, "simulated"),
        }
    }
}

/// Which way the requested camera should face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacingMode {
    /// Rear / world-facing camera
    Environment,
    /// Front / selfie camera
    User,
}

/// Constraints for a stream request
///
/// The default (no facing mode) accepts any video source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamConstraints {
    pub facing_mode: Option<FacingMode>,
}

impl StreamConstraints {
    /// Preferred request: the rear camera
    pub fn environment() -> Self {
        Self {
            facing_mode: Some(FacingMode::Environment),
        }
    }

    /// Fallback request: any camera
    pub fn any() -> Self {
        Self { facing_mode: None }
    }
}

/// Pixel layout of a [`CameraFrame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// RGB24 - 3 bytes per pixel
    RGB24,
    /// RGBA - 4 bytes per pixel, alpha ignored
    RGBA,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::RGB24 => 3,
            PixelFormat::RGBA => 4,
        }
    }
}

/// A decoded frame from a live stream
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Tightly packed pixel rows
    pub data: Arc<[u8]>,
    pub format: PixelFormat,
}

impl CameraFrame {
    pub fn new(width: u32, height: u32, data: impl Into<Arc<[u8]>>, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            data: data.into(),
            format,
        }
    }

    /// Byte length a frame of this size and format must have
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel()
    }
}

/// A video capture node found on the system
#[derive(Debug, Clone)]
pub struct CameraDevice {
    /// Card name reported by the driver
    pub name: String,
    /// Device node (e.g. /dev/video0)
    pub path: String,
    /// Driver name
    pub driver: String,
}
