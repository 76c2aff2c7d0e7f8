// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the virtual camera
//!
//! Nothing in here is fatal: camera failures are folded into
//! [`CameraStatus`](crate::backends::camera::CameraStatus) and capture failures
//! are logged and turned into "no output" by the capture pipeline.

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera acquisition errors
    Camera(CameraError),
    /// Capture / compositing errors
    Capture(CaptureError),
    /// Configuration errors
    Config(String),
    /// Storage/filesystem errors
    Storage(String),
    /// Generic error with message
    Other(String),
}

/// Errors reported by a camera capability
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// The user (or the system policy) refused access to the camera
    PermissionDenied(String),
    /// The platform has no camera capability at all
    Unsupported,
    /// Acquisition failed for any other reason (busy, not found, bad format...)
    AcquisitionFailed(String),
}

impl CameraError {
    /// Permission-class errors are terminal and never retried
    pub fn is_permission(&self) -> bool {
        matches!(self, CameraError::PermissionDenied(_))
    }
}

/// Errors raised while producing a capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The selected image could not be decoded
    Decode(String),
    /// Compositing the output surface failed
    Draw(String),
    /// JPEG encoding failed
    Encode(String),
    /// The view was torn down while the capture was in flight
    Cancelled,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Capture(e) => write!(f, "Capture error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            CameraError::Unsupported => write!(f, "Camera capability not available"),
            CameraError::AcquisitionFailed(msg) => write!(f, "Acquisition failed: {}", msg),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::Decode(msg) => write!(f, "Image decode failed: {}", msg),
            CaptureError::Draw(msg) => write!(f, "Compositing failed: {}", msg),
            CaptureError::Encode(msg) => write!(f, "Encoding failed: {}", msg),
            CaptureError::Cancelled => write!(f, "Capture cancelled"),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for CaptureError {}

impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<CaptureError> for AppError {
    fn from(err: CaptureError) -> Self {
        AppError::Capture(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<std::io::Error> for CameraError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => CameraError::PermissionDenied(err.to_string()),
            _ => CameraError::AcquisitionFailed(err.to_string()),
        }
    }
}

impl From<image::ImageError> for CaptureError {
    fn from(err: image::ImageError) -> Self {
        CaptureError::Encode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_permission_maps_to_permission_denied() {
        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "EACCES");
        assert!(CameraError::from(err).is_permission());

        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such device");
        assert!(!CameraError::from(err).is_permission());
    }

    #[test]
    fn test_display_wraps_sub_errors() {
        let err: AppError = CaptureError::Draw("empty viewport".into()).into();
        assert_eq!(
            err.to_string(),
            "Capture error: Compositing failed: empty viewport"
        );
    }
}
