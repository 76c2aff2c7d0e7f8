// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// JPEG quality used for each capture path
///
/// Each capture mode encodes at a fixed quality; the value is not user-tunable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureQuality {
    /// Composited virtual feed (highest quality, the user framed it on purpose)
    Virtual,
    /// Snapshot of the live camera stream
    Live,
    /// Synthesized placeholder frame
    Placeholder,
}

impl CaptureQuality {
    /// All quality levels, highest first
    pub const ALL: [CaptureQuality; 3] = [
        CaptureQuality::Virtual,
        CaptureQuality::Live,
        CaptureQuality::Placeholder,
    ];

    /// Get display name for the capture path
    pub fn display_name(&self) -> &'static str {
        match self {
            CaptureQuality::Virtual => "Virtual",
            CaptureQuality::Live => "Live",
            CaptureQuality::Placeholder => "Placeholder",
        }
    }

    /// Lossy quality as a fraction (0.0 - 1.0)
    pub fn fraction(&self) -> f32 {
        match self {
            CaptureQuality::Virtual => 0.92,
            CaptureQuality::Live => 0.85,
            CaptureQuality::Placeholder => 0.80,
        }
    }

    /// JPEG encoder quality value (1-100)
    pub fn jpeg_quality(&self) -> u8 {
        (self.fraction() * 100.0).round() as u8
    }
}

/// Transform limits and control steps
pub mod transform {
    /// Smallest allowed zoom
    pub const MIN_SCALE: f64 = 0.5;

    /// Largest allowed zoom
    pub const MAX_SCALE: f64 = 5.0;

    /// Zoom button increment
    pub const ZOOM_STEP: f64 = 0.1;

    /// Rotation button increment in degrees
    pub const ROTATE_STEP_DEGREES: f64 = 90.0;
}

/// Minimum per-field change for a commit to become a new history entry
pub mod history {
    /// Pixels, applies to x and y independently
    pub const POSITION_EPSILON: f64 = 0.1;

    pub const SCALE_EPSILON: f64 = 0.001;

    /// Degrees
    pub const ROTATION_EPSILON: f64 = 0.1;
}

/// Rotation slider range in degrees
pub mod slider {
    pub const MIN_DEGREES: f64 = -180.0;
    pub const MAX_DEGREES: f64 = 180.0;
}

/// Capture output parameters
pub mod capture {
    /// Placeholder frame width
    pub const PLACEHOLDER_WIDTH: u32 = 640;

    /// Placeholder frame height
    pub const PLACEHOLDER_HEIGHT: u32 = 480;

    /// Placeholder fill (#101010)
    pub const PLACEHOLDER_COLOR: [u8; 3] = [0x10, 0x10, 0x10];

    /// Virtual-feed background behind exposed edges
    pub const BACKGROUND_COLOR: [u8; 3] = [0, 0, 0];

    /// Prefix for delivered capture files
    pub const FILE_PREFIX: &str = "vcam_capture";

    /// Extension for delivered capture files
    pub const FILE_EXTENSION: &str = "jpg";
}

/// Capture feedback timing
pub mod feedback {
    use super::Duration;

    /// How long the white flash stays on screen
    pub const FLASH_DURATION: Duration = Duration::from_millis(150);

    /// Peak flash opacity
    pub const FLASH_OPACITY: f32 = 0.8;

    /// Confirmation toast lifetime
    pub const TOAST_DURATION: Duration = Duration::from_secs(3);

    pub const VIRTUAL_SAVED_MESSAGE: &str = "Virtual image saved";
    pub const IMAGE_SAVED_MESSAGE: &str = "Image saved";
}

/// Viewport defaults (the capture area of a phone-sized window)
pub mod viewport {
    pub const DEFAULT_WIDTH: f64 = 375.0;
    pub const DEFAULT_HEIGHT: f64 = 640.0;
    pub const DEFAULT_DEVICE_PIXEL_RATIO: f64 = 1.0;
}

/// Platform camera settings
pub mod camera {
    /// Number of mmap buffers for the V4L2 capture stream
    pub const V4L2_BUFFER_COUNT: u32 = 4;

    /// Card-name hints for an environment-facing (rear) camera
    pub const ENVIRONMENT_HINTS: [&str; 4] = ["back", "rear", "world", "environment"];
}
