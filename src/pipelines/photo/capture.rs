// SPDX-License-Identifier: GPL-3.0-only

//! Live and placeholder frame capture
//!
//! The live path copies the latest camera frame pixel-for-pixel at its native
//! size; nothing from the virtual transform applies to it.

use crate::backends::camera::format_converters::rgba_to_rgb;
use crate::backends::camera::types::{CameraFrame, PixelFormat};
use crate::constants::capture;
use crate::errors::CaptureError;
use image::{Rgb, RgbImage};
use tracing::debug;

/// Snapshot a live frame into an RGB surface
pub fn snapshot_live(frame: &CameraFrame) -> Result<RgbImage, CaptureError> {
    if frame.width == 0 || frame.height == 0 {
        return Err(CaptureError::Draw("live frame has no pixels".to_string()));
    }
    if frame.data.len() < frame.expected_len() {
        return Err(CaptureError::Draw(format!(
            "live frame truncated: {} bytes, expected {}",
            frame.data.len(),
            frame.expected_len()
        )));
    }

    debug!(
        width = frame.width,
        height = frame.height,
        format = ?frame.format,
        "Snapshotting live frame"
    );

    let data = &frame.data[..frame.expected_len()];
    let rgb = match frame.format {
        PixelFormat::RGB24 => data.to_vec(),
        PixelFormat::RGBA => rgba_to_rgb(data),
    };

    RgbImage::from_raw(frame.width, frame.height, rgb)
        .ok_or_else(|| CaptureError::Draw("live frame buffer size mismatch".to_string()))
}

/// The fixed dark frame used when neither an image nor a camera is available
pub fn placeholder() -> RgbImage {
    RgbImage::from_pixel(
        capture::PLACEHOLDER_WIDTH,
        capture::PLACEHOLDER_HEIGHT,
        Rgb(capture::PLACEHOLDER_COLOR),
    )
}
