// SPDX-License-Identifier: GPL-3.0-only
//! Pixel format conversion for camera frames
//!
//! Capture devices deliver YUYV or MJPEG; everything downstream works on
//! tightly packed RGB24.

use crate::errors::CaptureError;

/// Convert YUYV (YUV 4:2:2) to RGB24
///
/// YUYV format: Y0 U0 Y1 V0 - each 4-byte group encodes 2 pixels.
/// Uses BT.601 coefficients for YUV to RGB conversion. Missing trailing input
/// is padded with black so the output always has `width * height` pixels.
pub fn yuyv_to_rgb(data: &[u8], width: u32, height: u32) -> Vec<u8> {
    let pixel_count = width as usize * height as usize;
    let mut rgb = Vec::with_capacity(pixel_count * 3);

    'outer: for chunk in data.chunks_exact(4) {
        let y0 = chunk[0] as f32;
        let u = chunk[1] as f32 - 128.0;
        let y1 = chunk[2] as f32;
        let v = chunk[3] as f32 - 128.0;

        for y in [y0, y1] {
            if rgb.len() >= pixel_count * 3 {
                break 'outer;
            }
            rgb.push((y + 1.402 * v).clamp(0.0, 255.0) as u8);
            rgb.push((y - 0.344 * u - 0.714 * v).clamp(0.0, 255.0) as u8);
            rgb.push((y + 1.772 * u).clamp(0.0, 255.0) as u8);
        }
    }

    rgb.resize(pixel_count * 3, 0);
    rgb
}

/// Decode an MJPEG frame to RGB24
///
/// Returns the decoded dimensions, which win over whatever the driver
/// reported for the stream.
pub fn mjpeg_to_rgb(data: &[u8]) -> Result<(u32, u32, Vec<u8>), CaptureError> {
    let decoded = image::load_from_memory_with_format(data, image::ImageFormat::Jpeg)
        .map_err(|e| CaptureError::Decode(e.to_string()))?
        .into_rgb8();
    let (width, height) = decoded.dimensions();
    Ok((width, height, decoded.into_raw()))
}

/// Drop the alpha channel from RGBA data
pub fn rgba_to_rgb(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for chunk in rgba.chunks_exact(4) {
        rgb.extend_from_slice(&chunk[..3]);
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yuyv_grey_is_neutral() {
        // Y=128 with neutral chroma is mid grey for both pixels
        let rgb = yuyv_to_rgb(&[128, 128, 128, 128], 2, 1);
        assert_eq!(rgb, vec![128, 128, 128, 128, 128, 128]);
    }

    #[test]
    fn test_yuyv_pads_short_input() {
        let rgb = yuyv_to_rgb(&[255, 128, 255, 128], 2, 2);
        assert_eq!(rgb.len(), 12);
        assert_eq!(&rgb[..3], &[255, 255, 255]);
        assert_eq!(&rgb[6..], &[0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_rgba_to_rgb() {
        let rgb = rgba_to_rgb(&[1, 2, 3, 255, 4, 5, 6, 0]);
        assert_eq!(rgb, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_mjpeg_rejects_garbage() {
        assert!(matches!(
            mjpeg_to_rgb(&[0, 1, 2, 3]),
            Err(CaptureError::Decode(_))
        ));
    }
}
