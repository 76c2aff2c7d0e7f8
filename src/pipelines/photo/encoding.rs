// SPDX-License-Identifier: GPL-3.0-only

//! Async JPEG encoding
//!
//! Every capture path encodes JPEG at its own fixed quality. Encoding runs on
//! the blocking pool so the caller's loop stays responsive.

use crate::constants::CaptureQuality;
use crate::errors::CaptureError;
use image::RgbImage;
use tracing::{debug, info};

/// Encoded image data ready for delivery
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub quality: CaptureQuality,
}

/// Photo encoder
#[derive(Debug, Default, Clone, Copy)]
pub struct PhotoEncoder;

impl PhotoEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encode an RGB surface asynchronously
    pub async fn encode(
        &self,
        image: RgbImage,
        quality: CaptureQuality,
    ) -> Result<EncodedImage, CaptureError> {
        info!(
            width = image.width(),
            height = image.height(),
            quality = quality.jpeg_quality(),
            "Starting encoding"
        );

        tokio::task::spawn_blocking(move || Self::encode_blocking(&image, quality))
            .await
            .map_err(|e| CaptureError::Encode(format!("encoding task error: {}", e)))?
    }

    /// Encode on the current thread
    pub fn encode_blocking(
        image: &RgbImage,
        quality: CaptureQuality,
    ) -> Result<EncodedImage, CaptureError> {
        let data = Self::encode_jpeg(image, quality)?;
        debug!(size = data.len(), "Encoding complete");

        Ok(EncodedImage {
            data,
            width: image.width(),
            height: image.height(),
            quality,
        })
    }

    fn encode_jpeg(image: &RgbImage, quality: CaptureQuality) -> Result<Vec<u8>, CaptureError> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);

        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality.jpeg_quality());

        encoder.encode(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgb8,
        )?;

        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_encode_produces_jpeg() {
        let image = RgbImage::from_pixel(16, 8, Rgb([200, 10, 10]));
        let encoded = PhotoEncoder::encode_blocking(&image, CaptureQuality::Live).unwrap();

        assert_eq!(&encoded.data[..2], &[0xFF, 0xD8]);
        assert_eq!((encoded.width, encoded.height), (16, 8));
        assert_eq!(encoded.quality, CaptureQuality::Live);
    }

    #[test]
    fn test_higher_quality_is_not_smaller() {
        let image = RgbImage::from_fn(64, 64, |x, y| Rgb([(x * 4) as u8, (y * 4) as u8, 128]));
        let low = PhotoEncoder::encode_blocking(&image, CaptureQuality::Placeholder).unwrap();
        let high = PhotoEncoder::encode_blocking(&image, CaptureQuality::Virtual).unwrap();
        assert!(high.data.len() >= low.data.len());
    }
}
