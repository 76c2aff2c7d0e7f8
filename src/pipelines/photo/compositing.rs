// SPDX-License-Identifier: GPL-3.0-only

//! Virtual-feed compositing
//!
//! Re-renders exactly what the viewport shows: the selected image fitted to
//! the viewport (cover or stretch), then moved, rotated and scaled around the
//! viewport centre, on an opaque black background. Output pixels are the
//! viewport size times the device pixel ratio.

use crate::constants::{capture, viewport};
use crate::errors::CaptureError;
use crate::session::{AspectMode, ImageHandle, Transform};
use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use std::sync::Arc;
use tracing::debug;

/// On-screen viewport the virtual feed is drawn into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in logical (CSS) pixels
    pub width: f64,
    /// Height in logical (CSS) pixels
    pub height: f64,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// Output surface size in device pixels
    ///
    /// Fractional sizes are truncated, like a canvas backing store.
    pub fn output_size(&self) -> Result<(u32, u32), CaptureError> {
        let width = (self.width * self.device_pixel_ratio).floor();
        let height = (self.height * self.device_pixel_ratio).floor();

        if !(width >= 1.0 && height >= 1.0) || !width.is_finite() || !height.is_finite() {
            return Err(CaptureError::Draw(format!(
                "empty output surface {}x{} at dpr {}",
                self.width, self.height, self.device_pixel_ratio
            )));
        }
        Ok((width as u32, height as u32))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(
            viewport::DEFAULT_WIDTH,
            viewport::DEFAULT_HEIGHT,
            viewport::DEFAULT_DEVICE_PIXEL_RATIO,
        )
    }
}

/// Everything the compositor needs, captured at the moment of the request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VirtualScene {
    pub transform: Transform,
    pub aspect: AspectMode,
    pub viewport: Viewport,
}

/// Size the image is drawn at before the transform is applied
///
/// `Cover` keeps the aspect ratio and fills the whole viewport, overflowing on
/// one axis. `Fill` stretches to the viewport exactly.
pub fn render_size(
    image_width: f64,
    image_height: f64,
    viewport_width: f64,
    viewport_height: f64,
    aspect: AspectMode,
) -> (f64, f64) {
    match aspect {
        AspectMode::Fill => (viewport_width, viewport_height),
        AspectMode::Cover => {
            let image_aspect = image_width / image_height;
            let viewport_aspect = viewport_width / viewport_height;
            if image_aspect > viewport_aspect {
                (image_width * (viewport_height / image_height), viewport_height)
            } else {
                (viewport_width, image_height * (viewport_width / image_width))
            }
        }
    }
}

/// Decode the selected image off the async thread
///
/// Transparent areas are flattened onto black, matching the background the
/// image is drawn over.
pub async fn decode(image: &ImageHandle) -> Result<RgbImage, CaptureError> {
    let bytes: Arc<[u8]> = Arc::clone(image.bytes());

    tokio::task::spawn_blocking(move || {
        let decoded =
            image::load_from_memory(&bytes).map_err(|e| CaptureError::Decode(e.to_string()))?;
        debug!(
            width = decoded.width(),
            height = decoded.height(),
            "Decoded selected image"
        );
        Ok(flatten_on_black(&decoded.into_rgba8()))
    })
    .await
    .map_err(|e| CaptureError::Decode(format!("decode task error: {}", e)))?
}

fn flatten_on_black(rgba: &image::RgbaImage) -> RgbImage {
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = a as u16;
        Rgb([
            (r as u16 * alpha / 255) as u8,
            (g as u16 * alpha / 255) as u8,
            (b as u16 * alpha / 255) as u8,
        ])
    })
}

/// Draw `source` into a new output surface for `scene`
pub fn render_virtual(source: &RgbImage, scene: &VirtualScene) -> Result<RgbImage, CaptureError> {
    let (out_width, out_height) = scene.viewport.output_size()?;
    let (image_width, image_height) = source.dimensions();
    if image_width == 0 || image_height == 0 {
        return Err(CaptureError::Draw("source image has no pixels".to_string()));
    }

    let vp = scene.viewport;
    let (render_width, render_height) = render_size(
        image_width as f64,
        image_height as f64,
        vp.width,
        vp.height,
        scene.aspect,
    );

    let t = scene.transform;
    debug!(
        out_width,
        out_height,
        render_width,
        render_height,
        transform = %t,
        aspect = ?scene.aspect,
        "Compositing virtual frame"
    );

    // Padded source index -> device pixel index, applied in this order. The
    // half-pixel shifts at both ends sample at pixel centres.
    let projection = Projection::translate(-0.5, -0.5)
        .and_then(Projection::scale(
            (render_width / image_width as f64) as f32,
            (render_height / image_height as f64) as f32,
        ))
        .and_then(Projection::translate(
            (-render_width / 2.0) as f32,
            (-render_height / 2.0) as f32,
        ))
        .and_then(Projection::scale(t.scale as f32, t.scale as f32))
        .and_then(Projection::rotate(t.rotation_radians() as f32))
        .and_then(Projection::translate(t.x as f32, t.y as f32))
        .and_then(Projection::translate(
            (vp.width / 2.0) as f32,
            (vp.height / 2.0) as f32,
        ))
        .and_then(Projection::scale(
            vp.device_pixel_ratio as f32,
            vp.device_pixel_ratio as f32,
        ))
        .and_then(Projection::translate(-0.5, -0.5));

    let background = Rgb(capture::BACKGROUND_COLOR);
    let mut output = RgbImage::from_pixel(out_width, out_height, background);
    warp_into(
        &pad_edges(source),
        &projection,
        Interpolation::Bilinear,
        background,
        &mut output,
    );

    Ok(output)
}

/// Copy `source` with a one-pixel border repeating its outermost pixels
///
/// Bilinear sampling reads the neighbour to the right and below, so without
/// the border the last column and row of the image would sample as
/// background.
fn pad_edges(source: &RgbImage) -> RgbImage {
    let (width, height) = source.dimensions();
    RgbImage::from_fn(width + 2, height + 2, |x, y| {
        let sx = x.saturating_sub(1).min(width - 1);
        let sy = y.saturating_sub(1).min(height - 1);
        *source.get_pixel(sx, sy)
    })
}
