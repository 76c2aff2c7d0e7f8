// SPDX-License-Identifier: GPL-3.0-only

//! Transform and virtual-camera state types

use crate::constants::{history, transform};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Affine transform applied to the selected image
///
/// `rotation` is in degrees and is never wrapped: two clockwise turns are
/// stored as 720, not 0. Wrapping only happens for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub scale: f64,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
}

impl Transform {
    /// The identity transform {1, 0, 0, 0}
    pub const IDENTITY: Transform = Transform {
        scale: 1.0,
        x: 0.0,
        y: 0.0,
        rotation: 0.0,
    };

    pub fn new(scale: f64, x: f64, y: f64, rotation: f64) -> Self {
        Self {
            scale,
            x,
            y,
            rotation,
        }
    }

    /// Clamp a scale value into the allowed zoom range
    pub fn clamp_scale(scale: f64) -> f64 {
        if scale.is_nan() {
            return transform::MIN_SCALE;
        }
        scale.clamp(transform::MIN_SCALE, transform::MAX_SCALE)
    }

    /// Same transform with the scale clamped into range
    pub fn clamped(self) -> Self {
        Self {
            scale: Self::clamp_scale(self.scale),
            ..self
        }
    }

    pub fn with_offset(self, x: f64, y: f64) -> Self {
        Self { x, y, ..self }
    }

    pub fn with_scale(self, scale: f64) -> Self {
        Self { scale, ..self }
    }

    pub fn with_rotation(self, rotation: f64) -> Self {
        Self { rotation, ..self }
    }

    /// Whether two transforms are too close to be worth separate history entries
    pub fn is_near(&self, other: &Transform) -> bool {
        (self.x - other.x).abs() < history::POSITION_EPSILON
            && (self.y - other.y).abs() < history::POSITION_EPSILON
            && (self.scale - other.scale).abs() < history::SCALE_EPSILON
            && (self.rotation - other.rotation).abs() < history::ROTATION_EPSILON
    }

    /// Rotation in radians, for drawing
    pub fn rotation_radians(&self) -> f64 {
        self.rotation.to_radians()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::fmt::Display for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "scale={:.3} x={:.1} y={:.1} rotation={:.1}°",
            self.scale, self.x, self.y, self.rotation
        )
    }
}

/// How the image is fitted to the viewport before the transform is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectMode {
    /// Preserve aspect ratio and cover the whole viewport, cropping overflow
    Cover,
    /// Stretch to exactly the viewport's width and height
    Fill,
}

impl AspectMode {
    pub fn from_maintain(maintain_aspect_ratio: bool) -> Self {
        if maintain_aspect_ratio {
            AspectMode::Cover
        } else {
            AspectMode::Fill
        }
    }
}

/// Opaque handle to an encoded still image
///
/// Cloning is cheap (the bytes are shared). Every handle gets its own id, so
/// selecting the same file twice still counts as a new selection.
#[derive(Clone)]
pub struct ImageHandle {
    id: Uuid,
    bytes: Arc<[u8]>,
    name: Option<String>,
}

impl ImageHandle {
    /// Wrap encoded image bytes (JPEG, PNG, ...)
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            bytes: bytes.into(),
            name: None,
        }
    }

    /// Read an image file; decoding is deferred until capture
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(bytes).with_name(path.display().to_string()))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn bytes(&self) -> &Arc<[u8]> {
        &self.bytes
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl PartialEq for ImageHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl std::fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageHandle")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Virtual camera state owned by the application root
///
/// Fields are read-only from outside; mutation goes through
/// [`Session`](super::Session) so the invariants hold.
#[derive(Debug, Clone)]
pub struct CameraState {
    pub(super) is_active: bool,
    pub(super) selected_image: Option<ImageHandle>,
    pub(super) transform: Transform,
    pub(super) maintain_aspect_ratio: bool,
}

impl CameraState {
    pub fn new(maintain_aspect_ratio: bool) -> Self {
        Self {
            is_active: false,
            selected_image: None,
            transform: Transform::IDENTITY,
            maintain_aspect_ratio,
        }
    }

    /// Whether the virtual feed replaces the camera
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn selected_image(&self) -> Option<&ImageHandle> {
        self.selected_image.as_ref()
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn maintain_aspect_ratio(&self) -> bool {
        self.maintain_aspect_ratio
    }

    pub fn aspect_mode(&self) -> AspectMode {
        AspectMode::from_maintain(self.maintain_aspect_ratio)
    }

    /// The virtual feed is shown (active and an image is selected)
    pub fn shows_virtual_feed(&self) -> bool {
        self.is_active && self.selected_image.is_some()
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_scale_bounds() {
        assert_eq!(Transform::clamp_scale(100.0), 5.0);
        assert_eq!(Transform::clamp_scale(0.01), 0.5);
        assert_eq!(Transform::clamp_scale(-3.0), 0.5);
        assert_eq!(Transform::clamp_scale(2.5), 2.5);
        assert_eq!(Transform::clamp_scale(f64::NAN), 0.5);
    }

    #[test]
    fn test_is_near_thresholds() {
        let base = Transform::IDENTITY;
        assert!(base.is_near(&Transform::new(1.0005, 0.05, -0.05, 0.05)));
        assert!(!base.is_near(&Transform::new(1.0, 0.1, 0.0, 0.0)));
        assert!(!base.is_near(&Transform::new(1.001, 0.0, 0.0, 0.0)));
        assert!(!base.is_near(&Transform::new(1.0, 0.0, 0.0, 0.1)));
    }

    #[test]
    fn test_image_handles_are_distinct() {
        let a = ImageHandle::from_bytes(vec![1u8, 2, 3]);
        let b = ImageHandle::from_bytes(vec![1u8, 2, 3]);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }
}
