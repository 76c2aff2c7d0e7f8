// SPDX-License-Identifier: GPL-3.0-only

//! Gesture interpretation
//!
//! Turns drag/pinch streams and the control buttons into session writes.
//! Intermediate gesture updates only preview; the update flagged `last`
//! previews and then commits, so one gesture yields at most one history entry.

use super::rotation::RotationSlider;
use super::{Session, Transform};
use crate::constants::transform;
use tracing::debug;

/// One drag update
///
/// `dx`/`dy` are the total movement since the gesture started, not the
/// movement since the previous update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragUpdate {
    pub dx: f64,
    pub dy: f64,
    pub last: bool,
}

/// One pinch update
///
/// `scale` is the cumulative scale factor since the gesture started and
/// `angle` the cumulative rotation in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchUpdate {
    pub scale: f64,
    pub angle: f64,
    pub last: bool,
}

/// Direction for the 90° rotation buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateDirection {
    Clockwise,
    CounterClockwise,
}

impl RotateDirection {
    fn degrees(self) -> f64 {
        match self {
            RotateDirection::Clockwise => transform::ROTATE_STEP_DEGREES,
            RotateDirection::CounterClockwise => -transform::ROTATE_STEP_DEGREES,
        }
    }
}

/// Converts gestures and control presses into previews and commits
#[derive(Debug, Clone, Default)]
pub struct GestureInterpreter {
    /// Offset when the current drag began
    drag_origin: Option<(f64, f64)>,
    /// Scale and rotation when the current pinch began
    pinch_origin: Option<(f64, f64)>,
    slider: RotationSlider,
}

impl GestureInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one drag update
    pub fn drag(&mut self, session: &mut Session, update: DragUpdate) {
        let current = session.read();
        let (origin_x, origin_y) = *self.drag_origin.get_or_insert((current.x, current.y));

        let next = current.with_offset(origin_x + update.dx, origin_y + update.dy);
        session.preview(next);

        if update.last {
            self.drag_origin = None;
            session.commit(next);
            debug!(x = next.x, y = next.y, "Drag finished");
        }
    }

    /// Feed one pinch update
    pub fn pinch(&mut self, session: &mut Session, update: PinchUpdate) {
        let current = session.read();
        let (origin_scale, origin_rotation) = *self
            .pinch_origin
            .get_or_insert((current.scale, current.rotation));

        let next = current
            .with_scale(Transform::clamp_scale(origin_scale * update.scale))
            .with_rotation(origin_rotation + update.angle);
        session.preview(next);

        if update.last {
            self.pinch_origin = None;
            session.commit(next);
            debug!(scale = next.scale, rotation = next.rotation, "Pinch finished");
        }
    }

    /// Zoom button: add `delta` to the scale (clamped) and commit
    pub fn zoom_by(&mut self, session: &mut Session, delta: f64) -> bool {
        let current = session.read();
        let next = current.with_scale(Transform::clamp_scale(current.scale + delta));
        Self::apply_now(session, next)
    }

    pub fn zoom_in(&mut self, session: &mut Session) -> bool {
        self.zoom_by(session, transform::ZOOM_STEP)
    }

    pub fn zoom_out(&mut self, session: &mut Session) -> bool {
        self.zoom_by(session, -transform::ZOOM_STEP)
    }

    /// 90° button: relative, never snapped or wrapped
    pub fn rotate_90(&mut self, session: &mut Session, direction: RotateDirection) -> bool {
        let current = session.read();
        let next = current.with_rotation(current.rotation + direction.degrees());
        Self::apply_now(session, next)
    }

    /// Reset button: back to identity, recorded in the history
    pub fn reset(&mut self, session: &mut Session) -> bool {
        self.drag_origin = None;
        self.pinch_origin = None;
        Self::apply_now(session, Transform::IDENTITY)
    }

    pub fn undo(&mut self, session: &mut Session) -> Option<Transform> {
        session.undo()
    }

    pub fn redo(&mut self, session: &mut Session) -> Option<Transform> {
        session.redo()
    }

    pub fn slider_input(&mut self, session: &mut Session, value: f64) {
        self.slider.input(session, value);
    }

    pub fn slider_release(&mut self, session: &mut Session) -> bool {
        self.slider.release(session)
    }

    /// A gesture is in progress (drag, pinch or slider)
    pub fn is_gesturing(&self) -> bool {
        self.drag_origin.is_some() || self.pinch_origin.is_some() || self.slider.is_dragging()
    }

    /// Buttons have no intermediate phase
    fn apply_now(session: &mut Session, next: Transform) -> bool {
        session.preview(next);
        session.commit(next)
    }
}
