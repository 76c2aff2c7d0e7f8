// SPDX-License-Identifier: GPL-3.0-only

//! Rotation slider reconciliation
//!
//! The slider covers one turn (-180..180) while the stored rotation keeps every
//! turn accumulated by pinches and the 90° buttons. Moving the slider replaces
//! the angle within the current turn and keeps the turn count, so the image
//! never jumps by a multiple of 360°.

use super::Session;
use crate::constants::slider;

/// Principal value of a rotation, in [-180, 180)
pub fn phase(rotation: f64) -> f64 {
    ((rotation % 360.0) + 540.0) % 360.0 - 180.0
}

/// Whole turns accumulated in a rotation
pub fn turns(rotation: f64) -> i64 {
    ((rotation - phase(rotation)) / 360.0).round() as i64
}

/// Rotation after moving the slider to `slider_value`, keeping the turn count
pub fn apply_slider(rotation: f64, slider_value: f64) -> f64 {
    let value = slider_value.clamp(slider::MIN_DEGREES, slider::MAX_DEGREES);
    turns(rotation) as f64 * 360.0 + value
}

/// Rotation slider control
///
/// Slider moves are previews; one commit happens when the pointer is released.
#[derive(Debug, Clone, Default)]
pub struct RotationSlider {
    dragging: bool,
}

impl RotationSlider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value the slider should display for the current rotation
    pub fn display_value(session: &Session) -> f64 {
        phase(session.read().rotation)
    }

    /// Slider moved
    pub fn input(&mut self, session: &mut Session, value: f64) {
        self.dragging = true;
        let current = session.read();
        session.preview(current.with_rotation(apply_slider(current.rotation, value)));
    }

    /// Pointer released; commits whatever the slider last previewed
    pub fn release(&mut self, session: &mut Session) -> bool {
        self.dragging = false;
        session.commit(session.read())
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_range() {
        assert_eq!(phase(0.0), 0.0);
        assert_eq!(phase(270.0), -90.0);
        assert_eq!(phase(180.0), -180.0);
        assert_eq!(phase(-190.0), 170.0);
        assert_eq!(phase(725.0), 5.0);
    }

    #[test]
    fn test_turns() {
        assert_eq!(turns(0.0), 0);
        assert_eq!(turns(270.0), 1);
        assert_eq!(turns(725.0), 2);
        assert_eq!(turns(-190.0), -1);
    }

    #[test]
    fn test_apply_slider_keeps_turns() {
        assert_eq!(apply_slider(270.0, 10.0), 370.0);
        assert_eq!(apply_slider(0.0, -45.0), -45.0);
        assert_eq!(apply_slider(-190.0, 0.0), -360.0);
    }

    #[test]
    fn test_slider_commits_once_on_release() {
        let mut session = Session::default();
        let mut slider = RotationSlider::new();

        for value in [5.0, 10.0, 20.0, 30.0] {
            slider.input(&mut session, value);
        }
        assert!(slider.is_dragging());
        assert_eq!(session.history().len(), 1);

        assert!(slider.release(&mut session));
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.read().rotation, 30.0);
    }
}
