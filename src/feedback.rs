// SPDX-License-Identifier: GPL-3.0-only

//! Capture feedback: the shutter flash and the confirmation toast
//!
//! Both are plain timestamps checked against a caller-supplied `now`, so the
//! UI loop (or a test) decides when time passes.

use crate::constants::feedback::{
    FLASH_DURATION, FLASH_OPACITY, IMAGE_SAVED_MESSAGE, TOAST_DURATION, VIRTUAL_SAVED_MESSAGE,
};
use crate::pipelines::photo::CaptureMode;
use std::time::Instant;

/// Confirmation notification shown after a successful capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toast {
    pub message: &'static str,
    pub shown_at: Instant,
}

impl Toast {
    pub fn is_visible(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) < TOAST_DURATION
    }
}

/// Flash + toast state for the camera view
#[derive(Debug, Clone, Default)]
pub struct CaptureFeedback {
    flash_started: Option<Instant>,
    toast: Option<Toast>,
}

impl CaptureFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the full-screen flash
    pub fn trigger_flash(&mut self, now: Instant) {
        self.flash_started = Some(now);
    }

    /// Show the toast for a finished capture
    ///
    /// A new toast replaces the old one and restarts the dismiss timer.
    pub fn notify(&mut self, mode: CaptureMode, now: Instant) {
        let message = match mode {
            CaptureMode::Virtual => VIRTUAL_SAVED_MESSAGE,
            CaptureMode::Live | CaptureMode::Placeholder => IMAGE_SAVED_MESSAGE,
        };
        self.toast = Some(Toast {
            message,
            shown_at: now,
        });
    }

    pub fn is_flashing(&self, now: Instant) -> bool {
        self.flash_started
            .is_some_and(|start| now.saturating_duration_since(start) < FLASH_DURATION)
    }

    /// Overlay opacity for the flash (0 when not flashing)
    pub fn flash_opacity(&self, now: Instant) -> f32 {
        if self.is_flashing(now) {
            FLASH_OPACITY
        } else {
            0.0
        }
    }

    /// The toast, if it has not been dismissed yet
    pub fn active_toast(&self, now: Instant) -> Option<&Toast> {
        self.toast.as_ref().filter(|toast| toast.is_visible(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_flash_lasts_150ms() {
        let start = Instant::now();
        let mut feedback = CaptureFeedback::new();
        assert!(!feedback.is_flashing(start));

        feedback.trigger_flash(start);
        assert_eq!(feedback.flash_opacity(start), 0.8);
        assert!(feedback.is_flashing(start + Duration::from_millis(149)));
        assert!(!feedback.is_flashing(start + Duration::from_millis(150)));
    }

    #[test]
    fn test_toast_text_and_dismissal() {
        let start = Instant::now();
        let mut feedback = CaptureFeedback::new();

        feedback.notify(CaptureMode::Virtual, start);
        assert_eq!(
            feedback.active_toast(start).map(|t| t.message),
            Some("Virtual image saved")
        );
        assert!(feedback.active_toast(start + Duration::from_secs(3)).is_none());

        feedback.notify(CaptureMode::Placeholder, start);
        assert_eq!(
            feedback.active_toast(start).map(|t| t.message),
            Some("Image saved")
        );
    }
}
