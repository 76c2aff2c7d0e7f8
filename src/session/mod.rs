// SPDX-License-Identifier: GPL-3.0-only

//! Application root state
//!
//! [`Session`] is the single owner of the virtual camera state and its undo
//! history. Everything else (gesture handling, capture) gets a reference and
//! goes through the setters here, which keep the invariants:
//!
//! - the virtual feed can only be active while an image is selected
//! - selecting or clearing an image resets the transform and the history
//! - scale stays within the zoom bounds on every write
//!
//! Writes come in two tiers. [`Session::preview`] updates what is drawn and
//! nothing else; [`Session::commit`] does the same and records the transform in
//! the history. Gestures preview on every move and commit once on release.

pub mod gestures;
pub mod history;
pub mod rotation;
pub mod script;
pub mod state;

pub use gestures::{DragUpdate, GestureInterpreter, PinchUpdate, RotateDirection};
pub use history::HistoryStack;
pub use rotation::RotationSlider;
pub use state::{AspectMode, CameraState, ImageHandle, Transform};

use crate::backends::camera::CameraStatus;
use tracing::{debug, info};

/// Result of pressing the virtual-feed toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The virtual feed is now on (`true`) or off (`false`)
    Toggled(bool),
    /// No image is selected; the caller should open its image picker
    NeedsImage,
}

/// What the camera view shows in place of (or on top of) the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    /// Waiting for camera acquisition
    Loading,
    /// Camera access refused; offer image upload instead
    PermissionDenied,
    /// No camera signal
    NoSignal,
    /// The device camera feed
    LiveCamera,
    /// The transformed still image
    VirtualFeed,
}

/// Owner of the virtual camera state and its history
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: CameraState,
    history: HistoryStack,
}

impl Session {
    pub fn new(maintain_aspect_ratio: bool) -> Self {
        Self {
            state: CameraState::new(maintain_aspect_ratio),
            history: HistoryStack::new(),
        }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    /// Current transform
    pub fn read(&self) -> Transform {
        self.state.transform
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    /// Select a new image; transform and history start over
    pub fn select_image(&mut self, image: ImageHandle) {
        info!(image = ?image.name(), "Selected image");
        self.state.selected_image = Some(image);
        self.state.transform = Transform::IDENTITY;
        self.history.reset();
    }

    /// Select a new image and switch the virtual feed on
    pub fn select_image_and_activate(&mut self, image: ImageHandle) {
        self.select_image(image);
        self.state.is_active = true;
    }

    /// Remove the selected image; the virtual feed goes off
    pub fn clear_image(&mut self) {
        info!("Cleared selected image");
        self.state.selected_image = None;
        self.state.is_active = false;
        self.state.transform = Transform::IDENTITY;
        self.history.reset();
    }

    /// Switch the virtual feed on or off
    ///
    /// Returns the resulting flag. Turning the feed on without an image is
    /// ignored.
    pub fn set_active(&mut self, active: bool) -> bool {
        if active && self.state.selected_image.is_none() {
            debug!("Ignoring virtual feed activation without an image");
            return self.state.is_active;
        }
        self.state.is_active = active;
        self.state.is_active
    }

    pub fn toggle_virtual(&mut self) -> ToggleOutcome {
        if self.state.selected_image.is_none() {
            return ToggleOutcome::NeedsImage;
        }
        ToggleOutcome::Toggled(self.set_active(!self.state.is_active))
    }

    /// Switch between cover and stretch; the transform is left as is
    pub fn set_maintain_aspect_ratio(&mut self, maintain: bool) {
        self.state.maintain_aspect_ratio = maintain;
    }

    /// Transient write: redraw only, no history
    pub fn preview(&mut self, transform: Transform) {
        self.state.transform = transform.clamped();
    }

    /// History-tracked write
    ///
    /// Returns whether a history entry was added (near-duplicates are not).
    pub fn commit(&mut self, transform: Transform) -> bool {
        let transform = transform.clamped();
        self.state.transform = transform;
        let pushed = self.history.push(transform);
        if pushed {
            debug!(%transform, index = self.history.index(), "Committed transform");
        }
        pushed
    }

    /// Restore the previous history entry without recording a new one
    pub fn undo(&mut self) -> Option<Transform> {
        let restored = self.history.undo()?;
        self.state.transform = restored;
        Some(restored)
    }

    /// Restore the next history entry without recording a new one
    pub fn redo(&mut self) -> Option<Transform> {
        let restored = self.history.redo()?;
        self.state.transform = restored;
        Some(restored)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Indicator for the camera view given the device status
    pub fn indicator(&self, status: CameraStatus) -> Indicator {
        if self.state.shows_virtual_feed() {
            return Indicator::VirtualFeed;
        }
        match status {
            CameraStatus::Initializing => Indicator::Loading,
            CameraStatus::PermissionDenied => Indicator::PermissionDenied,
            CameraStatus::Simulated => Indicator::NoSignal,
            CameraStatus::Live => Indicator::LiveCamera,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> ImageHandle {
        ImageHandle::from_bytes(vec![0u8; 4])
    }

    #[test]
    fn test_activation_requires_image() {
        let mut session = Session::default();
        assert!(!session.set_active(true));
        assert_eq!(session.toggle_virtual(), ToggleOutcome::NeedsImage);

        session.select_image(image());
        assert!(!session.state().is_active());
        assert_eq!(session.toggle_virtual(), ToggleOutcome::Toggled(true));
        assert_eq!(session.toggle_virtual(), ToggleOutcome::Toggled(false));
    }

    #[test]
    fn test_clear_image_deactivates() {
        let mut session = Session::default();
        session.select_image_and_activate(image());
        session.commit(Transform::new(2.0, 5.0, 5.0, 0.0));
        session.clear_image();

        assert!(!session.state().is_active());
        assert!(session.state().selected_image().is_none());
        assert_eq!(session.read(), Transform::IDENTITY);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_preview_does_not_touch_history() {
        let mut session = Session::default();
        session.preview(Transform::new(2.0, 10.0, 0.0, 0.0));
        assert_eq!(session.read().scale, 2.0);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_undo_redo_do_not_push() {
        let mut session = Session::default();
        session.commit(Transform::new(2.0, 0.0, 0.0, 0.0));
        session.commit(Transform::new(3.0, 0.0, 0.0, 0.0));

        assert_eq!(session.undo().map(|t| t.scale), Some(2.0));
        assert_eq!(session.history().len(), 3);
        assert_eq!(session.redo().map(|t| t.scale), Some(3.0));
        assert_eq!(session.history().len(), 3);
    }

    #[test]
    fn test_indicator() {
        let mut session = Session::default();
        assert_eq!(session.indicator(CameraStatus::Initializing), Indicator::Loading);
        assert_eq!(
            session.indicator(CameraStatus::PermissionDenied),
            Indicator::PermissionDenied
        );
        assert_eq!(session.indicator(CameraStatus::Simulated), Indicator::NoSignal);
        assert_eq!(session.indicator(CameraStatus::Live), Indicator::LiveCamera);

        session.select_image_and_activate(image());
        assert_eq!(
            session.indicator(CameraStatus::PermissionDenied),
            Indicator::VirtualFeed
        );
    }
}
