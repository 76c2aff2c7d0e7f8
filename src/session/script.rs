// SPDX-License-Identifier: GPL-3.0-only

//! Recorded gesture scripts
//!
//! A script is a JSON array of input events, replayed through the
//! [`GestureInterpreter`] exactly as live input would be:
//!
//! ```json
//! [
//!   { "type": "pinch", "scale": 1.5, "angle": 20 },
//!   { "type": "pinch", "scale": 2.3, "angle": 45, "last": true },
//!   { "type": "rotate_cw" },
//!   { "type": "undo" }
//! ]
//! ```

use super::gestures::{DragUpdate, GestureInterpreter, PinchUpdate, RotateDirection};
use super::Session;
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One recorded input event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GestureEvent {
    Drag {
        dx: f64,
        dy: f64,
        #[serde(default)]
        last: bool,
    },
    Pinch {
        scale: f64,
        angle: f64,
        #[serde(default)]
        last: bool,
    },
    ZoomIn,
    ZoomOut,
    RotateCw,
    RotateCcw,
    Reset,
    Undo,
    Redo,
    Slider {
        value: f64,
    },
    SliderRelease,
    AspectRatio {
        maintain: bool,
    },
}

impl GestureEvent {
    /// Apply this event to the session
    pub fn apply(&self, gestures: &mut GestureInterpreter, session: &mut Session) {
        match *self {
            GestureEvent::Drag { dx, dy, last } => {
                gestures.drag(session, DragUpdate { dx, dy, last })
            }
            GestureEvent::Pinch { scale, angle, last } => {
                gestures.pinch(session, PinchUpdate { scale, angle, last })
            }
            GestureEvent::ZoomIn => {
                gestures.zoom_in(session);
            }
            GestureEvent::ZoomOut => {
                gestures.zoom_out(session);
            }
            GestureEvent::RotateCw => {
                gestures.rotate_90(session, RotateDirection::Clockwise);
            }
            GestureEvent::RotateCcw => {
                gestures.rotate_90(session, RotateDirection::CounterClockwise);
            }
            GestureEvent::Reset => {
                gestures.reset(session);
            }
            GestureEvent::Undo => {
                gestures.undo(session);
            }
            GestureEvent::Redo => {
                gestures.redo(session);
            }
            GestureEvent::Slider { value } => gestures.slider_input(session, value),
            GestureEvent::SliderRelease => {
                gestures.slider_release(session);
            }
            GestureEvent::AspectRatio { maintain } => session.set_maintain_aspect_ratio(maintain),
        }
    }
}

/// Parse a script from JSON text
pub fn parse(json: &str) -> AppResult<Vec<GestureEvent>> {
    Ok(serde_json::from_str(json)?)
}

/// Load a script file
pub fn load(path: &Path) -> AppResult<Vec<GestureEvent>> {
    let contents = std::fs::read_to_string(path)?;
    parse(&contents)
}

/// Replay every event in order
pub fn replay(events: &[GestureEvent], gestures: &mut GestureInterpreter, session: &mut Session) {
    for event in events {
        event.apply(gestures, session);
    }
}
