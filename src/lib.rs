// SPDX-License-Identifier: GPL-3.0-only

//! procam - a virtual camera
//!
//! A still image stands in for the device camera. The user frames it with
//! drag, pinch and button gestures (with undo/redo), and the shutter captures
//! exactly what the viewport shows. When no image is active the real camera is
//! captured instead, or a placeholder frame if there is none.
//!
//! # Architecture
//!
//! - [`session`]: transform state, history, gestures and the rotation slider
//! - [`backends`]: camera capability abstraction and lifecycle state machine
//! - [`pipelines`]: capture pipeline (compositing, live snapshot, JPEG)
//! - [`feedback`]: shutter flash and confirmation toast
//! - [`storage`]: delivery of encoded captures
//! - [`config`]: user configuration handling

pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod feedback;
pub mod pipelines;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use backends::camera::{CameraDeviceManager, CameraStatus};
pub use config::Config;
pub use constants::CaptureQuality;
pub use errors::{AppError, AppResult, CameraError, CaptureError};
pub use pipelines::photo::{CaptureMode, CaptureOutput, CapturePipeline, Viewport};
pub use session::{GestureInterpreter, Session, Transform};
pub use storage::{DirectorySink, OutputSink};
