// SPDX-License-Identifier: GPL-3.0-only

//! Backend abstraction layer
//!
//! Hardware access lives behind the capability traits in [`camera`], so the
//! rest of the crate runs the same with a V4L2 device, a test fake, or no
//! camera at all.

pub mod camera;
