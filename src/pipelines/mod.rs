// SPDX-License-Identifier: GPL-3.0-only

//! Processing pipelines
//!
//! - [`photo`]: still capture from the virtual feed, the live camera or a
//!   placeholder, encoded to JPEG off the caller's thread

pub mod photo;
