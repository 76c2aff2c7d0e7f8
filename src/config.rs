// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::viewport;
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Application directory name under the config and pictures directories
const APP_DIR: &str = "procam";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// User configuration
///
/// Stored as JSON. Unknown fields are ignored and missing fields take their
/// defaults, so older files keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Capture viewport width in CSS pixels
    pub viewport_width: f64,
    /// Capture viewport height in CSS pixels
    pub viewport_height: f64,
    /// Device pixel ratio applied to the viewport when compositing
    pub device_pixel_ratio: f64,
    /// Initial aspect mode: cover (true) or stretch (false)
    pub maintain_aspect_ratio: bool,
    /// Where captures are written (default: ~/Pictures/procam)
    pub output_dir: Option<PathBuf>,
    /// V4L2 node treated as the environment-facing camera (e.g. /dev/video2)
    pub preferred_device: Option<String>,
    /// Open each delivered capture with the desktop's default viewer
    pub open_after_capture: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            viewport_width: viewport::DEFAULT_WIDTH,
            viewport_height: viewport::DEFAULT_HEIGHT,
            device_pixel_ratio: viewport::DEFAULT_DEVICE_PIXEL_RATIO,
            maintain_aspect_ratio: true,
            output_dir: None,
            preferred_device: None,
            open_after_capture: false,
        }
    }
}

impl Config {
    /// Default config file location (`$XDG_CONFIG_HOME/procam/config.json`)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load the user config, falling back to defaults on any problem
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            warn!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load config, using defaults");
                Self::default()
            }
        }
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Write config to a specific file, creating parent directories
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Directory captures are delivered to
    pub fn photo_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(default_photo_dir)
    }
}

/// Default capture directory (`~/Pictures/procam`)
pub fn default_photo_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}
