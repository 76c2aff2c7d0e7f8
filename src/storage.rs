// SPDX-License-Identifier: GPL-3.0-only

//! Output delivery for finished captures

use crate::constants::capture::{FILE_EXTENSION, FILE_PREFIX};
use crate::errors::{AppError, AppResult};
use crate::pipelines::photo::CaptureOutput;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Something that accepts encoded captures
///
/// The capture pipeline does not care how bytes are persisted; the front end
/// hands each [`CaptureOutput`] to a sink.
pub trait OutputSink {
    /// Persist one capture, returning where it went
    fn deliver(&self, output: &CaptureOutput) -> AppResult<PathBuf>;
}

/// Writes captures as `vcam_capture_<unix-millis>.jpg` into a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    open_after: bool,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            open_after: false,
        }
    }

    /// Hand each saved file to the desktop's default viewer
    pub fn open_after(mut self, open_after: bool) -> Self {
        self.open_after = open_after;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Pick a file name that does not exist yet
    fn next_path(&self) -> PathBuf {
        let millis = chrono::Utc::now().timestamp_millis();
        let base = format!("{}_{}", FILE_PREFIX, millis);

        let mut path = self.dir.join(format!("{}.{}", base, FILE_EXTENSION));
        let mut n = 1;
        while path.exists() {
            path = self.dir.join(format!("{}_{}.{}", base, n, FILE_EXTENSION));
            n += 1;
        }
        path
    }
}

impl OutputSink for DirectorySink {
    fn deliver(&self, output: &CaptureOutput) -> AppResult<PathBuf> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            AppError::Storage(format!(
                "Failed to create output directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let path = self.next_path();
        std::fs::write(&path, &output.image.data)
            .map_err(|e| AppError::Storage(format!("Failed to save capture: {}", e)))?;

        info!(
            path = %path.display(),
            mode = ?output.mode,
            size = output.image.data.len(),
            "Capture saved"
        );

        if self.open_after
            && let Err(e) = open::that_detached(&path)
        {
            warn!(path = %path.display(), error = %e, "Failed to open capture");
        }

        Ok(path)
    }
}
