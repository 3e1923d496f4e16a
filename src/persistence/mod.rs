//! Level progress persistence
//!
//! Progress is a plain text file holding one integer: the index of the highest
//! unlocked level. A missing or unreadable file is not fatal, the game just
//! starts from the first level.

use std::path::{Path, PathBuf};

use crate::error::EngineError;

/// Default progress file name, next to the executable's working directory
pub const PROGRESS_FILE: &str = "progress.txt";

/// Progress file handle
#[derive(Debug, Clone)]
pub struct Progress {
    path: PathBuf,
}

impl Progress {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the saved level, clamped to `[0, level_count)`.
    ///
    /// Missing or garbled files give level 0 with a warning.
    pub fn load(&self, level_count: usize) -> usize {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) => {
                log::warn!(
                    "No progress read from {} ({}), starting at level 1",
                    self.path.display(),
                    e
                );
                return 0;
            }
        };

        let level = match text.trim().parse::<i64>() {
            Ok(level) => level,
            Err(_) => {
                log::warn!(
                    "Progress file {} is not a number: {:?}",
                    self.path.display(),
                    text.trim()
                );
                return 0;
            }
        };

        let max = level_count.saturating_sub(1) as i64;
        let clamped = level.clamp(0, max) as usize;
        if clamped as i64 != level {
            log::warn!("Saved level {} out of range, using {}", level, clamped);
        }
        log::info!("Loaded progress: level {}", clamped + 1);
        clamped
    }

    /// Write the unlocked level index
    pub fn save(&self, level: u32) -> Result<(), EngineError> {
        std::fs::write(&self.path, level.to_string())
            .map_err(|e| EngineError::io(&self.path, e))?;
        log::info!("Progress saved (level {})", level + 1);
        Ok(())
    }
}
