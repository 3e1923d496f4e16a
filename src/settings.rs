//! Engine settings and preferences
//!
//! Loaded once at startup from a JSON file. A missing file means defaults; a
//! malformed file is a startup error.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::tuning::Tuning;

/// Engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Frame pacing ===
    /// Frame rate cap (frames per second)
    pub target_fps: u32,

    // === Render target ===
    /// Backbuffer width in pixels
    pub buffer_width: u32,
    /// Backbuffer height in pixels
    pub buffer_height: u32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Silence all audio
    pub muted: bool,

    // === Gameplay ===
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_fps: 60,

            buffer_width: 1920,
            buffer_height: 1080,

            master_volume: 0.3,
            sfx_volume: 1.0,
            music_volume: 0.3,
            muted: false,

            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file (defaults when the file does not exist)
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(EngineError::io(path, e)),
        };

        let settings: Settings =
            serde_json::from_str(&json).map_err(|e| EngineError::parse(path, e))?;
        log::info!(
            "Loaded settings from {} ({} fps, {}x{})",
            path.display(),
            settings.target_fps,
            settings.buffer_width,
            settings.buffer_height
        );
        Ok(settings)
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), EngineError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| EngineError::parse(path, e))?;
        std::fs::write(path, json).map_err(|e| EngineError::io(path, e))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
