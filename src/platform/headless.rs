//! Headless platform that replays scripted input
//!
//! A replay script is JSON: a list of `{ "frame": n, "events": [...] }`
//! entries. Each frame the platform pushes that frame's events into the same
//! queue a window would use.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::events::{EventSender, PlatformEvent};
use crate::error::EngineError;

/// Events to inject before a given frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayEntry {
    pub frame: u64,
    #[serde(default)]
    pub events: Vec<PlatformEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplayScript {
    pub entries: Vec<ReplayEntry>,
}

impl ReplayScript {
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let json = std::fs::read_to_string(path).map_err(|e| EngineError::io(path, e))?;
        let mut script: ReplayScript =
            serde_json::from_str(&json).map_err(|e| EngineError::parse(path, e))?;
        script.entries.sort_by_key(|e| e.frame);
        log::info!(
            "Loaded replay {} ({} entries)",
            path.display(),
            script.entries.len()
        );
        Ok(script)
    }

    /// Frame of the last scripted event
    pub fn last_frame(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.frame).max()
    }
}

/// Feeds a replay into the event queue one frame at a time
#[derive(Debug)]
pub struct HeadlessPlatform {
    script: ReplayScript,
    sender: EventSender,
    cursor: usize,
    frame: u64,
}

impl HeadlessPlatform {
    pub fn new(mut script: ReplayScript, sender: EventSender) -> Self {
        script.entries.sort_by_key(|e| e.frame);
        Self {
            script,
            sender,
            cursor: 0,
            frame: 0,
        }
    }

    /// Queue this frame's events and move to the next frame
    pub fn pump(&mut self) {
        while let Some(entry) = self.script.entries.get(self.cursor) {
            if entry.frame > self.frame {
                break;
            }
            for event in &entry.events {
                self.sender.send(*event);
            }
            self.cursor += 1;
        }
        self.frame += 1;
    }

    /// Every scripted event has been sent
    pub fn finished(&self) -> bool {
        self.cursor >= self.script.entries.len()
    }
}
