//! Audio dispatch
//!
//! The simulation only names sound effects; an [`AudioBackend`] turns them into
//! sound. Mixing and device handling stay behind the backend.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use crate::error::EngineError;
use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Jump started
    Jump,
    /// Coin picked up
    Coin,
    /// Bump (loaded with the others, currently unused by gameplay)
    Hit,
    /// Level finished
    Completed,
    /// Player died
    Failed,
    /// Menu button pressed
    Select,
    /// Background music
    Theme,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 7] = [
        SoundEffect::Jump,
        SoundEffect::Coin,
        SoundEffect::Hit,
        SoundEffect::Completed,
        SoundEffect::Failed,
        SoundEffect::Select,
        SoundEffect::Theme,
    ];

    /// File name under the assets directory
    pub fn file_name(self) -> &'static str {
        match self {
            SoundEffect::Jump => "jump 1.wav",
            SoundEffect::Coin => "coin.wav",
            SoundEffect::Hit => "hit.wav",
            SoundEffect::Completed => "completed.wav",
            SoundEffect::Failed => "failed.wav",
            SoundEffect::Select => "select.wav",
            SoundEffect::Theme => "song.wav",
        }
    }

    /// Music loops; everything else is one-shot
    pub fn looping(self) -> bool {
        matches!(self, SoundEffect::Theme)
    }

    pub fn is_music(self) -> bool {
        matches!(self, SoundEffect::Theme)
    }
}

/// Something that can actually make noise
pub trait AudioBackend {
    /// Start playing `effect`; fire and forget
    fn play(&mut self, effect: SoundEffect, volume: f32, looping: bool);
}

/// Backend that only logs (headless runs)
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32, looping: bool) {
        log::debug!(
            "play {:?} (volume {:.2}{})",
            effect,
            volume,
            if looping { ", looping" } else { "" }
        );
    }
}

/// One recorded `play` call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayedSound {
    pub effect: SoundEffect,
    pub volume: f32,
    pub looping: bool,
}

/// Backend that remembers every call; clones share the same log
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    played: Rc<RefCell<Vec<PlayedSound>>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything played so far
    pub fn played(&self) -> Vec<PlayedSound> {
        self.played.borrow().clone()
    }

    /// Just the effects, in order
    pub fn effects(&self) -> Vec<SoundEffect> {
        self.played.borrow().iter().map(|p| p.effect).collect()
    }
}

impl AudioBackend for RecordingBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32, looping: bool) {
        self.played.borrow_mut().push(PlayedSound {
            effect,
            volume,
            looping,
        });
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Box<dyn AudioBackend>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl AudioManager {
    pub fn new(backend: Box<dyn AudioBackend>, settings: &Settings) -> Self {
        let mut manager = Self {
            backend,
            master_volume: 1.0,
            sfx_volume: 1.0,
            music_volume: 1.0,
            muted: settings.muted,
        };
        manager.set_master_volume(settings.master_volume);
        manager.set_sfx_volume(settings.sfx_volume);
        manager.set_music_volume(settings.music_volume);
        manager
    }

    /// Check every sound file is present so a missing one fails at startup
    pub fn verify_assets(dir: &Path) -> Result<(), EngineError> {
        for effect in SoundEffect::ALL {
            let path = dir.join(effect.file_name());
            if !path.is_file() {
                return Err(EngineError::MissingAsset(path));
            }
        }
        log::info!("Found {} sound files in {}", SoundEffect::ALL.len(), dir.display());
        Ok(())
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Get effective volume
    fn effective_volume(&self, effect: SoundEffect) -> f32 {
        if self.muted {
            0.0
        } else if effect.is_music() {
            self.master_volume * self.music_volume
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume(effect);
        if vol <= 0.0 {
            return;
        }
        self.backend.play(effect, vol, effect.looping());
    }
}
