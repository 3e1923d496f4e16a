//! Sprite assets
//!
//! Everything is loaded once at startup so a missing file stops the game
//! before the first frame instead of mid-level.

use std::path::Path;

use super::framebuffer::{Rgba, colors};
use super::sprite::Sprite;
use crate::consts::{ANIMATION_FRAMES, TIP_LEVELS};
use crate::error::EngineError;
use crate::sim::{AnimationId, GamePhase};
use crate::tuning::Tuning;
use crate::ui::{BUTTON_HALF_SIZE, ButtonKind};

/// Sub-directory holding one animation clip's frames
pub fn animation_dir(id: AnimationId) -> &'static str {
    match id {
        AnimationId::WalkLeft => "walk_left",
        AnimationId::WalkRight => "walk_right",
        AnimationId::IdleLeft => "idle_left",
        AnimationId::IdleRight => "idle_right",
    }
}

fn animation_slot(id: AnimationId) -> usize {
    match id {
        AnimationId::WalkLeft => 0,
        AnimationId::WalkRight => 1,
        AnimationId::IdleLeft => 2,
        AnimationId::IdleRight => 3,
    }
}

fn button_slot(kind: ButtonKind) -> usize {
    match kind {
        ButtonKind::Play => 0,
        ButtonKind::Next => 1,
        ButtonKind::Restart => 2,
        ButtonKind::Quit => 3,
    }
}

const BUTTON_KINDS: [ButtonKind; 4] = [
    ButtonKind::Play,
    ButtonKind::Next,
    ButtonKind::Restart,
    ButtonKind::Quit,
];

/// Every sprite the game draws
#[derive(Debug, Clone)]
pub struct Assets {
    pub main_menu: Sprite,
    pub background: Sprite,
    pub level_complete: Sprite,
    pub level_failed: Sprite,
    pub end_game: Sprite,

    pub ground: Sprite,
    pub door: Sprite,
    pub coin: Sprite,
    pub spikes: Sprite,

    buttons: Vec<Sprite>,
    /// Indexed by `animation_slot`, `ANIMATION_FRAMES` each
    animations: Vec<Vec<Sprite>>,
    tips_pc: Vec<Sprite>,
    tips_console: Vec<Sprite>,
}

impl Assets {
    /// Load all sprites from `dir`
    pub fn load(dir: &Path) -> Result<Self, EngineError> {
        let sprite = |name: &str| Sprite::load(&dir.join(name));

        let buttons = BUTTON_KINDS
            .iter()
            .map(|kind| sprite(kind.file_name()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut animations = Vec::with_capacity(AnimationId::ALL.len());
        for id in AnimationId::ALL {
            debug_assert_eq!(animation_slot(id), animations.len());
            let clip_dir = dir.join(animation_dir(id));
            let frames = (0..ANIMATION_FRAMES)
                .map(|i| Sprite::load(&clip_dir.join(format!("{}.bmp", i))))
                .collect::<Result<Vec<_>, _>>()?;
            animations.push(frames);
        }

        let tips = |prefix: &str| {
            (1..=TIP_LEVELS)
                .map(|i| sprite(&format!("{} tip {}.bmp", prefix, i)))
                .collect::<Result<Vec<_>, _>>()
        };

        let assets = Self {
            main_menu: sprite("main menu.bmp")?,
            background: sprite("background.bmp")?,
            level_complete: sprite("level complete.bmp")?,
            level_failed: sprite("level failed.bmp")?,
            end_game: sprite("end game.bmp")?,
            ground: sprite("grass.bmp")?,
            door: sprite("door.bmp")?,
            coin: sprite("coin.bmp")?,
            spikes: sprite("spikes.bmp")?,
            buttons,
            animations,
            tips_pc: tips("pc")?,
            tips_console: tips("console")?,
        };
        log::info!("Loaded sprites from {}", dir.display());
        Ok(assets)
    }

    /// Flat-colour stand-ins sized like the real art
    pub fn placeholder(width: u32, height: u32, tile_size: i32, tuning: &Tuning) -> Self {
        let ts = tile_size.max(1) as u32;
        let screen = |color: Rgba| Sprite::solid(width, height, color);
        let button_size = BUTTON_HALF_SIZE * 2.0;

        let buttons = BUTTON_KINDS
            .iter()
            .map(|_| {
                Sprite::framed(
                    button_size.x as u32,
                    button_size.y as u32,
                    colors::BUTTON,
                    colors::BUTTON_BORDER,
                    6,
                )
            })
            .collect();

        let player = Sprite::framed(
            tuning.player_width.max(1.0) as u32,
            tuning.player_height.max(1.0) as u32,
            colors::PLAYER,
            Rgba::BLACK,
            2,
        );
        let animations = AnimationId::ALL
            .iter()
            .map(|_| vec![player.clone(); ANIMATION_FRAMES])
            .collect();

        let tip = Sprite::framed(500, 150, colors::TIP, Rgba::BLACK, 3);

        log::info!("Using placeholder art");
        Self {
            main_menu: screen(colors::MENU),
            background: screen(colors::SKY),
            level_complete: screen(colors::COMPLETE),
            level_failed: screen(colors::FAILED),
            end_game: screen(colors::END),
            ground: Sprite::framed(ts, ts, colors::GRASS, Rgba::BLACK, 1),
            door: Sprite::framed(ts, ts * 2, colors::DOOR, Rgba::BLACK, 2),
            coin: Sprite::framed(ts / 2, ts / 2, colors::COIN, Rgba::TRANSPARENT, 2),
            spikes: Sprite::solid(ts, ts / 2, colors::SPIKES),
            buttons,
            animations,
            tips_pc: vec![tip.clone(); TIP_LEVELS],
            tips_console: vec![tip; TIP_LEVELS],
        }
    }

    pub fn button(&self, kind: ButtonKind) -> &Sprite {
        &self.buttons[button_slot(kind)]
    }

    /// Frame of a player animation clip (wraps past the clip length)
    pub fn player_frame(&self, id: AnimationId, frame: usize) -> &Sprite {
        let clip = &self.animations[animation_slot(id)];
        &clip[frame % clip.len()]
    }

    /// Tutorial tip for `level`, keyboard or gamepad flavour
    pub fn tip(&self, level: usize, gamepad: bool) -> Option<&Sprite> {
        if gamepad {
            self.tips_console.get(level)
        } else {
            self.tips_pc.get(level)
        }
    }

    /// Full-screen picture for a menu phase
    pub fn screen(&self, phase: GamePhase) -> &Sprite {
        match phase {
            GamePhase::MainMenu => &self.main_menu,
            GamePhase::InLevel => &self.background,
            GamePhase::LevelComplete => &self.level_complete,
            GamePhase::LevelFailed => &self.level_failed,
            GamePhase::End => &self.end_game,
        }
    }
}
