//! Game state and core simulation types
//!
//! Everything a frame of gameplay reads or writes lives in [`GameState`]. Side
//! effects (sound, progress saves, quitting) are queued as [`GameEvent`]s for
//! the engine to carry out.

use glam::Vec2;

use super::collision::CollisionResult;
use super::player::Player;
use super::tilemap::TileMap;
use crate::audio::SoundEffect;
use crate::tuning::Tuning;
use crate::ui::Menu;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen with Play/Quit
    MainMenu,
    /// Active gameplay
    InLevel,
    /// Reached the door with the coin
    LevelComplete,
    /// Touched a hazard
    LevelFailed,
    /// Finished the last level
    End,
}

/// Side effect requested by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PlaySound(SoundEffect),
    /// Persist this level index as the unlocked progress
    SaveProgress(u32),
    Quit,
}

/// World-space view offset (bottom-left of the screen)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Camera {
    pub position: Vec2,
}

impl Camera {
    /// Ease towards centring `focus` in a `viewport`-sized screen
    pub fn follow(&mut self, focus: Vec2, viewport: Vec2, speed: f32, dt: f32) {
        let target = focus - viewport * 0.5;
        let blend = (speed * dt).clamp(0.0, 1.0);
        self.position += (target - self.position) * blend;
    }

    pub fn reset(&mut self) {
        self.position = Vec2::ZERO;
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Current phase
    pub phase: GamePhase,
    /// Live level maps (coins get cleared in place)
    pub levels: Vec<TileMap>,
    /// Untouched copies for a full restart
    pristine: Vec<TileMap>,
    /// Current level index
    pub level: usize,
    pub player: Player,
    pub camera: Camera,
    /// A coin was picked up during this attempt
    pub coin_collected: bool,
    /// Last coin picked up
    pub coin_index: Option<usize>,
    /// Coins cleared during this attempt, restored on death
    pub collected_coins: Vec<usize>,
    /// Coins picked up over the whole run
    pub coin_count: u32,
    /// Last resolver report
    pub collision: CollisionResult,
    pub tuning: Tuning,
    /// Screen size in pixels
    pub viewport: Vec2,
    pub menu: Menu,
    /// Last input came from a gamepad (picks tutorial tip art)
    pub use_gamepad: bool,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a state on the main menu, ready to start at `level`
    pub fn new(levels: Vec<TileMap>, level: usize, tuning: Tuning, viewport: Vec2) -> Self {
        debug_assert!(!levels.is_empty(), "game needs at least one level");
        let level = level.min(levels.len().saturating_sub(1));

        let mut state = Self {
            phase: GamePhase::MainMenu,
            pristine: levels.clone(),
            levels,
            level,
            player: Player::new(&tuning),
            camera: Camera::default(),
            coin_collected: false,
            coin_index: None,
            collected_coins: Vec::new(),
            coin_count: 0,
            collision: CollisionResult::default(),
            tuning,
            viewport,
            menu: Menu::new(viewport),
            use_gamepad: false,
            events: Vec::new(),
        };
        state.reset_player();
        state
    }

    /// Map of the current level
    pub fn current_map(&self) -> &TileMap {
        &self.levels[self.level]
    }

    pub fn is_last_level(&self) -> bool {
        self.level + 1 >= self.levels.len()
    }

    /// Put the player back on the current level's start at rest
    pub fn reset_player(&mut self) {
        let start = self.levels[self.level].start_pos;
        self.player.respawn(start);
        self.collision = CollisionResult::default();
    }

    /// Begin (or retry) the current level
    pub fn start_level(&mut self) {
        self.coin_collected = false;
        self.coin_index = None;
        self.collected_coins.clear();
        self.reset_player();
        self.phase = GamePhase::InLevel;
        log::info!("Starting level {}", self.level + 1);
    }

    /// Put back every coin picked up during this attempt
    pub fn restore_coins(&mut self) {
        let map = &mut self.levels[self.level];
        for index in self.collected_coins.drain(..) {
            if !map.restore_coin(index) {
                log::warn!("Could not restore coin at tile {}", index);
            }
        }
    }

    /// Throw away all level changes
    pub fn reload_levels(&mut self) {
        self.levels = self.pristine.clone();
    }

    /// Resize the screen and re-centre the menu
    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        self.menu = Menu::new(viewport);
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
