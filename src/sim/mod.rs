//! Simulation module
//!
//! All gameplay logic lives here. Apart from level loading at startup nothing
//! in this module touches the filesystem, audio or the screen:
//! - Frame delta is passed in, never measured
//! - Side effects leave as `GameEvent`s
//! - Stable iteration order (tile rows bottom to top, left to right)

pub mod collision;
pub mod player;
pub mod state;
pub mod tick;
pub mod tilemap;

pub use collision::{CollisionResult, HitBox, test_wall, update_player_position};
pub use player::{AnimationId, Controls, Player};
pub use state::{Camera, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, in_level, tick};
pub use tilemap::{TileFlags, TileMap, load_level, load_levels};
