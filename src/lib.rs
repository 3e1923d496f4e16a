//! Pilot Adventures - a tile-based 2D platformer engine core
//!
//! Core modules:
//! - `bitmap`: 32-bit bitmap decoding with alpha
//! - `sim`: Deterministic simulation (tile map, collision, player, game state)
//! - `renderer`: Software framebuffer and sprite blitting
//! - `audio`: Sound effect dispatch to a pluggable backend
//! - `platform`: Input event queue, frame pacing, headless replay
//! - `persistence`: Level progress file
//! - `tuning`: Data-driven game balance
//! - `settings`: Engine settings
//! - `ui`: Menu buttons
//! - `engine`: Frame loop tying the above together

pub mod audio;
pub mod bitmap;
pub mod engine;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use engine::Engine;
pub use error::EngineError;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Tile edge length in world units for shipped levels
    pub const TILE_SIZE: i32 = 96;
    /// Spawn height above the START tile centre (world units, 96-unit tiles)
    pub const SPAWN_LIFT: f32 = 40.0;

    /// Resolver passes per frame
    pub const MAX_COLLISION_ITERATIONS: usize = 4;
    /// Time-of-impact pull-back so the player never rests exactly on a boundary
    pub const COLLISION_T_EPSILON: f32 = 0.01;

    /// Spikes hit box: top lowered by this fraction of a tile
    pub const SPIKES_TOP_INSET: f32 = 40.0 / 96.0;
    /// Spikes hit box: each side narrowed by this fraction of a tile
    pub const SPIKES_SIDE_INSET: f32 = 15.0 / 96.0;

    /// Door sprite is drawn this fraction of a tile above the tile centre
    pub const END_DRAW_OFFSET: f32 = 60.0 / 96.0;
    /// Spikes sprite is drawn this fraction of a tile below the tile centre
    pub const SPIKES_DRAW_OFFSET: f32 = -10.0 / 96.0;

    /// Frames per animation clip
    pub const ANIMATION_FRAMES: usize = 8;

    /// Largest frame delta handed to the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Platform event queue capacity
    pub const EVENT_QUEUE_CAPACITY: usize = 256;

    /// Analog stick deadzone (raw stick units)
    pub const STICK_DEADZONE: i16 = 7849;

    /// Number of levels that show a tutorial tip
    pub const TIP_LEVELS: usize = 3;
}

/// Fast inverse square root (1 / sqrt(x)) via bit reinterpretation.
///
/// Two Newton iterations keep the relative error below 1e-5. Returns
/// infinity for zero, like `1.0 / 0.0_f32.sqrt()`.
#[inline]
pub fn fast_inv_sqrt(number: f32) -> f32 {
    if number == 0.0 {
        return f32::INFINITY;
    }
    let half = number * 0.5;
    let i = 0x5f37_59df_u32.wrapping_sub(number.to_bits() >> 1);
    let mut y = f32::from_bits(i);
    y *= 1.5 - half * y * y;
    y *= 1.5 - half * y * y;
    y
}

/// Square root computed as x * x^(-1/2)
#[inline]
pub fn fast_sqrt(number: f32) -> f32 {
    if number <= 0.0 {
        return 0.0;
    }
    number * fast_inv_sqrt(number)
}

/// Normalize a vector with the fast inverse square root (zero stays zero)
#[inline]
pub fn fast_normalize(v: Vec2) -> Vec2 {
    let len_sq = v.length_squared();
    if len_sq == 0.0 {
        return Vec2::ZERO;
    }
    v * fast_inv_sqrt(len_sq)
}

/// Remove the component of `v` along the unit `normal`
#[inline]
pub fn project_out(v: Vec2, normal: Vec2) -> Vec2 {
    v - normal * v.dot(normal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fast_inv_sqrt_accuracy() {
        for &x in &[0.25_f32, 1.0, 2.0, 16.0, 1000.0, 123456.0] {
            let expected = 1.0 / x.sqrt();
            let got = fast_inv_sqrt(x);
            assert!(
                ((got - expected) / expected).abs() < 1e-4,
                "x={x}: got {got}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_fast_sqrt() {
        assert!((fast_sqrt(16.0) - 4.0).abs() < 1e-3);
        assert_eq!(fast_sqrt(0.0), 0.0);
        assert_eq!(fast_sqrt(-4.0), 0.0);
    }

    #[test]
    fn test_fast_normalize() {
        let n = fast_normalize(Vec2::new(3.0, 4.0));
        assert!((n.length() - 1.0).abs() < 1e-4);
        assert_eq!(fast_normalize(Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn test_project_out() {
        let v = Vec2::new(5.0, -3.0);
        let p = project_out(v, Vec2::Y);
        assert_eq!(p, Vec2::new(5.0, 0.0));
        let p = project_out(v, Vec2::NEG_X);
        assert_eq!(p, Vec2::new(0.0, -3.0));
    }
}
