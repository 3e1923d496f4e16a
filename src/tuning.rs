//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads lives here so levels can be
//! retuned from the settings file without recompiling.

use serde::{Deserialize, Serialize};

/// How a jump turns into upward motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum JumpStyle {
    /// Upward acceleration of `jump_impulse / dt` for the jump frame.
    /// Frame-rate dependent; kept as the default because levels were tuned with it.
    #[default]
    Impulse,
    /// Vertical velocity set to `jump_impulse` directly
    Velocity,
}

/// Gameplay tuning values
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Horizontal acceleration at full stick/key deflection
    pub move_force: f32,
    /// Horizontal velocity damping coefficient
    pub friction: f32,
    /// Horizontal speed cap
    pub max_speed: f32,
    /// Jump strength (see [`JumpStyle`])
    pub jump_impulse: f32,
    pub jump_style: JumpStyle,

    /// Extra gravity multiples while rising with jump released
    pub rise_gravity_scale: f32,
    /// Extra gravity multiples while rising with jump held
    pub rise_hold_gravity_scale: f32,
    /// Extra gravity multiples while falling with jump released
    pub fall_gravity_scale: f32,
    /// Extra gravity multiples while falling with jump held
    pub fall_hold_gravity_scale: f32,

    /// Player hit box width
    pub player_width: f32,
    /// Player hit box height
    pub player_height: f32,

    /// Horizontal speed below which the idle clip plays
    pub walk_deadband: f32,
    pub walk_fps: f32,
    pub idle_fps: f32,

    /// Camera tracking rate (1/s)
    pub camera_follow_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 1500.0,
            move_force: 3000.0,
            friction: 5.0,
            max_speed: 750.0,
            jump_impulse: 1200.0,
            jump_style: JumpStyle::Impulse,

            rise_gravity_scale: 2.0,
            rise_hold_gravity_scale: 1.0,
            fall_gravity_scale: 1.0,
            fall_hold_gravity_scale: 0.0,

            // Sprite is 31x56 pixels drawn at 3x
            player_width: 31.0 * 3.0,
            player_height: 56.0 * 3.0,

            walk_deadband: 7.0,
            walk_fps: 8.0,
            idle_fps: 4.0,

            camera_follow_speed: 7.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning: Tuning = serde_json::from_str(r#"{ "gravity": 900.0 }"#).unwrap();
        assert_eq!(tuning.gravity, 900.0);
        assert_eq!(tuning.max_speed, 750.0);
        assert_eq!(tuning.jump_style, JumpStyle::Impulse);
    }

    #[test]
    fn test_jump_style_from_json() {
        let tuning: Tuning = serde_json::from_str(r#"{ "jump_style": "Velocity" }"#).unwrap();
        assert_eq!(tuning.jump_style, JumpStyle::Velocity);
    }
}
