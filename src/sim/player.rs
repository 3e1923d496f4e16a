//! Player body, kinematics and animation selection

use glam::Vec2;

use crate::consts::ANIMATION_FRAMES;
use crate::tuning::{JumpStyle, Tuning};

/// Which animation clip is playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationId {
    WalkLeft,
    WalkRight,
    IdleLeft,
    IdleRight,
}

impl AnimationId {
    pub const ALL: [AnimationId; 4] = [
        AnimationId::WalkLeft,
        AnimationId::WalkRight,
        AnimationId::IdleLeft,
        AnimationId::IdleRight,
    ];

    pub fn is_walking(self) -> bool {
        matches!(self, AnimationId::WalkLeft | AnimationId::WalkRight)
    }

    /// Idle clip facing the same way
    pub fn to_idle(self) -> AnimationId {
        match self {
            AnimationId::WalkLeft | AnimationId::IdleLeft => AnimationId::IdleLeft,
            AnimationId::WalkRight | AnimationId::IdleRight => AnimationId::IdleRight,
        }
    }

    /// Playback rate for this clip
    pub fn fps(self, tuning: &Tuning) -> f32 {
        if self.is_walking() {
            tuning.walk_fps
        } else {
            tuning.idle_fps
        }
    }
}

/// Per-frame movement intent
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Controls {
    /// Horizontal input in [-1, 1]
    pub movement: f32,
    /// Jump pressed this frame
    pub jump: bool,
    /// Jump button held
    pub jump_held: bool,
}

/// The single player entity
#[derive(Debug, Clone)]
pub struct Player {
    /// AABB centre
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    /// Full AABB width
    pub width: f32,
    /// Full AABB height
    pub height: f32,
    pub max_speed: f32,
    pub current_animation: AnimationId,
    /// Animation cursor in [0, ANIMATION_FRAMES)
    pub frame: f32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            width: tuning.player_width,
            height: tuning.player_height,
            max_speed: tuning.max_speed,
            current_animation: AnimationId::IdleRight,
            frame: 0.0,
        }
    }

    /// Place the player at `start` at rest
    pub fn respawn(&mut self, start: Vec2) {
        self.position = start;
        self.velocity = Vec2::ZERO;
        self.acceleration = Vec2::ZERO;
    }

    /// Set this frame's acceleration from gravity, input and friction.
    ///
    /// Returns true when a jump started.
    pub fn apply_controls(
        &mut self,
        controls: &Controls,
        on_ground: bool,
        dt: f32,
        tuning: &Tuning,
    ) -> bool {
        let gravity = tuning.gravity;
        self.acceleration.y = -gravity;
        self.acceleration.x = controls.movement.clamp(-1.0, 1.0) * tuning.move_force;

        let mut jumped = controls.jump && on_ground;
        if jumped {
            match tuning.jump_style {
                JumpStyle::Impulse if dt > 0.0 => self.acceleration.y = tuning.jump_impulse / dt,
                // No frame to spread the impulse over
                JumpStyle::Impulse => jumped = false,
                JumpStyle::Velocity => self.velocity.y = tuning.jump_impulse,
            }
        }

        // Variable jump height: heavier while rising unless the button is held,
        // lighter while falling with the button held.
        let extra = if self.velocity.y > 0.0 {
            if controls.jump_held {
                tuning.rise_hold_gravity_scale
            } else {
                tuning.rise_gravity_scale
            }
        } else if self.velocity.y < 0.0 {
            if controls.jump_held {
                tuning.fall_hold_gravity_scale
            } else {
                tuning.fall_gravity_scale
            }
        } else {
            0.0
        };
        self.acceleration.y -= gravity * extra;

        self.acceleration.x -= self.velocity.x * tuning.friction;
        jumped
    }

    /// Cap horizontal speed
    pub fn clamp_speed(&mut self) {
        self.velocity.x = self.velocity.x.clamp(-self.max_speed, self.max_speed);
    }

    /// Advance the animation cursor, then pick the clip from horizontal velocity
    pub fn update_animation(&mut self, dt: f32, tuning: &Tuning) {
        self.frame += dt * self.current_animation.fps(tuning);
        if self.frame >= ANIMATION_FRAMES as f32 {
            self.frame = self.frame.rem_euclid(ANIMATION_FRAMES as f32);
        }

        let deadband = tuning.walk_deadband;
        self.current_animation = if self.velocity.x > deadband {
            AnimationId::WalkRight
        } else if self.velocity.x < -deadband {
            AnimationId::WalkLeft
        } else {
            self.current_animation.to_idle()
        };
    }

    /// Sprite index of the current frame
    pub fn frame_index(&self) -> usize {
        (self.frame as usize).min(ANIMATION_FRAMES - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn player() -> (Player, Tuning) {
        let tuning = Tuning::default();
        (Player::new(&tuning), tuning)
    }

    #[test]
    fn test_gravity_at_rest() {
        let (mut p, t) = player();
        let jumped = p.apply_controls(&Controls::default(), true, DT, &t);
        assert!(!jumped);
        assert_eq!(p.acceleration, Vec2::new(0.0, -t.gravity));
    }

    #[test]
    fn test_movement_and_friction() {
        let (mut p, t) = player();
        p.velocity.x = 100.0;
        let controls = Controls {
            movement: 1.0,
            ..Default::default()
        };
        p.apply_controls(&controls, true, DT, &t);
        assert_eq!(p.acceleration.x, t.move_force - 100.0 * t.friction);
    }

    #[test]
    fn test_movement_is_clamped() {
        let (mut p, t) = player();
        let controls = Controls {
            movement: 3.0,
            ..Default::default()
        };
        p.apply_controls(&controls, true, DT, &t);
        assert_eq!(p.acceleration.x, t.move_force);
    }

    #[test]
    fn test_jump_requires_ground() {
        let (mut p, t) = player();
        let controls = Controls {
            jump: true,
            jump_held: true,
            ..Default::default()
        };
        assert!(!p.apply_controls(&controls, false, DT, &t));
        assert!(p.acceleration.y < 0.0);
        assert!(p.apply_controls(&controls, true, DT, &t));
        assert!((p.acceleration.y - t.jump_impulse / DT).abs() < 1e-2);
    }

    #[test]
    fn test_impulse_jump_needs_elapsed_time() {
        let (mut p, t) = player();
        let controls = Controls {
            jump: true,
            jump_held: true,
            ..Default::default()
        };
        assert!(!p.apply_controls(&controls, true, 0.0, &t));
        assert_eq!(p.acceleration.y, -t.gravity);
        assert!(p.acceleration.is_finite());
    }

    #[test]
    fn test_velocity_jump_style() {
        let (mut p, mut t) = player();
        t.jump_style = JumpStyle::Velocity;
        let controls = Controls {
            jump: true,
            jump_held: true,
            ..Default::default()
        };
        assert!(p.apply_controls(&controls, true, DT, &t));
        assert_eq!(p.velocity.y, t.jump_impulse);
        // Rising with the button held
        assert_eq!(
            p.acceleration.y,
            -t.gravity - t.gravity * t.rise_hold_gravity_scale
        );
    }

    #[test]
    fn test_releasing_jump_cuts_rise() {
        let (mut p, t) = player();
        p.velocity.y = 500.0;
        let held = Controls {
            jump_held: true,
            ..Default::default()
        };
        p.apply_controls(&held, false, DT, &t);
        let held_acc = p.acceleration.y;
        p.apply_controls(&Controls::default(), false, DT, &t);
        assert!(p.acceleration.y < held_acc);
    }

    #[test]
    fn test_clamp_speed() {
        let (mut p, t) = player();
        p.velocity.x = 10_000.0;
        p.clamp_speed();
        assert_eq!(p.velocity.x, t.max_speed);
        p.velocity.x = -10_000.0;
        p.clamp_speed();
        assert_eq!(p.velocity.x, -t.max_speed);
    }

    #[test]
    fn test_animation_selection() {
        let (mut p, t) = player();
        p.velocity.x = 100.0;
        p.update_animation(DT, &t);
        assert_eq!(p.current_animation, AnimationId::WalkRight);

        p.velocity.x = 3.0;
        p.update_animation(DT, &t);
        assert_eq!(p.current_animation, AnimationId::IdleRight);

        p.velocity.x = -100.0;
        p.update_animation(DT, &t);
        assert_eq!(p.current_animation, AnimationId::WalkLeft);

        p.velocity.x = 0.0;
        p.update_animation(DT, &t);
        assert_eq!(p.current_animation, AnimationId::IdleLeft);
    }

    #[test]
    fn test_animation_frame_wraps() {
        let (mut p, t) = player();
        p.current_animation = AnimationId::WalkRight;
        p.velocity.x = 100.0;
        for _ in 0..200 {
            p.update_animation(DT, &t);
            assert!(p.frame < ANIMATION_FRAMES as f32);
            assert!(p.frame_index() < ANIMATION_FRAMES);
        }
    }

    #[test]
    fn test_respawn_zeroes_motion() {
        let (mut p, _) = player();
        p.velocity = Vec2::new(5.0, 5.0);
        p.acceleration = Vec2::new(1.0, 1.0);
        p.respawn(Vec2::new(10.0, 20.0));
        assert_eq!(p.position, Vec2::new(10.0, 20.0));
        assert_eq!(p.velocity, Vec2::ZERO);
        assert_eq!(p.acceleration, Vec2::ZERO);
    }
}
