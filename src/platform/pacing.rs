//! Frame rate cap
//!
//! Sleeps out whatever is left of the frame interval, then measures again so
//! the next frame sees the real elapsed time.

use std::time::{Duration, Instant};

use crate::consts::MAX_FRAME_DT;

#[derive(Debug)]
enum Clock {
    /// Wall clock with sleeping
    Real { last: Instant },
    /// Constant step, no sleeping (headless runs and tests)
    Fixed,
}

#[derive(Debug)]
pub struct FramePacer {
    target: Duration,
    clock: Clock,
}

impl FramePacer {
    /// Pace against the wall clock at `target_fps`
    pub fn new(target_fps: u32) -> Self {
        Self {
            target: Duration::from_secs_f32(1.0 / target_fps.max(1) as f32),
            clock: Clock::Real {
                last: Instant::now(),
            },
        }
    }

    /// Report exactly one target interval per frame without waiting
    pub fn fixed(target_fps: u32) -> Self {
        Self {
            target: Duration::from_secs_f32(1.0 / target_fps.max(1) as f32),
            clock: Clock::Fixed,
        }
    }

    pub fn target(&self) -> Duration {
        self.target
    }

    /// End the frame and return the delta time for the next one (seconds)
    pub fn finish_frame(&mut self) -> f32 {
        match &mut self.clock {
            Clock::Fixed => self.target.as_secs_f32().min(MAX_FRAME_DT),
            Clock::Real { last } => {
                let elapsed = last.elapsed();
                if elapsed < self.target {
                    std::thread::sleep(self.target - elapsed);
                }
                let now = Instant::now();
                let dt = now.duration_since(*last).as_secs_f32();
                *last = now;
                clamp_dt(dt)
            }
        }
    }
}

/// Keep one long stall (debugger, window drag) from tunnelling the player
fn clamp_dt(dt: f32) -> f32 {
    dt.clamp(0.0, MAX_FRAME_DT)
}
