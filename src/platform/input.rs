//! Per-frame input state built from platform events

use glam::Vec2;

use super::events::{EventReceiver, Key, PlatformEvent};
use crate::consts::STICK_DEADZONE;
use crate::fast_normalize;
use crate::sim::TickInput;

/// Folds queued platform events into a [`TickInput`] once per frame
#[derive(Debug)]
pub struct InputCollector {
    events: EventReceiver,
    /// Sum of held left/right keys
    key_axis: f32,
    /// Left stick after the deadzone, at most unit length
    stick: Vec2,
    space_key: bool,
    pad_a: bool,
    use_gamepad: bool,
    cursor: Option<Vec2>,
    // Edges, cleared after every frame
    jump: bool,
    click: bool,
    next: bool,
    quit: bool,
    resized: Option<(u32, u32)>,
}

impl InputCollector {
    pub fn new(events: EventReceiver) -> Self {
        Self {
            events,
            key_axis: 0.0,
            stick: Vec2::ZERO,
            space_key: false,
            pad_a: false,
            use_gamepad: false,
            cursor: None,
            jump: false,
            click: false,
            next: false,
            quit: false,
            resized: None,
        }
    }

    /// Apply every pending event and return this frame's input
    pub fn drain(&mut self) -> TickInput {
        let pending: Vec<PlatformEvent> = self.events.try_iter().collect();
        for event in pending {
            self.apply(event);
        }

        let movement = if self.use_gamepad {
            self.stick.x
        } else {
            self.key_axis.clamp(-1.0, 1.0)
        };

        let input = TickInput {
            movement,
            jump: self.jump,
            space: self.space_key || self.pad_a,
            click: self.click,
            cursor: self.cursor,
            use_gamepad: self.use_gamepad,
            quit: self.quit,
            next: self.next,
        };

        self.jump = false;
        self.click = false;
        self.next = false;
        self.quit = false;
        input
    }

    /// Latest window size change since the last call
    pub fn take_resize(&mut self) -> Option<(u32, u32)> {
        self.resized.take()
    }

    fn apply(&mut self, event: PlatformEvent) {
        match event {
            PlatformEvent::KeyDown { key, repeat } => {
                if repeat {
                    return;
                }
                self.use_gamepad = false;
                match key {
                    Key::Left => self.key_axis -= 1.0,
                    Key::Right => self.key_axis += 1.0,
                    Key::Space => {
                        self.space_key = true;
                        self.jump = true;
                    }
                    Key::Enter => self.next = true,
                    Key::Escape => self.quit = true,
                    Key::Up | Key::Down | Key::Other => {}
                }
            }
            PlatformEvent::KeyUp { key } => match key {
                Key::Left => self.key_axis += 1.0,
                Key::Right => self.key_axis -= 1.0,
                Key::Space => self.space_key = false,
                _ => {}
            },
            PlatformEvent::MouseDown => self.click = true,
            PlatformEvent::MouseUp => {}
            PlatformEvent::CursorMoved(pos) => self.cursor = Some(pos),
            PlatformEvent::Gamepad { a, stick_x, stick_y } => {
                self.use_gamepad = true;
                if a && !self.pad_a {
                    self.jump = true;
                }
                self.pad_a = a;
                self.stick = stick_axes(stick_x, stick_y);
            }
            PlatformEvent::Resized { width, height } => self.resized = Some((width, height)),
            PlatformEvent::CloseRequested => self.quit = true,
        }
    }
}

/// Stick position in [-1, 1] per axis with the deadzone applied
fn stick_axes(stick_x: i16, stick_y: i16) -> Vec2 {
    let axis = |raw: i16| {
        if raw > STICK_DEADZONE || raw < -STICK_DEADZONE {
            (raw as f32 / 32767.0).max(-1.0)
        } else {
            0.0
        }
    };
    let stick = Vec2::new(axis(stick_x), axis(stick_y));
    // Square gate corners reach past the unit circle
    if stick.length_squared() > 1.0 {
        fast_normalize(stick)
    } else {
        stick
    }
}
