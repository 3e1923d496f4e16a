//! Platform events and the queue that carries them
//!
//! Window callbacks and device polling only ever push into an [`EventSender`];
//! the frame loop owns the receiving end. Nothing outside the loop mutates game
//! state.

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Space,
    Enter,
    Escape,
    /// Anything else (still clears gamepad mode)
    Other,
}

impl Key {
    /// Map a letter or key name (WASD aliases the arrows)
    pub fn from_name(name: &str) -> Key {
        match name.to_ascii_lowercase().as_str() {
            "left" | "a" => Key::Left,
            "right" | "d" => Key::Right,
            "up" | "w" => Key::Up,
            "down" | "s" => Key::Down,
            "space" | " " => Key::Space,
            "enter" | "return" => Key::Enter,
            "escape" | "esc" => Key::Escape,
            _ => Key::Other,
        }
    }
}

/// One thing that happened outside the game
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlatformEvent {
    /// `repeat` is set for auto-repeat while held
    KeyDown { key: Key, repeat: bool },
    KeyUp { key: Key },
    MouseDown,
    MouseUp,
    /// Cursor in backbuffer pixels, y-up
    CursorMoved(Vec2),
    /// Gamepad snapshot: A button and raw left stick
    Gamepad { a: bool, stick_x: i16, stick_y: i16 },
    Resized { width: u32, height: u32 },
    CloseRequested,
}

/// Producer side of the event queue
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<PlatformEvent>,
}

impl EventSender {
    /// Queue an event; when the queue is full the event is dropped.
    ///
    /// Returns false if the event was not queued.
    pub fn send(&self, event: PlatformEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                log::warn!("Input queue full, dropping {:?}", event);
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Consumer side of the event queue
#[derive(Debug)]
pub struct EventReceiver {
    rx: Receiver<PlatformEvent>,
}

impl EventReceiver {
    /// Everything queued right now, without blocking
    pub fn try_iter(&self) -> impl Iterator<Item = PlatformEvent> + '_ {
        self.rx.try_iter()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

/// Create a bounded event queue
pub fn event_queue(capacity: usize) -> (EventSender, EventReceiver) {
    let (tx, rx) = bounded(capacity);
    (EventSender { tx }, EventReceiver { rx })
}
