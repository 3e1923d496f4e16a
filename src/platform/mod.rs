//! Platform abstraction layer
//!
//! Handles the boundary between the OS and the simulation:
//! - Input events (bounded queue, drained once per frame)
//! - Frame pacing
//! - Headless replay of scripted input

pub mod events;
pub mod headless;
pub mod input;
pub mod pacing;

pub use events::{EventReceiver, EventSender, Key, PlatformEvent, event_queue};
pub use headless::{HeadlessPlatform, ReplayEntry, ReplayScript};
pub use input::InputCollector;
pub use pacing::FramePacer;
