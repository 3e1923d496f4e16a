//! Software rendering module
//!
//! Sprites are blitted into a CPU framebuffer with a y-up origin at the
//! bottom-left; a window backend only has to upload `Framebuffer::as_bytes`.

pub mod assets;
pub mod framebuffer;
pub mod scene;
pub mod sprite;

pub use assets::Assets;
pub use framebuffer::{Framebuffer, Rgba};
pub use scene::draw_frame;
pub use sprite::{Sprite, draw_sprite};
