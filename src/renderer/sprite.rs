//! Sprites and the blitter

use std::path::Path;

use glam::{IVec2, Vec2};
use image::RgbaImage;

use super::framebuffer::{Framebuffer, Rgba};
use crate::bitmap::load_rgba32;
use crate::error::EngineError;

/// A bitmap, rows stored bottom-up like the framebuffer
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Sprite {
    /// Single-colour rectangle
    pub fn solid(width: u32, height: u32, color: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; (width as usize) * (height as usize)],
        }
    }

    /// Filled rectangle with a border of `border` pixels
    pub fn framed(width: u32, height: u32, fill: Rgba, edge: Rgba, border: u32) -> Self {
        let mut sprite = Self::solid(width, height, fill);
        for y in 0..height {
            for x in 0..width {
                let inside = x >= border
                    && y >= border
                    && x + border < width
                    && y + border < height;
                if !inside {
                    sprite.pixels[(y * width + x) as usize] = edge;
                }
            }
        }
        sprite
    }

    /// Convert a top-down decoded image
    pub fn from_image(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let mut pixels = Vec::with_capacity((width * height) as usize);
        for y in (0..height).rev() {
            for x in 0..width {
                let [r, g, b, a] = image.get_pixel(x, y).0;
                pixels.push(Rgba::new(r, g, b, a));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Decode a sprite file; it must be 32-bit so transparency survives
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let image = load_rgba32(path)?;
        Ok(Self::from_image(&image))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    fn row(&self, y: u32) -> &[Rgba] {
        let start = (y * self.width) as usize;
        &self.pixels[start..start + self.width as usize]
    }
}

/// Draw `sprite` centred on world `pos`, offset by `camera`.
///
/// Pixels with alpha 0 are skipped; everything else overwrites (no blending).
/// Parts outside the framebuffer are clipped.
pub fn draw_sprite(fb: &mut Framebuffer, camera: Vec2, sprite: &Sprite, pos: Vec2) {
    let origin = (pos - camera - sprite.size() * 0.5).floor().as_ivec2();
    let fb_size = IVec2::new(fb.width() as i32, fb.height() as i32);

    let min = origin.max(IVec2::ZERO);
    let max = (origin + IVec2::new(sprite.width as i32, sprite.height as i32)).min(fb_size);
    if min.x >= max.x || min.y >= max.y {
        return;
    }

    let src_x = (min.x - origin.x) as usize;
    let span = (max.x - min.x) as usize;
    for y in min.y..max.y {
        let src = &sprite.row((y - origin.y) as u32)[src_x..src_x + span];
        let dst = &mut fb.row_mut(y as u32)[min.x as usize..max.x as usize];
        for (d, s) in dst.iter_mut().zip(src) {
            if s.a != 0 {
                *d = *s;
            }
        }
    }
}
