//! CPU backbuffer
//!
//! Rows are stored bottom-up so pixel `(x, y)` matches the y-up world and
//! screen coordinates the game uses.

use std::path::Path;

use bytemuck::{Pod, Zeroable};
use image::RgbaImage;

use crate::error::EngineError;

/// One 8-bit RGBA pixel
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
}

/// Colors for placeholder art
pub mod colors {
    use super::Rgba;

    pub const SKY: Rgba = Rgba::opaque(92, 148, 252);
    pub const MENU: Rgba = Rgba::opaque(24, 24, 40);
    pub const COMPLETE: Rgba = Rgba::opaque(20, 90, 40);
    pub const FAILED: Rgba = Rgba::opaque(110, 24, 24);
    pub const END: Rgba = Rgba::opaque(70, 40, 110);
    pub const GRASS: Rgba = Rgba::opaque(0, 200, 60);
    pub const DOOR: Rgba = Rgba::opaque(150, 80, 30);
    pub const COIN: Rgba = Rgba::opaque(255, 215, 0);
    pub const SPIKES: Rgba = Rgba::opaque(127, 127, 127);
    pub const PLAYER: Rgba = Rgba::opaque(230, 230, 240);
    pub const BUTTON: Rgba = Rgba::opaque(60, 60, 80);
    pub const BUTTON_BORDER: Rgba = Rgba::opaque(220, 220, 220);
    pub const TIP: Rgba = Rgba::new(250, 250, 210, 255);
}

/// Screen-sized pixel buffer
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::BLACK; (width as usize) * (height as usize)],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reallocate for a new window size (contents are cleared)
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        log::debug!("Framebuffer resized to {}x{}", width, height);
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| (y * self.width + x) as usize)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        self.offset(x, y).map(|i| self.pixels[i])
    }

    pub fn set(&mut self, x: u32, y: u32, color: Rgba) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i] = color;
        }
    }

    /// One row, bottom row first
    pub fn row_mut(&mut self, y: u32) -> &mut [Rgba] {
        let start = (y * self.width) as usize;
        &mut self.pixels[start..start + self.width as usize]
    }

    /// Raw bytes, bottom row first (what a blit to screen uploads)
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Export as a top-down image
    pub fn to_image(&self) -> RgbaImage {
        let mut img = RgbaImage::new(self.width, self.height);
        for (x, y, px) in img.enumerate_pixels_mut() {
            let p = self.pixels[((self.height - 1 - y) * self.width + x) as usize];
            *px = image::Rgba([p.r, p.g, p.b, p.a]);
        }
        img
    }

    /// Write the frame as a PNG screenshot
    pub fn save_png(&self, path: &Path) -> Result<(), EngineError> {
        self.to_image()
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| EngineError::image(path, e))?;
        log::info!("Saved screenshot {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_bounds() {
        let mut fb = Framebuffer::new(4, 3);
        fb.set(1, 2, colors::COIN);
        assert_eq!(fb.get(1, 2), Some(colors::COIN));
        assert_eq!(fb.get(4, 0), None);
        fb.set(10, 10, colors::COIN);
    }

    #[test]
    fn test_bytes_match_pixels() {
        let mut fb = Framebuffer::new(2, 1);
        fb.set(1, 0, Rgba::new(1, 2, 3, 4));
        assert_eq!(fb.as_bytes(), &[0, 0, 0, 255, 1, 2, 3, 4]);
    }

    #[test]
    fn test_image_is_flipped_top_down() {
        let mut fb = Framebuffer::new(1, 2);
        fb.set(0, 0, colors::GRASS);
        fb.set(0, 1, colors::SKY);
        let img = fb.to_image();
        assert_eq!(img.get_pixel(0, 0).0, [92, 148, 252, 255]);
        assert_eq!(img.get_pixel(0, 1).0, [0, 200, 60, 255]);
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        let mut fb = Framebuffer::new(8, 8);
        fb.clear(colors::SKY);
        fb.save_png(&path).unwrap();
        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (8, 8));
        assert_eq!(loaded.get_pixel(3, 3).0, [92, 148, 252, 255]);
    }

    #[test]
    fn test_resize_clears() {
        let mut fb = Framebuffer::new(2, 2);
        fb.clear(colors::SKY);
        fb.resize(3, 1);
        assert_eq!(fb.width(), 3);
        assert_eq!(fb.get(2, 0), Some(Rgba::BLACK));
    }
}
