//! 32-bit bitmap decoding for levels and sprites
//!
//! The `image` crate treats the fourth byte of an uncompressed (BI_RGB)
//! 32-bit BMP as padding and decodes it as RGB. Level and sprite files carry
//! alpha in that byte, so those files are read directly from the header.
//! Any other BMP layout goes through `image`, but must still be 32 bits per
//! pixel. Non-BMP files must decode as 8-bit RGBA.

use std::path::Path;

use image::RgbaImage;

use crate::error::EngineError;

const FILE_HEADER_LEN: usize = 14;
const BI_RGB: u32 = 0;

fn u16_at(bytes: &[u8], offset: usize) -> Option<u16> {
    let b = bytes.get(offset..offset + 2)?;
    Some(u16::from_le_bytes([b[0], b[1]]))
}

fn u32_at(bytes: &[u8], offset: usize) -> Option<u32> {
    let b = bytes.get(offset..offset + 4)?;
    Some(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

fn i32_at(bytes: &[u8], offset: usize) -> Option<i32> {
    u32_at(bytes, offset).map(|v| v as i32)
}

fn malformed(path: &Path, message: &str) -> EngineError {
    EngineError::Image {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

/// Load a 32-bit image, keeping the alpha channel
pub fn load_rgba32(path: &Path) -> Result<RgbaImage, EngineError> {
    let bytes = std::fs::read(path).map_err(|e| EngineError::io(path, e))?;
    if bytes.starts_with(b"BM") {
        return decode_bmp(path, &bytes);
    }

    let image = image::load_from_memory(&bytes).map_err(|e| EngineError::image(path, e))?;
    if image.color() != image::ColorType::Rgba8 {
        return Err(EngineError::UnsupportedFormat {
            path: path.to_path_buf(),
            found: format!("{:?}", image.color()),
        });
    }
    Ok(image.to_rgba8())
}

fn decode_bmp(path: &Path, bytes: &[u8]) -> Result<RgbaImage, EngineError> {
    let header = |offset| u32_at(bytes, offset).ok_or_else(|| malformed(path, "truncated header"));
    let data_offset = header(10)? as usize;
    let bits_per_pixel =
        u16_at(bytes, FILE_HEADER_LEN + 14).ok_or_else(|| malformed(path, "truncated header"))?;
    if bits_per_pixel != 32 {
        return Err(EngineError::UnsupportedFormat {
            path: path.to_path_buf(),
            found: format!("{} bits per pixel", bits_per_pixel),
        });
    }

    let compression = header(FILE_HEADER_LEN + 16)?;
    if compression != BI_RGB {
        let image = image::load_from_memory_with_format(bytes, image::ImageFormat::Bmp)
            .map_err(|e| EngineError::image(path, e))?;
        return Ok(image.to_rgba8());
    }

    let width = i32_at(bytes, FILE_HEADER_LEN + 4).ok_or_else(|| malformed(path, "truncated header"))?;
    let height = i32_at(bytes, FILE_HEADER_LEN + 8).ok_or_else(|| malformed(path, "truncated header"))?;
    if width <= 0 || height == 0 {
        return Err(malformed(path, "bitmap has no pixels"));
    }
    // Negative height means rows are stored top-down
    let top_down = height < 0;
    let (w, h) = (width as u32, height.unsigned_abs());

    let stride = w as usize * 4;
    let end = (h as usize)
        .checked_mul(stride)
        .and_then(|len| len.checked_add(data_offset))
        .ok_or_else(|| malformed(path, "bitmap too large"))?;
    let pixels = bytes
        .get(data_offset..end)
        .ok_or_else(|| malformed(path, "pixel data truncated"))?;

    let mut image = RgbaImage::new(w, h);
    for (i, row) in pixels.chunks_exact(stride).enumerate() {
        let y = if top_down { i as u32 } else { h - 1 - i as u32 };
        for (x, bgra) in row.chunks_exact(4).enumerate() {
            image.put_pixel(x as u32, y, image::Rgba([bgra[2], bgra[1], bgra[0], bgra[3]]));
        }
    }
    Ok(image)
}
