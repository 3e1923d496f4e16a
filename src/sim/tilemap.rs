//! Tile grid for a single level
//!
//! Levels are authored as 32-bit bitmaps where each pixel's exact colour picks
//! the tile type. The world is y-up: tile `(x, y)` has its centre at
//! `(x * tile_size, y * tile_size)` and the image's top row is the highest row.

use std::fmt;
use std::path::{Path, PathBuf};

use glam::Vec2;
use image::RgbaImage;

use crate::bitmap::load_rgba32;
use crate::consts::{END_DRAW_OFFSET, SPIKES_DRAW_OFFSET};
use crate::error::EngineError;

bitflags::bitflags! {
    /// Bitmask tagging a grid cell's role
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TileFlags: u32 {
        const EMPTY = 1 << 0;
        const GROUND = 1 << 1;
        const START = 1 << 2;
        const END = 1 << 3;
        const COIN = 1 << 4;
        const DEATH = 1 << 5;
        const SPIKES = 1 << 6;
    }
}

impl TileFlags {
    /// Non-blocking tiles that only report contact
    #[inline]
    pub fn is_trigger(self) -> bool {
        self == TileFlags::COIN
            || self == TileFlags::DEATH
            || self == TileFlags::SPIKES
            || self == TileFlags::END
    }

    /// Map an exact RGBA colour to a tile type
    pub fn from_rgba(rgba: [u8; 4]) -> TileFlags {
        let [r, g, b, a] = rgba;
        if a != 255 {
            return TileFlags::EMPTY;
        }
        match (r, g, b) {
            (0, 255, 0) => TileFlags::GROUND,
            (0, 0, 255) => TileFlags::START,
            (255, 0, 255) => TileFlags::END,
            (255, 255, 0) => TileFlags::COIN,
            (255, 0, 0) => TileFlags::DEATH,
            (127, 127, 127) => TileFlags::SPIKES,
            _ => TileFlags::EMPTY,
        }
    }
}

/// Why a decoded level image cannot be played
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelDefect {
    Empty,
    NoStart,
}

impl fmt::Display for LevelDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelDefect::Empty => write!(f, "level image is empty"),
            LevelDefect::NoStart => write!(f, "no START tile (blue pixel)"),
        }
    }
}

/// A level's tile grid
#[derive(Debug, Clone, PartialEq)]
pub struct TileMap {
    width: i32,
    height: i32,
    tile_size: i32,
    /// Row-major, row 0 at the bottom
    tiles: Vec<TileFlags>,
    /// Player spawn point
    pub start_pos: Vec2,
}

impl TileMap {
    /// Build a map from rows listed top to bottom (the way levels are drawn).
    ///
    /// The START tile, if any, sets `start_pos` to its centre.
    pub fn from_rows(rows: &[Vec<TileFlags>], tile_size: i32) -> Self {
        let height = rows.len() as i32;
        let width = rows.first().map(|r| r.len()).unwrap_or(0) as i32;
        let mut tiles = vec![TileFlags::EMPTY; (width * height) as usize];
        let mut start_pos = Vec2::ZERO;

        for (row, cells) in rows.iter().enumerate() {
            let y = height - 1 - row as i32;
            for (x, &tile) in cells.iter().enumerate().take(width as usize) {
                tiles[(y * width) as usize + x] = tile;
                if tile == TileFlags::START {
                    start_pos = Vec2::new((x as i32 * tile_size) as f32, (y * tile_size) as f32);
                }
            }
        }

        Self {
            width,
            height,
            tile_size,
            tiles,
            start_pos,
        }
    }

    /// Decode a level image; `spawn_lift` raises the spawn above the START tile centre
    pub fn from_rgba(
        image: &RgbaImage,
        tile_size: i32,
        spawn_lift: f32,
    ) -> Result<Self, LevelDefect> {
        let (w, h) = image.dimensions();
        if w == 0 || h == 0 {
            return Err(LevelDefect::Empty);
        }
        let width = w as i32;
        let height = h as i32;
        let mut tiles = Vec::with_capacity((w * h) as usize);
        let mut start = None;

        for y in 0..height {
            let row = (height - 1 - y) as u32;
            for x in 0..width {
                let tile = TileFlags::from_rgba(image.get_pixel(x as u32, row).0);
                if tile == TileFlags::START {
                    start = Some(Vec2::new(
                        (x * tile_size) as f32,
                        (y * tile_size) as f32 + spawn_lift,
                    ));
                }
                tiles.push(tile);
            }
        }

        let start_pos = start.ok_or(LevelDefect::NoStart)?;
        Ok(Self {
            width,
            height,
            tile_size,
            tiles,
            start_pos,
        })
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    /// Flat index for `(x, y)`, or None when outside the grid
    #[inline]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && y >= 0 && x < self.width && y < self.height {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }

    /// Tile at `(x, y)`, or None when outside the grid
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<TileFlags> {
        self.index(x, y).map(|i| self.tiles[i])
    }

    /// Tile at a flat index
    #[inline]
    pub fn tile_at(&self, index: usize) -> Option<TileFlags> {
        self.tiles.get(index).copied()
    }

    /// Centre of tile `(x, y)` in world units
    #[inline]
    pub fn tile_center(&self, x: i32, y: i32) -> Vec2 {
        Vec2::new(x as f32, y as f32) * self.tile_size as f32
    }

    /// Consume a coin; false if the tile was not a coin
    pub fn clear_coin(&mut self, index: usize) -> bool {
        match self.tiles.get_mut(index) {
            Some(tile) if *tile == TileFlags::COIN => {
                *tile = TileFlags::EMPTY;
                true
            }
            _ => false,
        }
    }

    /// Put a consumed coin back; false if the tile is not empty
    pub fn restore_coin(&mut self, index: usize) -> bool {
        match self.tiles.get_mut(index) {
            Some(tile) if *tile == TileFlags::EMPTY => {
                *tile = TileFlags::COIN;
                true
            }
            _ => false,
        }
    }

    /// Number of tiles carrying `flag`
    pub fn count(&self, flag: TileFlags) -> usize {
        self.tiles.iter().filter(|t| t.intersects(flag)).count()
    }

    /// Drawable tiles with their sprite anchor in world units
    pub fn decorations(&self) -> impl Iterator<Item = (TileFlags, Vec2)> + '_ {
        let ts = self.tile_size as f32;
        self.tiles.iter().enumerate().filter_map(move |(i, &tile)| {
            let i = i as i32;
            let center = self.tile_center(i % self.width, i / self.width);
            let offset = if tile == TileFlags::GROUND || tile == TileFlags::COIN {
                0.0
            } else if tile == TileFlags::END {
                END_DRAW_OFFSET * ts
            } else if tile == TileFlags::SPIKES {
                SPIKES_DRAW_OFFSET * ts
            } else {
                return None;
            };
            Some((tile, center + Vec2::new(0.0, offset)))
        })
    }
}

/// Load one level bitmap (must be 32 bits per pixel)
pub fn load_level(path: &Path, tile_size: i32, spawn_lift: f32) -> Result<TileMap, EngineError> {
    let image = load_rgba32(path)?;
    let map = TileMap::from_rgba(&image, tile_size, spawn_lift).map_err(|defect| {
        EngineError::InvalidLevel {
            path: path.to_path_buf(),
            reason: defect.to_string(),
        }
    })?;
    log::info!(
        "Loaded level {} ({}x{}, {} coins)",
        path.display(),
        map.width(),
        map.height(),
        map.count(TileFlags::COIN)
    );
    Ok(map)
}

/// Load `1.bmp`, `2.bmp`, ... from `dir` until the first missing number
pub fn load_levels(dir: &Path, tile_size: i32, spawn_lift: f32) -> Result<Vec<TileMap>, EngineError> {
    let mut levels = Vec::new();
    loop {
        let path: PathBuf = dir.join(format!("{}.bmp", levels.len() + 1));
        if !path.exists() {
            break;
        }
        levels.push(load_level(&path, tile_size, spawn_lift)?);
    }

    if levels.is_empty() {
        return Err(EngineError::NoLevels(dir.to_path_buf()));
    }
    log::info!("Loaded {} levels from {}", levels.len(), dir.display());
    Ok(levels)
}
