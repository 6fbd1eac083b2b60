//! Row tiles: the unit of parallel work within one pass.
//!
//! The image is cut into horizontal bands spanning the full width, one per
//! worker. Bands never overlap, so each can own its slice of the accumulator.

use crate::{ray_color, Camera, Color, Scene};
use rand::RngCore;

/// A horizontal band of full-width rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// First row of the band
    pub y: u32,
    /// Number of rows in the band
    pub height: u32,
    /// Full image width
    pub width: u32,
    /// Position of this tile top to bottom
    pub index: usize,
}

impl Tile {
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Split an image into `min(count, height)` row tiles; the last takes the remainder.
pub fn generate_row_tiles(width: u32, height: u32, count: usize) -> Vec<Tile> {
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let count = count.clamp(1, height as usize) as u32;
    let rows_per_tile = height / count;

    (0..count)
        .map(|i| {
            let y = i * rows_per_tile;
            let rows = if i + 1 == count { height - y } else { rows_per_tile };
            Tile {
                y,
                height: rows,
                width,
                index: i as usize,
            }
        })
        .collect()
}

/// Add one sample per pixel of `tile` into `accumulator` (row-major within the tile).
pub fn render_tile(
    tile: &Tile,
    camera: &Camera,
    scene: &Scene,
    accumulator: &mut [Color],
    rng: &mut dyn RngCore,
) {
    debug_assert_eq!(accumulator.len(), tile.pixel_count());

    let rows = accumulator.chunks_mut(tile.width as usize);
    for (local_y, row) in rows.enumerate() {
        let y = tile.y + local_y as u32;
        for (x, pixel) in row.iter_mut().enumerate() {
            let ray = camera.make_ray(x as u32, y, rng);
            *pixel += ray_color(&ray, camera.max_bounces, scene, camera, rng);
        }
    }
}

/// A tile's accumulator, handed back to the render thread after a pass.
#[derive(Debug, Clone)]
pub struct TileResult {
    pub tile: Tile,
    pub pixels: Vec<Color>,
}
