//! Pixel buffers and conversion to display bytes.

use crate::Color;
use rayon::prelude::*;

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Clamp a value to [0, 1] range.
#[inline]
pub fn clamp_01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

/// Convert an already gamma-corrected color to 8-bit RGB.
#[inline]
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    [
        (255.0 * clamp_01(color.x)) as u8,
        (255.0 * clamp_01(color.y)) as u8,
        (255.0 * clamp_01(color.z)) as u8,
    ]
}

/// Row-major image of linear or display colors.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Wrap row-major pixels. Returns `None` if the length does not match.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> Option<Self> {
        (pixels.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Multiply every pixel by `scale`, staying in linear space.
    pub fn scaled(&self, scale: f64) -> ImageBuffer {
        self.map_pixels(|c| c * scale)
    }

    /// Apply the gamma-2 curve to every channel.
    pub fn to_gamma(&self) -> ImageBuffer {
        self.map_pixels(|c| {
            Color::new(linear_to_gamma(c.x), linear_to_gamma(c.y), linear_to_gamma(c.z))
        })
    }

    /// Scale every pixel by `scale` then apply the gamma curve.
    pub fn resolve(&self, scale: f64) -> ImageBuffer {
        self.scaled(scale).to_gamma()
    }

    fn map_pixels(&self, f: impl Fn(Color) -> Color + Sync) -> ImageBuffer {
        ImageBuffer {
            width: self.width,
            height: self.height,
            pixels: self.pixels.par_iter().map(|&c| f(c)).collect(),
        }
    }

    /// Convert display colors to packed RGB bytes.
    pub fn to_rgb8(&self) -> RgbImage {
        let bytes = self
            .pixels
            .par_iter()
            .flat_map_iter(|&c| color_to_rgb(c))
            .collect();

        RgbImage {
            width: self.width,
            height: self.height,
            channels: 3,
            bytes,
        }
    }
}

/// 8-bit image handed to callers: row-major, `channels` bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    pub width: u32,
    pub height: u32,
    pub channels: u32,
    pub bytes: Vec<u8>,
}

impl RgbImage {
    /// RGB bytes of pixel (x, y).
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = (y as usize * self.width as usize + x as usize) * self.channels as usize;
        [self.bytes[i], self.bytes[i + 1], self.bytes[i + 2]]
    }
}
