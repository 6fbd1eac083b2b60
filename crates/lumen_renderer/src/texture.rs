//! Spatially varying colors sampled by materials.

use std::sync::Arc;

use crate::{Color, Perlin};
use lumen_core::Raster;
use lumen_math::{Interval, Vec3};
use rand::RngCore;

/// Every kind of texture a material can sample.
pub enum Texture {
    Solid(Color),
    Checker(CheckerTexture),
    Image(ImageTexture),
    Noise(NoiseTexture),
}

impl Texture {
    pub fn solid(color: Color) -> Self {
        Texture::Solid(color)
    }

    /// Color at surface coordinates `(u, v)` and world point `p`.
    pub fn value(&self, u: f64, v: f64, p: Vec3) -> Color {
        match self {
            Texture::Solid(color) => *color,
            Texture::Checker(checker) => checker.value(u, v, p),
            Texture::Image(image) => image.value(u, v),
            Texture::Noise(noise) => noise.value(p),
        }
    }

    pub fn shared(self) -> Arc<Texture> {
        Arc::new(self)
    }
}

impl From<Color> for Texture {
    fn from(color: Color) -> Self {
        Texture::Solid(color)
    }
}

impl From<CheckerTexture> for Texture {
    fn from(checker: CheckerTexture) -> Self {
        Texture::Checker(checker)
    }
}

impl From<ImageTexture> for Texture {
    fn from(image: ImageTexture) -> Self {
        Texture::Image(image)
    }
}

impl From<NoiseTexture> for Texture {
    fn from(noise: NoiseTexture) -> Self {
        Texture::Noise(noise)
    }
}

/// Solid 3-D checkerboard alternating between two sub-textures.
pub struct CheckerTexture {
    inv_scale: f64,
    even: Arc<Texture>,
    odd: Arc<Texture>,
}

impl CheckerTexture {
    pub fn new(scale: f64, even: Arc<Texture>, odd: Arc<Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    pub fn from_colors(scale: f64, even: Color, odd: Color) -> Self {
        Self::new(scale, Texture::solid(even).shared(), Texture::solid(odd).shared())
    }

    pub fn value(&self, u: f64, v: f64, p: Vec3) -> Color {
        let cell = (p * self.inv_scale).floor();
        let parity = (cell.x as i64 + cell.y as i64 + cell.z as i64).rem_euclid(2);

        if parity == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// Nearest-texel lookup into a decoded raster.
pub struct ImageTexture {
    raster: Arc<Raster>,
}

impl ImageTexture {
    pub fn new(raster: Arc<Raster>) -> Self {
        Self { raster }
    }

    pub fn value(&self, u: f64, v: f64) -> Color {
        // Cyan makes a missing image obvious in the render
        if self.raster.is_empty() {
            return Color::new(0.0, 1.0, 1.0);
        }

        let unit = Interval::new(0.0, 1.0);
        let u = unit.clamp(u);
        // Image rows run top to bottom, v runs bottom to top
        let v = 1.0 - unit.clamp(v);

        let x = (u * self.raster.width() as f64) as u32;
        let y = (v * self.raster.height() as f64) as u32;
        let [r, g, b] = self.raster.pixel(x, y);

        Color::new(r as f64, g as f64, b as f64) / 255.0
    }
}

/// Marble-like pattern driven by Perlin turbulence along Z.
pub struct NoiseTexture {
    noise: Perlin,
    scale: f64,
    octaves: u32,
}

impl NoiseTexture {
    pub const DEFAULT_OCTAVES: u32 = 7;

    pub fn new(scale: f64, rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
            octaves: Self::DEFAULT_OCTAVES,
        }
    }

    pub fn with_octaves(mut self, octaves: u32) -> Self {
        self.octaves = octaves;
        self
    }

    pub fn value(&self, p: Vec3) -> Color {
        let phase = self.scale * p.z + 10.0 * self.noise.turb(p, self.octaves);
        Color::splat(0.5 * (1.0 + phase.sin()))
    }
}
