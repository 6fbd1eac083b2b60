//! Texture loading and caching for image textures.
//!
//! Decodes images from disk into 8-bit RGB rasters and caches them by path,
//! so several materials can share one decoded image.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Raster of {width}x{height} needs {expected} bytes, got {actual}")]
    InvalidRaster {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A decoded image: row-major, 3 bytes (R, G, B) per pixel, top row first.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Raster {
    /// Wrap decoded RGB bytes, checking that the length matches the dimensions.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> TextureResult<Self> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(TextureError::InvalidRaster {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True for a zero-sized raster (nothing to sample).
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The raw RGB bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// RGB triple at integer coordinates. Coordinates are clamped to the raster.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        if self.is_empty() {
            return [0, 0, 0];
        }
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let pixels: &[[u8; 3]] = bytemuck::cast_slice(&self.data);
        pixels[y * self.width as usize + x]
    }
}

/// Cache for loaded textures.
///
/// Textures are loaded on-demand and cached for reuse.
pub struct TextureCache {
    /// Cached rasters by requested path
    textures: HashMap<String, Arc<Raster>>,

    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl TextureCache {
    /// Create a new empty texture cache.
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: None,
        }
    }

    /// Create a texture cache with a base directory for relative paths.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load a texture from file, using cache if available.
    pub fn load(&mut self, path: &str) -> TextureResult<Arc<Raster>> {
        if let Some(raster) = self.textures.get(path) {
            return Ok(raster.clone());
        }

        let full_path = self.resolve_path(path);
        let raster = Arc::new(load_raster_file(&full_path)?);
        self.textures.insert(path.to_string(), raster.clone());

        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB)",
            full_path.display(),
            raster.width(),
            raster.height(),
            raster.as_bytes().len() as f64 / 1024.0
        );

        Ok(raster)
    }

    /// Get a cached texture without loading.
    pub fn get(&self, path: &str) -> Option<Arc<Raster>> {
        self.textures.get(path).cloned()
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Resolve a path relative to the base directory.
    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);

        match &self.base_dir {
            Some(base) if !path.is_absolute() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode an image file into an RGB8 raster.
fn load_raster_file(path: &Path) -> TextureResult<Raster> {
    if !path.exists() {
        return Err(TextureError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("texture not found: {}", path.display()),
        )));
    }

    let img = image::open(path).map_err(|source| TextureError::Decode {
        path: path.display().to_string(),
        source,
    })?;

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    Raster::new(width, height, rgb.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lumen_core_{}_{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_raster_rejects_wrong_length() {
        let err = Raster::new(2, 2, vec![0; 11]).unwrap_err();
        assert!(matches!(
            err,
            TextureError::InvalidRaster {
                expected: 12,
                actual: 11,
                ..
            }
        ));
    }

    #[test]
    fn test_raster_pixel_lookup() {
        // 2x1: red, then green
        let raster = Raster::new(2, 1, vec![255, 0, 0, 0, 255, 0]).unwrap();
        assert_eq!(raster.pixel(0, 0), [255, 0, 0]);
        assert_eq!(raster.pixel(1, 0), [0, 255, 0]);

        // Out of range coordinates clamp to the edge
        assert_eq!(raster.pixel(7, 3), [0, 255, 0]);
    }

    #[test]
    fn test_texture_cache_loads_and_caches() {
        let _ = env_logger::builder().is_test(true).try_init();

        let dir = scratch_dir("cache");
        let mut img = image::RgbImage::new(3, 2);
        img.put_pixel(2, 1, image::Rgb([10, 20, 30]));
        img.save(dir.join("tiny.png")).unwrap();

        let mut cache = TextureCache::with_base_dir(&dir);
        assert!(cache.is_empty());

        let raster = cache.load("tiny.png").unwrap();
        assert_eq!((raster.width(), raster.height()), (3, 2));
        assert_eq!(raster.pixel(2, 1), [10, 20, 30]);

        // Second load hands back the same shared raster
        let again = cache.load("tiny.png").unwrap();
        assert!(Arc::ptr_eq(&raster, &again));
        assert_eq!(cache.len(), 1);
        assert!(cache.get("tiny.png").is_some());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_texture_cache_missing_file() {
        let mut cache = TextureCache::with_base_dir(scratch_dir("missing"));
        let err = cache.load("does_not_exist.png").unwrap_err();
        assert!(matches!(err, TextureError::Io(_)));
        assert!(cache.is_empty());
    }
}
