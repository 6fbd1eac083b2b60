//! lumen core - texture assets for the renderer.
//!
//! This crate provides:
//!
//! - **Rasters**: decoded 8-bit RGB images handed to image textures
//! - **Texture cache**: path resolution, decoding and caching of texture files
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::TextureCache;
//!
//! let mut cache = TextureCache::with_base_dir("assets");
//! let earth = cache.load("earthmap.jpg")?;
//! println!("Loaded {}x{} raster", earth.width(), earth.height());
//! ```

pub mod texture;

// Re-export commonly used types
pub use texture::{Raster, TextureCache, TextureError, TextureResult};
