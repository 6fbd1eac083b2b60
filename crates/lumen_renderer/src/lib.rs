//! lumen renderer - CPU path tracing
//!
//! A progressive Monte Carlo path tracer: geometry and a BVH, materials and
//! textures, a thin-lens camera, and a tile scheduler on a worker pool.

mod buffer;
mod bvh;
mod camera;
mod error;
mod hittable;
mod instance;
mod material;
mod medium;
mod perlin;
mod quad;
mod scene;
mod sphere;
mod texture;
mod thread_pool;
mod tile;
mod tracer;

pub mod sampling;

pub use buffer::{clamp_01, color_to_rgb, linear_to_gamma, ImageBuffer, RgbImage};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use error::{RenderError, RenderResult, SceneError};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use instance::{RotateY, Translate};
pub use material::{
    Color, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, ScatterResult,
};
pub use medium::ConstantMedium;
pub use perlin::Perlin;
pub use quad::{make_box, Quad, QuadShape};
pub use scene::Scene;
pub use sphere::Sphere;
pub use texture::{CheckerTexture, ImageTexture, NoiseTexture, Texture};
pub use thread_pool::ThreadPool;
pub use tile::{generate_row_tiles, render_tile, Tile, TileResult};
pub use tracer::{ray_color, render, RenderCallbacks, RenderConfig, RenderOutput, Tracer};

/// Re-export Vec3 and common math types from lumen_math
pub use lumen_math::{Aabb, Interval, Ray, Vec3};
