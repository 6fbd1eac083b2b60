//! Math primitives for lumen: double-precision vectors, rays, intervals
//! and axis-aligned bounding boxes.

// Re-export glam for convenience
pub use glam;

/// Three doubles. Points, directions and linear colors all use this type.
pub use glam::DVec3 as Vec3;
pub use glam::DMat4;

mod aabb;
mod interval;
mod ray;
mod transform;
mod vector;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::Mat4Ext;
pub use vector::Vec3Ext;
