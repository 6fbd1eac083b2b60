// Transform utilities for DMat4
//
// Extends glam::DMat4 with the bounding-box helper used by instance wrappers.
// Note: glam::DMat4 already provides transform_point3() and transform_vector3()

use crate::{Aabb, DMat4, Vec3};

/// Extension trait for DMat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat4Ext for DMat4 {
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        let mut result_min = Vec3::splat(f64::INFINITY);
        let mut result_max = Vec3::splat(f64::NEG_INFINITY);

        for corner in aabb.corners() {
            let transformed = self.transform_point3(corner);
            result_min = result_min.min(transformed);
            result_max = result_max.max(transformed);
        }

        Aabb::from_points(result_min, result_max)
    }
}
