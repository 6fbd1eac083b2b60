//! Sphere primitive for ray tracing.

use std::f64::consts::PI;
use std::sync::Arc;

use crate::{hittable::HitRecord, Material};
use lumen_math::{Aabb, Interval, Ray, Vec3};

/// A sphere primitive, optionally moving linearly over the shutter interval.
pub struct Sphere {
    /// Center at ray time 0
    center: Vec3,
    /// Displacement over the shutter interval (zero for static spheres)
    velocity: Vec3,
    radius: f64,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new stationary sphere.
    pub fn new(center: Vec3, radius: f64, material: Arc<Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);

        Self {
            center,
            velocity: Vec3::ZERO,
            radius,
            material,
            bbox: Aabb::from_points(center - rvec, center + rvec),
        }
    }

    /// Create a sphere moving from `center0` at time 0 to `center1` at time 1.
    pub fn moving(center0: Vec3, center1: Vec3, radius: f64, material: Arc<Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let box0 = Aabb::from_points(center0 - rvec, center0 + rvec);
        let box1 = Aabb::from_points(center1 - rvec, center1 + rvec);

        Self {
            center: center0,
            velocity: center1 - center0,
            radius,
            material,
            bbox: Aabb::surrounding(&box0, &box1),
        }
    }

    /// Center position at the given ray time.
    #[inline]
    pub fn center_at(&self, time: f64) -> Vec3 {
        self.center + self.velocity * time
    }

    /// Both ray parameters where the ray crosses the sphere surface, nearest first.
    ///
    /// Geometric method: project the center onto the ray, then step back and
    /// forth by the half chord length. Assumes a normalized ray direction.
    pub fn roots(&self, ray: &Ray) -> Option<(f64, f64)> {
        let l = self.center_at(ray.time()) - ray.origin();
        let tca = l.dot(ray.direction());
        let d2 = l.length_squared() - tca * tca;
        let r2 = self.radius * self.radius;
        if d2 > r2 {
            return None;
        }
        let thc = (r2 - d2).sqrt();
        Some((tca - thc, tca + thc))
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Vec3) -> (f64, f64) {
        // theta: angle down from +Y
        // phi: angle around Y axis from +X
        let theta = (-p.y).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }

    pub fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let (t0, t1) = self.roots(ray)?;

        // Find the nearest root in the acceptable range
        let root = if ray_t.surrounds(t0) {
            t0
        } else if ray_t.surrounds(t1) {
            t1
        } else {
            return None;
        };

        let outward_normal = (ray.at(root) - self.center_at(ray.time())) / self.radius;
        Some(HitRecord::new(
            ray,
            root,
            outward_normal,
            Self::get_sphere_uv(outward_normal),
            &self.material,
        ))
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
