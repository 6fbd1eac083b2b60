//! Participating media of uniform density (smoke, fog).

use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable};
use crate::{sampling, Color, Isotropic, Material, Texture};
use lumen_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// A volume filling a closed boundary with constant density.
///
/// Rays entering the boundary travel an exponentially distributed distance
/// before scattering; if that exceeds the chord through the volume, they
/// pass straight through.
pub struct ConstantMedium {
    boundary: Arc<Hittable>,
    neg_inv_density: f64,
    phase_function: Material,
}

impl ConstantMedium {
    pub fn new(boundary: impl Into<Arc<Hittable>>, density: f64, texture: Arc<Texture>) -> Self {
        Self {
            boundary: boundary.into(),
            neg_inv_density: -1.0 / density,
            phase_function: Isotropic::textured(texture).into(),
        }
    }

    pub fn with_color(boundary: impl Into<Arc<Hittable>>, density: f64, albedo: Color) -> Self {
        Self::new(boundary, density, Arc::new(Texture::solid(albedo)))
    }

    pub fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        // Entry and exit along the whole line, then clipped to the query
        let entry = self.boundary.hit(ray, Interval::UNIVERSE, rng)?;
        let exit = self
            .boundary
            .hit(ray, Interval::new(entry.t + 0.0001, f64::INFINITY), rng)?;

        let mut t1 = entry.t.max(ray_t.min);
        let t2 = exit.t.min(ray_t.max);
        if t1 >= t2 {
            return None;
        }
        t1 = t1.max(0.0);

        let ray_length = ray.direction().length();
        let distance_inside = (t2 - t1) * ray_length;
        let hit_distance = self.neg_inv_density * sampling::gen_f64(rng).ln();
        if hit_distance > distance_inside {
            return None;
        }

        let t = t1 + hit_distance / ray_length;
        Some(HitRecord {
            p: ray.at(t),
            // Normal and facing are arbitrary inside a volume
            normal: Vec3::X,
            material: &self.phase_function,
            u: 0.0,
            v: 0.0,
            t,
            front_face: true,
        })
    }

    pub fn bounding_box(&self) -> Aabb {
        self.boundary.bounding_box()
    }
}
