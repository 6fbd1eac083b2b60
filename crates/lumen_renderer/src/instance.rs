//! Instance wrappers that place shared geometry in the world.
//!
//! Rather than copying an object to move or rotate it, the wrapper moves the
//! incoming ray into the object's local frame, asks the object, and moves the
//! resulting hit back out.

use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable};
use lumen_math::{Aabb, DMat4, Interval, Mat4Ext, Ray, Vec3};
use rand::RngCore;

/// An object displaced by a fixed offset.
pub struct Translate {
    object: Arc<Hittable>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: impl Into<Arc<Hittable>>, offset: Vec3) -> Self {
        let object = object.into();
        let bbox = object.bounding_box().translate(offset);
        Self {
            object,
            offset,
            bbox,
        }
    }

    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    pub fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let local_ray = Ray::new(ray.origin() - self.offset, ray.direction(), ray.time());

        let mut rec = self.object.hit(&local_ray, ray_t, rng)?;
        rec.p += self.offset;
        Some(rec)
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// An object rotated about the world Y axis.
pub struct RotateY {
    object: Arc<Hittable>,
    sin_theta: f64,
    cos_theta: f64,
    bbox: Aabb,
}

impl RotateY {
    /// Rotate `object` by `angle` degrees about +Y.
    pub fn new(object: impl Into<Arc<Hittable>>, angle: f64) -> Self {
        let object = object.into();
        let radians = angle.to_radians();
        let bbox = DMat4::from_rotation_y(radians).transform_aabb(&object.bounding_box());

        log::trace!("RotateY {angle} deg, world bbox {bbox:?}");

        Self {
            object,
            sin_theta: radians.sin(),
            cos_theta: radians.cos(),
            bbox,
        }
    }

    #[inline]
    fn to_object(&self, p: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * p.x - self.sin_theta * p.z,
            p.y,
            self.sin_theta * p.x + self.cos_theta * p.z,
        )
    }

    #[inline]
    fn to_world(&self, p: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * p.x + self.sin_theta * p.z,
            p.y,
            -self.sin_theta * p.x + self.cos_theta * p.z,
        )
    }

    pub fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let local_ray = Ray::new(
            self.to_object(ray.origin()),
            self.to_object(ray.direction()),
            ray.time(),
        );

        // Rotation preserves length, so t carries over unchanged
        let mut rec = self.object.hit(&local_ray, ray_t, rng)?;
        rec.p = self.to_world(rec.p);
        rec.normal = self.to_world(rec.normal);
        Some(rec)
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{make_box, Color, Lambertian, Material, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Arc<Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)).into())
    }

    const RANGE: Interval = Interval::new(0.001, f64::INFINITY);

    #[test]
    fn test_translate_moves_hit_and_bbox() {
        let mut rng = StdRng::seed_from_u64(0);
        let sphere = Hittable::from(Sphere::new(Vec3::ZERO, 1.0, gray()));
        let moved = Translate::new(sphere, Vec3::new(0.0, 0.0, -5.0));

        let ray = Ray::new_simple(Vec3::ZERO, -Vec3::Z);
        let rec = moved.hit(&ray, RANGE, &mut rng).expect("moved sphere");
        assert!((rec.t - 4.0).abs() < 1e-9);
        assert!((rec.p - Vec3::new(0.0, 0.0, -4.0)).length() < 1e-9);
        assert!(moved.bounding_box().z.contains(-5.5));
        assert!(!moved.bounding_box().z.contains(0.5));
    }

    #[test]
    fn test_rotate_round_trip() {
        let rotate = RotateY::new(Hittable::from(Sphere::new(Vec3::ZERO, 1.0, gray())), 37.0);
        let p = Vec3::new(1.5, -2.0, 0.25);
        assert!((rotate.to_world(rotate.to_object(p)) - p).length() < 1e-12);
        assert!((rotate.to_object(rotate.to_world(p)) - p).length() < 1e-12);
    }

    fn assert_same_hit(bare: &Hittable, wrapped: &Hittable) {
        let mut rng = StdRng::seed_from_u64(5);
        let rays = [
            Ray::new_simple(Vec3::new(0.0, 0.0, -5.0), Vec3::Z),
            Ray::new_simple(Vec3::new(0.3, 0.4, 4.0), Vec3::new(-0.1, -0.05, -1.0)),
            Ray::new_simple(Vec3::new(-6.0, 1.0, 2.0), Vec3::new(1.0, -0.1, -0.35)),
        ];

        for ray in &rays {
            let expected = bare.hit(ray, RANGE, &mut rng).expect("bare sphere");
            let actual = wrapped.hit(ray, RANGE, &mut rng).expect("wrapped sphere");
            assert!((actual.t - expected.t).abs() < 1e-9);
            assert!((actual.p - expected.p).length() < 1e-9);
            assert!((actual.normal - expected.normal).length() < 1e-9);
        }
    }

    #[test]
    fn test_translate_then_inverse_offset_is_identity() {
        let sphere = Arc::new(Hittable::from(Sphere::new(
            Vec3::new(0.5, 0.0, 0.25),
            1.5,
            gray(),
        )));
        let offset = Vec3::new(2.0, -3.0, 7.5);
        let there = Translate::new(Arc::clone(&sphere), offset);
        let back = Hittable::from(Translate::new(Hittable::from(there), -offset));

        assert_same_hit(&sphere, &back);
    }

    #[test]
    fn test_rotate_then_inverse_angle_is_identity() {
        let sphere = Arc::new(Hittable::from(Sphere::new(
            Vec3::new(1.0, 0.0, -0.5),
            1.5,
            gray(),
        )));
        let turned = RotateY::new(Arc::clone(&sphere), 37.0);
        let back = Hittable::from(RotateY::new(Hittable::from(turned), -37.0));

        assert_same_hit(&sphere, &back);
    }

    #[test]
    fn test_rotated_box_hit_normal_is_world_space() {
        let mut rng = StdRng::seed_from_u64(0);
        // Unit cube centered on the origin, turned a quarter turn
        let cube = make_box(Vec3::splat(-1.0), Vec3::splat(1.0), gray());
        let rotated = RotateY::new(Hittable::from(cube), 90.0);

        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
        let rec = rotated.hit(&ray, RANGE, &mut rng).expect("rotated cube");
        assert!((rec.t - 4.0).abs() < 1e-9);
        assert!((rec.p.z - 1.0).abs() < 1e-9);
        assert!((rec.normal - Vec3::Z).length() < 1e-9);
    }

    #[test]
    fn test_rotated_bbox_contains_moved_object() {
        // Sphere off to +X ends up near -Z after 90 degrees
        let sphere = Hittable::from(Sphere::new(Vec3::new(3.0, 0.0, 0.0), 1.0, gray()));
        let rotated = RotateY::new(sphere, 90.0);

        let bbox = rotated.bounding_box();
        assert!(bbox.z.contains(-3.0));
        assert!(bbox.x.contains(0.0));
        assert!(!bbox.x.contains(3.0));
    }
}
