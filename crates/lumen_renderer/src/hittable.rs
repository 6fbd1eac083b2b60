//! The closed set of ray-intersectable objects and the hit record they produce.

use std::sync::Arc;

use crate::{BvhNode, ConstantMedium, Material, Quad, RotateY, Sphere, Translate};
use lumen_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// Record of a ray-object intersection.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a Material,
    /// UV texture coordinates
    pub u: f64,
    pub v: f64,
    /// Parameter t where the intersection occurs
    pub t: f64,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a record at distance `t`, orienting `outward_normal` against the ray.
    pub fn new(
        ray: &Ray,
        t: f64,
        outward_normal: Vec3,
        (u, v): (f64, f64),
        material: &'a Material,
    ) -> Self {
        let mut rec = Self {
            p: ray.at(t),
            normal: outward_normal,
            material,
            u,
            v,
            t,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        // If the ray and normal point in the same direction, we're inside
        self.front_face = ray.direction().dot(outward_normal) < 0.0;

        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Every kind of object a ray can hit.
///
/// Children are shared through `Arc` because the same object may be reachable
/// from more than one parent (a single-object BVH node, or a wrapper).
pub enum Hittable {
    Sphere(Sphere),
    Quad(Quad),
    Bvh(BvhNode),
    List(HittableList),
    Translate(Translate),
    RotateY(RotateY),
    Medium(ConstantMedium),
}

impl Hittable {
    /// Test if a ray hits this object within the given interval.
    ///
    /// `rng` is only consumed by participating media (free-flight sampling).
    pub fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        match self {
            Hittable::Sphere(sphere) => sphere.hit(ray, ray_t),
            Hittable::Quad(quad) => quad.hit(ray, ray_t),
            Hittable::Bvh(node) => node.hit(ray, ray_t, rng),
            Hittable::List(list) => list.hit(ray, ray_t, rng),
            Hittable::Translate(translate) => translate.hit(ray, ray_t, rng),
            Hittable::RotateY(rotate) => rotate.hit(ray, ray_t, rng),
            Hittable::Medium(medium) => medium.hit(ray, ray_t, rng),
        }
    }

    /// Get the axis-aligned bounding box of this object.
    pub fn bounding_box(&self) -> Aabb {
        match self {
            Hittable::Sphere(sphere) => sphere.bounding_box(),
            Hittable::Quad(quad) => quad.bounding_box(),
            Hittable::Bvh(node) => node.bounding_box(),
            Hittable::List(list) => list.bounding_box(),
            Hittable::Translate(translate) => translate.bounding_box(),
            Hittable::RotateY(rotate) => rotate.bounding_box(),
            Hittable::Medium(medium) => medium.bounding_box(),
        }
    }

    /// Move into shared ownership.
    pub fn shared(self) -> Arc<Hittable> {
        Arc::new(self)
    }
}

impl From<Sphere> for Hittable {
    fn from(sphere: Sphere) -> Self {
        Hittable::Sphere(sphere)
    }
}

impl From<Quad> for Hittable {
    fn from(quad: Quad) -> Self {
        Hittable::Quad(quad)
    }
}

impl From<BvhNode> for Hittable {
    fn from(node: BvhNode) -> Self {
        Hittable::Bvh(node)
    }
}

impl From<HittableList> for Hittable {
    fn from(list: HittableList) -> Self {
        Hittable::List(list)
    }
}

impl From<Translate> for Hittable {
    fn from(translate: Translate) -> Self {
        Hittable::Translate(translate)
    }
}

impl From<RotateY> for Hittable {
    fn from(rotate: RotateY) -> Self {
        Hittable::RotateY(rotate)
    }
}

impl From<ConstantMedium> for Hittable {
    fn from(medium: ConstantMedium) -> Self {
        Hittable::Medium(medium)
    }
}

/// A flat list of hittable objects, scanned linearly.
///
/// Used to group geometry under a single transform, and as the brute-force
/// reference for the BVH.
pub struct HittableList {
    objects: Vec<Arc<Hittable>>,
    bbox: Aabb,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    /// Create a list from existing shared objects.
    pub fn from_objects(objects: Vec<Arc<Hittable>>) -> Self {
        let mut list = Self::new();
        for object in objects {
            list.add(object);
        }
        list
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: impl Into<Arc<Hittable>>) {
        let object = object.into();
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    pub fn objects(&self) -> &[Arc<Hittable>] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let mut closest: Option<HitRecord<'a>> = None;

        for object in &self.objects {
            let max = closest.as_ref().map_or(ray_t.max, |rec| rec.t);
            if let Some(rec) = object.hit(ray, Interval::new(ray_t.min, max), rng) {
                closest = Some(rec);
            }
        }

        closest
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Lambertian};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Arc<Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)).into())
    }

    #[test]
    fn test_face_normal_points_against_ray() {
        let material = gray();
        let ray = Ray::new_simple(Vec3::ZERO, -Vec3::Z);

        let front = HitRecord::new(&ray, 1.0, Vec3::Z, (0.0, 0.0), &material);
        assert!(front.front_face);
        assert_eq!(front.normal, Vec3::Z);

        let back = HitRecord::new(&ray, 1.0, -Vec3::Z, (0.0, 0.0), &material);
        assert!(!back.front_face);
        assert_eq!(back.normal, Vec3::Z);
        assert_eq!(back.p, Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_list_returns_closest_regardless_of_order() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut list = HittableList::new();
        list.add(Hittable::from(Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0, gray())));
        list.add(Hittable::from(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, gray())));
        list.add(Hittable::from(Sphere::new(Vec3::new(0.0, 0.0, -20.0), 1.0, gray())));

        let ray = Ray::new_simple(Vec3::ZERO, -Vec3::Z);
        let rec = list
            .hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rng)
            .expect("ray should hit");
        assert!((rec.t - 4.0).abs() < 1e-9);
        assert_eq!(list.len(), 3);
        assert_eq!(list.bounding_box().z, Interval::new(-21.0, -4.0));
    }

    #[test]
    fn test_empty_list_misses() {
        let mut rng = StdRng::seed_from_u64(1);
        let list = HittableList::new();
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::X);
        assert!(list.hit(&ray, Interval::UNIVERSE, &mut rng).is_none());
        assert!(list.is_empty());
    }
}
