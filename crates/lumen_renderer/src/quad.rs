//! Planar primitives: parallelograms, triangles and disks.
//!
//! All three share one plane intersection. The hit point is expressed in the
//! affine basis `(u, v)` anchored at `q`, and the shape only decides which
//! `(a, b)` coordinates lie inside it.

use std::sync::Arc;

use crate::{hittable::HitRecord, HittableList, Material};
use lumen_math::{Aabb, Interval, Ray, Vec3};

/// Interior test applied to the plane coordinates of a hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuadShape {
    /// Both coordinates in `[0, 1]`.
    Parallelogram,
    /// `a > 0`, `b > 0`, `a + b < 1`.
    Triangle,
    /// `a² + b² <= r²`, centered on `q`.
    Disk { radius: f64 },
}

impl QuadShape {
    #[inline]
    fn is_interior(&self, a: f64, b: f64) -> bool {
        match *self {
            QuadShape::Parallelogram => {
                let unit = Interval::new(0.0, 1.0);
                unit.contains(a) && unit.contains(b)
            }
            QuadShape::Triangle => a > 0.0 && b > 0.0 && a + b < 1.0,
            QuadShape::Disk { radius } => a * a + b * b <= radius * radius,
        }
    }
}

/// A planar primitive spanned by corner `q` and edges `u`, `v`.
pub struct Quad {
    q: Vec3,
    u: Vec3,
    v: Vec3,
    /// `n / (n·n)` with `n = u × v`, used to recover plane coordinates
    w: Vec3,
    normal: Vec3,
    /// Plane offset: `normal · p = d` for every point on the plane
    d: f64,
    shape: QuadShape,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Quad {
    /// A parallelogram with corners `q`, `q+u`, `q+v`, `q+u+v`.
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: Arc<Material>) -> Self {
        Self::with_shape(q, u, v, QuadShape::Parallelogram, material)
    }

    /// A triangle with corners `q`, `q+u`, `q+v`.
    pub fn triangle(q: Vec3, u: Vec3, v: Vec3, material: Arc<Material>) -> Self {
        Self::with_shape(q, u, v, QuadShape::Triangle, material)
    }

    /// A disk of `radius` (in units of the edge vectors) centered on `q`.
    pub fn disk(radius: f64, q: Vec3, u: Vec3, v: Vec3, material: Arc<Material>) -> Self {
        Self::with_shape(q, u, v, QuadShape::Disk { radius }, material)
    }

    pub fn with_shape(q: Vec3, u: Vec3, v: Vec3, shape: QuadShape, material: Arc<Material>) -> Self {
        let n = u.cross(v);
        let normal = n.normalize();

        Self {
            q,
            u,
            v,
            w: n / n.dot(n),
            normal,
            d: normal.dot(q),
            shape,
            material,
            bbox: Self::make_bbox(q, u, v, shape),
        }
    }

    fn make_bbox(q: Vec3, u: Vec3, v: Vec3, shape: QuadShape) -> Aabb {
        match shape {
            QuadShape::Parallelogram | QuadShape::Triangle => {
                let diagonal1 = Aabb::from_points(q, q + u + v);
                let diagonal2 = Aabb::from_points(q + u, q + v);
                Aabb::surrounding(&diagonal1, &diagonal2)
            }
            QuadShape::Disk { radius } => {
                let (ru, rv) = (u * radius, v * radius);
                let diagonal1 = Aabb::from_points(q - ru - rv, q + ru + rv);
                let diagonal2 = Aabb::from_points(q + ru - rv, q - ru + rv);
                Aabb::surrounding(&diagonal1, &diagonal2)
            }
        }
    }

    pub fn shape(&self) -> QuadShape {
        self.shape
    }

    pub fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let denom = self.normal.dot(ray.direction());

        // Ray is parallel to the plane
        if denom.abs() < 1e-8 {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.contains(t) {
            return None;
        }

        let qp = ray.at(t) - self.q;
        let a = self.w.dot(qp.cross(self.v));
        let b = self.w.dot(self.u.cross(qp));
        if !self.shape.is_interior(a, b) {
            return None;
        }

        Some(HitRecord::new(ray, t, self.normal, (a, b), &self.material))
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// The six faces of the axis-aligned box with opposite corners `a` and `b`.
pub fn make_box(a: Vec3, b: Vec3, material: Arc<Material>) -> HittableList {
    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    let faces = [
        Quad::new(Vec3::new(min.x, min.y, max.z), dx, dy, material.clone()), // front
        Quad::new(Vec3::new(max.x, min.y, max.z), -dz, dy, material.clone()), // right
        Quad::new(Vec3::new(max.x, min.y, min.z), -dx, dy, material.clone()), // back
        Quad::new(Vec3::new(min.x, min.y, min.z), dz, dy, material.clone()), // left
        Quad::new(Vec3::new(min.x, max.y, max.z), dx, -dz, material.clone()), // top
        Quad::new(Vec3::new(min.x, min.y, min.z), dx, dz, material),         // bottom
    ];

    let mut sides = HittableList::new();
    for face in faces {
        sides.add(crate::Hittable::from(face));
    }
    sides
}
