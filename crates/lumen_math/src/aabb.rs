use crate::{Interval, Ray, Vec3};

/// Minimum width of any box axis. Flat primitives (quads, disks) would
/// otherwise produce zero-thickness slabs.
const MIN_AXIS_WIDTH: f64 = 0.00025;

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Create an AABB from two corner points (in any order).
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self::new(
            Interval::new(a.x.min(b.x), a.x.max(b.x)),
            Interval::new(a.y.min(b.y), a.y.max(b.y)),
            Interval::new(a.z.min(b.z), a.z.max(b.z)),
        )
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Uses the slab method: each axis clips the running parametric range,
    /// and the box is missed as soon as that range becomes empty.
    pub fn hit(&self, ray: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let adinv = 1.0 / ray.direction[axis];
            let origin = ray.origin[axis];

            let mut t0 = (slab.min - origin) * adinv;
            let mut t1 = (slab.max - origin) * adinv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            if t0 > ray_t.min {
                ray_t.min = t0;
            }
            if t1 < ray_t.max {
                ray_t.max = t1;
            }
            if ray_t.max <= ray_t.min {
                return false;
            }
        }
        true
    }

    /// Pad intervals to avoid zero-width AABBs (degenerate cases).
    fn pad_to_minimums(&mut self) {
        if self.x.size() < MIN_AXIS_WIDTH {
            self.x = self.x.expand(MIN_AXIS_WIDTH);
        }
        if self.y.size() < MIN_AXIS_WIDTH {
            self.y = self.y.expand(MIN_AXIS_WIDTH);
        }
        if self.z.size() < MIN_AXIS_WIDTH {
            self.z = self.z.expand(MIN_AXIS_WIDTH);
        }
    }

    /// Translate (move) the AABB by an offset vector.
    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb::new(
            self.x.add_scalar(offset.x),
            self.y.add_scalar(offset.y),
            self.z.add_scalar(offset.z),
        )
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    pub fn longest_axis(&self) -> usize {
        let x_size = self.x.size();
        let y_size = self.y.size();
        let z_size = self.z.size();

        if x_size > y_size {
            if x_size > z_size {
                0
            } else {
                2
            }
        } else if y_size > z_size {
            1
        } else {
            2
        }
    }

    /// The 8 corner points of the box.
    pub fn corners(&self) -> [Vec3; 8] {
        let mut corners = [Vec3::ZERO; 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            *corner = Vec3::new(
                if i & 1 == 0 { self.x.min } else { self.x.max },
                if i & 2 == 0 { self.y.min } else { self.y.max },
                if i & 4 == 0 { self.z.min } else { self.z.max },
            );
        }
        corners
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    pub const UNIVERSE: Aabb = Aabb {
        x: Interval::UNIVERSE,
        y: Interval::UNIVERSE,
        z: Interval::UNIVERSE,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_from_points() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 10.0), Vec3::new(0.0, 10.0, 0.0));

        assert_eq!(aabb.x, Interval::new(0.0, 10.0));
        assert_eq!(aabb.y, Interval::new(0.0, 10.0));
        assert_eq!(aabb.z, Interval::new(0.0, 10.0));
    }

    #[test]
    fn test_aabb_flat_axis_is_padded() {
        let flat = Aabb::from_points(Vec3::new(0.0, 0.0, 2.0), Vec3::new(1.0, 1.0, 2.0));

        assert!((flat.z.size() - MIN_AXIS_WIDTH).abs() < 1e-12);
        assert!(((flat.z.min + flat.z.max) / 2.0 - 2.0).abs() < 1e-12);
        assert_eq!(flat.x.size(), 1.0);

        // A ray hitting the flat box head-on still registers
        let ray = Ray::new(Vec3::new(0.5, 0.5, 0.0), Vec3::Z, 0.0);
        assert!(flat.hit(&ray, Interval::new(0.001, f64::INFINITY)));
    }

    #[test]
    fn test_aabb_surrounding() {
        let box1 = Aabb::from_points(Vec3::ZERO, Vec3::splat(5.0));
        let box2 = Aabb::from_points(Vec3::splat(3.0), Vec3::splat(10.0));
        let surrounding = Aabb::surrounding(&box1, &box2);

        assert_eq!(surrounding.x.min, 0.0);
        assert_eq!(surrounding.x.max, 10.0);
        assert_eq!(Aabb::surrounding(&Aabb::EMPTY, &box1), box1);
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        let range = Interval::new(0.0, 100.0);

        // Ray pointing at center
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);
        assert!(aabb.hit(&ray, range));

        // Ray pointing away
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), -Vec3::Z, 0.0);
        assert!(!aabb.hit(&ray, range));

        // Ray missing the box
        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::Z, 0.0);
        assert!(!aabb.hit(&ray, range));

        // Axis-parallel ray inside the slab (zero direction components)
        let ray = Ray::new(Vec3::new(0.5, 0.5, -5.0), Vec3::Z, 0.0);
        assert!(aabb.hit(&ray, range));
    }

    #[test]
    fn test_aabb_hit_is_monotonic_in_interval() {
        let aabb = Aabb::from_points(Vec3::new(-1.0, -1.0, 4.0), Vec3::new(1.0, 1.0, 6.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.1, -0.05, 1.0), 0.0);

        let mut max = 100.0;
        let mut previous = aabb.hit(&ray, Interval::new(0.001, max));
        assert!(previous);
        while max > 0.01 {
            max *= 0.8;
            let current = aabb.hit(&ray, Interval::new(0.001, max));
            // Shrinking may turn a hit into a miss, never the reverse
            assert!(previous || !current);
            previous = current;
        }
        assert!(!previous);
    }

    #[test]
    fn test_aabb_longest_axis() {
        assert_eq!(Aabb::from_points(Vec3::ZERO, Vec3::new(10.0, 1.0, 1.0)).longest_axis(), 0);
        assert_eq!(Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 10.0, 1.0)).longest_axis(), 1);
        assert_eq!(Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 1.0, 10.0)).longest_axis(), 2);
    }

    #[test]
    fn test_aabb_translate_and_corners() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let translated = aabb.translate(Vec3::new(5.0, 0.0, 0.0));

        assert_eq!(translated.x, Interval::new(5.0, 6.0));
        assert_eq!(translated.y.min, 0.0);

        let corners = aabb.corners();
        assert!(corners.contains(&Vec3::ZERO));
        assert!(corners.contains(&Vec3::ONE));
        assert!(corners.contains(&Vec3::new(1.0, 0.0, 1.0)));
    }
}
