//! Parameter ranges along a ray.
//!
//! Every intersection query takes an `Interval` of acceptable `t` values and
//! narrows it as closer hits are found, so the same type also bounds AABB slabs.

/// Closed range `[min, max]`. `min > max` means empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Negative for an empty interval.
    pub fn size(&self) -> f64 {
        self.max - self.min
    }

    /// Inclusive test. Quads use this for their `t` check.
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Exclusive test, the acceptance rule for sphere roots.
    ///
    /// Once closest-hit search narrows `max` to the best `t` so far, a sphere
    /// root at exactly that distance is rejected and the earlier hit stands.
    pub fn surrounds(&self, x: f64) -> bool {
        self.min < x && x < self.max
    }

    pub fn clamp(&self, x: f64) -> f64 {
        x.max(self.min).min(self.max)
    }

    /// Grow by `delta` in total, half on each side. Used to pad flat boxes.
    pub fn expand(&self, delta: f64) -> Interval {
        let half = delta / 2.0;
        Interval::new(self.min - half, self.max + half)
    }

    /// Shift both ends, as when translating a bounding box.
    pub fn add_scalar(&self, displacement: f64) -> Interval {
        Interval::new(self.min + displacement, self.max + displacement)
    }

    /// Smallest interval covering both `a` and `b`.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }

    /// Contains nothing; the identity for [`Interval::surrounding`].
    pub const EMPTY: Interval = Interval {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    pub const UNIVERSE: Interval = Interval {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };
}

impl Default for Interval {
    fn default() -> Self {
        Self::EMPTY
    }
}
