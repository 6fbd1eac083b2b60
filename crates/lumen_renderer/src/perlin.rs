//! Gradient (Perlin) noise.

use crate::sampling;
use lumen_math::Vec3;
use rand::{Rng, RngCore};

const POINT_COUNT: usize = 256;

/// Lattice gradient noise with three independent permutation tables.
pub struct Perlin {
    gradients: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    /// Build the gradient and permutation tables from `rng`.
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let gradients = (0..POINT_COUNT)
            .map(|_| {
                Vec3::new(
                    sampling::gen_range(rng, -1.0, 1.0),
                    sampling::gen_range(rng, -1.0, 1.0),
                    sampling::gen_range(rng, -1.0, 1.0),
                )
                .normalize_or_zero()
            })
            .collect();

        Self {
            gradients,
            perm_x: Self::generate_perm(rng),
            perm_y: Self::generate_perm(rng),
            perm_z: Self::generate_perm(rng),
        }
    }

    /// Fisher-Yates shuffle of `0..POINT_COUNT`.
    fn generate_perm(rng: &mut dyn RngCore) -> Vec<usize> {
        let mut perm: Vec<usize> = (0..POINT_COUNT).collect();
        for i in (1..POINT_COUNT).rev() {
            let target = rng.gen_range(0..=i);
            perm.swap(i, target);
        }
        perm
    }

    /// Noise value at `p`, roughly in `[-1, 1]`.
    pub fn noise(&self, p: Vec3) -> f64 {
        let floor = p.floor();
        let (u, v, w) = (p.x - floor.x, p.y - floor.y, p.z - floor.z);
        let (i, j, k) = (floor.x as i64, floor.y as i64, floor.z as i64);

        let mut c = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, corner) in row.iter_mut().enumerate() {
                    let index = self.perm_x[wrap(i + di as i64)]
                        ^ self.perm_y[wrap(j + dj as i64)]
                        ^ self.perm_z[wrap(k + dk as i64)];
                    *corner = self.gradients[index];
                }
            }
        }

        perlin_interp(&c, u, v, w)
    }

    /// Sum of `depth` octaves at halving weight and doubling frequency.
    pub fn turb(&self, p: Vec3, depth: u32) -> f64 {
        let mut accum = 0.0;
        let mut temp_p = p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }

        accum.abs()
    }
}

#[inline]
fn wrap(n: i64) -> usize {
    (n & (POINT_COUNT as i64 - 1)) as usize
}

/// Trilinear blend of the corner gradients with Hermite smoothing.
fn perlin_interp(c: &[[[Vec3; 2]; 2]; 2], u: f64, v: f64, w: f64) -> f64 {
    let uu = u * u * (3.0 - 2.0 * u);
    let vv = v * v * (3.0 - 2.0 * v);
    let ww = w * w * (3.0 - 2.0 * w);

    let mut accum = 0.0;
    for (i, plane) in c.iter().enumerate() {
        let fi = i as f64;
        for (j, row) in plane.iter().enumerate() {
            let fj = j as f64;
            for (k, gradient) in row.iter().enumerate() {
                let fk = k as f64;
                let weight = Vec3::new(u - fi, v - fj, w - fk);
                accum += (fi * uu + (1.0 - fi) * (1.0 - uu))
                    * (fj * vv + (1.0 - fj) * (1.0 - vv))
                    * (fk * ww + (1.0 - fk) * (1.0 - ww))
                    * gradient.dot(weight);
            }
        }
    }
    accum
}
