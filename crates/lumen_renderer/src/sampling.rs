//! Random sampling helpers shared by the camera, materials and media.
//!
//! Every helper draws from an injected generator so callers control seeding.

use lumen_math::Vec3;
use rand::{Rng, RngCore};

/// Uniform `f64` in `[0, 1)`.
#[inline]
pub fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen::<f64>()
}

/// Uniform `f64` in `[min, max)`.
#[inline]
pub fn gen_range(rng: &mut dyn RngCore, min: f64, max: f64) -> f64 {
    min + (max - min) * gen_f64(rng)
}

/// Sample a random point in the square [-0.5, 0.5] x [-0.5, 0.5] (z = 0).
pub fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f64(rng) - 0.5, gen_f64(rng) - 0.5, 0.0)
}

/// Sample a uniform point in the unit disk (z = 0) by rejection.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_range(rng, -1.0, 1.0), gen_range(rng, -1.0, 1.0), 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Sample a uniform point inside the unit sphere by rejection.
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_range(rng, -1.0, 1.0),
            gen_range(rng, -1.0, 1.0),
            gen_range(rng, -1.0, 1.0),
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Generate a random unit vector, uniformly distributed on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_in_unit_sphere(rng);
        let len_sq = p.length_squared();
        if len_sq > 1e-160 {
            return p / len_sq.sqrt();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_samples_stay_in_their_domains() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..1000 {
            let s = sample_square(&mut rng);
            assert!((-0.5..0.5).contains(&s.x) && (-0.5..0.5).contains(&s.y));

            let d = random_in_unit_disk(&mut rng);
            assert!(d.length_squared() < 1.0 && d.z == 0.0);

            assert!(random_in_unit_sphere(&mut rng).length_squared() < 1.0);
            assert!((random_unit_vector(&mut rng).length() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_same_seed_same_samples() {
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        assert_eq!(random_unit_vector(&mut a), random_unit_vector(&mut b));
    }
}
