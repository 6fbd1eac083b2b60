//! Surface and volume materials.

use std::sync::Arc;

use crate::{hittable::HitRecord, sampling, Texture};
use lumen_math::{Ray, Vec3, Vec3Ext};
use rand::RngCore;

/// Linear RGB color. Components are unbounded until the final resolve.
pub type Color = Vec3;

/// Outcome of a scattering event.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Per-channel throughput multiplier for the scattered path
    pub attenuation: Color,
    /// Continuation ray, starting at the hit point
    pub scattered: Ray,
}

/// Every kind of material a surface or medium can carry.
pub enum Material {
    Lambertian(Lambertian),
    Metal(Metal),
    Dielectric(Dielectric),
    DiffuseLight(DiffuseLight),
    Isotropic(Isotropic),
}

impl Material {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` when the path is absorbed (lights never scatter).
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        match self {
            Material::Lambertian(m) => m.scatter(ray_in, rec, rng),
            Material::Metal(m) => m.scatter(ray_in, rec, rng),
            Material::Dielectric(m) => m.scatter(ray_in, rec, rng),
            Material::DiffuseLight(_) => None,
            Material::Isotropic(m) => m.scatter(ray_in, rec, rng),
        }
    }

    /// Light emitted at the given surface coordinates. Black for everything but lights.
    pub fn emitted(&self, u: f64, v: f64, p: Vec3) -> Color {
        match self {
            Material::DiffuseLight(light) => light.emit.value(u, v, p),
            _ => Color::ZERO,
        }
    }

    pub fn shared(self) -> Arc<Material> {
        Arc::new(self)
    }
}

/// Lambertian (diffuse) material.
pub struct Lambertian {
    albedo: Arc<Texture>,
}

impl Lambertian {
    /// Create a new Lambertian material with a solid albedo.
    pub fn new(albedo: Color) -> Self {
        Self::textured(Arc::new(Texture::solid(albedo)))
    }

    pub fn textured(albedo: Arc<Texture>) -> Self {
        Self { albedo }
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let mut direction = rec.normal + sampling::random_unit_vector(rng);

        // Catch degenerate scatter direction
        if direction.near_zero() {
            direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, direction, ray_in.time()),
        })
    }
}

/// Metal (specular) material.
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}

impl Metal {
    /// `fuzz` of 0 is a perfect mirror; values are clamped to `[0, 1]`.
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let reflected = ray_in.direction().reflect_about(rec.normal);
        let direction = reflected + self.fuzz * sampling::random_in_unit_sphere(rng);

        // Fuzzed rays that dip below the surface are kept; the next bounce
        // sorts them out.
        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, direction, ray_in.time()),
        })
    }
}

/// Dielectric (glass) material.
pub struct Dielectric {
    /// Index of refraction relative to the enclosing medium
    ior: f64,
}

impl Dielectric {
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f64) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f64, ratio: f64) -> f64 {
        let r0 = ((1.0 - ratio) / (1.0 + ratio)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let ratio = if rec.front_face { 1.0 / self.ior } else { self.ior };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        let cannot_refract = ratio * sin_theta > 1.0;
        let direction = if cannot_refract
            || Self::reflectance(cos_theta, ratio) > sampling::gen_f64(rng)
        {
            unit_direction.reflect_about(rec.normal)
        } else {
            unit_direction.refract_through(rec.normal, ratio)
        };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction, ray_in.time()),
        })
    }
}

/// Diffuse light emitter.
pub struct DiffuseLight {
    emit: Arc<Texture>,
}

impl DiffuseLight {
    pub fn new(emit: Color) -> Self {
        Self::textured(Arc::new(Texture::solid(emit)))
    }

    pub fn textured(emit: Arc<Texture>) -> Self {
        Self { emit }
    }
}

/// Phase function for participating media: scatter uniformly in all directions.
pub struct Isotropic {
    albedo: Arc<Texture>,
}

impl Isotropic {
    pub fn new(albedo: Color) -> Self {
        Self::textured(Arc::new(Texture::solid(albedo)))
    }

    pub fn textured(albedo: Arc<Texture>) -> Self {
        Self { albedo }
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        Some(ScatterResult {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, sampling::random_unit_vector(rng), ray_in.time()),
        })
    }
}

impl From<Lambertian> for Material {
    fn from(m: Lambertian) -> Self {
        Material::Lambertian(m)
    }
}

impl From<Metal> for Material {
    fn from(m: Metal) -> Self {
        Material::Metal(m)
    }
}

impl From<Dielectric> for Material {
    fn from(m: Dielectric) -> Self {
        Material::Dielectric(m)
    }
}

impl From<DiffuseLight> for Material {
    fn from(m: DiffuseLight) -> Self {
        Material::DiffuseLight(m)
    }
}

impl From<Isotropic> for Material {
    fn from(m: Isotropic) -> Self {
        Material::Isotropic(m)
    }
}
