//! Camera for ray generation.

use crate::{sampling, Color, RenderError, RenderResult};
use lumen_math::{Interval, Ray, Vec3, Vec3Ext};
use rand::RngCore;

/// Pinhole or thin-lens camera.
///
/// Uses a left-handed basis: `right = up × forward`. Configure with the
/// `with_*` builders, then call [`Camera::initialize`] before generating rays.
#[derive(Clone, Debug)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,
    pub samples_per_pixel: u32,
    pub max_bounces: u32,

    // Positioning
    look_from: Vec3,
    look_at: Vec3,
    world_up: Vec3,

    // Lens
    vfov: f64,          // Vertical field of view in degrees
    defocus_angle: f64, // Cone angle of rays through each pixel, degrees
    focus_dist: f64,    // Distance to the plane of perfect focus

    /// Radiance returned for rays that escape the scene
    pub background: Color,
    /// Parametric range accepted for every scene query
    pub hit_range: Interval,

    // Cached by initialize()
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    pixel00: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    defocus_radius: f64,
    initialized: bool,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            image_width: 400,
            image_height: 225,
            samples_per_pixel: 10,
            max_bounces: 10,
            look_from: Vec3::ZERO,
            look_at: Vec3::Z,
            world_up: Vec3::Y,
            vfov: 70.0,
            defocus_angle: 0.0,
            focus_dist: 1.0,
            background: Color::ZERO,
            hit_range: Interval::new(0.001, f64::INFINITY),
            forward: Vec3::Z,
            right: Vec3::X,
            up: Vec3::Y,
            pixel00: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            defocus_radius: 0.0,
            initialized: false,
        }
    }

    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self.initialized = false;
        self
    }

    /// Set samples per pixel (one per pass) and the bounce limit.
    pub fn with_quality(mut self, samples: u32, max_bounces: u32) -> Self {
        self.samples_per_pixel = samples;
        self.max_bounces = max_bounces;
        self.initialized = false;
        self
    }

    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, world_up: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.world_up = world_up;
        self.initialized = false;
        self
    }

    /// Set lens settings. Angles in degrees; a zero `defocus_angle` is a pinhole.
    pub fn with_lens(mut self, vfov: f64, defocus_angle: f64, focus_dist: f64) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self.initialized = false;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn with_hit_range(mut self, min: f64, max: f64) -> Self {
        self.hit_range = Interval::new(min, max);
        self
    }

    /// Derive the view basis and viewport. Must be called before [`Camera::make_ray`].
    pub fn initialize(&mut self) -> RenderResult<()> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(RenderError::InvalidCamera(format!(
                "resolution {}x{} is empty",
                self.image_width, self.image_height
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidCamera("zero samples per pixel".into()));
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(RenderError::InvalidCamera(format!("vfov {} out of range", self.vfov)));
        }
        if self.focus_dist <= 0.0 {
            return Err(RenderError::InvalidCamera(format!(
                "focus distance {} must be positive",
                self.focus_dist
            )));
        }

        let view = self.look_at - self.look_from;
        let side = self.world_up.cross(view);
        if view.near_zero() || side.near_zero() {
            return Err(RenderError::InvalidCamera(
                "look direction is zero or parallel to world up".into(),
            ));
        }

        self.forward = view.normalize();
        self.right = side.normalize();
        self.up = self.forward.cross(self.right).normalize();

        let h = (self.vfov.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width =
            viewport_height * (self.image_width as f64 / self.image_height as f64);

        self.pixel_delta_u = self.right * (viewport_width / self.image_width as f64);
        self.pixel_delta_v = -self.up * (viewport_height / self.image_height as f64);

        let viewport_top_left = self.look_from + self.forward * self.focus_dist
            - self.right * (viewport_width / 2.0)
            + self.up * (viewport_height / 2.0);
        self.pixel00 = viewport_top_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        self.defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();
        self.initialized = true;

        log::debug!(
            "Camera {}x{} at {:?} facing {:?}, vfov {}",
            self.image_width,
            self.image_height,
            self.look_from,
            self.forward,
            self.vfov
        );
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// A jittered, lens-sampled ray through pixel `(x, y)`, with a random time in `[0, 1)`.
    pub fn make_ray(&self, x: u32, y: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sampling::sample_square(rng);
        let pixel_sample = self.pixel00
            + (x as f64 + offset.x) * self.pixel_delta_u
            + (y as f64 + offset.y) * self.pixel_delta_v;

        let origin = if self.defocus_angle > 0.0 {
            let p = self.defocus_radius * sampling::random_in_unit_disk(rng);
            self.look_from + p.x * self.right + p.y * self.up
        } else {
            self.look_from
        };

        let time = sampling::gen_f64(rng);
        Ray::new(origin, pixel_sample - origin, time)
    }

    /// Center of pixel (0, 0) on the focus plane.
    pub fn pixel00(&self) -> Vec3 {
        self.pixel00
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
