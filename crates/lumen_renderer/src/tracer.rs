//! Progressive multi-pass path tracer.
//!
//! Each pass adds one sample to every pixel. Within a pass the row tiles run
//! on the worker pool; the render thread waits for every tile before the next
//! pass starts, so callbacks always observe a complete accumulator.

use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::tile::{generate_row_tiles, render_tile, TileResult};
use crate::{Camera, Color, ImageBuffer, RenderError, RenderResult, RgbImage, Scene, ThreadPool};
use lumen_math::Ray;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Scheduling settings, loadable from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Worker count; defaults to the hardware concurrency
    pub threads: Option<usize>,
    /// Base seed for every sample; defaults to a random seed
    pub seed: Option<u64>,
}

impl RenderConfig {
    pub fn resolved_threads(&self) -> usize {
        self.threads
            .unwrap_or_else(|| thread::available_parallelism().map_or(1, |n| n.get()))
            .max(1)
    }
}

type ProgressFn<'a> = Box<dyn FnMut(f64) + 'a>;
type PassFn<'a> = Box<dyn FnMut(&RgbImage) + 'a>;

/// Optional observers, run on the thread that called [`Tracer::render`].
#[derive(Default)]
pub struct RenderCallbacks<'a> {
    on_progress: Option<ProgressFn<'a>>,
    on_pass: Option<PassFn<'a>>,
}

impl<'a> RenderCallbacks<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called after every completed tile with the fraction of all work done.
    pub fn on_progress(mut self, f: impl FnMut(f64) + 'a) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    /// Called after every pass with a gamma-corrected preview, then once with the final image.
    pub fn on_pass(mut self, f: impl FnMut(&RgbImage) + 'a) -> Self {
        self.on_pass = Some(Box::new(f));
        self
    }

    fn progress(&mut self, fraction: f64) {
        if let Some(f) = self.on_progress.as_mut() {
            f(fraction);
        }
    }

    fn wants_preview(&self) -> bool {
        self.on_pass.is_some()
    }

    fn pass(&mut self, image: &RgbImage) {
        if let Some(f) = self.on_pass.as_mut() {
            f(image);
        }
    }
}

/// The completed render.
pub struct RenderOutput {
    linear: ImageBuffer,
    image: ImageBuffer,
}

impl RenderOutput {
    /// Per-pixel sample mean in linear radiance, before the gamma curve.
    pub fn linear(&self) -> &ImageBuffer {
        &self.linear
    }

    /// Display colors: the linear mean after the gamma-2 curve.
    pub fn image(&self) -> &ImageBuffer {
        &self.image
    }

    pub fn to_rgb8(&self) -> RgbImage {
        self.image.to_rgb8()
    }
}

/// Compute the color seen by a ray.
///
/// `depth` is the number of bounces left; at zero the path contributes
/// nothing further.
pub fn ray_color(
    ray: &Ray,
    depth: u32,
    scene: &Scene,
    camera: &Camera,
    rng: &mut dyn RngCore,
) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = scene.hit(ray, camera.hit_range, rng) else {
        return camera.background;
    };

    let emission = rec.material.emitted(rec.u, rec.v, rec.p);
    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            emission
                + result.attenuation * ray_color(&result.scattered, depth - 1, scene, camera, rng)
        }
        None => emission,
    }
}

/// Seed for one tile in one pass (SplitMix64 finalizer over the inputs).
fn tile_seed(seed: u64, pass: u32, tile: usize) -> u64 {
    let mut z = seed
        ^ (pass as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (tile as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Render context: a built scene, an initialized camera and scheduling settings.
pub struct Tracer {
    scene: Arc<Scene>,
    camera: Arc<Camera>,
    config: RenderConfig,
}

impl Tracer {
    /// Validate inputs. The camera is re-initialized, since its public
    /// fields may have changed after an earlier `initialize`.
    pub fn new(scene: Arc<Scene>, mut camera: Camera, config: RenderConfig) -> RenderResult<Self> {
        if !scene.is_built() {
            return Err(RenderError::SceneNotBuilt);
        }
        camera.initialize()?;

        Ok(Self {
            scene,
            camera: Arc::new(camera),
            config,
        })
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Run every pass and return the resolved image.
    pub fn render(&self, callbacks: &mut RenderCallbacks<'_>) -> RenderResult<RenderOutput> {
        let (width, height) = (self.camera.image_width, self.camera.image_height);
        let passes = self.camera.samples_per_pixel;
        let threads = self.config.resolved_threads();
        let seed = self.config.seed.unwrap_or_else(rand::random);

        let tiles = generate_row_tiles(width, height, threads);
        let total_tasks = (tiles.len() * passes as usize) as f64;
        let pool = ThreadPool::new(tiles.len())?;

        log::info!(
            "Rendering {}x{} at {} spp, {} bounces, {} tiles, seed {}",
            width,
            height,
            passes,
            self.camera.max_bounces,
            tiles.len(),
            seed
        );
        let start = Instant::now();

        let mut accumulators: Vec<Vec<Color>> = tiles
            .iter()
            .map(|tile| vec![Color::ZERO; tile.pixel_count()])
            .collect();
        let mut completed = 0usize;

        for pass in 0..passes {
            let (tx, rx) = mpsc::channel::<TileResult>();

            for (tile, pixels) in tiles.iter().copied().zip(accumulators.drain(..)) {
                let tx = tx.clone();
                let scene = Arc::clone(&self.scene);
                let camera = Arc::clone(&self.camera);

                pool.enqueue(move || {
                    let mut pixels = pixels;
                    let mut rng = StdRng::seed_from_u64(tile_seed(seed, pass, tile.index));
                    render_tile(&tile, &camera, &scene, &mut pixels, &mut rng);
                    log::trace!("Pass {pass} tile {} done", tile.index);
                    // The receiver only goes away when the render has already failed
                    let _ = tx.send(TileResult { tile, pixels });
                });
            }
            // Only task-held senders remain; a lost task closes the channel early
            drop(tx);

            let mut slots: Vec<Option<Vec<Color>>> = (0..tiles.len()).map(|_| None).collect();
            for _ in 0..tiles.len() {
                let result = rx.recv().map_err(|_| RenderError::WorkerLost)?;
                slots[result.tile.index] = Some(result.pixels);
                completed += 1;
                callbacks.progress(completed as f64 / total_tasks);
            }
            accumulators = slots
                .into_iter()
                .map(|slot| slot.ok_or(RenderError::WorkerLost))
                .collect::<RenderResult<_>>()?;

            if callbacks.wants_preview() {
                let preview = assemble(width, height, &accumulators)?.resolve(1.0 / (pass + 1) as f64);
                callbacks.pass(&preview.to_rgb8());
            }
            log::debug!("Pass {}/{} complete", pass + 1, passes);
        }

        let linear = assemble(width, height, &accumulators)?.scaled(1.0 / passes as f64);
        let image = linear.to_gamma();
        if callbacks.wants_preview() {
            callbacks.pass(&image.to_rgb8());
        }

        log::info!("Render finished in {:.2?}", start.elapsed());
        Ok(RenderOutput { linear, image })
    }
}

/// Concatenate tile accumulators (top to bottom) into one image.
fn assemble(width: u32, height: u32, tiles: &[Vec<Color>]) -> RenderResult<ImageBuffer> {
    let pixels = tiles.concat();
    ImageBuffer::from_pixels(width, height, pixels).ok_or(RenderError::WorkerLost)
}

/// Render `scene` through `camera` without callbacks.
pub fn render(scene: Arc<Scene>, camera: Camera, config: RenderConfig) -> RenderResult<RenderOutput> {
    Tracer::new(scene, camera, config)?.render(&mut RenderCallbacks::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Hittable, Lambertian, Metal, Sphere};
    use lumen_math::Vec3;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn built(scene: Scene) -> Arc<Scene> {
        let mut scene = scene;
        scene.build_acceleration_structure().expect("build scene");
        Arc::new(scene)
    }

    fn fixed(threads: usize, seed: u64) -> RenderConfig {
        RenderConfig {
            threads: Some(threads),
            seed: Some(seed),
        }
    }

    fn mirror_sphere_scene() -> Arc<Scene> {
        let mut scene = Scene::new();
        scene.add(Hittable::from(Sphere::new(
            Vec3::new(0.0, 0.0, 3.0),
            1.0,
            Arc::new(Metal::new(Color::ONE, 0.0).into()),
        )));
        built(scene)
    }

    #[test]
    fn test_empty_scene_renders_background() {
        init_logger();
        let background = Color::new(0.70, 0.80, 1.00);
        let camera = Camera::new()
            .with_resolution(16, 9)
            .with_quality(3, 5)
            .with_background(background);

        let output = render(built(Scene::new()), camera, fixed(4, 1)).expect("render");
        let expected = Color::new(0.7f64.sqrt(), 0.8f64.sqrt(), 1.0);

        assert_eq!(output.image().pixels.len(), 16 * 9);
        for pixel in &output.image().pixels {
            assert!((*pixel - expected).length() < 1e-12);
        }
    }

    #[test]
    fn test_bounce_limit_truncates_to_black() {
        init_logger();
        let camera = Camera::new()
            .with_resolution(9, 9)
            .with_quality(1, 1)
            .with_background(Color::ZERO);

        let output = render(mirror_sphere_scene(), camera, fixed(2, 7)).expect("render");
        assert_eq!(output.image().get(4, 4), Color::ZERO);
        assert_eq!(output.to_rgb8().pixel(4, 4), [0, 0, 0]);
    }

    #[test]
    fn test_bounce_limit_with_bright_background() {
        // Misses see the background; the mirror is cut off after one bounce
        let camera = Camera::new()
            .with_resolution(9, 9)
            .with_quality(2, 1)
            .with_background(Color::ONE);

        let output = render(mirror_sphere_scene(), camera, fixed(3, 7)).expect("render");
        assert_eq!(output.image().get(4, 4), Color::ZERO);
        assert_eq!(output.image().get(0, 0), Color::ONE);
        assert_eq!(output.to_rgb8().pixel(8, 8), [255, 255, 255]);
    }

    #[test]
    fn test_ray_color_adds_emission_and_attenuation() {
        let mut scene = Scene::new();
        scene.add(Hittable::from(Sphere::new(
            Vec3::new(0.0, 0.0, 3.0),
            1.0,
            Arc::new(Lambertian::new(Color::splat(0.5)).into()),
        )));
        let scene = built(scene);
        let camera = Camera::new().with_background(Color::ONE);
        let mut rng = StdRng::seed_from_u64(3);

        let miss = Ray::new_simple(Vec3::ZERO, -Vec3::Z);
        assert_eq!(ray_color(&miss, 4, &scene, &camera, &mut rng), Color::ONE);
        assert_eq!(ray_color(&miss, 0, &scene, &camera, &mut rng), Color::ZERO);

        // Diffuse bounce off the front of the sphere escapes to the sky: 0.5 * 1
        let hit = Ray::new_simple(Vec3::ZERO, Vec3::Z);
        let c = ray_color(&hit, 2, &scene, &camera, &mut rng);
        assert_eq!(c, Color::splat(0.5));
    }

    #[test]
    fn test_fixed_seed_is_deterministic() {
        let make_camera = || {
            Camera::new()
                .with_resolution(12, 8)
                .with_quality(4, 4)
                .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, 3.0), Vec3::Y)
                .with_background(Color::new(0.6, 0.7, 0.9))
        };
        let mut scene = Scene::new();
        scene.add(Hittable::from(Sphere::new(
            Vec3::new(0.0, 0.0, 3.0),
            1.0,
            Arc::new(Lambertian::new(Color::splat(0.5)).into()),
        )));
        let scene = built(scene);

        let a = render(Arc::clone(&scene), make_camera(), fixed(3, 99)).expect("render");
        let b = render(Arc::clone(&scene), make_camera(), fixed(3, 99)).expect("render");
        assert_eq!(a.image(), b.image());
    }

    #[test]
    fn test_callbacks_fire_per_tile_and_pass() {
        init_logger();
        let camera = Camera::new()
            .with_resolution(8, 6)
            .with_quality(3, 2)
            .with_background(Color::splat(0.25));
        let tracer = Tracer::new(built(Scene::new()), camera, fixed(2, 5)).expect("tracer");

        let mut fractions = Vec::new();
        let mut previews = Vec::new();
        let mut callbacks = RenderCallbacks::new()
            .on_progress(|f| fractions.push(f))
            .on_pass(|image| previews.push(image.clone()));
        let output = tracer.render(&mut callbacks).expect("render");
        drop(callbacks);

        // 2 tiles x 3 passes
        assert_eq!(fractions.len(), 6);
        assert!(fractions.windows(2).all(|w| w[0] < w[1]));
        assert!((fractions[5] - 1.0).abs() < 1e-12);

        // One preview per pass plus the final image
        assert_eq!(previews.len(), 4);
        for preview in &previews {
            assert_eq!((preview.width, preview.height, preview.channels), (8, 6, 3));
            // sqrt(0.25) = 0.5 on every pass, since the background is constant
            assert_eq!(preview.pixel(0, 0), [127, 127, 127]);
        }
        assert_eq!(previews[3], output.to_rgb8());
    }

    #[test]
    fn test_unbuilt_scene_rejected() {
        let result = Tracer::new(Arc::new(Scene::new()), Camera::new(), RenderConfig::default());
        assert!(matches!(result, Err(RenderError::SceneNotBuilt)));
    }

    #[test]
    fn test_invalid_camera_rejected() {
        let camera = Camera::new().with_resolution(0, 0);
        let result = Tracer::new(built(Scene::new()), camera, RenderConfig::default());
        assert!(matches!(result, Err(RenderError::InvalidCamera(_))));
    }

    #[test]
    fn test_camera_changed_after_initialize_is_revalidated() {
        let mut camera = Camera::new()
            .with_resolution(8, 8)
            .with_background(Color::ONE);
        camera.initialize().expect("valid camera");

        let zero_samples = camera.clone().with_quality(0, 5);
        assert!(!zero_samples.is_initialized());
        let result = Tracer::new(built(Scene::new()), zero_samples, RenderConfig::default());
        assert!(matches!(result, Err(RenderError::InvalidCamera(_))));

        // Public fields bypass the builders, so the tracer checks again
        let mut edited = camera;
        edited.image_height = 0;
        let result = Tracer::new(built(Scene::new()), edited, RenderConfig::default());
        assert!(matches!(result, Err(RenderError::InvalidCamera(_))));
    }

    #[test]
    fn test_linear_output_is_sample_mean() {
        let background = Color::new(0.25, 0.5, 1.0);
        let camera = Camera::new()
            .with_resolution(4, 4)
            .with_quality(3, 2)
            .with_background(background);

        let output = render(built(Scene::new()), camera, fixed(2, 11)).expect("render");
        for (linear, display) in output.linear().pixels.iter().zip(&output.image().pixels) {
            assert!((*linear - background).length() < 1e-12);
            assert!((*display - Color::new(0.5, 0.5f64.sqrt(), 1.0)).length() < 1e-12);
        }
    }

    #[test]
    fn test_config_from_json() {
        let config: RenderConfig =
            serde_json::from_str(r#"{ "threads": 6 }"#).expect("parse config");
        assert_eq!(config.threads, Some(6));
        assert_eq!(config.seed, None);
        assert_eq!(config.resolved_threads(), 6);

        let defaults: RenderConfig = serde_json::from_str("{}").expect("parse config");
        assert_eq!(defaults, RenderConfig::default());
        assert!(defaults.resolved_threads() >= 1);
    }

    #[test]
    fn test_tile_seeds_differ() {
        assert_ne!(tile_seed(1, 0, 0), tile_seed(1, 0, 1));
        assert_ne!(tile_seed(1, 0, 0), tile_seed(1, 1, 0));
        assert_eq!(tile_seed(1, 2, 3), tile_seed(1, 2, 3));
    }
}
