//! Checkered ground, a marble sphere and an optional image-mapped globe.
//!
//! Usage: textured_spheres [image] [output.png]

use std::sync::Arc;

use anyhow::Context;
use lumen_core::TextureCache;
use lumen_renderer::{
    render, Camera, CheckerTexture, Color, Dielectric, Hittable, ImageTexture, Lambertian,
    Material, NoiseTexture, RenderConfig, Scene, Sphere, Texture, Vec3,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let globe_path = args.next();
    let output = args.next().unwrap_or_else(|| "textured_spheres.png".to_string());

    let mut textures = TextureCache::new();
    let mut rng = StdRng::seed_from_u64(2024);
    let mut scene = Scene::new();

    let checker = CheckerTexture::from_colors(0.32, Color::new(0.2, 0.3, 0.1), Color::splat(0.9));
    let ground = Material::from(Lambertian::textured(Texture::from(checker).shared())).shared();
    scene.add(Hittable::from(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, ground)));

    let marble = Texture::from(NoiseTexture::new(4.0, &mut rng)).shared();
    let marble = Material::from(Lambertian::textured(marble)).shared();
    scene.add(Hittable::from(Sphere::new(Vec3::new(-2.2, 1.0, 0.0), 1.0, marble)));

    let glass = Material::from(Dielectric::new(1.5)).shared();
    scene.add(Hittable::from(Sphere::new(Vec3::new(2.2, 1.0, 0.0), 1.0, glass)));

    if let Some(path) = globe_path {
        let raster = textures
            .load(&path)
            .with_context(|| format!("loading texture {path}"))?;
        let globe = Texture::from(ImageTexture::new(raster)).shared();
        let globe = Material::from(Lambertian::textured(globe)).shared();
        scene.add(Hittable::from(Sphere::new(Vec3::new(0.0, 1.0, 1.5), 1.0, globe)));
    }

    scene.build_acceleration_structure()?;

    let camera = Camera::new()
        .with_resolution(480, 270)
        .with_quality(64, 12)
        .with_position(Vec3::new(0.0, 2.0, 9.0), Vec3::new(0.0, 1.0, 0.0), Vec3::Y)
        .with_lens(30.0, 0.4, 9.0)
        .with_background(Color::new(0.7, 0.8, 1.0));

    let result = render(Arc::new(scene), camera, RenderConfig::default())?;
    let rgb = result.to_rgb8();
    image::save_buffer(&output, &rgb.bytes, rgb.width, rgb.height, image::ColorType::Rgb8)
        .with_context(|| format!("writing {output}"))?;
    println!("Saved to {output}");

    Ok(())
}
