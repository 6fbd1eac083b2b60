//! Cornell box with two smoke-filled blocks.
//!
//! Usage: cornell_smoke [config.json] [output.png]
//!
//! The optional JSON file holds a `RenderConfig`, e.g. `{ "threads": 8, "seed": 1 }`.

use std::sync::Arc;

use anyhow::Context;
use lumen_renderer::{
    make_box, Camera, Color, ConstantMedium, DiffuseLight, Hittable, Lambertian, Material, Quad,
    RenderCallbacks, RenderConfig, RotateY, Scene, Tracer, Translate, Vec3,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {path}"))?;
            serde_json::from_str::<RenderConfig>(&text)
                .with_context(|| format!("parsing config {path}"))?
        }
        None => RenderConfig::default(),
    };
    let output = args.next().unwrap_or_else(|| "cornell_smoke.png".to_string());

    let start = std::time::Instant::now();
    let scene = Arc::new(build_scene()?);
    println!("Scene built with {} objects in {:?}", scene.len(), start.elapsed());

    let camera = Camera::new()
        .with_resolution(400, 400)
        .with_quality(100, 10)
        .with_position(
            Vec3::new(278.0, 278.0, -800.0), // look_from
            Vec3::new(278.0, 278.0, 0.0),    // look_at
            Vec3::Y,                         // world up
        )
        .with_lens(40.0, 0.0, 10.0)
        .with_background(Color::ZERO);

    let tracer = Tracer::new(scene, camera, config)?;
    let mut last_percent = 0;
    let mut callbacks = RenderCallbacks::new().on_progress(|fraction| {
        let percent = (fraction * 100.0) as u32;
        if percent >= last_percent + 10 {
            last_percent = percent;
            println!("{percent}%");
        }
    });
    let result = tracer.render(&mut callbacks)?;

    let rgb = result.to_rgb8();
    image::save_buffer(&output, &rgb.bytes, rgb.width, rgb.height, image::ColorType::Rgb8)
        .with_context(|| format!("writing {output}"))?;
    println!("Saved to {output}");

    Ok(())
}

fn build_scene() -> anyhow::Result<Scene> {
    let red = Material::from(Lambertian::new(Color::new(0.65, 0.05, 0.05))).shared();
    let white = Material::from(Lambertian::new(Color::splat(0.73))).shared();
    let green = Material::from(Lambertian::new(Color::new(0.12, 0.45, 0.15))).shared();
    let light = Material::from(DiffuseLight::new(Color::splat(15.0))).shared();

    let mut scene = Scene::new();
    let walls = [
        (Vec3::ZERO, Vec3::new(0.0, 555.0, 0.0), Vec3::new(0.0, 0.0, 555.0), &green),
        (Vec3::new(555.0, 0.0, 0.0), Vec3::new(0.0, 555.0, 0.0), Vec3::new(0.0, 0.0, 555.0), &red),
        (Vec3::new(343.0, 554.0, 332.0), Vec3::new(-130.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -105.0), &light),
        (Vec3::ZERO, Vec3::new(555.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 555.0), &white),
        (Vec3::splat(555.0), Vec3::new(-555.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -555.0), &white),
        (Vec3::new(0.0, 0.0, 555.0), Vec3::new(555.0, 0.0, 0.0), Vec3::new(0.0, 555.0, 0.0), &white),
    ];
    for (q, u, v, material) in walls {
        scene.add(Hittable::from(Quad::new(q, u, v, Arc::clone(material))));
    }

    // Tall block of dark smoke
    let tall = make_box(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), Arc::clone(&white));
    let tall = RotateY::new(Hittable::from(tall), 15.0);
    let tall = Translate::new(Hittable::from(tall), Vec3::new(265.0, 0.0, 295.0));
    scene.add(Hittable::from(ConstantMedium::with_color(
        Hittable::from(tall),
        0.01,
        Color::ZERO,
    )));

    // Short block of white smoke
    let short = make_box(Vec3::ZERO, Vec3::splat(165.0), white);
    let short = RotateY::new(Hittable::from(short), -18.0);
    let short = Translate::new(Hittable::from(short), Vec3::new(130.0, 0.0, 65.0));
    scene.add(Hittable::from(ConstantMedium::with_color(
        Hittable::from(short),
        0.01,
        Color::ONE,
    )));

    scene.build_acceleration_structure()?;
    Ok(scene)
}
