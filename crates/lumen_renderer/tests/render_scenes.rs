//! End-to-end renders of small scenes with known answers.

use std::io::Write;
use std::sync::atomic::AtomicBool;

use lumen_core::{Mesh, RenderSettings, Transform};
use lumen_renderer::{
    Color, Dielectric, Image, ImageSink, Lambert, MaterialId, OutputError, Renderer, SceneBuilder,
    TriangleMesh, Vec3,
};

/// Keeps nothing; renders are inspected through `Renderer::image`.
struct NullSink;

impl ImageSink for NullSink {
    fn write(&mut self, _name: &str, _image: &Image) -> Result<(), OutputError> {
        Ok(())
    }
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A 1x1 pinhole view of the origin with a very narrow field of view.
fn spot_settings(eye: Vec3, seed: u64) -> RenderSettings {
    RenderSettings {
        width: 1,
        height: 1,
        fov: 0.01,
        focal_length: 1.0,
        f_stop: None,
        samples_per_pixel: 64,
        seed,
        camera: Transform::look_at(eye, Vec3::ZERO, Vec3::Y),
        ..Default::default()
    }
}

fn render(renderer: &mut Renderer, iterations: u32) -> anyhow::Result<()> {
    let cancel = AtomicBool::new(false);
    renderer.render_multiple("test", Some(iterations), &mut NullSink, &cancel)?;
    Ok(())
}

/// Unit disc light at height 1 above the origin, facing down.
fn add_disc_light(builder: &mut SceneBuilder) {
    let black = builder.add_material(Lambert::new(Color::ZERO));
    let disc = builder.add_disc(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y, 1.0, black);
    builder.add_light(disc, Color::ONE);
}

fn add_floor(builder: &mut SceneBuilder, material: MaterialId) {
    builder.add_triangle(
        Vec3::new(-100.0, 0.0, 100.0),
        Vec3::new(100.0, 0.0, 100.0),
        Vec3::new(0.0, 0.0, -100.0),
        material,
    );
}

#[test]
fn test_disc_light_over_floor_converges_to_closed_form() -> anyhow::Result<()> {
    init_logger();

    let albedo = 0.5;
    let mut builder = SceneBuilder::new();
    let floor = builder.add_material(Lambert::new(Color::splat(albedo)));
    add_floor(&mut builder, floor);
    add_disc_light(&mut builder);

    let settings = spot_settings(Vec3::new(0.0, 0.5, 3.0), 42);
    let mut renderer = Renderer::new(builder.build(), &settings)?;
    render(&mut renderer, 100)?;

    // Lo = albedo * L * R^2 / (h^2 + R^2) for a point on the disc's axis
    let expected = albedo * 1.0 / (1.0 + 1.0);
    let pixel = renderer.image().get(0, 0);
    assert!((pixel.x - expected).abs() < 0.02, "pixel = {}", pixel);
    assert!((pixel.y - pixel.x).abs() < 1e-6 && (pixel.z - pixel.x).abs() < 1e-6);
    Ok(())
}

#[test]
fn test_obj_floor_matches_triangle_floor() -> anyhow::Result<()> {
    init_logger();

    let file_name = format!("lumen_floor_{}.obj", std::process::id());
    let path = std::env::temp_dir().join(file_name);
    let mut file = std::fs::File::create(&path)?;
    writeln!(file, "v -50 0 -50\nv 50 0 -50\nv 50 0 50\nv -50 0 50")?;
    writeln!(file, "vn 0 1 0")?;
    writeln!(file, "f 1//1 3//1 2//1\nf 1//1 4//1 3//1")?;
    drop(file);

    let mesh = Mesh::load_obj(&path)?;
    std::fs::remove_file(&path).ok();

    let mut builder = SceneBuilder::new();
    let floor = builder.add_material(Lambert::new(Color::splat(0.8)));
    assert_eq!(builder.add_mesh(TriangleMesh::from_mesh(&mesh, Vec3::ZERO), floor), 2);
    add_disc_light(&mut builder);

    let settings = spot_settings(Vec3::new(0.0, 0.5, 3.0), 3);
    let mut renderer = Renderer::new(builder.build(), &settings)?;
    render(&mut renderer, 100)?;

    let pixel = renderer.image().get(0, 0);
    assert!((pixel.x - 0.4).abs() < 0.03, "pixel = {}", pixel);
    Ok(())
}

#[test]
fn test_enclosed_scene_without_emitters_is_black() -> anyhow::Result<()> {
    init_logger();

    let mut builder = SceneBuilder::new();
    let wall = builder.add_material(Lambert::new(Color::splat(0.7)));
    let corners = [
        Vec3::new(-2.0, -2.0, -2.0),
        Vec3::new(2.0, -2.0, -2.0),
        Vec3::new(2.0, 2.0, -2.0),
        Vec3::new(-2.0, 2.0, -2.0),
        Vec3::new(-2.0, -2.0, 2.0),
        Vec3::new(2.0, -2.0, 2.0),
        Vec3::new(2.0, 2.0, 2.0),
        Vec3::new(-2.0, 2.0, 2.0),
    ];
    for [a, b, c, d] in [
        [0, 1, 2, 3],
        [5, 4, 7, 6],
        [4, 0, 3, 7],
        [1, 5, 6, 2],
        [3, 2, 6, 7],
        [4, 5, 1, 0],
    ] {
        builder.add_triangle(corners[a], corners[b], corners[c], wall);
        builder.add_triangle(corners[a], corners[c], corners[d], wall);
    }

    let settings = RenderSettings {
        width: 16,
        height: 12,
        samples_per_pixel: 2,
        f_stop: None,
        camera: Transform::look_at(Vec3::new(0.0, 0.0, 1.5), Vec3::ZERO, Vec3::Y),
        ..Default::default()
    };
    let mut renderer = Renderer::new(builder.build(), &settings)?;
    render(&mut renderer, 5)?;

    assert_eq!(renderer.image().iterations(), 5);
    assert!(renderer.image().pixels().iter().all(|p| *p == Color::ZERO));
    Ok(())
}

#[test]
fn test_near_unity_ior_is_transparent() -> anyhow::Result<()> {
    init_logger();

    // A pane of "glass" matching the surrounding medium in front of a light
    let mut builder = SceneBuilder::new();
    let glass = builder.add_material(Dielectric::new(Color::ONE, 1.0001));
    let black = builder.add_material(Lambert::new(Color::ZERO));
    builder.add_disc(Vec3::new(0.0, 0.0, 1.0), Vec3::Z, 10.0, glass);
    let lamp = builder.add_disc(Vec3::ZERO, Vec3::Z, 5.0, black);
    builder.add_light(lamp, Color::splat(2.0));

    let settings = spot_settings(Vec3::new(0.0, 0.0, 3.0), 9);
    let mut renderer = Renderer::new(builder.build(), &settings)?;
    render(&mut renderer, 10)?;

    let pixel = renderer.image().get(0, 0);
    let error = (pixel - Color::splat(2.0)).abs().max_element();
    assert!(error < 0.02, "pixel = {}", pixel);
    Ok(())
}

#[test]
fn test_independent_seeds_converge_to_same_value() -> anyhow::Result<()> {
    init_logger();

    let build = || {
        let mut builder = SceneBuilder::new();
        let floor = builder.add_material(Lambert::new(Color::new(0.9, 0.5, 0.1)));
        add_floor(&mut builder, floor);
        add_disc_light(&mut builder);
        builder.build()
    };

    let eye = Vec3::new(0.3, 0.6, 2.0);
    let mut a = Renderer::new(build(), &spot_settings(eye, 1))?;
    let mut b = Renderer::new(build(), &spot_settings(eye, 2))?;
    render(&mut a, 60)?;
    render(&mut b, 60)?;

    let pa = a.image().get(0, 0);
    let pb = b.image().get(0, 0);
    assert_ne!(pa, pb);
    assert!((pa - pb).abs().max_element() < 0.03, "{} vs {}", pa, pb);
    Ok(())
}
