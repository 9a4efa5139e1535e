//! Cornell box example.
//!
//! Renders a Cornell-style box lit by a disc light and writes an EXR plus a
//! PNG preview after every iteration.
//!
//! Run with: cargo run --release --example cornell -- [settings.json] [mesh.obj]

use std::env;
use std::sync::atomic::AtomicBool;

use anyhow::Result;
use lumen_core::{Mesh, RenderSettings, Transform};
use lumen_renderer::{
    Color, Dielectric, ExrWriter, Image, ImageSink, Lambert, MaterialId, OutputError, Phong,
    PngWriter, Renderer, SceneBuilder, TriangleMesh, Vec3, IOR_GLASS,
};

/// Writes every iteration both as linear EXR and as an 8-bit preview.
struct ExrAndPreview {
    exr: ExrWriter,
    png: PngWriter,
}

impl ImageSink for ExrAndPreview {
    fn write(&mut self, name: &str, image: &Image) -> Result<(), OutputError> {
        self.exr.write(name, image)?;
        self.png.write(name, image)
    }
}

fn add_quad(builder: &mut SceneBuilder, corners: [Vec3; 4], material: MaterialId) {
    let [a, b, c, d] = corners;
    builder.add_triangle(a, b, c, material);
    builder.add_triangle(a, c, d, material);
}

fn build_scene(mesh: Option<Mesh>) -> lumen_renderer::Scene {
    let mut builder = SceneBuilder::new();

    let white = builder.add_material(Lambert::new(Color::splat(0.73)));
    let red = builder.add_material(Lambert::new(Color::new(0.65, 0.05, 0.05)));
    let green = builder.add_material(Lambert::new(Color::new(0.12, 0.45, 0.15)));
    let glossy = builder.add_material(Phong::new(Color::splat(0.8), 60.0));
    let glass = builder.add_material(Dielectric::new(Color::ONE, IOR_GLASS));

    let p = |x: f32, y: f32, z: f32| Vec3::new(x, y, z);

    // Box corners: the floor at y = 0, then the ceiling at y = 2
    let c = [
        p(-1.0, 0.0, 1.0),
        p(1.0, 0.0, 1.0),
        p(1.0, 0.0, -1.0),
        p(-1.0, 0.0, -1.0),
        p(-1.0, 2.0, -1.0),
        p(1.0, 2.0, -1.0),
        p(1.0, 2.0, 1.0),
        p(-1.0, 2.0, 1.0),
    ];

    // Floor, ceiling, back wall
    add_quad(&mut builder, [c[0], c[1], c[2], c[3]], white);
    add_quad(&mut builder, [c[4], c[5], c[6], c[7]], white);
    add_quad(&mut builder, [c[3], c[2], c[5], c[4]], white);

    // Side walls
    add_quad(&mut builder, [c[0], c[3], c[4], c[7]], red);
    add_quad(&mut builder, [c[2], c[1], c[6], c[5]], green);

    // A glossy slab and a glass pane
    let slab = [
        p(-0.7, 0.6, -0.6),
        p(-0.1, 0.6, -0.6),
        p(-0.1, 0.6, 0.0),
        p(-0.7, 0.6, 0.0),
    ];
    add_quad(&mut builder, slab, glossy);
    builder.add_disc(p(0.4, 0.5, 0.2), p(-0.3, 0.2, 1.0), 0.3, glass);

    match mesh {
        Some(mesh) => {
            // Sit the mesh on the floor in the middle of the box
            let center = mesh.center();
            let origin = Vec3::new(-center.x, -mesh.bounds.lower.y, -center.z);
            let count = builder.add_mesh(TriangleMesh::from_mesh(&mesh, origin), white);
            log::info!("Added {} mesh triangles", count);
        }
        None => log::info!("No mesh given, rendering the empty box"),
    }

    // Ceiling light, slightly below the ceiling
    let lamp_material = builder.add_material(Lambert::new(Color::ZERO));
    let lamp = builder.add_disc(p(0.0, 1.98, 0.0), Vec3::NEG_Y, 0.3, lamp_material);
    builder.add_light(lamp, Color::splat(17.0));

    builder.build()
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();

    let settings = match args.get(1) {
        Some(path) => RenderSettings::load(path)?,
        None => RenderSettings {
            width: 320,
            height: 320,
            fov: 0.7,
            focal_length: 3.8,
            f_stop: Some(8.0),
            iterations: 16,
            samples_per_pixel: 4,
            camera: Transform::look_at(
                Vec3::new(0.0, 1.0, 3.8),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::Y,
            ),
            ..Default::default()
        },
    };

    // A mesh that fails to load leaves the box empty
    let mesh = args.get(2).and_then(|path| match Mesh::load_obj(path) {
        Ok(mesh) => Some(mesh),
        Err(e) => {
            log::error!("Failed to load {}: {}", path, e);
            None
        }
    });

    let mut renderer = Renderer::new(build_scene(mesh), &settings)?;
    let mut sink = ExrAndPreview {
        exr: ExrWriter::new("output"),
        png: PngWriter::new("output"),
    };

    // Never raised here: an unbounded render runs until the process is stopped
    let cancel = AtomicBool::new(false);
    let start = std::time::Instant::now();
    let limit = settings.iteration_limit();
    let rendered = renderer.render_multiple("cornell", limit, &mut sink, &cancel)?;

    log::info!(
        "Rendered {} iterations in {:.2?}, wrote {}",
        rendered,
        start.elapsed(),
        sink.exr.path_for("cornell").display()
    );
    Ok(())
}
