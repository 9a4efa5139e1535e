//! Lumen Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer for physically-based rendering of triangles,
//! discs and triangle meshes lit by area lights.
//!
//! - **Geometry**: `Triangle`, `Disc` and the `TriangleMesh` aggregate,
//!   stored in a `Scene` arena and indexed by a BVH
//! - **Materials**: `Lambert`, `Phong` and `Dielectric` BSDFs
//! - **Light transport**: random walk with next-event estimation, Russian
//!   roulette and per-sample radiance clamping (`PathTracer`)
//! - **Rendering**: progressive accumulation over rayon-parallel rows
//!   (`Renderer`), written through an `ImageSink`
//!
//! # Example
//!
//! ```ignore
//! use lumen_renderer::{Color, ExrWriter, Lambert, Renderer, SceneBuilder, Vec3};
//!
//! let mut builder = SceneBuilder::new();
//! let white = builder.add_material(Lambert::new(Color::splat(0.8)));
//! let lamp = builder.add_disc(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Y, 0.5, white);
//! builder.add_light(lamp, Color::splat(10.0));
//!
//! let mut renderer = Renderer::new(builder.build(), &settings)?;
//! renderer.render_multiple("beauty", Some(16), &mut ExrWriter::new("out"), &cancel)?;
//! ```

mod bvh;
mod camera;
mod disc;
mod integrator;
mod light;
mod material;
mod mesh;
mod output;
mod ray;
mod renderer;
mod sampling;
mod scene;
mod shape;
mod triangle;

pub use bvh::Bvh;
pub use camera::Camera;
pub use disc::Disc;
pub use integrator::{
    russian_roulette, PathTracer, PathVertex, INITIAL_PATH_LENGTH, RUSSIAN_ROULETTE_DEPTH_1,
    RUSSIAN_ROULETTE_DEPTH_2,
};
pub use light::AreaLight;
pub use material::{
    BsdfSample, Color, Dielectric, Lambert, Material, Phong, IOR_DIAMOND, IOR_GLASS,
};
pub use mesh::TriangleMesh;
pub use output::{
    color_to_rgb8, linear_to_gamma, ExrWriter, Image, ImageSink, OutputError, PngWriter,
};
pub use ray::LightRay;
pub use renderer::Renderer;
pub use scene::{Accelerator, Scene, SceneBuilder};
pub use shape::{
    Intersection, LightId, MaterialId, PrimId, Primitive, Shape, SurfaceHit, SurfaceSample, Vertex,
    VertexId,
};
pub use triangle::Triangle;

/// Re-export Vec3 and common math types from lumen_math
pub use lumen_math::{Aabb, Ray, Vec3};
