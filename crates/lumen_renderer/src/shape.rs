//! Shape capability, arena handles and intersection records.
//!
//! Shapes never hold references into the scene. Triangles name their
//! vertices with `VertexId`s and intersections name their primitive with a
//! `PrimId`; both index arenas owned by the `Scene`, so every handle lives
//! exactly as long as the scene that issued it.

use crate::{Disc, Triangle};
use lumen_math::{Aabb, Ray, Vec3};
use rand::RngCore;

/// A shared mesh vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    /// Unit shading normal
    pub normal: Vec3,
}

impl Vertex {
    /// A zero `normal` is kept as zero; triangles then shade with their
    /// face normal.
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position,
            normal: normal.normalize_or_zero(),
        }
    }
}

/// Handle to a vertex in the scene's vertex arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexId(pub u32);

/// Handle to a primitive in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrimId(pub u32);

/// Handle to a material in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u32);

/// Handle to an area light in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LightId(pub u32);

/// Geometric result of a shape intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub position: Vec3,
    /// Unit surface normal at the hit
    pub normal: Vec3,
    /// Ray parameter of the hit
    pub distance: f32,
}

/// A point drawn uniformly from a shape's surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub position: Vec3,
    pub normal: Vec3,
}

/// A ray hitting a primitive of the scene.
///
/// Transient: produced by a query and consumed by the caller right away.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Point of intersection
    pub position: Vec3,
    /// Unit surface normal at the intersection
    pub normal: Vec3,
    /// The ray that produced the hit
    pub incoming: Ray,
    /// Primitive that was hit
    pub prim: PrimId,
    /// Ray parameter of the hit
    pub distance: f32,
}

impl Intersection {
    pub fn new(hit: SurfaceHit, incoming: Ray, prim: PrimId) -> Self {
        Self {
            position: hit.position,
            normal: hit.normal,
            incoming,
            prim,
            distance: hit.distance,
        }
    }
}

/// An intersectable, sampleable surface.
#[derive(Debug, Clone)]
pub enum Shape {
    Triangle(Triangle),
    Disc(Disc),
}

impl Shape {
    /// Nearest hit along the ray with `t > 0`.
    pub fn intersect(&self, ray: &Ray, vertices: &[Vertex]) -> Option<SurfaceHit> {
        match self {
            Shape::Triangle(tri) => tri.intersect(ray, vertices),
            Shape::Disc(disc) => disc.intersect(ray),
        }
    }

    /// Whether anything blocks the ray in `(0, max_distance)`.
    pub fn intersect_shadow(&self, ray: &Ray, max_distance: f32, vertices: &[Vertex]) -> bool {
        match self {
            Shape::Triangle(tri) => tri.intersect_shadow(ray, max_distance, vertices),
            Shape::Disc(disc) => disc.intersect_shadow(ray, max_distance),
        }
    }

    pub fn bounds(&self, vertices: &[Vertex]) -> Aabb {
        match self {
            Shape::Triangle(tri) => tri.bounds(vertices),
            Shape::Disc(disc) => disc.bounds(),
        }
    }

    /// Uniformly sample a point on the surface.
    pub fn sample_point(&self, rng: &mut dyn RngCore, vertices: &[Vertex]) -> SurfaceSample {
        match self {
            Shape::Triangle(tri) => tri.sample_point(rng, vertices),
            Shape::Disc(disc) => disc.sample_point(rng),
        }
    }

    pub fn area(&self, vertices: &[Vertex]) -> f32 {
        match self {
            Shape::Triangle(tri) => tri.area(vertices),
            Shape::Disc(disc) => disc.area(),
        }
    }
}

impl From<Triangle> for Shape {
    fn from(tri: Triangle) -> Self {
        Shape::Triangle(tri)
    }
}

impl From<Disc> for Shape {
    fn from(disc: Disc) -> Self {
        Shape::Disc(disc)
    }
}

/// A shape placed in the scene with its material and, for emitters, its light.
#[derive(Debug, Clone)]
pub struct Primitive {
    pub shape: Shape,
    pub material: MaterialId,
    pub light: Option<LightId>,
}

impl Primitive {
    pub fn is_emitter(&self) -> bool {
        self.light.is_some()
    }
}
