//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.
//! Vertices are shared with other triangles of the same mesh through the
//! scene's vertex arena.

use crate::sampling::uniform_triangle;
use crate::shape::{SurfaceHit, SurfaceSample, Vertex, VertexId};
use lumen_math::{is_nearly_zero, is_positive, Aabb, Ray, Vec3};
use rand::RngCore;

/// A triangle referencing three shared vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [VertexId; 3],
}

/// Barycentric hit on the triangle's plane, before any normal work.
struct Barycentric {
    u: f32,
    v: f32,
    t: f32,
}

impl Triangle {
    pub fn new(a: VertexId, b: VertexId, c: VertexId) -> Self {
        Self { vertices: [a, b, c] }
    }

    #[inline]
    fn corners<'v>(&self, vertices: &'v [Vertex]) -> [&'v Vertex; 3] {
        [
            &vertices[self.vertices[0].0 as usize],
            &vertices[self.vertices[1].0 as usize],
            &vertices[self.vertices[2].0 as usize],
        ]
    }

    /// Shared Möller-Trumbore core: rejects parallel rays and points outside
    /// the triangle, returns barycentrics and the (unchecked) distance.
    fn solve(ray: &Ray, p0: Vec3, p1: Vec3, p2: Vec3) -> Option<Barycentric> {
        let edge1 = p1 - p0;
        let edge2 = p2 - p0;

        let p = ray.direction.cross(edge2);
        let det = edge1.dot(p);

        // Ray is parallel to the triangle's plane
        if is_nearly_zero(det) {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = ray.origin - p0;

        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = ray.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(q) * inv_det;
        Some(Barycentric { u, v, t })
    }

    /// Interpolated vertex normal, or the face normal where the vertex
    /// normals cancel out or are missing.
    fn shading_normal(corners: [&Vertex; 3], u: f32, v: f32) -> Vec3 {
        let [a, b, c] = corners;
        let w = 1.0 - u - v;
        (w * a.normal + u * b.normal + v * c.normal)
            .try_normalize()
            .unwrap_or_else(|| {
                (b.position - a.position)
                    .cross(c.position - a.position)
                    .normalize_or_zero()
            })
    }

    /// Nearest hit in front of the ray origin, with an interpolated normal.
    pub fn intersect(&self, ray: &Ray, vertices: &[Vertex]) -> Option<SurfaceHit> {
        let corners = self.corners(vertices);
        let [a, b, c] = corners;
        let Barycentric { u, v, t } = Self::solve(ray, a.position, b.position, c.position)?;

        // In the triangle but behind us
        if !is_positive(t) {
            return None;
        }

        Some(SurfaceHit {
            position: ray.at(t),
            normal: Self::shading_normal(corners, u, v),
            distance: t,
        })
    }

    /// Any-hit test in `(0, max_distance)`; skips the normal interpolation.
    pub fn intersect_shadow(&self, ray: &Ray, max_distance: f32, vertices: &[Vertex]) -> bool {
        let [a, b, c] = self.corners(vertices);
        match Self::solve(ray, a.position, b.position, c.position) {
            Some(hit) => is_positive(hit.t) && is_positive(max_distance - hit.t),
            None => false,
        }
    }

    pub fn bounds(&self, vertices: &[Vertex]) -> Aabb {
        let [a, b, c] = self.corners(vertices);
        let mut bbox = Aabb::from_points(a.position, b.position);
        bbox.expand_point(c.position);
        bbox
    }

    /// Unit normal of the triangle's plane (counter-clockwise winding).
    pub fn geometric_normal(&self, vertices: &[Vertex]) -> Vec3 {
        let [a, b, c] = self.corners(vertices);
        (b.position - a.position)
            .cross(c.position - a.position)
            .normalize_or_zero()
    }

    pub fn area(&self, vertices: &[Vertex]) -> f32 {
        let [a, b, c] = self.corners(vertices);
        0.5 * (b.position - a.position).cross(c.position - a.position).length()
    }

    /// Uniform point on the triangle, with the interpolated vertex normal.
    pub fn sample_point(&self, rng: &mut dyn RngCore, vertices: &[Vertex]) -> SurfaceSample {
        let corners = self.corners(vertices);
        let [a, b, c] = corners;
        let (u, v) = uniform_triangle(rng);
        let w = 1.0 - u - v;

        SurfaceSample {
            position: w * a.position + u * b.position + v * c.position,
            normal: Self::shading_normal(corners, u, v),
        }
    }
}
