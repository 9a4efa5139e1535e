//! Triangle mesh aggregate.
//!
//! A `TriangleMesh` is never intersected directly. It is refined into
//! individual `Triangle`s when added to a scene, and its vertices are moved
//! into the scene's vertex arena so neighbouring triangles share them.

use crate::shape::{Vertex, VertexId};
use crate::Triangle;
use lumen_core::Mesh;
use lumen_math::{Aabb, Vec3};

/// Positions, normals and faces of a mesh, placed in world space.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    vertices: Vec<Vertex>,
    faces: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Build from imported mesh data, offsetting every vertex by `origin`.
    pub fn from_mesh(mesh: &Mesh, origin: Vec3) -> Self {
        let vertices = mesh
            .positions
            .iter()
            .zip(&mesh.normals)
            .map(|(&p, &n)| Vertex {
                position: p + origin,
                normal: n,
            })
            .collect();
        let faces = mesh.triangles().collect();

        Self { vertices, faces }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn bounds(&self) -> Aabb {
        let mut bbox = Aabb::EMPTY;
        for v in &self.vertices {
            bbox.expand_point(v.position);
        }
        bbox
    }

    /// The mesh's triangles, with vertex handles offset by `base`, the arena
    /// index of this mesh's first vertex.
    pub fn refine(&self, base: u32) -> impl Iterator<Item = Triangle> + '_ {
        self.faces.iter().map(move |&[a, b, c]| {
            Triangle::new(VertexId(base + a), VertexId(base + b), VertexId(base + c))
        })
    }

    /// Hand the vertices over to the caller's arena.
    pub(crate) fn into_vertices(self) -> Vec<Vertex> {
        self.vertices
    }
}
