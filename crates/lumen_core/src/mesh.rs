//! Triangle mesh data and OBJ import.
//!
//! A `Mesh` is plain indexed geometry. The renderer turns it into shared
//! vertex records and triangles; this crate only loads and validates it.

use std::path::Path;

use lumen_math::{Aabb, Vec3};
use thiserror::Error;

/// Errors that can occur while importing a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("OBJ import error: {0}")]
    Load(#[from] tobj::LoadError),

    #[error("No models found in {0}")]
    NoModels(String),

    #[error("No vertex positions on the mesh")]
    MissingPositions,

    #[error("No vertex normals on the mesh")]
    MissingNormals,
}

pub type MeshResult<T> = Result<T, MeshError>;

/// A mesh consisting of vertex positions, vertex normals, and triangle indices.
///
/// Every vertex has exactly one normal; `indices.len()` is a multiple of 3.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Unit vertex normals, parallel to `positions`
    pub normals: Vec<Vec3>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,

    /// Axis-aligned bounding box
    pub bounds: Aabb,
}

impl Default for Mesh {
    fn default() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
            bounds: Aabb::EMPTY,
        }
    }
}

impl Mesh {
    /// Create a new mesh from positions, normals and indices.
    ///
    /// Normals are normalized on the way in; a zero or non-finite normal
    /// counts as missing. Trailing indices that do not form a whole triangle
    /// are dropped.
    pub fn new(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        mut indices: Vec<u32>,
    ) -> MeshResult<Self> {
        if positions.is_empty() {
            return Err(MeshError::MissingPositions);
        }
        if normals.len() != positions.len() {
            return Err(MeshError::MissingNormals);
        }

        indices.truncate(indices.len() - indices.len() % 3);
        let normals = normals
            .into_iter()
            .map(|n| n.try_normalize().ok_or(MeshError::MissingNormals))
            .collect::<MeshResult<Vec<_>>>()?;
        let bounds = Self::compute_bounds(&positions);

        Ok(Self {
            positions,
            normals,
            indices,
            bounds,
        })
    }

    /// Load every model in an OBJ file into a single mesh.
    ///
    /// Faces are triangulated and vertices are de-duplicated to a single
    /// index stream. The file must supply per-vertex normals.
    pub fn load_obj<P: AsRef<Path>>(path: P) -> MeshResult<Self> {
        let path = path.as_ref();
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                single_index: true,
                triangulate: true,
                ..Default::default()
            },
        )?;

        if models.is_empty() {
            return Err(MeshError::NoModels(path.display().to_string()));
        }

        let mut positions = Vec::new();
        let mut normals = Vec::new();
        let mut indices = Vec::new();

        for model in &models {
            let mesh = &model.mesh;
            if mesh.positions.is_empty() {
                return Err(MeshError::MissingPositions);
            }
            if mesh.normals.len() != mesh.positions.len() {
                return Err(MeshError::MissingNormals);
            }

            let base = positions.len() as u32;
            positions.extend(mesh.positions.chunks_exact(3).map(Vec3::from_slice));
            normals.extend(mesh.normals.chunks_exact(3).map(Vec3::from_slice));
            indices.extend(mesh.indices.iter().map(|i| i + base));
        }

        log::info!(
            "Loaded {} vertices, {} triangles from {} model(s) in {}",
            positions.len(),
            indices.len() / 3,
            models.len(),
            path.display()
        );

        Self::new(positions, normals, indices)
    }

    /// Compute axis-aligned bounding box from positions.
    fn compute_bounds(positions: &[Vec3]) -> Aabb {
        positions.iter().fold(Aabb::EMPTY, |mut bounds, p| {
            bounds.expand_point(*p);
            bounds
        })
    }

    /// Translate every vertex by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        for p in &mut self.positions {
            *p += offset;
        }
        self.bounds = Self::compute_bounds(&self.positions);
    }

    /// Returns true if the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Get the mesh center (center of bounding box).
    pub fn center(&self) -> Vec3 {
        self.bounds.centroid()
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Iterate over the index triples of every valid triangle.
    ///
    /// Triangles referencing a vertex out of range are skipped with a warning.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        let vertex_count = self.positions.len();
        self.indices.chunks_exact(3).filter_map(move |chunk| {
            let face = [chunk[0], chunk[1], chunk[2]];
            if face.iter().any(|&i| i as usize >= vertex_count) {
                log::warn!(
                    "Invalid triangle indices: {:?}, vertex count: {}",
                    face,
                    vertex_count
                );
                return None;
            }
            Some(face)
        })
    }
}
