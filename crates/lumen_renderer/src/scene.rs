//! Scene storage and ray queries.
//!
//! A `Scene` owns every vertex, primitive, material and light in arenas
//! addressed by handles. It is assembled with a `SceneBuilder`, is immutable
//! once built and is shared read-only by all render threads.

use crate::bvh::Bvh;
use crate::light::AreaLight;
use crate::material::{Color, Material};
use crate::mesh::TriangleMesh;
use crate::shape::{Intersection, LightId, MaterialId, PrimId, Primitive, Shape, Vertex, VertexId};
use crate::{Disc, Triangle};
use lumen_math::{Aabb, Ray, Vec3};

/// Nearest-hit and any-hit queries over the whole scene.
pub trait Accelerator: Send + Sync {
    /// Closest intersection in front of the ray origin.
    fn nearest_hit(&self, ray: &Ray) -> Option<Intersection>;

    /// Whether anything blocks the ray in `(0, max_distance)`.
    fn any_hit(&self, ray: &Ray, max_distance: f32) -> bool;
}

/// Immutable scene: geometry arenas, materials, lights and the BVH over them.
pub struct Scene {
    vertices: Vec<Vertex>,
    primitives: Vec<Primitive>,
    materials: Vec<Box<dyn Material>>,
    lights: Vec<AreaLight>,
    bvh: Bvh,
}

impl Scene {
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn primitive(&self, id: PrimId) -> &Primitive {
        &self.primitives[id.0 as usize]
    }

    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    pub fn material(&self, id: MaterialId) -> &dyn Material {
        self.materials[id.0 as usize].as_ref()
    }

    pub fn light(&self, id: LightId) -> &AreaLight {
        &self.lights[id.0 as usize]
    }

    /// Every emitting primitive's light.
    pub fn lights(&self) -> &[AreaLight] {
        &self.lights
    }

    /// The light attached to a primitive, if it emits.
    pub fn emitter(&self, prim: PrimId) -> Option<&AreaLight> {
        self.primitive(prim).light.map(|id| self.light(id))
    }

    pub fn bounds(&self) -> Aabb {
        self.bvh.bounds()
    }
}

impl Accelerator for Scene {
    fn nearest_hit(&self, ray: &Ray) -> Option<Intersection> {
        let intersect =
            |id: PrimId, r: &Ray| self.primitive(id).shape.intersect(r, &self.vertices);
        self.bvh
            .nearest_hit(ray, &intersect)
            .map(|(prim, hit)| Intersection::new(hit, *ray, prim))
    }

    fn any_hit(&self, ray: &Ray, max_distance: f32) -> bool {
        let occludes = |id: PrimId, r: &Ray, max: f32| {
            self.primitive(id).shape.intersect_shadow(r, max, &self.vertices)
        };
        self.bvh.any_hit(ray, max_distance, &occludes)
    }
}

/// Collects geometry, materials and lights, then builds the BVH.
#[derive(Default)]
pub struct SceneBuilder {
    vertices: Vec<Vertex>,
    primitives: Vec<Primitive>,
    materials: Vec<Box<dyn Material>>,
    lights: Vec<AreaLight>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_material<M: Material + 'static>(&mut self, material: M) -> MaterialId {
        self.materials.push(Box::new(material));
        MaterialId(self.materials.len() as u32 - 1)
    }

    pub fn add_vertex(&mut self, vertex: Vertex) -> VertexId {
        self.vertices.push(vertex);
        VertexId(self.vertices.len() as u32 - 1)
    }

    /// Add any shape. Triangles must reference vertices already added.
    pub fn add_shape(&mut self, shape: impl Into<Shape>, material: MaterialId) -> PrimId {
        self.primitives.push(Primitive {
            shape: shape.into(),
            material,
            light: None,
        });
        PrimId(self.primitives.len() as u32 - 1)
    }

    /// Add a flat triangle; its normal follows the counter-clockwise winding.
    pub fn add_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3, material: MaterialId) -> PrimId {
        let normal = (b - a).cross(c - a);
        self.add_triangle_with_normals([(a, normal), (b, normal), (c, normal)], material)
    }

    /// Add a triangle with per-vertex shading normals.
    pub fn add_triangle_with_normals(
        &mut self,
        corners: [(Vec3, Vec3); 3],
        material: MaterialId,
    ) -> PrimId {
        let [a, b, c] = corners.map(|(p, n)| self.add_vertex(Vertex::new(p, n)));
        self.add_shape(Triangle::new(a, b, c), material)
    }

    pub fn add_disc(
        &mut self,
        center: Vec3,
        normal: Vec3,
        radius: f32,
        material: MaterialId,
    ) -> PrimId {
        self.add_shape(Disc::new(center, normal, radius), material)
    }

    /// Refine a mesh into triangles sharing its vertices. Returns the number
    /// of triangles added; empty meshes are skipped.
    pub fn add_mesh(&mut self, mesh: TriangleMesh, material: MaterialId) -> usize {
        if mesh.is_empty() {
            log::warn!("Skipping empty mesh");
            return 0;
        }

        let base = self.vertices.len() as u32;
        let triangles: Vec<Triangle> = mesh.refine(base).collect();
        self.vertices.extend(mesh.into_vertices());

        let count = triangles.len();
        for tri in triangles {
            self.add_shape(tri, material);
        }
        count
    }

    /// Make a primitive emit `color`.
    pub fn add_light(&mut self, prim: PrimId, color: Color) -> LightId {
        let id = LightId(self.lights.len() as u32);
        self.lights.push(AreaLight::new(color, prim));
        self.primitives[prim.0 as usize].light = Some(id);
        id
    }

    /// Finish the scene and build the BVH over every primitive.
    pub fn build(self) -> Scene {
        let items = self
            .primitives
            .iter()
            .enumerate()
            .map(|(i, prim)| {
                let mut bbox = prim.shape.bounds(&self.vertices);
                bbox.pad();
                (PrimId(i as u32), bbox)
            })
            .collect();
        let bvh = Bvh::new(items);

        log::debug!(
            "Built scene: {} primitives, {} vertices, {} lights, BVH depth {}",
            self.primitives.len(),
            self.vertices.len(),
            self.lights.len(),
            bvh.depth()
        );

        Scene {
            vertices: self.vertices,
            primitives: self.primitives,
            materials: self.materials,
            lights: self.lights,
            bvh,
        }
    }
}
