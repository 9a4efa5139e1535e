//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Uses a binary tree over primitive handles. The tree only stores `PrimId`s
//! and boxes; the exact primitive test is supplied by the caller, so the
//! hierarchy never borrows the geometry it indexes.

use crate::shape::{PrimId, SurfaceHit};
use lumen_math::{Aabb, Interval, Ray};

/// Maximum primitives per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 4;

/// BVH node - either a branch with two children or a leaf with primitives.
///
/// Using an enum allows for more cache-efficient traversal since
/// we avoid dynamic dispatch overhead.
#[derive(Debug)]
pub enum Bvh {
    /// Internal node with two children.
    Branch {
        left: Box<Bvh>,
        right: Box<Bvh>,
        bbox: Aabb,
    },
    /// Leaf node with a small number of primitives.
    Leaf { prims: Vec<PrimId>, bbox: Aabb },
    /// Empty node (for edge cases).
    Empty,
}

impl Bvh {
    /// Create a BVH from primitive handles and their bounds.
    pub fn new(items: Vec<(PrimId, Aabb)>) -> Self {
        if items.is_empty() {
            return Bvh::Empty;
        }
        Self::build(items)
    }

    /// Recursive BVH construction.
    ///
    /// Simple median-split approach: sort by centroid on the longest axis of
    /// the centroid bounds, split in half, recurse.
    fn build(mut items: Vec<(PrimId, Aabb)>) -> Self {
        let n = items.len();

        let bounds = items
            .iter()
            .fold(Aabb::EMPTY, |acc, (_, b)| Aabb::surrounding(&acc, b));

        // Create leaf for small sets
        if n <= LEAF_MAX_SIZE {
            return Bvh::Leaf {
                prims: items.into_iter().map(|(id, _)| id).collect(),
                bbox: bounds,
            };
        }

        // Choose split axis based on centroid spread
        let centroid_bounds = items.iter().fold(Aabb::EMPTY, |mut acc, (_, b)| {
            acc.expand_point(b.centroid());
            acc
        });
        let axis = centroid_bounds.maximum_extent().index();

        items.sort_unstable_by(|(_, a), (_, b)| {
            a.centroid()[axis]
                .partial_cmp(&b.centroid()[axis])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        // Split at midpoint
        let mid = n / 2;
        let right_items = items.split_off(mid);

        Bvh::Branch {
            left: Box::new(Self::build(items)),
            right: Box::new(Self::build(right_items)),
            bbox: bounds,
        }
    }

    pub fn bounds(&self) -> Aabb {
        match self {
            Bvh::Empty => Aabb::EMPTY,
            Bvh::Leaf { bbox, .. } => *bbox,
            Bvh::Branch { bbox, .. } => *bbox,
        }
    }

    /// Height of the tree; an empty tree has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            Bvh::Empty => 0,
            Bvh::Leaf { .. } => 1,
            Bvh::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Closest hit along the ray. `intersect` performs the exact test for a
    /// single primitive.
    pub fn nearest_hit<F>(&self, ray: &Ray, intersect: &F) -> Option<(PrimId, SurfaceHit)>
    where
        F: Fn(PrimId, &Ray) -> Option<SurfaceHit>,
    {
        let mut closest = None;
        self.nearest_in(ray, Interval::FORWARD, intersect, &mut closest);
        closest
    }

    fn nearest_in<F>(
        &self,
        ray: &Ray,
        ray_t: Interval,
        intersect: &F,
        closest: &mut Option<(PrimId, SurfaceHit)>,
    ) where
        F: Fn(PrimId, &Ray) -> Option<SurfaceHit>,
    {
        match self {
            Bvh::Empty => {}

            Bvh::Leaf { prims, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return;
                }

                for &prim in prims {
                    let limit = closest.map_or(ray_t.max, |(_, hit)| hit.distance);
                    if let Some(hit) = intersect(prim, ray) {
                        if hit.distance < limit {
                            *closest = Some((prim, hit));
                        }
                    }
                }
            }

            Bvh::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return;
                }

                left.nearest_in(ray, ray_t, intersect, closest);

                // Only check right up to closest hit
                let right_t = closest.map_or(ray_t, |(_, hit)| ray_t.with_max(hit.distance));
                right.nearest_in(ray, right_t, intersect, closest);
            }
        }
    }

    /// Whether any primitive blocks the ray in `(0, max_distance)`.
    /// `occludes` performs the exact shadow test for a single primitive.
    pub fn any_hit<F>(&self, ray: &Ray, max_distance: f32, occludes: &F) -> bool
    where
        F: Fn(PrimId, &Ray, f32) -> bool,
    {
        self.any_in(ray, Interval::new(0.0, max_distance), occludes)
    }

    fn any_in<F>(&self, ray: &Ray, ray_t: Interval, occludes: &F) -> bool
    where
        F: Fn(PrimId, &Ray, f32) -> bool,
    {
        match self {
            Bvh::Empty => false,
            Bvh::Leaf { prims, bbox } => {
                bbox.hit(ray, ray_t) && prims.iter().any(|&prim| occludes(prim, ray, ray_t.max))
            }
            Bvh::Branch { left, right, bbox } => {
                bbox.hit(ray, ray_t)
                    && (left.any_in(ray, ray_t, occludes) || right.any_in(ray, ray_t, occludes))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Disc;
    use lumen_math::Vec3;

    /// A row of discs along X, facing +Z, at z = -5.
    fn discs() -> Vec<Disc> {
        (0..10)
            .map(|i| Disc::new(Vec3::new(i as f32, 0.0, -5.0), Vec3::Z, 0.4))
            .collect()
    }

    fn build(discs: &[Disc]) -> Bvh {
        let items = discs
            .iter()
            .enumerate()
            .map(|(i, d)| (PrimId(i as u32), d.bounds()))
            .collect();
        Bvh::new(items)
    }

    #[test]
    fn test_bvh_empty() {
        let bvh = Bvh::new(vec![]);
        assert!(matches!(bvh, Bvh::Empty));

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(bvh.nearest_hit(&ray, &|_, _| None).is_none());
        assert!(!bvh.any_hit(&ray, 10.0, &|_, _, _| true));
    }

    #[test]
    fn test_bvh_single_leaf() {
        let discs = discs();
        let bvh = build(&discs[..1]);

        // Should create a leaf
        assert!(matches!(bvh, Bvh::Leaf { .. }));
        assert_eq!(bvh.depth(), 1);
    }

    #[test]
    fn test_bvh_multiple_discs() {
        let discs = discs();
        let bvh = build(&discs);
        assert!(bvh.depth() > 1);

        let intersect = |id: PrimId, ray: &Ray| discs[id.0 as usize].intersect(ray);

        // Test ray that hits the disc at x=5
        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::NEG_Z);
        let (prim, hit) = bvh.nearest_hit(&ray, &intersect).expect("should hit");
        assert_eq!(prim, PrimId(5));
        assert!((hit.position.z + 5.0).abs() < 0.01);

        // Between two discs
        let ray = Ray::new(Vec3::new(5.5, 0.0, 0.0), Vec3::NEG_Z);
        assert!(bvh.nearest_hit(&ray, &intersect).is_none());
    }

    #[test]
    fn test_bvh_returns_closest() {
        // Stack of discs along the ray; the nearest must win regardless of order
        let discs: Vec<Disc> = [-9.0, -2.0, -7.0, -4.0, -3.0, -8.0]
            .iter()
            .map(|&z| Disc::new(Vec3::new(0.0, 0.0, z), Vec3::Z, 1.0))
            .collect();
        let bvh = build(&discs);
        let intersect = |id: PrimId, ray: &Ray| discs[id.0 as usize].intersect(ray);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let (prim, hit) = bvh.nearest_hit(&ray, &intersect).unwrap();
        assert_eq!(prim, PrimId(1));
        assert!((hit.distance - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_bvh_any_hit_bounded() {
        let discs = discs();
        let bvh = build(&discs);
        let occludes =
            |id: PrimId, ray: &Ray, max: f32| discs[id.0 as usize].intersect_shadow(ray, max);

        let ray = Ray::new(Vec3::new(3.0, 0.0, 0.0), Vec3::NEG_Z);
        assert!(bvh.any_hit(&ray, 10.0, &occludes));
        assert!(!bvh.any_hit(&ray, 4.0, &occludes));
    }
}
