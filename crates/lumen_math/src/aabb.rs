use crate::{Interval, Ray, Vec3, VERY_SMALL};

/// One of the three coordinate axes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Index of the axis into a `Vec3` (0=X, 1=Y, 2=Z).
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// Defined by its lower and upper corners.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub lower: Vec3,
    pub upper: Vec3,
}

impl Aabb {
    /// An empty box; expanding it by anything yields that thing's bounds.
    pub const EMPTY: Aabb = Aabb {
        lower: Vec3::splat(f32::INFINITY),
        upper: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Create an AABB containing the two given points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            lower: a.min(b),
            upper: a.max(b),
        }
    }

    /// Returns true if the box has never been expanded.
    pub fn is_empty(&self) -> bool {
        self.lower.x > self.upper.x || self.lower.y > self.upper.y || self.lower.z > self.upper.z
    }

    /// Expand the box to also contain the given point.
    pub fn expand_point(&mut self, p: Vec3) {
        self.lower = self.lower.min(p);
        self.upper = self.upper.max(p);
    }

    /// Grow every face of the box outward by `f`, so each axis grows by `2f`.
    pub fn expand_margin(&mut self, f: f32) {
        self.lower -= Vec3::splat(f);
        self.upper += Vec3::splat(f);
    }

    /// Grow every face by the default margin, `VERY_SMALL`.
    pub fn pad(&mut self) {
        self.expand_margin(VERY_SMALL);
    }

    /// Expand the box to also contain another box.
    pub fn expand_box(&mut self, other: &Aabb) {
        self.lower = self.lower.min(other.lower);
        self.upper = self.upper.max(other.upper);
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(a: &Aabb, b: &Aabb) -> Self {
        let mut out = *a;
        out.expand_box(b);
        out
    }

    /// Surface area of the box.
    pub fn surface_area(&self) -> f32 {
        let d = self.upper - self.lower;
        2.0 * (d.x * d.y + d.x * d.z + d.y * d.z)
    }

    /// Returns the axis with the longest extent.
    pub fn maximum_extent(&self) -> Axis {
        let d = self.upper - self.lower;
        if d.x > d.y && d.x > d.z {
            Axis::X
        } else if d.y > d.z {
            Axis::Y
        } else {
            Axis::Z
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        (self.lower + self.upper) * 0.5
    }

    /// Intersect a ray with the box using the slab method.
    ///
    /// Returns the entry and exit parameters `(t0, t1)` with `t0 <= t1`,
    /// clipped to the part of the ray in front of its origin.
    pub fn intersect(&self, r: &Ray) -> Option<(f32, f32)> {
        self.clip(r, Interval::FORWARD)
    }

    /// Test if a ray intersects this box within the given interval.
    pub fn hit(&self, r: &Ray, ray_t: Interval) -> bool {
        self.clip(r, ray_t).is_some()
    }

    fn clip(&self, r: &Ray, ray_t: Interval) -> Option<(f32, f32)> {
        let mut t0 = ray_t.min;
        let mut t1 = ray_t.max;
        for i in 0..3 {
            // Update interval for the i-th slab
            let inv_dir = 1.0 / r.direction[i];
            let mut t_near = (self.lower[i] - r.origin[i]) * inv_dir;
            let mut t_far = (self.upper[i] - r.origin[i]) * inv_dir;
            if t_near > t_far {
                std::mem::swap(&mut t_near, &mut t_far);
            }
            // NaN slabs (origin on a face of a zero-direction axis) leave the range unchanged
            if t_near > t0 {
                t0 = t_near;
            }
            if t_far < t1 {
                t1 = t_far;
            }
            if t0 > t1 {
                return None;
            }
        }
        Some((t0, t1))
    }
}
