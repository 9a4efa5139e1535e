//! Orthonormal shading frames.

use crate::Vec3;

/// Builds two unit vectors that, together with the unit vector `n`, form a
/// right-handed orthonormal basis.
///
/// Uses the branchless construction of Duff et al. (2017), which is
/// continuous everywhere except across the z = 0 plane.
pub fn coordinate_system(n: Vec3) -> (Vec3, Vec3) {
    let sign = 1.0_f32.copysign(n.z);
    let a = -1.0 / (sign + n.z);
    let b = n.x * n.y * a;
    let tangent = Vec3::new(1.0 + sign * n.x * n.x * a, sign * b, -sign * n.x);
    let cotangent = Vec3::new(b, sign + n.y * n.y * a, -n.y);
    (tangent, cotangent)
}

/// A local coordinate frame whose z axis is a surface normal.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    pub tangent: Vec3,
    pub cotangent: Vec3,
    pub normal: Vec3,
}

impl Frame {
    /// Build a frame around a unit normal.
    pub fn from_normal(normal: Vec3) -> Self {
        let (tangent, cotangent) = coordinate_system(normal);
        Self {
            tangent,
            cotangent,
            normal,
        }
    }

    /// Express a world-space vector in this frame.
    #[inline]
    pub fn to_local(&self, v: Vec3) -> Vec3 {
        Vec3::new(v.dot(self.tangent), v.dot(self.cotangent), v.dot(self.normal))
    }

    /// Express a frame-local vector in world space.
    #[inline]
    pub fn to_world(&self, v: Vec3) -> Vec3 {
        self.tangent * v.x + self.cotangent * v.y + self.normal * v.z
    }
}
