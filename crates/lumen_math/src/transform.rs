// Transform utilities for Mat4
//
// Extends glam::Mat4 with the ray transform used when moving camera-space
// rays into world space.

use glam::Mat4;
use crate::Ray;

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Transform a ray: the origin as a point, the direction as a vector.
    /// The direction keeps whatever scale the matrix applies to it.
    fn transform_ray(&self, ray: &Ray) -> Ray;
}

impl Mat4Ext for Mat4 {
    fn transform_ray(&self, ray: &Ray) -> Ray {
        Ray::new(
            self.transform_point3(ray.origin),
            self.transform_vector3(ray.direction),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_transform_ray_translation() {
        let mat = Mat4::from_translation(Vec3::new(10.0, 20.0, 30.0));
        let ray = Ray::new(Vec3::new(1.0, 2.0, 3.0), Vec3::X);
        let transformed = mat.transform_ray(&ray);

        assert_eq!(transformed.origin, Vec3::new(11.0, 22.0, 33.0));
        // Translation should NOT affect directions
        assert_eq!(transformed.direction, Vec3::X);
    }

    #[test]
    fn test_transform_ray_rotation() {
        use std::f32::consts::PI;

        // 90 degree rotation around Z axis
        let mat = Mat4::from_rotation_z(PI / 2.0);
        let ray = Ray::new(Vec3::X, Vec3::X);
        let transformed = mat.transform_ray(&ray);

        // X should rotate to Y
        assert!((transformed.origin - Vec3::Y).length() < 0.001);
        assert!((transformed.direction - Vec3::Y).length() < 0.001);
    }

    #[test]
    fn test_mat4_inverse_roundtrip() {
        let mat = Mat4::from_rotation_y(0.7) * Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let inv = mat.inverse();

        let point = Vec3::new(5.0, 3.0, 2.0);
        let back = inv.transform_point3(mat.transform_point3(point));
        assert!((back - point).length() < 0.001);
    }
}
