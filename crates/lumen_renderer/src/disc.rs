//! Disc primitive for ray tracing.

use crate::sampling::gen_f32;
use crate::shape::{SurfaceHit, SurfaceSample};
use lumen_math::{coordinate_system, is_positive, Aabb, Ray, Vec3};
use rand::RngCore;
use std::f32::consts::PI;

/// A flat, one-sided-geometry disc. Emission from a disc light is two-sided.
#[derive(Debug, Clone, PartialEq)]
pub struct Disc {
    center: Vec3,
    normal: Vec3,
    radius: f32,
    radius2: f32,
    tangent: Vec3,
    cotangent: Vec3,
}

impl Disc {
    /// Create a new disc. The normal is normalized and the radius clamped to be non-negative.
    pub fn new(center: Vec3, normal: Vec3, radius: f32) -> Self {
        let normal = normal.normalize();
        let radius = radius.max(0.0);
        let (tangent, cotangent) = coordinate_system(normal);

        Self {
            center,
            normal,
            radius,
            radius2: radius * radius,
            tangent,
            cotangent,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Distance along the ray to the disc, if it lands inside the rim.
    ///
    /// A ray parallel to the plane is rejected only when the denominator is
    /// exactly zero; grazing rays with a tiny denominator are still tested.
    fn solve(&self, ray: &Ray) -> Option<f32> {
        let denom = ray.direction.dot(self.normal);
        if denom == 0.0 {
            return None;
        }

        let d = (self.center - ray.origin).dot(self.normal) / denom;
        if !is_positive(d) {
            return None;
        }

        if (ray.at(d) - self.center).length_squared() >= self.radius2 {
            return None;
        }
        Some(d)
    }

    pub fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        let d = self.solve(ray)?;
        Some(SurfaceHit {
            position: ray.at(d),
            normal: self.normal,
            distance: d,
        })
    }

    pub fn intersect_shadow(&self, ray: &Ray, max_distance: f32) -> bool {
        match self.solve(ray) {
            Some(d) => is_positive(max_distance - d),
            None => false,
        }
    }

    /// Bounds of the square circumscribing the disc in its own plane.
    pub fn bounds(&self) -> Aabb {
        let t = self.tangent * self.radius;
        let c = self.cotangent * self.radius;

        let mut bbox = Aabb::from_points(self.center + t + c, self.center - t - c);
        bbox.expand_point(self.center + t - c);
        bbox.expand_point(self.center - t + c);
        bbox
    }

    pub fn area(&self) -> f32 {
        PI * self.radius2
    }

    /// Uniform point on the disc.
    pub fn sample_point(&self, rng: &mut dyn RngCore) -> SurfaceSample {
        let r = self.radius * gen_f32(rng).sqrt();
        let phi = 2.0 * PI * gen_f32(rng);

        SurfaceSample {
            position: self.center
                + self.tangent * (r * phi.cos())
                + self.cotangent * (r * phi.sin()),
            normal: self.normal,
        }
    }
}
