//! Light-carrying rays.
//!
//! A path segment is a geometric ray plus the throughput the path has
//! accumulated so far.

use crate::Color;
use lumen_math::{is_nearly_zero_vec, Ray, Vec3};

/// A ray of light: a ray with an additional color component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightRay {
    /// The geometric ray
    pub ray: Ray,
    /// The light color (throughput) carried by the ray
    pub color: Color,
}

impl LightRay {
    /// Create a light ray with the given origin, direction, and color.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3, color: Color) -> Self {
        Self {
            ray: Ray::new(origin, direction),
            color,
        }
    }

    /// Create a white light ray.
    #[inline]
    pub fn white(ray: Ray) -> Self {
        Self {
            ray,
            color: Color::ONE,
        }
    }

    /// Whether the ray's color is black, within a small epsilon.
    #[inline]
    pub fn is_black(&self) -> bool {
        is_nearly_zero_vec(self.color)
    }

    /// The largest component of the ray's color.
    #[inline]
    pub fn energy(&self) -> f32 {
        self.color.max_element()
    }

    /// Whether the ray's direction has (nearly) zero length.
    #[inline]
    pub fn is_zero_length(&self) -> bool {
        is_nearly_zero_vec(self.ray.direction)
    }

    /// Make the ray black and collapse it to the origin.
    #[inline]
    pub fn kill(&mut self) {
        self.ray = Ray::default();
        self.color = Color::ZERO;
    }
}

impl Default for LightRay {
    fn default() -> Self {
        Self::white(Ray::default())
    }
}
