//! Area lights and next-event estimation.

use crate::material::{Color, Material};
use crate::scene::{Accelerator, Scene};
use crate::shape::{Intersection, PrimId};
use lumen_math::{is_nearly_zero, Frame, Ray, VERY_SMALL};
use rand::RngCore;

/// A primitive that emits `color` from both of its faces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaLight {
    pub color: Color,
    /// The emitting primitive
    pub prim: PrimId,
}

impl AreaLight {
    pub fn new(color: Color, prim: PrimId) -> Self {
        Self { color, prim }
    }

    /// Radiance leaving the light towards any direction.
    #[inline]
    pub fn emitted(&self) -> Color {
        self.color
    }

    /// One-sample estimate of the light this emitter sends through `isect`
    /// back along the incoming ray.
    ///
    /// Samples a point uniformly on the emitter's surface and converts the
    /// area density `1 / area` to solid angle with the cosine at the light
    /// and the inverse-square distance.
    pub fn direct_illuminate(
        &self,
        rng: &mut dyn RngCore,
        isect: &Intersection,
        material: &dyn Material,
        scene: &Scene,
    ) -> Color {
        // A primitive never lights itself
        if isect.prim == self.prim {
            return Color::ZERO;
        }

        let emitter = &scene.primitive(self.prim).shape;
        let sample = emitter.sample_point(rng, scene.vertices());

        let to_light = sample.position - isect.position;
        let distance2 = to_light.length_squared();
        if is_nearly_zero(distance2) {
            return Color::ZERO;
        }
        let distance = distance2.sqrt();
        let wi = to_light / distance;

        let cos_surface = isect.normal.dot(wi);
        let cos_light = sample.normal.dot(wi).abs();
        if is_nearly_zero(cos_surface) || is_nearly_zero(cos_light) {
            return Color::ZERO;
        }

        let frame = Frame::from_normal(isect.normal);
        let f = material.eval(
            frame.to_local(isect.incoming.direction),
            frame.to_local(wi),
        );
        if f.max_element() <= 0.0 {
            return Color::ZERO;
        }

        // Lift the shadow origin off the surface on the side facing the light
        let origin = isect.position + isect.normal * VERY_SMALL.copysign(cos_surface);
        let shadow_distance = (sample.position - origin).length();
        if scene.any_hit(&Ray::new(origin, wi), shadow_distance) {
            return Color::ZERO;
        }

        let geometry = cos_surface.abs() * cos_light * emitter.area(scene.vertices()) / distance2;
        f * self.color * geometry
    }
}
