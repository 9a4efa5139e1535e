//! Unidirectional path tracing with next-event estimation.
//!
//! A sample is produced in two passes. `random_walk` builds the path by
//! repeatedly hitting the scene and importance-sampling the BSDF, recording
//! the throughput at every vertex. `trace` then sums what each vertex sees:
//! emission where a light was reached by a camera ray or a specular bounce,
//! and one light sample everywhere else.

use crate::material::Color;
use crate::ray::LightRay;
use crate::sampling::gen_f32;
use crate::scene::{Accelerator, Scene};
use crate::shape::Intersection;
use lumen_math::{Frame, Ray, VERY_SMALL};
use rand::RngCore;

/// Reserved capacity of the per-row path buffer, and the most vertices a
/// walk records.
pub const INITIAL_PATH_LENGTH: usize = 50;

/// Path length from which Russian roulette starts terminating paths.
pub const RUSSIAN_ROULETTE_DEPTH_1: usize = 5;

/// Path length from which Russian roulette becomes aggressive.
///
/// Walks are also cut at `INITIAL_PATH_LENGTH` vertices, so the few paths
/// that survive roulette this long lose their remaining energy. The bias is
/// below the noise of any practical render.
pub const RUSSIAN_ROULETTE_DEPTH_2: usize = 50;

/// Lowest survival probability, bounding the throughput boost of a survivor.
const MIN_SURVIVAL: f32 = 0.05;

/// One scattering event of a random walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathVertex {
    pub isect: Intersection,
    /// Throughput of the path arriving at this vertex
    pub beta: Color,
    /// Density of the direction that led here (1 for the camera ray)
    pub pdf: f32,
    /// Reached straight from the camera or through a specular bounce
    pub delta: bool,
}

/// Decide whether a path of `depth` vertices continues.
///
/// A surviving ray has its color divided by the survival probability; a
/// terminated ray is killed. Returns whether the ray survived.
pub fn russian_roulette(rng: &mut dyn RngCore, depth: usize, ray: &mut LightRay) -> bool {
    let ceiling = if depth >= RUSSIAN_ROULETTE_DEPTH_2 {
        0.5
    } else if depth >= RUSSIAN_ROULETTE_DEPTH_1 {
        0.95
    } else {
        return true;
    };

    let survival = ray.energy().min(ceiling).max(MIN_SURVIVAL);
    if gen_f32(rng) < survival {
        ray.color /= survival;
        true
    } else {
        ray.kill();
        false
    }
}

/// Path tracer over a finished scene.
#[derive(Clone, Copy)]
pub struct PathTracer<'a> {
    scene: &'a Scene,
    radiance_clamp: f32,
}

impl<'a> PathTracer<'a> {
    /// `radiance_clamp` is the per-component ceiling of a single sample;
    /// `f32::MAX` disables clamping.
    pub fn new(scene: &'a Scene, radiance_clamp: f32) -> Self {
        Self {
            scene,
            radiance_clamp,
        }
    }

    pub fn scene(&self) -> &'a Scene {
        self.scene
    }

    /// Walk from `ray` through the scene, recording every vertex in `path`.
    ///
    /// The path is cleared first. The walk stops when the ray escapes, hits
    /// an emitter, the BSDF sample is unusable, Russian roulette ends it or
    /// `INITIAL_PATH_LENGTH` vertices have been recorded.
    pub fn random_walk(&self, rng: &mut dyn RngCore, ray: Ray, path: &mut Vec<PathVertex>) {
        path.clear();

        let mut ray = LightRay::white(ray);
        let mut pdf = 1.0;
        let mut delta = true;

        while path.len() < INITIAL_PATH_LENGTH {
            let Some(isect) = self.scene.nearest_hit(&ray.ray) else {
                break;
            };
            path.push(PathVertex {
                isect,
                beta: ray.color,
                pdf,
                delta,
            });

            let prim = self.scene.primitive(isect.prim);
            if prim.is_emitter() {
                break;
            }

            let material = self.scene.material(prim.material);
            let frame = Frame::from_normal(isect.normal);
            let Some(sample) = material.sample(rng, frame.to_local(ray.ray.direction)) else {
                break;
            };
            if !(sample.pdf > 0.0 && sample.pdf.is_finite()) {
                break;
            }

            let beta = ray.color * sample.value * sample.outgoing.z.abs() / sample.pdf;
            if !beta.is_finite() {
                break;
            }

            let outgoing = frame.to_world(sample.outgoing);
            let offset = isect.normal * VERY_SMALL.copysign(outgoing.dot(isect.normal));
            ray = LightRay::new(isect.position + offset, outgoing, beta);
            if ray.is_black() || ray.is_zero_length() {
                break;
            }

            if !russian_roulette(rng, path.len(), &mut ray) {
                break;
            }

            pdf = sample.pdf;
            delta = material.is_specular();
        }
    }

    /// Radiance arriving along `ray`: one clamped Monte Carlo sample.
    ///
    /// `path` is scratch space reused between calls.
    pub fn trace(
        &self,
        rng: &mut dyn RngCore,
        ray: Ray,
        path: &mut Vec<PathVertex>,
    ) -> Color {
        self.random_walk(rng, ray, path);

        let mut radiance = Color::ZERO;
        for vertex in path.iter() {
            match self.scene.emitter(vertex.isect.prim) {
                // Emission found by BSDF sampling after a diffuse bounce was
                // already counted by the light sample at the previous vertex
                Some(light) => {
                    if vertex.delta {
                        radiance += vertex.beta * light.emitted();
                    }
                }
                None => {
                    radiance += vertex.beta * self.uniform_sample_one_light(rng, &vertex.isect);
                }
            }
        }

        if !radiance.is_finite() {
            return Color::ZERO;
        }
        radiance.min(Color::splat(self.radiance_clamp))
    }

    /// Direct light at `isect` from one uniformly chosen emitter, divided by
    /// the probability of choosing it.
    pub fn uniform_sample_one_light(
        &self,
        rng: &mut dyn RngCore,
        isect: &Intersection,
    ) -> Color {
        let lights = self.scene.lights();
        if lights.is_empty() {
            return Color::ZERO;
        }

        let material = self.scene.material(self.scene.primitive(isect.prim).material);
        if material.is_specular() {
            return Color::ZERO;
        }

        let count = lights.len();
        let index = ((gen_f32(rng) * count as f32) as usize).min(count - 1);
        lights[index].direct_illuminate(rng, isect, material, self.scene) * count as f32
    }
}
