//! Sample warping helpers.
//!
//! All functions draw from a `&mut dyn RngCore` so they can be used with
//! any per-row generator.

use lumen_math::{Vec2, Vec3};
use rand::{Rng, RngCore};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

/// Uniform float in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Map a point of the unit square to the unit disc, preserving relative areas.
///
/// Shirley and Chiu's concentric mapping.
pub fn concentric_disc(u: Vec2) -> Vec2 {
    let offset = 2.0 * u - Vec2::ONE;
    if offset.x == 0.0 && offset.y == 0.0 {
        return Vec2::ZERO;
    }

    let (r, theta) = if offset.x.abs() > offset.y.abs() {
        (offset.x, FRAC_PI_4 * (offset.y / offset.x))
    } else {
        (offset.y, FRAC_PI_2 - FRAC_PI_4 * (offset.x / offset.y))
    };
    r * Vec2::new(theta.cos(), theta.sin())
}

/// Uniformly sample a point on the unit disc.
pub fn sample_disc(rng: &mut dyn RngCore) -> Vec2 {
    concentric_disc(Vec2::new(gen_f32(rng), gen_f32(rng)))
}

/// Cosine-weighted direction on the +Z hemisphere; pdf = cos(theta) / pi.
pub fn cosine_hemisphere(rng: &mut dyn RngCore) -> Vec3 {
    let d = sample_disc(rng);
    let z = (1.0 - d.length_squared()).max(0.0).sqrt();
    Vec3::new(d.x, d.y, z)
}

/// Direction within a Phong-style lobe around +Z.
///
/// `inv_exponent` is `1 / (e + 1)`; the pdf is `(e + 1) / 2pi * cos^e(alpha)`.
pub fn power_cosine_lobe(rng: &mut dyn RngCore, inv_exponent: f32) -> Vec3 {
    let cos_alpha = gen_f32(rng).powf(inv_exponent);
    let sin_alpha = (1.0 - cos_alpha * cos_alpha).max(0.0).sqrt();
    let phi = 2.0 * PI * gen_f32(rng);
    Vec3::new(sin_alpha * phi.cos(), sin_alpha * phi.sin(), cos_alpha)
}

/// Uniform barycentric coordinates `(u, v)` on a triangle.
pub fn uniform_triangle(rng: &mut dyn RngCore) -> (f32, f32) {
    let su = gen_f32(rng).sqrt();
    let v = gen_f32(rng);
    (1.0 - su, v * su)
}
