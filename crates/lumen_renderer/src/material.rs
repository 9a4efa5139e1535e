//! Material trait for surface scattering.
//!
//! Materials work in the local shading frame, where the surface normal is
//! +Z. `incoming` is always the travel direction of the path ray, so it
//! points *into* the surface: a ray arriving from the normal's side has
//! `incoming.z < 0`.

use crate::sampling::{cosine_hemisphere, gen_f32, power_cosine_lobe};
use lumen_math::{Frame, Vec3};
use rand::RngCore;
use std::f32::consts::{FRAC_1_PI, PI};

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Index of refraction of common glass.
pub const IOR_GLASS: f32 = 1.5;

/// Index of refraction of diamond.
pub const IOR_DIAMOND: f32 = 2.4;

/// One importance-sampled scattering direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BsdfSample {
    /// Local-frame direction the path continues in
    pub outgoing: Vec3,
    /// BSDF value for the pair of directions
    pub value: Color,
    /// Probability density of having drawn `outgoing`
    pub pdf: f32,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Draw an outgoing direction from the material's scattering distribution.
    ///
    /// Returns `None` if the drawn direction cannot carry light (for example
    /// a glossy lobe direction that falls below the surface).
    fn sample(&self, rng: &mut dyn RngCore, incoming: Vec3) -> Option<BsdfSample>;

    /// BSDF value for an explicit pair of directions. Always zero for delta
    /// distributions.
    fn eval(&self, incoming: Vec3, outgoing: Vec3) -> Color;

    /// Density with which `sample` draws `outgoing`. Always zero for delta
    /// distributions.
    fn pdf(&self, incoming: Vec3, outgoing: Vec3) -> f32;

    /// True if the material scatters into a discrete set of directions
    /// (mirror, glass). Light sampling is useless on such surfaces.
    fn is_specular(&self) -> bool {
        false
    }
}

/// Whether `outgoing` leaves on the side `incoming` arrived from.
#[inline]
fn is_reflection(incoming: Vec3, outgoing: Vec3) -> bool {
    incoming.z * outgoing.z < 0.0
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone)]
pub struct Lambert {
    albedo: Color,
}

impl Lambert {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Material for Lambert {
    fn sample(&self, rng: &mut dyn RngCore, incoming: Vec3) -> Option<BsdfSample> {
        let mut outgoing = cosine_hemisphere(rng);
        if incoming.z > 0.0 {
            outgoing.z = -outgoing.z;
        }

        let pdf = outgoing.z.abs() * FRAC_1_PI;
        if pdf <= 0.0 {
            return None;
        }

        Some(BsdfSample {
            outgoing,
            value: self.albedo * FRAC_1_PI,
            pdf,
        })
    }

    fn eval(&self, incoming: Vec3, outgoing: Vec3) -> Color {
        if is_reflection(incoming, outgoing) {
            self.albedo * FRAC_1_PI
        } else {
            Color::ZERO
        }
    }

    fn pdf(&self, incoming: Vec3, outgoing: Vec3) -> f32 {
        if is_reflection(incoming, outgoing) {
            outgoing.z.abs() * FRAC_1_PI
        } else {
            0.0
        }
    }
}

/// Modified Phong glossy reflector.
///
/// The lobe is `cos^e(alpha)`, where alpha is the angle between the
/// outgoing direction and the mirror direction.
#[derive(Debug, Clone)]
pub struct Phong {
    exponent: f32,
    scale_brdf: Color,
    scale_prob: f32,
    inv_exponent: f32,
}

impl Phong {
    /// Create a Phong material. Exponents below 1 are raised to 1.
    pub fn new(color: Color, exponent: f32) -> Self {
        let exponent = exponent.max(1.0);
        Self {
            exponent,
            scale_brdf: color * ((exponent + 2.0) / (2.0 * PI)),
            scale_prob: (exponent + 1.0) / (2.0 * PI),
            inv_exponent: 1.0 / (exponent + 1.0),
        }
    }

    /// `cos^e(alpha)` for a reflected direction, zero below the surface.
    fn lobe(&self, incoming: Vec3, outgoing: Vec3) -> f32 {
        if !is_reflection(incoming, outgoing) {
            return 0.0;
        }
        let cos_alpha = outgoing.dot(reflect(incoming, Vec3::Z)).max(0.0);
        cos_alpha.powf(self.exponent)
    }
}

impl Material for Phong {
    fn sample(&self, rng: &mut dyn RngCore, incoming: Vec3) -> Option<BsdfSample> {
        let mirror = reflect(incoming, Vec3::Z);
        let local = power_cosine_lobe(rng, self.inv_exponent);
        let outgoing = Frame::from_normal(mirror).to_world(local);

        // The lobe can reach below the surface at grazing angles
        if !is_reflection(incoming, outgoing) {
            return None;
        }

        let lobe = local.z.powf(self.exponent);
        let pdf = self.scale_prob * lobe;
        if pdf <= 0.0 {
            return None;
        }

        Some(BsdfSample {
            outgoing,
            value: self.scale_brdf * lobe,
            pdf,
        })
    }

    fn eval(&self, incoming: Vec3, outgoing: Vec3) -> Color {
        self.scale_brdf * self.lobe(incoming, outgoing)
    }

    fn pdf(&self, incoming: Vec3, outgoing: Vec3) -> f32 {
        self.scale_prob * self.lobe(incoming, outgoing)
    }
}

/// Dielectric (glass) material: Fresnel-weighted choice between mirror
/// reflection and refraction.
#[derive(Debug, Clone)]
pub struct Dielectric {
    color: Color,
    /// Schlick's reflectance at normal incidence
    r0: f32,
    /// Ratio of indices when entering the material, `1 / ior`
    eta_entering: f32,
    /// Ratio of indices when exiting the material, `ior`
    eta_exiting: f32,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(color: Color, ior: f32) -> Self {
        let r0 = ((ior - 1.0) / (ior + 1.0)).powi(2);
        Self {
            color,
            r0,
            eta_entering: 1.0 / ior,
            eta_exiting: ior,
        }
    }

    /// Schlick's approximation for reflectance
    fn schlick(&self, cosine: f32) -> f32 {
        self.r0 + (1.0 - self.r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn sample(&self, rng: &mut dyn RngCore, incoming: Vec3) -> Option<BsdfSample> {
        let entering = incoming.z < 0.0;
        let (eta, facing) = if entering {
            (self.eta_entering, Vec3::Z)
        } else {
            (self.eta_exiting, Vec3::NEG_Z)
        };

        let reflected = reflect(incoming, Vec3::Z);
        let cos_i = -incoming.dot(facing);

        // Probability of reflecting and the direction taken otherwise
        let (reflectance, refracted) = match refract(incoming, facing, eta) {
            Some(refracted) => {
                // Schlick is evaluated on the cosine in the less dense medium
                let cosine = if entering { cos_i } else { refracted.dot(-facing) };
                (self.schlick(cosine), refracted)
            }
            // Total internal reflection
            None => (1.0, reflected),
        };

        let (outgoing, probability) = if gen_f32(rng) < reflectance {
            (reflected, reflectance)
        } else {
            (refracted, 1.0 - reflectance)
        };

        let cos_o = outgoing.z.abs();
        if probability <= 0.0 || cos_o <= 0.0 {
            return None;
        }

        // Delta lobe: value * |cos| / pdf leaves exactly `color`
        Some(BsdfSample {
            outgoing,
            value: self.color * (probability / cos_o),
            pdf: probability,
        })
    }

    fn eval(&self, _incoming: Vec3, _outgoing: Vec3) -> Color {
        Color::ZERO
    }

    fn pdf(&self, _incoming: Vec3, _outgoing: Vec3) -> f32 {
        0.0
    }

    fn is_specular(&self) -> bool {
        true
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface whose normal `n` faces against it.
///
/// `eta` is the ratio of the incident index over the transmitted index.
/// Returns `None` on total internal reflection.
#[inline]
pub fn refract(v: Vec3, n: Vec3, eta: f32) -> Option<Vec3> {
    let cos_i = (-v).dot(n).min(1.0);
    let sin2_t = eta * eta * (1.0 - cos_i * cos_i).max(0.0);
    if sin2_t > 1.0 {
        return None;
    }
    let cos_t = (1.0 - sin2_t).sqrt();
    Some(eta * v + (eta * cos_i - cos_t) * n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn incoming_at(theta: f32) -> Vec3 {
        Vec3::new(theta.sin(), 0.0, -theta.cos())
    }

    /// Sampled directions must have matching, positive eval and pdf.
    fn assert_support_consistent(material: &dyn Material, incoming: Vec3) {
        let mut rng = StdRng::seed_from_u64(42);
        let mut drawn = 0;

        for _ in 0..2000 {
            let Some(sample) = material.sample(&mut rng, incoming) else {
                continue;
            };
            drawn += 1;

            assert!(sample.pdf > 0.0);
            assert!(sample.value.min_element() >= 0.0);

            let pdf = material.pdf(incoming, sample.outgoing);
            let value = material.eval(incoming, sample.outgoing);
            assert!(pdf > 0.0, "sampled direction has zero pdf");
            assert!(value.max_element() > 0.0, "sampled direction has zero value");
            assert!((pdf - sample.pdf).abs() <= 1e-3 * sample.pdf.max(1.0));
            let tolerance = 1e-3 * sample.value.max_element().max(1.0);
            assert!((value - sample.value).abs().max_element() <= tolerance);
        }
        assert!(drawn > 0);

        // And the converse: nonzero eval implies nonzero pdf
        for i in 0..64 {
            let phi = i as f32 * 0.3;
            let z = (i as f32 / 64.0) * 2.0 - 1.0;
            let r = (1.0 - z * z).sqrt();
            let outgoing = Vec3::new(r * phi.cos(), r * phi.sin(), z);
            let value = material.eval(incoming, outgoing);
            let pdf = material.pdf(incoming, outgoing);
            assert_eq!(value.max_element() > 0.0, pdf > 0.0);
        }
    }

    #[test]
    fn test_lambert_support() {
        let lambert = Lambert::new(Color::new(0.8, 0.5, 0.2));
        assert_support_consistent(&lambert, incoming_at(0.4));
        // From below the surface the lobe flips
        assert_support_consistent(&lambert, -incoming_at(0.4));
    }

    #[test]
    fn test_lambert_reflects_to_incoming_side() {
        let lambert = Lambert::new(Color::ONE);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let sample = lambert.sample(&mut rng, incoming_at(0.2)).unwrap();
            assert!(sample.outgoing.z >= 0.0);
            let sample = lambert.sample(&mut rng, -incoming_at(0.2)).unwrap();
            assert!(sample.outgoing.z <= 0.0);
        }
    }

    #[test]
    fn test_phong_support() {
        for exponent in [1.0, 10.0, 200.0] {
            let phong = Phong::new(Color::new(0.9, 0.9, 0.6), exponent);
            assert_support_consistent(&phong, incoming_at(0.3));
            assert_support_consistent(&phong, incoming_at(1.3));
        }
    }

    #[test]
    fn test_phong_zero_below_surface() {
        let phong = Phong::new(Color::ONE, 20.0);
        let incoming = incoming_at(0.5);
        let below = Vec3::new(0.3, 0.0, -0.9).normalize();

        assert_eq!(phong.eval(incoming, below), Color::ZERO);
        assert_eq!(phong.pdf(incoming, below), 0.0);
    }

    #[test]
    fn test_phong_peaks_at_mirror() {
        let phong = Phong::new(Color::ONE, 50.0);
        let incoming = incoming_at(0.6);
        let mirror = reflect(incoming, Vec3::Z);
        let off = (mirror + Vec3::new(0.0, 0.2, 0.0)).normalize();

        assert!(phong.pdf(incoming, mirror) > phong.pdf(incoming, off));
        assert!((phong.pdf(incoming, mirror) - 51.0 / (2.0 * PI)).abs() < 1e-3);
    }

    #[test]
    fn test_dielectric_throughput_is_color() {
        let glass = Dielectric::new(Color::new(1.0, 0.9, 0.8), IOR_GLASS);
        let mut rng = StdRng::seed_from_u64(42);

        for theta in [0.0, 0.5, 1.2] {
            for incoming in [incoming_at(theta), -incoming_at(theta)] {
                let sample = glass.sample(&mut rng, incoming).unwrap();
                let throughput = sample.value * sample.outgoing.z.abs() / sample.pdf;
                assert!((throughput - Color::new(1.0, 0.9, 0.8)).length() < 1e-4);
            }
        }
    }

    #[test]
    fn test_dielectric_refracts_towards_normal() {
        let glass = Dielectric::new(Color::ONE, IOR_GLASS);
        let mut rng = StdRng::seed_from_u64(7);
        let incoming = incoming_at(0.7);

        let refracted = (0..100)
            .filter_map(|_| glass.sample(&mut rng, incoming))
            .find(|s| s.outgoing.z < 0.0)
            .expect("some samples refract");

        // Snell: sin(theta_t) = sin(theta_i) / 1.5
        let sin_t = (1.0 - refracted.outgoing.z * refracted.outgoing.z).sqrt();
        assert!((sin_t - 0.7_f32.sin() / IOR_GLASS).abs() < 1e-4);
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let diamond = Dielectric::new(Color::ONE, IOR_DIAMOND);
        let mut rng = StdRng::seed_from_u64(42);

        // Exiting at a steep angle: beyond the critical angle of ~24.6 degrees
        let incoming = Vec3::new(0.8_f32.sin(), 0.0, 0.8_f32.cos());
        for _ in 0..100 {
            let sample = diamond.sample(&mut rng, incoming).unwrap();
            assert!(sample.outgoing.z < 0.0, "must stay inside");
            assert!((sample.pdf - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_dielectric_is_delta() {
        let glass = Dielectric::new(Color::ONE, IOR_GLASS);
        assert!(glass.is_specular());
        assert_eq!(glass.eval(incoming_at(0.1), Vec3::Z), Color::ZERO);
        assert_eq!(glass.pdf(incoming_at(0.1), Vec3::Z), 0.0);
    }

    #[test]
    fn test_near_unity_ior_transmits() {
        let almost_air = Dielectric::new(Color::ONE, 1.0001);
        let mut rng = StdRng::seed_from_u64(42);
        let incoming = Vec3::NEG_Z;

        let n = 10_000;
        let reflected = (0..n)
            .filter_map(|_| almost_air.sample(&mut rng, incoming))
            .filter(|s| s.outgoing.z > 0.0)
            .count();
        assert!(reflected < n / 100, "reflected {} of {}", reflected, n);
    }

    #[test]
    fn test_refract_straight_through_at_normal_incidence() {
        let t = refract(Vec3::NEG_Z, Vec3::Z, 1.0 / 1.5).unwrap();
        assert!((t - Vec3::NEG_Z).length() < 1e-6);
    }
}
