//! Numeric tolerances shared by the intersection and sampling code.

use crate::Vec3;

/// Threshold below which a scalar (or every component of a vector) counts as zero.
pub const EPSILON: f32 = 1e-7;

/// Smallest distance treated as a real separation between two points.
///
/// Used for hit distances, shadow-ray bounds and ray origin offsets.
pub const VERY_SMALL: f32 = 1e-4;

/// Returns true if |x| is within `EPSILON` of zero.
#[inline]
pub fn is_nearly_zero(x: f32) -> bool {
    x.abs() < EPSILON
}

/// Returns true if every component of `v` is within `EPSILON` of zero.
#[inline]
pub fn is_nearly_zero_vec(v: Vec3) -> bool {
    v.abs().max_element() < EPSILON
}

/// Returns true if x is strictly greater than `VERY_SMALL`.
#[inline]
pub fn is_positive(x: f32) -> bool {
    x > VERY_SMALL
}
