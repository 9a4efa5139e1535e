// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod aabb;
mod frame;
mod interval;
mod ray;
mod scalar;
mod transform;

pub use aabb::{Aabb, Axis};
pub use frame::{coordinate_system, Frame};
pub use interval::Interval;
pub use ray::Ray;
pub use scalar::{is_nearly_zero, is_nearly_zero_vec, is_positive, EPSILON, VERY_SMALL};
pub use transform::Mat4Ext;
