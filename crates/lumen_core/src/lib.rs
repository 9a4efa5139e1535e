//! Lumen Core - renderer-agnostic scene inputs.
//!
//! This crate provides:
//!
//! - **Mesh data**: `Mesh`, an indexed triangle list with per-vertex normals,
//!   and OBJ import through `Mesh::load_obj`
//! - **Configuration**: `RenderSettings` (JSON), its `CameraSettings` lens
//!   subset and the camera `Transform`
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::{Mesh, RenderSettings};
//!
//! let settings = RenderSettings::load("render.json")?;
//! let mesh = Mesh::load_obj("bunny.obj")?;
//! println!("{} triangles at {}x{}",
//!     mesh.triangle_count(),
//!     settings.width,
//!     settings.height);
//! ```

pub mod mesh;
pub mod settings;
pub mod transform;

// Re-export commonly used types
pub use mesh::{Mesh, MeshError};
pub use settings::{CameraSettings, RenderSettings, SettingsError, BIASED_RADIANCE_CLAMPING};
pub use transform::Transform;
