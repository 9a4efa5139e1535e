//! Render configuration.
//!
//! Everything the camera needs at construction time: output resolution,
//! lens parameters, iteration count and sampling controls. Settings can be
//! built in code or read from a JSON file; missing fields take defaults.

use std::f32::consts::FRAC_PI_4;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::transform::Transform;
use lumen_math::Mat4;

/// Errors that can occur while loading render settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid setting `{field}`: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

/// Default firefly ceiling: no single sample may exceed this radiance.
pub const BIASED_RADIANCE_CLAMPING: f32 = 50.0;

/// The lens subset of the render settings, resolved for camera construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSettings {
    pub fov: f32,
    pub focal_length: f32,
    /// Zero for a pinhole camera
    pub lens_radius: f32,
    pub camera_to_world: Mat4,
}

/// Render settings consumed by the camera.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Output width in pixels
    pub width: u32,

    /// Output height in pixels
    pub height: u32,

    /// Field of view in radians, applied to the smaller image dimension
    pub fov: f32,

    /// Distance from the lens to the focal plane
    pub focal_length: f32,

    /// Lens f-stop; `None` renders through a pinhole (no depth of field)
    pub f_stop: Option<f32>,

    /// Iterations to render; negative renders until interrupted
    pub iterations: i32,

    /// Camera samples per pixel in each iteration
    pub samples_per_pixel: u32,

    /// Seed for the master RNG that seeds every row
    pub seed: u64,

    /// Per-sample radiance ceiling; `f32::MAX` renders unbiased
    pub radiance_clamp: f32,

    /// Camera-to-world transform
    pub camera: Transform,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fov: FRAC_PI_4,
            focal_length: 50.0,
            f_stop: Some(16.0),
            iterations: 1,
            samples_per_pixel: 1,
            seed: 0,
            radiance_clamp: BIASED_RADIANCE_CLAMPING,
            camera: Transform::default(),
        }
    }
}

impl RenderSettings {
    /// Parse settings from a JSON string and validate them.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: RenderSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file and validate them.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::debug!("Loaded render settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Check that every field is usable by the camera.
    pub fn validate(&self) -> Result<(), SettingsError> {
        fn invalid(field: &'static str, message: impl Into<String>) -> SettingsError {
            SettingsError::Invalid {
                field,
                message: message.into(),
            }
        }

        if self.width == 0 || self.height == 0 {
            return Err(invalid("width/height", "image dimensions must be non-zero"));
        }
        if !(self.fov > 0.0 && self.fov < std::f32::consts::PI) {
            return Err(invalid("fov", format!("{} is not in (0, pi)", self.fov)));
        }
        if !(self.focal_length > 0.0) || !self.focal_length.is_finite() {
            return Err(invalid("focal_length", "must be positive and finite"));
        }
        if let Some(f_stop) = self.f_stop {
            if !(f_stop > 0.0) {
                return Err(invalid("f_stop", "must be positive"));
            }
        }
        if self.samples_per_pixel == 0 {
            return Err(invalid("samples_per_pixel", "must be at least 1"));
        }
        if !(self.radiance_clamp > 0.0) {
            return Err(invalid("radiance_clamp", "must be positive"));
        }
        Ok(())
    }

    /// Radius of the lens opening: half the aperture diameter `focal_length / f_stop`.
    pub fn lens_radius(&self) -> f32 {
        match self.f_stop {
            Some(f_stop) if f_stop.is_finite() => 0.5 * self.focal_length / f_stop,
            _ => 0.0,
        }
    }

    /// Resolve the lens parameters and camera pose.
    pub fn camera_settings(&self) -> CameraSettings {
        CameraSettings {
            fov: self.fov,
            focal_length: self.focal_length,
            lens_radius: self.lens_radius(),
            camera_to_world: self.camera.to_matrix(),
        }
    }

    /// Number of iterations to render, or `None` to run until interrupted.
    pub fn iteration_limit(&self) -> Option<u32> {
        u32::try_from(self.iterations).ok()
    }
}
