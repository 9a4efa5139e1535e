//! Camera for ray generation.
//!
//! Camera space looks down -Z with +Y up. The focal plane sits at
//! `z = -focal_length`; the field of view spans the smaller image dimension.
//! Rays start on a thin lens of radius `lens_radius` centred on the origin
//! and pass through the jittered pixel position on the focal plane, so
//! everything on that plane is in focus.

use crate::sampling::{gen_f32, sample_disc};
use lumen_core::{CameraSettings, RenderSettings};
use lumen_math::{Mat4, Mat4Ext, Ray, Vec3};
use rand::RngCore;

/// Thin-lens camera with a fixed camera-to-world transform.
#[derive(Debug, Clone)]
pub struct Camera {
    width: u32,
    height: u32,
    focal_length: f32,
    lens_radius: f32,
    camera_to_world: Mat4,

    // Focal plane in camera space
    plane_origin: Vec3,
    plane_right: Vec3,
    plane_down: Vec3,
}

impl Camera {
    /// Create a camera for a `width` x `height` image.
    pub fn new(width: u32, height: u32, settings: &CameraSettings) -> Self {
        let half_extent = settings.focal_length * (0.5 * settings.fov).tan();
        let (half_w, half_h) = if width >= height {
            (half_extent * width as f32 / height as f32, half_extent)
        } else {
            (half_extent, half_extent * height as f32 / width as f32)
        };

        Self {
            width,
            height,
            focal_length: settings.focal_length,
            lens_radius: settings.lens_radius.max(0.0),
            camera_to_world: settings.camera_to_world,
            plane_origin: Vec3::new(-half_w, half_h, -settings.focal_length),
            plane_right: Vec3::new(2.0 * half_w, 0.0, 0.0),
            plane_down: Vec3::new(0.0, -2.0 * half_h, 0.0),
        }
    }

    /// Create a camera from the full render settings.
    pub fn from_settings(settings: &RenderSettings) -> Self {
        Self::new(settings.width, settings.height, &settings.camera_settings())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn focal_length(&self) -> f32 {
        self.focal_length
    }

    pub fn lens_radius(&self) -> f32 {
        self.lens_radius
    }

    /// Point on the focal plane, in camera space, for image coordinates
    /// measured in pixels from the top-left corner.
    fn focal_point(&self, px: f32, py: f32) -> Vec3 {
        self.plane_origin
            + self.plane_right * (px / self.width as f32)
            + self.plane_down * (py / self.height as f32)
    }

    /// Generate a world-space ray for pixel (x, y) with random jitter and
    /// lens sampling. The direction is unit length.
    pub fn camera_ray(&self, x: u32, y: u32, rng: &mut dyn RngCore) -> Ray {
        let focus = self.focal_point(x as f32 + gen_f32(rng), y as f32 + gen_f32(rng));

        let lens = if self.lens_radius > 0.0 {
            let d = sample_disc(rng) * self.lens_radius;
            Vec3::new(d.x, d.y, 0.0)
        } else {
            Vec3::ZERO
        };

        let local = Ray::new(lens, (focus - lens).normalize());
        let world = self.camera_to_world.transform_ray(&local);
        Ray::new(world.origin, world.direction.normalize())
    }
}
