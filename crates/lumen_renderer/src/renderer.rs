//! Progressive multi-threaded rendering.
//!
//! Each iteration traces every pixel once (or `samples_per_pixel` times)
//! and blends the result into the accumulated image. Rows are rendered in
//! parallel with rayon. Every row gets its own `StdRng`, seeded from the
//! master RNG before the parallel section starts, so a render is
//! reproducible from its seed regardless of thread scheduling.

use crate::camera::Camera;
use crate::integrator::{PathTracer, INITIAL_PATH_LENGTH};
use crate::material::Color;
use crate::output::{Image, ImageSink, OutputError};
use crate::scene::Scene;
use lumen_core::{RenderSettings, SettingsError};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Owns the scene, camera and accumulated image of one render.
pub struct Renderer {
    scene: Scene,
    camera: Camera,
    image: Image,
    rng: StdRng,
    samples_per_pixel: u32,
    radiance_clamp: f32,
}

impl Renderer {
    /// Fails when `settings` do not describe a usable image or lens.
    pub fn new(scene: Scene, settings: &RenderSettings) -> Result<Self, SettingsError> {
        settings.validate()?;

        let camera = Camera::from_settings(settings);
        log::info!(
            "Renderer: {}x{}, {} spp, lens radius {:.4}, {} primitives, {} lights",
            settings.width,
            settings.height,
            settings.samples_per_pixel,
            camera.lens_radius(),
            scene.primitive_count(),
            scene.lights().len()
        );

        Ok(Self {
            scene,
            camera,
            image: Image::new(settings.width, settings.height),
            rng: StdRng::seed_from_u64(settings.seed),
            samples_per_pixel: settings.samples_per_pixel,
            radiance_clamp: settings.radiance_clamp,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    /// Trace one sample image without touching the accumulator.
    fn sample_iteration(&mut self) -> Vec<Color> {
        let width = self.image.width() as usize;
        let height = self.image.height() as usize;

        // One seed per row, drawn in order before any thread starts
        let seeds: Vec<u64> = (0..height).map(|_| self.rng.next_u64()).collect();

        let tracer = PathTracer::new(&self.scene, self.radiance_clamp);
        let camera = &self.camera;
        let spp = self.samples_per_pixel;

        let mut samples = vec![Color::ZERO; width * height];
        samples
            .par_chunks_mut(width)
            .zip(seeds.par_iter())
            .enumerate()
            .for_each(|(y, (row, &seed))| {
                let mut rng = StdRng::seed_from_u64(seed);
                let mut path = Vec::with_capacity(INITIAL_PATH_LENGTH);

                for (x, pixel) in row.iter_mut().enumerate() {
                    let mut sum = Color::ZERO;
                    for _ in 0..spp {
                        let ray = camera.camera_ray(x as u32, y as u32, &mut rng);
                        sum += tracer.trace(&mut rng, ray, &mut path);
                    }
                    *pixel = sum / spp as f32;
                }
            });
        samples
    }

    /// Render one iteration, blend it in and write the image to `sink`.
    pub fn render_once(
        &mut self,
        name: &str,
        sink: &mut dyn ImageSink,
    ) -> Result<(), OutputError> {
        let start = Instant::now();

        let samples = self.sample_iteration();
        self.image.blend(&samples);

        log::info!(
            "Iteration {} finished in {:.2?}",
            self.image.iterations(),
            start.elapsed()
        );
        sink.write(name, &self.image)
    }

    /// Render `iterations` iterations, or with `None` until `cancel` is raised.
    ///
    /// The cancel flag is checked before every iteration. Returns the number
    /// of iterations rendered by this call.
    pub fn render_multiple(
        &mut self,
        name: &str,
        iterations: Option<u32>,
        sink: &mut dyn ImageSink,
        cancel: &AtomicBool,
    ) -> Result<u32, OutputError> {
        let mut rendered = 0;
        while iterations.map_or(true, |n| rendered < n) {
            if cancel.load(Ordering::Relaxed) {
                log::info!("Render cancelled after {} iterations", rendered);
                break;
            }
            self.render_once(name, sink)?;
            rendered += 1;
        }
        Ok(rendered)
    }
}
