//! Progressive image accumulation and output.

use crate::material::Color;
use image::{ImageFormat, Rgb32FImage, RgbImage};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Buffer of {len} values does not fit a {width}x{height} image")]
    BufferSize { width: u32, height: u32, len: usize },
}

/// Running average of per-iteration sample images.
#[derive(Debug, Clone)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
    iterations: u32,
}

impl Image {
    /// Create a new image filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
            iterations: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of iterations blended in so far.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Row-major pixels, top row first.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Blend one iteration's samples in with weight `1 / (iterations + 1)`.
    ///
    /// After `k` calls every pixel is the arithmetic mean of its `k` samples.
    pub fn blend(&mut self, samples: &[Color]) {
        debug_assert_eq!(samples.len(), self.pixels.len());

        let weight = 1.0 / (self.iterations + 1) as f32;
        for (pixel, &sample) in self.pixels.iter_mut().zip(samples) {
            *pixel += (sample - *pixel) * weight;
        }
        self.iterations += 1;
    }

    /// Convert to gamma-corrected 8-bit RGB (for preview or saving).
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb8(*color));
        }
        bytes
    }

    /// Linear float RGB, three values per pixel.
    pub fn to_rgb32f(&self) -> Vec<f32> {
        self.pixels.iter().flat_map(|c| c.to_array()).collect()
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a color to gamma-corrected 8-bit RGB.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let r = (255.0 * linear_to_gamma(color.x).clamp(0.0, 1.0)) as u8;
    let g = (255.0 * linear_to_gamma(color.y).clamp(0.0, 1.0)) as u8;
    let b = (255.0 * linear_to_gamma(color.z).clamp(0.0, 1.0)) as u8;
    [r, g, b]
}

/// Destination for the accumulated image, written after every iteration.
pub trait ImageSink {
    fn write(&mut self, name: &str, image: &Image) -> Result<(), OutputError>;
}

/// Writes `<dir>/<name>.exr` as linear float RGB.
#[derive(Debug, Clone)]
pub struct ExrWriter {
    dir: PathBuf,
}

impl ExrWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.exr", name))
    }
}

impl ImageSink for ExrWriter {
    fn write(&mut self, name: &str, image: &Image) -> Result<(), OutputError> {
        std::fs::create_dir_all(&self.dir)?;
        let data = image.to_rgb32f();
        let len = data.len();
        let buffer = Rgb32FImage::from_raw(image.width(), image.height(), data).ok_or(
            OutputError::BufferSize {
                width: image.width(),
                height: image.height(),
                len,
            },
        )?;
        save(buffer, &self.path_for(name), ImageFormat::OpenExr)
    }
}

/// Writes `<dir>/<name>.png` as a gamma-2 8-bit preview.
#[derive(Debug, Clone)]
pub struct PngWriter {
    dir: PathBuf,
}

impl PngWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.png", name))
    }
}

impl ImageSink for PngWriter {
    fn write(&mut self, name: &str, image: &Image) -> Result<(), OutputError> {
        std::fs::create_dir_all(&self.dir)?;
        let data = image.to_rgb8();
        let len = data.len();
        let buffer = RgbImage::from_raw(image.width(), image.height(), data).ok_or(
            OutputError::BufferSize {
                width: image.width(),
                height: image.height(),
                len,
            },
        )?;
        save(buffer, &self.path_for(name), ImageFormat::Png)
    }
}

fn save<I: Into<image::DynamicImage>>(
    buffer: I,
    path: &Path,
    format: ImageFormat,
) -> Result<(), OutputError> {
    buffer.into().save_with_format(path, format)?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_blend_is_running_mean() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut image = Image::new(3, 2);
        let mut sums = vec![Color::ZERO; 6];

        let k = 37;
        for _ in 0..k {
            let samples: Vec<Color> = (0..6)
                .map(|_| Color::new(rng.gen_range(0.0..10.0), rng.gen(), rng.gen()))
                .collect();
            for (sum, s) in sums.iter_mut().zip(&samples) {
                *sum += *s;
            }
            image.blend(&samples);
        }

        assert_eq!(image.iterations(), k);
        for (pixel, sum) in image.pixels().iter().zip(&sums) {
            let mean = *sum / k as f32;
            assert!((*pixel - mean).abs().max_element() < 1e-4);
        }
    }

    #[test]
    fn test_first_blend_replaces() {
        let mut image = Image::new(1, 1);
        image.blend(&[Color::new(0.25, 4.0, 1.0)]);
        assert_eq!(image.get(0, 0), Color::new(0.25, 4.0, 1.0));
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_color_to_rgb8_clamps() {
        assert_eq!(color_to_rgb8(Color::new(4.0, -1.0, 0.25)), [255, 0, 127]);
    }

    #[test]
    fn test_writers_create_files() {
        let name = format!("lumen_image_test_{}", std::process::id());
        let dir = std::env::temp_dir().join(name);
        let mut image = Image::new(4, 3);
        image.blend(&vec![Color::new(0.5, 0.1, 2.0); 12]);

        let mut exr = ExrWriter::new(&dir);
        exr.write("frame", &image).unwrap();
        assert!(exr.path_for("frame").exists());

        let mut png = PngWriter::new(&dir);
        png.write("frame", &image).unwrap();
        let preview = image::open(png.path_for("frame")).unwrap().to_rgb8();
        assert_eq!(preview.dimensions(), (4, 3));

        std::fs::remove_dir_all(&dir).ok();
    }
}
