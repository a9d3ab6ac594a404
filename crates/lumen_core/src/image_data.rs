//! Decoded texture images.
//!
//! Images are decoded once at scene-build time into a linear-light float
//! buffer and shared by reference afterwards; the render loop only samples.

use std::path::Path;

use lumen_math::Vec3;
use thiserror::Error;

/// Errors that can occur while decoding a texture image.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image decoding error: {0}")]
    Decode(#[from] image::ImageError),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A decoded image: linear RGB floats, row-major, rows top to bottom.
#[derive(Clone, Debug)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pixels: Vec<[f32; 3]>,
}

impl ImageData {
    /// Decode JPG/PNG bytes (format sniffed from the data).
    pub fn from_bytes(bytes: &[u8]) -> TextureResult<Self> {
        let img = image::load_from_memory(bytes)?;
        Ok(Self::from_decoded(img))
    }

    /// Decode an image file from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> TextureResult<Self> {
        let path = path.as_ref();
        let img = image::open(path)?;
        let data = Self::from_decoded(img);
        log::debug!(
            "loaded texture {} ({}x{})",
            path.display(),
            data.width,
            data.height
        );
        Ok(data)
    }

    fn from_decoded(img: image::DynamicImage) -> Self {
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();

        let pixels = rgb
            .pixels()
            .map(|p| {
                [
                    srgb_to_linear(p[0]),
                    srgb_to_linear(p[1]),
                    srgb_to_linear(p[2]),
                ]
            })
            .collect();

        Self {
            width,
            height,
            pixels,
        }
    }

    /// Sample at UV coordinates with bilinear filtering.
    ///
    /// u and v are clamped to [0, 1]; v is flipped so v = 0 addresses the
    /// bottom row, matching surface parameterizations.
    pub fn sample(&self, u: f32, v: f32) -> Vec3 {
        let u = u.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);

        let x = u * (self.width as f32 - 1.0);
        let y = (1.0 - v) * (self.height as f32 - 1.0);

        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);

        let fx = x.fract();
        let fy = y.fract();

        let p00 = self.pixel(x0, y0);
        let p10 = self.pixel(x1, y0);
        let p01 = self.pixel(x0, y1);
        let p11 = self.pixel(x1, y1);

        let top = p00 * (1.0 - fx) + p10 * fx;
        let bottom = p01 * (1.0 - fx) + p11 * fx;

        top * (1.0 - fy) + bottom * fy
    }

    fn pixel(&self, x: u32, y: u32) -> Vec3 {
        let idx = (y * self.width + x) as usize;
        let p = self.pixels.get(idx).copied().unwrap_or([0.0, 0.0, 0.0]);
        Vec3::from_array(p)
    }

    #[cfg(test)]
    fn from_linear_pixels(width: u32, height: u32, pixels: Vec<[f32; 3]>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }
}

/// Convert an sRGB byte to linear light.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
