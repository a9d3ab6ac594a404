//! Textures: color as a function of surface coordinates and position.

use std::sync::Arc;

use crate::Color;
use lumen_core::ImageData;
use lumen_math::Vec3;

/// Color looked up by surface UV and world-space hit point.
pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// A single constant color.
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.albedo
    }
}

/// A 3D checker pattern alternating two textures by world position.
pub struct Checker {
    inv_scale: f32,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl Checker {
    pub fn new(scale: f32, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    pub fn from_colors(scale: f32, even: Color, odd: Color) -> Self {
        Self::new(
            scale,
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
        )
    }
}

impl Texture for Checker {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let x = (self.inv_scale * p.x).floor() as i64;
        let y = (self.inv_scale * p.y).floor() as i64;
        let z = (self.inv_scale * p.z).floor() as i64;

        if (x + y + z) % 2 == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// A texture backed by a decoded image, addressed by UV.
pub struct ImageTexture {
    image: Arc<ImageData>,
}

impl ImageTexture {
    pub fn new(image: Arc<ImageData>) -> Self {
        Self { image }
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        self.image.sample(u, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_ignores_coordinates() {
        let tex = SolidColor::new(Color::new(0.2, 0.4, 0.6));
        assert_eq!(tex.value(0.0, 0.0, Vec3::ZERO), Color::new(0.2, 0.4, 0.6));
        assert_eq!(
            tex.value(0.9, 0.1, Vec3::new(100.0, -5.0, 3.0)),
            Color::new(0.2, 0.4, 0.6)
        );
    }

    #[test]
    fn checker_alternates_by_cell() {
        let white = Color::ONE;
        let black = Color::ZERO;
        let tex = Checker::from_colors(1.0, white, black);

        assert_eq!(tex.value(0.0, 0.0, Vec3::new(0.5, 0.5, 0.5)), white);
        // moving one cell along any single axis flips the parity
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(1.5, 0.5, 0.5)), black);
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(0.5, 1.5, 0.5)), black);
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(1.5, 1.5, 0.5)), white);
    }

    #[test]
    fn checker_scale_sets_cell_size() {
        let tex = Checker::from_colors(2.0, Color::ONE, Color::ZERO);
        // cells are 2 units wide: 0.5 and 1.5 share a cell
        assert_eq!(
            tex.value(0.0, 0.0, Vec3::new(0.5, 0.0, 0.0)),
            tex.value(0.0, 0.0, Vec3::new(1.5, 0.0, 0.0))
        );
        assert_ne!(
            tex.value(0.0, 0.0, Vec3::new(0.5, 0.0, 0.0)),
            tex.value(0.0, 0.0, Vec3::new(2.5, 0.0, 0.0))
        );
    }
}
