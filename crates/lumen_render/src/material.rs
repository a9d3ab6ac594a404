//! Material dispatch: scattering and emission.

use std::sync::Arc;

use crate::{hittable::HitRecord, texture::SolidColor, Ray, Texture};
use lumen_math::Vec3;
use rand::RngCore;

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// Result of scattering a ray off a material.
#[derive(Debug, Clone, Copy)]
pub struct Scatter {
    /// Per-channel attenuation applied to light carried by the scattered ray
    pub attenuation: Color,
    /// The scattered ray, originating at the hit point
    pub scattered: Ray,
}

/// How light interacts with a surface.
///
/// `scatter` either produces a continuation ray with its attenuation or
/// nothing (the path is absorbed); `emitted` reports surface emission, zero
/// for everything but lights. Uses `&mut dyn RngCore` for object safety.
pub trait Material: Send + Sync {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter>;

    /// Emitted radiance at the given surface coordinates; both faces emit.
    fn emitted(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        Color::ZERO
    }
}

// =============================================================================
// RNG helpers (object-safe)
// =============================================================================

/// A random f32 in [0, 1) from a `dyn RngCore`.
///
/// `Rng::gen` is not available through a trait object, so this derives the
/// float from the high bits the way rand's Standard distribution does.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    let bits = rng.next_u32();
    (bits >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
}

/// A random unit vector, uniform over the sphere (rejection sampled).
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let v = Vec3::new(
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-6 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

// =============================================================================
// Materials
// =============================================================================

/// Lambertian (diffuse) surface, colored by a texture.
pub struct Lambertian {
    texture: Arc<dyn Texture>,
}

impl Lambertian {
    /// Solid-color diffuse surface.
    pub fn new(albedo: Color) -> Self {
        Self {
            texture: Arc::new(SolidColor::new(albedo)),
        }
    }

    /// Diffuse surface with a texture-driven albedo.
    pub fn from_texture(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }
}

impl Material for Lambertian {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter> {
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // catch near-zero scatter direction
        if scatter_direction.length_squared() < 1e-8 {
            scatter_direction = rec.normal;
        }

        Some(Scatter {
            attenuation: self.texture.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, scatter_direction, ray_in.time),
        })
    }
}

/// Metal: mirror reflection with optional fuzz.
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// `fuzz` of 0 is a perfect mirror; values are clamped to [0, 1].
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter> {
        let reflected = reflect(ray_in.direction.normalize(), rec.normal);
        let scattered_dir = reflected + self.fuzz * random_unit_vector(rng);

        // fuzzed reflections that dip below the surface are absorbed
        if scattered_dir.dot(rec.normal) > 0.0 {
            Some(Scatter {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, scattered_dir, ray_in.time),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass): refraction with Fresnel-weighted reflection.
pub struct Dielectric {
    /// Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    ior: f32,
}

impl Dielectric {
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance.
    fn reflectance(cosine: f32, ior: f32) -> f32 {
        let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter> {
        let refraction_ratio = if rec.front_face {
            1.0 / self.ior
        } else {
            self.ior
        };

        let unit_direction = ray_in.direction.normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction =
            if cannot_refract || Self::reflectance(cos_theta, refraction_ratio) > gen_f32(rng) {
                reflect(unit_direction, rec.normal)
            } else {
                refract(unit_direction, rec.normal, refraction_ratio)
            };

        Some(Scatter {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction, ray_in.time),
        })
    }
}

/// Diffuse area light: never scatters, emits from both faces.
pub struct DiffuseLight {
    emit: Arc<dyn Texture>,
}

impl DiffuseLight {
    pub fn new(emit: Color) -> Self {
        Self {
            emit: Arc::new(SolidColor::new(emit)),
        }
    }

    pub fn from_texture(emit: Arc<dyn Texture>) -> Self {
        Self { emit }
    }
}

impl Material for DiffuseLight {
    fn scatter(&self, _ray_in: &Ray, _rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<Scatter> {
        None
    }

    fn emitted(&self, u: f32, v: f32, p: Vec3) -> Color {
        self.emit.value(u, v, p)
    }
}

// =============================================================================
// Geometric helpers
// =============================================================================

/// Reflect v about the normal n.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract the unit vector uv through a surface with normal n (Snell).
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}
