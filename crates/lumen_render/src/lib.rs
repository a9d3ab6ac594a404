//! Lumen Render - CPU path tracing.
//!
//! A Monte Carlo path tracer built around a `Hittable` scene contract:
//! primitives (sphere, quad, triangle), affine transform wrappers, a BVH
//! aggregate, scatter/emit materials, and a thin-lens camera. Rendering is
//! parallel over spiral-ordered image tiles with per-tile seeded RNG streams,
//! so a fixed seed reproduces the image byte for byte.

mod bucket;
mod bvh;
mod camera;
mod hittable;
mod material;
mod quad;
mod renderer;
mod sphere;
mod texture;
mod transform;
mod triangle;

pub use bucket::{generate_buckets, render, render_bucket, Bucket, BucketResult};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{
    gen_f32, reflect, refract, Color, Dielectric, DiffuseLight, Lambertian, Material, Metal,
    Scatter,
};
pub use quad::{make_box, Quad};
pub use renderer::{ray_color, render_pixel, write_color, ImageBuffer};
pub use sphere::Sphere;
pub use texture::{Checker, ImageTexture, SolidColor, Texture};
pub use transform::{Axis, Rotate, Translate};
pub use triangle::Triangle;

// Re-export the math types so scene code needs a single import
pub use lumen_math::{Aabb, Interval, Ray, Vec3};
