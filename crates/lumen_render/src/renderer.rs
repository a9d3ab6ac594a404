//! The integrator and pixel pipeline: ray_color, per-pixel sampling, and
//! the tonemap from linear radiance sums to 8-bit sRGB.

use crate::{Camera, Color, HitRecord, Hittable, Ray};
use lumen_math::Interval;
use rand::RngCore;

/// Radiance carried back along a ray.
///
/// Iterative rather than recursive so a deep `max_depth` cannot blow the
/// stack: the loop keeps an accumulated color and a running throughput.
/// Rays start 0.001 past their origin to avoid self-intersection acne.
/// A path that survives to the depth limit contributes nothing further.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    max_depth: u32,
    background: Color,
    rng: &mut dyn RngCore,
) -> Color {
    let mut accum = Color::ZERO;
    let mut throughput = Color::ONE;
    let mut current = *ray;

    for _ in 0..max_depth {
        let mut rec = HitRecord::default();

        if !world.hit(&current, Interval::new(0.001, f32::INFINITY), &mut rec) {
            accum += throughput * background;
            break;
        }

        accum += throughput * rec.material.emitted(rec.u, rec.v, rec.p);

        match rec.material.scatter(&current, &rec, rng) {
            Some(scatter) => {
                throughput *= scatter.attenuation;
                current = scatter.scattered;
            }
            None => break,
        }
    }

    accum
}

/// Sum `samples_per_pixel` jittered samples for pixel (x, y).
///
/// Returns the raw radiance sum; dividing by the sample count is the
/// tonemap's job, so progressive accumulation can reuse the buffer.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_sum = Color::ZERO;

    for _ in 0..camera.samples_per_pixel {
        let ray = camera.get_ray(x, y, rng);
        pixel_sum += ray_color(&ray, world, camera.max_depth, camera.background, rng);
    }

    pixel_sum
}

/// Gamma correction (gamma = 2).
#[inline]
fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a radiance sample sum into an RGBA8 pixel.
pub fn write_color(sum: Color, samples_per_pixel: u32) -> [u8; 4] {
    let scale = 1.0 / samples_per_pixel as f32;

    let r = linear_to_gamma(sum.x * scale);
    let g = linear_to_gamma(sum.y * scale);
    let b = linear_to_gamma(sum.z * scale);

    let intensity = Interval::new(0.000, 0.999);
    [
        (256.0 * intensity.clamp(r)) as u8,
        (256.0 * intensity.clamp(g)) as u8,
        (256.0 * intensity.clamp(b)) as u8,
        255,
    ]
}

/// Render output: per-pixel radiance sums plus the sample count that
/// produced them.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: u32,
    pixels: Vec<Color>,
}

impl ImageBuffer {
    pub fn new(width: u32, height: u32, samples_per_pixel: u32) -> Self {
        Self {
            width,
            height,
            samples_per_pixel,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, sum: Color) {
        self.pixels[(y * self.width + x) as usize] = sum;
    }

    /// Tonemapped RGBA8 bytes, row-major, rows top to bottom.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width * self.height * 4) as usize);
        for sum in &self.pixels {
            bytes.extend_from_slice(&write_color(*sum, self.samples_per_pixel));
        }
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BvhNode, DiffuseLight, Hittable, Lambertian, Sphere, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn single_sphere(material: Arc<dyn crate::Material>) -> BvhNode {
        let objects: Vec<Box<dyn Hittable>> = vec![Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, -3.0),
            1.0,
            material,
        ))];
        BvhNode::new(objects)
    }

    #[test]
    fn depth_zero_is_black() {
        let world = single_sphere(Arc::new(Lambertian::new(Color::splat(0.5))));
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rng = StdRng::seed_from_u64(1);

        let color = ray_color(&ray, &world, 0, Color::ONE, &mut rng);
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn miss_returns_background() {
        let world = single_sphere(Arc::new(Lambertian::new(Color::splat(0.5))));
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::Y);
        let mut rng = StdRng::seed_from_u64(2);

        let background = Color::new(0.7, 0.8, 1.0);
        let color = ray_color(&ray, &world, 10, background, &mut rng);
        assert_eq!(color, background);
    }

    #[test]
    fn emissive_sphere_on_black_background() {
        let emit = Color::new(4.0, 2.0, 1.0);
        let world = single_sphere(Arc::new(DiffuseLight::new(emit)));
        let mut rng = StdRng::seed_from_u64(3);

        // a ray that hits the light reports its emission
        let hit_ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let color = ray_color(&hit_ray, &world, 5, Color::ZERO, &mut rng);
        assert_eq!(color, emit);

        // a ray that misses is exactly black
        let miss_ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        let color = ray_color(&miss_ray, &world, 5, Color::ZERO, &mut rng);
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn grey_world_is_energy_conserving() {
        // sphere of albedo 0.5 under a white background: mean radiance of
        // rays that strike it stays below 1
        let world = single_sphere(Arc::new(Lambertian::new(Color::splat(0.5))));
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rng = StdRng::seed_from_u64(4);

        let samples = 2000;
        let mut mean = Color::ZERO;
        for _ in 0..samples {
            mean += ray_color(&ray, &world, 50, Color::ONE, &mut rng);
        }
        mean /= samples as f32;

        assert!(mean.x > 0.0 && mean.x < 1.0, "mean {mean}");
        assert!((mean.x - mean.y).abs() < 0.05);
    }

    #[test]
    fn depth_exhaustion_drops_the_background_term() {
        // trapped between diffuse spheres, a depth-limited path must not
        // pick up the background
        let grey: Arc<dyn crate::Material> = Arc::new(Lambertian::new(Color::splat(1.0)));
        let objects: Vec<Box<dyn Hittable>> = vec![
            Box::new(Sphere::new(Vec3::ZERO, 5.0, grey.clone())),
        ];
        let world = BvhNode::new(objects);

        // rays from inside always hit the enclosing sphere; depth 3 ends
        // inside, with no emission anywhere, so the result is black
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::X);
        let mut rng = StdRng::seed_from_u64(5);
        let color = ray_color(&ray, &world, 3, Color::ONE, &mut rng);
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn red_sphere_tints_only_red() {
        // unit sphere at the origin, albedo (1, 0, 0), camera ray from
        // (0, 0, 3) through the center: hits at t = 2 with normal +z, and
        // any collected radiance keeps only the red channel
        let world = {
            let objects: Vec<Box<dyn Hittable>> = vec![Box::new(Sphere::new(
                Vec3::ZERO,
                1.0,
                Arc::new(Lambertian::new(Color::new(1.0, 0.0, 0.0)))
                    as Arc<dyn crate::Material>,
            ))];
            BvhNode::new(objects)
        };

        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(world.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert!((rec.t - 2.0).abs() < 1e-6);
        assert!((rec.normal - Vec3::Z).length() < 1e-6);

        let mut rng = StdRng::seed_from_u64(6);
        let mut saw_red = false;
        for _ in 0..50 {
            let color = ray_color(&ray, &world, 10, Color::ONE, &mut rng);
            assert_eq!(color.y, 0.0);
            assert_eq!(color.z, 0.0);
            assert!(color.x < 1.0 + 1e-6);
            if color.x > 0.0 {
                saw_red = true;
            }
        }
        assert!(saw_red);
    }

    #[test]
    fn glass_ball_is_crossed_twice_on_the_way_to_the_ground() {
        // a dielectric ball over a checkered ground: a central ray passes
        // through the ball (entry and exit) before striking the ground
        use crate::{Checker, Quad};

        let glass: Arc<dyn crate::Material> = Arc::new(crate::Dielectric::new(1.5));
        let ground_tex = Checker::from_colors(0.5, Color::ONE, Color::ZERO);
        let ground: Arc<dyn crate::Material> =
            Arc::new(Lambertian::from_texture(Arc::new(ground_tex)));

        let objects: Vec<Box<dyn Hittable>> = vec![
            Box::new(Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.5, glass)),
            Box::new(Quad::new(
                Vec3::new(-50.0, -0.6, -50.0),
                Vec3::new(100.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 100.0),
                ground,
            )),
        ];
        let world = BvhNode::new(objects);

        let mut ground_paths = 0;
        for seed in 0..100u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, -0.15, -1.0));
            let mut sphere_hits = 0;

            for _ in 0..10 {
                let mut rec = HitRecord::default();
                if !world.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec) {
                    break;
                }
                if rec.p.y < -0.59 {
                    // reached the ground: the ball must have been crossed
                    // on the way in and out
                    if sphere_hits >= 2 {
                        ground_paths += 1;
                    }
                    break;
                }
                sphere_hits += 1;
                match rec.material.scatter(&ray, &rec, &mut rng) {
                    Some(scatter) => ray = scatter.scattered,
                    None => break,
                }
            }
        }

        // Fresnel reflection diverts a few paths; refraction dominates
        assert!(ground_paths >= 50, "only {ground_paths} paths refracted through");
    }

    #[test]
    fn write_color_applies_scale_gamma_and_clamp() {
        // sum 0.5 over 2 samples -> 0.25 linear -> 0.5 after gamma -> 128
        let px = write_color(Color::splat(0.5), 2);
        assert_eq!(px, [128, 128, 128, 255]);

        // negative and huge components saturate
        let px = write_color(Color::new(-1.0, 0.0, 100.0), 1);
        assert_eq!(px[0], 0);
        assert_eq!(px[1], 0);
        assert_eq!(px[2], 255);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn image_buffer_roundtrip() {
        let mut image = ImageBuffer::new(2, 2, 1);
        image.set(1, 0, Color::splat(1.0));
        assert_eq!(image.get(1, 0), Color::splat(1.0));

        let rgba = image.to_rgba();
        assert_eq!(rgba.len(), 16);
        // pixel (1, 0) is bytes 4..8: white clamps to 255
        assert_eq!(&rgba[4..8], &[255, 255, 255, 255]);
        // pixel (0, 0) is black with opaque alpha
        assert_eq!(&rgba[0..4], &[0, 0, 0, 255]);
    }
}
