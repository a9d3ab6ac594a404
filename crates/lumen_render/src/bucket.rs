//! Bucket (tile) decomposition and the parallel render driver.
//!
//! The image is cut into square tiles rendered independently on a rayon
//! pool. Tiles are ordered by distance from the image center so the most
//! interesting region appears first in progressive viewers. Each tile owns
//! an RNG seeded from the base seed plus the tile index, which makes the
//! output identical for a fixed seed regardless of thread count.

use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::renderer::{render_pixel, ImageBuffer};
use crate::{Camera, Color, Hittable};

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy)]
pub struct Bucket {
    /// Top-left corner
    pub x: u32,
    pub y: u32,
    /// Extent in pixels
    pub width: u32,
    pub height: u32,
    /// Position in the render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Cut an image into buckets, ordered center-out.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let mut buckets = Vec::new();
    let mut index = 0;

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, index));
            index += 1;
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Order buckets by distance from the image center.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    buckets.sort_by(|a, b| {
        let a_center_x = a.x as f32 + a.width as f32 / 2.0;
        let a_center_y = a.y as f32 + a.height as f32 / 2.0;
        let b_center_x = b.x as f32 + b.width as f32 / 2.0;
        let b_center_y = b.y as f32 + b.height as f32 / 2.0;

        let a_dist = (a_center_x - center_x).powi(2) + (a_center_y - center_y).powi(2);
        let b_dist = (b_center_x - center_x).powi(2) + (b_center_y - center_y).powi(2);

        a_dist.partial_cmp(&b_dist).unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Result of rendering one bucket: radiance sums in row-major order.
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    pub pixels: Vec<Color>,
}

/// Render a single bucket with the given RNG stream.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    world: &dyn Hittable,
    rng: &mut StdRng,
) -> Vec<Color> {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let sum = render_pixel(camera, world, bucket.x + local_x, bucket.y + local_y, rng);
            pixels.push(sum);
        }
    }

    pixels
}

/// Render the whole image in parallel over buckets.
///
/// The camera must already be initialized. Every bucket draws from its own
/// `StdRng` seeded with `seed + bucket.index`.
pub fn render(camera: &Camera, world: &dyn Hittable, seed: u64) -> ImageBuffer {
    let width = camera.image_width;
    let height = camera.image_height();
    let buckets = generate_buckets(width, height, DEFAULT_BUCKET_SIZE);

    log::info!(
        "rendering {}x{} at {} spp, depth {}: {} buckets on {} threads",
        width,
        height,
        camera.samples_per_pixel,
        camera.max_depth,
        buckets.len(),
        rayon::current_num_threads()
    );

    let start = std::time::Instant::now();
    let progress = ProgressBar::new(buckets.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40} {pos}/{len} buckets ETA: {eta}")
            .expect("static template"),
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(bucket.index as u64));
            let pixels = render_bucket(bucket, camera, world, &mut rng);
            progress.inc(1);
            BucketResult {
                bucket: *bucket,
                pixels,
            }
        })
        .collect();

    progress.finish_and_clear();
    log::info!("render finished in {:.2?}", start.elapsed());

    let mut image = ImageBuffer::new(width, height, camera.samples_per_pixel);
    for result in results {
        let bucket = result.bucket;
        for local_y in 0..bucket.height {
            for local_x in 0..bucket.width {
                let sum = result.pixels[(local_y * bucket.width + local_x) as usize];
                image.set(bucket.x + local_x, bucket.y + local_y, sum);
            }
        }
    }

    image
}
