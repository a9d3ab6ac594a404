//! Named scene builders.
//!
//! Each builder returns a world list plus a camera tuned for it; the CLI
//! overrides resolution and quality afterwards. Scenes that depend on asset
//! files (textures, meshes) degrade to placeholder geometry when loading
//! fails, so a missing file never aborts a render.

use std::f32::consts::PI;
use std::sync::Arc;

use lumen_core::{load_stl, ImageData};
use lumen_render::{
    make_box, BvhNode, Camera, Checker, Color, Dielectric, DiffuseLight, HittableList,
    ImageTexture, Lambertian, Material, Metal, Quad, Rotate, Sphere, Translate, Triangle, Vec3,
};
use rand::rngs::StdRng;
use rand::Rng;

/// Available scene names, as accepted by [`build`].
pub const SCENES: &[&str] = &[
    "random-spheres",
    "quads",
    "boxes",
    "crystals",
    "planet",
    "mesh",
];

/// Build a scene by name. Returns None for unknown names.
pub fn build(name: &str, rng: &mut StdRng) -> Option<(HittableList, Camera)> {
    match name {
        "random-spheres" => Some(random_spheres(rng)),
        "quads" => Some(quads()),
        "boxes" => Some(boxes()),
        "crystals" => Some(crystal_cave(rng)),
        "planet" => Some(planet()),
        "mesh" => Some(mesh()),
        _ => None,
    }
}

/// The classic cover scene: a checkered ground, three hero spheres, and a
/// grid of small random ones.
fn random_spheres(rng: &mut StdRng) -> (HittableList, Camera) {
    let mut world = HittableList::new();

    let checker = Checker::from_colors(0.6, Color::new(0.2, 0.3, 0.1), Color::new(0.9, 0.9, 0.9));
    let ground: Arc<dyn Material> = Arc::new(Lambertian::from_texture(Arc::new(checker)));
    world.add(Box::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        ground,
    )));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat: f32 = rng.gen();
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let material: Arc<dyn Material> = if choose_mat < 0.8 {
                let albedo = Color::new(
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                );
                Arc::new(Lambertian::new(albedo))
            } else if choose_mat < 0.95 {
                let albedo = Color::new(
                    0.5 + 0.5 * rng.gen::<f32>(),
                    0.5 + 0.5 * rng.gen::<f32>(),
                    0.5 + 0.5 * rng.gen::<f32>(),
                );
                Arc::new(Metal::new(albedo, 0.5 * rng.gen::<f32>()))
            } else {
                Arc::new(Dielectric::new(1.5))
            };

            world.add(Box::new(Sphere::new(center, 0.2, material)));
        }
    }

    world.add(Box::new(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    world.add(Box::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    )));
    world.add(Box::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    let camera = Camera::new()
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.6, 10.0)
        .with_background(Color::new(0.7, 0.8, 1.0));

    (world, camera)
}

/// Five colored quads facing the camera.
fn quads() -> (HittableList, Camera) {
    let mut world = HittableList::new();

    let left_red: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(1.0, 0.2, 0.2)));
    let back_green: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.2, 1.0, 0.2)));
    let right_blue: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.2, 0.2, 1.0)));
    let upper_orange: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(1.0, 0.5, 0.0)));
    let lower_teal: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.2, 0.8, 0.8)));

    world.add(Box::new(Quad::new(
        Vec3::new(-3.0, -2.0, 5.0),
        Vec3::new(0.0, 0.0, -4.0),
        Vec3::new(0.0, 4.0, 0.0),
        left_red,
    )));
    world.add(Box::new(Quad::new(
        Vec3::new(-2.0, -2.0, 0.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 4.0, 0.0),
        back_green,
    )));
    world.add(Box::new(Quad::new(
        Vec3::new(3.0, -2.0, 1.0),
        Vec3::new(0.0, 0.0, 4.0),
        Vec3::new(0.0, 4.0, 0.0),
        right_blue,
    )));
    world.add(Box::new(Quad::new(
        Vec3::new(-2.0, 3.0, 1.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 4.0),
        upper_orange,
    )));
    world.add(Box::new(Quad::new(
        Vec3::new(-2.0, -3.0, 5.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -4.0),
        lower_teal,
    )));

    let camera = Camera::new()
        .with_position(Vec3::new(0.0, 0.0, 9.0), Vec3::ZERO, Vec3::Y)
        .with_lens(80.0, 0.0, 10.0)
        .with_background(Color::new(0.7, 0.8, 1.0));

    (world, camera)
}

/// Cornell box with two rotated boxes under an area light.
fn boxes() -> (HittableList, Camera) {
    let mut world = HittableList::new();

    let red: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.65, 0.05, 0.05)));
    let white: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.73, 0.73, 0.73)));
    let green: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.12, 0.45, 0.15)));
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(15.0)));

    world.add(Box::new(Quad::new(
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        green,
    )));
    world.add(Box::new(Quad::new(
        Vec3::ZERO,
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        red,
    )));
    world.add(Box::new(Quad::new(
        Vec3::new(343.0, 554.0, 332.0),
        Vec3::new(-130.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -105.0),
        light,
    )));
    world.add(Box::new(Quad::new(
        Vec3::ZERO,
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        white.clone(),
    )));
    world.add(Box::new(Quad::new(
        Vec3::new(555.0, 555.0, 555.0),
        Vec3::new(-555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -555.0),
        white.clone(),
    )));
    world.add(Box::new(Quad::new(
        Vec3::new(0.0, 0.0, 555.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        white.clone(),
    )));

    let tall = make_box(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), white.clone());
    let tall = Rotate::around_y(Box::new(tall), 15.0);
    let tall = Translate::new(Box::new(tall), Vec3::new(265.0, 0.0, 295.0));
    world.add(Box::new(tall));

    let short = make_box(Vec3::ZERO, Vec3::new(165.0, 165.0, 165.0), white);
    let short = Rotate::around_y(Box::new(short), -18.0);
    let short = Translate::new(Box::new(short), Vec3::new(130.0, 0.0, 65.0));
    world.add(Box::new(short));

    let camera = Camera::new()
        .with_position(
            Vec3::new(278.0, 278.0, -800.0),
            Vec3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        )
        .with_lens(40.0, 0.0, 10.0)
        .with_background(Color::ZERO);

    (world, camera)
}

/// A dark cave of glowing, refractive, and metallic crystal pyramids.
fn crystal_cave(rng: &mut StdRng) -> (HittableList, Camera) {
    let mut world = HittableList::new();

    let floor: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.05, 0.05, 0.06)));
    world.add(Box::new(Quad::new(
        Vec3::new(-20.0, 0.0, -20.0),
        Vec3::new(40.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 40.0),
        floor,
    )));

    let ceiling: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.03, 0.03, 0.04)));
    world.add(Box::new(Quad::new(
        Vec3::new(-20.0, 12.0, -20.0),
        Vec3::new(40.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 40.0),
        ceiling,
    )));

    let back: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.04, 0.04, 0.05)));
    world.add(Box::new(Quad::new(
        Vec3::new(-20.0, 0.0, -10.0),
        Vec3::new(40.0, 0.0, 0.0),
        Vec3::new(0.0, 12.0, 0.0),
        back,
    )));

    let glow_colors = [
        Color::new(0.8, 0.2, 1.0),
        Color::new(0.2, 0.8, 1.0),
        Color::new(1.0, 0.3, 0.5),
        Color::new(0.3, 1.0, 0.5),
        Color::new(0.4, 0.4, 1.0),
    ];

    let crystal_positions = [
        Vec3::new(-4.0, 0.0, 2.0),
        Vec3::new(3.0, 0.0, 0.0),
        Vec3::new(-1.0, 0.0, -3.0),
        Vec3::new(5.0, 0.0, 4.0),
        Vec3::new(-6.0, 0.0, -2.0),
        Vec3::new(0.5, 0.0, 5.0),
        Vec3::new(-3.0, 0.0, 6.0),
    ];

    for (i, pos) in crystal_positions.iter().enumerate() {
        let height = 1.5 + rng.gen::<f32>() * 2.5;
        let base_size = 0.3 + rng.gen::<f32>() * 0.4;
        let glow_intensity = 2.0 + rng.gen::<f32>() * 3.0;

        let glow: Arc<dyn Material> = Arc::new(DiffuseLight::new(
            glow_colors[i % glow_colors.len()] * glow_intensity,
        ));
        add_crystal(&mut world, *pos, height, base_size, glow);
    }

    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(2.4));
    for pos in [
        Vec3::new(1.0, 0.0, 2.0),
        Vec3::new(-2.0, 0.0, 4.0),
        Vec3::new(4.0, 0.0, -1.0),
    ] {
        let height = 2.0 + rng.gen::<f32>() * 1.5;
        let base_size = 0.4 + rng.gen::<f32>() * 0.3;
        add_crystal(&mut world, pos, height, base_size, glass.clone());
    }

    // stalactites hang from the ceiling, tip down
    let stalactite_positions = [
        Vec3::new(-2.0, 12.0, 1.0),
        Vec3::new(2.0, 12.0, -2.0),
        Vec3::new(0.0, 12.0, 3.0),
        Vec3::new(-4.0, 12.0, -1.0),
        Vec3::new(4.0, 12.0, 2.0),
    ];

    for (i, pos) in stalactite_positions.iter().enumerate() {
        let height = 1.0 + rng.gen::<f32>() * 2.0;
        let base_size = 0.2 + rng.gen::<f32>() * 0.25;
        let glow_intensity = 1.5 + rng.gen::<f32>() * 2.0;

        let glow: Arc<dyn Material> = Arc::new(DiffuseLight::new(
            glow_colors[(i + 2) % glow_colors.len()] * glow_intensity,
        ));
        add_crystal(&mut world, *pos, -height, base_size, glow);
    }

    let metal: Arc<dyn Material> = Arc::new(Metal::new(Color::new(0.7, 0.7, 0.8), 0.1));
    add_crystal(&mut world, Vec3::new(6.0, 0.0, 1.0), 1.8, 0.35, metal.clone());
    add_crystal(&mut world, Vec3::new(-5.0, 0.0, 3.0), 1.5, 0.3, metal);

    let orb: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    world.add(Box::new(Sphere::new(
        Vec3::new(-1.0, 0.5, 7.0),
        0.5,
        orb.clone(),
    )));
    world.add(Box::new(Sphere::new(Vec3::new(2.0, 0.4, 6.0), 0.4, orb)));

    let camera = Camera::new()
        .with_position(Vec3::new(0.0, 3.0, 12.0), Vec3::new(0.0, 2.0, 0.0), Vec3::Y)
        .with_lens(60.0, 0.0, 10.0)
        .with_background(Color::new(0.04, 0.04, 0.06));

    (world, camera)
}

/// A hexagonal pyramid of triangles; a negative height hangs it downward.
fn add_crystal(
    world: &mut HittableList,
    base: Vec3,
    height: f32,
    base_size: f32,
    material: Arc<dyn Material>,
) {
    let tip = base + Vec3::new(0.0, height, 0.0);

    let corners: Vec<Vec3> = (0..6)
        .map(|i| {
            let angle = i as f32 * PI / 3.0;
            base + Vec3::new(base_size * angle.cos(), 0.0, base_size * angle.sin())
        })
        .collect();

    for i in 0..6 {
        let next = (i + 1) % 6;
        world.add(Box::new(Triangle::new(
            corners[i],
            corners[next],
            tip,
            material.clone(),
        )));
        world.add(Box::new(Triangle::new(
            corners[i],
            base,
            corners[next],
            material.clone(),
        )));
    }
}

/// Image-textured planet and moon lit by a distant sun.
fn planet() -> (HittableList, Camera) {
    let mut world = HittableList::new();

    let earth = ImageData::from_file("assets/earthmap.jpg");
    let moon = ImageData::from_file("assets/moon.jpg");

    match (earth, moon) {
        (Ok(earth), Ok(moon)) => {
            let earth_surface: Arc<dyn Material> = Arc::new(Lambertian::from_texture(Arc::new(
                ImageTexture::new(Arc::new(earth)),
            )));
            let moon_surface: Arc<dyn Material> = Arc::new(Lambertian::from_texture(Arc::new(
                ImageTexture::new(Arc::new(moon)),
            )));

            world.add(Box::new(Sphere::new(
                Vec3::new(0.0, -10.0, 0.0),
                8.0,
                earth_surface,
            )));
            world.add(Box::new(Sphere::new(
                Vec3::new(0.0, 6.0, -5.0),
                2.0,
                moon_surface,
            )));
        }
        (earth, moon) => {
            for err in [earth.err(), moon.err()].into_iter().flatten() {
                log::warn!("planet texture unavailable, using flat colors: {err}");
            }
            world.add(Box::new(Sphere::new(
                Vec3::new(0.0, -10.0, 0.0),
                8.0,
                Arc::new(Lambertian::new(Color::new(0.1, 0.3, 0.8))),
            )));
            world.add(Box::new(Sphere::new(
                Vec3::new(0.0, 6.0, -5.0),
                2.0,
                Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5))),
            )));
        }
    }

    let sun: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(18.0)));
    world.add(Box::new(Sphere::new(
        Vec3::new(1400.0, 1600.0, 3400.0),
        2000.0,
        sun,
    )));

    let camera = Camera::new()
        .with_position(Vec3::new(14.0, 12.0, -5.0), Vec3::new(0.0, -2.0, 0.0), Vec3::Y)
        .with_lens(68.0, 0.0, 10.0)
        .with_background(Color::new(0.0, 0.0, 0.0085));

    (world, camera)
}

/// An STL model standing on a ground sphere; a green stand-in sphere takes
/// its place when the file is missing or malformed.
fn mesh() -> (HittableList, Camera) {
    let mut world = HittableList::new();

    let model_material: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.2, 0.5, 0.2)));

    match load_stl("assets/model.stl", 0.5) {
        Ok(model) => {
            log::info!("loaded mesh with {} triangles", model.triangle_count());

            let mut triangles: Vec<Box<dyn lumen_render::Hittable>> = Vec::new();
            for [a, b, c] in model.triangles() {
                triangles.push(Box::new(Triangle::new(a, b, c, model_material.clone())));
            }

            // the mesh gets its own BVH, then is posed in world space
            let model_bvh = BvhNode::new(triangles);
            let posed = Rotate::around_z(Box::new(model_bvh), 20.0);
            let posed = Rotate::around_x(Box::new(posed), -270.0);
            let posed = Translate::new(Box::new(posed), Vec3::new(0.0, 2.0, 0.0));
            world.add(Box::new(posed));
        }
        Err(err) => {
            log::warn!("mesh unavailable, using placeholder sphere: {err}");
            world.add(Box::new(Sphere::new(
                Vec3::new(0.0, 5.0, 0.0),
                5.0,
                model_material,
            )));
        }
    }

    let ground: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.3, 0.3, 0.6)));
    world.add(Box::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        ground,
    )));

    let sun: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(10.0)));
    world.add(Box::new(Sphere::new(
        Vec3::new(50.0, 100.0, 50.0),
        10.0,
        sun,
    )));

    let camera = Camera::new()
        .with_position(Vec3::new(20.0, 20.0, 40.0), Vec3::new(0.0, 5.0, 0.0), Vec3::Y)
        .with_lens(40.0, 0.6, 10.0)
        .with_background(Color::new(0.7, 0.8, 1.0));

    (world, camera)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn every_scene_builds() {
        for name in SCENES {
            let mut rng = StdRng::seed_from_u64(1);
            let (world, _camera) = build(name, &mut rng).expect(name);
            assert!(!world.is_empty(), "{name} built an empty world");
        }
    }

    #[test]
    fn unknown_scene_is_none() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(build("no-such-scene", &mut rng).is_none());
    }

    #[test]
    fn scene_build_is_deterministic_for_a_seed() {
        let mut a = StdRng::seed_from_u64(9);
        let mut b = StdRng::seed_from_u64(9);
        let (world_a, _) = build("random-spheres", &mut a).unwrap();
        let (world_b, _) = build("random-spheres", &mut b).unwrap();
        assert_eq!(world_a.len(), world_b.len());
    }
}
