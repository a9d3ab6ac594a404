use anyhow::{anyhow, Result};
use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use lumen_render::{render, BvhNode};

mod cli;
mod output;
mod scenes;

use cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.clone().into())
        .init();

    if args.list_scenes {
        for name in scenes::SCENES {
            println!("{name}");
        }
        return Ok(());
    }

    let mut scene_rng = StdRng::seed_from_u64(args.seed);
    let (world, camera) = scenes::build(&args.scene, &mut scene_rng).ok_or_else(|| {
        anyhow!(
            "unknown scene {:?}; try one of: {}",
            args.scene,
            scenes::SCENES.join(", ")
        )
    })?;

    info!("scene {:?}: {} objects", args.scene, world.len());

    let mut camera = camera
        .with_image(args.width, args.width as f32 / args.height as f32)
        .with_quality(args.samples_per_pixel, args.max_depth);
    camera.initialize();

    let build_start = std::time::Instant::now();
    let world = BvhNode::new(world.into_objects());
    info!("BVH built in {:.2?}", build_start.elapsed());

    let image = render(&camera, &world, args.seed);

    output::save_image(&image, &args.output)
}
