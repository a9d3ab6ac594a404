//! Image file output: PNG (via the image crate) or plain-text PPM.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use lumen_render::ImageBuffer;

/// Save the rendered image, picking the format from the file extension
/// (`.ppm` writes P3 text; anything else goes through the image crate).
pub fn save_image(image: &ImageBuffer, path: &str) -> Result<()> {
    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    if extension == "ppm" {
        save_ppm(image, path)
    } else {
        save_png(image, path)
    }
}

fn save_png(image: &ImageBuffer, path: &str) -> Result<()> {
    let rgba = image::RgbaImage::from_raw(image.width, image.height, image.to_rgba())
        .context("render buffer does not match image dimensions")?;
    rgba.save(path)
        .with_context(|| format!("failed to write {path}"))?;

    log::info!("wrote {} ({}x{})", path, image.width, image.height);
    Ok(())
}

fn save_ppm(image: &ImageBuffer, path: &str) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {path}"))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    let rgba = image.to_rgba();
    for pixel in rgba.chunks_exact(4) {
        writeln!(writer, "{} {} {}", pixel[0], pixel[1], pixel[2])?;
    }

    log::info!("wrote {} ({}x{})", path, image.width, image.height);
    Ok(())
}
