#![allow(dead_code)]
use std::path::{Path, PathBuf};

use image::{DynamicImage, Rgba, RgbaImage};

/// Solid-colour fixture image.
pub fn solid_image(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(rgba))
}

/// Write `image` into `dir` as PNG and return its path.
pub fn write_png(dir: &Path, name: &str, image: &RgbaImage) -> PathBuf {
    let path = dir.join(name);
    image.save(&path).expect("may not fail");
    path
}

/// Write `image` into `dir` as JPEG and return its path.
pub fn write_jpeg(dir: &Path, name: &str, image: &RgbaImage) -> PathBuf {
    let path = dir.join(name);
    // The JPEG encoder takes no alpha channel.
    DynamicImage::ImageRgba8(image.clone())
        .into_rgb8()
        .save(&path)
        .expect("may not fail");
    path
}

/// Write `image` into `dir` as GIF and return its path.
pub fn write_gif(dir: &Path, name: &str, image: &RgbaImage) -> PathBuf {
    let path = dir.join(name);
    image.save(&path).expect("may not fail");
    path
}
