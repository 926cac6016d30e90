//! Input-type sniffing and the format-keyed codec dispatch.

use std::io::Cursor;

use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ColorType, DynamicImage, ImageEncoder, RgbaImage};

use crate::error::OverlayError;

/// MIME types accepted by default.
pub const WHITE_LIST: [&str; 4] = ["image/jpg", "image/jpeg", "image/gif", "image/png"];

/// Re-encoded JPEG output keeps full quality.
const JPEG_QUALITY: u8 = 100;

/// The decoded-from format of an input, which is also its re-encode target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
    Gif,
}

impl SourceFormat {
    /// Canonical MIME type for this format.
    pub fn mime(&self) -> &'static str {
        match self {
            SourceFormat::Jpeg => "image/jpeg",
            SourceFormat::Png => "image/png",
            SourceFormat::Gif => "image/gif",
        }
    }

    /// Sniff the MIME type of raw file bytes from their magic numbers.
    ///
    /// Anything unrecognised sniffs as `application/octet-stream`, which no
    /// whitelist accepts.
    pub fn sniff_mime(bytes: &[u8]) -> &'static str {
        match image::guess_format(bytes) {
            Ok(image::ImageFormat::Jpeg) => "image/jpeg",
            Ok(image::ImageFormat::Png) => "image/png",
            Ok(image::ImageFormat::Gif) => "image/gif",
            Ok(image::ImageFormat::WebP) => "image/webp",
            Ok(image::ImageFormat::Bmp) => "image/bmp",
            Ok(image::ImageFormat::Tiff) => "image/tiff",
            Ok(image::ImageFormat::Ico) => "image/x-icon",
            Ok(_) | Err(_) => "application/octet-stream",
        }
    }

    /// Map a whitelisted MIME type to its decoder format.
    ///
    /// A type that passes a caller-widened whitelist but matches no known
    /// decoder falls back to JPEG. Historical dispatch behaviour; do not rely
    /// on it.
    pub fn from_mime(mime: &str) -> SourceFormat {
        match mime {
            "image/jpg" | "image/jpeg" => SourceFormat::Jpeg,
            "image/png" => SourceFormat::Png,
            "image/gif" => SourceFormat::Gif,
            _ => SourceFormat::Jpeg,
        }
    }

    /// Decode raw bytes with this format's decoder.
    pub fn decode(&self, bytes: &[u8]) -> Result<RgbaImage, OverlayError> {
        let reader = Cursor::new(bytes);
        let image = match self {
            SourceFormat::Jpeg => image::load(reader, image::ImageFormat::Jpeg)?,
            SourceFormat::Png => image::load(reader, image::ImageFormat::Png)?,
            SourceFormat::Gif => image::load(reader, image::ImageFormat::Gif)?,
        };
        Ok(image.into_rgba8())
    }

    /// Encode the composited buffer with this format's encoder.
    pub fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, OverlayError> {
        let mut out = Vec::new();
        match self {
            SourceFormat::Jpeg => {
                // JPEG carries no alpha channel.
                let rgb = DynamicImage::ImageRgba8(image.clone()).into_rgb8();
                JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY).encode(
                    rgb.as_raw(),
                    rgb.width(),
                    rgb.height(),
                    ColorType::Rgb8,
                )?;
            }
            SourceFormat::Png => {
                PngEncoder::new(&mut out).write_image(
                    image.as_raw(),
                    image.width(),
                    image.height(),
                    ColorType::Rgba8,
                )?;
            }
            SourceFormat::Gif => {
                GifEncoder::new(&mut out).encode(
                    image.as_raw(),
                    image.width(),
                    image.height(),
                    ColorType::Rgba8,
                )?;
            }
        }
        Ok(out)
    }
}
