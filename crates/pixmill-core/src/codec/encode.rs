//! Encoding a handle back to bytes.
//!
//! The handle's `format` selects the codec and its `quality` is passed to
//! codecs that use one. Embedded profiles and metadata are never written and
//! are stripped from the handle by every successful encode.

use std::io::Cursor;

use image::buffer::ConvertBuffer;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, ImageFormat, RgbImage, RgbaImage};

use crate::error::ImageError;
use crate::handle::ImageHandle;

/// Resolve a format name such as `"PNG"` or `"jpg"` (case-insensitive).
pub fn resolve_format(name: &str) -> Option<ImageFormat> {
    ImageFormat::from_extension(name.trim().to_ascii_lowercase())
}

/// Encode `handle` using its current format and quality.
pub fn encode(handle: &mut ImageHandle) -> Result<Vec<u8>, ImageError> {
    handle.encode()
}

impl ImageHandle {
    /// Serialize the image to a new byte buffer.
    ///
    /// On success, strips any embedded profile from the pixel resource and
    /// records the target format as its codec selection. On failure the
    /// handle is left as it was.
    ///
    /// # Errors
    ///
    /// - `ImageError::InvalidHandle` if the handle has no pixels
    /// - `ImageError::InvalidState` if no (non-empty) format was set
    /// - `ImageError::Encode` if the format is unknown or the codec fails
    pub fn encode(&mut self) -> Result<Vec<u8>, ImageError> {
        self.pixels()?;
        let name = match self.format() {
            Some(name) if !name.trim().is_empty() => name.to_owned(),
            _ => return Err(ImageError::InvalidState),
        };
        let format = resolve_format(&name)
            .ok_or_else(|| ImageError::Encode(format!("no encode delegate for format {}", name)))?;
        let quality = self.quality();

        // The codecs never read profiles, so they are dropped only once the
        // bytes exist and a failed encode leaves the handle untouched.
        let image = self.pixels()?.image();
        let result = match format {
            ImageFormat::Jpeg => encode_jpeg(image, quality),
            ImageFormat::Png => encode_png(image, quality),
            _ => encode_generic(image, format),
        };

        match result {
            Ok(bytes) => {
                log::debug!(
                    "encoded {}x{} as {:?} (quality {}): {} bytes",
                    image.width(),
                    image.height(),
                    format,
                    quality,
                    bytes.len()
                );
                let pixels = self.pixels_mut()?;
                pixels.strip();
                pixels.set_magick(format);
                Ok(bytes)
            }
            Err(err) => {
                log::warn!("encoding as {:?} failed: {}", format, err);
                Err(ImageError::Encode(err.to_string()))
            }
        }
    }
}

/// JPEG has no alpha channel; it is dropped.
fn encode_jpeg(image: &RgbaImage, quality: i32) -> image::ImageResult<Vec<u8>> {
    let rgb: RgbImage = image.convert();
    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100) as u8);
    encoder.write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)?;
    Ok(buffer.into_inner())
}

/// PNG quality: the tens digit picks the compression effort, the ones digit
/// the row filter.
fn encode_png(image: &RgbaImage, quality: i32) -> image::ImageResult<Vec<u8>> {
    let (compression, filter) = png_settings(quality);
    let mut buffer = Cursor::new(Vec::new());
    let encoder = PngEncoder::new_with_quality(&mut buffer, compression, filter);
    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(buffer.into_inner())
}

fn png_settings(quality: i32) -> (CompressionType, PngFilter) {
    let quality = quality.clamp(0, 100);
    let compression = match quality / 10 {
        0..=3 => CompressionType::Fast,
        4..=7 => CompressionType::Default,
        _ => CompressionType::Best,
    };
    let filter = match quality % 10 {
        0 => PngFilter::NoFilter,
        1 => PngFilter::Sub,
        2 => PngFilter::Up,
        3 => PngFilter::Avg,
        4 => PngFilter::Paeth,
        _ => PngFilter::Adaptive,
    };
    (compression, filter)
}

fn encode_generic(image: &RgbaImage, format: ImageFormat) -> image::ImageResult<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, format)?;
    Ok(buffer.into_inner())
}
