//! Fixtures shared by the unit tests. Everything is synthesized in memory.

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};

use crate::handle::ImageHandle;

/// A deterministic RGBA gradient.
pub fn gradient_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) % 256) as u8,
            255,
        ])
    })
}

pub fn gradient(width: u32, height: u32) -> ImageHandle {
    ImageHandle::from_rgba(gradient_image(width, height))
}

fn encoded(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let image = gradient_image(width, height);
    let mut buffer = Cursor::new(Vec::new());
    match format {
        // The JPEG encoder rejects alpha.
        ImageFormat::Jpeg => image::DynamicImage::ImageRgba8(image)
            .to_rgb8()
            .write_to(&mut buffer, format)
            .unwrap(),
        _ => image.write_to(&mut buffer, format).unwrap(),
    }
    buffer.into_inner()
}

/// PNG-encoded gradient.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encoded(width, height, ImageFormat::Png)
}

/// JPEG-encoded gradient.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encoded(width, height, ImageFormat::Jpeg)
}
