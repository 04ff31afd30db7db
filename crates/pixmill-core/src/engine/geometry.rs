//! Canvas geometry primitives: chop, crop, extent and the two mirrors.
//!
//! # Coordinate System
//!
//! - Origin is the top-left pixel
//! - `x`/`y` may be negative; `width`/`height` are pixel counts
//! - Geometry is clipped against the image; what happens outside is defined
//!   per primitive below

use image::imageops;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use super::{check_target, EngineError, Pixels};

/// A pixel region used by chop, crop and extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rectangle {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Clip against a `width` x `height` image.
    ///
    /// Returns `(left, top, right, bottom)` with exclusive right/bottom edges,
    /// or `None` if the intersection is empty.
    pub fn intersect(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let (x, y) = (self.x as i64, self.y as i64);
        let left = x.max(0);
        let top = y.max(0);
        let right = (x + self.width as i64).min(width as i64);
        let bottom = (y + self.height as i64).min(height as i64);

        if right <= left || bottom <= top {
            return None;
        }
        Some((left as u32, top as u32, right as u32, bottom as u32))
    }
}

/// Extract the part of `rect` that lies inside the image.
///
/// Fails if the rectangle does not overlap the image at all.
pub fn crop(src: &Pixels, rect: &Rectangle) -> Result<Pixels, EngineError> {
    let (left, top, right, bottom) = rect
        .intersect(src.width(), src.height())
        .ok_or_else(|| EngineError::new("geometry does not contain image"))?;

    let region = imageops::crop_imm(src.image(), left, top, right - left, bottom - top);
    Ok(src.derive(region.to_image()))
}

/// Remove the columns and rows covered by `rect`, closing the gap.
///
/// The result is `width - rect.width` by `height - rect.height` once the
/// rectangle is clipped to the image.
pub fn chop(src: &Pixels, rect: &Rectangle) -> Result<Pixels, EngineError> {
    let (width, height) = (src.width() as i64, src.height() as i64);
    let (x, y) = (rect.x as i64, rect.y as i64);
    if x >= width || y >= height || x + rect.width as i64 <= 0 || y + rect.height as i64 <= 0 {
        return Err(EngineError::new("geometry does not contain image"));
    }

    let chopped = |index: i64, start: i64, len: u32| index >= start && index < start + len as i64;
    let columns: Vec<u32> = (0..width)
        .filter(|&c| !chopped(c, x, rect.width))
        .map(|c| c as u32)
        .collect();
    let rows: Vec<u32> = (0..height)
        .filter(|&r| !chopped(r, y, rect.height))
        .map(|r| r as u32)
        .collect();

    if columns.is_empty() || rows.is_empty() {
        return Err(EngineError::new("chop would remove the entire image"));
    }

    let image = src.image();
    let output = RgbaImage::from_fn(columns.len() as u32, rows.len() as u32, |cx, cy| {
        *image.get_pixel(columns[cx as usize], rows[cy as usize])
    });
    Ok(src.derive(output))
}

/// Resize the canvas to `rect.width` x `rect.height` without resampling.
///
/// The new canvas shows the window of the source that starts at
/// (`rect.x`, `rect.y`); uncovered area is filled with the configured
/// background. Existing pixels are composited over the background.
pub fn extent(src: &Pixels, rect: &Rectangle) -> Result<Pixels, EngineError> {
    check_target(rect.width, rect.height)?;

    let background = crate::config::config().background;
    let mut canvas = RgbaImage::from_pixel(rect.width, rect.height, background);
    imageops::overlay(&mut canvas, src.image(), -(rect.x as i64), -(rect.y as i64));
    Ok(src.derive(canvas))
}

/// Mirror top to bottom.
pub fn flip(src: &Pixels) -> Result<Pixels, EngineError> {
    Ok(src.derive(imageops::flip_vertical(src.image())))
}

/// Mirror left to right.
pub fn flop(src: &Pixels) -> Result<Pixels, EngineError> {
    Ok(src.derive(imageops::flip_horizontal(src.image())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// Create a test image where each pixel encodes its position.
    fn test_image(width: u32, height: u32) -> Pixels {
        Pixels::new(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([x as u8, y as u8, 0, 255])
        }))
    }

    #[test]
    fn test_intersect_inside() {
        let rect = Rectangle::new(2, 3, 4, 5);
        assert_eq!(rect.intersect(10, 10), Some((2, 3, 6, 8)));
    }

    #[test]
    fn test_intersect_clips_negative_origin() {
        let rect = Rectangle::new(-2, -2, 5, 5);
        assert_eq!(rect.intersect(10, 10), Some((0, 0, 3, 3)));
    }

    #[test]
    fn test_intersect_outside() {
        assert_eq!(Rectangle::new(10, 0, 5, 5).intersect(10, 10), None);
        assert_eq!(Rectangle::new(0, 0, 0, 5).intersect(10, 10), None);
    }

    #[test]
    fn test_crop_inside_bounds() {
        let result = crop(&test_image(20, 10), &Rectangle::new(5, 2, 8, 4)).unwrap();
        assert_eq!((result.width(), result.height()), (8, 4));
        assert_eq!(result.image().get_pixel(0, 0).0, [5, 2, 0, 255]);
        assert_eq!(result.image().get_pixel(7, 3).0, [12, 5, 0, 255]);
    }

    #[test]
    fn test_crop_clipped_to_image() {
        let result = crop(&test_image(10, 10), &Rectangle::new(6, 6, 10, 10)).unwrap();
        assert_eq!((result.width(), result.height()), (4, 4));
    }

    #[test]
    fn test_crop_outside_fails() {
        assert!(crop(&test_image(10, 10), &Rectangle::new(20, 20, 5, 5)).is_err());
    }

    #[test]
    fn test_chop_removes_strips() {
        let result = chop(&test_image(10, 8), &Rectangle::new(2, 1, 3, 2)).unwrap();
        assert_eq!((result.width(), result.height()), (7, 6));
        // Column 2 is gone, so output column 2 is source column 5.
        assert_eq!(result.image().get_pixel(2, 0).0, [5, 0, 0, 255]);
        // Row 1 is gone, so output row 1 is source row 3.
        assert_eq!(result.image().get_pixel(0, 1).0, [0, 3, 0, 255]);
    }

    #[test]
    fn test_chop_zero_width_removes_rows_only() {
        let result = chop(&test_image(10, 8), &Rectangle::new(0, 0, 0, 3)).unwrap();
        assert_eq!((result.width(), result.height()), (10, 5));
    }

    #[test]
    fn test_chop_outside_fails() {
        assert!(chop(&test_image(10, 8), &Rectangle::new(10, 0, 2, 2)).is_err());
        assert!(chop(&test_image(10, 8), &Rectangle::new(-5, 0, 5, 2)).is_err());
    }

    #[test]
    fn test_chop_everything_fails() {
        assert!(chop(&test_image(4, 4), &Rectangle::new(0, 0, 4, 1)).is_err());
    }

    #[test]
    fn test_extent_grows_canvas() {
        let result = extent(&test_image(4, 4), &Rectangle::new(0, 0, 8, 6)).unwrap();
        assert_eq!((result.width(), result.height()), (8, 6));
        assert_eq!(result.image().get_pixel(3, 3).0, [3, 3, 0, 255]);
        assert_eq!(result.image().get_pixel(7, 5).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_extent_offset_is_a_window() {
        let result = extent(&test_image(10, 10), &Rectangle::new(2, 3, 4, 4)).unwrap();
        assert_eq!(result.image().get_pixel(0, 0).0, [2, 3, 0, 255]);
    }

    #[test]
    fn test_extent_zero_fails() {
        assert!(extent(&test_image(4, 4), &Rectangle::new(0, 0, 0, 4)).is_err());
    }

    #[test]
    fn test_flip_and_flop() {
        let src = test_image(3, 2);
        let flipped = flip(&src).unwrap();
        assert_eq!(flipped.image().get_pixel(0, 0).0, [0, 1, 0, 255]);
        let flopped = flop(&src).unwrap();
        assert_eq!(flopped.image().get_pixel(0, 0).0, [2, 0, 0, 255]);
    }
}
