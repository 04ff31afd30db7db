//! Affine warps: arbitrary matrix, rotation and shear.
//!
//! # Algorithm
//!
//! The warp uses inverse mapping: the four source corners are transformed to
//! find the output bounding box, then for each output pixel we invert the
//! matrix to find the source position and sample it bilinearly.
//!
//! ```text
//! x' = sx * x + ry * y + tx
//! y' = rx * x + sy * y + ty
//! ```
//!
//! The output canvas always contains the whole transformed image (no
//! clipping); uncovered area is filled with the configured background.

use image::imageops;
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use super::{check_target, EngineError, Pixels};

/// Tolerance used for angle fast paths and singular matrices.
const EPSILON: f64 = 1e-9;

/// Coefficients of a 2D affine transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineMatrix {
    pub sx: f64,
    pub rx: f64,
    pub ry: f64,
    pub sy: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for AffineMatrix {
    /// The identity transform.
    fn default() -> Self {
        Self {
            sx: 1.0,
            rx: 0.0,
            ry: 0.0,
            sy: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }
}

impl AffineMatrix {
    /// Clockwise rotation by `degrees` (image y axis points down).
    pub fn rotation(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            sx: cos,
            rx: sin,
            ry: -sin,
            sy: cos,
            ..Default::default()
        }
    }

    /// Horizontal shear by `x_shear` degrees followed by vertical shear by
    /// `y_shear` degrees.
    pub fn shear(x_shear: f64, y_shear: f64) -> Self {
        let tan_x = x_shear.to_radians().tan();
        let tan_y = y_shear.to_radians().tan();
        Self {
            sx: 1.0,
            rx: tan_y,
            ry: tan_x,
            sy: 1.0 + tan_x * tan_y,
            ..Default::default()
        }
    }

    pub fn determinant(&self) -> f64 {
        self.sx * self.sy - self.rx * self.ry
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    #[inline]
    fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.sx * x + self.ry * y + self.tx,
            self.rx * x + self.sy * y + self.ty,
        )
    }
}

/// Apply `matrix` to the image.
pub fn affine_transform(src: &Pixels, matrix: &AffineMatrix) -> Result<Pixels, EngineError> {
    if matrix.is_identity() {
        return Ok(src.derive(src.image().clone()));
    }
    warp(src, matrix)
}

/// Rotate clockwise by `degrees`, expanding the canvas to fit.
///
/// Multiples of 90 degrees are exact pixel permutations.
pub fn rotate(src: &Pixels, degrees: f64) -> Result<Pixels, EngineError> {
    if !degrees.is_finite() {
        return Err(EngineError::new(format!("invalid rotation angle {}", degrees)));
    }

    let normalized = degrees.rem_euclid(360.0);
    let near = |target: f64| (normalized - target).abs() < EPSILON;
    let image = src.image();
    if near(0.0) || near(360.0) {
        return Ok(src.derive(image.clone()));
    }
    if near(90.0) {
        return Ok(src.derive(imageops::rotate90(image)));
    }
    if near(180.0) {
        return Ok(src.derive(imageops::rotate180(image)));
    }
    if near(270.0) {
        return Ok(src.derive(imageops::rotate270(image)));
    }

    warp(src, &AffineMatrix::rotation(normalized))
}

/// Shear by two angles in degrees, expanding the canvas to fit.
///
/// Angles whose tangent is undefined (90 degrees modulo 180) fail.
pub fn shear(src: &Pixels, x_shear: f64, y_shear: f64) -> Result<Pixels, EngineError> {
    for angle in [x_shear, y_shear] {
        if !angle.is_finite() || ((angle.rem_euclid(180.0)) - 90.0).abs() < EPSILON {
            return Err(EngineError::new(format!(
                "angle is discontinuous: {}",
                angle
            )));
        }
    }
    warp(src, &AffineMatrix::shear(x_shear, y_shear))
}

/// Compute the output canvas for `matrix`: (min_x, min_y, width, height).
fn bounds(width: u32, height: u32, matrix: &AffineMatrix) -> (f64, f64, u32, u32) {
    let (w, h) = (width as f64, height as f64);
    let corners = [
        matrix.apply(0.0, 0.0),
        matrix.apply(w, 0.0),
        matrix.apply(0.0, h),
        matrix.apply(w, h),
    ];

    let min_x = corners.iter().map(|c| c.0).fold(f64::INFINITY, f64::min);
    let max_x = corners.iter().map(|c| c.0).fold(f64::NEG_INFINITY, f64::max);
    let min_y = corners.iter().map(|c| c.1).fold(f64::INFINITY, f64::min);
    let max_y = corners.iter().map(|c| c.1).fold(f64::NEG_INFINITY, f64::max);

    let out_w = (max_x - min_x).round().clamp(1.0, u32::MAX as f64) as u32;
    let out_h = (max_y - min_y).round().clamp(1.0, u32::MAX as f64) as u32;
    (min_x, min_y, out_w, out_h)
}

fn warp(src: &Pixels, matrix: &AffineMatrix) -> Result<Pixels, EngineError> {
    let det = matrix.determinant();
    if !det.is_finite() || det.abs() < EPSILON {
        return Err(EngineError::new("affine matrix is not invertible"));
    }

    let (min_x, min_y, dst_w, dst_h) = bounds(src.width(), src.height(), matrix);
    check_target(dst_w, dst_h)?;

    // Inverse of the linear part.
    let inv_sx = matrix.sy / det;
    let inv_ry = -matrix.ry / det;
    let inv_rx = -matrix.rx / det;
    let inv_sy = matrix.sx / det;

    let background = crate::config::config().background;
    let image = src.image();
    let output = RgbaImage::from_fn(dst_w, dst_h, |dst_x, dst_y| {
        // Pixel centers, translated back into the transformed plane.
        let px = dst_x as f64 + 0.5 + min_x - matrix.tx;
        let py = dst_y as f64 + 0.5 + min_y - matrix.ty;

        let src_x = inv_sx * px + inv_ry * py - 0.5;
        let src_y = inv_rx * px + inv_sy * py - 0.5;
        sample_bilinear(image, src_x, src_y, background)
    });

    Ok(src.derive(output))
}

/// Sample a pixel using bilinear interpolation.
///
/// Positions more than half a pixel outside the image return `background`;
/// positions inside the half-pixel border clamp to the edge.
fn sample_bilinear(image: &RgbaImage, x: f64, y: f64, background: Rgba<u8>) -> Rgba<u8> {
    let (w, h) = (image.width() as f64, image.height() as f64);
    if x < -0.5 || y < -0.5 || x > w - 0.5 || y > h - 0.5 {
        return background;
    }

    let x = x.clamp(0.0, w - 1.0);
    let y = y.clamp(0.0, h - 1.0);
    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(image.width() - 1);
    let y1 = (y0 + 1).min(image.height() - 1);

    // Fractional distances
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = image.get_pixel(x0, y0).0;
    let p10 = image.get_pixel(x1, y0).0;
    let p01 = image.get_pixel(x0, y1).0;
    let p11 = image.get_pixel(x1, y1).0;

    let mut result = [0u8; 4];
    for i in 0..4 {
        let v = p00[i] as f64 * (1.0 - fx) * (1.0 - fy)
            + p10[i] as f64 * fx * (1.0 - fy)
            + p01[i] as f64 * (1.0 - fx) * fy
            + p11[i] as f64 * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }
    Rgba(result)
}
