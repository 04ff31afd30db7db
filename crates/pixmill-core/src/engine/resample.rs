//! Resize primitives.
//!
//! All four primitives produce a raster of exactly the requested size; they
//! differ only in the kernel used. None of them preserves aspect ratio.

use image::imageops::{self, FilterType};

use super::{check_target, EngineError, FilterKind, Pixels};

/// Fast, low-quality resize to exact dimensions.
pub fn thumbnail(src: &Pixels, width: u32, height: u32) -> Result<Pixels, EngineError> {
    check_target(width, height)?;
    Ok(src.derive(imageops::thumbnail(src.image(), width, height)))
}

/// Pixel-sampling resize: every output pixel copies one source pixel.
pub fn sample(src: &Pixels, width: u32, height: u32) -> Result<Pixels, EngineError> {
    check_target(width, height)?;
    Ok(src.derive(imageops::resize(
        src.image(),
        width,
        height,
        FilterType::Nearest,
    )))
}

/// Simple interpolated resize.
pub fn scale(src: &Pixels, width: u32, height: u32) -> Result<Pixels, EngineError> {
    check_target(width, height)?;
    Ok(src.derive(imageops::resize(
        src.image(),
        width,
        height,
        FilterType::Triangle,
    )))
}

/// Resize with an explicit kernel and blur factor.
///
/// A blur factor of 1.0 leaves the kernel as is. Larger values widen it,
/// which is applied as a Gaussian of sigma `blur - 1.0` over the result.
/// Positive values below 1.0 are treated as 1.0; zero or negative values fail,
/// as does a sigma wider than the larger output side.
pub fn resize(
    src: &Pixels,
    width: u32,
    height: u32,
    filter: FilterKind,
    blur: f64,
) -> Result<Pixels, EngineError> {
    check_target(width, height)?;
    if !blur.is_finite() || blur <= 0.0 {
        return Err(EngineError::new(format!("invalid blur factor {}", blur)));
    }
    let extent = f64::from(width.max(height));
    if blur - 1.0 > extent {
        return Err(EngineError::new(format!(
            "blur factor {} exceeds the {}px output",
            blur, extent
        )));
    }

    let resized = imageops::resize(src.image(), width, height, kernel(filter));
    let sigma = (blur - 1.0) as f32;
    if sigma > f32::EPSILON {
        return Ok(src.derive(imageops::blur(&resized, sigma)));
    }
    Ok(src.derive(resized))
}

/// Map a filter kind onto the closest kernel the `image` crate provides.
fn kernel(filter: FilterKind) -> FilterType {
    match filter {
        FilterKind::Point | FilterKind::Box => FilterType::Nearest,
        FilterKind::Triangle
        | FilterKind::Hermite
        | FilterKind::Hanning
        | FilterKind::Hamming
        | FilterKind::Blackman
        | FilterKind::Quadratic => FilterType::Triangle,
        FilterKind::Gaussian => FilterType::Gaussian,
        FilterKind::Cubic | FilterKind::Catrom | FilterKind::Mitchell => FilterType::CatmullRom,
        FilterKind::Undefined | FilterKind::Lanczos | FilterKind::Bessel | FilterKind::Sinc => {
            FilterType::Lanczos3
        }
    }
}
