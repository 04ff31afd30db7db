//! Typed transformation operations on [`ImageHandle`].
//!
//! Every geometric operation is copy-producing: it borrows the receiver,
//! runs one engine primitive, and wraps the result in a new handle. The
//! receiver is never modified. [`ImageHandle::composite`] is the exception
//! and blends into the receiver in place.

use crate::engine::{
    self, AffineMatrix, CompositeOperator, EngineError, FilterKind, Pixels, Rectangle,
};
use crate::error::ImageError;
use crate::handle::ImageHandle;

impl ImageHandle {
    /// Fast, low-quality resize to exactly `width` x `height`.
    pub fn thumbnail(&self, width: u32, height: u32) -> Result<ImageHandle, ImageError> {
        self.transform("thumbnail", |pixels| {
            engine::thumbnail(pixels, width, height)
        })
    }

    /// Pixel-sampling resize (no interpolation).
    pub fn sample(&self, width: u32, height: u32) -> Result<ImageHandle, ImageError> {
        self.transform("sample", |pixels| engine::sample(pixels, width, height))
    }

    /// Simple interpolated resize.
    pub fn scale(&self, width: u32, height: u32) -> Result<ImageHandle, ImageError> {
        self.transform("scale", |pixels| engine::scale(pixels, width, height))
    }

    /// Resize with an explicit filter and blur factor (1.0 = no extra blur).
    pub fn resize(
        &self,
        width: u32,
        height: u32,
        filter: FilterKind,
        blur: f64,
    ) -> Result<ImageHandle, ImageError> {
        self.transform("resize", |pixels| {
            engine::resize(pixels, width, height, filter, blur)
        })
    }

    /// Remove a region, closing the gap.
    pub fn chop(&self, rect: &Rectangle) -> Result<ImageHandle, ImageError> {
        self.transform("chop", |pixels| engine::chop(pixels, rect))
    }

    /// Extract a sub-region.
    pub fn crop(&self, rect: &Rectangle) -> Result<ImageHandle, ImageError> {
        self.transform("crop", |pixels| engine::crop(pixels, rect))
    }

    /// Pad or truncate the canvas, keeping existing pixels.
    pub fn extent(&self, rect: &Rectangle) -> Result<ImageHandle, ImageError> {
        self.transform("extent", |pixels| engine::extent(pixels, rect))
    }

    /// Vertical mirror.
    pub fn flip(&self) -> Result<ImageHandle, ImageError> {
        self.transform("flip", engine::flip)
    }

    /// Horizontal mirror.
    pub fn flop(&self) -> Result<ImageHandle, ImageError> {
        self.transform("flop", engine::flop)
    }

    pub fn affine_transform(&self, matrix: &AffineMatrix) -> Result<ImageHandle, ImageError> {
        self.transform("affine transform", |pixels| {
            engine::affine_transform(pixels, matrix)
        })
    }

    /// Rotate clockwise by `degrees`; the canvas grows to fit.
    pub fn rotate(&self, degrees: f64) -> Result<ImageHandle, ImageError> {
        self.transform("rotate", |pixels| engine::rotate(pixels, degrees))
    }

    /// Shear by two angles in degrees.
    pub fn shear(&self, x_shear: f64, y_shear: f64) -> Result<ImageHandle, ImageError> {
        self.transform("shear", |pixels| engine::shear(pixels, x_shear, y_shear))
    }

    /// Blend `overlay` onto this image at (`x`, `y`), in place.
    ///
    /// The overlay is only borrowed. On failure the receiver is unchanged.
    pub fn composite(
        &mut self,
        overlay: &ImageHandle,
        operator: CompositeOperator,
        x: i64,
        y: i64,
    ) -> Result<&mut Self, ImageError> {
        let source = overlay.pixels()?;
        let target = self.pixels_mut()?;
        if let Err(err) = engine::composite(target, operator, source, x, y) {
            log::warn!("composite with {:?} failed: {}", operator, err);
            return Err(ImageError::Engine {
                operation: "composite",
                message: err.to_string(),
            });
        }
        Ok(self)
    }

    fn transform<F>(&self, operation: &'static str, primitive: F) -> Result<ImageHandle, ImageError>
    where
        F: FnOnce(&Pixels) -> Result<Pixels, EngineError>,
    {
        let pixels = self.pixels()?;
        match primitive(pixels) {
            Ok(result) => {
                log::debug!(
                    "{}: {}x{} -> {}x{}",
                    operation,
                    pixels.width(),
                    pixels.height(),
                    result.width(),
                    result.height()
                );
                Ok(ImageHandle::from_pixels(result))
            }
            Err(err) => {
                log::warn!("{} failed: {}", operation, err);
                Err(ImageError::Engine {
                    operation,
                    message: err.to_string(),
                })
            }
        }
    }
}
