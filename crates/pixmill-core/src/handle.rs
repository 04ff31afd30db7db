//! The image handle: one owned pixel resource plus encode-time state.
//!
//! A handle exclusively owns its [`Pixels`]; two handles never share one.
//! Dropping the handle releases the raster, the format string and any
//! embedded profiles. Ownership makes a double release impossible.

use image::{ImageFormat, RgbaImage};

use crate::engine::Pixels;
use crate::error::ImageError;

/// Quality used by a handle until [`ImageHandle::set_quality`] is called.
pub const DEFAULT_QUALITY: i32 = 90;

/// An owned reference to one decoded image.
///
/// Handles come from [`crate::decode`], from any transformation (as its
/// output), or from [`ImageHandle::create_empty`]. An empty handle has no
/// pixel resource and every pixel operation on it fails with
/// [`ImageError::InvalidHandle`].
///
/// `Clone` is a deep copy: the clone owns its own raster.
#[derive(Debug, Clone)]
pub struct ImageHandle {
    pixels: Option<Pixels>,
    format: Option<String>,
    quality: i32,
}

impl Default for ImageHandle {
    fn default() -> Self {
        Self::create_empty()
    }
}

impl ImageHandle {
    /// Create a handle with no pixel resource.
    pub fn create_empty() -> Self {
        Self {
            pixels: None,
            format: None,
            quality: DEFAULT_QUALITY,
        }
    }

    /// Wrap an engine result in a new handle with default encode state.
    pub(crate) fn from_pixels(pixels: Pixels) -> Self {
        Self {
            pixels: Some(pixels),
            ..Self::create_empty()
        }
    }

    /// Create a handle that owns `image`.
    pub fn from_rgba(image: RgbaImage) -> Self {
        Self::from_pixels(Pixels::new(image))
    }

    /// Check if the handle has no pixel resource.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_none()
    }

    /// Store the output format used by the next encode.
    ///
    /// The name is not checked against the known codecs here; an unknown
    /// name fails at encode time.
    pub fn set_format(&mut self, name: &str) {
        self.format = Some(name.to_owned());
    }

    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    /// Store the encode quality. The value is kept as given.
    pub fn set_quality(&mut self, value: i32) {
        self.quality = value;
    }

    pub fn quality(&self) -> i32 {
        self.quality
    }

    /// Image width in pixels.
    pub fn width(&self) -> Result<u32, ImageError> {
        Ok(self.pixels()?.width())
    }

    /// Image height in pixels.
    pub fn height(&self) -> Result<u32, ImageError> {
        Ok(self.pixels()?.height())
    }

    /// Borrow the RGBA raster.
    pub fn rgba(&self) -> Result<&RgbaImage, ImageError> {
        Ok(self.pixels()?.image())
    }

    /// The format the bytes were recognized as, or the last encode target.
    pub fn source_format(&self) -> Option<ImageFormat> {
        self.pixels.as_ref().and_then(Pixels::magick)
    }

    /// Check if an ICC profile or EXIF block is still attached.
    pub fn has_profile(&self) -> bool {
        self.pixels
            .as_ref()
            .is_some_and(|pixels| !pixels.profiles().is_empty())
    }

    pub(crate) fn pixels(&self) -> Result<&Pixels, ImageError> {
        self.pixels.as_ref().ok_or(ImageError::InvalidHandle)
    }

    pub(crate) fn pixels_mut(&mut self) -> Result<&mut Pixels, ImageError> {
        self.pixels.as_mut().ok_or(ImageError::InvalidHandle)
    }
}
