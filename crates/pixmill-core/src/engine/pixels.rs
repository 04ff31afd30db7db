//! The pixel resource owned by an image handle.

use image::{ImageFormat, RgbaImage};

/// Metadata blocks embedded in the source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbeddedProfiles {
    /// ICC color profile.
    pub icc: Option<Vec<u8>>,
    /// Raw EXIF block.
    pub exif: Option<Vec<u8>>,
}

impl EmbeddedProfiles {
    /// Check if no profile block is attached.
    pub fn is_empty(&self) -> bool {
        self.icc.is_none() && self.exif.is_none()
    }
}

/// A decoded RGBA8 raster plus the engine-side attributes that travel with it.
///
/// `magick` is the codec-selection field: the format the bytes were sniffed
/// as at decode time, overwritten with the target format at encode time.
#[derive(Debug, Clone)]
pub struct Pixels {
    image: RgbaImage,
    magick: Option<ImageFormat>,
    profiles: EmbeddedProfiles,
}

impl Pixels {
    /// Wrap a raster with no source format and no profiles.
    pub fn new(image: RgbaImage) -> Self {
        Self {
            image,
            magick: None,
            profiles: EmbeddedProfiles::default(),
        }
    }

    /// Wrap a freshly decoded raster.
    pub fn decoded(image: RgbaImage, magick: ImageFormat, profiles: EmbeddedProfiles) -> Self {
        Self {
            image,
            magick: Some(magick),
            profiles,
        }
    }

    /// Build the result of a primitive applied to `self`.
    ///
    /// Like a clone of the source, the result keeps the source format and
    /// profiles but owns only the new raster.
    pub fn derive(&self, image: RgbaImage) -> Self {
        Self {
            image,
            magick: self.magick,
            profiles: self.profiles.clone(),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }

    pub fn magick(&self) -> Option<ImageFormat> {
        self.magick
    }

    pub fn set_magick(&mut self, format: ImageFormat) {
        self.magick = Some(format);
    }

    pub fn profiles(&self) -> &EmbeddedProfiles {
        &self.profiles
    }

    /// Drop every embedded profile and metadata block.
    pub fn strip(&mut self) {
        self.profiles = EmbeddedProfiles::default();
    }
}
