//! Process-wide engine configuration.
//!
//! The engine is initialized once per process. The first call to
//! [`initialize`] wins; later calls are ignored. Code that runs before any
//! explicit initialization sees [`EngineConfig::default`]. There is no
//! teardown: the configuration lives for the rest of the process.

use image::Rgba;
use once_cell::sync::OnceCell;

use crate::engine::EngineError;

/// Largest accepted width or height, in pixels.
pub const DEFAULT_MAX_DIMENSION: u32 = 32768;

/// Largest accepted pixel count (width * height). 100 MP is 400 MB as RGBA.
pub const DEFAULT_MAX_PIXELS: u64 = 100_000_000;

/// Fill color for canvas area not covered by source pixels (opaque white).
pub const DEFAULT_BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

static CONFIG: OnceCell<EngineConfig> = OnceCell::new();

/// Resource limits and defaults applied by the imaging engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Maximum width or height of any decoded or produced raster.
    pub max_dimension: u32,
    /// Maximum pixel count of any decoded or produced raster.
    pub max_pixels: u64,
    /// Color used for uncovered canvas (extent, rotate, shear, affine).
    pub background: Rgba<u8>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            max_pixels: DEFAULT_MAX_PIXELS,
            background: DEFAULT_BACKGROUND,
        }
    }
}

impl EngineConfig {
    /// Check that a raster of the given size may be allocated.
    pub fn check_dimensions(&self, width: u32, height: u32) -> Result<(), EngineError> {
        if width > self.max_dimension || height > self.max_dimension {
            return Err(EngineError::new(format!(
                "{}x{} exceeds the maximum dimension of {}",
                width, height, self.max_dimension
            )));
        }
        let pixels = width as u64 * height as u64;
        if pixels > self.max_pixels {
            return Err(EngineError::new(format!(
                "{}x{} exceeds the pixel limit of {}",
                width, height, self.max_pixels
            )));
        }
        Ok(())
    }

    /// Decoder limits equivalent to this configuration.
    pub(crate) fn limits(&self) -> image::Limits {
        let mut limits = image::Limits::default();
        limits.max_image_width = Some(self.max_dimension);
        limits.max_image_height = Some(self.max_dimension);
        limits.max_alloc = Some(self.max_pixels.saturating_mul(4));
        limits
    }
}

/// Initialize the engine with `config`.
///
/// Returns `true` if this call installed the configuration and `false` if
/// the engine was already initialized (the existing configuration is kept).
pub fn initialize(config: EngineConfig) -> bool {
    match CONFIG.set(config) {
        Ok(()) => {
            log::debug!("imaging engine initialized");
            true
        }
        Err(_) => {
            log::debug!("imaging engine already initialized, keeping existing config");
            false
        }
    }
}

/// Get the active configuration, falling back to the defaults.
pub fn config() -> &'static EngineConfig {
    CONFIG.get_or_init(EngineConfig::default)
}
