//! The imaging engine: pixel-level primitives behind the handle API.
//!
//! Every primitive is characterized only by its contract. Copy-producing
//! primitives take a borrowed [`Pixels`] and return a freshly allocated one;
//! [`composite`] is the single primitive that writes into its destination.
//! Failures are reported as an [`EngineError`] carrying a diagnostic message.
//!
//! # Module Structure
//!
//! - `types` - Filter and composite operator enumerations (host constants)
//! - `pixels` - The pixel resource owned by a handle
//! - `resample` - thumbnail / sample / scale / resize
//! - `geometry` - chop / crop / extent / flip / flop
//! - `affine` - affine warp, rotate and shear
//! - `composite` - blending one raster onto another

mod affine;
mod composite;
mod geometry;
mod pixels;
mod resample;
mod types;

use thiserror::Error;

pub use affine::{affine_transform, rotate, shear, AffineMatrix};
pub use composite::composite;
pub use geometry::{chop, crop, extent, flip, flop, Rectangle};
pub use pixels::{EmbeddedProfiles, Pixels};
pub use resample::{resize, sample, scale, thumbnail};
pub use types::{CompositeOperator, FilterKind};

/// Diagnostic produced by a failed engine primitive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct EngineError {
    reason: String,
}

impl EngineError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The diagnostic text.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Reject empty target geometry and geometry beyond the configured limits.
pub(crate) fn check_target(width: u32, height: u32) -> Result<(), EngineError> {
    if width == 0 || height == 0 {
        return Err(EngineError::new(format!(
            "non-zero width and height required, got {}x{}",
            width, height
        )));
    }
    crate::config::config().check_dimensions(width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_target_rejects_zero() {
        assert!(check_target(0, 10).is_err());
        assert!(check_target(10, 0).is_err());
        assert!(check_target(1, 1).is_ok());
    }

    #[test]
    fn test_engine_error_display() {
        let err = EngineError::new("angle is discontinuous");
        assert_eq!(err.to_string(), "angle is discontinuous");
        assert_eq!(err.reason(), "angle is discontinuous");
    }
}
