//! Pixmill Core - managed image handles over a small imaging engine
//!
//! This crate owns the lifetime of decoded images, validates host arguments
//! before any pixel work, runs geometric and compositing operations, and
//! converts images to and from encoded bytes.
//!
//! # Module Structure
//!
//! - `handle` - [`ImageHandle`]: one owned raster plus encode state
//! - `transform` - Typed operations on a handle (resize family, crop, rotate, composite, ...)
//! - `codec` - [`decode`] and [`encode`] at the byte boundary
//! - `args` - Typed validation of dynamically-typed host arguments
//! - `dispatch` - Name-based dispatch of host method calls
//! - `engine` - The pixel primitives and the enumerations shared with hosts
//! - `config` - One-time engine initialization and resource limits
//! - `error` - [`ImageError`] and its broad [`ErrorKind`]
//!
//! # Example
//!
//! ```ignore
//! use pixmill_core::{decode, FilterKind};
//!
//! let image = decode(&png_bytes)?;
//! let mut small = image.resize(50, 50, FilterKind::Lanczos, 1.0)?;
//! small.set_format("JPEG");
//! small.set_quality(80);
//! let jpeg = small.encode()?;
//! ```

pub mod args;
pub mod codec;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod handle;
mod transform;

#[cfg(test)]
mod test_support;

pub use args::Arg;
pub use codec::{decode, decode_arg, encode, resolve_format};
pub use config::{config, initialize, EngineConfig};
pub use dispatch::{dispatch, invoke, Dispatched, Operation};
pub use engine::{AffineMatrix, CompositeOperator, EngineError, FilterKind, Rectangle};
pub use error::{ErrorKind, ImageError};
pub use handle::{ImageHandle, DEFAULT_QUALITY};

/// The named integer constants exported to hosts: every filter kind followed
/// by every composite operator.
pub fn constants() -> Vec<(&'static str, i32)> {
    let filters = FilterKind::ALL
        .iter()
        .map(|filter| (filter.constant_name(), filter.value()));
    let operators = CompositeOperator::ALL
        .iter()
        .map(|op| (op.constant_name(), op.value()));
    filters.chain(operators).collect()
}
