//! Typed argument validation for dynamically-typed call sites.
//!
//! A host adapter converts each incoming value into an [`Arg`]; operations
//! then pull typed values out of the slice with the extractors below. Every
//! extractor either returns the typed value or an [`ImageError`] naming the
//! offending slot, so nothing ill-typed reaches the engine.

use crate::engine::Rectangle;
use crate::error::ImageError;
use crate::handle::ImageHandle;

/// One host argument, tagged by its dynamic type.
#[derive(Debug, Clone)]
pub enum Arg<'a> {
    /// The slot was not supplied (or was `undefined`/`null`).
    Missing,
    /// An integral number.
    Int(i64),
    /// A non-integral (or out of integer range) number.
    Number(f64),
    Str(String),
    Bytes(Vec<u8>),
    /// Another image handle, borrowed for the duration of the call.
    Image(&'a ImageHandle),
    /// Any other host value.
    Other,
}

impl Arg<'_> {
    /// Short description of the dynamic type, used in dispatch logging.
    pub fn type_name(&self) -> &'static str {
        match self {
            Arg::Missing => "missing",
            Arg::Int(_) => "integer",
            Arg::Number(_) => "number",
            Arg::Str(_) => "string",
            Arg::Bytes(_) => "bytes",
            Arg::Image(_) => "image",
            Arg::Other => "object",
        }
    }
}

fn slot<'s, 'a>(args: &'s [Arg<'a>], index: usize) -> &'s Arg<'a> {
    args.get(index).unwrap_or(&Arg::Missing)
}

/// Extract a required integer.
pub fn required_int(args: &[Arg<'_>], index: usize) -> Result<i64, ImageError> {
    match slot(args, index) {
        Arg::Int(value) => Ok(*value),
        _ => Err(ImageError::InvalidArgument {
            index,
            expected: "an integer",
        }),
    }
}

/// Extract an optional integer, falling back to `default` when missing.
pub fn optional_int(args: &[Arg<'_>], index: usize, default: i64) -> Result<i64, ImageError> {
    match slot(args, index) {
        Arg::Missing => Ok(default),
        _ => required_int(args, index),
    }
}

/// Extract a required finite number. Integers are accepted.
pub fn required_number(args: &[Arg<'_>], index: usize) -> Result<f64, ImageError> {
    let value = match slot(args, index) {
        Arg::Int(value) => *value as f64,
        Arg::Number(value) => *value,
        _ => {
            return Err(ImageError::InvalidArgument {
                index,
                expected: "a number",
            })
        }
    };
    if !value.is_finite() {
        return Err(ImageError::out_of_range(index, "must be finite"));
    }
    Ok(value)
}

/// Extract an optional finite number, falling back to `default` when missing.
pub fn optional_number(args: &[Arg<'_>], index: usize, default: f64) -> Result<f64, ImageError> {
    match slot(args, index) {
        Arg::Missing => Ok(default),
        _ => required_number(args, index),
    }
}

pub fn required_str<'s>(args: &'s [Arg<'_>], index: usize) -> Result<&'s str, ImageError> {
    match slot(args, index) {
        Arg::Str(value) => Ok(value.as_str()),
        _ => Err(ImageError::InvalidArgument {
            index,
            expected: "a string",
        }),
    }
}

pub fn required_image<'a>(args: &[Arg<'a>], index: usize) -> Result<&'a ImageHandle, ImageError> {
    match slot(args, index) {
        Arg::Image(handle) => Ok(*handle),
        _ => Err(ImageError::InvalidArgument {
            index,
            expected: "an image",
        }),
    }
}

/// Extract a width or height: a non-negative integer that fits in `u32`.
///
/// Zero passes here; the engine rejects empty geometry itself.
pub fn dimension(args: &[Arg<'_>], index: usize) -> Result<u32, ImageError> {
    let value = required_int(args, index)?;
    u32::try_from(value).map_err(|_| {
        if value < 0 {
            ImageError::out_of_range(index, "must not be negative")
        } else {
            ImageError::out_of_range(index, "is too large")
        }
    })
}

/// Extract a rectangle from four consecutive integer slots starting at
/// `index`: x, y, width, height.
pub fn rectangle(args: &[Arg<'_>], index: usize) -> Result<Rectangle, ImageError> {
    let x = offset(args, index)?;
    let y = offset(args, index + 1)?;
    let width = dimension(args, index + 2)?;
    let height = dimension(args, index + 3)?;
    Ok(Rectangle::new(x, y, width, height))
}

fn offset(args: &[Arg<'_>], index: usize) -> Result<i32, ImageError> {
    to_offset(required_int(args, index)?, index)
}

/// Extract an optional pixel offset, 0 when missing.
pub fn optional_offset(args: &[Arg<'_>], index: usize) -> Result<i32, ImageError> {
    to_offset(optional_int(args, index, 0)?, index)
}

fn to_offset(value: i64, index: usize) -> Result<i32, ImageError> {
    i32::try_from(value).map_err(|_| ImageError::out_of_range(index, "is too large"))
}

/// Extract an encode quality in `0..=100`. Fractional values are truncated.
pub fn quality(args: &[Arg<'_>], index: usize) -> Result<i32, ImageError> {
    let value = required_number(args, index)?.trunc();
    if !(0.0..=100.0).contains(&value) {
        return Err(ImageError::out_of_range(
            index,
            format!("quality must be between 0 and 100, got {}", value),
        ));
    }
    Ok(value as i32)
}
