//! The codec boundary: bytes in, handle out, and back again.
//!
//! Both directions copy. `decode` reads a borrowed view of the caller's
//! bytes and never retains it; `encode` returns a freshly allocated buffer
//! the caller owns outright.
//!
//! # Examples
//!
//! ```ignore
//! use pixmill_core::{decode, Arg};
//!
//! let mut image = decode(&std::fs::read("photo.png")?)?;
//! let small = image.resize(50, 50, Default::default(), 1.0)?;
//! image.set_format("JPEG");
//! let jpeg = image.encode()?;
//! ```

mod decode;
mod encode;

pub use decode::{decode, decode_arg};
pub use encode::{encode, resolve_format};
