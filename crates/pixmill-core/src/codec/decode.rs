//! Decoding with format sniffing.

use std::io::Cursor;

use exif::Reader;
use image::{DynamicImage, ImageDecoder, ImageReader};

use crate::args::Arg;
use crate::config::config;
use crate::engine::{EmbeddedProfiles, Pixels};
use crate::error::ImageError;
use crate::handle::ImageHandle;

/// Decode an image of any enabled format from `bytes`.
///
/// No filename or format hint is used; the format is sniffed from the
/// content. The caller's buffer is only read.
///
/// # Errors
///
/// Returns `ImageError::Decode` if:
/// - `bytes` is empty
/// - the format is not recognized
/// - the data is corrupted, truncated or exceeds the configured limits
pub fn decode(bytes: &[u8]) -> Result<ImageHandle, ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::Decode("empty input".to_string()));
    }

    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ImageError::Decode(e.to_string()))?;
    let format = reader
        .format()
        .ok_or_else(|| ImageError::Decode("unrecognized image format".to_string()))?;
    reader.limits(config().limits());

    let mut decoder = reader
        .into_decoder()
        .map_err(|e| ImageError::Decode(e.to_string()))?;
    // A broken profile is not worth failing the decode over.
    let icc = decoder.icc_profile().unwrap_or(None);
    let image = DynamicImage::from_decoder(decoder)
        .map_err(|e| ImageError::Decode(e.to_string()))?;

    let profiles = EmbeddedProfiles {
        icc,
        exif: extract_exif(bytes),
    };
    let rgba = image.into_rgba8();
    log::debug!(
        "decoded {:?} {}x{} ({} bytes in)",
        format,
        rgba.width(),
        rgba.height(),
        bytes.len()
    );

    Ok(ImageHandle::from_pixels(Pixels::decoded(rgba, format, profiles)))
}

/// Decode from a host argument.
///
/// Only byte buffers are decoded. A string is rejected (binary strings are
/// not a supported input), and a missing argument is a decode failure.
pub fn decode_arg(arg: &Arg<'_>) -> Result<ImageHandle, ImageError> {
    match arg {
        Arg::Bytes(bytes) => decode(bytes),
        Arg::Str(_) => Err(ImageError::UnsupportedInput(
            "binary string input is no longer supported",
        )),
        Arg::Missing => Err(ImageError::Decode("no input".to_string())),
        _ => Err(ImageError::InvalidArgument {
            index: 0,
            expected: "a byte buffer",
        }),
    }
}

/// Extract the raw EXIF block, if the container has one.
fn extract_exif(bytes: &[u8]) -> Option<Vec<u8>> {
    let mut cursor = Cursor::new(bytes);
    Reader::new()
        .read_from_container(&mut cursor)
        .ok()
        .map(|exif| exif.buf().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{jpeg_bytes, png_bytes};
    use image::ImageFormat;

    #[test]
    fn test_decode_png() {
        let handle = decode(&png_bytes(100, 100)).unwrap();
        assert_eq!(handle.width().unwrap(), 100);
        assert_eq!(handle.height().unwrap(), 100);
        assert_eq!(handle.source_format(), Some(ImageFormat::Png));
        assert_eq!(handle.format(), None);
        assert_eq!(handle.quality(), 90);
    }

    #[test]
    fn test_decode_jpeg() {
        let handle = decode(&jpeg_bytes(32, 16)).unwrap();
        assert_eq!(handle.width().unwrap(), 32);
        assert_eq!(handle.height().unwrap(), 16);
        assert_eq!(handle.source_format(), Some(ImageFormat::Jpeg));
    }

    #[test]
    fn test_decode_empty_fails() {
        assert!(matches!(decode(&[]), Err(ImageError::Decode(_))));
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(decode(&[0, 1, 2, 3]), Err(ImageError::Decode(_))));
    }

    #[test]
    fn test_decode_truncated_fails() {
        let bytes = png_bytes(20, 20);
        assert!(matches!(
            decode(&bytes[..bytes.len() / 2]),
            Err(ImageError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_does_not_modify_input() {
        let bytes = png_bytes(4, 4);
        let copy = bytes.clone();
        decode(&bytes).unwrap();
        assert_eq!(bytes, copy);
    }

    #[test]
    fn test_decode_arg_kinds() {
        let bytes = png_bytes(3, 3);
        assert!(decode_arg(&Arg::Bytes(bytes)).is_ok());
        assert!(matches!(
            decode_arg(&Arg::Str("abc".into())),
            Err(ImageError::UnsupportedInput(_))
        ));
        assert!(matches!(
            decode_arg(&Arg::Missing),
            Err(ImageError::Decode(_))
        ));
        assert!(matches!(
            decode_arg(&Arg::Int(3)),
            Err(ImageError::InvalidArgument { index: 0, .. })
        ));
    }

    #[test]
    fn test_plain_png_has_no_profile() {
        let handle = decode(&png_bytes(4, 4)).unwrap();
        assert!(!handle.has_profile());
    }
}
