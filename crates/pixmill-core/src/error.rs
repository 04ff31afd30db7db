//! Error types surfaced by the handle API.
//!
//! Every failure is reported synchronously as an [`ImageError`]. Callers that
//! only need the broad category (for example the WASM bindings, which map
//! argument problems to `TypeError`) can match on [`ImageError::kind`].

use thiserror::Error;

/// Broad category of an [`ImageError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong arity, wrong type or out-of-range value supplied by the caller.
    Argument,
    /// The handle has no pixel resource.
    InvalidHandle,
    /// Encode attempted before an output format was chosen.
    InvalidState,
    /// Input bytes could not be recognized or parsed.
    Decode,
    /// The imaging engine rejected a well-typed request.
    Engine,
    /// The imaging engine failed to serialize the image.
    Encode,
}

/// Error type for every handle, dispatch and codec operation.
#[derive(Debug, Error)]
pub enum ImageError {
    /// An argument slot was missing or held a value of the wrong type.
    #[error("Argument {index} must be {expected}")]
    InvalidArgument { index: usize, expected: &'static str },

    /// An argument had the right type but an unusable value.
    #[error("Argument {index} is out of range: {reason}")]
    ArgumentOutOfRange { index: usize, reason: String },

    /// The input kind is recognized but no longer accepted.
    #[error("{0}")]
    UnsupportedInput(&'static str),

    /// The operation name does not exist on an image.
    #[error("Unknown image operation: {0}")]
    UnknownOperation(String),

    /// The handle was never filled with pixels.
    #[error("Image handle has no pixel data")]
    InvalidHandle,

    /// `encode` was called before `format`.
    #[error("Output format has not been set")]
    InvalidState,

    /// The bytes could not be decoded.
    #[error("Unable to load image: {0}")]
    Decode(String),

    /// An engine primitive failed; `message` is the engine diagnostic.
    #[error("Unable to {operation} image: {message}")]
    Engine {
        operation: &'static str,
        message: String,
    },

    /// Serialization failed.
    #[error("Unable to convert image to blob: {0}")]
    Encode(String),
}

impl ImageError {
    /// Get the broad category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ImageError::InvalidArgument { .. }
            | ImageError::ArgumentOutOfRange { .. }
            | ImageError::UnsupportedInput(_)
            | ImageError::UnknownOperation(_) => ErrorKind::Argument,
            ImageError::InvalidHandle => ErrorKind::InvalidHandle,
            ImageError::InvalidState => ErrorKind::InvalidState,
            ImageError::Decode(_) => ErrorKind::Decode,
            ImageError::Engine { .. } => ErrorKind::Engine,
            ImageError::Encode(_) => ErrorKind::Encode,
        }
    }

    pub(crate) fn out_of_range(index: usize, reason: impl Into<String>) -> Self {
        ImageError::ArgumentOutOfRange {
            index,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_error_display() {
        let err = ImageError::InvalidArgument {
            index: 1,
            expected: "an integer",
        };
        assert_eq!(err.to_string(), "Argument 1 must be an integer");
        assert_eq!(err.kind(), ErrorKind::Argument);
    }

    #[test]
    fn test_engine_error_display() {
        let err = ImageError::Engine {
            operation: "crop",
            message: "geometry does not contain image".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unable to crop image: geometry does not contain image"
        );
        assert_eq!(err.kind(), ErrorKind::Engine);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(ImageError::InvalidHandle.kind(), ErrorKind::InvalidHandle);
        assert_eq!(ImageError::InvalidState.kind(), ErrorKind::InvalidState);
        assert_eq!(
            ImageError::Decode("empty input".into()).kind(),
            ErrorKind::Decode
        );
        assert_eq!(ImageError::Encode("nope".into()).kind(), ErrorKind::Encode);
        assert_eq!(
            ImageError::UnknownOperation("sepia".into()).kind(),
            ErrorKind::Argument
        );
        assert_eq!(
            ImageError::out_of_range(0, "must not be negative").kind(),
            ErrorKind::Argument
        );
    }
}
