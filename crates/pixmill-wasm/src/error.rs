//! Mapping core errors onto JavaScript exceptions.
//!
//! Argument problems become a `TypeError`; everything else becomes an
//! `Error` whose `name` identifies the failure category.

use js_sys::{Error, TypeError};
use pixmill_core::{ErrorKind, ImageError};
use wasm_bindgen::JsValue;

/// The `name` given to the thrown error for each category.
pub fn error_name(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Argument => "TypeError",
        ErrorKind::InvalidHandle => "InvalidHandleError",
        ErrorKind::InvalidState => "InvalidStateError",
        ErrorKind::Decode => "DecodeError",
        ErrorKind::Engine => "EngineError",
        ErrorKind::Encode => "EncodeError",
    }
}

pub fn to_js(err: ImageError) -> JsValue {
    let message = err.to_string();
    match err.kind() {
        ErrorKind::Argument => TypeError::new(&message).into(),
        kind => {
            let error = Error::new(&message);
            error.set_name(error_name(kind));
            error.into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_names_are_distinct() {
        let kinds = [
            ErrorKind::Argument,
            ErrorKind::InvalidHandle,
            ErrorKind::InvalidState,
            ErrorKind::Decode,
            ErrorKind::Engine,
            ErrorKind::Encode,
        ];
        let mut names: Vec<_> = kinds.iter().map(|k| error_name(*k)).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), kinds.len());
    }
}
