//! Conversion of JavaScript values into core arguments.

use js_sys::Uint8Array;
use pixmill_core::Arg;
use wasm_bindgen::{JsCast, JsValue};

/// Tag a JavaScript value with its dynamic type.
///
/// `undefined` and `null` count as a missing argument. Image arguments are
/// typed at the binding signature and never go through here.
pub fn from_js(value: &JsValue) -> Arg<'static> {
    if value.is_undefined() || value.is_null() {
        Arg::Missing
    } else if let Some(number) = value.as_f64() {
        from_number(number)
    } else if let Some(text) = value.as_string() {
        Arg::Str(text)
    } else if let Some(bytes) = value.dyn_ref::<Uint8Array>() {
        Arg::Bytes(bytes.to_vec())
    } else {
        Arg::Other
    }
}

/// A number counts as an integer when it is integral and fits in 32 bits,
/// matching how JavaScript engines classify small integers.
pub fn from_number(number: f64) -> Arg<'static> {
    if number.fract() == 0.0 && number >= i32::MIN as f64 && number <= i32::MAX as f64 {
        Arg::Int(number as i64)
    } else {
        Arg::Number(number)
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_from_js_kinds() {
        assert!(matches!(from_js(&JsValue::UNDEFINED), Arg::Missing));
        assert!(matches!(from_js(&JsValue::NULL), Arg::Missing));
        assert!(matches!(from_js(&JsValue::from_f64(3.0)), Arg::Int(3)));
        assert!(matches!(from_js(&JsValue::from_f64(0.25)), Arg::Number(_)));
        assert!(matches!(from_js(&JsValue::from_str("PNG")), Arg::Str(ref s) if s == "PNG"));
        assert!(matches!(from_js(&JsValue::TRUE), Arg::Other));
    }

    #[wasm_bindgen_test]
    fn test_from_js_bytes() {
        let array = Uint8Array::from(&[1u8, 2, 3][..]);
        match from_js(&array.into()) {
            Arg::Bytes(bytes) => assert_eq!(bytes, vec![1, 2, 3]),
            other => panic!("unexpected argument: {other:?}"),
        }
    }
}
