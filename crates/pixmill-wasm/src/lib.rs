//! Pixmill WASM - WebAssembly bindings for Pixmill
//!
//! This crate exposes pixmill-core image handles to JavaScript/TypeScript
//! as an `Image` class plus a few module-level functions.
//!
//! # Module Structure
//!
//! - `handle` - The `Image` class (transforms, composite, encode state, `buffer`)
//! - `args` - Conversion of JS values into core arguments
//! - `error` - Mapping core errors onto JS exceptions
//! - `logger` - `log` backend writing to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { image, constants } from '@pixmill/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const img = image(new Uint8Array(await file.arrayBuffer()));
//! const rotated = img.rotate(90);
//! rotated.format('PNG');
//! console.log(`Encoded ${rotated.width}x${rotated.height}: ${rotated.buffer.length} bytes`);
//! ```

use std::collections::BTreeMap;

use log::LevelFilter;
use pixmill_core::{decode_arg, EngineConfig};
use serde::Serialize;
use wasm_bindgen::prelude::*;

mod args;
mod error;
mod handle;
mod logger;

pub use handle::JsImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logger::install(LevelFilter::Info);
    pixmill_core::initialize(EngineConfig::default());
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Decode an image from a `Uint8Array`.
///
/// # Errors
///
/// - `TypeError` for a string argument or any other non-buffer value
/// - `DecodeError` when the argument is missing or the bytes can't be decoded
#[wasm_bindgen]
pub fn image(input: JsValue) -> Result<JsImage, JsValue> {
    decode_arg(&args::from_js(&input))
        .map(JsImage::from_handle)
        .map_err(error::to_js)
}

/// The filter and composite operator constants as a plain object, e.g.
/// `{ LanczosFilter: 13, OverCompositeOp: 1, ... }`.
#[wasm_bindgen]
pub fn constants() -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    constant_map()
        .serialize(&serializer)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn constant_map() -> BTreeMap<&'static str, i32> {
    pixmill_core::constants().into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_constant_map() {
        let map = constant_map();
        assert_eq!(map.get("LanczosFilter"), Some(&13));
        assert_eq!(map.get("OverCompositeOp"), Some(&1));
        assert_eq!(map.get("NoCompositeOp"), Some(&23));
        assert_eq!(map.len(), pixmill_core::constants().len());
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use std::io::Cursor;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn png_array(width: u32, height: u32) -> js_sys::Uint8Array {
        let img = ::image::RgbaImage::from_pixel(width, height, ::image::Rgba([10, 20, 30, 255]));
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ::image::ImageFormat::Png).unwrap();
        js_sys::Uint8Array::from(buffer.get_ref().as_slice())
    }

    #[wasm_bindgen_test]
    fn test_init_is_repeatable() {
        init();
        init();
        assert!(!version().is_empty());
    }

    #[wasm_bindgen_test]
    fn test_image_from_bytes() {
        let img = image(png_array(100, 100).into()).unwrap();
        assert_eq!(img.width().unwrap(), 100);
        assert_eq!(img.height().unwrap(), 100);
    }

    #[wasm_bindgen_test]
    fn test_full_scenario() {
        let img = image(png_array(100, 100).into()).unwrap();
        let small = img
            .resize(
                JsValue::from_f64(50.0),
                JsValue::from_f64(50.0),
                JsValue::UNDEFINED,
                JsValue::UNDEFINED,
            )
            .unwrap();
        assert_eq!(small.width().unwrap(), 50);
        small
            .format(JsValue::from_str("JPEG"))
            .unwrap()
            .quality(JsValue::from_f64(80.0))
            .unwrap();
        let bytes = small.buffer().unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
    }

    #[wasm_bindgen_test]
    fn test_string_input_is_type_error() {
        let err = image(JsValue::from_str("GIF89a")).err().unwrap();
        assert!(err.is_instance_of::<js_sys::TypeError>());
    }

    #[wasm_bindgen_test]
    fn test_empty_input_fails() {
        assert!(image(js_sys::Uint8Array::new_with_length(0).into()).is_err());
        assert!(image(JsValue::UNDEFINED).is_err());
    }

    #[wasm_bindgen_test]
    fn test_constants_object() {
        let value = constants().unwrap();
        let lanczos = js_sys::Reflect::get(&value, &JsValue::from_str("LanczosFilter")).unwrap();
        assert_eq!(lanczos.as_f64(), Some(13.0));
    }
}
