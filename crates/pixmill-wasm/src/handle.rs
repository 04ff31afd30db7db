//! The `Image` class exposed to JavaScript.
//!
//! Each JS object wraps a shared reference to one core [`ImageHandle`].
//! Transformations return a new `Image`; `format`, `quality` and
//! `composite` return an `Image` sharing the receiver's handle so calls can
//! be chained. Arguments arrive as raw `JsValue`s and are validated by the
//! core argument layer, so wrong types surface as `TypeError`s naming the
//! argument slot.
//!
//! # Example
//!
//! ```typescript
//! import { image, constants } from '@pixmill/wasm';
//!
//! const img = image(new Uint8Array(await file.arrayBuffer()));
//! const small = img.resize(50, 50, constants().LanczosFilter);
//! small.format('JPEG').quality(80);
//! const jpeg: Uint8Array = small.buffer;
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use pixmill_core::{dispatch, Arg, Dispatched, ImageError, ImageHandle, Operation};
use wasm_bindgen::prelude::*;

use crate::args::from_js;
use crate::error::to_js;

#[wasm_bindgen(js_name = Image)]
pub struct JsImage {
    handle: Rc<RefCell<ImageHandle>>,
}

impl JsImage {
    pub(crate) fn from_handle(handle: ImageHandle) -> Self {
        Self {
            handle: Rc::new(RefCell::new(handle)),
        }
    }

    /// Another JS object for the same underlying handle.
    fn share(&self) -> JsImage {
        JsImage {
            handle: Rc::clone(&self.handle),
        }
    }

    fn run(&self, operation: Operation, args: &[Arg<'_>]) -> Result<Dispatched, ImageError> {
        let mut handle = self.handle.borrow_mut();
        dispatch(&mut handle, operation, args)
    }

    /// Run an operation whose arguments are all plain JS values.
    fn call(&self, operation: Operation, values: &[&JsValue]) -> Result<JsImage, JsValue> {
        let args: Vec<Arg<'static>> = values.iter().map(|value| from_js(value)).collect();
        match self.run(operation, &args).map_err(to_js)? {
            Dispatched::Created(handle) => Ok(JsImage::from_handle(handle)),
            Dispatched::Receiver | Dispatched::Nothing => Ok(self.share()),
        }
    }

    fn inert(&self, operation: Operation) -> Result<(), JsValue> {
        self.run(operation, &[]).map(drop).map_err(to_js)
    }
}

#[wasm_bindgen(js_class = Image)]
impl JsImage {
    /// Create an empty image. Every pixel operation on it fails until it is
    /// replaced by a decoded one.
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsImage {
        JsImage::from_handle(ImageHandle::create_empty())
    }

    pub fn thumbnail(&self, width: JsValue, height: JsValue) -> Result<JsImage, JsValue> {
        self.call(Operation::Thumbnail, &[&width, &height])
    }

    pub fn sample(&self, width: JsValue, height: JsValue) -> Result<JsImage, JsValue> {
        self.call(Operation::Sample, &[&width, &height])
    }

    pub fn scale(&self, width: JsValue, height: JsValue) -> Result<JsImage, JsValue> {
        self.call(Operation::Scale, &[&width, &height])
    }

    /// Resize with an optional filter constant (default `LanczosFilter`) and
    /// blur factor (default 1.0).
    pub fn resize(
        &self,
        width: JsValue,
        height: JsValue,
        filter: JsValue,
        blur: JsValue,
    ) -> Result<JsImage, JsValue> {
        self.call(Operation::Resize, &[&width, &height, &filter, &blur])
    }

    pub fn chop(
        &self,
        x: JsValue,
        y: JsValue,
        width: JsValue,
        height: JsValue,
    ) -> Result<JsImage, JsValue> {
        self.call(Operation::Chop, &[&x, &y, &width, &height])
    }

    pub fn crop(
        &self,
        x: JsValue,
        y: JsValue,
        width: JsValue,
        height: JsValue,
    ) -> Result<JsImage, JsValue> {
        self.call(Operation::Crop, &[&x, &y, &width, &height])
    }

    pub fn extent(
        &self,
        x: JsValue,
        y: JsValue,
        width: JsValue,
        height: JsValue,
    ) -> Result<JsImage, JsValue> {
        self.call(Operation::Extent, &[&x, &y, &width, &height])
    }

    pub fn flip(&self) -> Result<JsImage, JsValue> {
        self.call(Operation::Flip, &[])
    }

    pub fn flop(&self) -> Result<JsImage, JsValue> {
        self.call(Operation::Flop, &[])
    }

    #[wasm_bindgen(js_name = affineTransform)]
    pub fn affine_transform(&self) -> Result<JsImage, JsValue> {
        self.call(Operation::AffineTransform, &[])
    }

    pub fn rotate(&self, degrees: JsValue) -> Result<JsImage, JsValue> {
        self.call(Operation::Rotate, &[&degrees])
    }

    pub fn shear(&self, x: JsValue, y: JsValue) -> Result<JsImage, JsValue> {
        self.call(Operation::Shear, &[&x, &y])
    }

    /// Set the output format used by `buffer`. Returns this image.
    pub fn format(&self, name: JsValue) -> Result<JsImage, JsValue> {
        self.call(Operation::Format, &[&name])
    }

    /// Set the encode quality (0-100). Returns this image.
    pub fn quality(&self, value: JsValue) -> Result<JsImage, JsValue> {
        self.call(Operation::Quality, &[&value])
    }

    /// Blend `overlay` onto this image in place. Returns this image.
    ///
    /// The overlay may be this image itself; it is copied first.
    pub fn composite(
        &self,
        overlay: &JsImage,
        operator: JsValue,
        x: JsValue,
        y: JsValue,
    ) -> Result<JsImage, JsValue> {
        let snapshot;
        let borrowed;
        let source: &ImageHandle = if self.same_handle(overlay) {
            snapshot = overlay.handle.borrow().clone();
            &snapshot
        } else {
            borrowed = overlay.handle.borrow();
            &borrowed
        };

        let args = [Arg::Image(source), from_js(&operator), from_js(&x), from_js(&y)];
        self.run(Operation::Composite, &args).map_err(to_js)?;
        Ok(self.share())
    }

    pub fn contrast(&self) -> Result<(), JsValue> {
        self.inert(Operation::Contrast)
    }

    pub fn equalize(&self) -> Result<(), JsValue> {
        self.inert(Operation::Equalize)
    }

    pub fn gamma(&self) -> Result<(), JsValue> {
        self.inert(Operation::Gamma)
    }

    pub fn level(&self) -> Result<(), JsValue> {
        self.inert(Operation::Level)
    }

    #[wasm_bindgen(js_name = levelChannel)]
    pub fn level_channel(&self) -> Result<(), JsValue> {
        self.inert(Operation::LevelChannel)
    }

    pub fn modulate(&self) -> Result<(), JsValue> {
        self.inert(Operation::Modulate)
    }

    pub fn negate(&self) -> Result<(), JsValue> {
        self.inert(Operation::Negate)
    }

    pub fn normalize(&self) -> Result<(), JsValue> {
        self.inert(Operation::Normalize)
    }

    pub fn attribute(&self) -> Result<(), JsValue> {
        self.inert(Operation::Attribute)
    }

    /// Whether `other` wraps the same underlying image.
    #[wasm_bindgen(js_name = sameHandle)]
    pub fn same_handle(&self, other: &JsImage) -> bool {
        Rc::ptr_eq(&self.handle, &other.handle)
    }

    /// Encode with the current format and quality.
    ///
    /// Each read encodes afresh and returns a new `Uint8Array` copy.
    #[wasm_bindgen(getter)]
    pub fn buffer(&self) -> Result<Vec<u8>, JsValue> {
        self.handle.borrow_mut().encode().map_err(to_js)
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> Result<u32, JsValue> {
        self.handle.borrow().width().map_err(to_js)
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> Result<u32, JsValue> {
        self.handle.borrow().height().map_err(to_js)
    }
}

impl Default for JsImage {
    fn default() -> Self {
        Self::new()
    }
}
