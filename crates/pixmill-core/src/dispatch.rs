//! Name-based dispatch of image operations from a dynamically-typed host.
//!
//! The host adapter resolves a method name to an [`Operation`], converts its
//! arguments to [`Arg`]s and calls [`dispatch`]. All argument validation
//! happens before any engine work, so a bad call never produces a partial
//! result.

use std::fmt;
use std::str::FromStr;

use crate::args::{self, Arg};
use crate::engine::{AffineMatrix, CompositeOperator, FilterKind};
use crate::error::ImageError;
use crate::handle::ImageHandle;

/// Every method an image exposes to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Thumbnail,
    Sample,
    Scale,
    Resize,
    Chop,
    Crop,
    Extent,
    Flip,
    Flop,
    AffineTransform,
    Rotate,
    Format,
    Quality,
    Shear,
    Contrast,
    Equalize,
    Gamma,
    Level,
    LevelChannel,
    Modulate,
    Negate,
    Normalize,
    Attribute,
    Composite,
}

impl Operation {
    pub const ALL: [Operation; 24] = [
        Operation::Thumbnail,
        Operation::Sample,
        Operation::Scale,
        Operation::Resize,
        Operation::Chop,
        Operation::Crop,
        Operation::Extent,
        Operation::Flip,
        Operation::Flop,
        Operation::AffineTransform,
        Operation::Rotate,
        Operation::Format,
        Operation::Quality,
        Operation::Shear,
        Operation::Contrast,
        Operation::Equalize,
        Operation::Gamma,
        Operation::Level,
        Operation::LevelChannel,
        Operation::Modulate,
        Operation::Negate,
        Operation::Normalize,
        Operation::Attribute,
        Operation::Composite,
    ];

    /// The host method name.
    pub fn name(self) -> &'static str {
        match self {
            Operation::Thumbnail => "thumbnail",
            Operation::Sample => "sample",
            Operation::Scale => "scale",
            Operation::Resize => "resize",
            Operation::Chop => "chop",
            Operation::Crop => "crop",
            Operation::Extent => "extent",
            Operation::Flip => "flip",
            Operation::Flop => "flop",
            Operation::AffineTransform => "affineTransform",
            Operation::Rotate => "rotate",
            Operation::Format => "format",
            Operation::Quality => "quality",
            Operation::Shear => "shear",
            Operation::Contrast => "contrast",
            Operation::Equalize => "equalize",
            Operation::Gamma => "gamma",
            Operation::Level => "level",
            Operation::LevelChannel => "levelChannel",
            Operation::Modulate => "modulate",
            Operation::Negate => "negate",
            Operation::Normalize => "normalize",
            Operation::Attribute => "attribute",
            Operation::Composite => "composite",
        }
    }

    /// Check if the operation is exposed but has no engine call behind it.
    ///
    /// Inert operations accept any arguments, change nothing and return
    /// nothing.
    pub fn is_inert(self) -> bool {
        matches!(
            self,
            Operation::Contrast
                | Operation::Equalize
                | Operation::Gamma
                | Operation::Level
                | Operation::LevelChannel
                | Operation::Modulate
                | Operation::Negate
                | Operation::Normalize
                | Operation::Attribute
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = ImageError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .iter()
            .copied()
            .find(|op| op.name() == name)
            .ok_or_else(|| ImageError::UnknownOperation(name.to_owned()))
    }
}

/// What a dispatched operation hands back to the host.
#[derive(Debug)]
pub enum Dispatched {
    /// A new handle owning the operation's output.
    Created(ImageHandle),
    /// The receiver itself, for chaining.
    Receiver,
    /// No value.
    Nothing,
}

impl Dispatched {
    /// Take the created handle, if any.
    pub fn into_created(self) -> Option<ImageHandle> {
        match self {
            Dispatched::Created(handle) => Some(handle),
            _ => None,
        }
    }
}

/// Run `operation` on `receiver` with host arguments.
///
/// # Errors
///
/// Argument errors are reported before the receiver is inspected; after
/// that, the handle and engine errors of the typed operation apply.
pub fn dispatch(
    receiver: &mut ImageHandle,
    operation: Operation,
    args: &[Arg<'_>],
) -> Result<Dispatched, ImageError> {
    if log::log_enabled!(log::Level::Debug) {
        let types: Vec<_> = args.iter().map(Arg::type_name).collect();
        log::debug!("dispatch {} with ({})", operation, types.join(", "));
    }

    let created = match operation {
        Operation::Thumbnail => {
            let (width, height) = size(args)?;
            receiver.thumbnail(width, height)?
        }
        Operation::Sample => {
            let (width, height) = size(args)?;
            receiver.sample(width, height)?
        }
        Operation::Scale => {
            let (width, height) = size(args)?;
            receiver.scale(width, height)?
        }
        Operation::Resize => {
            let (width, height) = size(args)?;
            let filter = filter(args, 2)?;
            let blur = args::optional_number(args, 3, 1.0)?;
            receiver.resize(width, height, filter, blur)?
        }
        Operation::Chop => receiver.chop(&args::rectangle(args, 0)?)?,
        Operation::Crop => receiver.crop(&args::rectangle(args, 0)?)?,
        Operation::Extent => receiver.extent(&args::rectangle(args, 0)?)?,
        Operation::Flip => receiver.flip()?,
        Operation::Flop => receiver.flop()?,
        Operation::AffineTransform => receiver.affine_transform(&AffineMatrix::default())?,
        Operation::Rotate => receiver.rotate(args::required_number(args, 0)?)?,
        Operation::Shear => {
            let x_shear = args::required_number(args, 0)?;
            let y_shear = args::required_number(args, 1)?;
            receiver.shear(x_shear, y_shear)?
        }
        Operation::Format => {
            receiver.set_format(args::required_str(args, 0)?);
            return Ok(Dispatched::Receiver);
        }
        Operation::Quality => {
            receiver.set_quality(args::quality(args, 0)?);
            return Ok(Dispatched::Receiver);
        }
        Operation::Composite => {
            let overlay = args::required_image(args, 0)?;
            let operator = composite_operator(args, 1)?;
            let x = args::optional_offset(args, 2)?;
            let y = args::optional_offset(args, 3)?;
            receiver.composite(overlay, operator, i64::from(x), i64::from(y))?;
            return Ok(Dispatched::Receiver);
        }
        op => {
            debug_assert!(op.is_inert(), "{} has no dispatch arm", op);
            return Ok(Dispatched::Nothing);
        }
    };
    Ok(Dispatched::Created(created))
}

/// Resolve `name` and dispatch it.
pub fn invoke(
    receiver: &mut ImageHandle,
    name: &str,
    args: &[Arg<'_>],
) -> Result<Dispatched, ImageError> {
    dispatch(receiver, name.parse()?, args)
}

fn size(args: &[Arg<'_>]) -> Result<(u32, u32), ImageError> {
    Ok((args::dimension(args, 0)?, args::dimension(args, 1)?))
}

fn filter(args: &[Arg<'_>], index: usize) -> Result<FilterKind, ImageError> {
    let value = args::optional_int(args, index, i64::from(FilterKind::default().value()))?;
    FilterKind::from_value(value)
        .ok_or_else(|| ImageError::out_of_range(index, format!("unknown filter {}", value)))
}

fn composite_operator(args: &[Arg<'_>], index: usize) -> Result<CompositeOperator, ImageError> {
    let value = args::required_int(args, index)?;
    CompositeOperator::from_value(value).ok_or_else(|| {
        ImageError::out_of_range(index, format!("unknown composite operator {}", value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode;
    use crate::test_support::{gradient, png_bytes};
    use image::{Rgba, RgbaImage};

    fn ints(values: &[i64]) -> Vec<Arg<'static>> {
        values.iter().map(|v| Arg::Int(*v)).collect()
    }

    fn created(result: Result<Dispatched, ImageError>) -> ImageHandle {
        result.unwrap().into_created().expect("expected a new handle")
    }

    #[test]
    fn test_operation_names_round_trip() {
        for op in Operation::ALL {
            assert_eq!(op.name().parse::<Operation>().unwrap(), op);
        }
        assert!(matches!(
            "sepia".parse::<Operation>(),
            Err(ImageError::UnknownOperation(_))
        ));
        // Names are case-sensitive, as on the host.
        assert!("AffineTransform".parse::<Operation>().is_err());
    }

    #[test]
    fn test_resize_family() {
        let mut img = gradient(40, 30);
        for name in ["thumbnail", "sample", "scale", "resize"] {
            let out = created(invoke(&mut img, name, &ints(&[20, 10])));
            assert_eq!(out.width().unwrap(), 20, "{}", name);
            assert_eq!(out.height().unwrap(), 10, "{}", name);
        }
        assert_eq!(img.width().unwrap(), 40);
    }

    #[test]
    fn test_resize_optional_args() {
        let mut img = gradient(16, 16);
        let args = [Arg::Int(8), Arg::Int(8), Arg::Int(1), Arg::Number(1.5)];
        let out = created(invoke(&mut img, "resize", &args));
        assert_eq!(out.width().unwrap(), 8);

        let bad_filter = ints(&[8, 8, 99]);
        assert!(matches!(
            invoke(&mut img, "resize", &bad_filter),
            Err(ImageError::ArgumentOutOfRange { index: 2, .. })
        ));

        let bad_blur = [Arg::Int(8), Arg::Int(8), Arg::Int(13), Arg::Str("x".into())];
        assert!(matches!(
            invoke(&mut img, "resize", &bad_blur),
            Err(ImageError::InvalidArgument { index: 3, .. })
        ));
    }

    #[test]
    fn test_missing_or_wrong_arguments_fail_before_engine() {
        let mut empty = ImageHandle::create_empty();
        // Argument errors win over the empty handle.
        assert!(matches!(
            invoke(&mut empty, "thumbnail", &ints(&[10])),
            Err(ImageError::InvalidArgument { index: 1, .. })
        ));
        assert!(matches!(
            invoke(&mut empty, "crop", &[Arg::Int(0), Arg::Number(0.5)]),
            Err(ImageError::InvalidArgument { index: 1, .. })
        ));
        assert!(matches!(
            invoke(&mut empty, "rotate", &[]),
            Err(ImageError::InvalidArgument { index: 0, .. })
        ));
        assert!(matches!(
            invoke(&mut empty, "scale", &ints(&[-1, 4])),
            Err(ImageError::ArgumentOutOfRange { index: 0, .. })
        ));
    }

    #[test]
    fn test_empty_handle_fails_for_every_transform() {
        let mut empty = ImageHandle::create_empty();
        let cases: Vec<(&str, Vec<Arg<'static>>)> = vec![
            ("thumbnail", ints(&[1, 1])),
            ("sample", ints(&[1, 1])),
            ("scale", ints(&[1, 1])),
            ("resize", ints(&[1, 1])),
            ("chop", ints(&[0, 0, 1, 1])),
            ("crop", ints(&[0, 0, 1, 1])),
            ("extent", ints(&[0, 0, 1, 1])),
            ("flip", vec![]),
            ("flop", vec![]),
            ("affineTransform", vec![]),
            ("rotate", vec![Arg::Number(45.0)]),
            ("shear", vec![Arg::Number(10.0), Arg::Number(0.0)]),
        ];
        for (name, args) in cases {
            assert!(
                matches!(invoke(&mut empty, name, &args), Err(ImageError::InvalidHandle)),
                "{}",
                name
            );
        }
    }

    #[test]
    fn test_rectangle_operations() {
        let mut img = gradient(20, 10);
        let crop = created(invoke(&mut img, "crop", &ints(&[2, 3, 5, 4])));
        assert_eq!((crop.width().unwrap(), crop.height().unwrap()), (5, 4));
        assert_eq!(
            crop.rgba().unwrap().get_pixel(0, 0),
            img.rgba().unwrap().get_pixel(2, 3)
        );

        let chop = created(invoke(&mut img, "chop", &ints(&[0, 0, 5, 2])));
        assert_eq!((chop.width().unwrap(), chop.height().unwrap()), (15, 8));

        let extent = created(invoke(&mut img, "extent", &ints(&[0, 0, 30, 12])));
        assert_eq!((extent.width().unwrap(), extent.height().unwrap()), (30, 12));
    }

    #[test]
    fn test_mirrors_and_affine() {
        let mut img = gradient(7, 3);
        let flipped = created(invoke(&mut img, "flip", &[]));
        let flopped = created(invoke(&mut img, "flop", &[]));
        assert_eq!(
            flipped.rgba().unwrap().get_pixel(0, 0),
            img.rgba().unwrap().get_pixel(0, 2)
        );
        assert_eq!(
            flopped.rgba().unwrap().get_pixel(0, 0),
            img.rgba().unwrap().get_pixel(6, 0)
        );

        // The identity matrix reproduces the input.
        let same = created(invoke(&mut img, "affineTransform", &[]));
        assert_eq!(same.rgba().unwrap(), img.rgba().unwrap());
    }

    #[test]
    fn test_rotate_and_shear() {
        let mut img = gradient(10, 4);
        let rotated = created(invoke(&mut img, "rotate", &ints(&[90])));
        assert_eq!((rotated.width().unwrap(), rotated.height().unwrap()), (4, 10));

        let sheared = created(invoke(
            &mut img,
            "shear",
            &[Arg::Number(20.0), Arg::Int(0)],
        ));
        assert!(sheared.width().unwrap() > 10);
        assert_eq!(sheared.height().unwrap(), 4);

        assert!(matches!(
            invoke(&mut img, "shear", &[Arg::Number(90.0), Arg::Int(0)]),
            Err(ImageError::Engine { operation: "shear", .. })
        ));
    }

    #[test]
    fn test_format_and_quality_return_receiver() {
        let mut img = gradient(2, 2);
        assert!(matches!(
            invoke(&mut img, "format", &[Arg::Str("JPEG".into())]),
            Ok(Dispatched::Receiver)
        ));
        assert!(matches!(
            invoke(&mut img, "quality", &ints(&[80])),
            Ok(Dispatched::Receiver)
        ));
        assert_eq!(img.format(), Some("JPEG"));
        assert_eq!(img.quality(), 80);

        assert!(matches!(
            invoke(&mut img, "format", &ints(&[1])),
            Err(ImageError::InvalidArgument { index: 0, .. })
        ));
        assert!(matches!(
            invoke(&mut img, "quality", &ints(&[101])),
            Err(ImageError::ArgumentOutOfRange { .. })
        ));
        assert_eq!(img.quality(), 80);
    }

    #[test]
    fn test_inert_operations_change_nothing() {
        let mut img = gradient(5, 5);
        img.set_format("PNG");
        let before = img.clone();
        let junk = [Arg::Str("x".into()), Arg::Number(f64::NAN), Arg::Other];
        for op in Operation::ALL.into_iter().filter(|op| op.is_inert()) {
            assert!(matches!(
                dispatch(&mut img, op, &junk),
                Ok(Dispatched::Nothing)
            ));
        }
        assert_eq!(img.rgba().unwrap(), before.rgba().unwrap());
        assert_eq!(img.format(), Some("PNG"));
        assert_eq!(img.quality(), before.quality());

        // Even on an empty handle.
        let mut empty = ImageHandle::create_empty();
        assert!(matches!(
            invoke(&mut empty, "normalize", &[]),
            Ok(Dispatched::Nothing)
        ));
    }

    #[test]
    fn test_inert_set() {
        let inert: Vec<_> = Operation::ALL
            .into_iter()
            .filter(|op| op.is_inert())
            .map(Operation::name)
            .collect();
        assert_eq!(
            inert,
            [
                "contrast",
                "equalize",
                "gamma",
                "level",
                "levelChannel",
                "modulate",
                "negate",
                "normalize",
                "attribute"
            ]
        );
    }

    #[test]
    fn test_composite_dispatch() {
        let mut base = ImageHandle::from_rgba(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255])));
        let overlay = ImageHandle::from_rgba(RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255])));

        let args = [
            Arg::Image(&overlay),
            Arg::Int(i64::from(CompositeOperator::Over.value())),
            Arg::Int(1),
            Arg::Int(1),
        ];
        assert!(matches!(
            dispatch(&mut base, Operation::Composite, &args),
            Ok(Dispatched::Receiver)
        ));
        assert_eq!(base.width().unwrap(), 4);
        assert_eq!(base.rgba().unwrap().get_pixel(1, 1).0, [255, 255, 255, 255]);
        assert_eq!(base.rgba().unwrap().get_pixel(0, 0).0, [0, 0, 0, 255]);

        // x and y default to 0.
        let args = [Arg::Image(&overlay), Arg::Int(1)];
        dispatch(&mut base, Operation::Composite, &args).unwrap();
        assert_eq!(base.rgba().unwrap().get_pixel(0, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_composite_argument_errors() {
        let mut base = gradient(4, 4);
        let overlay = gradient(2, 2);
        assert!(matches!(
            invoke(&mut base, "composite", &ints(&[1, 1])),
            Err(ImageError::InvalidArgument { index: 0, .. })
        ));
        assert!(matches!(
            invoke(&mut base, "composite", &[Arg::Image(&overlay)]),
            Err(ImageError::InvalidArgument { index: 1, .. })
        ));
        assert!(matches!(
            invoke(&mut base, "composite", &[Arg::Image(&overlay), Arg::Int(500)]),
            Err(ImageError::ArgumentOutOfRange { index: 1, .. })
        ));
        assert!(matches!(
            invoke(
                &mut base,
                "composite",
                &[Arg::Image(&overlay), Arg::Int(1), Arg::Number(0.5)]
            ),
            Err(ImageError::InvalidArgument { index: 2, .. })
        ));
    }

    #[test]
    fn test_composite_offsets_out_of_range() {
        let mut base = gradient(4, 4);
        let overlay = gradient(2, 2);
        let before = base.rgba().unwrap().clone();
        let cases = [
            (2, i64::MAX, 0),
            (2, i64::MIN, 0),
            (3, 0, i64::MAX),
            (3, 0, i64::MIN),
        ];
        for (index, x, y) in cases {
            let args = [Arg::Image(&overlay), Arg::Int(1), Arg::Int(x), Arg::Int(y)];
            match dispatch(&mut base, Operation::Composite, &args) {
                Err(ImageError::ArgumentOutOfRange { index: got, .. }) => assert_eq!(got, index),
                other => panic!("offset ({}, {}) gave {:?}", x, y, other),
            }
        }
        assert_eq!(base.rgba().unwrap(), &before);

        // Far but in range: clipped away, receiver unchanged.
        let args = [
            Arg::Image(&overlay),
            Arg::Int(1),
            Arg::Int(i64::from(i32::MAX)),
            Arg::Int(i64::from(i32::MIN)),
        ];
        dispatch(&mut base, Operation::Composite, &args).unwrap();
        assert_eq!(base.rgba().unwrap(), &before);
    }

    #[test]
    fn test_full_scenario() {
        let mut img = decode(&png_bytes(100, 100)).unwrap();
        let mut small = created(invoke(&mut img, "resize", &ints(&[50, 50])));
        assert_eq!(small.width().unwrap(), 50);
        assert_eq!(small.height().unwrap(), 50);

        invoke(&mut small, "format", &[Arg::Str("JPEG".into())]).unwrap();
        invoke(&mut small, "quality", &ints(&[80])).unwrap();
        let bytes = small.encode().unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(&bytes[0..3], &[0xFF, 0xD8, 0xFF]);
    }
}
