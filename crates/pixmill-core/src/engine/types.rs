//! Enumerations shared with the host as named integer constants.
//!
//! The integer identity of each variant is a compatibility contract: host code
//! persists these values and passes them back in by value. Never reorder.

use serde::{Deserialize, Serialize};

/// Declare a `#[repr(i32)]` enum together with its host constant table.
macro_rules! constant_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal => $constant:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[repr(i32)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $value, )+
        }

        impl $name {
            /// Every variant, in integer order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The integer identity exposed to the host.
            pub fn value(self) -> i32 {
                self as i32
            }

            /// Look up a variant by its integer identity.
            pub fn from_value(value: i64) -> Option<Self> {
                match value {
                    $( $value => Some($name::$variant), )+
                    _ => None,
                }
            }

            /// The host-facing constant name (e.g. `LanczosFilter`).
            pub fn constant_name(self) -> &'static str {
                match self {
                    $( $name::$variant => $constant, )+
                }
            }
        }
    };
}

constant_enum! {
    /// Resampling kernel used by resize.
    pub enum FilterKind {
        /// Engine default (resolves to Lanczos).
        Undefined = 0 => "UndefinedFilter",
        Point = 1 => "PointFilter",
        Box = 2 => "BoxFilter",
        Triangle = 3 => "TriangleFilter",
        Hermite = 4 => "HermiteFilter",
        Hanning = 5 => "HanningFilter",
        Hamming = 6 => "HammingFilter",
        Blackman = 7 => "BlackmanFilter",
        Gaussian = 8 => "GaussianFilter",
        Quadratic = 9 => "QuadraticFilter",
        Cubic = 10 => "CubicFilter",
        Catrom = 11 => "CatromFilter",
        Mitchell = 12 => "MitchellFilter",
        Lanczos = 13 => "LanczosFilter",
        Bessel = 14 => "BesselFilter",
        Sinc = 15 => "SincFilter",
    }
}

impl Default for FilterKind {
    fn default() -> Self {
        FilterKind::Lanczos
    }
}

constant_enum! {
    /// Blend mode used by composite.
    pub enum CompositeOperator {
        Undefined = 0 => "UndefinedCompositeOp",
        Over = 1 => "OverCompositeOp",
        In = 2 => "InCompositeOp",
        Out = 3 => "OutCompositeOp",
        Atop = 4 => "AtopCompositeOp",
        Xor = 5 => "XorCompositeOp",
        Plus = 6 => "PlusCompositeOp",
        Minus = 7 => "MinusCompositeOp",
        Add = 8 => "AddCompositeOp",
        Subtract = 9 => "SubtractCompositeOp",
        Difference = 10 => "DifferenceCompositeOp",
        Multiply = 11 => "MultiplyCompositeOp",
        Bumpmap = 12 => "BumpmapCompositeOp",
        Copy = 13 => "CopyCompositeOp",
        CopyRed = 14 => "CopyRedCompositeOp",
        CopyGreen = 15 => "CopyGreenCompositeOp",
        CopyBlue = 16 => "CopyBlueCompositeOp",
        CopyOpacity = 17 => "CopyOpacityCompositeOp",
        Clear = 18 => "ClearCompositeOp",
        Dissolve = 19 => "DissolveCompositeOp",
        Displace = 20 => "DisplaceCompositeOp",
        Modulate = 21 => "ModulateCompositeOp",
        Threshold = 22 => "ThresholdCompositeOp",
        /// Leaves the destination untouched.
        None = 23 => "NoCompositeOp",
        Darken = 24 => "DarkenCompositeOp",
        Lighten = 25 => "LightenCompositeOp",
        Hue = 26 => "HueCompositeOp",
        Saturate = 27 => "SaturateCompositeOp",
        Colorize = 28 => "ColorizeCompositeOp",
        Luminize = 29 => "LuminizeCompositeOp",
        Screen = 30 => "ScreenCompositeOp",
        Overlay = 31 => "OverlayCompositeOp",
        CopyCyan = 32 => "CopyCyanCompositeOp",
        CopyMagenta = 33 => "CopyMagentaCompositeOp",
        CopyYellow = 34 => "CopyYellowCompositeOp",
        CopyBlack = 35 => "CopyBlackCompositeOp",
        Divide = 36 => "DivideCompositeOp",
    }
}
