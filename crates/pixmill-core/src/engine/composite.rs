//! Blending one raster onto another.
//!
//! Colors are handled as straight (non-premultiplied) RGBA in 0.0-1.0.
//!
//! - Porter-Duff operators (Over, In, Out, Atop, Xor) use the textbook formulas
//! - Separable and HSL blend modes compute a blended color `B(Sc, Dc)` and
//!   then composite it Over: `Ra = Sa + Da - Sa*Da`,
//!   `Rc = ((1-Da)*Sa*Sc + (1-Sa)*Da*Dc + Sa*Da*B) / Ra`
//! - Copy* operators replace channels outright

use image::{Rgba, RgbaImage};

use super::{CompositeOperator, EngineError, Pixels};

/// Displacement, in pixels, produced by a full-scale displacement map value.
const DISPLACE_SCALE: f32 = 10.0;

/// Channel difference above which Threshold takes the overlay color.
const THRESHOLD: f32 = 0.0;

type Color = [f32; 4];

/// Blend `overlay` onto `dst` with its top-left corner at (`x`, `y`).
///
/// Writes into `dst`; `overlay` is only read. Offsets may be negative and the
/// overlay is clipped to the destination.
pub fn composite(
    dst: &mut Pixels,
    operator: CompositeOperator,
    overlay: &Pixels,
    x: i64,
    y: i64,
) -> Result<(), EngineError> {
    if overlay.width() == 0 || overlay.height() == 0 {
        return Err(EngineError::new("composite image has no pixels"));
    }
    if operator == CompositeOperator::None {
        return Ok(());
    }

    let (Some(columns), Some(rows)) = (
        overlap(x, overlay.width(), dst.width()),
        overlap(y, overlay.height(), dst.height()),
    ) else {
        return Ok(());
    };

    // Displacement reads neighbours, so it must see the unmodified destination.
    let original = match operator {
        CompositeOperator::Displace => Some(dst.image().clone()),
        _ => None,
    };

    let source = overlay.image();
    let target = dst.image_mut();

    for dy in rows {
        let oy = (i64::from(dy) - y) as u32;
        for dx in columns.clone() {
            let ox = (i64::from(dx) - x) as u32;
            let s = unit(*source.get_pixel(ox, oy));
            let result = match &original {
                Some(original) => displace(original, dx, dy, s),
                None => blend(operator, s, unit(*target.get_pixel(dx, dy))),
            };
            target.put_pixel(dx, dy, quantize(result));
        }
    }

    Ok(())
}

/// Destination span covered by an overlay of `len` pixels placed at `offset`
/// on an axis of `extent` pixels, or `None` when they do not meet.
fn overlap(offset: i64, len: u32, extent: u32) -> Option<std::ops::Range<u32>> {
    let start = offset.max(0);
    let end = offset.saturating_add(i64::from(len)).min(i64::from(extent));
    if start >= end {
        return None;
    }
    Some(start as u32..end as u32)
}

fn blend(operator: CompositeOperator, s: Color, d: Color) -> Color {
    use CompositeOperator as Op;

    let (sa, da) = (s[3], d[3]);
    match operator {
        Op::Undefined | Op::Over | Op::Dissolve => over(s, d),
        Op::In => with_alpha(s, sa * da),
        Op::Out => with_alpha(s, sa * (1.0 - da)),
        Op::Atop => {
            let mix = |i: usize| s[i] * sa + d[i] * (1.0 - sa);
            [mix(0), mix(1), mix(2), da]
        }
        Op::Xor => {
            let ra = sa * (1.0 - da) + da * (1.0 - sa);
            if ra <= 0.0 {
                return [0.0; 4];
            }
            let mix = |i: usize| (s[i] * sa * (1.0 - da) + d[i] * da * (1.0 - sa)) / ra;
            [mix(0), mix(1), mix(2), ra]
        }
        Op::Copy => s,
        Op::Clear => [0.0; 4],
        Op::None => d,
        Op::CopyRed | Op::CopyCyan => [s[0], d[1], d[2], da],
        Op::CopyGreen | Op::CopyMagenta => [d[0], s[1], d[2], da],
        Op::CopyBlue | Op::CopyYellow => [d[0], d[1], s[2], da],
        Op::CopyOpacity => [d[0], d[1], d[2], sa],
        Op::CopyBlack => copy_black(s, d),
        Op::Plus => separable(s, d, |sc, dc| (sc + dc).min(1.0)),
        Op::Minus => separable(s, d, |sc, dc| (dc - sc).max(0.0)),
        Op::Add => separable(s, d, |sc, dc| wrap(to_byte(sc) + to_byte(dc))),
        Op::Subtract => separable(s, d, |sc, dc| wrap(to_byte(dc) - to_byte(sc))),
        Op::Difference => separable(s, d, |sc, dc| (sc - dc).abs()),
        Op::Multiply => separable(s, d, |sc, dc| sc * dc),
        Op::Bumpmap => {
            let intensity = luminance(s);
            separable(s, d, |_, dc| dc * intensity)
        }
        Op::Darken => separable(s, d, f32::min),
        Op::Lighten => separable(s, d, f32::max),
        Op::Screen => separable(s, d, |sc, dc| sc + dc - sc * dc),
        Op::Overlay => separable(s, d, |sc, dc| {
            if dc <= 0.5 {
                2.0 * sc * dc
            } else {
                1.0 - 2.0 * (1.0 - sc) * (1.0 - dc)
            }
        }),
        Op::Divide => separable(s, d, |sc, dc| {
            if sc <= 0.0 {
                1.0
            } else {
                (dc / sc).min(1.0)
            }
        }),
        Op::Threshold => separable(s, d, |sc, dc| if (sc - dc).abs() > THRESHOLD { sc } else { dc }),
        Op::Hue => hsl_blend(s, d, |(sh, _, _), (_, ds, dl)| (sh, ds, dl)),
        Op::Saturate => hsl_blend(s, d, |(_, ss, _), (dh, _, dl)| (dh, ss, dl)),
        Op::Colorize => hsl_blend(s, d, |(sh, ss, _), (_, _, dl)| (sh, ss, dl)),
        Op::Luminize => hsl_blend(s, d, |(_, _, sl), (dh, ds, _)| (dh, ds, sl)),
        Op::Modulate => {
            let shift = luminance(s) - 0.5;
            hsl_blend(s, d, |_, (dh, ds, dl)| (dh, ds, (dl + shift).clamp(0.0, 1.0)))
        }
        // Handled by the caller, which needs neighbouring destination pixels.
        Op::Displace => d,
    }
}

/// Porter-Duff source-over.
fn over(s: Color, d: Color) -> Color {
    let (sa, da) = (s[3], d[3]);
    let ra = sa + da * (1.0 - sa);
    if ra <= 0.0 {
        return [0.0; 4];
    }
    let mix = |i: usize| (s[i] * sa + d[i] * da * (1.0 - sa)) / ra;
    [mix(0), mix(1), mix(2), ra]
}

/// Composite a per-channel blended color Over the destination.
fn separable(s: Color, d: Color, f: impl Fn(f32, f32) -> f32) -> Color {
    let blended = [f(s[0], d[0]), f(s[1], d[1]), f(s[2], d[2])];
    mix_blended(s, d, blended)
}

fn hsl_blend(
    s: Color,
    d: Color,
    f: impl Fn((f32, f32, f32), (f32, f32, f32)) -> (f32, f32, f32),
) -> Color {
    let (h, sat, l) = f(rgb_to_hsl(s), rgb_to_hsl(d));
    mix_blended(s, d, hsl_to_rgb(h, sat, l))
}

fn mix_blended(s: Color, d: Color, blended: [f32; 3]) -> Color {
    let (sa, da) = (s[3], d[3]);
    let ra = sa + da - sa * da;
    if ra <= 0.0 {
        return [0.0; 4];
    }
    let mix = |i: usize| {
        ((1.0 - da) * sa * s[i] + (1.0 - sa) * da * d[i] + sa * da * blended[i]) / ra
    };
    [mix(0), mix(1), mix(2), ra]
}

/// Replace the destination's black (K) component with the overlay's.
fn copy_black(s: Color, d: Color) -> Color {
    let black = |c: Color| 1.0 - c[0].max(c[1]).max(c[2]);
    let (src_k, dst_k) = (black(s), black(d));
    if dst_k >= 1.0 {
        return [1.0 - src_k, 1.0 - src_k, 1.0 - src_k, d[3]];
    }
    // Keep the destination's CMY ratios, rebuilt against the new K.
    let scale = (1.0 - src_k) / (1.0 - dst_k);
    [d[0] * scale, d[1] * scale, d[2] * scale, d[3]]
}

/// Move destination pixel (`x`, `y`) by the overlay's red/green channels.
fn displace(original: &RgbaImage, x: u32, y: u32, map: Color) -> Color {
    let offset_x = (map[0] - 0.5) * 2.0 * DISPLACE_SCALE;
    let offset_y = (map[1] - 0.5) * 2.0 * DISPLACE_SCALE;
    let max_x = original.width() as f32 - 1.0;
    let max_y = original.height() as f32 - 1.0;
    let sx = (x as f32 + offset_x).round().clamp(0.0, max_x) as u32;
    let sy = (y as f32 + offset_y).round().clamp(0.0, max_y) as u32;
    unit(*original.get_pixel(sx, sy))
}

/// Luminance using ITU-R BT.709 coefficients.
#[inline]
fn luminance(c: Color) -> f32 {
    0.2126 * c[0] + 0.7152 * c[1] + 0.0722 * c[2]
}

#[inline]
fn with_alpha(c: Color, alpha: f32) -> Color {
    [c[0], c[1], c[2], alpha]
}

#[inline]
fn to_byte(v: f32) -> i32 {
    (v * 255.0).round() as i32
}

/// Modular 8-bit arithmetic, as Add and Subtract wrap instead of clamping.
#[inline]
fn wrap(v: i32) -> f32 {
    v.rem_euclid(256) as f32 / 255.0
}

#[inline]
fn unit(pixel: Rgba<u8>) -> Color {
    let [r, g, b, a] = pixel.0;
    [
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        a as f32 / 255.0,
    ]
}

#[inline]
fn quantize(c: Color) -> Rgba<u8> {
    let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgba([q(c[0]), q(c[1]), q(c[2]), q(c[3])])
}

fn rgb_to_hsl(c: Color) -> (f32, f32, f32) {
    let (r, g, b) = (c[0], c[1], c[2]);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let delta = max - min;
    if delta <= f32::EPSILON {
        return (0.0, 0.0, l);
    }

    let s = if l > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };
    let h = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    (h / 6.0, s, l)
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    if s <= f32::EPSILON {
        return [l, l, l];
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let channel = |t: f32| {
        let t = t.rem_euclid(1.0);
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    };
    [channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0)]
}
