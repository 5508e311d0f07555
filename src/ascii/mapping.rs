//! Pixel to glyph mapping.

use std::fmt::Write;

use super::ramp::{GLYPH_RAMP, MARKER_GLYPH};
use crate::bitmap::Rgb;

/// Largest value of `r + g + b`.
pub const MAX_BRIGHTNESS: u32 = 765;

/// Map a channel sum (0-765) to an index into [`GLYPH_RAMP`].
///
/// Linear quantization into `GLYPH_RAMP.len()` buckets:
/// `round(brightness / (765 / (len - 1)))`. Integer math, rounding half up.
/// 765 * k / 18 is never a half-integer, so this matches the float formula
/// exactly.
#[inline]
pub fn ramp_index(brightness: u16) -> usize {
    let levels = (GLYPH_RAMP.len() - 1) as u32;
    let b = (brightness as u32).min(MAX_BRIGHTNESS);
    ((2 * b * levels + MAX_BRIGHTNESS) / (2 * MAX_BRIGHTNESS)) as usize
}

/// Glyph for a pixel in monochrome mode.
#[inline]
pub fn glyph_for(pixel: Rgb) -> char {
    GLYPH_RAMP[ramp_index(pixel.brightness())]
}

/// Append one color-mode marker unit for `pixel`.
///
/// Produces `<span style="color: rgb(R,G,B)">#</span>`.
pub fn push_color_marker(out: &mut String, pixel: Rgb) {
    // Writing to a String never fails.
    let _ = write!(
        out,
        "<span style=\"color: rgb({},{},{})\">{}</span>",
        pixel.r, pixel.g, pixel.b, MARKER_GLYPH
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_index_extremes() {
        assert_eq!(ramp_index(0), 0);
        assert_eq!(ramp_index(765), 9);
    }

    #[test]
    fn test_ramp_index_matches_float_formula() {
        let step = 765f32 / 9.0;
        for b in 0..=765u16 {
            let expected = (b as f32 / step).round() as usize;
            assert_eq!(ramp_index(b), expected, "brightness {}", b);
        }
    }

    #[test]
    fn test_ramp_index_is_monotonic() {
        let mut last = 0;
        for b in 0..=765u16 {
            let idx = ramp_index(b);
            assert!(idx >= last);
            last = idx;
        }
    }

    #[test]
    fn test_bucket_boundaries() {
        // step is 85: 42 rounds down, 43 rounds up
        assert_eq!(ramp_index(42), 0);
        assert_eq!(ramp_index(43), 1);
        assert_eq!(ramp_index(382), 4);
        assert_eq!(ramp_index(383), 5);
    }

    #[test]
    fn test_glyph_for() {
        assert_eq!(glyph_for(Rgb::new(0, 0, 0)), '@');
        assert_eq!(glyph_for(Rgb::new(255, 255, 255)), ' ');
        assert_eq!(glyph_for(Rgb::new(85, 0, 0)), '#');
    }

    #[test]
    fn test_push_color_marker() {
        let mut out = String::new();
        push_color_marker(&mut out, Rgb::new(12, 0, 255));
        assert_eq!(out, "<span style=\"color: rgb(12,0,255)\">#</span>");
    }
}
