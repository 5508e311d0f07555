//! Sampling stride ("quality") normalization.
//!
//! Monochrome strides live in `[1, 5]`. Color mode shifts the whole range up
//! by [`COLOR_QUALITY_OFFSET`]. Values outside the range snap to the midpoint.

use super::ramp::GlyphMode;

/// Lowest accepted base quality.
pub const MIN_QUALITY: i32 = 1;

/// Highest accepted base quality.
pub const MAX_QUALITY: i32 = 5;

/// Quality used when the requested one is out of range.
pub const DEFAULT_QUALITY: i32 = 3;

/// Added to the base quality in color mode.
pub const COLOR_QUALITY_OFFSET: i32 = 6;

/// Resolve a requested quality to the pixel step actually used.
///
/// | mode       | accepted   | fallback |
/// |------------|------------|----------|
/// | monochrome | 1..=5      | 3        |
/// | color      | 7..=11     | 9        |
///
/// In color mode the range check applies to `quality + 6`.
pub fn effective_stride(quality: i32, mode: GlyphMode) -> u32 {
    let offset = if mode.is_color() {
        COLOR_QUALITY_OFFSET
    } else {
        0
    };
    let total = quality.saturating_add(offset);
    let stride = if (MIN_QUALITY + offset..=MAX_QUALITY + offset).contains(&total) {
        total
    } else {
        DEFAULT_QUALITY + offset
    };
    stride as u32
}
