//! ASCII renderer module for converting bitmaps to text.
//!
//! The pipeline has three small steps:
//!
//! 1. **Stride resolution** - clamp the requested quality to a pixel step
//! 2. **Sampling** - read every `stride`-th pixel of every `stride`-th row
//! 3. **Glyph mapping** - brightness-ranked glyph, or a colored marker span
//!
//! # Glyph modes
//!
//! - `Monochrome` - 10-level ramp from `@` (dark) to space (bright)
//! - `Color` - `#` wrapped in `<span style="color: rgb(r,g,b)">`

mod mapping;
mod ramp;
mod sampler;
mod stride;

pub use mapping::{glyph_for, push_color_marker, ramp_index, MAX_BRIGHTNESS};
pub use ramp::{GlyphMode, GLYPH_RAMP, MARKER_GLYPH};
pub use sampler::{progress_percent, render, sample_count};
pub use stride::{
    effective_stride, COLOR_QUALITY_OFFSET, DEFAULT_QUALITY, MAX_QUALITY, MIN_QUALITY,
};
