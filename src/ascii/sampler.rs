//! Strided sampling loop producing the primary text.

use std::sync::atomic::{AtomicBool, Ordering};

use super::mapping::{glyph_for, push_color_marker};
use super::ramp::GlyphMode;
use crate::bitmap::PixelSource;
use crate::converter::ConvertError;

/// Approximate byte length of one color marker unit.
const COLOR_UNIT_LEN: usize = 48;

/// Number of samples taken along an axis of `len` pixels.
#[inline]
pub fn sample_count(len: u32, stride: u32) -> u32 {
    len.div_ceil(stride.max(1))
}

/// Progress after finishing the sampled row starting at `y`.
///
/// `round(100 * y / height)`, rounding half up.
#[inline]
pub fn progress_percent(y: u32, height: u32) -> u8 {
    if height == 0 {
        return 100;
    }
    let y = y.min(height) as u64;
    let height = height as u64;
    ((200 * y + height) / (2 * height)) as u8
}

/// Walk `source` every `stride` pixels and build the primary text.
///
/// Pixels between samples are never read. After each sampled row a newline is
/// appended and `on_row` receives the row's progress percentage. `stop` is
/// checked before each row; a raised flag ends the run with
/// [`ConvertError::Cancelled`].
///
/// Any pixel read failure aborts the run and no text is returned.
pub fn render<P, F>(
    source: &P,
    stride: u32,
    mode: GlyphMode,
    stop: Option<&AtomicBool>,
    mut on_row: F,
) -> Result<String, ConvertError>
where
    P: PixelSource + ?Sized,
    F: FnMut(u8),
{
    let width = source.width();
    let height = source.height();
    if width == 0 || height == 0 {
        return Err(ConvertError::EmptySource);
    }
    let stride = stride.max(1);

    let cols = sample_count(width, stride) as usize;
    let rows = sample_count(height, stride) as usize;
    let unit = if mode.is_color() { COLOR_UNIT_LEN } else { 1 };
    let mut out = String::with_capacity(rows * (cols * unit + 1));

    for y in (0..height).step_by(stride as usize) {
        if stop.is_some_and(|s| s.load(Ordering::Relaxed)) {
            return Err(ConvertError::Cancelled);
        }
        for x in (0..width).step_by(stride as usize) {
            let pixel = source.pixel(x, y)?;
            match mode {
                GlyphMode::Color => push_color_marker(&mut out, pixel),
                GlyphMode::Monochrome => out.push(glyph_for(pixel)),
            }
        }
        out.push('\n');
        on_row(progress_percent(y, height));
    }

    Ok(out)
}
