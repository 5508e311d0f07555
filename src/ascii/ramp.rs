//! Glyph definitions for ASCII rendering.

/// Brightness ramp (10 levels).
/// Characters ordered from densest (`@`, darkest pixels) to sparsest
/// (space, brightest pixels).
pub const GLYPH_RAMP: [char; 10] = ['@', '#', '+', '\\', ';', ':', ',', '.', '`', ' '];

/// Glyph emitted for every sample in color mode.
pub const MARKER_GLYPH: char = '#';

/// How a sampled pixel is turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlyphMode {
    /// Brightness-ranked glyph from [`GLYPH_RAMP`]
    #[default]
    Monochrome,
    /// [`MARKER_GLYPH`] wrapped in an inline color span
    Color,
}

impl GlyphMode {
    pub fn from_color_flag(color: bool) -> Self {
        if color {
            GlyphMode::Color
        } else {
            GlyphMode::Monochrome
        }
    }

    /// Get a human-readable name for the mode.
    pub fn name(&self) -> &'static str {
        match self {
            GlyphMode::Monochrome => "monochrome",
            GlyphMode::Color => "color",
        }
    }

    pub fn is_color(&self) -> bool {
        matches!(self, GlyphMode::Color)
    }
}
