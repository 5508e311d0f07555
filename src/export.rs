//! Derived encodings of a conversion and writing them to disk.
//!
//! The sampling loop produces a single primary text. For color runs that text
//! is a sequence of `<span style="color: rgb(r,g,b)">#</span>` units; for
//! monochrome runs it is bare glyphs. Three views are derived from it:
//!
//! - **plain** - every tag removed
//! - **html** - primary wrapped in a monospace `<pre>` block
//! - **ansi** - color spans replaced by 24-bit foreground escapes

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::converter::ConversionResult;

/// Default HTML font size in pixels.
pub const DEFAULT_FONT_SIZE: u32 = 12;

/// Smallest HTML font size in pixels.
pub const MIN_FONT_SIZE: u32 = 6;

/// Largest HTML font size in pixels.
pub const MAX_FONT_SIZE: u32 = 30;

/// ANSI reset sequence.
pub const ANSI_RESET: &str = "\x1b[0m";

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

static COLOR_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<span style="color: rgb\((\d{1,3}),(\d{1,3}),(\d{1,3})\)">([^<]*)</span>"#)
        .expect("valid color span regex")
});

/// Export encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Glyphs only
    #[default]
    Plain,
    /// Monospace `<pre>` block with colored spans
    Html,
    /// Terminal text with 24-bit color escapes
    Ansi,
}

impl ExportFormat {
    pub fn name(&self) -> &'static str {
        match self {
            ExportFormat::Plain => "plain",
            ExportFormat::Html => "html",
            ExportFormat::Ansi => "ansi",
        }
    }

    /// Conventional file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Plain => "txt",
            ExportFormat::Html => "html",
            ExportFormat::Ansi => "ans",
        }
    }
}

/// Errors that can occur when exporting.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Nothing to export yet: no conversion has completed")]
    NothingToExport,

    #[error("Failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Remove every markup tag, keeping the text between tags.
pub fn strip_markup(text: &str) -> String {
    TAG.replace_all(text, "").into_owned()
}

/// Clamp a font size to the supported range.
pub fn clamp_font_size(font_size: u32) -> u32 {
    font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

/// Wrap primary text in a monospace preformatted block.
pub fn to_html(primary: &str, font_size: u32) -> String {
    format!(
        "<pre style='font-family: monospace; font-size:{}px;'>{}</pre>",
        clamp_font_size(font_size),
        primary
    )
}

/// Turn color spans into ANSI 24-bit foreground escapes.
///
/// Each `<span style="color: rgb(r,g,b)">#</span>` becomes
/// `ESC[38;2;r;g;bm#ESC[0m`. Any other tag is dropped.
pub fn to_ansi(primary: &str) -> String {
    let colored = COLOR_SPAN.replace_all(primary, |caps: &regex::Captures<'_>| {
        format!(
            "\x1b[38;2;{};{};{}m{}{}",
            &caps[1], &caps[2], &caps[3], &caps[4], ANSI_RESET
        )
    });
    strip_markup(&colored)
}

/// Write `text` to `path`, replacing any existing file.
pub fn write_text(text: &str, path: &Path) -> Result<(), ExportError> {
    std::fs::write(path, text).map_err(|e| ExportError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Holds the most recent completed conversion for exporting.
///
/// A failed export leaves the held result untouched so it can be retried.
#[derive(Debug, Default)]
pub struct Session {
    last: Option<ConversionResult>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held result with a newly completed one.
    pub fn complete(&mut self, result: ConversionResult) {
        self.last = Some(result);
    }

    pub fn result(&self) -> Option<&ConversionResult> {
        self.last.as_ref()
    }

    pub fn has_result(&self) -> bool {
        self.last.is_some()
    }

    /// Re-render the held HTML at another font size. No-op when empty.
    pub fn set_font_size(&mut self, font_size: u32) {
        if let Some(result) = self.last.as_mut() {
            result.set_font_size(font_size);
        }
    }

    /// Write one encoding of the held result to `path`.
    pub fn export(&self, format: ExportFormat, path: &Path) -> Result<(), ExportError> {
        let result = self.last.as_ref().ok_or(ExportError::NothingToExport)?;
        result.export(format, path)
    }
}
