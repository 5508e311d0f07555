//! img2ascii library crate.
//!
//! Converts raster images into ASCII art. Monochrome runs map each sampled
//! pixel onto a 10-glyph brightness ramp; color runs emit a `#` marker per
//! sample wrapped in an inline color span, from which HTML and ANSI encodings
//! are derived.
//!
//! ```no_run
//! use img2ascii::{bitmap, AsciiConverter, ConversionConfig};
//!
//! let image = bitmap::load("photo.jpg".as_ref())?;
//! let handle = AsciiConverter::new(ConversionConfig::new(2, false)).spawn(image);
//! let result = handle.wait_with_progress(|p| eprintln!("{}%", p))?;
//! print!("{}", result.plain());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod ascii;
pub mod bitmap;
pub mod cli;
pub mod config;
pub mod converter;
pub mod export;

pub use bitmap::{Bitmap, PixelSource, Rgb};
pub use converter::{
    start_conversion, AsciiConverter, ConversionConfig, ConversionEvent, ConversionHandle,
    ConversionResult, ConvertError,
};
pub use export::{ExportError, ExportFormat, Session};
