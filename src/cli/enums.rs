//! CLI enum types for the output format option.

use clap::ValueEnum;

use crate::export::ExportFormat;

/// Output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Glyphs only
    #[default]
    Plain,
    /// Monospace HTML block, keeps colors
    Html,
    /// Terminal text with 24-bit colors
    Ansi,
}

impl From<OutputFormat> for ExportFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Plain => ExportFormat::Plain,
            OutputFormat::Html => ExportFormat::Html,
            OutputFormat::Ansi => ExportFormat::Ansi,
        }
    }
}
