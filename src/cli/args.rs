//! CLI argument parsing with clap.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use super::enums::OutputFormat;

/// Convert images to ASCII art
#[derive(Parser, Debug)]
#[command(name = "img2ascii")]
#[command(version, about = "Convert images to ASCII art (plain, HTML or ANSI)", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert an image
    Convert(ConvertArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(ClapArgs, Debug, Default)]
pub struct ConvertArgs {
    /// Image to convert
    pub image: PathBuf,

    /// Sampling step, 1 (finest) to 5 (coarsest)
    #[arg(short, long, allow_negative_numbers = true)]
    pub quality: Option<i32>,

    /// Colored markers instead of brightness glyphs
    #[arg(long)]
    pub color: bool,

    /// Output encoding
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// HTML font size in pixels (6-30)
    #[arg(long)]
    pub font_size: Option<u32>,

    /// Hide the progress indicator
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}
