//! Subcommand handlers for convert and config actions.

use std::io::Write;
use std::path::{Path, PathBuf};

use super::args::{ConfigAction, ConvertArgs};
use crate::bitmap::{self, LoadError};
use crate::config::{self, Config, ConfigError};
use crate::converter::{AsciiConverter, ConversionConfig, ConvertError};
use crate::export::{self, ExportError, ExportFormat, Session};

/// Errors surfaced by the command handlers.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Settings for one `convert` run after merging CLI args and config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertSettings {
    pub conversion: ConversionConfig,
    pub format: ExportFormat,
    pub font_size: u32,
}

impl ConvertSettings {
    /// Merge settings: CLI args > config file > built-in defaults.
    pub fn resolve(args: &ConvertArgs, cfg: &Config) -> Self {
        let quality = args.quality.unwrap_or(cfg.convert.quality);
        let color = args.color || cfg.convert.color;
        let format = args.format.map(ExportFormat::from).unwrap_or(cfg.export.format);
        let font_size = export::clamp_font_size(args.font_size.unwrap_or(cfg.export.font_size));

        Self {
            conversion: ConversionConfig::new(quality, color),
            format,
            font_size,
        }
    }
}

/// Load the config file.
///
/// An explicit `--config` path must exist and parse. The default path is
/// optional, and a broken default file falls back to built-in settings.
pub fn load_config(path: Option<&Path>) -> Result<Config, CliError> {
    match path {
        Some(path) => Ok(Config::load_explicit(path)?),
        None => match Config::load(None) {
            Ok(cfg) => Ok(cfg),
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Ok(Config::default())
            }
        },
    }
}

/// Redraws a single progress line on stderr.
struct ProgressLine {
    label: String,
    last: Option<u8>,
}

impl ProgressLine {
    fn new(image: &Path) -> Self {
        let label = image
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| image.display().to_string());
        Self { label, last: None }
    }

    fn update(&mut self, percent: u8) {
        if self.last == Some(percent) {
            return;
        }
        self.last = Some(percent);
        eprint!("\rConverting {}: {:>3}%", self.label, percent);
    }

    fn finish(&self, ok: bool) {
        let status = if ok { "done" } else { "failed" };
        eprintln!("\rConverting {}: {}", self.label, status);
    }
}

/// Load, convert and export one image.
pub fn run_convert(args: &ConvertArgs, config_path: Option<&Path>) -> Result<(), CliError> {
    let cfg = load_config(config_path)?;
    let settings = ConvertSettings::resolve(args, &cfg);

    let bitmap = bitmap::load(&args.image)?;

    let handle = AsciiConverter::new(settings.conversion).spawn(bitmap);
    let outcome = if args.quiet {
        handle.wait()
    } else {
        let mut progress = ProgressLine::new(&args.image);
        let outcome = handle.wait_with_progress(|p| progress.update(p));
        progress.finish(outcome.is_ok());
        outcome
    };

    let mut session = Session::new();
    session.complete(outcome?);
    session.set_font_size(settings.font_size);

    match &args.output {
        Some(path) => session.export(settings.format, path)?,
        None => {
            if let Some(result) = session.result() {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(result.encoded(settings.format).as_bytes())?;
                stdout.flush()?;
            }
        }
    }
    Ok(())
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: &ConfigAction, config_path: Option<&Path>) -> Result<(), CliError> {
    let path: PathBuf = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(config::default_path);

    match action {
        ConfigAction::Show => {
            let cfg = load_config(config_path)?;
            let conversion = ConversionConfig::new(cfg.convert.quality, cfg.convert.color);
            println!("Current configuration:");
            println!("  Quality: {}", cfg.convert.quality);
            println!("  Color: {}", if cfg.convert.color { "yes" } else { "no" });
            println!("  Effective stride: {}", conversion.effective_stride());
            println!("  Format: {}", cfg.export.format.name());
            println!("  Font size: {}px", export::clamp_font_size(cfg.export.font_size));
            println!();

            if path.exists() {
                println!("Config file: {} (exists)", path.display());
            } else {
                println!("Config file: {} (not found)", path.display());
            }
        }
        ConfigAction::Init => {
            config::init(&path)?;
            println!("Created config file: {}", path.display());
        }
    }
    Ok(())
}
