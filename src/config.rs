//! Configuration file handling for img2ascii.
//!
//! Loads configuration from `~/.config/img2ascii/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::ascii::DEFAULT_QUALITY;
use crate::export::{ExportFormat, DEFAULT_FONT_SIZE};

/// Default config file written by `config init`.
pub const DEFAULT_CONFIG: &str = r#"# img2ascii configuration

[convert]
# Sampling step, 1 (finest) to 5 (coarsest). Out-of-range values fall back to 3.
# In color mode 6 is added to this value.
quality = 3
# Emit colored markers instead of brightness glyphs
color = false

[export]
# Output encoding: "plain", "html" or "ansi"
format = "plain"
# HTML font size in pixels (6-30)
font_size = 12
"#;

/// Configuration file structure for img2ascii.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub convert: ConvertConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct ConvertConfig {
    #[serde(default = "default_quality")]
    pub quality: i32,
    #[serde(default)]
    pub color: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            color: false,
        }
    }
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct ExportConfig {
    #[serde(default)]
    pub format: ExportFormat,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::default(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

fn default_quality() -> i32 {
    DEFAULT_QUALITY
}

fn default_font_size() -> u32 {
    DEFAULT_FONT_SIZE
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            Self::load_explicit(&path)
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Ok(Config::default())
        }
    }

    /// Load configuration from a path that must exist.
    pub fn load_explicit(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}

/// Write [`DEFAULT_CONFIG`] to `path`, creating parent directories.
/// Refuses to overwrite an existing file.
pub fn init(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Err(ConfigError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }

    let io_err = |e| ConfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, DEFAULT_CONFIG).map_err(io_err)?;
    log::info!("Created config file {}", path.display());
    Ok(())
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    AlreadyExists {
        path: PathBuf,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to access config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::AlreadyExists { path } => {
                write!(f, "Config file already exists: {}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::AlreadyExists { .. } => None,
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("img2ascii").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/img2ascii/config.toml")
        })
}
