//! Configuration loading and discovery for `pxsprite.toml`
//!
//! Provides functions to find, load and validate configuration.

use super::schema::SpriteConfig;
use crate::color::ColorError;
use crate::palette::Palette;
use log::{debug, info};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for during discovery.
pub const CONFIG_FILE_NAME: &str = "pxsprite.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse pxsprite.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
    /// A palette color could not be parsed
    #[error("Invalid palette color: {0}")]
    Color(#[from] ColorError),
}

/// Find pxsprite.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for pxsprite.toml
/// 2. Check XDG_CONFIG_HOME/pxsprite/pxsprite.toml (or ~/.config/pxsprite/pxsprite.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find pxsprite.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("pxsprite").join(CONFIG_FILE_NAME);
    config_path.exists().then_some(config_path)
}

/// Find pxsprite.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a pxsprite.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the defaults.
///
/// # Example
/// ```ignore
/// let config = load_config(None)?;
/// let palette = config.build_palette()?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<SpriteConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            info!("loading config from {}", p.display());
            load_config_file(&p)
        }
        None => {
            debug!("no {} found, using defaults", CONFIG_FILE_NAME);
            Ok(default_config())
        }
    }
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<SpriteConfig, ConfigError> {
    let config: SpriteConfig = toml::from_str(contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

fn load_config_file(path: &Path) -> Result<SpriteConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Configuration used when no pxsprite.toml is found.
pub fn default_config() -> SpriteConfig {
    SpriteConfig::default()
}

/// Load configuration and build its seed palette in one step.
pub fn load_palette(path: Option<&Path>) -> Result<Palette, ConfigError> {
    let config = load_config(path)?;
    Ok(config.build_palette()?)
}
