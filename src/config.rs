//! Configuration file support.
//!
//! This module provides serialization and deserialization of the annotator
//! settings: the drawing surface geometry, the box and label style, and the
//! log verbosity.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::render::RenderStyle;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Drawing surface settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Surface width in display pixels
    #[serde(default = "default_display_width")]
    pub width: f32,

    /// Surface height in display pixels
    #[serde(default = "default_display_height")]
    pub height: f32,

    /// Boxes smaller than this on either axis (display pixels) are dropped
    #[serde(default = "default_min_box_size")]
    pub min_box_size: f32,
}

fn default_display_width() -> f32 {
    constants::DISPLAY_WIDTH
}

fn default_display_height() -> f32 {
    constants::DISPLAY_HEIGHT
}

fn default_min_box_size() -> f32 {
    constants::MIN_BOX_DISPLAY_SIZE
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: default_display_width(),
            height: default_display_height(),
            min_box_size: default_min_box_size(),
        }
    }
}

/// Annotator configuration that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatorConfig {
    /// Version of the configuration file format
    pub version: u32,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub style: RenderStyle,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

impl AnnotatorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            display: DisplayConfig::default(),
            style: RenderStyle::default(),
            log_level: LogLevel::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        if !(config.display.width > 0.0 && config.display.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "display size must be positive, got {}x{}",
                config.display.width, config.display.height
            )));
        }

        Ok(config)
    }

    /// Get the default filename for the config file.
    pub fn default_filename() -> &'static str {
        "bbox-annotator.json"
    }

    /// Get the default config file path for auto-load/save.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("bbox-annotator").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("bbox-annotator")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load configuration from `path`.
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to `path`, creating parent directories if needed.
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to the default path.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;
        self.save(&path)
    }
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// Values that parse but cannot be used
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnnotatorConfig::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.display.width, 900.0);
        assert_eq!(config.display.height, 400.0);
        assert_eq!(config.display.min_box_size, 5.0);
        assert_eq!(config.style.placeholder_color, "red");
        assert_eq!(config.style.font.shorthand(), "bold 14px monospace");
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = AnnotatorConfig::new();
        config.display.width = 1280.0;
        config.style.stroke_width = 3.0;
        config.log_level = LogLevel::Debug;

        let json = config.to_json().unwrap();
        let parsed = AnnotatorConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let parsed = AnnotatorConfig::from_json(r#"{"version": 1, "display": {"width": 640}}"#).unwrap();
        assert_eq!(parsed.display.width, 640.0);
        assert_eq!(parsed.display.height, 400.0);
        assert_eq!(parsed.style, RenderStyle::default());
    }

    #[test]
    fn test_version_too_new() {
        let json = format!(r#"{{"version": {}}}"#, CONFIG_VERSION + 1);
        let result = AnnotatorConfig::from_json(&json);
        assert!(matches!(result, Err(ConfigError::VersionTooNew { .. })));
    }

    #[test]
    fn test_invalid_display_size() {
        let result = AnnotatorConfig::from_json(r#"{"version": 1, "display": {"height": 0}}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_log_level_serialization() {
        assert_eq!(serde_json::to_string(&LogLevel::Warn).unwrap(), "\"warn\"");
        assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("bbox-annotator-config-{}", uuid::Uuid::new_v4()));
        let path = dir.join("nested").join(AnnotatorConfig::default_filename());
        let config = AnnotatorConfig::new();
        config.save(&path).unwrap();
        assert_eq!(AnnotatorConfig::load(&path).unwrap(), config);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
