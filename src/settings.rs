//! Game settings
//!
//! Loaded from an optional JSON file; missing fields take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{BRAID_PROBABILITY, MIN_CELL_SIZE};

/// Problems with a settings file or the values in it
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("canvas {width}x{height} cannot fit a single {min}px cell")]
    CanvasTooSmall { width: f32, height: f32, min: f32 },
    #[error("braid probability {0} must be between 0.0 and 1.0")]
    InvalidBraidProbability(f64),
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Check that a canvas fits at least one cell at the smallest cell size
pub fn validate_canvas(width: f32, height: f32) -> Result<(), ConfigError> {
    if !(width >= MIN_CELL_SIZE && height >= MIN_CELL_SIZE) {
        return Err(ConfigError::CanvasTooSmall {
            width,
            height,
            min: MIN_CELL_SIZE,
        });
    }
    Ok(())
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Canvas width in pixels
    pub canvas_width: f32,
    /// Canvas height in pixels
    pub canvas_height: f32,
    /// Dead-end removal probability after carving
    pub braid_probability: f64,
    /// Request commentary after each completed level
    pub commentary: bool,
    /// Whether the device is online; commentary is never requested offline
    pub online: bool,
    /// Fixed RNG seed (random when absent)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 600.0,
            braid_probability: BRAID_PROBABILITY,
            commentary: true,
            online: true,
            seed: None,
        }
    }
}

impl Settings {
    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_canvas(self.canvas_width, self.canvas_height)?;
        if !(0.0..=1.0).contains(&self.braid_probability) {
            return Err(ConfigError::InvalidBraidProbability(self.braid_probability));
        }
        Ok(())
    }

    /// Whether a finished level should trigger a commentary request
    pub fn wants_commentary(&self) -> bool {
        self.commentary && self.online
    }

    /// Load and validate settings from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load_from(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                log::info!("Using default settings ({})", e);
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert!(settings.wants_commentary());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "canvas_width": 1024.0 }"#).unwrap();
        assert_eq!(settings.canvas_width, 1024.0);
        assert_eq!(settings.canvas_height, 600.0);
        assert_eq!(settings.braid_probability, BRAID_PROBABILITY);
        assert_eq!(settings.seed, None);
    }

    #[test]
    fn test_rejects_tiny_canvas() {
        let settings = Settings {
            canvas_width: 19.0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::CanvasTooSmall { .. })
        ));
        assert!(validate_canvas(f32::NAN, 100.0).is_err());
    }

    #[test]
    fn test_rejects_bad_braid_probability() {
        let settings = Settings {
            braid_probability: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidBraidProbability(_))
        ));
    }

    #[test]
    fn test_offline_disables_commentary() {
        let settings = Settings {
            online: false,
            ..Default::default()
        };
        assert!(!settings.wants_commentary());
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("dash_mazex_settings_{}.json", std::process::id()));
        let settings = Settings {
            seed: Some(42),
            online: false,
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let settings = Settings::load_or_default("/nonexistent/dash_mazex.json");
        assert_eq!(settings, Settings::default());
    }
}
