//! Plotter window settings with JSON loading
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::engine::backend::{DisplayBackend, JsonFileBackend, NullBackend};
use crate::error::{Result, VisualizationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotterConfig {
    /// Window title, also carried into every snapshot
    pub title: String,

    /// Window size in pixels
    pub size: (u32, u32),

    /// Background color name or hex string
    pub background: String,

    /// Zoom used when `show` is called without one
    pub default_zoom: f64,

    /// Direction from the focal point towards the camera
    pub camera_direction: [f64; 3],

    /// Directory for JSON frames; `None` discards frames
    pub output: Option<PathBuf>,
}

impl Default for PlotterConfig {
    fn default() -> Self {
        Self {
            title: "plotcloud".to_owned(),
            size: (800, 600),
            background: "white".to_owned(),
            default_zoom: 1.0,
            camera_direction: [0.0, 0.0, 1.0],
            output: None,
        }
    }
}

impl PlotterConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading plotter configuration from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.size.0 == 0 || self.size.1 == 0 {
            return Err(VisualizationError::invalid(
                "size",
                format!("{}x{} has a zero dimension", self.size.0, self.size.1),
            ));
        }
        if !(self.default_zoom.is_finite() && self.default_zoom > 0.0) {
            return Err(VisualizationError::invalid(
                "default_zoom",
                format!("{} must be positive", self.default_zoom),
            ));
        }
        if self.camera_direction.iter().all(|c| *c == 0.0) {
            return Err(VisualizationError::invalid("camera_direction", "must be a non-zero vector"));
        }
        self.background_color()?;
        Ok(())
    }

    pub fn background_color(&self) -> Result<Color> {
        Color::parse(&self.background)
    }

    /// Width over height of the window
    pub fn aspect(&self) -> f64 {
        f64::from(self.size.0) / f64::from(self.size.1)
    }

    /// Backend implied by `output`
    pub fn backend(&self) -> Box<dyn DisplayBackend> {
        match &self.output {
            Some(dir) => Box::new(JsonFileBackend::new(dir.clone())),
            None => Box::new(NullBackend),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PlotterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.background_color().unwrap(), Color::WHITE);
        assert_eq!(config.backend().name(), "null");
    }

    #[test]
    fn test_partial_json() {
        let config =
            PlotterConfig::from_json_str(r#"{ "title": "pca", "output": "/tmp/frames" }"#).unwrap();
        assert_eq!(config.title, "pca");
        assert_eq!(config.size, (800, 600));
        assert_eq!(config.backend().name(), "json-file");
    }

    #[test]
    fn test_invalid_values_rejected() {
        for json in [
            r#"{ "default_zoom": 0.0 }"#,
            r#"{ "size": [0, 600] }"#,
            r#"{ "camera_direction": [0.0, 0.0, 0.0] }"#,
        ] {
            assert!(matches!(
                PlotterConfig::from_json_str(json),
                Err(VisualizationError::InvalidParameter { .. })
            ));
        }
        assert!(matches!(
            PlotterConfig::from_json_str(r#"{ "background": "not-a-color" }"#),
            Err(VisualizationError::UnknownColor(_))
        ));
    }
}
