//! Kernel defaults with JSON loading
//!
//! Defaults used when callers do not pass explicit histogram or ellipsoid
//! options. Every section is optional in the JSON document; missing fields
//! fall back to [`Default`].
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Default histogram construction options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramDefaults {
    /// Number of uniform bins
    pub bins: usize,

    /// Whether plots draw per-bin error bars
    pub show_errors: bool,

    /// Normalize contents to a probability density
    pub density: bool,
}

impl Default for HistogramDefaults {
    fn default() -> Self {
        Self {
            bins: 20,
            show_errors: true,
            density: false,
        }
    }
}

/// Default PCA ellipsoid options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EllipsoidDefaults {
    /// Fraction of the distribution enclosed by the fitted surface
    pub confidence: f64,

    /// Polar resolution of the generated surface mesh
    pub resolution: usize,
}

impl Default for EllipsoidDefaults {
    fn default() -> Self {
        Self {
            confidence: 0.95,
            resolution: 24,
        }
    }
}

/// Top-level kernel configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub histogram: HistogramDefaults,
    pub ellipsoid: EllipsoidDefaults,
}

impl CoreConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading core configuration from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.histogram.bins == 0 {
            return Err(CoreError::invalid("histogram.bins", "must be at least 1"));
        }
        let confidence = self.ellipsoid.confidence;
        if !(confidence > 0.0 && confidence < 1.0) {
            return Err(CoreError::invalid(
                "ellipsoid.confidence",
                format!("{confidence} is outside (0, 1)"),
            ));
        }
        if self.ellipsoid.resolution < 3 {
            return Err(CoreError::invalid("ellipsoid.resolution", "must be at least 3"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = CoreConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.histogram.bins, 20);
        assert_eq!(config.ellipsoid.confidence, 0.95);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config = CoreConfig::from_json_str(r#"{ "histogram": { "bins": 40 } }"#)
            .expect("partial config should parse");

        assert_eq!(config.histogram.bins, 40);
        assert!(config.histogram.show_errors);
        assert_eq!(config.ellipsoid, EllipsoidDefaults::default());
    }

    #[test]
    fn test_out_of_range_confidence_rejected() {
        let result = CoreConfig::from_json_str(r#"{ "ellipsoid": { "confidence": 1.5 } }"#);
        assert!(matches!(result, Err(CoreError::InvalidParameter { .. })));
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let result = CoreConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(CoreError::Config(_))));
    }

    #[test]
    fn test_from_file_round_trip() {
        let path = std::env::temp_dir().join("plotcloud_core_config_test.json");
        std::fs::write(&path, r#"{ "ellipsoid": { "resolution": 12 } }"#).unwrap();

        let config = CoreConfig::from_file(&path).expect("file config should load");
        assert_eq!(config.ellipsoid.resolution, 12);

        std::fs::remove_file(&path).ok();
    }
}
