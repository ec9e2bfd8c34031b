//! Error types for actors, scenes and display backends
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use plotcloud_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VisualizationError {
    #[error("Unknown color: {0}")]
    UnknownColor(String),

    #[error("Unknown marker style: {0}")]
    UnknownMarker(String),

    #[error("Bin {index} out of range for histogram with {bins} bins")]
    BinOutOfRange { index: usize, bins: usize },

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Plotter has been closed")]
    PlotterClosed,

    #[error("Display backend error: {0}")]
    Backend(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl VisualizationError {
    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VisualizationError>;
