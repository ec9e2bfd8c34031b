//! Error types for the statistics and geometry kernel
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use thiserror::Error;

/// Errors raised while binning samples, fitting shapes or loading configuration
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Sample contains no finite values")]
    EmptySample,

    #[error("Not enough points: required {required}, found {found}")]
    InsufficientPoints { required: usize, found: usize },

    #[error("Degenerate point cloud: {0}")]
    DegenerateCloud(String),

    #[error("Numerical failure: {0}")]
    Numerical(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl CoreError {
    /// Shorthand for [`CoreError::InvalidParameter`]
    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the core crate
pub type Result<T> = std::result::Result<T, CoreError>;
