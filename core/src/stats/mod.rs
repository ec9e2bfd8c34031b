//! Sample statistics: histogram binning and random sample generation
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod histogram;
pub mod sampling;

pub use histogram::{Histogram1D, HistogramOptions};
pub use sampling::{gaussian_cloud, gaussian_samples};
