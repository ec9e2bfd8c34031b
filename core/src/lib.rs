//! plotcloud core - statistics and geometry kernel
//!
//! Provides the numerical half of plotcloud: binned 1D histograms with
//! per-bin uncertainties, random sample generation, 3D point clouds and the
//! fits built on top of them (PCA confidence ellipsoid, line, plane and
//! sphere), together with point containment against ellipsoids and closed
//! triangle meshes.
//!
//! Nothing in this crate knows how results are drawn; the visualization
//! crate turns these types into displayable actors.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod config;
pub mod error;
pub mod geometry;
pub mod stats;

pub use config::{CoreConfig, EllipsoidDefaults, HistogramDefaults};
pub use error::{CoreError, Result};
pub use geometry::ellipsoid::{pca_ellipsoid, Ellipsoid};
pub use geometry::fit::{fit_line, fit_plane, fit_sphere, LineFit, PlaneFit, SphereFit};
pub use geometry::mesh::TriangleMesh;
pub use geometry::points::{Aabb, PointCloud};
pub use stats::histogram::{Histogram1D, HistogramOptions};

/// Crate version reported by the demos
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
