//! Point-cloud geometry: bounds, principal axes, fitted shapes and containment
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod ellipsoid;
pub mod fit;
pub mod mesh;
pub mod points;

pub use ellipsoid::{pca_ellipsoid, Ellipsoid};
pub use fit::{fit_line, fit_plane, fit_sphere, LineFit, PlaneFit, SphereFit};
pub use mesh::TriangleMesh;
pub use points::{Aabb, PointCloud};
