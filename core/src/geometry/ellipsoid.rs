//! Oriented ellipsoids and the PCA confidence ellipsoid fit
//!
//! The PCA fit sizes an ellipsoid so that it encloses a requested fraction
//! of a trivariate normal population estimated from the sample. Semi-axes
//! follow the principal directions of the sample covariance, scaled by the
//! Hotelling T² quantile
//!
//! ```text
//! q = F⁻¹(confidence; p, n - p) · (n - 1)·p·(n + 1) / (n·(n - p))
//! ```
//!
//! with `p = 3`, then shrunk by the small-sample correction `1 + 6/(n - 1)`.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::f64::consts::PI;

use log::{debug, info};
use nalgebra::{Matrix4, Point3, Unit, Vector3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

use crate::error::{CoreError, Result};
use crate::geometry::mesh::TriangleMesh;
use crate::geometry::points::{Aabb, PointCloud};

/// Dimension of the fitted space
const DIM: usize = 3;

/// Principal variances below this fraction of the largest are treated as collapsed
const DEGENERACY_RATIO: f64 = 1e-12;

/// An ellipsoid with arbitrary orientation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    center: Point3<f64>,

    /// Unit directions of the three axes
    axes: [Unit<Vector3<f64>>; 3],

    /// Semi-axis lengths, matching `axes`
    semi_axes: [f64; 3],

    /// Statistical error of each semi-axis, zero for constructed shapes
    semi_axis_errors: [f64; 3],

    /// Number of points the shape was fitted to, 1 for constructed shapes
    point_count: usize,

    /// Enclosed probability mass for fitted shapes
    confidence: Option<f64>,
}

impl Ellipsoid {
    /// Build an ellipsoid from a centre and three axis vectors
    ///
    /// Each vector's length is the semi-axis along its direction, the
    /// distance from the centre to the surface, not the full diameter.
    pub fn new(
        center: Point3<f64>,
        axis1: Vector3<f64>,
        axis2: Vector3<f64>,
        axis3: Vector3<f64>,
    ) -> Result<Self> {
        let unit = |name: &str, v: Vector3<f64>| {
            let length = v.norm();
            if !(length.is_finite() && length > 0.0) {
                return Err(CoreError::invalid(name, "axis must have finite non-zero length"));
            }
            Ok((Unit::new_unchecked(v / length), length))
        };
        let (u1, a) = unit("axis1", axis1)?;
        let (u2, b) = unit("axis2", axis2)?;
        let (u3, c) = unit("axis3", axis3)?;

        Ok(Self {
            center,
            axes: [u1, u2, u3],
            semi_axes: [a, b, c],
            semi_axis_errors: [0.0; 3],
            point_count: 1,
            confidence: None,
        })
    }

    /// Sphere of the given radius
    pub fn sphere(center: Point3<f64>, radius: f64) -> Result<Self> {
        Self::new(
            center,
            Vector3::x() * radius,
            Vector3::y() * radius,
            Vector3::z() * radius,
        )
    }

    pub fn center(&self) -> Point3<f64> {
        self.center
    }

    pub fn axes(&self) -> &[Unit<Vector3<f64>>; 3] {
        &self.axes
    }

    /// Semi-axis lengths; for a PCA fit the largest comes first
    pub fn semi_axes(&self) -> [f64; 3] {
        self.semi_axes
    }

    pub fn semi_axis_errors(&self) -> [f64; 3] {
        self.semi_axis_errors
    }

    /// Number of points used by the fit
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    pub fn confidence(&self) -> Option<f64> {
        self.confidence
    }

    /// Tips of the three semi-axes, `center + aᵢ·uᵢ`
    pub fn axis_endpoints(&self) -> [Point3<f64>; 3] {
        [0, 1, 2].map(|i| self.center + self.axes[i].into_inner() * self.semi_axes[i])
    }

    pub fn volume(&self) -> f64 {
        4.0 / 3.0 * PI * self.semi_axes.iter().product::<f64>()
    }

    /// Affine map taking the unit sphere onto this ellipsoid
    pub fn transformation(&self) -> Matrix4<f64> {
        let [a, b, c] = self.semi_axes;
        let u = self.axes[0].into_inner() * a;
        let v = self.axes[1].into_inner() * b;
        let w = self.axes[2].into_inner() * c;
        let o = self.center;
        #[rustfmt::skip]
        let m = Matrix4::new(
            u.x, v.x, w.x, o.x,
            u.y, v.y, w.y, o.y,
            u.z, v.z, w.z, o.z,
            0.0, 0.0, 0.0, 1.0,
        );
        m
    }

    pub fn bounds(&self) -> Aabb {
        // Half-extent along a world axis e is sqrt(Σ (aᵢ·uᵢ·e)²)
        let half = Vector3::from_fn(|k, _| {
            (0..3)
                .map(|i| (self.semi_axes[i] * self.axes[i][k]).powi(2))
                .sum::<f64>()
                .sqrt()
        });
        Aabb::new(self.center - half, self.center + half)
    }

    /// Squared normalized distance; `≤ 1` on or inside the surface
    pub fn normalized_distance_squared(&self, point: &Point3<f64>) -> f64 {
        let d = point - self.center;
        (0..3)
            .map(|i| (d.dot(&self.axes[i].into_inner()) / self.semi_axes[i]).powi(2))
            .sum()
    }

    /// Points on the surface count as inside
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        self.normalized_distance_squared(point) <= 1.0
    }

    /// Containment flag for each point, in input order
    pub fn classify(&self, cloud: &PointCloud) -> Vec<bool> {
        cloud.points().par_iter().map(|p| self.contains(p)).collect()
    }

    /// Points inside the ellipsoid, or outside when `invert` is set
    pub fn inside_points(&self, cloud: &PointCloud, invert: bool) -> PointCloud {
        let selected: PointCloud = cloud
            .points()
            .par_iter()
            .filter(|p| self.contains(p) != invert)
            .copied()
            .collect::<Vec<_>>()
            .into();
        debug!(
            "Ellipsoid {} {} of {} points",
            if invert { "excludes" } else { "contains" },
            selected.len(),
            cloud.len()
        );
        selected
    }

    /// How far the shape is from a sphere, 0 for a perfect sphere
    pub fn asphericity(&self) -> f64 {
        let [a, b, c] = self.semi_axes;
        let term = |x: f64, y: f64| ((x - y) / (x + y)).powi(2);
        (term(a, b) + term(a, c) + term(b, c)) / 3.0 * 4.0
    }

    /// First-order propagated error of [`Ellipsoid::asphericity`]
    pub fn asphericity_error(&self) -> f64 {
        let [a, b, c] = self.semi_axes;
        let [ea, eb, ec] = self.semi_axis_errors;
        // d/dx ((x-y)/(x+y))² = 4y(x-y)/(x+y)³, d/dy = -4x(x-y)/(x+y)³
        let dx = |x: f64, y: f64| 4.0 * y * (x - y) / (x + y).powi(3);
        let dy = |x: f64, y: f64| -4.0 * x * (x - y) / (x + y).powi(3);

        let da = 4.0 / 3.0 * (dx(a, b) + dx(a, c));
        let db = 4.0 / 3.0 * (dy(a, b) + dx(b, c));
        let dc = 4.0 / 3.0 * (dy(a, c) + dy(b, c));

        ((da * ea).powi(2) + (db * eb).powi(2) + (dc * ec).powi(2)).sqrt()
    }

    /// Triangulated surface with `2·resolution` azimuthal and `resolution` polar divisions
    pub fn to_mesh(&self, resolution: usize) -> Result<TriangleMesh> {
        if resolution < 3 {
            return Err(CoreError::invalid("resolution", "must be at least 3"));
        }
        let unit = TriangleMesh::uv_sphere(2 * resolution, resolution);
        Ok(unit.transformed(&self.transformation()))
    }
}

/// Fit the ellipsoid enclosing `confidence` of the distribution behind `cloud`
pub fn pca_ellipsoid(cloud: &PointCloud, confidence: f64) -> Result<Ellipsoid> {
    let n = cloud.len();
    if n <= DIM {
        return Err(CoreError::InsufficientPoints { required: DIM + 1, found: n });
    }
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(CoreError::invalid(
            "confidence",
            format!("{confidence} is outside (0, 1)"),
        ));
    }

    let center = cloud.centroid().ok_or(CoreError::EmptySample)?;
    let axes = cloud.principal_axes()?;

    let (p, nf) = (DIM as f64, n as f64);
    let quantile = f_quantile(confidence, p, nf - p)? * (nf - 1.0) * p * (nf + 1.0) / nf / (nf - p);
    let correction = 1.0 + 6.0 / (nf - 1.0);
    let semi_axes = axes.map(|(variance, _)| (variance * quantile).sqrt() / correction);

    if axes[0].0 <= 0.0 || axes[2].0 <= axes[0].0 * DEGENERACY_RATIO {
        return Err(CoreError::DegenerateCloud(format!(
            "principal variances {:.3e}, {:.3e}, {:.3e} do not span 3D",
            axes[0].0, axes[1].0, axes[2].0
        )));
    }

    let sqrt_n = nf.sqrt();
    let ellipsoid = Ellipsoid {
        center,
        axes: axes.map(|(_, axis)| axis),
        semi_axes,
        semi_axis_errors: semi_axes.map(|s| s / 2.0 / sqrt_n),
        point_count: n,
        confidence: Some(confidence),
    };

    info!(
        "PCA ellipsoid over {} points at {:.3}: semi-axes ({:.4}, {:.4}, {:.4})",
        n, confidence, semi_axes[0], semi_axes[1], semi_axes[2]
    );
    Ok(ellipsoid)
}

/// Quantile of the F distribution by bracketing and bisection on its CDF
fn f_quantile(probability: f64, d1: f64, d2: f64) -> Result<f64> {
    let dist = FisherSnedecor::new(d1, d2)
        .map_err(|e| CoreError::Numerical(format!("F({d1}, {d2}): {e}")))?;

    let mut low = 0.0;
    let mut high = 1.0;
    while dist.cdf(high) < probability {
        low = high;
        high *= 2.0;
        if !high.is_finite() {
            return Err(CoreError::Numerical("F quantile bracket diverged".into()));
        }
    }
    for _ in 0..200 {
        let mid = 0.5 * (low + high);
        if dist.cdf(mid) < probability {
            low = mid;
        } else {
            high = mid;
        }
        if high - low <= 1e-14 * high {
            break;
        }
    }
    Ok(0.5 * (low + high))
}
