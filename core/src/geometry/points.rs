//! 3D point clouds and axis-aligned bounds
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use nalgebra::{Matrix3, Point3, Unit, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Aabb {
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, `None` for an empty iterator
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<f64>>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(Self::new(first, first), |b, p| b.include(p)))
    }

    fn include(self, p: &Point3<f64>) -> Self {
        Self {
            min: self.min.inf(p),
            max: self.max.sup(p),
        }
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        self.include(&other.min).include(&other.max)
    }

    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Length of the main diagonal
    pub fn diagonal(&self) -> f64 {
        (self.max - self.min).norm()
    }

    pub fn contains(&self, p: &Point3<f64>) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] && p[i] <= self.max[i])
    }
}

/// An ordered set of 3D points
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointCloud {
    points: Vec<Point3<f64>>,
}

impl PointCloud {
    pub fn new(points: Vec<Point3<f64>>) -> Self {
        Self { points }
    }

    /// Build from `[x, y, z]` rows
    pub fn from_rows(rows: &[[f64; 3]]) -> Self {
        Self::new(rows.iter().map(|r| Point3::new(r[0], r[1], r[2])).collect())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point3<f64>> {
        self.points.iter()
    }

    pub fn into_points(self) -> Vec<Point3<f64>> {
        self.points
    }

    pub fn centroid(&self) -> Option<Point3<f64>> {
        if self.is_empty() {
            return None;
        }
        let sum: Vector3<f64> = self.points.iter().map(|p| p.coords).sum();
        Some(Point3::from(sum / self.len() as f64))
    }

    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.points)
    }

    /// Sample covariance matrix (divisor `n - 1`)
    pub fn covariance(&self) -> Result<Matrix3<f64>> {
        let n = self.len();
        if n < 2 {
            return Err(CoreError::InsufficientPoints { required: 2, found: n });
        }
        let centroid = self.centroid().ok_or(CoreError::EmptySample)?;
        let scatter = self
            .points
            .iter()
            .map(|p| {
                let d = p - centroid;
                d * d.transpose()
            })
            .fold(Matrix3::zeros(), |acc, m| acc + m);
        Ok(scatter / (n - 1) as f64)
    }

    /// Eigen pairs of the covariance, largest variance first
    pub fn principal_axes(&self) -> Result<[(f64, Unit<Vector3<f64>>); 3]> {
        principal_axes(&self.covariance()?)
    }

    /// Keep the points whose mask entry is `true`
    pub fn select(&self, mask: &[bool]) -> Result<PointCloud> {
        if mask.len() != self.len() {
            return Err(CoreError::invalid(
                "mask",
                format!("expected {} entries, got {}", self.len(), mask.len()),
            ));
        }
        Ok(PointCloud::new(
            self.points
                .iter()
                .zip(mask)
                .filter_map(|(p, &keep)| keep.then_some(*p))
                .collect(),
        ))
    }
}

impl From<Vec<Point3<f64>>> for PointCloud {
    fn from(points: Vec<Point3<f64>>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<Point3<f64>> for PointCloud {
    fn from_iter<I: IntoIterator<Item = Point3<f64>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PointCloud {
    type Item = &'a Point3<f64>;
    type IntoIter = std::slice::Iter<'a, Point3<f64>>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Eigen-decompose a symmetric matrix, sorted by decreasing eigenvalue
///
/// For a covariance matrix this is equivalent to its SVD: eigenvalues are
/// the variances along the principal directions.
pub(crate) fn principal_axes(cov: &Matrix3<f64>) -> Result<[(f64, Unit<Vector3<f64>>); 3]> {
    if cov.iter().any(|v| !v.is_finite()) {
        return Err(CoreError::Numerical("covariance has non-finite entries".into()));
    }
    let eigen = cov.symmetric_eigen();
    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));

    let pair = |k: usize| {
        let i = order[k];
        let value = eigen.eigenvalues[i].max(0.0);
        (value, Unit::new_normalize(eigen.eigenvectors.column(i).into_owned()))
    };
    Ok([pair(0), pair(1), pair(2)])
}
