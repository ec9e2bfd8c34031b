//! Least-squares line, plane and sphere fits
//!
//! Line and plane fits read the principal directions of the centred cloud;
//! the sphere fit solves the linear system `2·x·c + d = |x|²` for the centre
//! `c` and `d = r² - |c|²`.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use log::debug;
use nalgebra::{DMatrix, DVector, Point3, Unit, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::geometry::points::PointCloud;

/// Best-fit line through a cloud
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineFit {
    pub center: Point3<f64>,
    pub direction: Unit<Vector3<f64>>,
    /// Singular values of the centred cloud, largest first
    pub variances: [f64; 3],
}

impl LineFit {
    /// Distance from `point` to the fitted line
    pub fn distance(&self, point: &Point3<f64>) -> f64 {
        let d = point - self.center;
        (d - self.direction.into_inner() * d.dot(&self.direction.into_inner())).norm()
    }
}

/// Best-fit plane through a cloud
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaneFit {
    pub center: Point3<f64>,
    pub normal: Unit<Vector3<f64>>,
    /// Smallest singular value of the centred cloud
    pub variance: f64,
}

impl PlaneFit {
    /// Signed distance from `point` to the plane, positive along the normal
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        (point - self.center).dot(&self.normal.into_inner())
    }
}

/// Best-fit sphere through a cloud
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereFit {
    pub center: Point3<f64>,
    pub radius: f64,
    /// Root of the residual sum of squares divided by the point count
    pub residue: f64,
}

fn require(cloud: &PointCloud, required: usize) -> Result<()> {
    if cloud.len() < required {
        return Err(CoreError::InsufficientPoints { required, found: cloud.len() });
    }
    Ok(())
}

/// Singular values of the centred data matrix from covariance eigenvalues
fn singular_values(variances: [f64; 3], n: usize) -> [f64; 3] {
    variances.map(|v| (v * (n - 1) as f64).sqrt())
}

pub fn fit_line(cloud: &PointCloud) -> Result<LineFit> {
    require(cloud, 2)?;
    let center = cloud.centroid().ok_or(CoreError::EmptySample)?;
    let axes = cloud.principal_axes()?;
    if axes[0].0 <= 0.0 {
        return Err(CoreError::DegenerateCloud("all points coincide".into()));
    }
    Ok(LineFit {
        center,
        direction: axes[0].1,
        variances: singular_values(axes.map(|(v, _)| v), cloud.len()),
    })
}

pub fn fit_plane(cloud: &PointCloud) -> Result<PlaneFit> {
    require(cloud, 3)?;
    let center = cloud.centroid().ok_or(CoreError::EmptySample)?;
    let axes = cloud.principal_axes()?;
    if axes[1].0 <= 0.0 {
        return Err(CoreError::DegenerateCloud("points are collinear".into()));
    }
    let normal = Unit::new_normalize(axes[0].1.cross(&axes[1].1.into_inner()));
    Ok(PlaneFit {
        center,
        normal,
        variance: singular_values(axes.map(|(v, _)| v), cloud.len())[2],
    })
}

pub fn fit_sphere(cloud: &PointCloud) -> Result<SphereFit> {
    require(cloud, 4)?;
    let n = cloud.len();
    let a = DMatrix::from_fn(n, 4, |i, j| match j {
        3 => 1.0,
        _ => 2.0 * cloud.points()[i][j],
    });
    let f = DVector::from_iterator(n, cloud.iter().map(|p| p.coords.norm_squared()));

    let svd = a.clone().svd(true, true);
    let rank = svd.rank(1e-10 * svd.singular_values.max());
    if rank < 4 {
        return Err(CoreError::DegenerateCloud(format!(
            "sphere system has rank {rank}, need 4"
        )));
    }
    let solution = svd
        .solve(&f, 1e-12)
        .map_err(|e| CoreError::Numerical(e.to_string()))?;

    let center = Point3::new(solution[0], solution[1], solution[2]);
    let r2 = center.coords.norm_squared() + solution[3];
    if r2 <= 0.0 {
        return Err(CoreError::Numerical(format!("negative squared radius {r2}")));
    }
    let residual = (&a * &solution - &f).norm_squared();
    let fit = SphereFit {
        center,
        radius: r2.sqrt(),
        residue: residual.sqrt() / n as f64,
    };
    debug!("Sphere fit over {} points: r = {:.4}", n, fit.radius);
    Ok(fit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_line_through_collinear_points() {
        let rows: Vec<[f64; 3]> = (0..10).map(|i| [i as f64, 2.0 * i as f64, 1.0]).collect();
        let fit = fit_line(&PointCloud::from_rows(&rows)).unwrap();

        let expected = Vector3::new(1.0, 2.0, 0.0).normalize();
        assert_relative_eq!(fit.direction.dot(&expected).abs(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(fit.center, Point3::new(4.5, 9.0, 1.0), epsilon = 1e-12);
        assert_relative_eq!(fit.distance(&Point3::new(3.0, 6.0, 1.0)), 0.0, epsilon = 1e-9);
        assert_relative_eq!(fit.variances[1], 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_plane_normal_of_tilted_grid() {
        let mut rows = Vec::new();
        for i in 0..6 {
            for j in 0..6 {
                let (x, y) = (i as f64, j as f64);
                rows.push([x, y, 0.5 * x - 0.25 * y + 3.0]);
            }
        }
        let fit = fit_plane(&PointCloud::from_rows(&rows)).unwrap();
        let expected = Vector3::new(0.5, -0.25, -1.0).normalize();

        assert_relative_eq!(fit.normal.dot(&expected).abs(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(fit.variance, 0.0, epsilon = 1e-5);
        assert_relative_eq!(fit.signed_distance(&Point3::new(0.0, 0.0, 3.0)), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sphere_through_surface_points() {
        let center = Point3::new(1.0, -2.0, 0.5);
        let points = crate::geometry::mesh::TriangleMesh::uv_sphere(12, 6)
            .vertices()
            .iter()
            .map(|v| center + v.coords * 2.5)
            .collect();
        let fit = fit_sphere(&PointCloud::new(points)).unwrap();

        assert_relative_eq!(fit.center, center, epsilon = 1e-9);
        assert_relative_eq!(fit.radius, 2.5, epsilon = 1e-9);
        assert_relative_eq!(fit.residue, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_inputs() {
        let coplanar = PointCloud::from_rows(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
        ]);
        assert!(matches!(fit_sphere(&coplanar), Err(CoreError::DegenerateCloud(_))));

        let same = PointCloud::from_rows(&[[1.0, 1.0, 1.0]; 3]);
        assert!(fit_line(&same).is_err());
        assert!(matches!(
            fit_plane(&PointCloud::from_rows(&[[0.0; 3]; 2])),
            Err(CoreError::InsufficientPoints { required: 3, found: 2 })
        ));
    }
}
