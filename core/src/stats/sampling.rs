//! Random sample generation for demos and tests
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use nalgebra::{Point3, Rotation3};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{CoreError, Result};
use crate::geometry::points::PointCloud;

fn normal(name: &str, mean: f64, sigma: f64) -> Result<Normal<f64>> {
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(CoreError::invalid(name, format!("sigma {sigma} must be finite and positive")));
    }
    Normal::new(mean, sigma).map_err(|e| CoreError::invalid(name, e.to_string()))
}

/// Draw `n` samples from a normal distribution
pub fn gaussian_samples<R: Rng + ?Sized>(n: usize, mean: f64, sigma: f64, rng: &mut R) -> Result<Vec<f64>> {
    let dist = normal("sigma", mean, sigma)?;
    Ok((0..n).map(|_| dist.sample(rng)).collect())
}

/// Draw an anisotropic normal point cloud centred at the origin
///
/// Each axis gets its own standard deviation; the optional rotation is
/// applied afterwards so the principal axes need not align with x, y, z.
pub fn gaussian_cloud<R: Rng + ?Sized>(
    n: usize,
    sigmas: [f64; 3],
    rotation: Option<Rotation3<f64>>,
    rng: &mut R,
) -> Result<PointCloud> {
    let dists = [
        normal("sigmas[0]", 0.0, sigmas[0])?,
        normal("sigmas[1]", 0.0, sigmas[1])?,
        normal("sigmas[2]", 0.0, sigmas[2])?,
    ];
    let rotation = rotation.unwrap_or_else(Rotation3::identity);

    let points = (0..n)
        .map(|_| {
            let p = Point3::new(dists[0].sample(rng), dists[1].sample(rng), dists[2].sample(rng));
            rotation * p
        })
        .collect();
    Ok(PointCloud::new(points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_gaussian_samples_moments() {
        let mut rng = StdRng::seed_from_u64(7);
        let samples = gaussian_samples(20_000, 5.0, 2.0, &mut rng).unwrap();

        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (samples.len() - 1) as f64;
        assert!((mean - 5.0).abs() < 0.1);
        assert!((var.sqrt() - 2.0).abs() < 0.1);
    }

    #[test]
    fn test_cloud_spread_follows_sigmas() {
        let mut rng = StdRng::seed_from_u64(11);
        let cloud = gaussian_cloud(5_000, [3.0, 1.0, 0.5], None, &mut rng).unwrap();
        let cov = cloud.covariance().unwrap();

        assert_eq!(cloud.len(), 5_000);
        assert!((cov[(0, 0)].sqrt() - 3.0).abs() < 0.2);
        assert!((cov[(1, 1)].sqrt() - 1.0).abs() < 0.1);
        assert!((cov[(2, 2)].sqrt() - 0.5).abs() < 0.05);
    }

    #[test]
    fn test_rejects_non_positive_sigma() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(gaussian_samples(10, 0.0, 0.0, &mut rng).is_err());
        assert!(gaussian_cloud(10, [1.0, -1.0, 1.0], None, &mut rng).is_err());
    }
}
