//! PCA confidence ellipsoid of a random cloud
//!
//! Fits the ellipsoid, splits the cloud into inside and outside points and
//! shows both with the ellipsoid surface.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::error::Error;

use log::info;
use nalgebra::Rotation3;
use plotcloud_core::stats::gaussian_cloud;
use plotcloud_core::{pca_ellipsoid, CoreConfig};
use plotcloud_visualization::{Color, MeshActor, Plotter, PlotterConfig, Points};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let defaults = CoreConfig::default().ellipsoid;
    let mut rng = StdRng::seed_from_u64(42);

    let rotation = Rotation3::from_euler_angles(0.3, -0.2, 0.8);
    let cloud = gaussian_cloud(1000, [2.0, 1.0, 0.5], Some(rotation), &mut rng)?;

    let elli = pca_ellipsoid(&cloud, defaults.confidence)?;
    let inside = elli.inside_points(&cloud, false);
    let outside = elli.inside_points(&cloud, true);

    let [a, b, c] = elli.semi_axes();
    info!("Semi-axes: {:.3}, {:.3}, {:.3}", a, b, c);
    info!("Points inside: {} of {}", inside.len(), cloud.len());
    info!(
        "Asphericity: {:.4} +- {:.4}",
        elli.asphericity(),
        elli.asphericity_error()
    );

    let config = PlotterConfig {
        title: "PCA ellipsoid".into(),
        camera_direction: [1.0, 1.0, 1.0],
        output: std::env::var_os("PLOTCLOUD_OUTPUT").map(Into::into),
        ..PlotterConfig::default()
    };
    let mut plt = Plotter::from_config(config)?;
    plt.add(Points::new(inside, Color::parse("green")?).with_name("Inside"))?
        .add(Points::new(outside, Color::parse("red")?).with_name("Outside"))?
        .add(
            MeshActor::from_ellipsoid(&elli, defaults.resolution, Color::parse("yellow")?)?
                .alpha(0.2),
        )?;
    plt.show([], None)?;
    plt.close()?;
    Ok(())
}
