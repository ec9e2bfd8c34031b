//! Histogram with error bars, recolored bins and a text annotation
//!
//! Run with `RUST_LOG=info cargo run --example histogram_errors`. Set
//! `PLOTCLOUD_OUTPUT` to a directory to keep the scene as JSON.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::error::Error;

use log::info;
use nalgebra::Point3;
use plotcloud_core::stats::gaussian_samples;
use plotcloud_core::CoreConfig;
use plotcloud_visualization::{
    Color, HistogramPlot, HistogramStyle, Justify, Marker, Plotter, PlotterConfig, Text3D,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let defaults = CoreConfig::default();
    let mut rng = StdRng::seed_from_u64(2025);

    let data = gaussian_samples(1000, 5.0, 1.5, &mut rng)?;
    let style = HistogramStyle {
        title: "gaussian histogram".into(),
        color: Color::parse("lightblue")?,
        marker: Some("o".parse::<Marker>()?),
        aspect: 16.0 / 9.0,
        ..HistogramStyle::from_defaults(&defaults.histogram)
    };
    let mut histo = HistogramPlot::from_defaults(&data, &defaults.histogram, style)?;

    let recolored = histo.recolor_range(4.0, 6.0, Color::parse("red")?);
    info!("Recolored {} bins around the mean", recolored);

    let peak = histo
        .bins_where(|_| true)
        .into_iter()
        .max_by(|a, b| a.content.total_cmp(&b.content))
        .ok_or("histogram has no bins")?;
    let label = Text3D::new(
        format!("peak {:.0}", peak.content),
        Point3::new(peak.center, (peak.content + peak.error) * histo.y_scale() * 1.05, 0.0),
        0.3,
        Color::BLACK,
    )
    .justify(Justify::Center);

    let more = gaussian_samples(1000, 5.5, 1.0, &mut rng)?;
    let overlay = HistogramPlot::like(&histo, &more)?
        .with_name("Overlay")
        .with_alpha(0.5)?;
    info!(
        "Overlay: {} entries, {} outside the shared range",
        overlay.histogram().entries(),
        overlay.histogram().underflow() + overlay.histogram().overflow()
    );

    let config = PlotterConfig {
        title: "histogram with errors".into(),
        output: std::env::var_os("PLOTCLOUD_OUTPUT").map(Into::into),
        ..PlotterConfig::default()
    };
    let mut plt = Plotter::from_config(config)?;
    let scene = histo + label + overlay;
    let snapshot = plt.show([scene.into()], Some(1.2))?;
    info!("Presented {} scene nodes", snapshot.node_count());

    plt.close()?;
    Ok(())
}
