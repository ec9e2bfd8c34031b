//! Plotting context
//!
//! A [`Plotter`] keeps actors added one at a time, composes them with any
//! extra actors passed to [`Plotter::show`], fits a camera and hands the
//! resulting snapshot to its display backend. Once closed it refuses
//! further work.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use log::{debug, info, warn};

use crate::color::Color;
use crate::config::PlotterConfig;
use crate::engine::backend::DisplayBackend;
use crate::engine::scene::{Camera, SceneSnapshot};
use crate::error::{Result, VisualizationError};
use crate::view::{combined_bounds, Actor, Renderable};

pub struct Plotter {
    config: PlotterConfig,
    background: Color,
    backend: Box<dyn DisplayBackend>,
    actors: Vec<Actor>,
    closed: bool,
}

impl Plotter {
    pub fn new(config: PlotterConfig, backend: Box<dyn DisplayBackend>) -> Result<Self> {
        config.validate()?;
        let background = config.background_color()?;
        debug!("Plotter '{}' using {} backend", config.title, backend.name());
        Ok(Self {
            config,
            background,
            backend,
            actors: Vec::new(),
            closed: false,
        })
    }

    /// Plotter whose backend follows `config.output`
    pub fn from_config(config: PlotterConfig) -> Result<Self> {
        let backend = config.backend();
        Self::new(config, backend)
    }

    pub fn config(&self) -> &PlotterConfig {
        &self.config
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(VisualizationError::PlotterClosed);
        }
        Ok(())
    }

    pub fn add(&mut self, actor: impl Into<Actor>) -> Result<&mut Self> {
        self.ensure_open()?;
        let actor = actor.into();
        debug!("Adding {} to plotter '{}'", actor.name(), self.config.title);
        self.actors.push(actor);
        Ok(self)
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn clear(&mut self) {
        self.actors.clear();
    }

    /// Present stored actors plus `extra`
    ///
    /// `zoom` of `None` uses the configured default. The extra actors are
    /// shown for this frame only and are not stored.
    pub fn show(
        &mut self,
        extra: impl IntoIterator<Item = Actor>,
        zoom: Option<f64>,
    ) -> Result<SceneSnapshot> {
        self.ensure_open()?;
        let extra: Vec<Actor> = extra.into_iter().collect();
        let zoom = zoom.unwrap_or(self.config.default_zoom);

        let bounds = combined_bounds(self.actors.iter().chain(&extra));
        if bounds.is_none() {
            warn!("Showing plotter '{}' with nothing to draw", self.config.title);
        }
        let camera = Camera::fit(
            bounds.as_ref(),
            self.config.camera_direction,
            zoom,
            self.config.aspect(),
        )?;

        let nodes = self
            .actors
            .iter()
            .chain(&extra)
            .flat_map(Renderable::nodes)
            .collect();
        let snapshot = SceneSnapshot {
            title: self.config.title.clone(),
            size: self.config.size,
            background: self.background,
            camera,
            nodes,
        };

        self.backend.present(&snapshot)?;
        info!(
            "Showed '{}': {} actors, {} nodes, zoom {:.2}",
            snapshot.title,
            self.actors.len() + extra.len(),
            snapshot.node_count(),
            zoom
        );
        Ok(snapshot)
    }

    /// Release the backend; later calls are no-ops
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.actors.clear();
        info!("Closing plotter '{}'", self.config.title);
        self.backend.release()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Drop for Plotter {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Failed to release display backend: {}", e);
        }
    }
}

impl std::fmt::Debug for Plotter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plotter")
            .field("config", &self.config)
            .field("backend", &self.backend.name())
            .field("actors", &self.actors.len())
            .field("closed", &self.closed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::backend::MemoryBackend;
    use crate::view::{Points, Text3D};
    use approx::assert_relative_eq;
    use nalgebra::Point3;
    use plotcloud_core::PointCloud;

    fn plotter() -> (Plotter, crate::engine::backend::MemoryHandle) {
        let backend = MemoryBackend::new();
        let handle = backend.handle();
        let plotter = Plotter::new(PlotterConfig::default(), Box::new(backend)).unwrap();
        (plotter, handle)
    }

    fn cloud_actor() -> Points {
        Points::new(
            PointCloud::from_rows(&[[-1.0, -1.0, -1.0], [1.0, 1.0, 1.0]]),
            Color::parse("red").unwrap(),
        )
    }

    #[test]
    fn test_show_combines_stored_and_extra_actors() {
        let (mut plt, handle) = plotter();
        plt.add(cloud_actor()).unwrap();

        let label = Text3D::new("note", Point3::origin(), 0.2, Color::BLACK);
        let snapshot = plt.show([Actor::from(label)], None).unwrap();

        assert_eq!(snapshot.node_count(), 2);
        assert_eq!(plt.actors().len(), 1);
        assert_eq!(handle.frame_count().unwrap(), 1);
        assert_eq!(snapshot.background, Color::WHITE);
    }

    #[test]
    fn test_zoom_moves_camera_closer() {
        let (mut plt, _) = plotter();
        plt.add(cloud_actor()).unwrap();

        let wide = plt.show([], Some(1.0)).unwrap();
        let close = plt.show([], Some(2.5)).unwrap();
        assert_relative_eq!(wide.camera.distance / close.camera.distance, 2.5, epsilon = 1e-12);
        assert!(plt.show([], Some(-1.0)).is_err());
    }

    #[test]
    fn test_closed_plotter_rejects_calls() {
        let (mut plt, handle) = plotter();
        plt.add(cloud_actor()).unwrap();
        plt.close().unwrap();
        plt.close().unwrap();

        assert!(plt.is_closed());
        assert!(handle.is_released().unwrap());
        assert!(matches!(plt.add(cloud_actor()), Err(VisualizationError::PlotterClosed)));
        assert!(matches!(plt.show([], None), Err(VisualizationError::PlotterClosed)));
    }

    #[test]
    fn test_drop_releases_backend() {
        let (plt, handle) = plotter();
        drop(plt);
        assert!(handle.is_released().unwrap());
    }
}
