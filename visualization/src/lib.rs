//! plotcloud visualization - actors, scenes and plotters
//!
//! Wraps the core histogram and geometry types in displayable actors,
//! composes them with `+`, and presents them through a [`Plotter`] to a
//! pluggable [`DisplayBackend`]. No pixels are produced here; a backend
//! receives a serializable [`SceneSnapshot`] describing every primitive
//! and the fitted camera.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod plotter;
pub mod view;

pub use color::{Color, ColorMap, ColorMapKind, Rgba};
pub use config::PlotterConfig;
pub use engine::{
    Camera, DisplayBackend, JsonFileBackend, MemoryBackend, MemoryHandle, NullBackend, SceneNode,
    SceneSnapshot,
};
pub use error::{Result, VisualizationError};
pub use plotter::Plotter;
pub use view::{
    Actor, Assembly, BinView, HistogramPlot, HistogramStyle, Justify, Marker, MeshActor, Points,
    Renderable, Text3D,
};
