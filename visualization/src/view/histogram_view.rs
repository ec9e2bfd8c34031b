//! Histogram plot with error bars, markers and per-bin colors
//!
//! Wraps a [`Histogram1D`] with drawing style. Bars live in the z = 0 plane:
//! x is in data units and y is rescaled so that the plot's width to height
//! ratio equals the requested aspect. Individual bins can be selected and
//! recolored after construction.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::str::FromStr;

use log::debug;
use nalgebra::Point3;
use plotcloud_core::{Aabb, Histogram1D, HistogramDefaults, HistogramOptions};
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::engine::scene::SceneNode;
use crate::error::{Result, VisualizationError};
use crate::view::text_view::Justify;
use crate::view::Renderable;

/// Glyph drawn at each bin centre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    Circle,
    Square,
    Triangle,
    Diamond,
    Cross,
    Star,
}

impl FromStr for Marker {
    type Err = VisualizationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "o" | "circle" => Ok(Self::Circle),
            "s" | "square" => Ok(Self::Square),
            "^" | "triangle" => Ok(Self::Triangle),
            "d" | "D" | "diamond" => Ok(Self::Diamond),
            "x" | "+" | "cross" => Ok(Self::Cross),
            "*" | "star" => Ok(Self::Star),
            other => Err(VisualizationError::UnknownMarker(other.to_owned())),
        }
    }
}

/// Drawing options for a histogram plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramStyle {
    pub title: String,
    pub color: Color,
    pub alpha: f64,

    /// Draw `content ± error` bars
    pub show_errors: bool,

    pub marker: Option<Marker>,

    /// Plot width over plot height
    pub aspect: f64,

    pub line_width: f64,
}

impl Default for HistogramStyle {
    fn default() -> Self {
        Self::from_defaults(&HistogramDefaults::default())
    }
}

impl HistogramStyle {
    /// Style with error bars as configured and everything else at its default
    pub fn from_defaults(defaults: &HistogramDefaults) -> Self {
        Self {
            title: String::new(),
            color: Color::new(0.0, 0.509, 0.784),
            alpha: 1.0,
            show_errors: defaults.show_errors,
            marker: None,
            aspect: 4.0 / 3.0,
            line_width: 1.0,
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.aspect.is_finite() && self.aspect > 0.0) {
            return Err(VisualizationError::invalid("aspect", format!("{} must be positive", self.aspect)));
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(VisualizationError::invalid("alpha", format!("{} is outside [0, 1]", self.alpha)));
        }
        Ok(())
    }
}

/// Read-only view of a single bin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinView {
    pub index: usize,
    pub low: f64,
    pub high: f64,
    pub center: f64,
    pub content: f64,
    pub error: f64,
    pub color: Color,
}

/// Displayable histogram
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramPlot {
    name: String,
    histogram: Histogram1D,
    pub style: HistogramStyle,

    /// Per-bin color overrides
    bin_colors: Vec<Option<Color>>,
}

impl HistogramPlot {
    /// Bin `samples` into `bins` uniform bins over their extent
    pub fn new(samples: &[f64], bins: usize, style: HistogramStyle) -> Result<Self> {
        let histogram = Histogram1D::new(samples, &HistogramOptions::with_bins(bins))?;
        Self::from_histogram(histogram, style)
    }

    /// Bin `samples` with the configured bin count and normalization
    pub fn from_defaults(
        samples: &[f64],
        defaults: &HistogramDefaults,
        style: HistogramStyle,
    ) -> Result<Self> {
        let histogram = Histogram1D::new(samples, &HistogramOptions::from(defaults))?;
        Self::from_histogram(histogram, style)
    }

    pub fn from_histogram(histogram: Histogram1D, style: HistogramStyle) -> Result<Self> {
        style.validate()?;
        let bins = histogram.bins();
        Ok(Self {
            name: "Histogram".to_owned(),
            histogram,
            style,
            bin_colors: vec![None; bins],
        })
    }

    /// Bin `samples` with the layout and style of `template`
    ///
    /// Per-bin color overrides are not carried over.
    pub fn like(template: &HistogramPlot, samples: &[f64]) -> Result<Self> {
        let histogram = Histogram1D::like(&template.histogram, samples, None)?;
        let mut plot = Self::from_histogram(histogram, template.style.clone())?;
        plot.name = template.name.clone();
        Ok(plot)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Result<Self> {
        self.style.alpha = alpha;
        self.style.validate()?;
        Ok(self)
    }

    pub fn histogram(&self) -> &Histogram1D {
        &self.histogram
    }

    pub fn bin_count(&self) -> usize {
        self.histogram.bins()
    }

    /// Select a single bin
    pub fn bin(&self, index: usize) -> Option<BinView> {
        let edges = self.histogram.edges();
        let content = self.histogram.content(index)?;
        Some(BinView {
            index,
            low: edges[index],
            high: edges[index + 1],
            center: 0.5 * (edges[index] + edges[index + 1]),
            content,
            error: self.histogram.error(index).unwrap_or(0.0),
            color: self.bin_color(index),
        })
    }

    /// All bins satisfying `predicate`
    pub fn bins_where(&self, predicate: impl Fn(&BinView) -> bool) -> Vec<BinView> {
        (0..self.bin_count())
            .filter_map(|i| self.bin(i))
            .filter(|b| predicate(b))
            .collect()
    }

    fn bin_color(&self, index: usize) -> Color {
        self.bin_colors
            .get(index)
            .copied()
            .flatten()
            .unwrap_or(self.style.color)
    }

    pub fn recolor_bin(&mut self, index: usize, color: Color) -> Result<()> {
        let bins = self.bin_count();
        let slot = self
            .bin_colors
            .get_mut(index)
            .ok_or(VisualizationError::BinOutOfRange { index, bins })?;
        *slot = Some(color);
        Ok(())
    }

    /// Recolor every bin whose centre lies in `[low, high]`, returning how many changed
    pub fn recolor_range(&mut self, low: f64, high: f64, color: Color) -> usize {
        let selected: Vec<usize> = self
            .bins_where(|b| b.center >= low && b.center <= high)
            .iter()
            .map(|b| b.index)
            .collect();
        for &i in &selected {
            self.bin_colors[i] = Some(color);
        }
        debug!("Recolored {} bins of '{}' to {}", selected.len(), self.name, color);
        selected.len()
    }

    /// Drop all per-bin overrides
    pub fn reset_colors(&mut self) {
        self.bin_colors.iter_mut().for_each(|c| *c = None);
    }

    /// Factor from content units to plot units along y
    pub fn y_scale(&self) -> f64 {
        let (low, high) = self.histogram.range();
        let height = (high - low) / self.style.aspect;
        let top = (0..self.bin_count())
            .map(|i| {
                let c = self.histogram.content(i).unwrap_or(0.0);
                if self.style.show_errors {
                    c + self.histogram.error(i).unwrap_or(0.0)
                } else {
                    c
                }
            })
            .fold(0.0, f64::max);
        if top > 0.0 {
            height / top
        } else {
            1.0
        }
    }

    /// Plot-space rectangles `[x0, y0, x1, y1]`, one per bin
    pub fn bar_rects(&self) -> Vec<[f64; 4]> {
        let scale = self.y_scale();
        let edges = self.histogram.edges();
        self.histogram
            .contents()
            .iter()
            .enumerate()
            .map(|(i, c)| [edges[i], 0.0, edges[i + 1], c * scale])
            .collect()
    }

    /// Vertical error segments at bin centres, lower end clamped at zero
    pub fn error_segments(&self) -> Vec<[[f64; 3]; 2]> {
        let scale = self.y_scale();
        self.histogram
            .centers()
            .iter()
            .zip(self.histogram.contents())
            .zip(self.histogram.errors())
            .filter(|(_, e)| *e > 0.0)
            .map(|((&x, &c), e)| [[x, ((c - e) * scale).max(0.0), 0.0], [x, (c + e) * scale, 0.0]])
            .collect()
    }

    fn title_position(&self) -> [f64; 3] {
        let (low, high) = self.histogram.range();
        let height = (high - low) / self.style.aspect;
        [0.5 * (low + high), 1.08 * height, 0.0]
    }
}

impl Renderable for HistogramPlot {
    fn name(&self) -> &str {
        &self.name
    }

    fn bounds(&self) -> Option<Aabb> {
        let (low, high) = self.histogram.range();
        let top = self.title_position()[1];
        Some(Aabb::new(Point3::new(low, 0.0, 0.0), Point3::new(high, top, 0.0)))
    }

    fn nodes(&self) -> Vec<SceneNode> {
        let mut nodes = vec![SceneNode::Bars {
            name: self.name.clone(),
            rects: self.bar_rects(),
            colors: (0..self.bin_count()).map(|i| self.bin_color(i)).collect(),
            alpha: self.style.alpha,
        }];

        if self.style.show_errors {
            nodes.push(SceneNode::Segments {
                name: self.name.clone(),
                segments: self.error_segments(),
                color: Color::BLACK,
                line_width: self.style.line_width,
            });
        }

        if let Some(marker) = self.style.marker {
            let scale = self.y_scale();
            let (low, high) = self.histogram.range();
            nodes.push(SceneNode::Markers {
                name: self.name.clone(),
                marker,
                positions: self
                    .histogram
                    .centers()
                    .iter()
                    .zip(self.histogram.contents())
                    .map(|(&x, &c)| [x, c * scale, 0.0])
                    .collect(),
                color: self.style.color,
                size: 0.01 * (high - low),
            });
        }

        if !self.style.title.is_empty() {
            let (low, high) = self.histogram.range();
            nodes.push(SceneNode::Text {
                name: self.name.clone(),
                text: self.style.title.clone(),
                position: self.title_position(),
                size: 0.04 * (high - low),
                color: Color::BLACK,
                justify: Justify::Center,
            });
        }
        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn samples() -> Vec<f64> {
        (0..400).map(|i| ((i * 37) % 100) as f64 / 10.0).collect()
    }

    fn styled() -> HistogramStyle {
        HistogramStyle {
            title: "counts".into(),
            show_errors: true,
            marker: Some(Marker::Circle),
            aspect: 2.0,
            ..HistogramStyle::default()
        }
    }

    #[test]
    fn test_bin_selection() {
        let plot = HistogramPlot::new(&samples(), 10, styled()).unwrap();
        let bin = plot.bin(3).unwrap();

        assert_eq!(bin.index, 3);
        assert_relative_eq!(bin.high - bin.low, 9.9 / 10.0, epsilon = 1e-12);
        assert_relative_eq!(bin.error, bin.content.sqrt());
        assert!(plot.bin(10).is_none());
    }

    #[test]
    fn test_recolor_bin_and_range() {
        let mut plot = HistogramPlot::new(&samples(), 10, styled()).unwrap();
        let red = Color::parse("red").unwrap();

        plot.recolor_bin(0, red).unwrap();
        assert_eq!(plot.bin(0).unwrap().color, red);
        assert_eq!(plot.bin(1).unwrap().color, plot.style.color);
        assert!(matches!(
            plot.recolor_bin(10, red),
            Err(VisualizationError::BinOutOfRange { index: 10, bins: 10 })
        ));

        let changed = plot.recolor_range(5.0, 100.0, red);
        assert_eq!(changed, 5);
        assert_eq!(plot.bins_where(|b| b.color == red).len(), 6);

        plot.reset_colors();
        assert!(plot.bins_where(|b| b.color == red).is_empty());
    }

    #[test]
    fn test_aspect_sets_plot_height() {
        let plot = HistogramPlot::new(&samples(), 10, styled()).unwrap();
        let (low, high) = plot.histogram().range();

        let top = plot
            .error_segments()
            .iter()
            .map(|s| s[1][1])
            .fold(0.0, f64::max);
        assert_relative_eq!((high - low) / top, 2.0, epsilon = 1e-12);
        assert!(plot.bar_rects().iter().all(|r| r[3] <= top));
    }

    #[test]
    fn test_like_copies_layout_and_style() {
        let mut first = HistogramPlot::new(&samples(), 10, styled()).unwrap();
        first.recolor_bin(2, Color::WHITE).unwrap();

        let second = HistogramPlot::like(&first, &[1.0, 2.0, 50.0])
            .unwrap()
            .with_alpha(0.5)
            .unwrap();
        assert_eq!(second.histogram().edges(), first.histogram().edges());
        assert_eq!(second.histogram().overflow(), 1.0);
        assert_eq!(second.style.alpha, 0.5);
        assert_eq!(second.style.title, first.style.title);
        assert_eq!(second.bin(2).unwrap().color, second.style.color);
    }

    #[test]
    fn test_nodes_follow_style() {
        let plot = HistogramPlot::new(&samples(), 10, styled()).unwrap();
        let kinds: Vec<&str> = plot
            .nodes()
            .iter()
            .map(|n| match n {
                SceneNode::Bars { .. } => "bars",
                SceneNode::Segments { .. } => "segments",
                SceneNode::Markers { .. } => "markers",
                SceneNode::Text { .. } => "text",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["bars", "segments", "markers", "text"]);

        let plain = HistogramStyle {
            show_errors: false,
            ..HistogramStyle::default()
        };
        let plain = HistogramPlot::new(&samples(), 10, plain).unwrap();
        assert_eq!(plain.nodes().len(), 1);
    }

    #[test]
    fn test_configured_defaults_drive_binning_and_errors() {
        let defaults = HistogramDefaults {
            bins: 5,
            show_errors: false,
            density: true,
        };
        let style = HistogramStyle::from_defaults(&defaults);
        let plot = HistogramPlot::from_defaults(&samples(), &defaults, style).unwrap();

        assert_eq!(plot.bin_count(), 5);
        assert!(plot.histogram().is_density());
        assert_relative_eq!(plot.histogram().integral(), 1.0, epsilon = 1e-12);
        assert!(!plot.style.show_errors);
        assert_eq!(HistogramStyle::default().show_errors, HistogramDefaults::default().show_errors);
    }

    #[test]
    fn test_invalid_style_rejected() {
        let style = HistogramStyle {
            aspect: 0.0,
            ..HistogramStyle::default()
        };
        assert!(HistogramPlot::new(&samples(), 10, style).is_err());
        assert!("?".parse::<Marker>().is_err());
        assert_eq!("*".parse::<Marker>().unwrap(), Marker::Star);
    }
}
