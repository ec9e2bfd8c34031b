//! Uniformly binned 1D histogram with statistical uncertainties
//!
//! Samples are accumulated into half-open bins `[lo, hi)`; the last bin also
//! includes the upper range edge. Each bin keeps the sum of weights and the
//! sum of squared weights so that the uncertainty `sqrt(sumw2)` is available
//! for weighted and unweighted fills alike.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::HistogramDefaults;
use crate::error::{CoreError, Result};

/// Options controlling histogram construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramOptions {
    /// Number of uniform bins
    pub bins: usize,

    /// Explicit `(low, high)` range, `None` to use the sample extent
    pub range: Option<(f64, f64)>,

    /// Per-sample weights, same length as the samples
    pub weights: Option<Vec<f64>>,

    /// Normalize contents to a probability density
    pub density: bool,
}

impl Default for HistogramOptions {
    fn default() -> Self {
        Self::from(&HistogramDefaults::default())
    }
}

impl From<&HistogramDefaults> for HistogramOptions {
    fn from(defaults: &HistogramDefaults) -> Self {
        Self {
            bins: defaults.bins,
            range: None,
            weights: None,
            density: defaults.density,
        }
    }
}

impl HistogramOptions {
    pub fn with_bins(bins: usize) -> Self {
        Self {
            bins,
            ..Self::default()
        }
    }

    pub fn range(mut self, low: f64, high: f64) -> Self {
        self.range = Some((low, high));
        self
    }

    pub fn weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn density(mut self, density: bool) -> Self {
        self.density = density;
        self
    }
}

/// Binned frequency summary of a 1D sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram1D {
    /// Bin edges, `bins + 1` entries
    edges: Vec<f64>,

    /// Sum of weights per bin
    counts: Vec<f64>,

    /// Sum of squared weights per bin
    sumw2: Vec<f64>,

    /// Weight that fell below the range
    underflow: f64,

    /// Weight that fell above the range
    overflow: f64,

    /// Number of finite samples seen, in range or not
    entries: usize,

    /// Number of non-finite samples ignored
    skipped: usize,

    /// Contents are a probability density
    density: bool,
}

impl Histogram1D {
    /// Bin `samples` according to `options`
    pub fn new(samples: &[f64], options: &HistogramOptions) -> Result<Self> {
        if options.bins == 0 {
            return Err(CoreError::invalid("bins", "must be at least 1"));
        }
        let (low, high) = match options.range {
            Some(range) => range,
            None => sample_extent(samples)?,
        };
        let edges = uniform_edges(low, high, options.bins)?;
        let mut histogram = Self::empty(edges, options.density);
        histogram.fill(samples, options.weights.as_deref())?;
        Ok(histogram)
    }

    /// Bin `samples` with the same edges and normalization as `template`
    pub fn like(template: &Histogram1D, samples: &[f64], weights: Option<&[f64]>) -> Result<Self> {
        let mut histogram = Self::empty(template.edges.clone(), template.density);
        histogram.fill(samples, weights)?;
        Ok(histogram)
    }

    fn empty(edges: Vec<f64>, density: bool) -> Self {
        let bins = edges.len() - 1;
        Self {
            edges,
            counts: vec![0.0; bins],
            sumw2: vec![0.0; bins],
            underflow: 0.0,
            overflow: 0.0,
            entries: 0,
            skipped: 0,
            density,
        }
    }

    fn fill(&mut self, samples: &[f64], weights: Option<&[f64]>) -> Result<()> {
        if let Some(weights) = weights {
            if weights.len() != samples.len() {
                return Err(CoreError::invalid(
                    "weights",
                    format!("expected {} weights, got {}", samples.len(), weights.len()),
                ));
            }
        }

        for (i, &x) in samples.iter().enumerate() {
            let w = weights.map_or(1.0, |w| w[i]);
            if !x.is_finite() || !w.is_finite() {
                self.skipped += 1;
                continue;
            }
            self.entries += 1;
            match self.find_bin(x) {
                Some(bin) => {
                    self.counts[bin] += w;
                    self.sumw2[bin] += w * w;
                }
                None if x < self.edges[0] => self.underflow += w,
                None => self.overflow += w,
            }
        }

        if self.density {
            self.normalize_density();
        }

        debug!(
            "Filled histogram: {} bins, {} entries, {} skipped",
            self.bins(),
            self.entries,
            self.skipped
        );
        Ok(())
    }

    fn normalize_density(&mut self) {
        let total: f64 = self.counts.iter().sum();
        if total <= 0.0 {
            return;
        }
        for i in 0..self.bins() {
            let scale = 1.0 / (total * self.width(i));
            self.counts[i] *= scale;
            self.sumw2[i] *= scale * scale;
        }
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn range(&self) -> (f64, f64) {
        (self.edges[0], self.edges[self.bins()])
    }

    /// Bin centres
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|e| 0.5 * (e[0] + e[1])).collect()
    }

    pub fn width(&self, bin: usize) -> f64 {
        self.edges[bin + 1] - self.edges[bin]
    }

    pub fn contents(&self) -> &[f64] {
        &self.counts
    }

    pub fn content(&self, bin: usize) -> Option<f64> {
        self.counts.get(bin).copied()
    }

    /// Statistical uncertainty of a bin
    pub fn error(&self, bin: usize) -> Option<f64> {
        self.sumw2.get(bin).map(|s| s.sqrt())
    }

    pub fn errors(&self) -> Vec<f64> {
        self.sumw2.iter().map(|s| s.sqrt()).collect()
    }

    pub fn underflow(&self) -> f64 {
        self.underflow
    }

    pub fn overflow(&self) -> f64 {
        self.overflow
    }

    pub fn entries(&self) -> usize {
        self.entries
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn is_density(&self) -> bool {
        self.density
    }

    /// Index of the bin holding `x`, `None` outside the range
    pub fn find_bin(&self, x: f64) -> Option<usize> {
        let (low, high) = self.range();
        if !(x >= low && x <= high) {
            return None;
        }
        // Index from the stored edges so a sample on edges[i] lands in bin i
        let upper = self.edges.partition_point(|&e| e <= x);
        Some(upper.saturating_sub(1).min(self.bins() - 1))
    }

    /// Sum of bin contents
    pub fn total(&self) -> f64 {
        self.counts.iter().sum()
    }

    /// Sum of contents times bin widths
    pub fn integral(&self) -> f64 {
        (0..self.bins()).map(|i| self.counts[i] * self.width(i)).sum()
    }

    pub fn max_content(&self) -> f64 {
        self.counts.iter().copied().fold(0.0, f64::max)
    }

    /// Content-weighted mean of the bin centres
    pub fn mean(&self) -> Option<f64> {
        let total = self.total();
        if total <= 0.0 {
            return None;
        }
        let sum: f64 = self
            .centers()
            .iter()
            .zip(&self.counts)
            .map(|(c, w)| c * w)
            .sum();
        Some(sum / total)
    }

    /// Content-weighted standard deviation of the bin centres
    pub fn std_dev(&self) -> Option<f64> {
        let mean = self.mean()?;
        let total = self.total();
        let var: f64 = self
            .centers()
            .iter()
            .zip(&self.counts)
            .map(|(c, w)| w * (c - mean).powi(2))
            .sum::<f64>()
            / total;
        Some(var.sqrt())
    }
}

fn sample_extent(samples: &[f64]) -> Result<(f64, f64)> {
    let (low, high) = samples
        .iter()
        .filter(|x| x.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        });
    if low > high {
        return Err(CoreError::EmptySample);
    }
    if low == high {
        return Ok((low - 0.5, high + 0.5));
    }
    Ok((low, high))
}

fn uniform_edges(low: f64, high: f64, bins: usize) -> Result<Vec<f64>> {
    if !low.is_finite() || !high.is_finite() || low >= high {
        return Err(CoreError::invalid(
            "range",
            format!("({low}, {high}) is not a finite increasing interval"),
        ));
    }
    // Dividing before subtracting keeps extents near f64::MAX finite
    let n = bins as f64;
    let width = high / n - low / n;
    if !(width.is_finite() && width > 0.0) {
        return Err(CoreError::invalid(
            "range",
            format!("({low}, {high}) cannot be split into {bins} bins"),
        ));
    }
    let mut edges: Vec<f64> = (0..bins).map(|i| low + i as f64 * width).collect();
    edges.push(high);
    Ok(edges)
}
