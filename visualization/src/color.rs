//! Color parsing, palettes and scalar color maps
//!
//! Colors are accepted as CSS names, short nicknames (`"r"`, `"dg"`, ...),
//! `#rrggbb` hex strings or palette indices (`"0"` to `"9"`). Color maps
//! turn a scalar into a color; a `_r` suffix reverses a map.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VisualizationError};

/// Linear RGB color with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Color with opacity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub color: Color,
    pub alpha: f64,
}

const NAMED_COLORS: &[(&str, &str)] = &[
    ("aqua", "#00FFFF"),
    ("beige", "#F5F5DC"),
    ("black", "#000000"),
    ("blackboard", "#393939"),
    ("blue", "#0000FF"),
    ("blueviolet", "#8A2BE2"),
    ("brown", "#A52A2A"),
    ("chocolate", "#D2691E"),
    ("coral", "#FF7F50"),
    ("cornflowerblue", "#6495ED"),
    ("crimson", "#DC143C"),
    ("cyan", "#00FFFF"),
    ("darkblue", "#00008B"),
    ("darkcyan", "#008B8B"),
    ("darkgray", "#A9A9A9"),
    ("darkgreen", "#006400"),
    ("darkmagenta", "#8B008B"),
    ("darkorange", "#FF8C00"),
    ("darkred", "#8B0000"),
    ("darksalmon", "#E9967A"),
    ("darkviolet", "#9400D3"),
    ("deepskyblue", "#00BFFF"),
    ("dodgerblue", "#1E90FF"),
    ("firebrick", "#B22222"),
    ("forestgreen", "#228B22"),
    ("fuchsia", "#FF00FF"),
    ("gold", "#FFD700"),
    ("gray", "#808080"),
    ("green", "#008000"),
    ("hotpink", "#FF69B4"),
    ("indigo", "#4B0082"),
    ("ivory", "#FFFFF0"),
    ("khaki", "#F0E68C"),
    ("lavender", "#E6E6FA"),
    ("lightblue", "#ADD8E6"),
    ("lightcyan", "#E0FFFF"),
    ("lightgray", "#D3D3D3"),
    ("lightgreen", "#90EE90"),
    ("lightsalmon", "#FFA07A"),
    ("lightyellow", "#FFFFE0"),
    ("lime", "#00FF00"),
    ("magenta", "#FF00FF"),
    ("maroon", "#800000"),
    ("navy", "#000080"),
    ("olive", "#808000"),
    ("orange", "#FFA500"),
    ("orangered", "#FF4500"),
    ("orchid", "#DA70D6"),
    ("pink", "#FFC0CB"),
    ("plum", "#DDA0DD"),
    ("purple", "#800080"),
    ("red", "#FF0000"),
    ("royalblue", "#4169E1"),
    ("salmon", "#FA8072"),
    ("seagreen", "#2E8B57"),
    ("sienna", "#A0522D"),
    ("silver", "#C0C0C0"),
    ("skyblue", "#87CEEB"),
    ("steelblue", "#4682B4"),
    ("tan", "#D2B48C"),
    ("teal", "#008080"),
    ("tomato", "#FF6347"),
    ("turquoise", "#40E0D0"),
    ("violet", "#EE82EE"),
    ("wheat", "#F5DEB3"),
    ("white", "#FFFFFF"),
    ("whitesmoke", "#F5F5F5"),
    ("yellow", "#FFFF00"),
    ("yellowgreen", "#9ACD32"),
];

const NICKNAMES: &[(&str, &str)] = &[
    ("a", "aqua"),
    ("b", "blue"),
    ("c", "cyan"),
    ("d", "gold"),
    ("f", "fuchsia"),
    ("g", "green"),
    ("i", "indigo"),
    ("k", "black"),
    ("m", "magenta"),
    ("n", "navy"),
    ("l", "lavender"),
    ("o", "orange"),
    ("p", "purple"),
    ("r", "red"),
    ("s", "salmon"),
    ("t", "tomato"),
    ("v", "violet"),
    ("y", "yellow"),
    ("w", "white"),
    ("bb", "blackboard"),
    ("lb", "lightblue"),
    ("lg", "lightgreen"),
    ("lr", "orangered"),
    ("lc", "lightcyan"),
    ("ls", "lightsalmon"),
    ("ly", "lightyellow"),
    ("dr", "darkred"),
    ("db", "darkblue"),
    ("dg", "darkgreen"),
    ("dm", "darkmagenta"),
    ("dc", "darkcyan"),
    ("ds", "darksalmon"),
    ("dv", "darkviolet"),
];

/// Palette selected by integer color numbers
const PALETTE: [[f64; 3]; 10] = [
    [1.0, 0.832, 0.0],
    [0.960, 0.509, 0.188],
    [0.901, 0.098, 0.194],
    [0.235, 0.85, 0.294],
    [0.46, 0.48, 0.0],
    [0.274, 0.941, 0.941],
    [0.0, 0.509, 0.784],
    [0.1, 0.1, 0.9],
    [0.902, 0.7, 1.0],
    [0.941, 0.196, 0.901],
];

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Parse any supported color specification
    pub fn parse(spec: &str) -> Result<Self> {
        let key = spec.trim().to_lowercase().replace("grey", "gray").replace(' ', "");
        if key.starts_with('#') {
            return Self::from_hex(&key);
        }
        if let Ok(index) = key.parse::<usize>() {
            return Ok(Self::palette(index));
        }
        let name = NICKNAMES
            .iter()
            .find(|(nick, _)| *nick == key)
            .map_or(key.as_str(), |(_, name)| *name);
        NAMED_COLORS
            .iter()
            .find(|(n, _)| *n == name)
            .ok_or_else(|| VisualizationError::UnknownColor(spec.to_owned()))
            .and_then(|(_, hex)| Self::from_hex(hex))
    }

    /// Parse `#rrggbb`
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim_start_matches('#');
        let bad = || VisualizationError::UnknownColor(hex.to_owned());
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(bad());
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map(|v| v as f64 / 255.0)
                .map_err(|_| bad())
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Palette entry, wrapping around
    pub fn palette(index: usize) -> Self {
        let [r, g, b] = PALETTE[index % PALETTE.len()];
        Self::new(r, g, b)
    }

    pub fn to_hex(&self) -> String {
        let to_byte = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", to_byte(self.r), to_byte(self.g), to_byte(self.b))
    }

    /// Linear interpolation towards `other`, `t` in `[0, 1]`
    pub fn lerp(&self, other: &Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    pub fn with_alpha(self, alpha: f64) -> Rgba {
        Rgba {
            color: self,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    /// Closest named color
    pub fn name(&self) -> &'static str {
        let distance = |c: &Color| (c.r - self.r).powi(2) + (c.g - self.g).powi(2) + (c.b - self.b).powi(2);
        NAMED_COLORS
            .iter()
            .filter_map(|(name, hex)| Color::from_hex(hex).ok().map(|c| (*name, distance(&c))))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map_or("black", |(name, _)| name)
    }
}

impl FromStr for Color {
    type Err = VisualizationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// `n` colors evenly interpolated from `from` to `to`, endpoints included
pub fn palette(from: Color, to: Color, n: usize) -> Vec<Color> {
    match n {
        0 => Vec::new(),
        1 => vec![from],
        _ => (0..n)
            .map(|i| from.lerp(&to, i as f64 / (n - 1) as f64))
            .collect(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorMapKind {
    Jet,
    Viridis,
    Grayscale,
}

/// Scalar to color mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorMap {
    pub kind: ColorMapKind,
    pub reversed: bool,
}

const VIRIDIS: [[f64; 3]; 9] = [
    [0.267, 0.005, 0.329],
    [0.279, 0.175, 0.483],
    [0.230, 0.322, 0.546],
    [0.173, 0.449, 0.558],
    [0.128, 0.567, 0.551],
    [0.154, 0.680, 0.504],
    [0.360, 0.785, 0.388],
    [0.667, 0.862, 0.196],
    [0.993, 0.906, 0.144],
];

impl ColorMap {
    pub fn new(kind: ColorMapKind) -> Self {
        Self { kind, reversed: false }
    }

    /// Parse a map name such as `"jet"` or `"viridis_r"`
    pub fn parse(name: &str) -> Result<Self> {
        let lower = name.trim().to_lowercase();
        let (base, reversed) = match lower.strip_suffix("_r") {
            Some(base) => (base, true),
            None => (lower.as_str(), false),
        };
        let kind = match base {
            "jet" => ColorMapKind::Jet,
            "viridis" => ColorMapKind::Viridis,
            "gray" | "grey" | "grayscale" => ColorMapKind::Grayscale,
            _ => return Err(VisualizationError::invalid("colormap", format!("unknown map {name}"))),
        };
        Ok(Self { kind, reversed })
    }

    /// Color for `value` within `[vmin, vmax]`, clamped at both ends
    pub fn map(&self, value: f64, vmin: f64, vmax: f64) -> Color {
        let span = vmax - vmin;
        let mut t = if span > 0.0 && value.is_finite() {
            ((value - vmin) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        if self.reversed {
            t = 1.0 - t;
        }
        match self.kind {
            ColorMapKind::Jet => {
                let ramp = |shift: f64| (1.5 - (4.0 * t - shift).abs()).clamp(0.0, 1.0);
                Color::new(ramp(3.0), ramp(2.0), ramp(1.0))
            }
            ColorMapKind::Viridis => {
                let pos = t * (VIRIDIS.len() - 1) as f64;
                let i = (pos as usize).min(VIRIDIS.len() - 2);
                let [r0, g0, b0] = VIRIDIS[i];
                let [r1, g1, b1] = VIRIDIS[i + 1];
                Color::new(r0, g0, b0).lerp(&Color::new(r1, g1, b1), pos - i as f64)
            }
            ColorMapKind::Grayscale => Color::new(t, t, t),
        }
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        Self::new(ColorMapKind::Jet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_names_nicknames_and_hex() {
        assert_eq!(Color::parse("red").unwrap(), Color::new(1.0, 0.0, 0.0));
        assert_eq!(Color::parse("r").unwrap(), Color::parse("red").unwrap());
        assert_eq!(Color::parse("Dark Green").unwrap(), Color::parse("dg").unwrap());
        assert_eq!(Color::parse("grey").unwrap(), Color::parse("gray").unwrap());
        assert_eq!(Color::parse("#00ff00").unwrap(), Color::new(0.0, 1.0, 0.0));
        assert_eq!(Color::parse("12").unwrap(), Color::palette(2));
    }

    #[test]
    fn test_unknown_colors_rejected() {
        assert!(matches!(Color::parse("notacolor"), Err(VisualizationError::UnknownColor(_))));
        assert!(Color::parse("#12345").is_err());
        assert!(Color::parse("#gg0000").is_err());
    }

    #[test]
    fn test_hex_round_trip_and_name() {
        let c = Color::parse("steelblue").unwrap();
        assert_eq!(c.to_hex(), "#4682b4");
        assert_eq!(c.name(), "steelblue");
        assert_eq!(Color::new(0.99, 0.01, 0.0).name(), "red");
    }

    #[test]
    fn test_palette_endpoints() {
        let colors = palette(Color::BLACK, Color::WHITE, 5);
        assert_eq!(colors.len(), 5);
        assert_eq!(colors[0], Color::BLACK);
        assert_eq!(colors[4], Color::WHITE);
        assert_relative_eq!(colors[2].g, 0.5);
        assert!(palette(Color::BLACK, Color::WHITE, 0).is_empty());
    }

    #[test]
    fn test_jet_and_reversal() {
        let jet = ColorMap::parse("jet").unwrap();
        let low = jet.map(0.0, 0.0, 1.0);
        let high = jet.map(1.0, 0.0, 1.0);
        assert!(low.b > low.r);
        assert!(high.r > high.b);

        let reversed = ColorMap::parse("jet_r").unwrap();
        assert_eq!(reversed.map(0.0, 0.0, 1.0), high);
        // Out of range values clamp
        assert_eq!(jet.map(-5.0, 0.0, 1.0), low);
    }

    #[test]
    fn test_degenerate_range_maps_to_low_end() {
        let gray = ColorMap::new(ColorMapKind::Grayscale);
        assert_eq!(gray.map(3.0, 3.0, 3.0), Color::BLACK);
        assert_eq!(gray.map(0.5, 0.0, 1.0), Color::new(0.5, 0.5, 0.5));
        assert!(ColorMap::parse("rainbowish").is_err());
    }
}
