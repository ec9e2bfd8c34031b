//! Text annotations placed in 3D
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use nalgebra::Point3;
use plotcloud_core::Aabb;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::engine::scene::{to_array, SceneNode};
use crate::view::Renderable;

/// Horizontal anchoring of the text relative to its position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Justify {
    #[default]
    Left,
    Center,
    Right,
}

/// Approximate glyph advance as a fraction of the text size
const GLYPH_WIDTH: f64 = 0.6;

#[derive(Debug, Clone, PartialEq)]
pub struct Text3D {
    pub text: String,
    pub position: Point3<f64>,
    pub size: f64,
    pub color: Color,
    pub justify: Justify,
}

impl Text3D {
    pub fn new(text: impl Into<String>, position: Point3<f64>, size: f64, color: Color) -> Self {
        Self {
            text: text.into(),
            position,
            size,
            color,
            justify: Justify::Left,
        }
    }

    pub fn justify(mut self, justify: Justify) -> Self {
        self.justify = justify;
        self
    }

    /// Estimated width of the rendered string
    pub fn width(&self) -> f64 {
        self.text.lines().map(|l| l.chars().count()).max().unwrap_or(0) as f64 * GLYPH_WIDTH * self.size
    }
}

impl Renderable for Text3D {
    fn name(&self) -> &str {
        "Text3D"
    }

    fn bounds(&self) -> Option<Aabb> {
        let width = self.width();
        let left = match self.justify {
            Justify::Left => self.position.x,
            Justify::Center => self.position.x - 0.5 * width,
            Justify::Right => self.position.x - width,
        };
        let lines = self.text.lines().count().max(1) as f64;
        Some(Aabb::new(
            Point3::new(left, self.position.y, self.position.z),
            Point3::new(left + width, self.position.y + lines * self.size, self.position.z),
        ))
    }

    fn nodes(&self) -> Vec<SceneNode> {
        vec![SceneNode::Text {
            name: self.name().to_owned(),
            text: self.text.clone(),
            position: to_array(&self.position),
            size: self.size,
            color: self.color,
            justify: self.justify,
        }]
    }
}
