//! Point cloud actor
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use plotcloud_core::{Aabb, PointCloud};

use crate::color::Color;
use crate::engine::scene::{to_array, SceneNode};
use crate::view::Renderable;

#[derive(Debug, Clone, PartialEq)]
pub struct Points {
    name: String,
    pub cloud: PointCloud,
    pub color: Color,
    pub alpha: f64,

    /// Glyph radius in pixels
    pub radius: f64,
}

impl Points {
    pub fn new(cloud: PointCloud, color: Color) -> Self {
        Self {
            name: "Points".to_owned(),
            cloud,
            color,
            alpha: 1.0,
            radius: 4.0,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn len(&self) -> usize {
        self.cloud.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cloud.is_empty()
    }
}

impl Renderable for Points {
    fn name(&self) -> &str {
        &self.name
    }

    fn bounds(&self) -> Option<Aabb> {
        self.cloud.bounds()
    }

    fn nodes(&self) -> Vec<SceneNode> {
        vec![SceneNode::Points {
            name: self.name.clone(),
            positions: self.cloud.iter().map(to_array).collect(),
            color: self.color,
            alpha: self.alpha,
            radius: self.radius,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn corners() -> PointCloud {
        PointCloud::from_rows(&[[-1.0, 0.0, 2.0], [3.0, -4.0, 0.5], [0.0, 1.0, 1.0]])
    }

    #[test]
    fn test_bounds_and_node_positions() {
        let points = Points::new(corners(), Color::WHITE).with_name("Inside").radius(6.0);

        let bounds = points.bounds().unwrap();
        assert_eq!(bounds.min, Point3::new(-1.0, -4.0, 0.5));
        assert_eq!(bounds.max, Point3::new(3.0, 1.0, 2.0));

        match &points.nodes()[..] {
            [SceneNode::Points { name, positions, radius, .. }] => {
                assert_eq!(name, "Inside");
                assert_eq!(positions[1], [3.0, -4.0, 0.5]);
                assert_eq!(positions.len(), points.len());
                assert_eq!(*radius, 6.0);
            }
            other => panic!("unexpected nodes {other:?}"),
        }
    }

    #[test]
    fn test_alpha_is_clamped() {
        assert_eq!(Points::new(corners(), Color::BLACK).alpha(1.7).alpha, 1.0);
        assert_eq!(Points::new(corners(), Color::BLACK).alpha(-0.3).alpha, 0.0);
        assert_eq!(Points::new(corners(), Color::BLACK).alpha(0.4).alpha, 0.4);
    }

    #[test]
    fn test_empty_cloud_has_no_bounds() {
        let points = Points::new(PointCloud::default(), Color::BLACK);
        assert!(points.is_empty());
        assert!(points.bounds().is_none());
    }
}
