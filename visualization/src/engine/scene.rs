//! Backend-neutral scene description
//!
//! A [`SceneSnapshot`] is what the plotter hands to a display backend: the
//! flattened geometry of every actor plus a camera fitted to the scene
//! bounds. Snapshots serialize to JSON so file backends can persist them.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use glam::{DVec3, Mat4, Vec3};
use nalgebra::Point3;
use plotcloud_core::Aabb;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{Result, VisualizationError};
use crate::view::histogram_view::Marker;
use crate::view::text_view::Justify;

/// Flattened geometry of one drawable element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SceneNode {
    /// Axis-aligned rectangles in the z = 0 plane, `[x0, y0, x1, y1]`
    Bars {
        name: String,
        rects: Vec<[f64; 4]>,
        colors: Vec<Color>,
        alpha: f64,
    },

    /// Straight line segments
    Segments {
        name: String,
        segments: Vec<[[f64; 3]; 2]>,
        color: Color,
        line_width: f64,
    },

    /// Glyphs at given positions
    Markers {
        name: String,
        marker: Marker,
        positions: Vec<[f64; 3]>,
        color: Color,
        size: f64,
    },

    Points {
        name: String,
        positions: Vec<[f64; 3]>,
        color: Color,
        alpha: f64,
        radius: f64,
    },

    Mesh {
        name: String,
        vertices: Vec<[f64; 3]>,
        faces: Vec<[usize; 3]>,
        color: Color,
        alpha: f64,
        wireframe: bool,
    },

    Text {
        name: String,
        text: String,
        position: [f64; 3],
        size: f64,
        color: Color,
        justify: Justify,
    },
}

impl SceneNode {
    pub fn name(&self) -> &str {
        match self {
            Self::Bars { name, .. }
            | Self::Segments { name, .. }
            | Self::Markers { name, .. }
            | Self::Points { name, .. }
            | Self::Mesh { name, .. }
            | Self::Text { name, .. } => name,
        }
    }
}

pub(crate) fn to_array(p: &Point3<f64>) -> [f64; 3] {
    [p.x, p.y, p.z]
}

/// Perspective camera looking at the scene centre
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: [f64; 3],
    pub focal_point: [f64; 3],
    pub view_up: [f64; 3],

    /// Vertical field of view in degrees
    pub fov_degrees: f64,

    pub distance: f64,
    pub zoom: f64,

    /// Column-major view matrix
    pub view: [[f32; 4]; 4],

    /// Column-major projection matrix
    pub projection: [[f32; 4]; 4],
}

impl Camera {
    pub const DEFAULT_FOV_DEGREES: f64 = 30.0;

    /// Fit a camera to `bounds`, looking along `-direction`
    ///
    /// At zoom 1 the bounding sphere just fills the field of view; larger
    /// zoom moves the camera proportionally closer.
    pub fn fit(bounds: Option<&Aabb>, direction: [f64; 3], zoom: f64, aspect: f64) -> Result<Self> {
        if !(zoom.is_finite() && zoom > 0.0) {
            return Err(VisualizationError::invalid("zoom", format!("{zoom} must be positive")));
        }
        let direction = DVec3::from_array(direction);
        if direction.length_squared() == 0.0 || !direction.is_finite() {
            return Err(VisualizationError::invalid("camera direction", "must be a non-zero vector"));
        }
        let direction = direction.normalize();

        let (center, radius) = match bounds {
            Some(b) => {
                let c = b.center();
                (DVec3::new(c.x, c.y, c.z), (0.5 * b.diagonal()).max(1e-9))
            }
            None => (DVec3::ZERO, 1.0),
        };

        let fov = Self::DEFAULT_FOV_DEGREES.to_radians();
        let distance = radius / (0.5 * fov).sin() / zoom;
        let position = center + direction * distance;
        let up = if direction.cross(DVec3::Y).length() < 1e-6 {
            DVec3::Z
        } else {
            DVec3::Y
        };

        let view = Mat4::look_at_rh(position.as_vec3(), center.as_vec3(), up.as_vec3());
        let near = (distance - radius).max(distance * 1e-3) as f32;
        let far = (distance + radius) as f32;
        let projection = Mat4::perspective_rh(fov as f32, aspect as f32, near, far);

        Ok(Self {
            position: position.to_array(),
            focal_point: center.to_array(),
            view_up: up.to_array(),
            fov_degrees: Self::DEFAULT_FOV_DEGREES,
            distance,
            zoom,
            view: view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
        })
    }

    /// Project a world point to normalized device coordinates
    pub fn project(&self, point: [f64; 3]) -> [f32; 3] {
        let view = Mat4::from_cols_array_2d(&self.view);
        let projection = Mat4::from_cols_array_2d(&self.projection);
        let p = Vec3::new(point[0] as f32, point[1] as f32, point[2] as f32);
        (projection * view).project_point3(p).to_array()
    }
}

/// Complete frame presented to a display backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub title: String,
    pub size: (u32, u32),
    pub background: Color,
    pub camera: Camera,
    pub nodes: Vec<SceneNode>,
}

impl SceneSnapshot {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a SceneNode> + 'a {
        self.nodes.iter().filter(move |n| n.name() == name)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
