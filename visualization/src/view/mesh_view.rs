//! Surface mesh actor, used for fitted ellipsoids
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use plotcloud_core::{Aabb, Ellipsoid, TriangleMesh};

use crate::color::Color;
use crate::engine::scene::{to_array, SceneNode};
use crate::error::Result;
use crate::view::Renderable;

#[derive(Debug, Clone, PartialEq)]
pub struct MeshActor {
    name: String,
    pub mesh: TriangleMesh,
    pub color: Color,
    pub alpha: f64,
    pub wireframe: bool,
}

impl MeshActor {
    pub fn new(mesh: TriangleMesh, color: Color) -> Self {
        Self {
            name: "Mesh".to_owned(),
            mesh,
            color,
            alpha: 1.0,
            wireframe: false,
        }
    }

    /// Tessellate an ellipsoid at the given polar resolution
    pub fn from_ellipsoid(ellipsoid: &Ellipsoid, resolution: usize, color: Color) -> Result<Self> {
        let name = if ellipsoid.confidence().is_some() { "PCAEllipsoid" } else { "Ellipsoid" };
        Ok(Self::new(ellipsoid.to_mesh(resolution)?, color).with_name(name))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn wireframe(mut self, wireframe: bool) -> Self {
        self.wireframe = wireframe;
        self
    }
}

impl Renderable for MeshActor {
    fn name(&self) -> &str {
        &self.name
    }

    fn bounds(&self) -> Option<Aabb> {
        self.mesh.bounds()
    }

    fn nodes(&self) -> Vec<SceneNode> {
        vec![SceneNode::Mesh {
            name: self.name.clone(),
            vertices: self.mesh.vertices().iter().map(to_array).collect(),
            faces: self.mesh.faces().to_vec(),
            color: self.color,
            alpha: self.alpha,
            wireframe: self.wireframe,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_ellipsoid_mesh_node() {
        let sphere = Ellipsoid::sphere(Point3::new(1.0, 1.0, 1.0), 2.0).unwrap();
        let actor = MeshActor::from_ellipsoid(&sphere, 8, Color::WHITE).unwrap().alpha(0.2);

        assert_eq!(actor.name(), "Ellipsoid");
        let bounds = actor.bounds().unwrap();
        assert!((bounds.max.z - 3.0).abs() < 1e-9);

        match &actor.nodes()[0] {
            SceneNode::Mesh { vertices, faces, alpha, .. } => {
                assert_eq!(vertices.len(), actor.mesh.vertex_count());
                assert_eq!(faces.len(), actor.mesh.face_count());
                assert_eq!(*alpha, 0.2);
            }
            other => panic!("unexpected node {other:?}"),
        }
    }

    #[test]
    fn test_low_resolution_rejected() {
        let sphere = Ellipsoid::sphere(Point3::origin(), 1.0).unwrap();
        assert!(MeshActor::from_ellipsoid(&sphere, 2, Color::WHITE).is_err());
    }
}
