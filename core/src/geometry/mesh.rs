//! Triangle meshes and point-in-mesh containment
//!
//! Containment uses the crossing-number rule: a ray cast from the query
//! point crosses a closed surface an odd number of times iff the point is
//! inside. Ray/triangle intersection is Möller–Trumbore.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::f64::consts::PI;

use log::debug;
use nalgebra::{Matrix4, Point3, Vector3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::geometry::points::{Aabb, PointCloud};

/// Intersections closer than this along the ray are ignored
const RAY_EPSILON: f64 = 1e-12;

/// Indexed triangle mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    vertices: Vec<Point3<f64>>,
    faces: Vec<[usize; 3]>,
}

impl TriangleMesh {
    /// Build a mesh, checking that every face index refers to a vertex
    pub fn new(vertices: Vec<Point3<f64>>, faces: Vec<[usize; 3]>) -> Result<Self> {
        if let Some(face) = faces.iter().find(|f| f.iter().any(|&i| i >= vertices.len())) {
            return Err(CoreError::invalid(
                "faces",
                format!("face {face:?} indexes past {} vertices", vertices.len()),
            ));
        }
        Ok(Self { vertices, faces })
    }

    /// Unit sphere with `theta_res` azimuthal and `phi_res` polar divisions
    pub fn uv_sphere(theta_res: usize, phi_res: usize) -> Self {
        let theta_res = theta_res.max(3);
        let phi_res = phi_res.max(2);

        let mut vertices = Vec::with_capacity(2 + (phi_res - 1) * theta_res);
        vertices.push(Point3::new(0.0, 0.0, 1.0));
        for i in 1..phi_res {
            let phi = PI * i as f64 / phi_res as f64;
            for j in 0..theta_res {
                let theta = 2.0 * PI * j as f64 / theta_res as f64;
                vertices.push(Point3::new(
                    phi.sin() * theta.cos(),
                    phi.sin() * theta.sin(),
                    phi.cos(),
                ));
            }
        }
        let south = vertices.len();
        vertices.push(Point3::new(0.0, 0.0, -1.0));

        let ring = |i: usize, j: usize| 1 + i * theta_res + j % theta_res;
        let mut faces = Vec::with_capacity(2 * theta_res * (phi_res - 1));
        for j in 0..theta_res {
            faces.push([0, ring(0, j), ring(0, j + 1)]);
        }
        for i in 0..phi_res - 2 {
            for j in 0..theta_res {
                faces.push([ring(i, j), ring(i + 1, j), ring(i + 1, j + 1)]);
                faces.push([ring(i, j), ring(i + 1, j + 1), ring(i, j + 1)]);
            }
        }
        for j in 0..theta_res {
            faces.push([ring(phi_res - 2, j), south, ring(phi_res - 2, j + 1)]);
        }

        Self { vertices, faces }
    }

    /// Copy with every vertex mapped through a homogeneous transform
    pub fn transformed(&self, transform: &Matrix4<f64>) -> Self {
        Self {
            vertices: self
                .vertices
                .iter()
                .map(|v| transform.transform_point(v))
                .collect(),
            faces: self.faces.clone(),
        }
    }

    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.vertices)
    }

    /// Total surface area
    pub fn area(&self) -> f64 {
        self.faces
            .iter()
            .map(|&[a, b, c]| {
                let (a, b, c) = (self.vertices[a], self.vertices[b], self.vertices[c]);
                0.5 * (b - a).cross(&(c - a)).norm()
            })
            .sum()
    }

    /// Whether `point` lies inside the closed surface
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        match self.bounds() {
            Some(bounds) if bounds.contains(point) => self.crossings(point) % 2 == 1,
            _ => false,
        }
    }

    /// Points inside the surface, or outside when `invert` is set
    pub fn inside_points(&self, cloud: &PointCloud, invert: bool) -> PointCloud {
        let Some(bounds) = self.bounds() else {
            return if invert { cloud.clone() } else { PointCloud::default() };
        };
        let selected: Vec<Point3<f64>> = cloud
            .points()
            .par_iter()
            .filter(|p| (bounds.contains(p) && self.crossings(p) % 2 == 1) != invert)
            .copied()
            .collect();
        debug!(
            "Mesh with {} faces selected {} of {} points (invert: {})",
            self.face_count(),
            selected.len(),
            cloud.len(),
            invert
        );
        selected.into()
    }

    fn crossings(&self, origin: &Point3<f64>) -> usize {
        // Oblique direction so rays rarely graze edges of axis-aligned tessellations
        let direction = Vector3::new(0.4395, 0.7213, 0.5353).normalize();
        self.faces
            .iter()
            .filter(|&&[a, b, c]| {
                ray_hits_triangle(
                    origin,
                    &direction,
                    &self.vertices[a],
                    &self.vertices[b],
                    &self.vertices[c],
                )
            })
            .count()
    }
}

fn ray_hits_triangle(
    origin: &Point3<f64>,
    direction: &Vector3<f64>,
    v0: &Point3<f64>,
    v1: &Point3<f64>,
    v2: &Point3<f64>,
) -> bool {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = direction.cross(&edge2);
    let det = edge1.dot(&h);
    if det.abs() < f64::EPSILON {
        return false;
    }
    let inv = 1.0 / det;
    let s = origin - v0;
    let u = inv * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return false;
    }
    let q = s.cross(&edge1);
    let v = inv * direction.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return false;
    }
    inv * edge2.dot(&q) > RAY_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ellipsoid::Ellipsoid;
    use approx::assert_relative_eq;

    fn unit_cube() -> TriangleMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        #[rustfmt::skip]
        let faces = vec![
            [0, 2, 1], [0, 3, 2],
            [4, 5, 6], [4, 6, 7],
            [0, 1, 5], [0, 5, 4],
            [2, 3, 7], [2, 7, 6],
            [1, 2, 6], [1, 6, 5],
            [0, 4, 7], [0, 7, 3],
        ];
        TriangleMesh::new(vertices, faces).unwrap()
    }

    #[test]
    fn test_cube_containment() {
        let cube = unit_cube();

        assert!(cube.contains(&Point3::new(0.5, 0.5, 0.5)));
        assert!(cube.contains(&Point3::new(0.1, 0.9, 0.2)));
        assert!(!cube.contains(&Point3::new(1.5, 0.5, 0.5)));
        assert!(!cube.contains(&Point3::new(-0.2, 0.5, 0.5)));
        assert_relative_eq!(cube.area(), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_face_index_rejected() {
        let result = TriangleMesh::new(vec![Point3::origin()], vec![[0, 0, 1]]);
        assert!(matches!(result, Err(CoreError::InvalidParameter { .. })));
    }

    #[test]
    fn test_uv_sphere_topology() {
        let sphere = TriangleMesh::uv_sphere(8, 4);

        assert_eq!(sphere.vertex_count(), 2 + 3 * 8);
        assert_eq!(sphere.face_count(), 2 * 8 * 3);
        for v in sphere.vertices() {
            assert_relative_eq!(v.coords.norm(), 1.0, epsilon = 1e-12);
        }
        // Closed surface: every edge is shared by exactly two faces
        let mut edges = std::collections::HashMap::new();
        for f in sphere.faces() {
            for k in 0..3 {
                let (a, b) = (f[k], f[(k + 1) % 3]);
                *edges.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
        assert!(edges.values().all(|&n| n == 2));
    }

    #[test]
    fn test_mesh_agrees_with_analytic_ellipsoid() {
        let ellipsoid = Ellipsoid::new(
            Point3::new(1.0, -1.0, 0.5),
            Vector3::new(3.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 1.0),
            Vector3::new(0.0, -0.5, 0.5),
        )
        .unwrap();
        let mesh = ellipsoid.to_mesh(24).unwrap();

        let mut probes = Vec::new();
        for i in 0..40 {
            let t = i as f64 * 0.61;
            let direction = Vector3::new(t.cos() * (0.3 * t).sin(), t.sin(), (0.7 * t).cos());
            for scale in [0.5, 1.5] {
                let tip = ellipsoid.transformation().transform_vector(&direction.normalize());
                probes.push(ellipsoid.center() + tip * scale);
            }
        }
        let cloud = PointCloud::new(probes);

        let analytic = ellipsoid.inside_points(&cloud, false);
        let meshed = mesh.inside_points(&cloud, false);
        assert_eq!(analytic.len(), 40);
        assert_eq!(analytic, meshed);
        assert_eq!(mesh.inside_points(&cloud, true).len(), 40);
    }
}
