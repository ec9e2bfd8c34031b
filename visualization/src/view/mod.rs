//! Displayable objects and their composition
//!
//! Every actor can report its bounds and flatten itself into scene nodes.
//! Actors combine with `+` into an [`Assembly`], which is itself an actor,
//! so `plot + label` can be shown or added to a plotter like any single
//! object.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod histogram_view;
pub mod mesh_view;
pub mod points_view;
pub mod text_view;

use std::ops::{Add, AddAssign};

use plotcloud_core::Aabb;

use crate::engine::scene::SceneNode;

pub use histogram_view::{BinView, HistogramPlot, HistogramStyle, Marker};
pub use mesh_view::MeshActor;
pub use points_view::Points;
pub use text_view::{Justify, Text3D};

/// Anything that can be placed in a scene
pub trait Renderable {
    /// Label carried into the scene nodes
    fn name(&self) -> &str;

    /// World-space extent, `None` when there is nothing to draw
    fn bounds(&self) -> Option<Aabb>;

    /// Flattened geometry
    fn nodes(&self) -> Vec<SceneNode>;
}

/// Closed set of displayable objects
#[derive(Debug, Clone, PartialEq)]
pub enum Actor {
    Histogram(HistogramPlot),
    Points(Points),
    Mesh(MeshActor),
    Text(Text3D),
    Assembly(Assembly),
}

impl Actor {
    fn as_renderable(&self) -> &dyn Renderable {
        match self {
            Self::Histogram(a) => a,
            Self::Points(a) => a,
            Self::Mesh(a) => a,
            Self::Text(a) => a,
            Self::Assembly(a) => a,
        }
    }
}

impl Renderable for Actor {
    fn name(&self) -> &str {
        self.as_renderable().name()
    }

    fn bounds(&self) -> Option<Aabb> {
        self.as_renderable().bounds()
    }

    fn nodes(&self) -> Vec<SceneNode> {
        self.as_renderable().nodes()
    }
}

/// Union of the bounds of several actors
pub fn combined_bounds<'a>(actors: impl IntoIterator<Item = &'a Actor>) -> Option<Aabb> {
    actors
        .into_iter()
        .filter_map(Renderable::bounds)
        .reduce(|a, b| a.union(&b))
}

/// Ordered group of actors treated as one
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assembly {
    parts: Vec<Actor>,
}

impl Assembly {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, actor: impl Into<Actor>) {
        self.parts.push(actor.into());
    }

    pub fn parts(&self) -> &[Actor] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl FromIterator<Actor> for Assembly {
    fn from_iter<I: IntoIterator<Item = Actor>>(iter: I) -> Self {
        Self {
            parts: iter.into_iter().collect(),
        }
    }
}

impl Renderable for Assembly {
    fn name(&self) -> &str {
        "Assembly"
    }

    fn bounds(&self) -> Option<Aabb> {
        combined_bounds(&self.parts)
    }

    fn nodes(&self) -> Vec<SceneNode> {
        self.parts.iter().flat_map(Renderable::nodes).collect()
    }
}

impl<R: Into<Actor>> Add<R> for Assembly {
    type Output = Assembly;

    fn add(mut self, rhs: R) -> Assembly {
        self.push(rhs);
        self
    }
}

impl<R: Into<Actor>> AddAssign<R> for Assembly {
    fn add_assign(&mut self, rhs: R) {
        self.push(rhs);
    }
}

impl<R: Into<Actor>> Add<R> for Actor {
    type Output = Assembly;

    fn add(self, rhs: R) -> Assembly {
        match self {
            Actor::Assembly(assembly) => assembly + rhs,
            single => Assembly::from_iter([single, rhs.into()]),
        }
    }
}

macro_rules! impl_actor {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Actor {
                fn from(actor: $ty) -> Self {
                    Actor::$variant(actor)
                }
            }

            impl<R: Into<Actor>> Add<R> for $ty {
                type Output = Assembly;

                fn add(self, rhs: R) -> Assembly {
                    Assembly::from_iter([Actor::from(self), rhs.into()])
                }
            }
        )*
    };
}

impl_actor!(
    HistogramPlot => Histogram,
    Points => Points,
    MeshActor => Mesh,
    Text3D => Text,
);

impl From<Assembly> for Actor {
    fn from(assembly: Assembly) -> Self {
        Actor::Assembly(assembly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use nalgebra::Point3;
    use plotcloud_core::PointCloud;

    fn label(text: &str, x: f64) -> Text3D {
        Text3D::new(text, Point3::new(x, 0.0, 0.0), 1.0, Color::BLACK)
    }

    #[test]
    fn test_plus_builds_flat_assembly() {
        let plot = HistogramPlot::new(&[1.0, 2.0, 2.5, 3.0], 3, HistogramStyle::default()).unwrap();
        let mut scene = plot + label("peak", 2.0) + label("tail", 3.0);

        assert_eq!(scene.len(), 3);
        assert!(matches!(scene.parts()[0], Actor::Histogram(_)));

        scene += label("note", 0.0);
        assert_eq!(scene.len(), 4);
        // Bars and error segments, then one node per label
        assert_eq!(scene.nodes().len(), 5);
    }

    #[test]
    fn test_assembly_bounds_are_union() {
        let cloud = PointCloud::from_rows(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]);
        let assembly = Points::new(cloud, Color::WHITE) + label("x", 10.0);
        let bounds = assembly.bounds().unwrap();

        assert_eq!(bounds.min, Point3::new(0.0, 0.0, 0.0));
        assert!(bounds.max.x > 10.0);
        assert!(Assembly::new().bounds().is_none());
    }

    #[test]
    fn test_actor_add_extends_existing_assembly() {
        let actor: Actor = (label("a", 0.0) + label("b", 1.0)).into();
        let grown = actor + label("c", 2.0);
        assert_eq!(grown.len(), 3);
    }
}
