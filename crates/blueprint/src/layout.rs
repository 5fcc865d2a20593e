//! Layout engines turning workspace views into diagram artifacts.
//!
//! A [`LayoutEngine`] receives the whole workspace and writes one artifact per
//! view into an [`OutputDirectory`]. The default
//! [`SugiyamaEngine`](sugiyama::SugiyamaEngine) computes a layered layout and
//! writes SVG. With the `graphviz` feature, the
//! [`GraphvizEngine`](graphviz::GraphvizEngine) writes DOT sources instead.

#[cfg(feature = "graphviz")]
pub mod graphviz;
pub mod sugiyama;
pub mod text;

use std::path::PathBuf;

use blueprint_core::{
    geometry::{Bounds, Point, Size},
    model::ElementId,
    workspace::Workspace,
};

use crate::{error::BlueprintError, export::OutputDirectory};

/// Renders every view of a workspace into an output directory.
pub trait LayoutEngine {
    /// Writes one artifact per view and returns their paths in view order.
    ///
    /// # Errors
    ///
    /// Fails on the first view that cannot be laid out or written.
    fn apply(
        &self,
        workspace: &Workspace,
        output: &OutputDirectory,
    ) -> Result<Vec<PathBuf>, BlueprintError>;
}

/// An element box at its final position. `center` is in diagram coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    element: ElementId,
    center: Point,
    size: Size,
}

impl Placement {
    pub fn new(element: ElementId, center: Point, size: Size) -> Self {
        Self {
            element,
            center,
            size,
        }
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn bounds(&self) -> Bounds {
        self.center.to_bounds(self.size)
    }
}

/// Positioned elements of a single view, in view order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewLayout {
    placements: Vec<Placement>,
}

impl ViewLayout {
    pub fn new(placements: Vec<Placement>) -> Self {
        Self { placements }
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn placement(&self, element: ElementId) -> Option<&Placement> {
        self.placements.iter().find(|p| p.element == element)
    }

    /// Smallest bounds containing every placement, or the default bounds for
    /// an empty layout.
    pub fn bounds(&self) -> Bounds {
        let mut placements = self.placements.iter();
        match placements.next() {
            Some(first) => placements.fold(first.bounds(), |acc, p| acc.merge(&p.bounds())),
            None => Bounds::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use blueprint_core::model::Model;
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_view_layout_bounds() {
        let mut model = Model::new();
        let a = model.add_person("A", "a").unwrap();
        let b = model.add_person("B", "b").unwrap();

        let layout = ViewLayout::new(vec![
            Placement::new(a, Point::new(50.0, 50.0), Size::new(100.0, 100.0)),
            Placement::new(b, Point::new(250.0, 300.0), Size::new(100.0, 60.0)),
        ]);

        let bounds = layout.bounds();
        assert_approx_eq!(f32, bounds.min_point().x(), 0.0);
        assert_approx_eq!(f32, bounds.max_point().x(), 300.0);
        assert_approx_eq!(f32, bounds.max_point().y(), 330.0);
        assert_eq!(layout.placement(b).unwrap().center(), Point::new(250.0, 300.0));
    }

    #[test]
    fn test_empty_layout_bounds() {
        let layout = ViewLayout::default();
        assert_eq!(layout.bounds(), Bounds::default());
        assert!(layout.placements().is_empty());
    }
}
