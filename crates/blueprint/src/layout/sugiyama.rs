//! Layered layout of views, rendered to SVG.
//!
//! Based on the Sugiyama algorithm for layered drawing of directed graphs,
//! via the rust-sugiyama implementation. Each connected component is laid
//! out on its own and placed to the right of the previous one. Elements
//! without any relationship in the view share an extra row at the bottom.

use std::{collections::HashMap, path::PathBuf};

use log::{debug, info};
use rust_sugiyama::configure::Config;

use blueprint_core::{
    geometry::{Point, Size},
    model::{ElementId, Model},
    view::View,
    workspace::Workspace,
};

use crate::{
    config::{LayoutConfig, Palette},
    error::BlueprintError,
    export::{OutputDirectory, svg::Svg},
    layout::{LayoutEngine, Placement, ViewLayout, text::ElementText},
};

/// Horizontal distance rust-sugiyama keeps between neighbours in a layer.
const VERTEX_SPACING: f64 = 4.0;

/// Grid slot of an element: fractional column and integer row.
type Slot = (f32, usize);

/// The Sugiyama layout engine.
pub struct SugiyamaEngine {
    /// Horizontal gap between boxes in the same layer
    horizontal_spacing: f32,

    /// Vertical gap between layers
    vertical_spacing: f32,

    palette: Palette,
}

impl SugiyamaEngine {
    pub fn new(config: &LayoutConfig, palette: Palette) -> Self {
        Self {
            horizontal_spacing: config.horizontal_spacing(),
            vertical_spacing: config.vertical_spacing(),
            palette,
        }
    }

    /// Computes the placements of every element in `view`.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::Layout`] if the view references elements or
    /// relationships missing from `model`, or if rust-sugiyama fails.
    pub fn layout_view(&self, model: &Model, view: &View) -> Result<ViewLayout, BlueprintError> {
        let sizes = view
            .elements()
            .iter()
            .map(|&id| {
                model
                    .element(id)
                    .map(|element| ElementText::for_element(element).size())
                    .map_err(|err| BlueprintError::Layout(format!("View `{}`: {err}", view.key())))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let edges = Self::edges(model, view)?;
        let slots = self.slots(view.elements().len(), &edges)?;

        let cell = sizes.iter().fold(Size::default(), |acc, size| acc.max(*size));
        let column_width = cell.width() + self.horizontal_spacing;
        let row_height = cell.height() + self.vertical_spacing;

        let placements = view
            .elements()
            .iter()
            .zip(sizes)
            .zip(slots)
            .map(|((&element, size), (column, row))| {
                let center = Point::new(
                    column.mul_add(column_width, cell.width() / 2.0),
                    (row as f32).mul_add(row_height, cell.height() / 2.0),
                );
                Placement::new(element, center, size)
            })
            .collect();

        debug!(view = view.key(), elements = view.elements().len(), edges = edges.len(); "View laid out");
        Ok(ViewLayout::new(placements))
    }

    /// Edges between view positions, without self-loops and duplicates.
    fn edges(model: &Model, view: &View) -> Result<Vec<(u32, u32)>, BlueprintError> {
        let positions: HashMap<ElementId, u32> = view
            .elements()
            .iter()
            .enumerate()
            .map(|(i, &id)| (id, i as u32))
            .collect();

        let mut edges = Vec::new();
        for &id in view.relationships() {
            let relationship = model.relationship(id).ok_or_else(|| {
                BlueprintError::Layout(format!(
                    "View `{}` references unknown relationship {id}",
                    view.key()
                ))
            })?;

            if let (Some(&source), Some(&target)) = (
                positions.get(&relationship.source()),
                positions.get(&relationship.destination()),
            ) {
                // Skip self-loops and repeated pairs
                if source != target && !edges.contains(&(source, target)) {
                    edges.push((source, target));
                }
            }
        }
        Ok(edges)
    }

    /// Assigns a grid slot to each of the `count` view positions.
    fn slots(&self, count: usize, edges: &[(u32, u32)]) -> Result<Vec<Slot>, BlueprintError> {
        let mut slots: Vec<Option<Slot>> = vec![None; count];
        let mut rows = 0;

        if !edges.is_empty() {
            debug!(
                "Applying Sugiyama algorithm to graph with {count} nodes and {} edges",
                edges.len()
            );

            let owned_edges = edges.to_vec();
            let layouts = std::panic::catch_unwind(move || {
                let config = Config {
                    minimum_length: 1,
                    vertex_spacing: VERTEX_SPACING,
                    ..Default::default()
                };
                rust_sugiyama::from_edges(&owned_edges, &config)
            })
            .map_err(|err| {
                let message = if let Some(panic_msg) = err.downcast_ref::<String>() {
                    format!("Rust-sugiyama layout engine panicked: {panic_msg}")
                } else {
                    "Rust-sugiyama layout engine panicked with unknown error".to_string()
                };
                BlueprintError::Layout(message)
            })?;

            if layouts.is_empty() {
                return Err(BlueprintError::Layout(
                    "Rust-sugiyama returned empty layout results".to_string(),
                ));
            }

            let mut next_column = 0.0f32;
            for (coords, _, _) in &layouts {
                if coords.is_empty() {
                    continue;
                }

                let min_x = coords.iter().map(|&(_, (x, _))| x).fold(f64::INFINITY, f64::min);
                let mut levels: Vec<f64> = coords.iter().map(|&(_, (_, y))| y).collect();
                levels.sort_by(f64::total_cmp);
                levels.dedup_by(|a, b| (*a - *b).abs() < 1e-6);

                let mut widest = 0.0f32;
                for &(node, (x, y)) in coords {
                    let Some(slot) = slots.get_mut(node) else {
                        debug!("Node {node} from rust-sugiyama result is out of range");
                        continue;
                    };
                    let column = ((x - min_x) / VERTEX_SPACING) as f32;
                    let row = levels
                        .iter()
                        .position(|level| (level - y).abs() < 1e-6)
                        .unwrap_or_default();
                    *slot = Some((next_column + column, row));
                    widest = widest.max(column);
                    rows = rows.max(row + 1);
                }
                next_column += widest + 1.0;
            }

            Self::orient_downward(&mut slots, edges, rows);
        }

        let mut isolated = 0.0f32;
        Ok(slots
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| {
                    let slot = (isolated, rows);
                    isolated += 1.0;
                    slot
                })
            })
            .collect())
    }

    /// Flips the rows if most edges point upward, so sources sit on top.
    fn orient_downward(slots: &mut [Option<Slot>], edges: &[(u32, u32)], rows: usize) {
        let row_of = |index: u32| slots.get(index as usize).copied().flatten().map(|s| s.1);

        let (mut down, mut up) = (0, 0);
        for &(source, target) in edges {
            match (row_of(source), row_of(target)) {
                (Some(s), Some(t)) if s < t => down += 1,
                (Some(s), Some(t)) if s > t => up += 1,
                _ => {}
            }
        }

        if up > down {
            for (_, row) in slots.iter_mut().flatten() {
                *row = rows - 1 - *row;
            }
        }
    }
}

impl LayoutEngine for SugiyamaEngine {
    fn apply(
        &self,
        workspace: &Workspace,
        output: &OutputDirectory,
    ) -> Result<Vec<PathBuf>, BlueprintError> {
        let renderer = Svg::new(workspace.model(), &self.palette);
        let targets = output.artifact_paths(workspace.views(), "svg")?;
        let mut artifacts = Vec::with_capacity(targets.len());

        for (view, path) in targets {
            let layout = self.layout_view(workspace.model(), view)?;
            renderer.write(view, &layout, &path)?;
            artifacts.push(path);
        }

        info!(views = artifacts.len(), directory:? = output.path(); "SVG diagrams written");
        Ok(artifacts)
    }
}

#[cfg(test)]
mod tests {
    use blueprint_core::model::Location;

    use super::*;

    fn engine() -> SugiyamaEngine {
        SugiyamaEngine::new(&LayoutConfig::default(), Palette::default())
    }

    fn assert_no_overlap(layout: &ViewLayout) {
        let placements = layout.placements();
        for (i, a) in placements.iter().enumerate() {
            for b in &placements[i + 1..] {
                let (a_box, b_box) = (a.bounds(), b.bounds());
                let separated = a_box.max_point().x() <= b_box.min_point().x()
                    || b_box.max_point().x() <= a_box.min_point().x()
                    || a_box.max_point().y() <= b_box.min_point().y()
                    || b_box.max_point().y() <= a_box.min_point().y();
                assert!(separated, "{a:?} overlaps {b:?}");
            }
        }
    }

    fn context_model() -> (Model, ElementId) {
        let mut model = Model::new();
        let core = model.add_software_system("NvaCore", "The NVA core application").unwrap();
        for (name, label) in [("Orcid", "Integrates with"), ("CrossRef", "Gets metadata from")] {
            let id = model
                .add_software_system_with_location(name, "Upstream", Location::External)
                .unwrap();
            model.connect(core, id, label).unwrap();
        }
        for name in ["Creator", "Curator", "Editor"] {
            let id = model.add_person(name, "A user").unwrap();
            model.connect(id, core, "Uses").unwrap();
        }
        model.add_person("Bystander", "Never uses anything").unwrap();
        (model, core)
    }

    #[test]
    fn test_every_element_is_placed_once() {
        let (model, core) = context_model();
        let view = View::system_context(&model, core, "SystemContext", "Context").unwrap();

        let layout = engine().layout_view(&model, &view).unwrap();
        assert_eq!(layout.placements().len(), view.elements().len());
        for &id in view.elements() {
            assert!(layout.placement(id).is_some());
        }
        assert_no_overlap(&layout);
    }

    #[test]
    fn test_users_sit_above_core_and_upstreams_below() {
        let (model, core) = context_model();
        let view = View::system_context(&model, core, "SystemContext", "Context").unwrap();
        let layout = engine().layout_view(&model, &view).unwrap();

        let y = |name: &str| {
            let id = model.lookup(name).unwrap().id();
            layout.placement(id).unwrap().center().y()
        };
        assert!(y("Creator") < y("NvaCore"));
        assert!(y("NvaCore") < y("Orcid"));
    }

    #[test]
    fn test_isolated_elements_share_bottom_row() {
        let (model, core) = context_model();
        let view = View::system_context(&model, core, "SystemContext", "Context").unwrap();
        let layout = engine().layout_view(&model, &view).unwrap();

        let bystander = model.lookup("Bystander").unwrap().id();
        let bottom = layout.placement(bystander).unwrap().center().y();
        assert!(
            layout
                .placements()
                .iter()
                .all(|p| p.center().y() <= bottom)
        );
    }

    #[test]
    fn test_view_without_relationships() {
        let mut model = Model::new();
        let core = model.add_software_system("Core", "Core").unwrap();
        model.add_container(core, "A", "a", "Rust").unwrap();
        model.add_container(core, "B", "b", "Rust").unwrap();
        let view = View::container(&model, core, "Containers", "Containers").unwrap();

        let layout = engine().layout_view(&model, &view).unwrap();
        assert_eq!(layout.placements().len(), 2);
        assert_no_overlap(&layout);
    }

    #[test]
    fn test_self_loops_and_duplicates_are_collapsed() {
        let mut model = Model::new();
        let core = model.add_software_system("Core", "Core").unwrap();
        let a = model.add_container(core, "A", "a", "Rust").unwrap();
        let b = model.add_container(core, "B", "b", "Rust").unwrap();
        model.connect(a, a, "Calls itself").unwrap();
        model.connect(a, b, "Calls").unwrap();
        model.connect(a, b, "Calls again").unwrap();
        let view = View::container(&model, core, "Containers", "Containers").unwrap();

        assert_eq!(SugiyamaEngine::edges(&model, &view).unwrap(), vec![(0, 1)]);
        let layout = engine().layout_view(&model, &view).unwrap();
        assert!(
            layout.placement(a).unwrap().center().y() < layout.placement(b).unwrap().center().y()
        );
    }

    #[test]
    fn test_empty_view() {
        let mut model = Model::new();
        let core = model.add_software_system("Core", "Core").unwrap();
        let view = View::container(&model, core, "Containers", "Containers").unwrap();

        let layout = engine().layout_view(&model, &view).unwrap();
        assert!(layout.placements().is_empty());
    }
}
