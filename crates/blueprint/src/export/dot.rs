//! DOT source generation for Graphviz.
//!
//! Each view becomes a directed graph. Nodes are keyed by the element's
//! sequence number, so the output is stable across runs of the same model.

use std::path::Path;

use dot_structures::{
    Attribute, Edge, EdgeTy, Graph, GraphAttributes, Id, Node, NodeId, Stmt, Vertex,
};
use graphviz_rust::printer::{DotPrinter, PrinterContext};

use blueprint_core::{
    model::{ElementKind, Location, Model},
    view::View,
};

use crate::{config::Palette, export, layout::text::ElementText};

/// Builds DOT graphs for the views of one model.
pub struct Dot<'a> {
    model: &'a Model,
    palette: &'a Palette,
}

impl<'a> Dot<'a> {
    pub fn new(model: &'a Model, palette: &'a Palette) -> Self {
        Self { model, palette }
    }

    /// Builds the graph for `view`.
    pub fn graph(&self, view: &View) -> Result<Graph, export::Error> {
        let mut stmts = vec![
            Stmt::Attribute(attr("rankdir", "TB")),
            Stmt::Attribute(attr("label", &format!("{}\n{}", view.key(), view.description()))),
            Stmt::Attribute(attr("labelloc", "t")),
            Stmt::GAttribute(GraphAttributes::Node(vec![
                attr("shape", "box"),
                attr("style", "rounded,filled"),
                attr("fontname", "Arial"),
            ])),
            Stmt::GAttribute(GraphAttributes::Edge(vec![
                attr("style", "dashed"),
                attr("fontname", "Arial"),
                attr("color", &self.palette.relationship.to_hex()),
            ])),
        ];

        for &id in view.elements() {
            let element = self
                .model
                .element(id)
                .map_err(|err| export::Error::Render(err.to_string()))?;
            let text = ElementText::for_element(element);
            let mut label = text.name.join(" ");
            label.push('\n');
            label.push_str(&text.kind);
            for line in &text.description {
                label.push('\n');
                label.push_str(line);
            }

            let fill = match element.kind() {
                ElementKind::Person => self.palette.person,
                ElementKind::SoftwareSystem { location, .. } => match location {
                    Location::Internal => self.palette.internal_system,
                    Location::External => self.palette.external_system,
                },
                ElementKind::Container { .. } => self.palette.container,
            };

            stmts.push(Stmt::Node(Node {
                id: node_id(element.sequence()),
                attributes: vec![
                    attr("label", &label),
                    attr("fillcolor", &fill.to_hex()),
                    attr("fontcolor", &fill.contrasting_text().to_hex()),
                ],
            }));
        }

        for &id in view.relationships() {
            let relationship = self.model.relationship(id).ok_or_else(|| {
                export::Error::Render(format!("Unknown relationship {id} in view `{}`", view.key()))
            })?;
            let sequence_of = |element| {
                self.model
                    .element(element)
                    .map(|e| e.sequence())
                    .map_err(|err| export::Error::Render(err.to_string()))
            };

            let mut label = relationship.description().to_string();
            if let Some(technology) = relationship.technology() {
                label = format!("{label}\n[{technology}]");
            }

            stmts.push(Stmt::Edge(Edge {
                ty: EdgeTy::Pair(
                    Vertex::N(node_id(sequence_of(relationship.source())?)),
                    Vertex::N(node_id(sequence_of(relationship.destination())?)),
                ),
                attributes: vec![attr("label", &label)],
            }));
        }

        Ok(Graph::DiGraph {
            id: Id::Escaped(quote(view.key())),
            strict: false,
            stmts,
        })
    }

    /// Prints `view` as DOT source.
    pub fn render(&self, view: &View) -> Result<String, export::Error> {
        Ok(self.graph(view)?.print(&mut PrinterContext::default()))
    }

    /// Writes the DOT source of `view` to `path`.
    pub fn write(&self, view: &View, path: &Path) -> Result<(), export::Error> {
        let source = self.render(view)?;
        export::write_artifact(path, &source)
    }
}

fn node_id(sequence: u32) -> NodeId {
    NodeId(Id::Plain(format!("e{sequence}")), None)
}

fn attr(key: &str, value: &str) -> Attribute {
    Attribute(Id::Plain(key.to_string()), Id::Escaped(quote(value)))
}

/// Quotes `value` as a DOT string, escaping quotes, backslashes and newlines.
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
