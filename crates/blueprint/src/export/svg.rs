//! SVG rendering of laid out views.

use std::path::Path;

use log::debug;
use svg::{
    Document,
    node::{
        Text as SvgText,
        element::{Definitions, Group, Marker, Path as SvgPath, Rectangle, TSpan, Text},
    },
};

use blueprint_core::{
    color::Color,
    geometry::{Point, Size},
    model::{Element, ElementId, ElementKind, Location, Model, Relationship},
    view::View,
};

use crate::{
    config::Palette,
    export,
    layout::{
        Placement, ViewLayout,
        text::{
            self, DESCRIPTION_FONT_SIZE, ElementText, FontWeight, KIND_FONT_SIZE, NAME_FONT_SIZE,
        },
    },
};

const MARGIN: f32 = 40.0;
const TITLE_HEIGHT: f32 = 64.0;
const LABEL_FONT_SIZE: f32 = 12.0;
const LABEL_WIDTH: f32 = 180.0;
const FONT_FAMILY: &str = "Arial, Helvetica, sans-serif";

/// Renders views of one model with a fixed palette.
pub struct Svg<'a> {
    model: &'a Model,
    palette: &'a Palette,
}

impl<'a> Svg<'a> {
    pub fn new(model: &'a Model, palette: &'a Palette) -> Self {
        Self { model, palette }
    }

    /// Builds the SVG document for `view`.
    ///
    /// # Errors
    ///
    /// Returns [`export::Error::Render`] when the layout lacks an element of
    /// the view or the view names something missing from the model.
    pub fn render(&self, view: &View, layout: &ViewLayout) -> Result<Document, export::Error> {
        let bounds = layout.bounds();
        let content = Size::new(bounds.width(), bounds.height());
        let width = MARGIN.mul_add(2.0, content.width()).max(480.0);
        let height = MARGIN.mul_add(2.0, content.height()) + TITLE_HEIGHT;
        debug!(view = view.key(), width, height; "Rendering SVG document");

        let mut doc = Document::new()
            .set("viewBox", format!("0 0 {width} {height}"))
            .set("width", width)
            .set("height", height)
            .add(self.marker_definitions());

        if let Some(background) = &self.palette.background {
            doc = doc.add(
                Rectangle::new()
                    .set("width", "100%")
                    .set("height", "100%")
                    .set("fill", background)
                    .set("fill-opacity", background.alpha()),
            );
        }

        doc = doc.add(self.render_title(view));

        let mut main_group = Group::new();
        for placement in layout.placements() {
            let element = self.model.element(placement.element()).map_err(|err| {
                export::Error::Render(format!("View `{}`: {err}", view.key()))
            })?;
            main_group = main_group.add(self.render_element(element, placement));
        }
        for &id in view.relationships() {
            let relationship = self.model.relationship(id).ok_or_else(|| {
                export::Error::Render(format!("Unknown relationship {id} in view `{}`", view.key()))
            })?;
            let source = Self::placement(layout, relationship.source(), view)?;
            let target = Self::placement(layout, relationship.destination(), view)?;
            main_group = main_group.add(self.render_relationship(source, target, relationship));
        }

        let offset = Point::new(MARGIN, MARGIN + TITLE_HEIGHT).sub_point(bounds.min_point());
        Ok(doc.add(main_group.set(
            "transform",
            format!("translate({}, {})", offset.x(), offset.y()),
        )))
    }

    /// Renders `view` and writes it to `path`.
    pub fn write(&self, view: &View, layout: &ViewLayout, path: &Path) -> Result<(), export::Error> {
        let doc = self.render(view, layout)?;
        export::write_artifact(path, &doc.to_string())
    }

    fn placement<'l>(
        layout: &'l ViewLayout,
        element: ElementId,
        view: &View,
    ) -> Result<&'l Placement, export::Error> {
        layout.placement(element).ok_or_else(|| {
            export::Error::Render(format!(
                "Element {element} has no position in view `{}`",
                view.key()
            ))
        })
    }

    fn fill_for(&self, element: &Element) -> Color {
        match element.kind() {
            ElementKind::Person => self.palette.person,
            ElementKind::SoftwareSystem {
                location: Location::External,
                ..
            } => self.palette.external_system,
            ElementKind::SoftwareSystem { .. } => self.palette.internal_system,
            ElementKind::Container { .. } => self.palette.container,
        }
    }

    fn marker_definitions(&self) -> Definitions {
        let color = &self.palette.relationship;
        Definitions::new().add(
            Marker::new()
                .set("id", "arrow")
                .set("viewBox", "0 0 10 10")
                .set("refX", 9)
                .set("refY", 5)
                .set("markerWidth", 8)
                .set("markerHeight", 8)
                .set("orient", "auto")
                .add(
                    SvgPath::new()
                        .set("d", "M 0 0 L 10 5 L 0 10 z")
                        .set("fill", color),
                ),
        )
    }

    fn render_title(&self, view: &View) -> Text {
        Text::new("")
            .set("x", MARGIN)
            .set("y", MARGIN / 2.0)
            .set("font-family", FONT_FAMILY)
            .add(
                TSpan::new("")
                    .set("x", MARGIN)
                    .set("dy", 20)
                    .set("font-size", 20)
                    .set("font-weight", "bold")
                    .add(SvgText::new(view.key())),
            )
            .add(
                TSpan::new("")
                    .set("x", MARGIN)
                    .set("dy", 22)
                    .set("font-size", 14)
                    .set("fill", "#555555")
                    .add(SvgText::new(view.description())),
            )
    }

    fn render_element(&self, element: &Element, placement: &Placement) -> Group {
        let fill = self.fill_for(element);
        let text_color = fill.contrasting_text();
        let bounds = placement.bounds();
        let min = bounds.min_point();
        let content = ElementText::for_element(element);

        let corner_radius = match element.kind() {
            ElementKind::Person => 24.0,
            _ => 6.0,
        };

        let shape = Rectangle::new()
            .set("x", min.x())
            .set("y", min.y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("rx", corner_radius)
            .set("fill", &fill)
            .set("fill-opacity", fill.alpha())
            .set("stroke", "#0b3d6e")
            .set("stroke-width", 1);

        let center_x = placement.center().x();
        let mut lines = Text::new("")
            .set("x", center_x)
            .set("y", min.y() + content.padding())
            .set("text-anchor", "middle")
            .set("font-family", FONT_FAMILY)
            .set("fill", &text_color);

        let sections = [
            (&content.name[..], NAME_FONT_SIZE, "bold"),
            (std::slice::from_ref(&content.kind), KIND_FONT_SIZE, "normal"),
            (&content.description[..], DESCRIPTION_FONT_SIZE, "normal"),
        ];
        for (section, font_size, weight) in sections {
            for line in section {
                lines = lines.add(
                    TSpan::new("")
                        .set("x", center_x)
                        .set("dy", text::line_height(font_size))
                        .set("font-size", font_size)
                        .set("font-weight", weight)
                        .add(SvgText::new(line.as_str())),
                );
            }
        }

        Group::new()
            .set("data-element", element.name())
            .add(shape)
            .add(lines)
    }

    fn render_relationship(
        &self,
        source: &Placement,
        target: &Placement,
        relationship: &Relationship,
    ) -> Group {
        let color = &self.palette.relationship;
        let (path_data, label_at) = if source.element() == target.element() {
            Self::self_loop(source)
        } else {
            let start = source
                .center()
                .box_exit_toward(target.center(), source.size());
            let end = target
                .center()
                .box_exit_toward(source.center(), target.size());
            (
                format!("M {} {} L {} {}", start.x(), start.y(), end.x(), end.y()),
                start.midpoint(end),
            )
        };

        let path = SvgPath::new()
            .set("d", path_data)
            .set("fill", "none")
            .set("stroke", color)
            .set("stroke-width", 1.5)
            .set("stroke-dasharray", "6,4")
            .set("marker-end", "url(#arrow)");

        let mut label_lines = text::wrap(
            relationship.description(),
            LABEL_FONT_SIZE,
            FontWeight::Normal,
            LABEL_WIDTH,
        );
        if let Some(technology) = relationship.technology() {
            label_lines.push(format!("[{technology}]"));
        }

        let line_height = text::line_height(LABEL_FONT_SIZE);
        let label_height = line_height * label_lines.len() as f32;
        let label_width = label_lines
            .iter()
            .map(|line| text::text_width(line, LABEL_FONT_SIZE, FontWeight::Normal))
            .fold(0.0_f32, f32::max);

        let background = Rectangle::new()
            .set("x", label_at.x() - label_width / 2.0 - 4.0)
            .set("y", label_at.y() - label_height / 2.0 - 2.0)
            .set("width", label_width + 8.0)
            .set("height", label_height + 4.0)
            .set("fill", "white")
            .set("fill-opacity", 0.85)
            .set("rx", 3.0);

        let mut label = Text::new("")
            .set("x", label_at.x())
            .set("y", label_at.y() - label_height / 2.0)
            .set("text-anchor", "middle")
            .set("font-family", FONT_FAMILY)
            .set("font-size", LABEL_FONT_SIZE)
            .set("fill", "#333333");
        for line in label_lines {
            label = label.add(
                TSpan::new("")
                    .set("x", label_at.x())
                    .set("dy", line_height)
                    .add(SvgText::new(line)),
            );
        }

        Group::new().add(path).add(background).add(label)
    }

    /// A loop leaving and re-entering the right edge of the box.
    fn self_loop(placement: &Placement) -> (String, Point) {
        let bounds = placement.bounds();
        let right = bounds.max_point().x();
        let center_y = placement.center().y();
        let (start_y, end_y) = (center_y - 12.0, center_y + 12.0);
        let reach = right + 60.0;

        let data = format!(
            "M {right} {start_y} C {reach} {}, {reach} {}, {right} {end_y}",
            start_y - 30.0,
            end_y + 30.0
        );
        (data, Point::new(reach + 10.0, center_y))
    }
}
