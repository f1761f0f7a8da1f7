//! Debug rendering of a routing problem as SVG: the endpoint shapes, the visibility graph and
//! the routed path.
use crate::{
    edge::Edge,
    error::RenderError,
    geometry::{Direction, Point},
    graph::VisibilityGraph,
    landmark::LineKind,
    path::Path,
};
use derive_more::Display;
use petgraph::visit::EdgeRef;
use std::io::Write;
use svg::node::element;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[display(fmt = "#{:02X}{:02X}{:02X}", red, green, blue)]
pub struct RGBColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl RGBColor {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// Stroke color of graph edges running along a line of `kind`.
pub fn line_color(kind: LineKind) -> RGBColor {
    match kind {
        LineKind::OuterBounds => RGBColor::new(90, 90, 90),
        LineKind::Bounds => RGBColor::new(73, 123, 145),
        LineKind::WaypointMid => RGBColor::new(140, 110, 200),
        LineKind::Midpoint => RGBColor::new(200, 160, 60),
        LineKind::Waypoint => RGBColor::new(60, 180, 110),
        LineKind::StartEnd => RGBColor::new(220, 80, 60),
    }
}

#[derive(Debug, Default)]
pub struct DebugRenderer<'g> {
    pub graph: Option<&'g VisibilityGraph>,
}

impl<'g> DebugRenderer<'g> {
    pub fn new() -> Self {
        Self { graph: None }
    }

    pub fn with_graph(graph: &'g VisibilityGraph) -> Self {
        Self { graph: Some(graph) }
    }

    pub fn render(
        &self,
        edge: &Edge,
        path: &Path,
        writer: &mut impl Write,
    ) -> Result<(), RenderError> {
        let circle_radius = 3.0;
        let background_color = RGBColor::new(28, 28, 28);

        let mut svg_doc = svg::Document::new().set("version", "1.1");

        // -- Background
        let background_rect = element::Rectangle::new()
            .set("width", "100%")
            .set("height", "100%")
            .set("fill", background_color.to_string());
        svg_doc = svg_doc.add(background_rect);

        // -- Shapes
        for r in edge.obstacles() {
            let shape = element::Rectangle::new()
                .set("x", r.min_x())
                .set("y", r.min_y())
                .set("width", r.width())
                .set("height", r.height())
                .set("fill", "none")
                .set("stroke", "white")
                .set("stroke-width", 1);
            svg_doc = svg_doc.add(shape);
        }

        // -- Visibility graph
        if let Some(graph) = self.graph {
            for e in graph.graph().edge_references() {
                // each connection is drawn once
                if !matches!(e.weight().direction, Direction::East | Direction::South) {
                    continue;
                }
                let from_pt = graph.location(e.source());
                let to_pt = graph.location(e.target());

                let line = element::Line::new()
                    .set("x1", from_pt.x)
                    .set("y1", from_pt.y)
                    .set("x2", to_pt.x)
                    .set("y2", to_pt.y)
                    .set("stroke", line_color(e.weight().kind).to_string())
                    .set("stroke-width", 1);
                svg_doc = svg_doc.add(line);
            }

            for v in graph.graph().node_weights() {
                svg_doc = svg_doc.add(dot(v.location, circle_radius, "red"));
            }
        }

        // -- Path
        if !path.is_empty() {
            let path_element = element::Path::new()
                .set("d", path.to_string())
                .set("fill", "none")
                .set("stroke", "orange")
                .set("stroke-width", 2);
            svg_doc = svg_doc.add(path_element);
        }

        for w in &edge.waypoints {
            svg_doc = svg_doc.add(dot(w.point, circle_radius, "orange"));
        }

        writer.write_all(svg_doc.to_string().as_bytes())?;
        Ok(())
    }
}

fn dot(p: Point, r: f32, fill: &str) -> element::Circle {
    element::Circle::new()
        .set("cx", p.x)
        .set("cy", p.y)
        .set("r", r)
        .set("stroke", "white")
        .set("stroke-width", 1)
        .set("fill", fill)
}
