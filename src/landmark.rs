//! Landmark extraction.
//!
//! Scans the endpoint shapes and via-points of an edge and produces the vertical (`x`) and
//! horizontal (`y`) lines the routing grid is built from.
//!
//! ```svgbob
//!  outer  bounds      start  bounds  mid  bounds  end    bounds  outer
//!    :      :           :      :      :     :      :       :       :
//!    :      +-----------o      :      :     :      o-------+       :
//!    :      |   (start) |      :      :     :      | (end) |       :
//!    :      +-----------+      :      :     :      +-------+       :
//!    :      :           :      :      :     :      :       :       :
//! ```
//!
//! Each line carries the [`LineKind`] of the landmark that produced it. When two lines are
//! closer than the merge threshold only one survives; exact lines (start-end and waypoint)
//! are never dropped.
use crate::{
    config::RoutingConfig,
    edge::Edge,
    geometry::{Point, Rect},
};
use derive_more::Display;
use std::collections::BTreeMap;

/// Origin of a grid line, in ascending priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum LineKind {
    #[display(fmt = "outer-bounds")]
    OuterBounds,
    #[display(fmt = "bounds")]
    Bounds,
    #[display(fmt = "waypoint-mid")]
    WaypointMid,
    #[display(fmt = "midpoint")]
    Midpoint,
    #[display(fmt = "waypoint")]
    Waypoint,
    #[display(fmt = "start-end")]
    StartEnd,
}

impl LineKind {
    /// Merge priority. `WaypointMid` and `Midpoint` share a level.
    pub fn priority(self) -> u8 {
        match self {
            LineKind::OuterBounds => 0,
            LineKind::Bounds => 1,
            LineKind::WaypointMid | LineKind::Midpoint => 2,
            LineKind::Waypoint => 3,
            LineKind::StartEnd => 4,
        }
    }

    /// Lines passing through a point the path must hit exactly.
    pub fn is_exact(self) -> bool {
        matches!(self, LineKind::Waypoint | LineKind::StartEnd)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub value: f32,
    pub kind: LineKind,
}

impl GridLine {
    pub fn new(value: f32, kind: LineKind) -> Self {
        Self { value, kind }
    }
}

// Lines of one axis keyed by their coordinate rounded to 1/100 unit. Inserting at an
// occupied key overwrites the whole line, so coordinates closer than 0.005 collapse onto
// the value inserted last.
#[derive(Debug, Default)]
struct LineSet {
    lines: BTreeMap<i64, GridLine>,
}

impl LineSet {
    fn insert(&mut self, value: f32, kind: LineKind) {
        let key = (value * 100.0).round() as i64;
        self.lines.insert(key, GridLine::new(value, kind));
    }

    fn merge(self, threshold: f32) -> Vec<GridLine> {
        let mut merged: Vec<GridLine> = Vec::with_capacity(self.lines.len());

        for line in self.lines.into_values() {
            let Some(last) = merged.last_mut() else {
                merged.push(line);
                continue;
            };

            if line.value - last.value >= threshold {
                merged.push(line);
                continue;
            }

            match (last.kind.is_exact(), line.kind.is_exact()) {
                (true, true) => merged.push(line),
                (true, false) => {}
                (false, true) => *last = line,
                (false, false) => {
                    if line.kind.priority() > last.kind.priority() {
                        *last = line;
                    }
                }
            }
        }

        merged
    }
}

/// Deduplicated grid lines on both axes, sorted ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLines {
    /// Vertical lines (x coordinates).
    pub columns: Vec<GridLine>,
    /// Horizontal lines (y coordinates).
    pub rows: Vec<GridLine>,
}

impl GridLines {
    const LOOKUP_TOLERANCE: f32 = 0.01;

    /// Collect landmarks of `edge` and merge them.
    pub fn extract(edge: &Edge, config: &RoutingConfig) -> Self {
        let mut xs = LineSet::default();
        let mut ys = LineSet::default();
        let mut add_point = |p: Point, kind: LineKind| {
            xs.insert(p.x, kind);
            ys.insert(p.y, kind);
        };

        // 1. outer envelope
        let envelope = edge
            .waypoints
            .iter()
            .fold(edge.start.outline().union(&edge.end.outline()), |r, w| {
                r.union(&Rect::from_xywh(w.point.x, w.point.y, 0.0, 0.0))
            })
            .inset_by(-config.outer_margin, -config.outer_margin);
        add_point(envelope.origin, LineKind::OuterBounds);
        add_point(
            Point::new(envelope.max_x(), envelope.max_y()),
            LineKind::OuterBounds,
        );

        // 2. grown shapes
        for r in edge.obstacles() {
            let r = r.inset_by(-config.bounds_margin, -config.bounds_margin);
            add_point(r.origin, LineKind::Bounds);
            add_point(Point::new(r.max_x(), r.max_y()), LineKind::Bounds);
        }

        // 3. midpoints next to via-points
        if let (Some(first), Some(last)) = (edge.waypoints.first(), edge.waypoints.last()) {
            add_point(
                edge.start.anchor_center().midpoint(&first.point),
                LineKind::WaypointMid,
            );
            add_point(
                last.point.midpoint(&edge.end.anchor_center()),
                LineKind::WaypointMid,
            );
        }
        for pair in edge.waypoints.windows(2) {
            add_point(pair[0].point.midpoint(&pair[1].point), LineKind::WaypointMid);
        }

        // 4. midpoint between the endpoints
        add_point(
            edge.start.anchor_center().midpoint(&edge.end.anchor_center()),
            LineKind::Midpoint,
        );

        // 5. via-points
        for w in &edge.waypoints {
            add_point(w.point, LineKind::Waypoint);
        }

        // 6. endpoints
        add_point(edge.start.position(), LineKind::StartEnd);
        add_point(edge.end.position(), LineKind::StartEnd);

        Self {
            columns: xs.merge(config.merge_threshold),
            rows: ys.merge(config.merge_threshold),
        }
    }

    /// Index of the column within 0.01 of `x`.
    ///
    /// Landmarks are only kept to 1/100 unit, so a via-point that lies within 0.005 of
    /// another landmark is reached on that landmark's line, not at its own coordinate.
    pub fn column_index(&self, x: f32) -> Option<usize> {
        Self::index_of(&self.columns, x)
    }

    pub fn row_index(&self, y: f32) -> Option<usize> {
        Self::index_of(&self.rows, y)
    }

    fn index_of(lines: &[GridLine], value: f32) -> Option<usize> {
        lines
            .iter()
            .position(|l| (l.value - value).abs() <= Self::LOOKUP_TOLERANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::{Endpoint, Waypoint};

    fn values(lines: &[GridLine]) -> Vec<f32> {
        lines.iter().map(|l| l.value).collect()
    }

    fn facing_shapes() -> Edge {
        Edge::new(
            Endpoint::connected(
                Point::new(100.0, 50.0),
                Rect::from_xywh(0.0, 0.0, 100.0, 100.0),
            ),
            Endpoint::connected(
                Point::new(300.0, 50.0),
                Rect::from_xywh(300.0, 0.0, 100.0, 100.0),
            ),
        )
    }

    #[test]
    fn lines_of_facing_shapes() {
        let lines = GridLines::extract(&facing_shapes(), &RoutingConfig::default());

        assert_eq!(
            values(&lines.columns),
            vec![-20.0, -10.0, 100.0, 110.0, 200.0, 290.0, 300.0, 410.0, 420.0]
        );
        assert_eq!(values(&lines.rows), vec![-20.0, -10.0, 50.0, 110.0, 120.0]);

        // The midpoint row is overwritten by the endpoints.
        assert_eq!(lines.rows[2].kind, LineKind::StartEnd);
        assert_eq!(lines.columns[4].kind, LineKind::Midpoint);
        assert_eq!(lines.columns[0].kind, LineKind::OuterBounds);
    }

    #[test]
    fn waypoint_lines() {
        let mut edge = facing_shapes();
        edge.waypoints.push(Waypoint::new(200.0, 250.0));
        let lines = GridLines::extract(&edge, &RoutingConfig::default());

        let row = lines.row_index(250.0).unwrap();
        assert_eq!(lines.rows[row].kind, LineKind::Waypoint);

        // midpoint between the start shape center (50, 50) and the via-point
        let row = lines.row_index(150.0).unwrap();
        assert_eq!(lines.rows[row].kind, LineKind::WaypointMid);

        // the envelope includes the via-point
        assert_eq!(lines.rows.last().unwrap().value, 270.0);
    }

    #[test]
    fn merge_keeps_higher_priority() {
        let mut set = LineSet::default();
        set.insert(0.0, LineKind::OuterBounds);
        set.insert(4.0, LineKind::Bounds);
        set.insert(30.0, LineKind::Midpoint);
        set.insert(35.0, LineKind::Bounds);

        let merged = set.merge(10.0);

        assert_eq!(
            merged,
            vec![
                GridLine::new(4.0, LineKind::Bounds),
                GridLine::new(30.0, LineKind::Midpoint)
            ]
        );
    }

    #[test]
    fn merge_never_drops_exact_lines() {
        let mut set = LineSet::default();
        set.insert(0.0, LineKind::StartEnd);
        set.insert(3.0, LineKind::Waypoint);
        set.insert(6.0, LineKind::Midpoint);
        set.insert(20.0, LineKind::Bounds);
        set.insert(25.0, LineKind::Waypoint);

        let merged = set.merge(10.0);

        assert_eq!(
            merged,
            vec![
                GridLine::new(0.0, LineKind::StartEnd),
                GridLine::new(3.0, LineKind::Waypoint),
                GridLine::new(25.0, LineKind::Waypoint),
            ]
        );
    }

    #[test]
    fn later_insertions_overwrite_kind() {
        let mut set = LineSet::default();
        set.insert(10.0, LineKind::Midpoint);
        set.insert(10.001, LineKind::StartEnd);

        assert_eq!(set.merge(10.0), vec![GridLine::new(10.001, LineKind::StartEnd)]);
    }

    #[test]
    fn nearby_via_point_collapses_onto_endpoint_line() {
        let mut edge = facing_shapes();
        edge.waypoints.push(Waypoint::new(300.004, 250.0));
        let lines = GridLines::extract(&edge, &RoutingConfig::default());

        let column = lines.column_index(300.004).unwrap();
        assert_eq!(lines.column_index(300.0), Some(column));
        assert_eq!(lines.columns[column], GridLine::new(300.0, LineKind::StartEnd));
        assert_eq!(lines.column_index(300.02), None);
    }

    #[test]
    fn priority_order() {
        assert!(LineKind::OuterBounds.priority() < LineKind::Bounds.priority());
        assert_eq!(LineKind::Midpoint.priority(), LineKind::WaypointMid.priority());
        assert!(LineKind::Waypoint.priority() < LineKind::StartEnd.priority());
        assert_eq!(LineKind::WaypointMid.to_string(), "waypoint-mid");
    }
}
