//! Visibility graph embedded on the landmark grid.
//!
//! ## Definition
//!
//! - **Grid point** - a pair `(column, row)` of indices into the landmark lines.
//! - Every grid point whose location is not strictly inside a connected endpoint's shape
//!   becomes a vertex. The exact center of a shape is always kept.
//! - Each vertex is connected to the nearest vertex to its east and to its south. When the
//!   immediate neighbor was excluded, the walk continues until a vertex is found, so the
//!   grid stays connected around the hole.
//! - Every connection is realized as two directed edges tagged with their direction of
//!   travel.
//!
//! ```svgbob
//!     o---o---o---o---o
//!     |   |   |   |   |
//!     o---+-------+---o
//!     |   |       |   |
//!     o---|   *   |---o     * center: kept
//!     |   |       |   |     excluded cells are skipped by the walk
//!     o---+-------+---o
//!     |   |   |   |   |
//!     o---o---o---o---o
//! ```
use crate::{
    config::RoutingConfig,
    edge::Edge,
    geometry::{Direction, Point, Rect},
    landmark::{GridLine, GridLines, LineKind},
};
use derive_more::Display;
use fixedbitset::FixedBitSet;
use petgraph::{
    graph::{DiGraph, EdgeIndex, NodeIndex},
    visit::EdgeRef,
};
use std::collections::HashMap;

/// Column and row index of a grid line intersection.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Display)]
#[display(fmt = "({}, {})", _0, _1)]
pub struct GridPoint(pub u16, pub u16);

impl GridPoint {
    pub fn column(&self) -> usize {
        self.0 as usize
    }

    pub fn row(&self) -> usize {
        self.1 as usize
    }
}

#[derive(Debug, Clone)]
pub struct GridVertex {
    pub cell: GridPoint,
    pub location: Point,
}

#[derive(Debug, Clone)]
pub struct GridEdge {
    /// Direction of travel from source to target.
    pub direction: Direction,
    /// Kind of the line the edge runs along.
    pub kind: LineKind,
    pub weight: f32,
}

type _VisibilityGraph = DiGraph<GridVertex, GridEdge>;

#[derive(Debug, Clone)]
pub struct VisibilityGraph {
    graph: _VisibilityGraph,
    lines: GridLines,
    cells: HashMap<GridPoint, NodeIndex>,
}

impl VisibilityGraph {
    /// Build the graph for `edge` from its landmarks.
    pub fn build(edge: &Edge, config: &RoutingConfig) -> Self {
        let lines = GridLines::extract(edge, config);
        let obstacles = edge.obstacles().collect::<Vec<_>>();

        tracing::debug!(
            columns = lines.columns.len(),
            rows = lines.rows.len(),
            "extracted landmarks"
        );

        Self::from_lines(lines, &obstacles, config)
    }

    /// Build the graph over `lines`, cutting out the interiors of `obstacles`.
    pub fn from_lines(lines: GridLines, obstacles: &[Rect], config: &RoutingConfig) -> Self {
        let shape = GridShape::new(lines.columns.len(), lines.rows.len());
        let location = |cell: GridPoint| {
            Point::new(lines.columns[cell.column()].value, lines.rows[cell.row()].value)
        };

        let mut valid = FixedBitSet::with_capacity(shape.cell_bound());
        for cell in shape.cells() {
            let p = location(cell);
            let excluded = obstacles
                .iter()
                .any(|r| r.interior_contains(&p) && r.center() != p);

            valid.set(shape.to_index(cell), !excluded);
        }

        let mut graph =
            _VisibilityGraph::with_capacity(valid.count_ones(..), shape.cell_bound() * 4);
        let mut cells = HashMap::new();

        for cell in shape.cells() {
            if valid[shape.to_index(cell)] {
                let ix = graph.add_node(GridVertex {
                    cell,
                    location: location(cell),
                });
                cells.insert(cell, ix);
            }
        }

        for cell in shape.cells() {
            let Some(&a) = cells.get(&cell) else { continue };

            for direction in [Direction::East, Direction::South] {
                let Some(neighbor) = shape.first_valid(&valid, cell, direction) else { continue };
                let b = cells[&neighbor];

                let kind = if direction.is_horizontal() {
                    lines.rows[cell.row()].kind
                } else {
                    lines.columns[cell.column()].kind
                };
                let distance = location(cell).manhattan_distance(&location(neighbor));
                let weight = distance * line_factor(kind, config);

                graph.add_edge(a, b, GridEdge { direction, kind, weight });
                graph.add_edge(
                    b,
                    a,
                    GridEdge {
                        direction: direction.opposite(),
                        kind,
                        weight,
                    },
                );
            }
        }

        tracing::debug!(
            vertices = graph.node_count(),
            edges = graph.edge_count(),
            "built visibility graph"
        );

        Self {
            graph,
            lines,
            cells,
        }
    }

    pub fn graph(&self) -> &DiGraph<GridVertex, GridEdge> {
        &self.graph
    }

    pub fn columns(&self) -> &[GridLine] {
        &self.lines.columns
    }

    pub fn rows(&self) -> &[GridLine] {
        &self.lines.rows
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// The vertex sitting exactly at `p`, if any.
    pub fn vertex_at(&self, p: &Point) -> Option<NodeIndex> {
        let column = self.lines.column_index(p.x)?;
        let row = self.lines.row_index(p.y)?;

        self.cells
            .get(&GridPoint(column as u16, row as u16))
            .copied()
    }

    pub fn location(&self, ix: NodeIndex) -> Point {
        self.graph[ix].location
    }

    /// Edges whose segment passes through the interior of `rect`.
    pub fn edges_crossing<'a>(&'a self, rect: &'a Rect) -> impl Iterator<Item = EdgeIndex> + 'a {
        self.graph.edge_references().filter_map(move |e| {
            let p = self.location(e.source());
            let q = self.location(e.target());

            rect.crossed_by(&p, &q).then(|| e.id())
        })
    }

    /// The outgoing edge of `from` travelling toward `direction`.
    pub fn edge_toward(&self, from: NodeIndex, direction: Direction) -> Option<EdgeIndex> {
        self.graph
            .edges(from)
            .find(|e| e.weight().direction == direction)
            .map(|e| e.id())
    }

    /// The incoming edge of `to` arriving with `direction`.
    pub fn edge_arriving(&self, to: NodeIndex, direction: Direction) -> Option<EdgeIndex> {
        self.graph
            .edges_directed(to, petgraph::Direction::Incoming)
            .find(|e| e.weight().direction == direction)
            .map(|e| e.id())
    }
}

fn line_factor(kind: LineKind, config: &RoutingConfig) -> f32 {
    match kind {
        LineKind::StartEnd | LineKind::Waypoint | LineKind::Midpoint | LineKind::WaypointMid => {
            config.preferred_line_factor
        }
        LineKind::OuterBounds => config.outer_line_factor,
        LineKind::Bounds => 1.0,
    }
}

/// The number of columns and rows of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GridShape {
    columns: usize,
    rows: usize,
}

impl GridShape {
    fn new(columns: usize, rows: usize) -> Self {
        Self { columns, rows }
    }

    fn cell_bound(&self) -> usize {
        self.columns * self.rows
    }

    fn to_index(&self, cell: GridPoint) -> usize {
        cell.row() * self.columns + cell.column()
    }

    // row-major
    fn cells(&self) -> impl Iterator<Item = GridPoint> {
        let columns = self.columns;

        (0..self.rows).flat_map(move |row| {
            (0..columns).map(move |column| GridPoint(column as u16, row as u16))
        })
    }

    /// Walk from `cell` toward `direction` and return the first valid cell.
    fn first_valid(
        &self,
        valid: &FixedBitSet,
        cell: GridPoint,
        direction: Direction,
    ) -> Option<GridPoint> {
        let (dx, dy): (isize, isize) = match direction {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        };
        let mut column = cell.column() as isize;
        let mut row = cell.row() as isize;

        loop {
            column += dx;
            row += dy;

            if column < 0 || row < 0 || column >= self.columns as isize || row >= self.rows as isize
            {
                return None;
            }

            let next = GridPoint(column as u16, row as u16);
            if valid[self.to_index(next)] {
                return Some(next);
            }
        }
    }
}
