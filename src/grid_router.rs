//! Grid router: A* over the visibility graph, one search per via-point segment.
//!
//! ```svgbob
//!  +-------+                     +-------+
//!  | start o---.                 |  end  |
//!  +-------+   |                 +---o---+
//!              |                     ^
//!              `------* via ---------'
//! ```
//!
//! Each segment search sees:
//!
//! - penalties on the edges leaving its source and entering its target, so that the path
//!   leaves and arrives in the required directions and never doubles back through a via-point,
//! - disabled edges through the interiors of the endpoint shapes,
//! - a revisit penalty on vertices used by earlier segments and a small turn penalty.
use crate::{
    config::RoutingConfig,
    edge::Edge,
    error::RouteError,
    geometry::{Direction, Point},
    graph::VisibilityGraph,
    path::Path,
    router::Router,
    search::{find_shortest_path, Penalty, SearchOverlay},
};
use fixedbitset::FixedBitSet;
use petgraph::graph::{EdgeIndex, NodeIndex};

#[derive(Debug, Clone, Default)]
pub struct GridRouter {
    config: RoutingConfig,
}

// Where a segment sits in the chain of an edge.
#[derive(Debug, Clone, Copy)]
struct Segment {
    index: usize,
    from: NodeIndex,
    to: NodeIndex,
    is_last: bool,
    // last edge of the previous segment
    arrival: Option<EdgeIndex>,
}

impl GridRouter {
    pub fn new(config: RoutingConfig) -> Self {
        Self { config }
    }

    /// Route `edge` through all of its via-points.
    pub fn try_route(&self, edge: &Edge) -> Result<Path, RouteError> {
        if edge.is_degenerate() {
            let p = edge.start.position();
            return Ok(Path::from_polyline(&[p, p]));
        }

        let graph = VisibilityGraph::build(edge, &self.config);
        let chain = edge.chain();
        let n_segments = chain.len() - 1;

        let mut visited = FixedBitSet::with_capacity(graph.vertex_count());
        let mut arrival: Option<EdgeIndex> = None;
        let mut legs: Vec<Vec<Point>> = Vec::with_capacity(n_segments);

        for (index, pair) in chain.windows(2).enumerate() {
            let from = graph
                .vertex_at(&pair[0])
                .ok_or(RouteError::VertexNotFound(pair[0]))?;
            let to = graph
                .vertex_at(&pair[1])
                .ok_or(RouteError::VertexNotFound(pair[1]))?;
            let segment = Segment {
                index,
                from,
                to,
                is_last: index + 1 == n_segments,
                arrival,
            };

            let overlay = self.segment_overlay(&graph, edge, &segment);
            let target = graph.location(to);
            let heuristic_factor = self.config.heuristic_factor;
            let g = graph.graph();

            let result = find_shortest_path(
                &graph,
                from,
                to,
                &overlay,
                |n| graph.location(n).manhattan_distance(&target) * heuristic_factor,
                |previous, _, proposed| {
                    let (_, dest) = g.edge_endpoints(proposed)?;
                    if visited.contains(dest.index()) {
                        return Some(Penalty::Add(self.config.revisit_penalty));
                    }

                    let previous = previous.or(arrival)?;
                    (g[previous].direction != g[proposed].direction)
                        .then_some(Penalty::Scale(self.config.turn_factor))
                },
            )
            .ok_or(RouteError::NoPath {
                segment: index,
                from: pair[0],
                to: pair[1],
            })?;

            tracing::trace!(
                segment = index,
                cost = result.cost,
                vertices = result.vertices.len(),
                "routed segment"
            );

            for v in &result.vertices {
                visited.insert(v.index());
            }
            arrival = result.edges.last().copied().or(arrival);
            legs.push(result.vertices.iter().map(|v| graph.location(*v)).collect());
        }

        Ok(Path::from_legs(&legs))
    }

    fn segment_overlay(
        &self,
        graph: &VisibilityGraph,
        edge: &Edge,
        segment: &Segment,
    ) -> SearchOverlay {
        let mut overlay = SearchOverlay::new();
        let penalty = self.config.direction_penalty;

        // Prohibited zones: nothing may pass through a shape, except the way out of (or in
        // to) a terminal sitting at the shape's center.
        for rect in edge.obstacles() {
            let center = rect.center();
            let terminal_at_center = [segment.from, segment.to]
                .iter()
                .any(|v| graph.location(*v) == center);

            for e in graph.edges_crossing(&rect) {
                if terminal_at_center {
                    let Some((a, b)) = graph.graph().edge_endpoints(e) else { continue };
                    if graph.location(a) == center || graph.location(b) == center {
                        continue;
                    }
                }
                overlay.disable(e);
            }
        }

        // Leaving the source.
        if let Some(arrival) = segment.arrival {
            let arrived = graph.graph()[arrival].direction;

            if let Some(back) = graph.edge_toward(segment.from, arrived.opposite()) {
                overlay.add_penalty(back, penalty);
            }
            if let Some(straight) = graph.edge_toward(segment.from, arrived) {
                overlay.set_weight(straight, 0.0);
            }
        } else if let Some(constraint) = edge.start.routing_constraint() {
            for d in Direction::ALL {
                let Some(e) = graph.edge_toward(segment.from, d) else { continue };

                if d == constraint {
                    overlay.set_weight(e, 0.0);
                } else {
                    overlay.add_penalty(e, penalty);
                }
            }
        } else if let Some(preferred) = edge.preferred_start_direction {
            if let Some(e) = graph.edge_toward(segment.from, preferred) {
                overlay.set_weight(e, 0.0);
            }
        }

        // Arriving at the end.
        if segment.is_last {
            if let Some(constraint) = edge.end.routing_constraint() {
                for d in Direction::ALL {
                    let Some(e) = graph.edge_arriving(segment.to, d) else { continue };

                    if d == constraint {
                        overlay.set_weight(e, 0.0);
                    } else {
                        overlay.add_penalty(e, penalty);
                    }
                }
            } else if let Some(preferred) = edge.preferred_end_direction {
                if let Some(e) = graph.edge_arriving(segment.to, preferred) {
                    overlay.set_weight(e, 0.0);
                }
            }
        }

        tracing::trace!(segment = segment.index, "prepared segment overlay");

        overlay
    }
}

impl Router for GridRouter {
    fn route(&self, edge: &Edge) -> Option<Path> {
        match self.try_route(edge) {
            Ok(path) if !path.is_empty() => Some(path),
            Ok(_) => None,
            Err(err) => {
                tracing::debug!(%err, "grid router found no path");
                None
            }
        }
    }
}
