//! A* search over the visibility graph.
//!
//! The graph itself is never mutated by a search. Per-search weight changes and disabled
//! edges live in a [`SearchOverlay`], and a cost-override hook sees the edge the search
//! arrived on so that costs can depend on the previous step.
use crate::graph::VisibilityGraph;
use derive_more::Add;
use fixedbitset::FixedBitSet;
use petgraph::{
    graph::{EdgeIndex, NodeIndex},
    visit::EdgeRef,
};
use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap},
};

// Used for computing shortest path
#[derive(Debug, Clone, Copy, PartialEq, Default, Add)]
pub struct RouteCost(pub f32);

impl Eq for RouteCost {}

impl Ord for RouteCost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for RouteCost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Extra cost returned by a cost-override hook.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Penalty {
    Add(f32),
    Scale(f32),
}

impl Penalty {
    fn apply(self, weight: f32) -> f32 {
        match self {
            Penalty::Add(p) => weight + p,
            Penalty::Scale(s) => weight * s,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Adjustment {
    weight: Option<f32>,
    penalty: f32,
}

/// Temporary edge state consulted by one search.
#[derive(Debug, Clone, Default)]
pub struct SearchOverlay {
    disabled: FixedBitSet,
    adjustments: HashMap<EdgeIndex, Adjustment>,
}

impl SearchOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disable(&mut self, edge: EdgeIndex) {
        self.disabled.grow(edge.index() + 1);
        self.disabled.insert(edge.index());
    }

    /// Allow an edge again, undoing [`SearchOverlay::disable`].
    pub fn enable(&mut self, edge: EdgeIndex) {
        if edge.index() < self.disabled.len() {
            self.disabled.set(edge.index(), false);
        }
    }

    pub fn is_disabled(&self, edge: EdgeIndex) -> bool {
        self.disabled.contains(edge.index())
    }

    /// Replace the base weight of `edge`.
    pub fn set_weight(&mut self, edge: EdgeIndex, weight: f32) {
        self.adjustments.entry(edge).or_default().weight = Some(weight);
    }

    /// Add `penalty` on top of the (possibly replaced) weight of `edge`.
    pub fn add_penalty(&mut self, edge: EdgeIndex, penalty: f32) {
        self.adjustments.entry(edge).or_default().penalty += penalty;
    }

    /// Effective weight of `edge`, or `None` when it is disabled.
    pub fn weight(&self, graph: &VisibilityGraph, edge: EdgeIndex) -> Option<f32> {
        if self.is_disabled(edge) {
            return None;
        }

        let base = graph.graph()[edge].weight;
        let adjustment = self.adjustments.get(&edge).copied().unwrap_or_default();

        Some(adjustment.weight.unwrap_or(base) + adjustment.penalty)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub vertices: Vec<NodeIndex>,
    pub edges: Vec<EdgeIndex>,
    pub cost: f32,
}

#[derive(Debug, PartialEq, Eq)]
struct Frontier {
    estimate: RouteCost,
    cost: RouteCost,
    node: NodeIndex,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: lowest estimate first, then lowest cost, then lowest
        // index so that ties resolve deterministically.
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.cost.cmp(&self.cost))
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Run A* from `start` to `goal`.
///
/// - `heuristic(node)` estimates the remaining cost from `node`.
/// - `cost_override(previous_edge, current, proposed_edge)` may add to or scale the weight
///   of `proposed_edge`; `previous_edge` is `None` at `start`.
///
/// Returns `None` if `goal` can't be reached through enabled edges.
pub fn find_shortest_path<H, C>(
    graph: &VisibilityGraph,
    start: NodeIndex,
    goal: NodeIndex,
    overlay: &SearchOverlay,
    mut heuristic: H,
    mut cost_override: C,
) -> Option<SearchResult>
where
    H: FnMut(NodeIndex) -> f32,
    C: FnMut(Option<EdgeIndex>, NodeIndex, EdgeIndex) -> Option<Penalty>,
{
    let g = graph.graph();
    let mut open = BinaryHeap::new();
    let mut closed = FixedBitSet::with_capacity(g.node_count());
    let mut best: HashMap<NodeIndex, RouteCost> = HashMap::new();
    let mut came_from: HashMap<NodeIndex, EdgeIndex> = HashMap::new();

    best.insert(start, RouteCost(0.0));
    open.push(Frontier {
        estimate: RouteCost(heuristic(start)),
        cost: RouteCost(0.0),
        node: start,
    });

    while let Some(Frontier { cost, node, .. }) = open.pop() {
        if node == goal {
            return Some(reconstruct(graph, start, goal, cost, &came_from));
        }
        if closed.put(node.index()) {
            continue;
        }

        let previous = came_from.get(&node).copied();

        for e in g.edges(node) {
            let next = e.target();
            if closed.contains(next.index()) {
                continue;
            }
            let Some(weight) = overlay.weight(graph, e.id()) else { continue };

            let weight = cost_override(previous, node, e.id())
                .map_or(weight, |penalty| penalty.apply(weight));
            let next_cost = cost + RouteCost(weight);

            if best.get(&next).map_or(true, |c| next_cost < *c) {
                best.insert(next, next_cost);
                came_from.insert(next, e.id());
                open.push(Frontier {
                    estimate: next_cost + RouteCost(heuristic(next)),
                    cost: next_cost,
                    node: next,
                });
            }
        }
    }

    None
}

fn reconstruct(
    graph: &VisibilityGraph,
    start: NodeIndex,
    goal: NodeIndex,
    cost: RouteCost,
    came_from: &HashMap<NodeIndex, EdgeIndex>,
) -> SearchResult {
    let mut vertices = vec![goal];
    let mut edges = vec![];
    let mut node = goal;

    while node != start {
        let e = came_from[&node];
        let (source, _) = graph
            .graph()
            .edge_endpoints(e)
            .unwrap_or_else(|| panic!("[BUG] edge {} vanished during search", e.index()));

        edges.push(e);
        vertices.push(source);
        node = source;
    }

    vertices.reverse();
    edges.reverse();

    SearchResult {
        vertices,
        edges,
        cost: cost.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::RoutingConfig,
        geometry::{Direction, Point},
        landmark::{GridLine, GridLines, LineKind},
    };

    fn grid(n: usize) -> VisibilityGraph {
        let values = (0..n)
            .map(|i| GridLine::new(i as f32 * 10.0, LineKind::Bounds))
            .collect::<Vec<_>>();
        let lines = GridLines {
            columns: values.clone(),
            rows: values,
        };

        VisibilityGraph::from_lines(lines, &[], &RoutingConfig::default())
    }

    fn manhattan(graph: &VisibilityGraph, goal: NodeIndex) -> impl FnMut(NodeIndex) -> f32 + '_ {
        let target = graph.location(goal);
        move |n| graph.location(n).manhattan_distance(&target)
    }

    fn locations(graph: &VisibilityGraph, result: &SearchResult) -> Vec<Point> {
        result.vertices.iter().map(|v| graph.location(*v)).collect()
    }

    #[test]
    fn straight_line() {
        let g = grid(4);
        let a = g.vertex_at(&Point::new(0.0, 0.0)).unwrap();
        let b = g.vertex_at(&Point::new(30.0, 0.0)).unwrap();

        let overlay = SearchOverlay::new();
        let result =
            find_shortest_path(&g, a, b, &overlay, manhattan(&g, b), |_, _, _| None).unwrap();

        assert_eq!(result.cost, 30.0);
        assert_eq!(result.edges.len(), 3);
        assert_eq!(result.vertices.first(), Some(&a));
        assert_eq!(result.vertices.last(), Some(&b));
    }

    #[test]
    fn disabled_edges_are_avoided() {
        let g = grid(3);
        let a = g.vertex_at(&Point::new(0.0, 0.0)).unwrap();
        let mid = g.vertex_at(&Point::new(10.0, 0.0)).unwrap();
        let b = g.vertex_at(&Point::new(20.0, 0.0)).unwrap();

        let mut overlay = SearchOverlay::new();
        overlay.disable(g.edge_toward(mid, Direction::East).unwrap());

        let result =
            find_shortest_path(&g, a, b, &overlay, manhattan(&g, b), |_, _, _| None).unwrap();

        assert_eq!(result.cost, 40.0);
        assert!(!result.vertices.windows(2).any(|w| w == [mid, b]));

        overlay.enable(g.edge_toward(mid, Direction::East).unwrap());
        let result =
            find_shortest_path(&g, a, b, &overlay, manhattan(&g, b), |_, _, _| None).unwrap();
        assert_eq!(result.cost, 20.0);
    }

    #[test]
    fn unreachable_goal() {
        let g = grid(2);
        let a = g.vertex_at(&Point::new(0.0, 0.0)).unwrap();
        let b = g.vertex_at(&Point::new(10.0, 10.0)).unwrap();

        let mut overlay = SearchOverlay::new();
        for e in g.graph().edge_indices() {
            overlay.disable(e);
        }

        assert!(find_shortest_path(&g, a, b, &overlay, manhattan(&g, b), |_, _, _| None).is_none());
    }

    #[test]
    fn overlay_weights() {
        let g = grid(2);
        let a = g.vertex_at(&Point::new(0.0, 0.0)).unwrap();
        let east = g.edge_toward(a, Direction::East).unwrap();

        let mut overlay = SearchOverlay::new();
        assert_eq!(overlay.weight(&g, east), Some(10.0));

        overlay.set_weight(east, 0.0);
        overlay.add_penalty(east, 5.0);
        assert_eq!(overlay.weight(&g, east), Some(5.0));

        overlay.disable(east);
        assert_eq!(overlay.weight(&g, east), None);
    }

    #[test]
    fn turn_penalty_prefers_single_bend() {
        let g = grid(4);
        let a = g.vertex_at(&Point::new(0.0, 0.0)).unwrap();
        let b = g.vertex_at(&Point::new(30.0, 30.0)).unwrap();

        let result = find_shortest_path(
            &g,
            a,
            b,
            &SearchOverlay::new(),
            manhattan(&g, b),
            |previous, _, proposed| {
                let previous = previous?;
                let turning = g.graph()[previous].direction != g.graph()[proposed].direction;
                turning.then_some(Penalty::Scale(1.03))
            },
        )
        .unwrap();

        let directions = result
            .edges
            .iter()
            .map(|e| g.graph()[*e].direction)
            .collect::<Vec<_>>();
        let turns = directions.windows(2).filter(|w| w[0] != w[1]).count();

        assert_eq!(turns, 1);
        assert_eq!(locations(&g, &result).len(), 7);
    }
}
