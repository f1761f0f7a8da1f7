//! Router selection.
//!
//! Both routers implement [`Router`]. An edge with a hard exit constraint on either endpoint
//! goes to the grid router first, because only the grid search can guarantee the constrained
//! direction. Everything else, and every edge the grid router can't route, goes to the
//! heuristic router.
use crate::{
    config::RoutingConfig, edge::Edge, grid_router::GridRouter, heuristic::HeuristicRouter,
    path::Path,
};
use derive_more::Display;

/// Something that can route an edge. `None` means no usable path was found.
pub trait Router {
    fn route(&self, edge: &Edge) -> Option<Path>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RouterKind {
    #[display(fmt = "grid")]
    Grid,
    #[display(fmt = "heuristic")]
    Heuristic,
}

impl RouterKind {
    /// The router to try first for `edge`.
    pub fn for_edge(edge: &Edge) -> Self {
        let constrained = edge.start.routing_constraint().is_some()
            || edge.end.routing_constraint().is_some();

        if constrained {
            RouterKind::Grid
        } else {
            RouterKind::Heuristic
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouterSelector {
    grid: GridRouter,
    heuristic: HeuristicRouter,
}

impl RouterSelector {
    pub fn new(config: RoutingConfig) -> Self {
        Self {
            grid: GridRouter::new(config.clone()),
            heuristic: HeuristicRouter::new(config),
        }
    }

    pub fn select(&self, kind: RouterKind) -> &dyn Router {
        match kind {
            RouterKind::Grid => &self.grid,
            RouterKind::Heuristic => &self.heuristic,
        }
    }

    /// Route `edge` with the router picked by [`RouterKind::for_edge`], falling back to the
    /// heuristic router.
    pub fn route_path(&self, edge: &Edge) -> Path {
        let kind = RouterKind::for_edge(edge);

        if kind == RouterKind::Grid {
            if let Some(path) = self.select(kind).route(edge) {
                tracing::debug!(router = %kind, segments = path.len(), "routed edge");
                return path;
            }
            tracing::debug!("grid router failed, falling back to heuristic router");
        }

        let path = self.heuristic.route_path(edge);
        tracing::debug!(
            router = %RouterKind::Heuristic,
            segments = path.len(),
            "routed edge"
        );
        path
    }
}

impl Router for RouterSelector {
    fn route(&self, edge: &Edge) -> Option<Path> {
        Some(self.route_path(edge))
    }
}
