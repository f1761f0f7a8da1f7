//! Orthogonal edge routing between rectangular shapes.
//!
//! ```
//! use orthoroute::{route, Edge, Endpoint, Point, Rect};
//!
//! let edge = Edge::new(
//!     Endpoint::connected(Point::new(100.0, 50.0), Rect::from_xywh(0.0, 0.0, 100.0, 100.0)),
//!     Endpoint::connected(Point::new(300.0, 50.0), Rect::from_xywh(300.0, 0.0, 100.0, 100.0)),
//! );
//!
//! assert_eq!(route(&edge).to_string(), "M100 50 L300 50");
//! ```
pub mod config;
pub mod edge;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod grid_router;
pub mod heuristic;
pub mod landmark;
pub mod path;
pub mod render;
pub mod router;
pub mod search;

pub use config::{RoutingConfig, RoutingConfigBuilder};
pub use edge::{Edge, EdgeBuilder, Endpoint, Waypoint};
pub use error::{RenderError, RouteError};
pub use geometry::{Direction, Point, Rect, Size};
pub use path::{Path, PathCommand};
pub use router::{Router, RouterKind, RouterSelector};

/// Route `edge` with the default configuration.
pub fn route(edge: &Edge) -> Path {
    RouterSelector::default().route_path(edge)
}

/// Route `edge` with `config`.
pub fn route_with(edge: &Edge, config: &RoutingConfig) -> Path {
    RouterSelector::new(config.clone()).route_path(edge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use difference::assert_diff;

    fn start_shape() -> Rect {
        Rect::from_xywh(0.0, 0.0, 100.0, 100.0)
    }

    fn scenario_b() -> Edge {
        Edge::new(
            Endpoint::connected(Point::new(100.0, 50.0), start_shape()),
            Endpoint::connected(
                Point::new(300.0, 350.0),
                Rect::from_xywh(300.0, 300.0, 100.0, 100.0),
            ),
        )
    }

    fn assert_orthogonal(path: &Path) {
        for (p, q) in path.segments() {
            assert!(p.x == q.x || p.y == q.y, "({}) -> ({}) in {}", p, q, path);
        }
    }

    fn assert_outside(path: &Path, edge: &Edge) {
        for (p, q) in path.segments() {
            for r in edge.obstacles() {
                assert!(!r.crossed_by(&p, &q), "({}) -> ({}) crosses {:?} in {}", p, q, r, path);
            }
        }
    }

    #[test]
    fn scenario_a_straight_line() {
        let edge = Edge::new(
            Endpoint::connected(Point::new(100.0, 50.0), start_shape()),
            Endpoint::connected(
                Point::new(300.0, 50.0),
                Rect::from_xywh(300.0, 0.0, 100.0, 100.0),
            ),
        );
        let path = route(&edge);

        assert_diff!(&path.to_string(), "M100 50 L300 50", " ", 0);
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn scenario_b_single_bend() {
        let path = route(&scenario_b());

        assert_diff!(&path.to_string(), "M100 50 L300 50 L300 350", " ", 0);
        assert_eq!(path.bends(), 1);
        assert_orthogonal(&path);
    }

    #[test]
    fn scenario_c_via_point() {
        let edge = Edge {
            waypoints: vec![Waypoint::new(200.0, 250.0)],
            ..scenario_b()
        };
        let path = route(&edge);

        assert_diff!(
            &path.to_string(),
            "M100 50 L200 50 L200 250 L200 350 L300 350",
            " ",
            0
        );
        assert_outside(&path, &edge);
    }

    #[test]
    fn scenario_d_constraint_away_from_target() {
        let edge = Edge::new(
            Endpoint::constrained(Point::new(100.0, 50.0), start_shape(), Direction::East),
            Endpoint::free(Point::new(-200.0, 50.0)),
        );
        let path = route(&edge);

        assert_eq!(path.directions().first(), Some(&Direction::East));
        assert_eq!(path.last_point(), Some(Point::new(-200.0, 50.0)));
        assert_orthogonal(&path);
        assert_outside(&path, &edge);
    }

    #[test]
    fn end_constraint_is_honored() {
        let edge = Edge::new(
            Endpoint::connected(Point::new(100.0, 50.0), start_shape()),
            Endpoint::constrained(
                Point::new(400.0, 350.0),
                Rect::from_xywh(300.0, 300.0, 100.0, 100.0),
                Direction::West,
            ),
        );
        let path = route(&edge);

        assert_eq!(path.directions().last(), Some(&Direction::West));
        assert_eq!(path.last_point(), Some(Point::new(400.0, 350.0)));
        assert_outside(&path, &edge);
    }

    #[test]
    fn target_behind_start_shape() {
        let edge = Edge::new(
            Endpoint::connected(Point::new(100.0, 50.0), start_shape()),
            Endpoint::free(Point::new(-100.0, 50.0)),
        );
        let path = route(&edge);

        assert_eq!(path.last_point(), Some(Point::new(-100.0, 50.0)));
        assert_orthogonal(&path);
        assert_outside(&path, &edge);
    }

    #[test]
    fn via_points_next_to_start_shape() {
        // (via-point, end) around the start shape
        let cases = [
            ((74.0, -41.0), (50.0, 300.0)),
            ((67.0, 150.0), (50.0, -200.0)),
            ((-41.0, 26.0), (300.0, 50.0)),
            ((50.0, 130.0), (50.0, -80.0)),
            ((30.0, -50.0), (200.0, 200.0)),
        ];

        for ((wx, wy), (ex, ey)) in cases {
            let edge = Edge {
                waypoints: vec![Waypoint::new(wx, wy)],
                ..Edge::new(
                    Endpoint::connected(Point::new(100.0, 50.0), start_shape()),
                    Endpoint::free(Point::new(ex, ey)),
                )
            };
            let path = route(&edge);

            assert!(path.points().any(|p| p == Point::new(wx, wy)), "{}", path);
            assert_eq!(path.last_point(), Some(Point::new(ex, ey)));
            assert_orthogonal(&path);
            assert_outside(&path, &edge);
        }
    }

    #[test]
    fn passes_through_every_via_point() {
        let waypoints = vec![
            Waypoint::new(200.0, 250.0),
            Waypoint::new(150.0, 400.0),
            Waypoint::new(250.0, 450.0),
        ];
        let edge = Edge {
            waypoints: waypoints.clone(),
            ..scenario_b()
        };
        let points = route(&edge).points().collect::<Vec<_>>();

        let mut from = 0;
        for w in &waypoints {
            let at = points[from..]
                .iter()
                .position(|p| *p == w.point)
                .unwrap_or_else(|| panic!("({}) missing from {:?}", w.point, points));
            from += at + 1;
        }
    }

    #[test]
    fn deterministic() {
        let edges = [
            scenario_b(),
            Edge {
                waypoints: vec![Waypoint::new(200.0, 250.0)],
                ..scenario_b()
            },
            Edge::new(
                Endpoint::constrained(Point::new(100.0, 50.0), start_shape(), Direction::East),
                Endpoint::free(Point::new(-200.0, 50.0)),
            ),
        ];

        for edge in &edges {
            assert_eq!(route(edge).to_string(), route(edge).to_string());
        }
    }

    #[test]
    fn custom_config() {
        let config = RoutingConfigBuilder::default()
            .outer_margin(40.0)
            .build()
            .unwrap();
        let edge = Edge::new(
            Endpoint::connected(Point::new(100.0, 50.0), start_shape()),
            Endpoint::free(Point::new(-100.0, 50.0)),
        );

        // The detour around the start shape keeps the larger margin.
        assert_eq!(route_with(&edge, &config).to_string(), "M100 50 L100 -40 L-100 -40 L-100 50");
        assert_eq!(route(&edge).to_string(), "M100 50 L100 -20 L-100 -20 L-100 50");
    }

    #[test]
    fn degenerate_edge() {
        let p = Point::new(5.0, 5.0);
        let edge = Edge::new(Endpoint::free(p), Endpoint::free(p));

        assert_eq!(route(&edge).to_string(), "M5 5 L5 5");
    }
}
