//! Routing request model: the two endpoints of an edge and its via-points.
use crate::geometry::{Direction, Point, Rect};
use derive_builder::Builder;

/// One terminus of an edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Endpoint {
    /// An arbitrary point on the canvas.
    Free { position: Point },
    /// A point bound to a shape.
    ///
    /// `routing_constraint` forces every path touching this endpoint to travel in that
    /// direction when leaving (start) or arriving (end).
    Connected {
        position: Point,
        bounds: Rect,
        routing_constraint: Option<Direction>,
    },
}

impl Endpoint {
    pub fn free(position: Point) -> Self {
        Endpoint::Free { position }
    }

    pub fn connected(position: Point, bounds: Rect) -> Self {
        Endpoint::Connected {
            position,
            bounds,
            routing_constraint: None,
        }
    }

    pub fn constrained(position: Point, bounds: Rect, direction: Direction) -> Self {
        Endpoint::Connected {
            position,
            bounds,
            routing_constraint: Some(direction),
        }
    }

    pub fn position(&self) -> Point {
        match self {
            Endpoint::Free { position } | Endpoint::Connected { position, .. } => *position,
        }
    }

    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Endpoint::Free { .. } => None,
            Endpoint::Connected { bounds, .. } => Some(*bounds),
        }
    }

    pub fn routing_constraint(&self) -> Option<Direction> {
        match self {
            Endpoint::Free { .. } => None,
            Endpoint::Connected {
                routing_constraint, ..
            } => *routing_constraint,
        }
    }

    /// Center of the shape for connected endpoints, the position itself otherwise.
    pub fn anchor_center(&self) -> Point {
        self.bounds()
            .map(|r| r.center())
            .unwrap_or_else(|| self.position())
    }

    /// Returns `true` if the endpoint is bound to the exact center of its shape.
    pub fn is_center_anchored(&self) -> bool {
        self.bounds()
            .map_or(false, |r| r.center() == self.position())
    }

    /// The outline used for envelope computation: the shape bounds, or a zero-size rectangle
    /// at the position of a free endpoint.
    pub fn outline(&self) -> Rect {
        self.bounds()
            .unwrap_or_else(|| Rect::from_xywh(self.position().x, self.position().y, 0.0, 0.0))
    }
}

/// A caller-specified via-point the path must pass through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub point: Point,
}

impl Waypoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            point: Point::new(x, y),
        }
    }
}

impl From<Point> for Waypoint {
    fn from(point: Point) -> Self {
        Self { point }
    }
}

/// An edge to route.
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct Edge {
    pub start: Endpoint,
    pub end: Endpoint,
    #[builder(default, setter(into))]
    pub waypoints: Vec<Waypoint>,
    #[builder(default, setter(strip_option))]
    pub preferred_start_direction: Option<Direction>,
    #[builder(default, setter(strip_option))]
    pub preferred_end_direction: Option<Direction>,
}

impl Edge {
    pub fn new(start: Endpoint, end: Endpoint) -> Self {
        Self {
            start,
            end,
            waypoints: vec![],
            preferred_start_direction: None,
            preferred_end_direction: None,
        }
    }

    /// Start position, via-points and end position in order.
    pub fn chain(&self) -> Vec<Point> {
        let mut points = Vec::with_capacity(self.waypoints.len() + 2);

        points.push(self.start.position());
        points.extend(self.waypoints.iter().map(|w| w.point));
        points.push(self.end.position());
        points
    }

    /// Rectangles of the connected endpoints.
    pub fn obstacles(&self) -> impl Iterator<Item = Rect> + '_ {
        [self.start.bounds(), self.end.bounds()].into_iter().flatten()
    }

    /// Returns `true` if start and end coincide with no via-point between them.
    pub fn is_degenerate(&self) -> bool {
        self.waypoints.is_empty() && self.start.position() == self.end.position()
    }

    /// Direction the first segment should leave the start with: the start constraint if any,
    /// otherwise the caller's preference.
    pub fn start_direction(&self) -> Option<Direction> {
        self.start
            .routing_constraint()
            .or(self.preferred_start_direction)
    }

    /// Direction the last segment should arrive at the end with.
    pub fn end_direction(&self) -> Option<Direction> {
        self.end.routing_constraint().or(self.preferred_end_direction)
    }
}
