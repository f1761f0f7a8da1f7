//! Heuristic router: builds the path segment by segment from L- and Z-shaped candidates,
//! without a grid. Always succeeds.
//!
//! For a segment `prev -> next` and a first direction `d`:
//!
//! ```svgbob
//!   full (single bend)        half (double bend at the midpoint)
//!
//!   prev o-----------.        prev o-----.
//!                    |                   |
//!                    |                   |
//!                    v                   `-----> o next
//!                    o next
//! ```
//!
//! After those come detours for every available direction: a stub toward `d` out to the
//! margin around all shapes and via-points, then either an L to `next` or a run along that
//! margin before turning in to `next`. This is how the path gets around a shape standing
//! between `prev` and `next`.
//!
//! The exit direction of the chosen candidate becomes the preferred direction of the next
//! segment, and its opposite is not available there, so the path never reverses into the
//! vertex it just entered.
use crate::{
    config::RoutingConfig,
    edge::Edge,
    geometry::{Direction, Point, Rect},
    path::Path,
    router::Router,
};
use smallvec::SmallVec;

#[derive(Debug, Clone, Default)]
pub struct HeuristicRouter {
    config: RoutingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
    Full,
    Half,
    Detour,
}

#[derive(Debug, Clone)]
struct Candidate {
    points: SmallVec<[Point; 5]>,
    variant: Variant,
    first: Direction,
    last: Direction,
    // no crossing of a shape and no internal reversal
    valid: bool,
}

impl Candidate {
    fn new(points: &[Point], variant: Variant, obstacles: &[Rect]) -> Option<Self> {
        let points = corners(points);
        let directions = points
            .windows(2)
            .filter_map(|w| Direction::between(&w[0], &w[1]))
            .collect::<SmallVec<[Direction; 4]>>();

        let first = *directions.first()?;
        let last = *directions.last()?;
        let reverses = directions.windows(2).any(|w| w[0] == w[1].opposite());
        let crosses = points
            .windows(2)
            .any(|w| obstacles.iter().any(|r| r.crossed_by(&w[0], &w[1])));

        Some(Self {
            points,
            variant,
            first,
            last,
            valid: !reverses && !crosses,
        })
    }

    fn segments(&self) -> usize {
        self.points.len() - 1
    }
}

impl HeuristicRouter {
    pub fn new(config: RoutingConfig) -> Self {
        Self { config }
    }

    /// Route `edge`. Never fails; a degenerate edge yields a zero-length segment.
    pub fn route_path(&self, edge: &Edge) -> Path {
        if edge.is_degenerate() {
            let p = edge.start.position();
            return Path::from_polyline(&[p, p]);
        }

        let chain = anchored_chain(edge);
        let obstacles = edge.obstacles().collect::<Vec<_>>();
        let envelope = obstacles
            .iter()
            .fold(Rect::bounding(chain.iter().copied()), |r, o| {
                Some(r.map_or(*o, |r| r.union(o)))
            })
            .map(|r| r.inset_by(-self.config.outer_margin, -self.config.outer_margin))
            .unwrap_or_default();
        let n_segments = chain.len() - 1;

        let mut preferred = edge.start_direction();
        let mut available: SmallVec<[Direction; 4]> = SmallVec::from_buf(Direction::ALL);
        let mut legs: Vec<SmallVec<[Point; 5]>> = Vec::with_capacity(n_segments);

        for (index, pair) in chain.windows(2).enumerate() {
            let (prev, next) = (pair[0], pair[1]);

            if prev == next {
                legs.push(SmallVec::from_slice(&[prev]));
                continue;
            }

            let candidates =
                self.candidates(prev, next, preferred, &available, &obstacles, &envelope);
            let chosen = if index + 1 == n_segments {
                select_final(&candidates, edge.end_direction())
            } else {
                select_intermediate(&candidates)
            };

            let Some(chosen) = chosen else {
                // no candidate at all; keep the segment straight
                legs.push(SmallVec::from_slice(&[prev, next]));
                continue;
            };

            tracing::trace!(
                segment = index,
                first = %chosen.first,
                last = %chosen.last,
                variant = ?chosen.variant,
                "chose candidate"
            );

            preferred = Some(chosen.last);
            available = Direction::ALL
                .into_iter()
                .filter(|d| *d != chosen.last.opposite())
                .collect();
            legs.push(chosen.points.clone());
        }

        Path::from_legs(&legs)
    }

    // Candidates ordered by preference: valid ones first, then full and half shapes by first
    // direction (preferred, other approaching directions), then detours by first direction.
    fn candidates(
        &self,
        prev: Point,
        next: Point,
        preferred: Option<Direction>,
        available: &[Direction],
        obstacles: &[Rect],
        envelope: &Rect,
    ) -> Vec<Candidate> {
        let mut order: SmallVec<[Direction; 4]> = SmallVec::new();

        if let Some(d) =
            preferred.filter(|d| available.contains(d) && d.makes_progress(&prev, &next))
        {
            order.push(d);
        }
        for d in available {
            if d.makes_progress(&prev, &next) && !order.contains(d) {
                order.push(*d);
            }
        }
        for d in available {
            if !order.contains(d) {
                order.push(*d);
            }
        }

        let mut candidates = vec![];

        for d in order.iter().filter(|d| d.makes_progress(&prev, &next)) {
            let corner = if d.is_horizontal() {
                Point::new(next.x, prev.y)
            } else {
                Point::new(prev.x, next.y)
            };
            candidates.extend(Candidate::new(&[prev, corner, next], Variant::Full, obstacles));

            let mid = prev.midpoint(&next);
            let (a, b) = if d.is_horizontal() {
                (Point::new(mid.x, prev.y), Point::new(mid.x, next.y))
            } else {
                (Point::new(prev.x, mid.y), Point::new(next.x, mid.y))
            };
            if a != b {
                let half = Candidate::new(&[prev, a, b, next], Variant::Half, obstacles);
                candidates.extend(half);
            }
        }

        for d in order {
            self.push_detours(&mut candidates, prev, next, d, obstacles, envelope);
        }

        for c in &mut candidates {
            c.valid &= available.contains(&c.first);
        }
        // stable: keeps the direction order within each group
        candidates.sort_by_key(|c| !c.valid);
        candidates
    }

    // A stub toward `d` out to the envelope, then either an L to `next` or a run along the
    // envelope around its corner before turning in to `next`.
    //
    // ```svgbob
    //      out        prev            out        prev
    //       o<---------o               o<---------o
    //       |                          |
    //       |      o next              |     o next
    //       |      ^                   |     ^
    //       `------'                   |     |
    //                                  `-----'  (along the envelope edge)
    // ```
    fn push_detours(
        &self,
        candidates: &mut Vec<Candidate>,
        prev: Point,
        next: Point,
        d: Direction,
        obstacles: &[Rect],
        envelope: &Rect,
    ) {
        // far enough to clear every shape on that side
        let out = prev.step(d, reach(envelope, prev, d).max(self.config.outer_margin));

        for corner in [Point::new(next.x, out.y), Point::new(out.x, next.y)] {
            let detour = Candidate::new(&[prev, out, corner, next], Variant::Detour, obstacles);
            candidates.extend(detour);
        }

        let sides = if d.is_horizontal() {
            [Direction::North, Direction::South]
        } else {
            [Direction::East, Direction::West]
        };
        for side in sides {
            let edge_point = out.step(side, reach(envelope, out, side).max(0.0));
            let turn_in = if side.is_horizontal() {
                Point::new(edge_point.x, next.y)
            } else {
                Point::new(next.x, edge_point.y)
            };
            candidates.extend(Candidate::new(
                &[prev, out, edge_point, turn_in, next],
                Variant::Detour,
                obstacles,
            ));
        }
    }
}

impl Router for HeuristicRouter {
    fn route(&self, edge: &Edge) -> Option<Path> {
        Some(self.route_path(edge))
    }
}

fn select_intermediate(candidates: &[Candidate]) -> Option<&Candidate> {
    candidates.first()
}

fn select_final(candidates: &[Candidate], end_direction: Option<Direction>) -> Option<&Candidate> {
    let valid = candidates.iter().filter(|c| c.valid).collect::<Vec<_>>();
    let pool = if valid.is_empty() {
        candidates.iter().collect()
    } else {
        valid
    };

    end_direction
        .and_then(|d| pool.iter().copied().find(|c| c.last == d))
        .or_else(|| pool.iter().copied().min_by_key(|c| c.segments()))
}

// Distance from `p` to the side of `envelope` that lies toward `d`.
fn reach(envelope: &Rect, p: Point, d: Direction) -> f32 {
    match d {
        Direction::North => p.y - envelope.min_y(),
        Direction::East => envelope.max_x() - p.x,
        Direction::South => envelope.max_y() - p.y,
        Direction::West => p.x - envelope.min_x(),
    }
}

/// The chain of the edge, with center-anchored endpoints moved to the boundary of their
/// shape facing the neighbouring point.
fn anchored_chain(edge: &Edge) -> Vec<Point> {
    let mut chain = edge.chain();
    let n = chain.len();

    if let (true, Some(bounds)) = (edge.start.is_center_anchored(), edge.start.bounds()) {
        chain[0] = snap_to_boundary(&bounds, &chain[1]);
    }
    if let (true, Some(bounds)) = (edge.end.is_center_anchored(), edge.end.bounds()) {
        chain[n - 1] = snap_to_boundary(&bounds, &chain[n - 2]);
    }

    chain
}

/// The middle of the side of `bounds` that faces `toward`.
fn snap_to_boundary(bounds: &Rect, toward: &Point) -> Point {
    let center = bounds.center();
    let dx = toward.x - center.x;
    let dy = toward.y - center.y;

    if dx == 0.0 && dy == 0.0 {
        center
    } else if dx.abs() * bounds.height() >= dy.abs() * bounds.width() {
        let x = if dx > 0.0 { bounds.max_x() } else { bounds.min_x() };
        Point::new(x, center.y)
    } else {
        let y = if dy > 0.0 { bounds.max_y() } else { bounds.min_y() };
        Point::new(center.x, y)
    }
}

// Drop repeated points and points in the middle of a straight run. Reversals are kept so
// that they can be rejected.
fn corners(points: &[Point]) -> SmallVec<[Point; 5]> {
    let mut result: SmallVec<[Point; 5]> = SmallVec::new();

    for p in points {
        if result.last() == Some(p) {
            continue;
        }
        if result.len() >= 2 {
            let a = result[result.len() - 2];
            let b = result[result.len() - 1];
            let straight = Direction::between(&a, &b) == Direction::between(&b, p);
            if straight {
                result.pop();
            }
        }
        result.push(*p);
    }

    result
}
