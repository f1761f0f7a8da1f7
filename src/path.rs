//! Routed paths.
//!
//! A [`Path`] is a single polyline: one `MoveTo` followed by one or more `LineTo`. It renders
//! as SVG path data (`M100 50 L300 50`) through `Display`.
use crate::geometry::{Direction, Point};
use derive_more::Display;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Display)]
pub enum PathCommand {
    #[display(fmt = "M{}", _0)]
    MoveTo(Point),
    #[display(fmt = "L{}", _0)]
    LineTo(Point),
}

impl PathCommand {
    pub fn point(&self) -> Point {
        match self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => *p,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    /// Build a path from a polyline. Repeated points and collinear interior points are
    /// dropped. A polyline collapsing to a single point becomes a zero-length segment.
    pub fn from_polyline(points: &[Point]) -> Self {
        let points = simplify(points);
        let Some((first, rest)) = points.split_first() else { return Self::default() };

        let mut commands = Vec::with_capacity(points.len().max(2));
        commands.push(PathCommand::MoveTo(*first));

        if rest.is_empty() {
            commands.push(PathCommand::LineTo(*first));
        } else {
            commands.extend(rest.iter().copied().map(PathCommand::LineTo));
        }

        Self { commands }
    }

    /// Concatenate independently routed legs into one path.
    ///
    /// Each leg is simplified on its own so that the joints between legs (via-points) stay
    /// as vertices of the result.
    ///
    /// **Panics** if a leg does not start where the previous one ended.
    pub fn from_legs<L: AsRef<[Point]>>(legs: &[L]) -> Self {
        let mut points: Vec<Point> = vec![];

        for leg in legs {
            let leg = simplify(leg.as_ref());
            let Some((first, rest)) = leg.split_first() else { continue };

            match points.last() {
                None => points.push(*first),
                Some(last) if last == first => {}
                Some(last) => panic!(
                    "[BUG] disjoint polyline: leg starts at ({}) but previous leg ended at ({})",
                    first, last
                ),
            }
            points.extend_from_slice(rest);
        }

        let Some((first, rest)) = points.split_first() else { return Self::default() };
        let mut commands = vec![PathCommand::MoveTo(*first)];

        if rest.is_empty() {
            commands.push(PathCommand::LineTo(*first));
        } else {
            commands.extend(rest.iter().copied().map(PathCommand::LineTo));
        }

        Self { commands }
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn points(&self) -> impl ExactSizeIterator<Item = Point> + '_ {
        self.commands.iter().map(|c| c.point())
    }

    /// Consecutive `(from, to)` pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.commands
            .windows(2)
            .map(|w| (w[0].point(), w[1].point()))
    }

    /// Number of line segments.
    pub fn len(&self) -> usize {
        self.commands.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn first_point(&self) -> Option<Point> {
        self.commands.first().map(|c| c.point())
    }

    pub fn last_point(&self) -> Option<Point> {
        self.commands.last().map(|c| c.point())
    }

    pub fn total_length(&self) -> f32 {
        self.segments()
            .map(|(p, q)| p.manhattan_distance(&q))
            .sum()
    }

    /// Travel direction of each non-degenerate segment.
    pub fn directions(&self) -> Vec<Direction> {
        self.segments()
            .filter_map(|(p, q)| Direction::between(&p, &q))
            .collect()
    }

    /// Number of direction changes.
    pub fn bends(&self) -> usize {
        self.directions()
            .windows(2)
            .filter(|w| w[0] != w[1])
            .count()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", command)?;
        }
        Ok(())
    }
}

// Drop repeated points, then drop points sitting in the middle of a straight run.
fn simplify(points: &[Point]) -> Vec<Point> {
    let mut deduped: Vec<Point> = Vec::with_capacity(points.len());

    for p in points {
        if deduped.last() != Some(p) {
            deduped.push(*p);
        }
    }

    let mut simplified: Vec<Point> = Vec::with_capacity(deduped.len());

    for p in deduped {
        while simplified.len() >= 2 {
            let a = simplified[simplified.len() - 2];
            let b = simplified[simplified.len() - 1];
            let collinear = (a.x == b.x && b.x == p.x) || (a.y == b.y && b.y == p.y);

            if collinear {
                simplified.pop();
            } else {
                break;
            }
        }
        simplified.push(p);
    }

    simplified
}
