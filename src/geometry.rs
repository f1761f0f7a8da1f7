//! Geometry primitives.
//!
//! coordinate system: top-left origin, `y` grows downward.
//!
//! ```svgbob
//! +--------------------------> x
//! | (0, 0)           (300, 0)
//! |        N
//! |      W + E
//! |        S
//! | (0, 100)
//! v y
//! ```
use derive_more::Display;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Sum of absolute coordinate differences.
    pub fn manhattan_distance(&self, other: &Point) -> f32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Move `distance` units toward `direction`.
    pub fn step(&self, direction: Direction, distance: f32) -> Point {
        let (dx, dy) = direction.unit();
        Point::new(self.x + dx * distance, self.y + dy * distance)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Corners and centers in a rectangle.
///
/// ```svgbob
///           minX    midX    maxX
///   (origin) *----------*----------*
///            |                     |
///            |                     |
///            * (center) *          * midY
///            |                     |
///            |                     |
///            *----------*----------* maxY
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    pub const fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(Point::new(x, y), Size::new(width, height))
    }

    /// The smallest rectangle containing every point of `points`.
    pub fn bounding(points: impl IntoIterator<Item = Point>) -> Option<Rect> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| {
            (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            )
        });

        Some(Rect::from_xywh(min.x, min.y, max.x - min.x, max.y - min.y))
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.mid_x(), self.mid_y())
    }

    pub fn min_x(&self) -> f32 {
        self.origin.x
    }

    pub fn mid_x(&self) -> f32 {
        self.origin.x + self.size.width / 2.0
    }

    pub fn max_x(&self) -> f32 {
        self.origin.x + self.size.width
    }

    pub fn min_y(&self) -> f32 {
        self.origin.y
    }

    pub fn mid_y(&self) -> f32 {
        self.origin.y + self.size.height / 2.0
    }

    pub fn max_y(&self) -> f32 {
        self.origin.y + self.size.height
    }


    /// Returns a rectangle that is smaller or larger than the source rectangle, with the same
    /// center point. Negative insets grow the rectangle.
    pub fn inset_by(&self, dx: f32, dy: f32) -> Rect {
        Rect::from_xywh(
            self.origin.x + dx,
            self.origin.y + dy,
            (self.size.width - dx * 2.0).max(0.0),
            (self.size.height - dy * 2.0).max(0.0),
        )
    }

    /// The union of two rectangles.
    pub fn union(&self, other: &Rect) -> Rect {
        let min_x = self.min_x().min(other.min_x());
        let min_y = self.min_y().min(other.min_y());
        let max_x = self.max_x().max(other.max_x());
        let max_y = self.max_y().max(other.max_y());

        Rect::from_xywh(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// `true` if `p` lies inside or on the boundary.
    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.min_x() && p.x <= self.max_x() && p.y >= self.min_y() && p.y <= self.max_y()
    }

    /// `true` if `p` lies strictly inside, not on the boundary.
    pub fn interior_contains(&self, p: &Point) -> bool {
        p.x > self.min_x() && p.x < self.max_x() && p.y > self.min_y() && p.y < self.max_y()
    }

    /// Returns `true` if the axis-aligned segment `p..q` passes through the interior.
    ///
    /// Segments running along the boundary, or merely touching it, do not cross.
    pub fn crossed_by(&self, p: &Point, q: &Point) -> bool {
        if p.y == q.y {
            let (x0, x1) = (p.x.min(q.x), p.x.max(q.x));

            p.y > self.min_y()
                && p.y < self.max_y()
                && x1.min(self.max_x()) - x0.max(self.min_x()) > 0.0
        } else if p.x == q.x {
            let (y0, y1) = (p.y.min(q.y), p.y.max(q.y));

            p.x > self.min_x()
                && p.x < self.max_x()
                && y1.min(self.max_y()) - y0.max(self.min_y()) > 0.0
        } else {
            // Not axis-aligned: check both legs of the bounding corner path.
            let corner = Point::new(q.x, p.y);
            self.crossed_by(p, &corner) || self.crossed_by(&corner, q)
        }
    }
}

/// Compass direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum Direction {
    #[display(fmt = "N")]
    North,
    #[display(fmt = "E")]
    East,
    #[display(fmt = "S")]
    South,
    #[display(fmt = "W")]
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::East | Direction::West)
    }

    /// Unit vector in screen coordinates.
    pub fn unit(self) -> (f32, f32) {
        match self {
            Direction::North => (0.0, -1.0),
            Direction::East => (1.0, 0.0),
            Direction::South => (0.0, 1.0),
            Direction::West => (-1.0, 0.0),
        }
    }

    /// Direction of travel along the axis-aligned segment `p -> q`.
    ///
    /// Returns `None` for a zero-length segment. For a diagonal the dominant axis wins.
    pub fn between(p: &Point, q: &Point) -> Option<Direction> {
        let dx = q.x - p.x;
        let dy = q.y - p.y;

        if dx == 0.0 && dy == 0.0 {
            None
        } else if dx.abs() >= dy.abs() {
            Some(if dx > 0.0 {
                Direction::East
            } else {
                Direction::West
            })
        } else {
            Some(if dy > 0.0 {
                Direction::South
            } else {
                Direction::North
            })
        }
    }

    /// `true` if moving toward `self` from `from` reduces the distance to `to`.
    pub fn makes_progress(self, from: &Point, to: &Point) -> bool {
        match self {
            Direction::North => to.y < from.y,
            Direction::East => to.x > from.x,
            Direction::South => to.y > from.y,
            Direction::West => to.x < from.x,
        }
    }
}
