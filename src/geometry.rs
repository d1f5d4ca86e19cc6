// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

/// A position on the (projected) plane.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn dist(self, other: Point) -> f64 {
        distance(self, other)
    }

    #[inline]
    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    #[inline]
    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    #[inline]
    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl std::ops::Mul<f64> for Point {
    type Output = Point;

    #[inline]
    fn mul(self, factor: f64) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }
}

/// Calculates the Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Where a projected point falls relative to the finite span of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentPosition {
    /// The projection lies on the line extension behind the segment's start.
    Before,

    /// The projection lies on the segment, endpoints included.
    Between,

    /// The projection lies on the line extension past the segment's end.
    After,
}

impl std::fmt::Display for SegmentPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Before => write!(f, "before"),
            Self::Between => write!(f, "between"),
            Self::After => write!(f, "after"),
        }
    }
}

/// Classifies a projection parameter, as returned by [project_onto_line].
pub fn classify(t: f64) -> SegmentPosition {
    if t < 0.0 {
        SegmentPosition::Before
    } else if t > 1.0 {
        SegmentPosition::After
    } else {
        SegmentPosition::Between
    }
}

/// Result of projecting a point onto the line through a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// The closest point to the query point on the infinite line `a`-`b`.
    pub point: Point,

    /// Position of [Projection::point] along the segment, with `0` at `a`
    /// and `1` at `b`.
    pub t: f64,
}

impl Projection {
    #[inline]
    pub fn position(&self) -> SegmentPosition {
        classify(self.t)
    }
}

/// Projects `p` onto the infinite line through `a` and `b`.
///
/// Zero-length segments have no direction, and produce a projection
/// onto `a` with `t = -1` ([SegmentPosition::Before]), so that they
/// never win a nearest-segment search.
pub fn project_onto_line(p: Point, a: Point, b: Point) -> Projection {
    let ab = b - a;
    let len_sq = ab.dot(ab);
    if len_sq == 0.0 {
        return Projection { point: a, t: -1.0 };
    }

    let t = (p - a).dot(ab) / len_sq;
    Projection {
        point: a + ab * t,
        t,
    }
}
