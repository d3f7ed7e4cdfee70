//! Geometry primitives shared by the scene graph and the routers.
//!
//! Everything is `f32`, in graph space (the coordinate system the dashboard
//! stores node positions in).

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// Tolerance used when comparing coordinates produced by routing math.
pub const EPSILON: f32 = 1e-3;

/// A point (or a displacement) in graph space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean length when the point is used as a vector.
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Point) -> f32 {
        (other - self).length()
    }

    /// Linear interpolation between two points
    pub fn lerp(self, other: Point, t: f32) -> Point {
        Point::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }

    pub fn midpoint(self, other: Point) -> Point {
        self.lerp(other, 0.5)
    }

    pub fn approx_eq(self, other: Point) -> bool {
        (self.x - other.x).abs() <= EPSILON && (self.y - other.y).abs() <= EPSILON
    }

    /// Rescale an absolute position around `focal`.
    ///
    /// `p' = (p - focal) / old_factor * new_factor + focal`
    pub fn rescale_around(self, focal: Point, old_factor: f32, new_factor: f32) -> Point {
        (self - focal) * (new_factor / old_factor) + focal
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point {
    type Output = Point;
    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Point::new(x, y)
    }
}

/// Width and height of a node or decoration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn scaled(self, ratio: f32) -> Size {
        Size::new(self.width * ratio, self.height * ratio)
    }
}

/// Axis-aligned rectangle (x, y is the top-left corner).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Smallest rectangle containing both points.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let left = a.x.min(b.x);
        let top = a.y.min(b.y);
        Self::new(left, top, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    /// Zero-sized rectangle at a point.
    pub fn point(p: Point) -> Self {
        Self::new(p.x, p.y, 0.0, 0.0)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Point on (or inside) the rectangle addressed by a side anchor.
    pub fn anchor_point(&self, anchor: SideAnchor) -> Point {
        Point::new(
            self.x + self.width * (anchor.x + 1.0) / 2.0,
            self.y + self.height * (anchor.y + 1.0) / 2.0,
        )
    }

    /// Whether the open horizontal span `[x0, x1]` overlaps this rect's
    /// footprint grown by `margin`.
    pub fn spans_x(&self, x0: f32, x1: f32, margin: f32) -> bool {
        let (lo, hi) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        lo < self.right() + margin && hi > self.left() - margin
    }

    /// Vertical counterpart of [`Rect::spans_x`].
    pub fn spans_y(&self, y0: f32, y1: f32, margin: f32) -> bool {
        let (lo, hi) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        lo < self.bottom() + margin && hi > self.top() - margin
    }

    /// Whether the axis-aligned segment `from`-`to` passes through the inside
    /// of the rectangle. Touching or running along an edge does not count.
    pub fn crosses_interior(&self, from: Point, to: Point) -> bool {
        const EDGE: f32 = 0.5;
        if self.width <= 2.0 * EDGE || self.height <= 2.0 * EDGE {
            return false;
        }
        let (x0, x1) = (from.x.min(to.x), from.x.max(to.x));
        let (y0, y1) = (from.y.min(to.y), from.y.max(to.y));
        x0 < self.right() - EDGE && x1 > self.left() + EDGE && y0 < self.bottom() - EDGE && y1 > self.top() + EDGE
    }
}

/// Normalized direction identifying a side or corner of a rectangle.
///
/// `(-1, 0)` is center-left, `(0, -1)` top-center, `(1, 1)` bottom-right and
/// `(0, 0)` the center. Edges connect to nodes through these anchors.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SideAnchor {
    pub x: f32,
    pub y: f32,
}

impl SideAnchor {
    pub const TOP_LEFT: SideAnchor = SideAnchor { x: -1.0, y: -1.0 };
    pub const TOP_CENTER: SideAnchor = SideAnchor { x: 0.0, y: -1.0 };
    pub const TOP_RIGHT: SideAnchor = SideAnchor { x: 1.0, y: -1.0 };
    pub const CENTER_LEFT: SideAnchor = SideAnchor { x: -1.0, y: 0.0 };
    pub const CENTER: SideAnchor = SideAnchor { x: 0.0, y: 0.0 };
    pub const CENTER_RIGHT: SideAnchor = SideAnchor { x: 1.0, y: 0.0 };
    pub const BOTTOM_LEFT: SideAnchor = SideAnchor { x: -1.0, y: 1.0 };
    pub const BOTTOM_CENTER: SideAnchor = SideAnchor { x: 0.0, y: 1.0 };
    pub const BOTTOM_RIGHT: SideAnchor = SideAnchor { x: 1.0, y: 1.0 };

    /// The four side midpoints, the default handle set of a node.
    pub const SIDES: [SideAnchor; 4] = [
        SideAnchor::TOP_CENTER,
        SideAnchor::BOTTOM_CENTER,
        SideAnchor::CENTER_RIGHT,
        SideAnchor::CENTER_LEFT,
    ];

    /// Create an anchor, clamping both components to `[-1, 1]`.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: x.clamp(-1.0, 1.0),
            y: y.clamp(-1.0, 1.0),
        }
    }

    pub fn is_center(&self) -> bool {
        self.x.abs() < EPSILON && self.y.abs() < EPSILON
    }

    pub fn direction(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn side(&self) -> Side {
        Side::from_anchor(*self)
    }
}

impl From<(f32, f32)> for SideAnchor {
    fn from((x, y): (f32, f32)) -> Self {
        SideAnchor::new(x, y)
    }
}

impl Serialize for SideAnchor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.x, self.y].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SideAnchor {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let [x, y] = <[f32; 2]>::deserialize(deserializer)?;
        Ok(SideAnchor::new(x, y))
    }
}

/// The side of a rectangle an anchor leaves from or enters through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
    /// No side yet: the anchor is the center (an edge still being dragged).
    Center,
}

impl Side {
    /// Classify an anchor by its dominant axis. Exact corners count as
    /// vertical sides.
    pub fn from_anchor(anchor: SideAnchor) -> Side {
        if anchor.is_center() {
            return Side::Center;
        }
        if anchor.y.abs() >= anchor.x.abs() {
            if anchor.y < 0.0 {
                Side::Top
            } else {
                Side::Bottom
            }
        } else if anchor.x < 0.0 {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Outward unit normal of the side.
    pub fn normal(self) -> Point {
        match self {
            Side::Top => Point::new(0.0, -1.0),
            Side::Bottom => Point::new(0.0, 1.0),
            Side::Left => Point::new(-1.0, 0.0),
            Side::Right => Point::new(1.0, 0.0),
            Side::Center => Point::ZERO,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }
}
