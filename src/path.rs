//! Path segments and the curve/spline path builders.
//!
//! A routed edge is an ordered list of [`PathSegment`]s. The same list feeds
//! SVG path generation for the paint surface, hit testing, and waypoint
//! insertion math.

use crate::geometry::{Point, Side, SideAnchor, Size};
use crate::style::EndingCap;
use std::fmt::Write;

/// One drawable piece of a routed edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    Line { from: Point, to: Point },
    Quadratic { from: Point, ctrl: Point, to: Point },
    Cubic { from: Point, ctrl1: Point, ctrl2: Point, to: Point },
}

impl PathSegment {
    pub fn start(&self) -> Point {
        match *self {
            PathSegment::Line { from, .. }
            | PathSegment::Quadratic { from, .. }
            | PathSegment::Cubic { from, .. } => from,
        }
    }

    pub fn end(&self) -> Point {
        match *self {
            PathSegment::Line { to, .. }
            | PathSegment::Quadratic { to, .. }
            | PathSegment::Cubic { to, .. } => to,
        }
    }

    /// Evaluate the segment at parameter t (0.0 to 1.0)
    pub fn eval(&self, t: f32) -> Point {
        match *self {
            PathSegment::Line { from, to } => from.lerp(to, t),
            PathSegment::Quadratic { from, ctrl, to } => {
                let mt = 1.0 - t;
                from * (mt * mt) + ctrl * (2.0 * mt * t) + to * (t * t)
            }
            PathSegment::Cubic { from, ctrl1, ctrl2, to } => CubicBezier {
                p0: from,
                p1: ctrl1,
                p2: ctrl2,
                p3: to,
            }
            .eval(t),
        }
    }

    /// Minimum distance from `point` to this segment.
    ///
    /// Lines are exact; curves are sampled `num_samples` times (default 20).
    pub fn distance_to(&self, point: Point, num_samples: usize) -> f32 {
        match *self {
            PathSegment::Line { from, to } => distance_to_line_segment_sq(point, from, to).sqrt(),
            _ => {
                let num_samples = if num_samples == 0 { 20 } else { num_samples };
                let mut min_dist_sq = f32::MAX;
                let mut prev_point = self.eval(0.0);
                for i in 1..=num_samples {
                    let t = i as f32 / num_samples as f32;
                    let curr_point = self.eval(t);
                    min_dist_sq = min_dist_sq.min(distance_to_line_segment_sq(point, prev_point, curr_point));
                    prev_point = curr_point;
                }
                min_dist_sq.sqrt()
            }
        }
    }

    fn write_svg(&self, out: &mut String) {
        // Writing into a String cannot fail.
        let _ = match *self {
            PathSegment::Line { to, .. } => write!(out, " L {} {}", to.x, to.y),
            PathSegment::Quadratic { ctrl, to, .. } => {
                write!(out, " Q {} {} {} {}", ctrl.x, ctrl.y, to.x, to.y)
            }
            PathSegment::Cubic { ctrl1, ctrl2, to, .. } => write!(
                out,
                " C {} {} {} {} {} {}",
                ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y
            ),
        };
    }
}

/// Decoration drawn at the destination end of an edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CapShape {
    Circle { center: Point, radius: f32 },
    /// Tip first, then the two base corners.
    Triangle { tip: Point, base_left: Point, base_right: Point },
}

impl CapShape {
    /// Closed SVG outline of the cap, drawn as two arcs for the circle.
    pub fn to_svg_commands(&self) -> String {
        match *self {
            CapShape::Circle { center, radius } => format!(
                "M {} {} A {r} {r} 0 1 0 {} {} A {r} {r} 0 1 0 {} {} Z",
                center.x - radius,
                center.y,
                center.x + radius,
                center.y,
                center.x - radius,
                center.y,
                r = radius
            ),
            CapShape::Triangle { tip, base_left, base_right } => format!(
                "M {} {} L {} {} L {} {} Z",
                tip.x, tip.y, base_left.x, base_left.y, base_right.x, base_right.y
            ),
        }
    }
}

/// Result of routing one edge.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedPath {
    pub segments: Vec<PathSegment>,
    /// Dot drawn at the start anchor.
    pub head: Option<(Point, f32)>,
    pub cap: Option<CapShape>,
}

impl RoutedPath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments, head: None, cap: None }
    }

    /// Straight lines through consecutive points.
    pub fn polyline(points: &[Point]) -> Self {
        Self::new(
            points
                .windows(2)
                .map(|w| PathSegment::Line { from: w[0], to: w[1] })
                .collect(),
        )
    }

    pub fn start(&self) -> Option<Point> {
        self.segments.first().map(PathSegment::start)
    }

    pub fn end(&self) -> Option<Point> {
        self.segments.last().map(PathSegment::end)
    }

    /// The corner points of the path (segment endpoints, no control points).
    pub fn points(&self) -> Vec<Point> {
        let mut points: Vec<Point> = self.segments.first().map(|s| vec![s.start()]).unwrap_or_default();
        points.extend(self.segments.iter().map(PathSegment::end));
        points
    }

    /// SVG path command string, e.g. `"M 10 20 L 10 45 L 80 45"`.
    pub fn to_svg_commands(&self) -> String {
        let Some(first) = self.segments.first() else {
            return String::new();
        };
        let start = first.start();
        let mut out = format!("M {} {}", start.x, start.y);
        for segment in &self.segments {
            segment.write_svg(&mut out);
        }
        out
    }

    /// Minimum distance from `point` to any segment of the path.
    pub fn distance_to(&self, point: Point, num_samples: usize) -> f32 {
        self.segments
            .iter()
            .map(|s| s.distance_to(point, num_samples))
            .fold(f32::MAX, f32::min)
    }
}

/// Cubic bezier curve for evaluation and distance calculations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Point, // Start point
    pub p1: Point, // Control point 1
    pub p2: Point, // Control point 2
    pub p3: Point, // End point
}

impl CubicBezier {
    /// Evaluate the bezier curve at parameter t (0.0 to 1.0)
    pub fn eval(&self, t: f32) -> Point {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        self.p0 * mt3 + self.p1 * (3.0 * mt2 * t) + self.p2 * (3.0 * mt * t2) + self.p3 * t3
    }
}

/// Calculate squared distance from a point to a line segment
pub(crate) fn distance_to_line_segment_sq(point: Point, a: Point, b: Point) -> f32 {
    let ab = b - a;
    let ap = point - a;

    let ab_len_sq = ab.x * ab.x + ab.y * ab.y;

    if ab_len_sq < f32::EPSILON {
        // Degenerate segment (a == b)
        return ap.x * ap.x + ap.y * ap.y;
    }

    // Project point onto line, clamped to segment
    let t = ((ap.x * ab.x + ap.y * ab.y) / ab_len_sq).clamp(0.0, 1.0);

    let closest = a + ab * t;
    let d = point - closest;
    d.x * d.x + d.y * d.y
}

// ============================================================================
// Ending cap geometry
// ============================================================================

/// Direction the edge enters its destination through, pointing away from the
/// node. For a center anchor (edge still being dragged) the dominant axis of
/// the start→end displacement is used instead.
pub fn entry_normal(start: Point, end: Point, end_anchor: SideAnchor) -> Point {
    if !end_anchor.is_center() {
        return end_anchor.direction();
    }
    let d = end - start;
    if d.x.abs() > d.y.abs() {
        Point::new(-d.x.signum(), 0.0)
    } else if d.y != 0.0 {
        Point::new(0.0, -d.y.signum())
    } else {
        Point::ZERO
    }
}

/// Offset to add to the geometric end point so the line stops at the base
/// of the ending cap instead of its tip.
///
/// A circle shifts by its radius on every axis of the anchor direction; a
/// triangle shifts by its height along the entry axis only.
pub fn end_offset(start: Point, end: Point, end_anchor: SideAnchor, cap: EndingCap, size: Size) -> Point {
    let normal = entry_normal(start, end, end_anchor);
    match cap {
        EndingCap::Circle => normal * (size.width / 2.0),
        EndingCap::Triangle => {
            let side = if end_anchor.is_center() {
                Side::from_anchor(SideAnchor::new(normal.x, normal.y))
            } else {
                end_anchor.side()
            };
            side.normal() * size.height
        }
    }
}

/// Geometry of the ending cap whose tip touches `end`.
pub fn cap_shape(start: Point, end: Point, end_anchor: SideAnchor, cap: EndingCap, size: Size) -> CapShape {
    let offset = end_offset(start, end, end_anchor, cap, size);
    match cap {
        EndingCap::Circle => CapShape::Circle {
            center: end + offset,
            radius: size.width / 2.0,
        },
        EndingCap::Triangle => {
            let base = end + offset;
            let len = offset.length();
            let across = if len > 0.0 {
                Point::new(-offset.y / len, offset.x / len) * (size.width / 2.0)
            } else {
                Point::ZERO
            };
            CapShape::Triangle {
                tip: end,
                base_left: base - across,
                base_right: base + across,
            }
        }
    }
}

// ============================================================================
// Curve and spline builders
// ============================================================================

/// Two quadratic pieces from `start` to `end`.
///
/// Control points sit one third of the chord away from each endpoint along
/// the endpoint's anchor direction, so the path leaves and enters
/// perpendicular to the chosen sides. The pieces meet halfway between the
/// control points.
pub fn curve_segments(start: Point, start_anchor: SideAnchor, end: Point, end_anchor: SideAnchor) -> Vec<PathSegment> {
    let distance = start.distance(end) / 3.0;
    let ctrl1 = start + start_anchor.direction() * distance;
    let ctrl2 = end + end_anchor.direction() * distance;
    let mid = ctrl1.midpoint(ctrl2);
    vec![
        PathSegment::Quadratic { from: start, ctrl: ctrl1, to: mid },
        PathSegment::Quadratic { from: mid, ctrl: ctrl2, to: end },
    ]
}

/// Catmull-Rom style cubic spline through `points`.
///
/// Neighbours beyond the first and last point are clamped to the endpoints.
/// A tension of zero yields straight lines.
pub fn spline_segments(points: &[Point], tension: f32) -> Vec<PathSegment> {
    if points.len() < 2 {
        return Vec::new();
    }
    let tension = tension.max(0.0);
    if tension == 0.0 {
        return RoutedPath::polyline(points).segments;
    }

    let last = points.len() - 1;
    let k = tension / 6.0;
    (0..last)
        .map(|i| {
            let p0 = points[i.saturating_sub(1)];
            let p1 = points[i];
            let p2 = points[i + 1];
            let p3 = points[(i + 2).min(last)];
            PathSegment::Cubic {
                from: p1,
                ctrl1: p1 + (p2 - p0) * k,
                ctrl2: p2 - (p3 - p1) * k,
                to: p2,
            }
        })
        .collect()
}
