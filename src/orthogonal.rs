//! Orthogonal (rectangular) edge routing.
//!
//! Produces 1 to 6 axis-aligned segments between an exit anchor on the
//! source rectangle and an entry anchor on the destination rectangle: a
//! single segment when the anchors line up, at most five for the preset
//! shapes and at most six when the fallback search has to step around both
//! boxes. Only the two boxes of the edge are avoided; a third box in between
//! is not taken into account.
//!
//! Dispatch goes through [`STRATEGIES`], indexed by (exit side, entry side).
//! Every strategy runs in a canonical frame in which the path leaves the
//! source downwards; [`Frame`] rotates (and for crossing entries mirrors)
//! the problem into that frame and maps the answer back. A strategy proposes
//! its preferred shapes in order and the first one that keeps out of both
//! boxes wins. When none does, a search over a small grid of lanes around
//! the boxes finds the path with the fewest turns.

use crate::geometry::{Point, Rect, Side, EPSILON};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Most segments a routed path may have.
pub const MAX_SEGMENTS: usize = 6;

/// Everything the orthogonal router looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthogonalInput {
    pub start: Point,
    pub exit: Side,
    /// Where the line stops: the entry anchor, pulled back by the ending cap
    /// when there is one.
    pub end: Point,
    pub entry: Side,
    pub source: Rect,
    pub dest: Rect,
    /// Length of the stub leaving the source (and, when detouring, the
    /// approach distance in front of the destination).
    pub tail_length: f32,
    /// Distance kept from a box when stepping around it.
    pub clearance: f32,
}

/// Shape family used for one (exit, entry) pair, expressed in the canonical
/// frame where the exit normal points down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Entry faces the exit (canonical entry is the destination's top).
    Facing,
    /// Entry points the same way as the exit (destination's bottom).
    Parallel,
    /// Entry is perpendicular. Canonically the destination's left side;
    /// `mirrored` flips a right-side entry onto the left.
    Crossing { mirrored: bool },
}

impl Strategy {
    /// Direction of the last segment in the canonical frame.
    fn arrival(self) -> Point {
        match self {
            Strategy::Facing => DOWN,
            Strategy::Parallel => UP,
            Strategy::Crossing { .. } => RIGHT,
        }
    }
}

const fn side_index(side: Side) -> Option<usize> {
    match side {
        Side::Top => Some(0),
        Side::Bottom => Some(1),
        Side::Left => Some(2),
        Side::Right => Some(3),
        Side::Center => None,
    }
}

/// Rows are exit sides, columns entry sides, both ordered Top, Bottom,
/// Left, Right.
pub const STRATEGIES: [[Strategy; 4]; 4] = [
    // exit Top
    [
        Strategy::Parallel,
        Strategy::Facing,
        Strategy::Crossing { mirrored: true },
        Strategy::Crossing { mirrored: false },
    ],
    // exit Bottom
    [
        Strategy::Facing,
        Strategy::Parallel,
        Strategy::Crossing { mirrored: false },
        Strategy::Crossing { mirrored: true },
    ],
    // exit Left
    [
        Strategy::Crossing { mirrored: false },
        Strategy::Crossing { mirrored: true },
        Strategy::Parallel,
        Strategy::Facing,
    ],
    // exit Right
    [
        Strategy::Crossing { mirrored: true },
        Strategy::Crossing { mirrored: false },
        Strategy::Facing,
        Strategy::Parallel,
    ],
];

/// Strategy for a pair of sides, `None` when either side is undecided.
pub fn strategy_for(exit: Side, entry: Side) -> Option<Strategy> {
    Some(STRATEGIES[side_index(exit)?][side_index(entry)?])
}

const DOWN: Point = Point::new(0.0, 1.0);
const UP: Point = Point::new(0.0, -1.0);
const RIGHT: Point = Point::new(1.0, 0.0);
const LEFT: Point = Point::new(-1.0, 0.0);

/// Grid search moves, indexed the same way as its states.
const DIRECTIONS: [Point; 4] = [DOWN, UP, RIGHT, LEFT];

/// Rotation (plus optional mirror) taking the exit normal to `(0, 1)`.
#[derive(Debug, Clone, Copy)]
struct Frame {
    exit: Side,
    mirrored: bool,
}

impl Frame {
    fn to_canonical(self, p: Point) -> Point {
        let r = match self.exit {
            Side::Top => Point::new(-p.x, -p.y),
            Side::Right => Point::new(-p.y, p.x),
            Side::Left => Point::new(p.y, -p.x),
            Side::Bottom | Side::Center => p,
        };
        if self.mirrored {
            Point::new(-r.x, r.y)
        } else {
            r
        }
    }

    fn from_canonical(self, p: Point) -> Point {
        let q = if self.mirrored { Point::new(-p.x, p.y) } else { p };
        match self.exit {
            Side::Top => Point::new(-q.x, -q.y),
            Side::Right => Point::new(q.y, -q.x),
            Side::Left => Point::new(-q.y, q.x),
            Side::Bottom | Side::Center => q,
        }
    }

    fn rect(self, r: Rect) -> Rect {
        let a = self.to_canonical(r.origin());
        let b = self.to_canonical(Point::new(r.right(), r.bottom()));
        Rect::from_corners(a, b)
    }
}

/// The routing problem in the canonical frame.
#[derive(Debug, Clone, Copy)]
struct Canonical {
    s: Point,
    e: Point,
    a: Rect,
    b: Rect,
    tail: f32,
    clearance: f32,
}

impl Canonical {
    /// End of the stub leaving the source.
    fn s1(&self) -> Point {
        Point::new(self.s.x, self.s.y + self.tail)
    }

    fn blocked(&self, from: Point, to: Point) -> bool {
        self.a.crosses_interior(from, to) || self.b.crosses_interior(from, to)
    }

    /// Whether `path` leaves downwards, arrives moving along `arrival`,
    /// never doubles back and keeps out of both boxes.
    fn accepts(&self, path: &[Point], arrival: Point) -> bool {
        if path.len() < 2 || path.len() > MAX_SEGMENTS + 1 {
            return false;
        }
        let Some(directions) = path
            .windows(2)
            .map(|w| axis_direction(w[0], w[1]))
            .collect::<Option<Vec<_>>>()
        else {
            return false;
        };
        if directions.first() != Some(&DOWN) || directions.last() != Some(&arrival) {
            return false;
        }
        if directions.windows(2).any(|d| d[0] + d[1] == Point::ZERO) {
            return false;
        }
        path.windows(2).all(|w| !self.blocked(w[0], w[1]))
    }

    /// Vertical lanes the fallback search may use.
    fn lanes_x(&self) -> Vec<f32> {
        let Canonical { s, e, a, b, tail, clearance } = *self;
        grid_lines(
            &[
                e.x - tail,
                e.x + tail,
                a.left() - clearance,
                a.right() + clearance,
                b.left() - clearance,
                b.right() + clearance,
            ],
            &[a.left(), a.right(), b.left(), b.right()],
            &[s.x, e.x],
        )
    }

    /// Horizontal lanes the fallback search may use.
    fn lanes_y(&self) -> Vec<f32> {
        let Canonical { s, e, a, b, tail, clearance } = *self;
        grid_lines(
            &[
                s.y + tail,
                e.y - tail,
                e.y + tail,
                a.top() - clearance,
                a.bottom() + clearance,
                b.top() - clearance,
                b.bottom() + clearance,
            ],
            &[a.top(), a.bottom(), b.top(), b.bottom()],
            &[s.y, e.y],
        )
    }
}

/// Unit direction of an axis-aligned, non-empty segment.
fn axis_direction(from: Point, to: Point) -> Option<Point> {
    let d = to - from;
    if d.x.abs() <= EPSILON && d.y.abs() > EPSILON {
        Some(Point::new(0.0, d.y.signum()))
    } else if d.y.abs() <= EPSILON && d.x.abs() > EPSILON {
        Some(Point::new(d.x.signum(), 0.0))
    } else {
        None
    }
}

fn sort_dedup(values: &mut Vec<f32>) {
    values.retain(|v| v.is_finite());
    values.sort_by(f32::total_cmp);
    values.dedup_by(|a, b| (*a - *b).abs() <= EPSILON);
}

/// Sorted search lines: the given lanes, the anchors, and one line halfway
/// between every pair of neighbouring coordinates so that narrow gaps
/// between boxes are reachable. Box edges themselves are left out.
fn grid_lines(lanes: &[f32], edges: &[f32], anchors: &[f32]) -> Vec<f32> {
    let mut all: Vec<f32> = lanes.iter().chain(edges).chain(anchors).copied().collect();
    sort_dedup(&mut all);
    let halfway: Vec<f32> = all.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect();

    let near = |set: &[f32], v: f32| set.iter().any(|&x| (x - v).abs() <= EPSILON);
    let mut lines: Vec<f32> = all
        .into_iter()
        .chain(halfway)
        .filter(|&v| near(anchors, v) || !near(edges, v))
        .collect();
    sort_dedup(&mut lines);
    lines
}

/// Route an orthogonal path and return its corner points, start and end
/// included. Consecutive duplicates and collinear corners are collapsed.
pub fn route_orthogonal(input: &OrthogonalInput) -> Vec<Point> {
    let Some(strategy) = strategy_for(input.exit, input.entry) else {
        return simplify(dominant_axis_path(input.start, input.end));
    };

    let mirrored = matches!(strategy, Strategy::Crossing { mirrored: true });
    let frame = Frame { exit: input.exit, mirrored };
    let c = Canonical {
        s: frame.to_canonical(input.start),
        e: frame.to_canonical(input.end),
        a: frame.rect(input.source),
        b: frame.rect(input.dest),
        tail: input.tail_length.max(0.0),
        clearance: input.clearance.max(0.0),
    };

    let candidates = match strategy {
        Strategy::Facing => facing(&c),
        Strategy::Parallel => parallel(&c),
        Strategy::Crossing { .. } => crossing(&c),
    };
    let arrival = strategy.arrival();
    let canonical = candidates
        .iter()
        .map(|path| simplify(path.clone()))
        .find(|path| c.accepts(path, arrival))
        .or_else(|| search(&c, arrival))
        .or_else(|| {
            log::debug!("no clear orthogonal route from {:?} to {:?}", input.start, input.end);
            candidates.first().map(|path| simplify(path.clone()))
        })
        .unwrap_or_else(|| vec![c.s, c.e]);

    let mut points: Vec<Point> = canonical.into_iter().map(|p| frame.from_canonical(p)).collect();
    // The inverse transform can drift by an ulp; pin the endpoints exactly.
    if let Some(first) = points.first_mut() {
        *first = input.start;
    }
    if let Some(last) = points.last_mut() {
        *last = input.end;
    }
    simplify(points)
}

/// Two-segment fallback for an anchor without a side: turn once, moving
/// along the dominant axis of the displacement first.
fn dominant_axis_path(start: Point, end: Point) -> Vec<Point> {
    let d = end - start;
    let corner = if d.y.abs() >= d.x.abs() {
        Point::new(start.x, end.y)
    } else {
        Point::new(end.x, start.y)
    };
    vec![start, corner, end]
}

/// `[first, second]` when `first_wins`, else swapped.
fn ordered(first_wins: bool, first: f32, second: f32) -> [f32; 2] {
    if first_wins {
        [first, second]
    } else {
        [second, first]
    }
}

/// Entry on the destination's top: the last segment moves down.
fn facing(c: &Canonical) -> Vec<Vec<Point>> {
    let Canonical { s, e, a, b, tail, clearance } = *c;
    let s1 = c.s1();
    let mut candidates = Vec::new();

    if e.y > s.y {
        // One horizontal jog at the stub end, or halfway down when the
        // destination is closer than a full stub.
        let jog = if e.y >= s1.y { s1.y } else { (s.y + e.y) / 2.0 };
        candidates.push(vec![s, Point::new(s.x, jog), Point::new(e.x, jog), e]);
    }

    // Climb on a vertical lane and drop onto the entry from above.
    let e1 = Point::new(e.x, e.y - tail);
    let mut lanes = Vec::with_capacity(4);
    if b.left() - a.right() >= 2.0 * clearance {
        lanes.push((a.right() + b.left()) / 2.0);
    }
    if a.left() - b.right() >= 2.0 * clearance {
        lanes.push((b.right() + a.left()) / 2.0);
    }
    lanes.extend(ordered(
        e.x >= s.x,
        a.right().max(b.right()) + clearance,
        a.left().min(b.left()) - clearance,
    ));
    candidates.extend(lanes.into_iter().map(|lane| {
        vec![
            s,
            s1,
            Point::new(lane, s1.y),
            Point::new(lane, e1.y),
            e1,
            e,
        ]
    }));
    candidates
}

/// Entry on the destination's bottom: the last segment moves up.
fn parallel(c: &Canonical) -> Vec<Vec<Point>> {
    let Canonical { s, e, a, b, tail, clearance } = *c;
    let s1 = c.s1();
    let e1 = Point::new(e.x, e.y + tail);

    let low = s1.y.max(e1.y);
    let mut candidates = vec![vec![s, Point::new(s.x, low), Point::new(e.x, low), e]];

    // Going straight down from the exit would run into the destination.
    if b.top() > s.y {
        let jog = s1.y.min((s.y + b.top()) / 2.0);
        for lane in ordered(s.x <= b.center().x, b.left() - clearance, b.right() + clearance) {
            candidates.push(vec![
                s,
                Point::new(s.x, jog),
                Point::new(lane, jog),
                Point::new(lane, e1.y),
                e1,
                e,
            ]);
        }
    }

    // Coming straight up into the entry would run through the source.
    if a.top() > e.y {
        let jog = e1.y.min((e.y + a.top()) / 2.0);
        for lane in ordered(e.x <= a.center().x, a.left() - clearance, a.right() + clearance) {
            candidates.push(vec![
                s,
                s1,
                Point::new(lane, s1.y),
                Point::new(lane, jog),
                Point::new(e.x, jog),
                e,
            ]);
        }
    }
    candidates
}

/// Entry on the destination's left side: the last segment moves right.
fn crossing(c: &Canonical) -> Vec<Vec<Point>> {
    let Canonical { s, e, a, b, tail, clearance } = *c;
    let s1 = c.s1();
    let e1 = Point::new(e.x - tail, e.y);

    let mut candidates = vec![
        // Direct L.
        vec![s, Point::new(s.x, e.y), e],
        // Across at the stub end, then onto the entry row left of it.
        vec![s, s1, Point::new(e1.x, s1.y), Point::new(e1.x, e.y), e],
    ];

    // Destination reaches up past the stub: pass underneath it.
    let low = b.bottom() + clearance;
    if low > s.y {
        candidates.push(vec![
            s,
            Point::new(s.x, low),
            Point::new(e1.x, low),
            Point::new(e1.x, e.y),
            e,
        ]);
    }

    // Entry above the stub end: climb on a lane left of the entry, outside
    // the source footprint unless there is room between the boxes.
    let lane = if e1.x >= a.right() + clearance {
        e1.x
    } else {
        e1.x.min(a.left() - clearance)
    };
    let jog = if b.spans_x(lane, s.x, 0.0) && b.bottom() + clearance > s1.y {
        b.bottom() + clearance
    } else {
        s1.y
    };
    candidates.push(vec![
        s,
        Point::new(s.x, jog),
        Point::new(lane, jog),
        Point::new(lane, e.y),
        e,
    ]);

    // Around the outside of both boxes, above or below.
    let top = a.top().min(b.top()) - clearance;
    let bottom = a.bottom().max(b.bottom()) + clearance;
    for row in [bottom, top] {
        for lane in ordered(
            e1.x >= s.x,
            a.right().max(b.right()) + clearance,
            a.left().min(b.left()) - clearance,
        ) {
            candidates.push(vec![
                s,
                s1,
                Point::new(lane, s1.y),
                Point::new(lane, row),
                Point::new(e1.x, row),
                Point::new(e1.x, e.y),
                e,
            ]);
        }
    }
    candidates
}

/// Cheapest clear path over a grid of lanes: fewest turns first, then
/// shortest. Leaves `s` moving down and reaches `e` moving along
/// `arrival`. `None` when the boxes leave no way through.
fn search(c: &Canonical, arrival: Point) -> Option<Vec<Point>> {
    let xs = c.lanes_x();
    let ys = c.lanes_y();
    let find = |lines: &[f32], v: f32| lines.iter().position(|&x| (x - v).abs() <= EPSILON);
    let start = (find(&xs, c.s.x)?, find(&ys, c.s.y)?);
    let goal = (find(&xs, c.e.x)?, find(&ys, c.e.y)?);
    let arrival = DIRECTIONS.iter().position(|&d| d == arrival)?;

    let nx = xs.len();
    let ny = ys.len();
    // state = (cell, direction of the move that reached it)
    let state = |ix: usize, iy: usize, dir: usize| (iy * nx + ix) * DIRECTIONS.len() + dir;
    let count = nx * ny * DIRECTIONS.len();
    let mut best = vec![(u32::MAX, f32::INFINITY); count];
    let mut prev: Vec<Option<usize>> = vec![None; count];
    let mut queue = BinaryHeap::new();

    let first = state(start.0, start.1, 0);
    best[first] = (0, 0.0);
    queue.push(Reverse((0u32, 0.0f32.to_bits(), first)));

    while let Some(Reverse((turns, length_bits, current))) = queue.pop() {
        let length = f32::from_bits(length_bits);
        if best[current] != (turns, length) {
            continue;
        }
        let dir = current % DIRECTIONS.len();
        let cell = current / DIRECTIONS.len();
        let (ix, iy) = (cell % nx, cell / nx);
        if (ix, iy) == goal && dir == arrival {
            return rebuild(&prev, current, |s| {
                let cell = s / DIRECTIONS.len();
                Point::new(xs[cell % nx], ys[cell / nx])
            });
        }

        for (next_dir, &d) in DIRECTIONS.iter().enumerate() {
            if d + DIRECTIONS[dir] == Point::ZERO {
                continue;
            }
            let turn = u32::from(next_dir != dir);
            // the first segment leaves along the exit normal
            if turn > 0 && current == first {
                continue;
            }
            let (jx, jy) = match next_dir {
                0 if iy + 1 < ny => (ix, iy + 1),
                1 if iy > 0 => (ix, iy - 1),
                2 if ix + 1 < nx => (ix + 1, iy),
                3 if ix > 0 => (ix - 1, iy),
                _ => continue,
            };
            let from = Point::new(xs[ix], ys[iy]);
            let to = Point::new(xs[jx], ys[jy]);
            if c.blocked(from, to) {
                continue;
            }
            let next = state(jx, jy, next_dir);
            let cost = (turns + turn, length + from.distance(to));
            if cost.0 < best[next].0 || (cost.0 == best[next].0 && cost.1 < best[next].1) {
                best[next] = cost;
                prev[next] = Some(current);
                queue.push(Reverse((cost.0, cost.1.to_bits(), next)));
            }
        }
    }
    None
}

/// Walk `prev` back from `last` and return the simplified corner points,
/// or `None` when the path needs too many segments.
fn rebuild(prev: &[Option<usize>], last: usize, point: impl Fn(usize) -> Point) -> Option<Vec<Point>> {
    let mut states = vec![last];
    let mut current = last;
    while let Some(p) = prev[current] {
        states.push(p);
        current = p;
    }
    let path = simplify(states.into_iter().rev().map(point).collect());
    (path.len() <= MAX_SEGMENTS + 1).then_some(path)
}

fn collinear(a: Point, b: Point, c: Point) -> bool {
    let vertical = (a.x - b.x).abs() <= EPSILON && (b.x - c.x).abs() <= EPSILON;
    let horizontal = (a.y - b.y).abs() <= EPSILON && (b.y - c.y).abs() <= EPSILON;
    vertical || horizontal
}

/// Drop repeated points and corners that do not turn.
pub fn simplify(points: Vec<Point>) -> Vec<Point> {
    let last = points.len().saturating_sub(1);
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for (i, p) in points.into_iter().enumerate() {
        if let Some(prev) = out.last_mut() {
            if prev.approx_eq(p) {
                // keep the exact endpoint when the duplicate is the last point
                if i == last {
                    *prev = p;
                }
                continue;
            }
        }
        if out.len() >= 2 && collinear(out[out.len() - 2], out[out.len() - 1], p) {
            out.pop();
        }
        out.push(p);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TAIL: f32 = 25.0;
    const CLEARANCE: f32 = 10.0;

    fn input(source: Rect, exit: Side, dest: Rect, entry: Side) -> OrthogonalInput {
        let anchor = |r: Rect, side: Side| match side {
            Side::Top => Point::new(r.center().x, r.top()),
            Side::Bottom => Point::new(r.center().x, r.bottom()),
            Side::Left => Point::new(r.left(), r.center().y),
            Side::Right => Point::new(r.right(), r.center().y),
            Side::Center => r.center(),
        };
        OrthogonalInput {
            start: anchor(source, exit),
            exit,
            end: anchor(dest, entry),
            entry,
            source,
            dest,
            tail_length: TAIL,
            clearance: CLEARANCE,
        }
    }

    fn assert_axis_aligned(points: &[Point]) {
        for w in points.windows(2) {
            let dx = (w[0].x - w[1].x).abs();
            let dy = (w[0].y - w[1].y).abs();
            assert!(dx <= EPSILON || dy <= EPSILON, "diagonal segment {:?} -> {:?}", w[0], w[1]);
        }
    }

    fn assert_clear_of(points: &[Point], boxes: &[Rect]) {
        for w in points.windows(2) {
            for rect in boxes {
                assert!(!rect.crosses_interior(w[0], w[1]), "{:?} -> {:?} runs through {:?}", w[0], w[1], rect);
            }
        }
    }

    // ========================================================================
    // Dispatch table
    // ========================================================================

    #[test]
    fn test_table_matches_canonical_frame() {
        let sides = [Side::Top, Side::Bottom, Side::Left, Side::Right];
        for exit in sides {
            for entry in sides {
                let strategy = strategy_for(exit, entry).unwrap();
                let mirrored = matches!(strategy, Strategy::Crossing { mirrored: true });
                let frame = Frame { exit, mirrored };
                assert!(frame.to_canonical(exit.normal()).approx_eq(Point::new(0.0, 1.0)));
                let expected = match strategy {
                    Strategy::Facing => Point::new(0.0, -1.0),
                    Strategy::Parallel => Point::new(0.0, 1.0),
                    Strategy::Crossing { .. } => Point::new(-1.0, 0.0),
                };
                assert!(
                    frame.to_canonical(entry.normal()).approx_eq(expected),
                    "bad table entry for {:?} -> {:?}",
                    exit,
                    entry
                );
            }
        }
    }

    #[test]
    fn test_frame_roundtrip() {
        let p = Point::new(12.0, -7.5);
        for exit in [Side::Top, Side::Bottom, Side::Left, Side::Right] {
            for mirrored in [false, true] {
                let frame = Frame { exit, mirrored };
                assert!(frame.from_canonical(frame.to_canonical(p)).approx_eq(p));
            }
        }
    }

    #[test]
    fn test_center_sides_have_no_strategy() {
        assert_eq!(strategy_for(Side::Center, Side::Top), None);
        assert_eq!(strategy_for(Side::Left, Side::Center), None);
    }

    // ========================================================================
    // Facing
    // ========================================================================

    #[test]
    fn test_facing_aligned_is_straight() {
        let a = Rect::new(0.0, 0.0, 100.0, 60.0);
        let b = Rect::new(0.0, 300.0, 100.0, 60.0);
        let points = route_orthogonal(&input(a, Side::Bottom, b, Side::Top));
        assert_eq!(points, vec![Point::new(50.0, 60.0), Point::new(50.0, 300.0)]);
    }

    #[test]
    fn test_facing_offset_jogs_at_stub_end() {
        let a = Rect::new(0.0, 0.0, 100.0, 60.0);
        let b = Rect::new(400.0, 300.0, 100.0, 60.0);
        let points = route_orthogonal(&input(a, Side::Bottom, b, Side::Top));
        assert_eq!(
            points,
            vec![
                Point::new(50.0, 60.0),
                Point::new(50.0, 85.0),
                Point::new(450.0, 85.0),
                Point::new(450.0, 300.0),
            ]
        );
    }

    #[test]
    fn test_facing_destination_above_uses_gap_lane() {
        let a = Rect::new(0.0, 200.0, 100.0, 60.0);
        let b = Rect::new(300.0, 0.0, 100.0, 60.0);
        let points = route_orthogonal(&input(a, Side::Bottom, b, Side::Top));
        // lane halfway between the boxes
        assert!(points.iter().any(|p| (p.x - 200.0).abs() < EPSILON));
        assert_eq!(points.len(), 6);
        assert_axis_aligned(&points);
        assert_clear_of(&points, &[a, b]);
    }

    #[test]
    fn test_facing_destination_above_without_gap_goes_around() {
        let a = Rect::new(0.0, 200.0, 100.0, 60.0);
        let b = Rect::new(40.0, 0.0, 100.0, 60.0);
        let points = route_orthogonal(&input(a, Side::Bottom, b, Side::Top));
        // lane clears both footprints on the right
        assert!(points.iter().any(|p| (p.x - 150.0).abs() < EPSILON));
        assert_clear_of(&points, &[a, b]);
    }

    // ========================================================================
    // Parallel
    // ========================================================================

    #[test]
    fn test_parallel_side_by_side_is_a_u() {
        let a = Rect::new(0.0, 0.0, 100.0, 60.0);
        let b = Rect::new(300.0, 0.0, 100.0, 60.0);
        let points = route_orthogonal(&input(a, Side::Bottom, b, Side::Bottom));
        assert_eq!(
            points,
            vec![
                Point::new(50.0, 60.0),
                Point::new(50.0, 85.0),
                Point::new(350.0, 85.0),
                Point::new(350.0, 60.0),
            ]
        );
    }

    #[test]
    fn test_parallel_destination_below_steps_around_it() {
        let a = Rect::new(0.0, 0.0, 100.0, 60.0);
        let b = Rect::new(0.0, 200.0, 100.0, 60.0);
        let points = route_orthogonal(&input(a, Side::Bottom, b, Side::Bottom));
        assert_axis_aligned(&points);
        assert!(points.iter().any(|p| (p.x + 10.0).abs() < EPSILON));
        assert_clear_of(&points, &[b]);
        assert_eq!(*points.last().unwrap(), Point::new(50.0, 260.0));
    }

    #[test]
    fn test_parallel_source_below_steps_around_it() {
        let a = Rect::new(0.0, 200.0, 100.0, 60.0);
        let b = Rect::new(20.0, 0.0, 100.0, 60.0);
        let points = route_orthogonal(&input(a, Side::Bottom, b, Side::Bottom));
        assert_axis_aligned(&points);
        assert_clear_of(&points, &[a, b]);
    }

    // ========================================================================
    // Crossing
    // ========================================================================

    #[test]
    fn test_crossing_direct_l() {
        let a = Rect::new(0.0, 0.0, 100.0, 60.0);
        let b = Rect::new(300.0, 200.0, 100.0, 60.0);
        let points = route_orthogonal(&input(a, Side::Bottom, b, Side::Left));
        assert_eq!(
            points,
            vec![Point::new(50.0, 60.0), Point::new(50.0, 230.0), Point::new(300.0, 230.0)]
        );
    }

    #[test]
    fn test_crossing_mirrored_direct_l() {
        let a = Rect::new(300.0, 0.0, 100.0, 60.0);
        let b = Rect::new(0.0, 200.0, 100.0, 60.0);
        let points = route_orthogonal(&input(a, Side::Bottom, b, Side::Right));
        assert_eq!(
            points,
            vec![Point::new(350.0, 60.0), Point::new(350.0, 230.0), Point::new(100.0, 230.0)]
        );
    }

    #[test]
    fn test_crossing_wrong_side_comes_round() {
        // entry on the left of a box that sits below-left of the source
        let a = Rect::new(300.0, 0.0, 100.0, 60.0);
        let b = Rect::new(0.0, 200.0, 100.0, 60.0);
        let points = route_orthogonal(&input(a, Side::Bottom, b, Side::Left));
        assert_axis_aligned(&points);
        // last segment arrives moving right
        let n = points.len();
        assert!(points[n - 1].x > points[n - 2].x);
        assert!((points[n - 1].y - points[n - 2].y).abs() <= EPSILON);
        assert_clear_of(&points, &[b]);
    }

    #[test]
    fn test_crossing_entry_above_stub() {
        let a = Rect::new(0.0, 200.0, 100.0, 60.0);
        let b = Rect::new(300.0, 0.0, 100.0, 60.0);
        let points = route_orthogonal(&input(a, Side::Bottom, b, Side::Left));
        assert_axis_aligned(&points);
        let n = points.len();
        assert_eq!(points[n - 1], Point::new(300.0, 30.0));
        assert!(points[n - 2].x < 300.0);
        assert_clear_of(&points, &[a, b]);
    }

    // ========================================================================
    // All pairs
    // ========================================================================

    #[rstest]
    fn test_every_pair_is_axis_aligned_and_connected(
        #[values(Side::Top, Side::Bottom, Side::Left, Side::Right)] exit: Side,
        #[values(Side::Top, Side::Bottom, Side::Left, Side::Right)] entry: Side,
        #[values(
            (400.0, 300.0),
            (-400.0, 300.0),
            (400.0, -300.0),
            (0.0, -300.0),
            (350.0, 0.0),
            (0.0, 80.0),
            (0.0, -100.0),
            (120.0, 0.0),
            (-140.0, 0.0),
            (-120.0, -60.0),
            (130.0, 90.0),
            (-30.0, 95.0)
        )]
        offset: (f32, f32),
    ) {
        let a = Rect::new(0.0, 0.0, 100.0, 60.0);
        let b = Rect::new(offset.0, offset.1, 100.0, 60.0);
        let req = input(a, exit, b, entry);
        let points = route_orthogonal(&req);

        assert!(points.len() >= 2 && points.len() <= MAX_SEGMENTS + 1, "{points:?}");
        assert_eq!(points[0], req.start);
        assert_eq!(*points.last().unwrap(), req.end);
        assert_axis_aligned(&points);
        assert_clear_of(&points, &[a, b]);
        // leaves perpendicular to the exit side
        let first = points[1] - points[0];
        let n = exit.normal();
        assert!(first.x * n.x + first.y * n.y > 0.0);
        // arrives against the entry normal
        let last = points[points.len() - 1] - points[points.len() - 2];
        let n = entry.normal();
        assert!(last.x * n.x + last.y * n.y < 0.0);
    }

    #[rstest]
    #[case(Side::Left, Side::Top, (-120.0, 0.0))]
    #[case(Side::Top, Side::Right, (-120.0, 0.0))]
    #[case(Side::Bottom, Side::Right, (-120.0, 0.0))]
    #[case(Side::Left, Side::Right, (-120.0, -60.0))]
    #[case(Side::Right, Side::Left, (120.0, 60.0))]
    fn test_neighbours_are_not_cut_through(#[case] exit: Side, #[case] entry: Side, #[case] offset: (f32, f32)) {
        let a = Rect::new(0.0, 0.0, 100.0, 60.0);
        let b = Rect::new(offset.0, offset.1, 100.0, 60.0);
        let points = route_orthogonal(&input(a, exit, b, entry));
        assert_axis_aligned(&points);
        assert_clear_of(&points, &[a, b]);
    }

    #[test]
    fn test_close_stack_shortens_the_stub() {
        // 20 apart, closer than the 25 long stub
        let a = Rect::new(0.0, 0.0, 100.0, 60.0);
        let b = Rect::new(0.0, 80.0, 100.0, 60.0);
        let points = route_orthogonal(&input(a, Side::Bottom, b, Side::Top));
        assert_eq!(points, vec![Point::new(50.0, 60.0), Point::new(50.0, 80.0)]);

        let b = Rect::new(150.0, 80.0, 100.0, 60.0);
        let points = route_orthogonal(&input(a, Side::Bottom, b, Side::Top));
        assert_eq!(
            points,
            vec![
                Point::new(50.0, 60.0),
                Point::new(50.0, 70.0),
                Point::new(200.0, 70.0),
                Point::new(200.0, 80.0),
            ]
        );
    }

    #[test]
    fn test_entry_beside_source_uses_the_gap() {
        // entry on the right of a box directly left of the source
        let a = Rect::new(0.0, 0.0, 100.0, 60.0);
        let b = Rect::new(-120.0, 0.0, 100.0, 60.0);
        let points = route_orthogonal(&input(a, Side::Top, b, Side::Right));
        assert_eq!(points.len(), 5, "{points:?}");
        assert_clear_of(&points, &[a, b]);
        // comes down between the boxes and turns left into the entry
        let &[.., before, last] = &points[..] else { panic!("{points:?}") };
        assert!(before.x > -20.0 && before.x < 0.0);
        assert_eq!(last, Point::new(-20.0, 30.0));
    }

    #[test]
    fn test_routing_is_deterministic() {
        let a = Rect::new(10.0, 20.0, 120.0, 80.0);
        let b = Rect::new(-200.0, 260.0, 90.0, 40.0);
        let req = input(a, Side::Right, b, Side::Top);
        assert_eq!(route_orthogonal(&req), route_orthogonal(&req));
    }

    // ========================================================================
    // Fallback and simplification
    // ========================================================================

    #[test]
    fn test_center_entry_uses_dominant_axis() {
        let a = Rect::new(0.0, 0.0, 100.0, 60.0);
        let mut req = input(a, Side::Bottom, Rect::point(Point::new(80.0, 400.0)), Side::Center);
        req.end = Point::new(80.0, 400.0);
        let points = route_orthogonal(&req);
        assert_eq!(points, vec![Point::new(50.0, 60.0), Point::new(50.0, 400.0), Point::new(80.0, 400.0)]);

        req.end = Point::new(500.0, 100.0);
        let points = route_orthogonal(&req);
        assert_eq!(points, vec![Point::new(50.0, 60.0), Point::new(500.0, 60.0), Point::new(500.0, 100.0)]);
    }

    #[test]
    fn test_simplify_drops_duplicates_and_straight_corners() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(0.0, 20.0),
            Point::new(5.0, 20.0),
        ];
        assert_eq!(
            simplify(points),
            vec![Point::new(0.0, 0.0), Point::new(0.0, 20.0), Point::new(5.0, 20.0)]
        );
    }
}
