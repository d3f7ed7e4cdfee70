//! Style dispatch: turns a [`RouteRequest`] into a [`RoutedPath`].
//!
//! Routing is a pure function of its inputs. The dashboard resolves anchor
//! positions and rectangles; everything below works on plain geometry.

use crate::config::RouterConfig;
use crate::geometry::{Point, Rect};
use crate::orthogonal::{route_orthogonal, OrthogonalInput};
use crate::path::{cap_shape, curve_segments, end_offset, spline_segments, RoutedPath};
use crate::style::{EdgeStyle, RoutingStyle};
use crate::waypoint::Waypoint;

/// Inputs for routing one edge.
#[derive(Debug, Clone, Copy)]
pub struct RouteRequest<'a> {
    /// Resolved start anchor position on the source node.
    pub start: Point,
    /// Resolved end anchor position, or the pointer while dragging.
    pub end: Point,
    pub source: Rect,
    /// Destination rectangle; `None` while an edge is dragged around.
    pub dest: Option<Rect>,
    pub style: &'a EdgeStyle,
    pub waypoints: &'a [Waypoint],
}

/// Route one edge in its style.
///
/// The end point is pulled back by the ending cap first so the stroke stops
/// at the cap's base. Waypoints only shape segmented edges.
pub fn route(req: &RouteRequest<'_>, config: &RouterConfig) -> RoutedPath {
    let style = req.style;
    let offset = end_offset(req.start, req.end, style.end_anchor, style.ending, style.ending_size);
    let end = req.end + offset;

    let mut path = match style.style {
        RoutingStyle::Curve => RoutedPath::new(curve_segments(req.start, style.start_anchor, end, style.end_anchor)),
        RoutingStyle::Segmented => {
            let mut points = Vec::with_capacity(req.waypoints.len() + 2);
            points.push(req.start);
            points.extend(req.waypoints.iter().map(|w| w.position));
            points.push(end);
            RoutedPath::new(spline_segments(&points, style.effective_tension()))
        }
        RoutingStyle::Orthogonal => {
            let points = route_orthogonal(&OrthogonalInput {
                start: req.start,
                exit: style.start_anchor.side(),
                end,
                entry: style.end_anchor.side(),
                source: req.source,
                dest: req.dest.unwrap_or_else(|| Rect::point(req.end)),
                tail_length: style.tail_length,
                clearance: config.clearance,
            });
            RoutedPath::polyline(&points)
        }
    };

    path.head = Some((req.start, style.head_radius));
    path.cap = Some(cap_shape(req.start, req.end, style.end_anchor, style.ending, style.ending_size));
    path
}
