//! Pointer hit testing against a dashboard.
//!
//! All points are in graph space; convert pointer positions with
//! [`Dashboard::to_graph_space`] first.

use crate::dashboard::Dashboard;
use crate::geometry::{Point, Rect, SideAnchor};
use crate::graph::EdgeRef;

/// Topmost node whose rectangle contains `point`.
pub fn find_node_at(dashboard: &Dashboard, point: Point) -> Option<&str> {
    let handler_size = dashboard.handler_size();
    dashboard
        .nodes()
        .filter(|n| n.rect(handler_size).contains(point))
        .last()
        .map(|n| n.id())
}

/// Closest node anchor within `hit_radius` of `point`.
pub fn find_anchor_at(dashboard: &Dashboard, point: Point, hit_radius: f32) -> Option<(String, SideAnchor)> {
    let handler_size = dashboard.handler_size();
    let mut closest = None;
    let mut closest_distance = hit_radius;

    for node in dashboard.nodes() {
        let rect = node.rect(handler_size);
        for &anchor in node.anchors() {
            let distance = rect.anchor_point(anchor).distance(point);
            if distance <= closest_distance {
                closest_distance = distance;
                closest = Some((node.id(), anchor));
            }
        }
    }

    closest.map(|(id, anchor)| (id.to_string(), anchor))
}

/// Closest edge whose routed path passes within `hover_distance` of `point`.
///
/// Curved segments are sampled with the router's configured sample count.
pub fn find_edge_at(dashboard: &Dashboard, point: Point, hover_distance: f32) -> Option<EdgeRef> {
    let samples = dashboard.config().router.hit_samples;
    let mut closest = None;
    let mut closest_distance = hover_distance;

    for (edge, path) in dashboard.routed_edges() {
        let distance = path.distance_to(point, samples);
        if distance < closest_distance {
            closest_distance = distance;
            closest = Some(edge);
        }
    }

    closest
}

/// Waypoint within `hit_radius` of `point`, as (edge, index).
pub fn find_waypoint_at(dashboard: &Dashboard, point: Point, hit_radius: f32) -> Option<(EdgeRef, usize)> {
    let hit_radius_sq = hit_radius * hit_radius;
    for node in dashboard.nodes() {
        for edge in node.edges() {
            for (i, waypoint) in edge.waypoints().iter().enumerate() {
                let d = waypoint.position - point;
                if d.x * d.x + d.y * d.y <= hit_radius_sq {
                    return Some((EdgeRef::new(node.id(), edge.dest_id()), i));
                }
            }
        }
    }
    None
}

/// Ids of all nodes intersecting a selection box.
pub fn nodes_in_selection_box(dashboard: &Dashboard, selection: Rect) -> Vec<String> {
    let handler_size = dashboard.handler_size();
    dashboard
        .nodes()
        .filter(|node| {
            let r = node.rect(handler_size);
            r.left() < selection.right()
                && r.right() > selection.left()
                && r.top() < selection.bottom()
                && r.bottom() > selection.top()
        })
        .map(|node| node.id().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::graph::Node;
    use crate::style::{EdgeStyle, RoutingStyle};

    // Handle size 0 keeps node rectangles equal to position/size.
    fn dashboard() -> Dashboard {
        let mut d = Dashboard::with_config(crate::config::DashboardConfig {
            handler_size: 0.0,
            ..Default::default()
        });
        d.add_node(Node::new(Point::new(0.0, 0.0), Size::new(100.0, 60.0)).with_id("a"), None);
        d.add_node(Node::new(Point::new(50.0, 30.0), Size::new(100.0, 60.0)).with_id("b"), None);
        d.add_node(Node::new(Point::new(400.0, 0.0), Size::new(100.0, 60.0)).with_id("c"), None);
        d
    }

    // ========================================================================
    // find_node_at()
    // ========================================================================

    #[test]
    fn test_find_node_at_prefers_topmost() {
        let d = dashboard();
        assert_eq!(find_node_at(&d, Point::new(10.0, 10.0)), Some("a"));
        assert_eq!(find_node_at(&d, Point::new(60.0, 40.0)), Some("b"));
        assert_eq!(find_node_at(&d, Point::new(300.0, 300.0)), None);
    }

    // ========================================================================
    // find_anchor_at()
    // ========================================================================

    #[test]
    fn test_find_anchor_at() {
        let d = dashboard();
        // right side of c is at (500, 30)
        assert_eq!(
            find_anchor_at(&d, Point::new(497.0, 31.0), 5.0),
            Some(("c".to_string(), SideAnchor::CENTER_RIGHT))
        );
        assert_eq!(find_anchor_at(&d, Point::new(480.0, 31.0), 5.0), None);
    }

    // ========================================================================
    // find_edge_at()
    // ========================================================================

    #[test]
    fn test_find_edge_at() {
        let mut d = dashboard();
        d.add_edge(
            "a",
            "c",
            EdgeStyle::with_style(RoutingStyle::Orthogonal).anchored(SideAnchor::TOP_CENTER, SideAnchor::TOP_CENTER),
        );
        d.add_edge("b", "c", EdgeStyle::default());

        // a -> c runs over both nodes at y = -41: the entry stub on top of
        // the 16 high cap is the longer of the two
        assert_eq!(find_edge_at(&d, Point::new(200.0, -40.0), 3.0), Some(EdgeRef::new("a", "c")));
        assert_eq!(find_edge_at(&d, Point::new(200.0, 300.0), 3.0), None);
    }

    #[test]
    fn test_find_waypoint_at() {
        let mut d = dashboard();
        d.add_edge("a", "c", EdgeStyle::with_style(RoutingStyle::Segmented));
        let edge = EdgeRef::new("a", "c");
        d.insert_waypoint(&edge, Some(Point::new(250.0, 200.0)));
        assert_eq!(find_waypoint_at(&d, Point::new(252.0, 199.0), 4.0), Some((edge, 0)));
        assert_eq!(find_waypoint_at(&d, Point::new(260.0, 200.0), 4.0), None);
    }

    // ========================================================================
    // nodes_in_selection_box()
    // ========================================================================

    #[test]
    fn test_nodes_in_selection_box() {
        let d = dashboard();
        let ids = nodes_in_selection_box(&d, Rect::new(90.0, 50.0, 20.0, 20.0));
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
        assert!(nodes_in_selection_box(&d, Rect::new(200.0, 200.0, 10.0, 10.0)).is_empty());
    }
}
