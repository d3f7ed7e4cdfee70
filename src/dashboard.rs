//! The scene graph: nodes, their outgoing edges, and the zoom/pan transform.
//!
//! Every mutation goes through a [`Dashboard`] method and ends with exactly
//! one change notification. Listeners receive `&Dashboard` after the
//! mutation has completed.
//!
//! # Example
//!
//! ```
//! use slint_flow_chart::{Dashboard, EdgeStyle, Node, Point, Size};
//!
//! let mut dashboard = Dashboard::new();
//! let a = dashboard.add_node(Node::new(Point::new(0.0, 0.0), Size::new(100.0, 60.0)), None);
//! let b = dashboard.add_node(Node::new(Point::new(300.0, 0.0), Size::new(100.0, 60.0)), None);
//! assert!(dashboard.add_edge(&a, &b, EdgeStyle::default()));
//! assert!(dashboard.find_edge_between(&a, &b).is_some());
//! ```

use crate::config::DashboardConfig;
use crate::geometry::{Point, Rect, SideAnchor, Size};
use crate::graph::{validate_edge, Edge, EdgeRef, Node, ValidationResult};
use crate::path::{distance_to_line_segment_sq, RoutedPath};
use crate::routing::{route, RouteRequest};
use crate::style::{EdgeStyle, RoutingStyle};
use crate::waypoint::Waypoint;
use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

/// Called once after every completed mutation.
pub type ChangeListener = Rc<dyn Fn(&Dashboard)>;

/// Called with (source, destination) when `add_edge` creates an edge.
pub type EdgeCreatedListener = Rc<dyn Fn(&Node, &Node)>;

/// Owner of the node graph and the global scale transform.
pub struct Dashboard {
    pub(crate) nodes: IndexMap<String, Node>,
    pub(crate) zoom_factor: f32,
    pan_offset: Point,
    viewport_position: Point,
    pub(crate) viewport_size: Size,
    pub(crate) default_style: EdgeStyle,
    pub(crate) grid_background: serde_json::Value,
    pub(crate) block_default_zoom_gestures: bool,
    pub(crate) config: DashboardConfig,
    change_listeners: Vec<ChangeListener>,
    edge_created_listeners: Vec<EdgeCreatedListener>,
    revision: u64,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dashboard")
            .field("nodes", &self.nodes.len())
            .field("zoom_factor", &self.zoom_factor)
            .field("pan_offset", &self.pan_offset)
            .field("viewport_size", &self.viewport_size)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl Dashboard {
    /// Create an empty dashboard with default settings.
    pub fn new() -> Self {
        Self::with_config(DashboardConfig::default())
    }

    pub fn with_config(config: DashboardConfig) -> Self {
        Self {
            nodes: IndexMap::new(),
            zoom_factor: 1.0,
            pan_offset: Point::ZERO,
            viewport_position: Point::ZERO,
            viewport_size: Size::default(),
            default_style: EdgeStyle::default(),
            grid_background: serde_json::Value::Null,
            block_default_zoom_gestures: false,
            config,
            change_listeners: Vec::new(),
            edge_created_listeners: Vec::new(),
            revision: 0,
        }
    }

    // ========================================================================
    // Change notification
    // ========================================================================

    pub fn add_change_listener(&mut self, listener: ChangeListener) {
        self.change_listeners.push(listener);
    }

    /// Unregister by pointer identity. Returns whether it was registered.
    pub fn remove_change_listener(&mut self, listener: &ChangeListener) -> bool {
        let before = self.change_listeners.len();
        self.change_listeners.retain(|l| !Rc::ptr_eq(l, listener));
        self.change_listeners.len() != before
    }

    pub fn add_edge_created_listener(&mut self, listener: EdgeCreatedListener) {
        self.edge_created_listeners.push(listener);
    }

    pub fn remove_edge_created_listener(&mut self, listener: &EdgeCreatedListener) -> bool {
        let before = self.edge_created_listeners.len();
        self.edge_created_listeners.retain(|l| !Rc::ptr_eq(l, listener));
        self.edge_created_listeners.len() != before
    }

    /// Number of change notifications emitted so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn notify(&mut self) {
        self.revision += 1;
        for listener in &self.change_listeners {
            listener(self);
        }
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    /// Insert a node at `index` (or at the end) and return its final id.
    ///
    /// A missing id is generated. A colliding id is replaced by a generated
    /// one. The node's size and the lengths of any edges it carries are taken
    /// to be at zoom factor 1 and scaled to the current zoom.
    pub fn add_node(&mut self, mut node: Node, index: Option<usize>) -> String {
        if node.id.is_empty() {
            node.id = generate_id();
        } else if self.nodes.contains_key(&node.id) {
            let fresh = generate_id();
            log::warn!("node id `{}` already in use, assigning `{}`", node.id, fresh);
            node.id = fresh;
        }
        if self.zoom_factor != 1.0 {
            node.rescale_lengths(1.0, self.zoom_factor);
        }

        let id = node.id.clone();
        let index = index.unwrap_or(self.nodes.len()).min(self.nodes.len());
        self.nodes.shift_insert(index, id.clone(), node);
        self.notify();
        id
    }

    /// Remove a node and every edge pointing at it.
    pub fn remove_node(&mut self, id: &str) -> bool {
        if self.nodes.shift_remove(id).is_none() {
            log::debug!("remove_node: unknown node `{}`", id);
            return false;
        }
        for node in self.nodes.values_mut() {
            node.edges.retain(|e| e.dest_id != id);
        }
        self.notify();
        true
    }

    /// Move a node's top-left corner. Its waypoints stay where they are.
    pub fn move_node(&mut self, id: &str, position: Point) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            log::debug!("move_node: unknown node `{}`", id);
            return false;
        };
        node.position = position;
        self.notify();
        true
    }

    /// Remove every node.
    pub fn clear(&mut self) {
        log::info!("clearing dashboard ({} nodes)", self.nodes.len());
        self.nodes.clear();
        self.notify();
    }

    pub fn find_node_by_id(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Nodes in z-order (bottom first).
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ========================================================================
    // Edges
    // ========================================================================

    /// Create (or replace) the edge from `source_id` to `dest_id`.
    ///
    /// The style is taken to be at zoom factor 1 and scaled to the current
    /// zoom. Returns `false` without touching the graph when either id is
    /// unknown or both are the same node.
    pub fn add_edge(&mut self, source_id: &str, dest_id: &str, mut style: EdgeStyle) -> bool {
        if let ValidationResult::Invalid(reason) = validate_edge(source_id, dest_id, |id| self.nodes.get(id)) {
            log::warn!("add_edge {} -> {} ignored: {}", source_id, dest_id, reason);
            return false;
        }
        if self.zoom_factor != 1.0 {
            style.rescale(1.0, self.zoom_factor);
        }

        let Some(source) = self.nodes.get_mut(source_id) else {
            return false;
        };
        let edge = Edge::new(dest_id, style);
        match source.edge_to_mut(dest_id) {
            Some(existing) => *existing = edge,
            None => source.edges.push(edge),
        }

        if let (Some(source), Some(dest)) = (self.nodes.get(source_id), self.nodes.get(dest_id)) {
            for listener in &self.edge_created_listeners {
                listener(source, dest);
            }
        }
        self.notify();
        true
    }

    pub fn remove_edge(&mut self, source_id: &str, dest_id: &str) -> bool {
        let Some(source) = self.nodes.get_mut(source_id) else {
            return false;
        };
        let before = source.edges.len();
        source.edges.retain(|e| e.dest_id != dest_id);
        if source.edges.len() == before {
            return false;
        }
        self.notify();
        true
    }

    /// Remove the node's outgoing and incoming edges. Returns how many were
    /// removed.
    pub fn remove_all_edges_of_node(&mut self, id: &str) -> usize {
        let mut removed = 0;
        for node in self.nodes.values_mut() {
            let before = node.edges.len();
            if node.id == id {
                node.edges.clear();
            } else {
                node.edges.retain(|e| e.dest_id != id);
            }
            removed += before - node.edges.len();
        }
        if removed > 0 {
            self.notify();
        }
        removed
    }

    /// Remove the edges attached to one anchor of a node: outgoing edges
    /// starting there and incoming edges ending there.
    pub fn remove_all_edges_at_anchor(&mut self, id: &str, anchor: SideAnchor) -> usize {
        if !self.nodes.contains_key(id) {
            return 0;
        }
        let mut removed = 0;
        for node in self.nodes.values_mut() {
            let before = node.edges.len();
            if node.id == id {
                node.edges.retain(|e| e.style.start_anchor != anchor);
            }
            node.edges.retain(|e| !(e.dest_id == id && e.style.end_anchor == anchor));
            removed += before - node.edges.len();
        }
        if removed > 0 {
            self.notify();
        }
        removed
    }

    pub fn find_edge_between(&self, source_id: &str, dest_id: &str) -> Option<&Edge> {
        self.nodes.get(source_id)?.edge_to(dest_id)
    }

    /// First node (in z-order) with an edge into `id`.
    pub fn find_source_of(&self, id: &str) -> Option<&Node> {
        self.nodes.values().find(|n| n.edge_to(id).is_some())
    }

    /// Every node with an edge into `id`.
    pub fn sources_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes.values().filter(move |n| n.edge_to(id).is_some())
    }

    /// All edges as (source, destination) pairs, orphans included.
    pub fn edge_refs(&self) -> Vec<EdgeRef> {
        self.nodes
            .values()
            .flat_map(|n| n.edges.iter().map(move |e| EdgeRef::new(n.id.clone(), e.dest_id.clone())))
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.edges.len()).sum()
    }

    /// Replace the style of an existing edge, keeping its waypoints.
    ///
    /// Unlike [`Dashboard::add_edge`], the style is taken as already being
    /// at the current zoom.
    pub fn set_edge_style(&mut self, edge: &EdgeRef, style: EdgeStyle) -> bool {
        let Some(existing) = self.edge_mut(edge) else {
            return false;
        };
        existing.style = style;
        self.notify();
        true
    }

    fn edge_mut(&mut self, edge: &EdgeRef) -> Option<&mut Edge> {
        self.nodes.get_mut(&edge.source)?.edge_to_mut(&edge.dest)
    }

    // ========================================================================
    // Waypoints
    // ========================================================================

    /// Insert a waypoint into a segmented edge.
    ///
    /// Without a point, the midpoint between the two anchors is used. The
    /// waypoint goes into the control polygon `[start, w1..wn, end]` at the
    /// segment closest to it. Returns the waypoint's index, or `None` for
    /// unknown or orphaned edges and non-segmented styles.
    pub fn insert_waypoint(&mut self, edge: &EdgeRef, point: Option<Point>) -> Option<usize> {
        let (start, end) = {
            let source = self.nodes.get(&edge.source)?;
            let current = source.edge_to(&edge.dest)?;
            if current.style.style != RoutingStyle::Segmented {
                log::debug!("insert_waypoint: {} -> {} is not segmented", edge.source, edge.dest);
                return None;
            }
            let (start, end, _, _) = self.edge_endpoints(source, current)?;
            (start, end)
        };
        let point = point.unwrap_or_else(|| start.midpoint(end));

        let target = self.edge_mut(edge)?;
        let mut polygon = Vec::with_capacity(target.waypoints.len() + 2);
        polygon.push(start);
        polygon.extend(target.waypoints.iter().map(|w| w.position));
        polygon.push(end);
        let index = nearest_segment(&polygon, point);
        target.waypoints.insert(index, Waypoint::new(point));
        self.notify();
        Some(index)
    }

    /// Remove the first waypoint equal to `waypoint` from whichever edge
    /// holds it.
    pub fn remove_waypoint(&mut self, waypoint: &Waypoint) -> bool {
        let found = self.nodes.values_mut().flat_map(|n| n.edges.iter_mut()).find_map(|e| {
            let index = e.waypoints.iter().position(|w| w == waypoint)?;
            e.waypoints.remove(index);
            Some(())
        });
        if found.is_none() {
            return false;
        }
        self.notify();
        true
    }

    pub fn move_waypoint(&mut self, edge: &EdgeRef, index: usize, position: Point) -> bool {
        let Some(waypoint) = self.edge_mut(edge).and_then(|e| e.waypoints.get_mut(index)) else {
            return false;
        };
        waypoint.position = position;
        self.notify();
        true
    }

    // ========================================================================
    // Zoom and viewport
    // ========================================================================

    pub fn zoom_factor(&self) -> f32 {
        self.zoom_factor
    }

    /// Change the zoom factor, rescaling the whole graph around `focal`
    /// (default: the viewport center).
    ///
    /// Factors below the configured minimum, non-finite factors and the
    /// current factor are ignored.
    pub fn set_zoom(&mut self, factor: f32, focal: Option<Point>) -> bool {
        if !factor.is_finite() || factor < self.config.minimum_zoom_factor || factor <= 0.0 {
            log::debug!("set_zoom: factor {} rejected", factor);
            return false;
        }
        if factor == self.zoom_factor {
            return false;
        }
        let focal = focal.unwrap_or_else(|| self.viewport_center());
        let old = self.zoom_factor;
        for node in self.nodes.values_mut() {
            node.rescale_positions(focal, old, factor);
            node.rescale_lengths(old, factor);
        }
        self.zoom_factor = factor;
        self.notify();
        true
    }

    /// Translate every node and waypoint so the first node's position lands
    /// on the viewport center.
    pub fn recenter(&mut self) -> bool {
        if !self.recenter_nodes() {
            return false;
        }
        self.notify();
        true
    }

    pub(crate) fn recenter_nodes(&mut self) -> bool {
        let Some(first) = self.nodes.first().map(|(_, n)| n.position) else {
            return false;
        };
        let delta = self.viewport_center() - first;
        for node in self.nodes.values_mut() {
            node.translate(delta);
        }
        true
    }

    pub fn pan_offset(&self) -> Point {
        self.pan_offset
    }

    pub fn set_pan_offset(&mut self, offset: Point) {
        self.pan_offset = offset;
    }

    pub fn viewport_position(&self) -> Point {
        self.viewport_position
    }

    /// Screen position of the dashboard's top-left corner.
    pub fn set_viewport_position(&mut self, position: Point) {
        self.viewport_position = position;
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport_size = size;
    }

    /// Center of the visible area, in graph space.
    pub fn viewport_center(&self) -> Point {
        Point::new(self.viewport_size.width / 2.0, self.viewport_size.height / 2.0) - self.pan_offset
    }

    /// Convert a screen (pointer) position into graph space.
    pub fn to_graph_space(&self, screen: Point) -> Point {
        screen - self.viewport_position - self.pan_offset
    }

    // ========================================================================
    // Settings
    // ========================================================================

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn minimum_zoom_factor(&self) -> f32 {
        self.config.minimum_zoom_factor
    }

    /// Set the smallest accepted zoom factor.
    ///
    /// A current zoom below the new minimum is raised to it, around the
    /// viewport center. Non-finite and non-positive minimums are ignored.
    pub fn set_minimum_zoom_factor(&mut self, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            log::debug!("set_minimum_zoom_factor: factor {} rejected", factor);
            return;
        }
        self.config.minimum_zoom_factor = factor;
        if self.zoom_factor < factor {
            self.set_zoom(factor, None);
        }
    }

    /// Handle size at the current zoom.
    pub fn handler_size(&self) -> f32 {
        self.config.handler_size * self.zoom_factor
    }

    /// Style suggested for newly created edges, at zoom factor 1.
    pub fn default_style(&self) -> &EdgeStyle {
        &self.default_style
    }

    pub fn set_default_style(&mut self, style: EdgeStyle) {
        self.default_style = style;
    }

    /// Opaque background settings, stored and saved as-is.
    pub fn grid_background(&self) -> &serde_json::Value {
        &self.grid_background
    }

    pub fn set_grid_background(&mut self, params: serde_json::Value) {
        self.grid_background = params;
    }

    pub fn block_default_zoom_gestures(&self) -> bool {
        self.block_default_zoom_gestures
    }

    pub fn set_block_default_zoom_gestures(&mut self, block: bool) {
        self.block_default_zoom_gestures = block;
    }

    // ========================================================================
    // Routing
    // ========================================================================

    /// Rectangle edges attach to for a node.
    pub fn node_rect(&self, id: &str) -> Option<Rect> {
        self.nodes.get(id).map(|n| n.rect(self.handler_size()))
    }

    /// Resolved (start, end, source rect, destination rect) of an edge, or
    /// `None` when the destination is gone.
    fn edge_endpoints(&self, source: &Node, edge: &Edge) -> Option<(Point, Point, Rect, Rect)> {
        let dest = self.nodes.get(&edge.dest_id)?;
        let handler_size = self.handler_size();
        let source_rect = source.rect(handler_size);
        let dest_rect = dest.rect(handler_size);
        Some((
            source_rect.anchor_point(edge.style.start_anchor),
            dest_rect.anchor_point(edge.style.end_anchor),
            source_rect,
            dest_rect,
        ))
    }

    /// Route one edge. `None` for unknown or orphaned edges.
    pub fn route_edge(&self, edge: &EdgeRef) -> Option<RoutedPath> {
        let source = self.nodes.get(&edge.source)?;
        let current = source.edge_to(&edge.dest)?;
        self.route(source, current)
    }

    /// Route every edge, skipping orphans.
    pub fn routed_edges(&self) -> Vec<(EdgeRef, RoutedPath)> {
        let mut out = Vec::with_capacity(self.edge_count());
        for source in self.nodes.values() {
            for edge in &source.edges {
                match self.route(source, edge) {
                    Some(path) => out.push((EdgeRef::new(source.id.clone(), edge.dest_id.clone()), path)),
                    None => log::debug!("skipping orphaned edge {} -> {}", source.id, edge.dest_id),
                }
            }
        }
        out
    }

    fn route(&self, source: &Node, edge: &Edge) -> Option<RoutedPath> {
        let (start, end, source_rect, dest_rect) = self.edge_endpoints(source, edge)?;
        let request = RouteRequest {
            start,
            end,
            source: source_rect,
            dest: Some(dest_rect),
            style: &edge.style,
            waypoints: &edge.waypoints,
        };
        Some(route(&request, &self.config.router))
    }
}

pub(crate) fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Index of the polygon segment closest to `point`; ties go to the earlier
/// segment.
fn nearest_segment(polygon: &[Point], point: Point) -> usize {
    let mut best = 0;
    let mut best_dist = f32::MAX;
    for (i, w) in polygon.windows(2).enumerate() {
        let d = distance_to_line_segment_sq(point, w[0], w[1]);
        if d < best_dist {
            best = i;
            best_dist = d;
        }
    }
    best
}
