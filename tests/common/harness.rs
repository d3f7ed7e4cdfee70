//! Test harness wiring a dashboard the way an editor window does.
//!
//! Provides a dashboard with a viewport, a bound edge path model and callback
//! tracking, plus helpers for simulating user interactions.

#![allow(dead_code)]

use super::CallbackTracker;
use slint::{Model, SharedString, VecModel};
use slint_flow_chart::{
    find_anchor_at, ConnectionDrag, Dashboard, EdgePathManager, EdgeRef, EdgeStyle, Node, Point, Rect, Size,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Standard node size used throughout the tests.
pub const NODE_SIZE: Size = Size::new(100.0, 60.0);

/// Viewport used by the harness.
pub const VIEWPORT: Size = Size::new(1000.0, 800.0);

/// Dashboard plus the collaborators a window would attach to it.
pub struct DashboardHarness {
    pub dashboard: Dashboard,
    pub tracker: CallbackTracker,
    pub paths: Rc<RefCell<EdgePathManager>>,
    /// SVG commands per edge, as a Slint model would receive them.
    pub path_model: Rc<VecModel<SharedString>>,
    pub drag: ConnectionDrag,
}

impl DashboardHarness {
    /// Create a harness with nodes `a` at (0, 0) and `b` at (300, 0).
    pub fn new() -> Self {
        let mut harness = Self::empty();
        harness.add_node("a", 0.0, 0.0);
        harness.add_node("b", 300.0, 0.0);
        harness.tracker.clear();
        harness
    }

    /// Create a harness without nodes.
    pub fn empty() -> Self {
        let mut dashboard = Dashboard::new();
        dashboard.set_viewport_size(VIEWPORT);

        let tracker = CallbackTracker::new();
        tracker.attach(&mut dashboard);

        let paths = Rc::new(RefCell::new(EdgePathManager::new()));
        let path_model = Rc::new(VecModel::<SharedString>::default());
        paths.borrow_mut().bind_model(path_model.clone(), |p| p.commands.clone());
        dashboard.add_change_listener(EdgePathManager::listener(&paths));

        Self {
            dashboard,
            tracker,
            paths,
            path_model,
            drag: ConnectionDrag::default(),
        }
    }

    pub fn add_node(&mut self, id: &str, x: f32, y: f32) -> String {
        self.dashboard
            .add_node(Node::new(Point::new(x, y), NODE_SIZE).with_id(id), None)
    }

    pub fn connect(&mut self, source: &str, dest: &str, style: EdgeStyle) -> bool {
        self.dashboard.add_edge(source, dest, style)
    }

    pub fn rect(&self, id: &str) -> Rect {
        self.dashboard.node_rect(id).expect("node exists")
    }

    /// Simulate a connection drag from the anchor under `from` to the anchor
    /// under `to`, releasing on the target. Points are screen positions.
    pub fn drag_connection(&mut self, from: Point, to: Point, style: EdgeStyle) -> Option<EdgeRef> {
        let radius = self.dashboard.handler_size();
        let from = self.dashboard.to_graph_space(from);
        let to = self.dashboard.to_graph_space(to);

        let (source, anchor) = find_anchor_at(&self.dashboard, from, radius)?;
        self.drag.begin(source, anchor, from);

        let midway = from.midpoint(to);
        self.drag.pointer_moved(midway, find_anchor_at(&self.dashboard, midway, radius));
        self.drag.pointer_moved(to, find_anchor_at(&self.dashboard, to, radius));
        self.drag.commit(&mut self.dashboard, style)
    }

    /// Number of rows in the bound path model.
    pub fn rendered_paths(&self) -> usize {
        self.path_model.row_count()
    }
}

impl Default for DashboardHarness {
    fn default() -> Self {
        Self::new()
    }
}
