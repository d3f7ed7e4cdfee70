use crate::geometry::{Point, Rect, SideAnchor, Size};
use crate::style::EdgeStyle;
use crate::waypoint::Waypoint;

/// Identifies an edge by its (source, destination) node ids.
///
/// At most one edge exists per ordered pair, so the pair is a complete key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeRef {
    pub source: String,
    pub dest: String,
}

impl EdgeRef {
    pub fn new(source: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
        }
    }
}

/// A directed, styled connection owned by its source node.
///
/// The destination is referenced by id. An id that no longer resolves marks
/// the edge as orphaned and routing skips it.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub(crate) dest_id: String,
    pub(crate) style: EdgeStyle,
    pub(crate) waypoints: Vec<Waypoint>,
}

impl Edge {
    pub fn new(dest_id: impl Into<String>, style: EdgeStyle) -> Self {
        Self {
            dest_id: dest_id.into(),
            style,
            waypoints: Vec::new(),
        }
    }

    /// Builder-style waypoint list, used when assembling nodes before
    /// inserting them.
    pub fn with_waypoints(mut self, waypoints: Vec<Waypoint>) -> Self {
        self.waypoints = waypoints;
        self
    }

    pub fn dest_id(&self) -> &str {
        &self.dest_id
    }

    pub fn style(&self) -> &EdgeStyle {
        &self.style
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }
}

/// A positioned, sized box with connectable sides.
///
/// `position` is the top-left corner of the node's widget area. The box the
/// edges attach to is inset by half the handle size, see [`Node::rect`].
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) id: String,
    pub position: Point,
    pub size: Size,
    pub text: String,
    pub(crate) anchors: Vec<SideAnchor>,
    pub(crate) edges: Vec<Edge>,
}

impl Node {
    /// A node without an id; the dashboard assigns one on insertion.
    pub fn new(position: Point, size: Size) -> Self {
        Self {
            id: String::new(),
            position,
            size,
            text: String::new(),
            anchors: SideAnchor::SIDES.to_vec(),
            edges: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_anchors(mut self, anchors: Vec<SideAnchor>) -> Self {
        self.anchors = anchors;
        self
    }

    /// Attach an outgoing edge before the node is inserted. A later edge to
    /// the same destination replaces the earlier one.
    pub fn with_edge(mut self, edge: Edge) -> Self {
        self.edges.retain(|e| e.dest_id != edge.dest_id);
        self.edges.push(edge);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn anchors(&self) -> &[SideAnchor] {
        &self.anchors
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge_to(&self, dest_id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.dest_id == dest_id)
    }

    pub(crate) fn edge_to_mut(&mut self, dest_id: &str) -> Option<&mut Edge> {
        self.edges.iter_mut().find(|e| e.dest_id == dest_id)
    }

    /// The box edges attach to.
    pub fn rect(&self, handler_size: f32) -> Rect {
        let inset = handler_size / 2.0;
        Rect::from_origin_size(self.position + Point::new(inset, inset), self.size)
    }

    pub fn anchor_position(&self, anchor: SideAnchor, handler_size: f32) -> Point {
        self.rect(handler_size).anchor_point(anchor)
    }

    /// Rescale size-like quantities (node size and edge style lengths).
    pub(crate) fn rescale_lengths(&mut self, old_factor: f32, new_factor: f32) {
        self.size = self.size.scaled(new_factor / old_factor);
        for edge in &mut self.edges {
            edge.style.rescale(old_factor, new_factor);
        }
    }

    /// Rescale absolute positions (node position and waypoints) around a
    /// focal point.
    pub(crate) fn rescale_positions(&mut self, focal: Point, old_factor: f32, new_factor: f32) {
        self.position = self.position.rescale_around(focal, old_factor, new_factor);
        for waypoint in self.edges.iter_mut().flat_map(|e| e.waypoints.iter_mut()) {
            waypoint.rescale(focal, old_factor, new_factor);
        }
    }

    pub(crate) fn translate(&mut self, delta: Point) {
        self.position = self.position + delta;
        for waypoint in self.edges.iter_mut().flat_map(|e| e.waypoints.iter_mut()) {
            waypoint.translate(delta);
        }
    }
}

// ============================================================================
// Edge Validation
// ============================================================================

/// Result of edge validation with optional rejection reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Edge is valid
    Valid,
    /// Edge is invalid with a reason
    Invalid(ValidationError),
}

impl ValidationResult {
    /// Check if the result is valid
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// Combine two results (AND logic): returns first error if any
    pub fn and(self, other: ValidationResult) -> ValidationResult {
        match self {
            ValidationResult::Valid => other,
            invalid => invalid,
        }
    }
}

/// Reasons why an edge cannot be created
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("node `{0}` not found")]
    NodeNotFound(String),
    #[error("cannot connect a node to itself")]
    SameNode,
}

/// Check that both endpoints exist and differ.
pub fn validate_edge<'a, F>(source_id: &str, dest_id: &str, lookup: F) -> ValidationResult
where
    F: Fn(&str) -> Option<&'a Node>,
{
    let exists = |id: &str| match lookup(id) {
        Some(_) => ValidationResult::Valid,
        None => ValidationResult::Invalid(ValidationError::NodeNotFound(id.to_string())),
    };
    let distinct = if source_id == dest_id {
        ValidationResult::Invalid(ValidationError::SameNode)
    } else {
        ValidationResult::Valid
    };
    distinct.and(exists(source_id)).and(exists(dest_id))
}
