//! JSON snapshot of a dashboard.
//!
//! The record types mirror the document layout key for key. Loading is
//! all-or-nothing: the whole document is parsed and converted into a new node
//! map before the dashboard is touched.

use crate::dashboard::Dashboard;
use crate::error::{Error, Result};
use crate::geometry::{Point, SideAnchor, Size};
use crate::graph::{Edge, Node};
use crate::style::{
    EdgeStyle, EndingCap, RoutingStyle, DEFAULT_ENDING_SIZE, DEFAULT_HEAD_RADIUS, DEFAULT_TAIL_LENGTH,
    DEFAULT_TENSION, DEFAULT_THICKNESS,
};
use crate::waypoint::Waypoint;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use slint::Color;

const DEFAULT_COLOR: u32 = 0xFF00_0000;

fn default_minimum_zoom() -> f32 {
    0.25
}

fn default_zoom() -> f32 {
    1.0
}

fn default_color() -> u32 {
    DEFAULT_COLOR
}

fn default_ending_style() -> i64 {
    EndingCap::default().index()
}

fn default_ending_size() -> Size {
    DEFAULT_ENDING_SIZE
}

fn default_handlers() -> Vec<SideAnchor> {
    SideAnchor::SIDES.to_vec()
}

/// Top-level snapshot document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub elements: Vec<NodeRecord>,
    pub dashboard_size_width: f32,
    pub dashboard_size_height: f32,
    #[serde(default)]
    pub grid_background_params: serde_json::Value,
    #[serde(default)]
    pub block_default_zoom_gestures: bool,
    #[serde(default = "default_minimum_zoom")]
    pub minimum_zoom_factor: f32,
    /// Routing style index of the default edge style.
    #[serde(default)]
    pub arrow_style: i64,
    #[serde(default = "default_ending_style")]
    pub arrow_ending_style: i64,
    /// Packed ARGB.
    #[serde(default = "default_color")]
    pub arrow_color: u32,
    #[serde(default = "default_ending_size")]
    pub arrow_ending_size: Size,
    /// Zoom factor the lengths and positions below were saved at.
    #[serde(default = "default_zoom")]
    pub zoom_factor: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: String,
    pub position_dx: f32,
    pub position_dy: f32,
    pub size: Size,
    #[serde(default = "default_handlers")]
    pub handlers: Vec<SideAnchor>,
    #[serde(default)]
    pub text: String,
    /// Outgoing edges.
    #[serde(default)]
    pub next: Vec<EdgeRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRecord {
    pub dest_element_id: String,
    #[serde(default)]
    pub arrow_params: ArrowParamsRecord,
    /// Waypoints.
    #[serde(default)]
    pub pivots: Vec<PivotRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArrowParamsRecord {
    pub thickness: f32,
    pub head_radius: f32,
    pub tail_length: f32,
    pub color: u32,
    pub style: i64,
    pub tension: f32,
    pub start_arrow_position_x: f32,
    pub start_arrow_position_y: f32,
    pub end_arrow_position_x: f32,
    pub end_arrow_position_y: f32,
    pub ending_style: i64,
    pub ending_size: Size,
}

impl Default for ArrowParamsRecord {
    fn default() -> Self {
        Self {
            thickness: DEFAULT_THICKNESS,
            head_radius: DEFAULT_HEAD_RADIUS,
            tail_length: DEFAULT_TAIL_LENGTH,
            color: DEFAULT_COLOR,
            style: RoutingStyle::default().index(),
            tension: DEFAULT_TENSION,
            start_arrow_position_x: SideAnchor::CENTER_RIGHT.x,
            start_arrow_position_y: SideAnchor::CENTER_RIGHT.y,
            end_arrow_position_x: SideAnchor::CENTER_LEFT.x,
            end_arrow_position_y: SideAnchor::CENTER_LEFT.y,
            ending_style: EndingCap::default().index(),
            ending_size: DEFAULT_ENDING_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PivotRecord {
    pub dx: f32,
    pub dy: f32,
}

impl From<&EdgeStyle> for ArrowParamsRecord {
    fn from(style: &EdgeStyle) -> Self {
        Self {
            thickness: style.thickness,
            head_radius: style.head_radius,
            tail_length: style.tail_length,
            color: style.argb(),
            style: style.style.index(),
            tension: style.tension,
            start_arrow_position_x: style.start_anchor.x,
            start_arrow_position_y: style.start_anchor.y,
            end_arrow_position_x: style.end_anchor.x,
            end_arrow_position_y: style.end_anchor.y,
            ending_style: style.ending.index(),
            ending_size: style.ending_size,
        }
    }
}

impl TryFrom<&ArrowParamsRecord> for EdgeStyle {
    type Error = Error;

    fn try_from(record: &ArrowParamsRecord) -> Result<Self> {
        Ok(EdgeStyle {
            style: RoutingStyle::from_index(record.style).ok_or(Error::UnknownStyle(record.style))?,
            thickness: record.thickness,
            head_radius: record.head_radius,
            tail_length: record.tail_length,
            color: Color::from_argb_encoded(record.color),
            tension: record.tension,
            start_anchor: SideAnchor::new(record.start_arrow_position_x, record.start_arrow_position_y),
            end_anchor: SideAnchor::new(record.end_arrow_position_x, record.end_arrow_position_y),
            ending: EndingCap::from_index(record.ending_style).ok_or(Error::UnknownEndingStyle(record.ending_style))?,
            ending_size: record.ending_size,
        })
    }
}

impl From<&Node> for NodeRecord {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            position_dx: node.position.x,
            position_dy: node.position.y,
            size: node.size,
            handlers: node.anchors.clone(),
            text: node.text.clone(),
            next: node
                .edges
                .iter()
                .map(|edge| EdgeRecord {
                    dest_element_id: edge.dest_id.clone(),
                    arrow_params: ArrowParamsRecord::from(&edge.style),
                    pivots: edge
                        .waypoints
                        .iter()
                        .map(|w| PivotRecord { dx: w.position.x, dy: w.position.y })
                        .collect(),
                })
                .collect(),
        }
    }
}

impl TryFrom<&NodeRecord> for Node {
    type Error = Error;

    fn try_from(record: &NodeRecord) -> Result<Self> {
        if record.id.is_empty() {
            return Err(Error::EmptyNodeId);
        }
        let mut node = Node::new(Point::new(record.position_dx, record.position_dy), record.size)
            .with_id(record.id.clone())
            .with_text(record.text.clone())
            .with_anchors(record.handlers.clone());
        for edge in &record.next {
            if edge.dest_element_id == record.id {
                log::warn!("dropping self edge on node `{}`", record.id);
                continue;
            }
            let style = EdgeStyle::try_from(&edge.arrow_params)?;
            let waypoints = edge.pivots.iter().map(|p| Waypoint::new(Point::new(p.dx, p.dy))).collect();
            node = node.with_edge(Edge::new(edge.dest_element_id.clone(), style).with_waypoints(waypoints));
        }
        Ok(node)
    }
}

impl Dashboard {
    /// Capture the dashboard as a snapshot document.
    ///
    /// Positions and lengths are stored as they are at the current zoom,
    /// together with the zoom factor.
    pub fn to_snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            elements: self.nodes.values().map(NodeRecord::from).collect(),
            dashboard_size_width: self.viewport_size.width,
            dashboard_size_height: self.viewport_size.height,
            grid_background_params: self.grid_background.clone(),
            block_default_zoom_gestures: self.block_default_zoom_gestures,
            minimum_zoom_factor: self.config.minimum_zoom_factor,
            arrow_style: self.default_style.style.index(),
            arrow_ending_style: self.default_style.ending.index(),
            arrow_color: self.default_style.argb(),
            arrow_ending_size: self.default_style.ending_size,
            zoom_factor: self.zoom_factor,
        }
    }

    pub fn save_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_snapshot())?)
    }

    /// Replace the whole dashboard with a JSON snapshot, then recenter.
    ///
    /// On error the dashboard is left unchanged.
    pub fn load_json(&mut self, json: &str) -> Result<()> {
        let snapshot: DashboardSnapshot = serde_json::from_str(json)?;
        self.load_snapshot(&snapshot)
    }

    pub fn load_snapshot(&mut self, snapshot: &DashboardSnapshot) -> Result<()> {
        let minimum = snapshot.minimum_zoom_factor;
        if !minimum.is_finite() || minimum <= 0.0 {
            return Err(Error::InvalidZoomFactor(minimum));
        }
        if !snapshot.zoom_factor.is_finite() || snapshot.zoom_factor < minimum {
            return Err(Error::InvalidZoomFactor(snapshot.zoom_factor));
        }
        let style = RoutingStyle::from_index(snapshot.arrow_style).ok_or(Error::UnknownStyle(snapshot.arrow_style))?;
        let ending = EndingCap::from_index(snapshot.arrow_ending_style)
            .ok_or(Error::UnknownEndingStyle(snapshot.arrow_ending_style))?;

        let mut nodes = IndexMap::with_capacity(snapshot.elements.len());
        for record in &snapshot.elements {
            let node = Node::try_from(record)?;
            if nodes.contains_key(&node.id) {
                return Err(Error::DuplicateNodeId(node.id));
            }
            nodes.insert(node.id.clone(), node);
        }

        self.nodes = nodes;
        self.zoom_factor = snapshot.zoom_factor;
        self.viewport_size = Size::new(snapshot.dashboard_size_width, snapshot.dashboard_size_height);
        self.grid_background = snapshot.grid_background_params.clone();
        self.block_default_zoom_gestures = snapshot.block_default_zoom_gestures;
        self.config.minimum_zoom_factor = snapshot.minimum_zoom_factor;
        self.default_style = EdgeStyle {
            style,
            ending,
            color: Color::from_argb_encoded(snapshot.arrow_color),
            ending_size: snapshot.arrow_ending_size,
            ..self.default_style.clone()
        };
        self.recenter_nodes();
        log::info!("loaded snapshot with {} nodes", self.nodes.len());
        self.notify();
        Ok(())
    }
}
