//! Drag-to-connect interaction state.
//!
//! The input layer drives a [`ConnectionDrag`] from pointer events. While
//! dragging it asks for preview paths; only [`ConnectionDrag::commit`]
//! touches the dashboard.

use crate::dashboard::Dashboard;
use crate::geometry::{Point, SideAnchor};
use crate::graph::EdgeRef;
use crate::path::RoutedPath;
use crate::routing::{route, RouteRequest};
use crate::style::EdgeStyle;

/// State of an edge being dragged out of a node.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConnectionDrag {
    #[default]
    Idle,
    /// Following the pointer, no destination under it.
    Dragging {
        source_id: String,
        start_anchor: SideAnchor,
        pointer: Point,
    },
    /// The pointer is over an anchor of another node.
    Hovering {
        source_id: String,
        start_anchor: SideAnchor,
        dest_id: String,
        end_anchor: SideAnchor,
        pointer: Point,
    },
}

impl ConnectionDrag {
    /// Start dragging from an anchor of `source_id`. Replaces any drag in
    /// progress.
    pub fn begin(&mut self, source_id: impl Into<String>, start_anchor: SideAnchor, pointer: Point) {
        *self = ConnectionDrag::Dragging {
            source_id: source_id.into(),
            start_anchor,
            pointer,
        };
    }

    /// Update the pointer (graph space) and the anchor under it, if any.
    ///
    /// A candidate on the source node itself is ignored.
    pub fn pointer_moved(&mut self, pointer: Point, candidate: Option<(String, SideAnchor)>) {
        let (source_id, start_anchor) = match std::mem::take(self) {
            ConnectionDrag::Idle => return,
            ConnectionDrag::Dragging { source_id, start_anchor, .. }
            | ConnectionDrag::Hovering { source_id, start_anchor, .. } => (source_id, start_anchor),
        };
        *self = match candidate {
            Some((dest_id, end_anchor)) if dest_id != source_id => ConnectionDrag::Hovering {
                source_id,
                start_anchor,
                dest_id,
                end_anchor,
                pointer,
            },
            _ => ConnectionDrag::Dragging {
                source_id,
                start_anchor,
                pointer,
            },
        };
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, ConnectionDrag::Idle)
    }

    pub fn source_id(&self) -> Option<&str> {
        match self {
            ConnectionDrag::Idle => None,
            ConnectionDrag::Dragging { source_id, .. } | ConnectionDrag::Hovering { source_id, .. } => {
                Some(source_id)
            }
        }
    }

    /// Path to draw for the edge being dragged.
    ///
    /// `style` is at zoom factor 1, like styles passed to
    /// [`Dashboard::add_edge`]. While no destination is hovered the edge ends
    /// at the pointer with a center anchor.
    pub fn preview(&self, dashboard: &Dashboard, style: &EdgeStyle) -> Option<RoutedPath> {
        let mut style = style.clone();
        style.rescale(1.0, dashboard.zoom_factor());

        let (source_id, end, dest) = match self {
            ConnectionDrag::Idle => return None,
            ConnectionDrag::Dragging { source_id, start_anchor, pointer } => {
                style.start_anchor = *start_anchor;
                style.end_anchor = SideAnchor::CENTER;
                (source_id, *pointer, None)
            }
            ConnectionDrag::Hovering {
                source_id,
                start_anchor,
                dest_id,
                end_anchor,
                ..
            } => {
                let dest = dashboard.node_rect(dest_id)?;
                style.start_anchor = *start_anchor;
                style.end_anchor = *end_anchor;
                (source_id, dest.anchor_point(*end_anchor), Some(dest))
            }
        };

        let source = dashboard.node_rect(source_id)?;
        let request = RouteRequest {
            start: source.anchor_point(style.start_anchor),
            end,
            source,
            dest,
            style: &style,
            waypoints: &[],
        };
        Some(route(&request, &dashboard.config().router))
    }

    /// Finish the drag. Creates the edge when a destination is hovered and
    /// returns to idle either way.
    pub fn commit(&mut self, dashboard: &mut Dashboard, style: EdgeStyle) -> Option<EdgeRef> {
        match std::mem::take(self) {
            ConnectionDrag::Hovering {
                source_id,
                start_anchor,
                dest_id,
                end_anchor,
                ..
            } => {
                let style = style.anchored(start_anchor, end_anchor);
                dashboard
                    .add_edge(&source_id, &dest_id, style)
                    .then(|| EdgeRef::new(source_id, dest_id))
            }
            ConnectionDrag::Dragging { source_id, .. } => {
                log::debug!("connection from `{}` dropped on empty space", source_id);
                None
            }
            ConnectionDrag::Idle => None,
        }
    }

    pub fn cancel(&mut self) {
        *self = ConnectionDrag::Idle;
    }
}
