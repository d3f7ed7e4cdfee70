//! Per-edge style parameters.
//!
//! [`EdgeStyle`] carries everything the routers need besides the two node
//! rectangles: routing style, stroke and decoration sizes, color, tension and
//! the side anchors the edge leaves from and arrives at.

use crate::geometry::{Size, SideAnchor};
use slint::Color;

pub const DEFAULT_THICKNESS: f32 = 1.7;
pub const DEFAULT_HEAD_RADIUS: f32 = 6.0;
pub const DEFAULT_TAIL_LENGTH: f32 = 25.0;
pub const DEFAULT_TENSION: f32 = 1.0;
pub const DEFAULT_ENDING_SIZE: Size = Size::new(12.0, 16.0);

/// How the path between the two anchors is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoutingStyle {
    /// Two quadratic pieces leaving and entering perpendicular to the sides.
    #[default]
    Curve,
    /// Tension spline through the edge's waypoints.
    Segmented,
    /// Axis-aligned segments.
    Orthogonal,
}

impl RoutingStyle {
    pub const ALL: [RoutingStyle; 3] =
        [RoutingStyle::Curve, RoutingStyle::Segmented, RoutingStyle::Orthogonal];

    /// Index used by the snapshot format.
    pub fn index(self) -> i64 {
        match self {
            RoutingStyle::Curve => 0,
            RoutingStyle::Segmented => 1,
            RoutingStyle::Orthogonal => 2,
        }
    }

    pub fn from_index(index: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.index() == index)
    }
}

/// Decoration drawn where the edge meets its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EndingCap {
    Circle,
    #[default]
    Triangle,
}

impl EndingCap {
    pub fn index(self) -> i64 {
        match self {
            EndingCap::Circle => 0,
            EndingCap::Triangle => 1,
        }
    }

    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(EndingCap::Circle),
            1 => Some(EndingCap::Triangle),
            _ => None,
        }
    }
}

/// Visual and geometric configuration of one edge.
///
/// Length-valued fields (`thickness`, `head_radius`, `tail_length`,
/// `ending_size`) are expressed at the dashboard's current zoom factor and
/// are rescaled together through [`EdgeStyle::rescale`].
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeStyle {
    pub style: RoutingStyle,
    pub thickness: f32,
    pub head_radius: f32,
    /// Length of the stub leaving the source node (orthogonal routing).
    pub tail_length: f32,
    pub color: Color,
    /// Spline tension, only meaningful for [`RoutingStyle::Segmented`].
    pub tension: f32,
    pub start_anchor: SideAnchor,
    pub end_anchor: SideAnchor,
    pub ending: EndingCap,
    pub ending_size: Size,
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self {
            style: RoutingStyle::default(),
            thickness: DEFAULT_THICKNESS,
            head_radius: DEFAULT_HEAD_RADIUS,
            tail_length: DEFAULT_TAIL_LENGTH,
            color: Color::from_rgb_u8(0, 0, 0),
            tension: DEFAULT_TENSION,
            start_anchor: SideAnchor::CENTER_RIGHT,
            end_anchor: SideAnchor::CENTER_LEFT,
            ending: EndingCap::default(),
            ending_size: DEFAULT_ENDING_SIZE,
        }
    }
}

impl EdgeStyle {
    /// Default style with the given routing style.
    pub fn with_style(style: RoutingStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Builder-style anchor setter.
    pub fn anchored(mut self, start: SideAnchor, end: SideAnchor) -> Self {
        self.start_anchor = start;
        self.end_anchor = end;
        self
    }

    /// Spline tension, clamped to be non-negative.
    pub fn effective_tension(&self) -> f32 {
        self.tension.max(0.0)
    }

    /// Rescale every relative length by `new_factor / old_factor`.
    ///
    /// Absolute positions are never touched here; see
    /// [`Point::rescale_around`](crate::geometry::Point::rescale_around).
    pub fn rescale(&mut self, old_factor: f32, new_factor: f32) {
        let ratio = new_factor / old_factor;
        self.thickness *= ratio;
        self.head_radius *= ratio;
        self.tail_length *= ratio;
        self.ending_size = self.ending_size.scaled(ratio);
    }

    /// Packed 32-bit ARGB color, as stored in snapshots.
    pub fn argb(&self) -> u32 {
        self.color.as_argb_encoded()
    }
}
