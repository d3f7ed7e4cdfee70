//! Tunable constants of the dashboard and the routers.
//!
//! Both structs deserialize with every field optional, so a host can keep
//! them in its own settings file and only override what it needs.

use serde::{Deserialize, Serialize};

/// Constants of the edge routers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouterConfig {
    /// Distance an orthogonal detour keeps from a node it steps around.
    pub clearance: f32,
    /// Samples per curved segment when measuring distance for hit testing.
    pub hit_samples: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            clearance: 10.0,
            hit_samples: 20,
        }
    }
}

/// Dashboard-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardConfig {
    /// Smallest zoom factor `set_zoom` accepts.
    pub minimum_zoom_factor: f32,
    /// Size of the connection handles at zoom factor 1. Node rectangles are
    /// inset by half of it inside the node's widget area.
    pub handler_size: f32,
    pub router: RouterConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            minimum_zoom_factor: 0.25,
            handler_size: 15.0,
            router: RouterConfig::default(),
        }
    }
}
