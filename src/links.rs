//! Routed edge paths for rendering.
//!
//! This module provides [`EdgePathManager`], which turns the dashboard's edges
//! into SVG path commands and keeps an optional Slint model in sync with them.
//!
//! # Example
//!
//! ```ignore
//! use slint_flow_chart::{Dashboard, EdgePathManager};
//! use std::{cell::RefCell, rc::Rc};
//!
//! let manager = Rc::new(RefCell::new(EdgePathManager::new()));
//! let model = Rc::new(slint::VecModel::<EdgePathItem>::default());
//! manager.borrow_mut().bind_model(model.clone(), |p| EdgePathItem {
//!     commands: p.commands.clone(),
//!     color: p.color,
//!     width: p.thickness,
//! });
//! window.set_edge_paths(slint::ModelRc::from(model));
//!
//! // Refresh on every dashboard change
//! dashboard.add_change_listener(EdgePathManager::listener(&manager));
//! ```

use crate::dashboard::{ChangeListener, Dashboard};
use crate::graph::EdgeRef;
use slint::{Model, ModelRc, SharedString, VecModel};
use std::cell::RefCell;
use std::rc::Rc;

/// One routed edge, ready for a paint surface.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgePath {
    pub source_id: SharedString,
    pub dest_id: SharedString,
    /// SVG path of the edge's stroke.
    pub commands: SharedString,
    /// Closed SVG outline of the ending cap.
    pub cap_commands: SharedString,
    pub color: slint::Color,
    pub thickness: f32,
}

impl EdgePath {
    pub fn edge_ref(&self) -> EdgeRef {
        EdgeRef::new(self.source_id.as_str(), self.dest_id.as_str())
    }
}

/// Internal trait for auto-syncing to Slint models.
trait ModelSyncer {
    fn sync(&self, paths: &[EdgePath]);
}

/// Concrete implementation of ModelSyncer for a specific item type.
struct ConcreteModelSyncer<P, F> {
    model: Rc<VecModel<P>>,
    constructor: F,
}

impl<P, F> ModelSyncer for ConcreteModelSyncer<P, F>
where
    P: Clone + 'static,
    F: Fn(&EdgePath) -> P,
{
    fn sync(&self, paths: &[EdgePath]) {
        sync_model(&self.model, paths, &self.constructor);
    }
}

/// Update rows in place, push new ones and drop the excess.
fn sync_model<P, F>(model: &VecModel<P>, paths: &[EdgePath], constructor: F)
where
    P: Clone + 'static,
    F: Fn(&EdgePath) -> P,
{
    for (i, path) in paths.iter().enumerate() {
        let item = constructor(path);
        if i < model.row_count() {
            model.set_row_data(i, item);
        } else {
            model.push(item);
        }
    }
    while model.row_count() > paths.len() {
        model.remove(model.row_count() - 1);
    }
}

/// Keeps the rendered paths of every edge of a dashboard.
///
/// # Auto-Sync Mode
///
/// Use [`bind_model`](Self::bind_model) to enable automatic synchronization
/// to a Slint `VecModel`. After binding, every call to [`update`](Self::update)
/// also updates the Slint model.
#[derive(Default)]
pub struct EdgePathManager {
    paths: Vec<EdgePath>,
    /// Revision of the dashboard the paths were computed from.
    revision: Option<u64>,
    syncer: Option<Box<dyn ModelSyncer>>,
}

impl EdgePathManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind to a Slint model for automatic synchronization.
    ///
    /// # Arguments
    ///
    /// * `model` - The VecModel to sync to
    /// * `constructor` - Builds a model item from an [`EdgePath`]
    pub fn bind_model<P, F>(&mut self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&EdgePath) -> P + 'static,
    {
        self.syncer = Some(Box::new(ConcreteModelSyncer { model, constructor }));
        if let Some(syncer) = &self.syncer {
            syncer.sync(&self.paths);
        }
    }

    /// Recompute every path. Orphaned edges are skipped.
    pub fn update(&mut self, dashboard: &Dashboard) {
        self.paths = dashboard
            .routed_edges()
            .into_iter()
            .filter_map(|(edge, path)| {
                let style = dashboard.find_edge_between(&edge.source, &edge.dest)?.style();
                Some(EdgePath {
                    source_id: edge.source.as_str().into(),
                    dest_id: edge.dest.as_str().into(),
                    commands: path.to_svg_commands().into(),
                    cap_commands: path.cap.map(|c| c.to_svg_commands()).unwrap_or_default().into(),
                    color: style.color,
                    thickness: style.thickness,
                })
            })
            .collect();
        self.revision = Some(dashboard.revision());

        if let Some(syncer) = &self.syncer {
            syncer.sync(&self.paths);
        }
    }

    /// A dashboard change listener refreshing `manager`.
    ///
    /// The listener holds a weak reference, so dropping the manager turns it
    /// into a no-op.
    pub fn listener(manager: &Rc<RefCell<Self>>) -> ChangeListener {
        let weak = Rc::downgrade(manager);
        Rc::new(move |dashboard: &Dashboard| {
            if let Some(manager) = weak.upgrade() {
                manager.borrow_mut().update(dashboard);
            }
        })
    }

    pub fn paths(&self) -> &[EdgePath] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Whether the paths reflect the dashboard's latest change.
    pub fn is_current(&self, dashboard: &Dashboard) -> bool {
        self.revision == Some(dashboard.revision())
    }

    pub fn find(&self, source_id: &str, dest_id: &str) -> Option<&EdgePath> {
        self.paths
            .iter()
            .find(|p| p.source_id.as_str() == source_id && p.dest_id.as_str() == dest_id)
    }

    /// Create a standalone Slint model of the current paths.
    pub fn create_paths_model<P, F>(&self, constructor: F) -> ModelRc<P>
    where
        P: Clone + 'static,
        F: Fn(&EdgePath) -> P,
    {
        let items: Vec<P> = self.paths.iter().map(constructor).collect();
        ModelRc::from(Rc::new(VecModel::from(items)))
    }

    /// Update an existing model in place.
    pub fn update_paths_model<P, F>(&self, model: &VecModel<P>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&EdgePath) -> P,
    {
        sync_model(model, &self.paths, constructor);
    }
}
