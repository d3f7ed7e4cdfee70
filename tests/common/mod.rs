//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use slint_flow_chart::{ChangeListener, Dashboard, EdgeCreatedListener, Node};
use std::cell::RefCell;
use std::rc::Rc;

/// Tracks listener invocations for testing.
///
/// Each field records calls to the corresponding listener with their arguments.
#[derive(Default, Clone)]
pub struct CallbackTracker {
    /// Node count seen by each change notification
    pub changed: Rc<RefCell<Vec<usize>>>,
    /// (source_id, dest_id)
    pub edge_created: Rc<RefCell<Vec<(String, String)>>>,
}

impl CallbackTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register both listeners on a dashboard and return them for later
    /// removal.
    pub fn attach(&self, dashboard: &mut Dashboard) -> (ChangeListener, EdgeCreatedListener) {
        let changed: ChangeListener = {
            let changed = self.changed.clone();
            Rc::new(move |d: &Dashboard| changed.borrow_mut().push(d.node_count()))
        };
        let edge_created: EdgeCreatedListener = {
            let edge_created = self.edge_created.clone();
            Rc::new(move |source: &Node, dest: &Node| {
                edge_created
                    .borrow_mut()
                    .push((source.id().to_string(), dest.id().to_string()))
            })
        };
        dashboard.add_change_listener(changed.clone());
        dashboard.add_edge_created_listener(edge_created.clone());
        (changed, edge_created)
    }

    pub fn change_count(&self) -> usize {
        self.changed.borrow().len()
    }

    /// Clear all recorded callbacks.
    pub fn clear(&self) {
        self.changed.borrow_mut().clear();
        self.edge_created.borrow_mut().clear();
    }
}

/// Assert two floats are equal within the routing tolerance.
#[track_caller]
pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() <= 1e-3,
        "expected {expected}, got {actual}"
    );
}
