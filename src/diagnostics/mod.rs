//! Observability helpers built on leaf-change notifications.
//!
//! The core never logs leaf changes on its own behalf; these helpers subscribe
//! to a context the same way any application listener would.

pub mod error;
pub mod logging;

pub use error::DiagnosticsError;
pub use logging::init_logging;

use crate::core::{HasContext, ListenerId, StateContext};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Record of a single leaf change observed below a context.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeafChange {
    /// Name of the new active leaf, or `None` when the branch became empty
    pub leaf: Option<String>,
    /// When the change was observed
    pub timestamp: DateTime<Utc>,
}

/// Emit a tracing event for every leaf change below `context`.
pub fn trace_leaf_changes<E: 'static>(context: &impl HasContext<E>) -> ListenerId {
    context.state_context().on_leaf_changed(|leaf| {
        tracing::info!(leaf = leaf.map(|s| s.name()), "active leaf changed");
    })
}

/// Records leaf changes observed below a context.
///
/// The recorder unsubscribes when dropped. It only observes; it cannot
/// restore an earlier configuration.
///
/// # Example
///
/// ```rust
/// use statetree::diagnostics::LeafRecorder;
/// use statetree::{State, StateContext};
///
/// let root = StateContext::<()>::new();
/// let recorder = LeafRecorder::attach(&root);
///
/// root.switch_state(Some(State::new("Boot")));
/// root.switch_state(Some(State::new("Ready")));
///
/// assert_eq!(
///     recorder.path(),
///     vec![Some("Boot".to_string()), Some("Ready".to_string())]
/// );
/// ```
pub struct LeafRecorder<E: 'static> {
    context: Weak<StateContext<E>>,
    listener: ListenerId,
    records: Rc<RefCell<Vec<LeafChange>>>,
}

impl<E: 'static> LeafRecorder<E> {
    /// Subscribe to leaf changes below `context`.
    pub fn attach(context: &impl HasContext<E>) -> Self {
        let context = context.state_context();
        let records = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&records);
        let listener = context.on_leaf_changed(move |leaf| {
            sink.borrow_mut().push(LeafChange {
                leaf: leaf.map(|s| s.name().to_string()),
                timestamp: Utc::now(),
            });
        });

        Self {
            context: Rc::downgrade(context),
            listener,
            records,
        }
    }

    /// All recorded changes, oldest first.
    pub fn records(&self) -> Vec<LeafChange> {
        self.records.borrow().clone()
    }

    /// Sequence of leaf names, oldest first.
    pub fn path(&self) -> Vec<Option<String>> {
        self.records
            .borrow()
            .iter()
            .map(|change| change.leaf.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.records.borrow_mut().clear();
    }

    /// Export the recorded changes as JSON.
    pub fn to_json(&self) -> Result<String, DiagnosticsError> {
        Ok(serde_json::to_string(&*self.records.borrow())?)
    }
}

impl<E: 'static> Drop for LeafRecorder<E> {
    fn drop(&mut self) {
        if let Some(context) = self.context.upgrade() {
            context.remove_leaf_listener(self.listener);
        }
    }
}
