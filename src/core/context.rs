//! State contexts: tree nodes that route events down the active branch.
//!
//! A context holds at most one active child state and at most one pending
//! transition. Events travel to the deepest active state first; only after the
//! whole dispatch has unwound does the outermost call commit a transition, and
//! it commits exactly one: the one armed nearest to the root.

use super::error::TransitionError;
use super::state::State;
use super::transition::PendingTransition;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Whether a dispatch call may commit a pending transition once the event
/// has been offered to the active branch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommitPolicy {
    /// Commit the first pending transition found on the active branch.
    #[default]
    Allow,
    /// Only deliver the event; leave armed transitions pending.
    Defer,
}

impl CommitPolicy {
    pub fn allows_commit(self) -> bool {
        matches!(self, CommitPolicy::Allow)
    }
}

/// Handle returned when subscribing to leaf changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Callback invoked with the new active leaf (or `None`) below a context.
pub type LeafListener<E> = Rc<dyn Fn(Option<&Rc<State<E>>>)>;

/// Anything that exposes a state context: a root context or a state.
pub trait HasContext<E> {
    fn state_context(&self) -> &Rc<StateContext<E>>;
}

impl<E> HasContext<E> for Rc<StateContext<E>> {
    fn state_context(&self) -> &Rc<StateContext<E>> {
        self
    }
}

impl<E> HasContext<E> for State<E> {
    fn state_context(&self) -> &Rc<StateContext<E>> {
        self.context()
    }
}

impl<E> HasContext<E> for Rc<State<E>> {
    fn state_context(&self) -> &Rc<StateContext<E>> {
        self.context()
    }
}

/// A node in the state hierarchy.
///
/// Root contexts are created with [`StateContext::new`]; every [`State`] owns
/// one as well, which is what allows arbitrary nesting.
///
/// # Example
///
/// ```rust
/// use statetree::{State, StateContext};
///
/// let root = StateContext::<()>::new();
/// let idle = State::new("Idle");
///
/// root.switch_state(Some(idle.clone()));
/// assert_eq!(root.active_state().map(|s| s.name().to_string()), Some("Idle".into()));
/// ```
pub struct StateContext<E> {
    this: Weak<StateContext<E>>,
    active: RefCell<Option<Rc<State<E>>>>,
    pending: RefCell<Option<Rc<dyn PendingTransition>>>,
    parent: RefCell<Weak<StateContext<E>>>,
    leaf_listeners: RefCell<Vec<(ListenerId, LeafListener<E>)>>,
    next_listener: Cell<u64>,
    transitions: RefCell<Vec<Rc<dyn PendingTransition>>>,
}

impl<E: 'static> StateContext<E> {
    /// Create a detached context with no active state.
    pub fn new() -> Rc<Self> {
        Rc::new_cyclic(|this| StateContext {
            this: this.clone(),
            active: RefCell::new(None),
            pending: RefCell::new(None),
            parent: RefCell::new(Weak::new()),
            leaf_listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(0),
            transitions: RefCell::new(Vec::new()),
        })
    }

    /// Immediate active child.
    pub fn active_state(&self) -> Option<Rc<State<E>>> {
        self.active.borrow().clone()
    }

    /// Deepest state reachable by following active children.
    pub fn active_leaf_state(&self) -> Option<Rc<State<E>>> {
        let active = self.active_state()?;
        let leaf = active.context().active_leaf_state();
        Some(leaf.unwrap_or(active))
    }

    /// Whether this context itself has an armed transition.
    pub fn has_pending_transition(&self) -> bool {
        self.pending.borrow().is_some()
    }

    /// Number of transitions bound to this context.
    pub fn transition_count(&self) -> usize {
        self.transitions.borrow().len()
    }

    /// Replace the active child unconditionally.
    ///
    /// The previous child's own subtree is cleared first so exits run from
    /// the leaf upwards, then the previous child exits and the new one enters.
    /// Switching to the state that is already active runs both hooks again.
    /// Leaf listeners are notified whenever the resolved leaf below this
    /// context differs from the one before the switch.
    pub fn switch_state(&self, new_state: Option<Rc<State<E>>>) {
        let old_state = self.active_state();
        let old_leaf = self.active_leaf_state();

        tracing::debug!(
            from = old_state.as_ref().map(|s| s.name()),
            to = new_state.as_ref().map(|s| s.name()),
            "switching state"
        );

        if let Some(old) = &old_state {
            old.context().switch_state(None);
            old.exit();
            old.context().detach_parent();
        }

        *self.active.borrow_mut() = new_state.clone();

        if let Some(new) = &new_state {
            new.enter();
            new.context().attach_parent(self.this.clone());
        }

        let leaf = self.active_leaf_state();
        if !same_state(old_leaf.as_ref(), leaf.as_ref()) {
            self.notify_leaf_changed(leaf.as_ref());
        }
    }

    /// Execute the pending transition nearest to this context.
    ///
    /// This context's own slot wins over anything armed deeper on the active
    /// branch. At most one transition runs per call. Returns `Ok(false)` when
    /// nothing is pending.
    pub fn execute_next_transition(&self) -> Result<bool, TransitionError> {
        let pending = self.pending.borrow().clone();
        if let Some(transition) = pending {
            tracing::debug!(transition = %transition.describe(), "committing transition");
            transition.execute()?;
            *self.pending.borrow_mut() = None;
            return Ok(true);
        }

        match self.active_state() {
            Some(active) => active.context().execute_next_transition(),
            None => Ok(false),
        }
    }

    /// Dispatch an event to the active branch and commit one transition.
    pub fn trigger_event(&self, event: &E) -> Result<bool, TransitionError> {
        self.trigger_event_with(event, CommitPolicy::Allow)
    }

    /// Dispatch an event to the active branch.
    ///
    /// The active child sees the event first, with commits deferred. Once it
    /// returns, this level commits the next transition if `policy` allows.
    /// Returns whether the event was handled or a transition was committed.
    pub fn trigger_event_with(&self, event: &E, policy: CommitPolicy) -> Result<bool, TransitionError> {
        let Some(active) = self.active_state() else {
            return Ok(false);
        };

        let mut handled = active.trigger_event_with(event, CommitPolicy::Defer)?;
        if policy.allows_commit() && self.execute_next_transition()? {
            handled = true;
        }
        Ok(handled)
    }

    /// Subscribe to leaf changes anywhere below this context.
    pub fn on_leaf_changed<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(Option<&Rc<State<E>>>) + 'static,
    {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.leaf_listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    /// Remove a leaf listener. Returns whether it was registered.
    pub fn remove_leaf_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.leaf_listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    /// Check that `context` lies on the active branch rooted at `root`.
    pub fn is_active_context(context: &StateContext<E>, root: &StateContext<E>) -> bool {
        if std::ptr::eq(context, root) {
            return true;
        }

        let mut state = root.active_state();
        while let Some(current) = state {
            if std::ptr::eq(current.context().as_ref(), context) {
                return true;
            }
            state = current.context().active_state();
        }
        false
    }

    pub(crate) fn arm(&self, transition: Rc<dyn PendingTransition>) {
        tracing::trace!(transition = %transition.describe(), "arming transition");
        *self.pending.borrow_mut() = Some(transition);
    }

    pub(crate) fn adopt(&self, transition: Rc<dyn PendingTransition>) {
        self.transitions.borrow_mut().push(transition);
    }

    fn attach_parent(&self, parent: Weak<StateContext<E>>) {
        *self.parent.borrow_mut() = parent;
    }

    fn detach_parent(&self) {
        *self.parent.borrow_mut() = Weak::new();
    }

    fn notify_leaf_changed(&self, leaf: Option<&Rc<State<E>>>) {
        let listeners: Vec<LeafListener<E>> = self
            .leaf_listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(leaf);
        }

        let parent = self.parent.borrow().upgrade();
        if let Some(parent) = parent {
            parent.notify_leaf_changed(leaf);
        }
    }
}

fn same_state<E>(a: Option<&Rc<State<E>>>, b: Option<&Rc<State<E>>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

impl<E> fmt::Debug for StateContext<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let active = self.active.borrow();
        f.debug_struct("StateContext")
            .field("active", &active.as_ref().map(|s| s.name().to_string()))
            .field("pending", &self.pending.borrow().is_some())
            .field("transitions", &self.transitions.borrow().len())
            .finish()
    }
}
