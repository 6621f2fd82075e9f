//! States: contexts with lifecycle hooks and event handlers.
//!
//! A [`State`] embeds its own [`StateContext`], so any state can hold an
//! active child of its own. Behavior is attached through a small registration
//! table (enter hooks, exit hooks, event handlers) or through a
//! [`StateBehavior`] implementation.

use super::context::{CommitPolicy, ListenerId, StateContext};
use super::error::TransitionError;
use std::borrow::Cow;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// How a state responded to an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventReply {
    /// The state has no handler for this event.
    Unsupported,
    /// A handler saw the event and left it unhandled.
    Declined,
    /// A handler handled the event.
    Handled,
}

impl EventReply {
    pub fn is_handled(self) -> bool {
        matches!(self, EventReply::Handled)
    }
}

impl From<bool> for EventReply {
    fn from(handled: bool) -> Self {
        if handled {
            EventReply::Handled
        } else {
            EventReply::Declined
        }
    }
}

/// Trait form of a state's behavior.
///
/// All methods default to doing nothing; `handle_event` defaults to
/// [`EventReply::Unsupported`]. Methods take `&self` because hooks may run
/// re-entrantly while the machine is dispatching; keep mutable data in cells.
///
/// # Example
///
/// ```rust
/// use statetree::{EventReply, State, StateBehavior, StateContext};
/// use std::cell::Cell;
///
/// #[derive(Default)]
/// struct Counter {
///     clicks: Cell<u32>,
/// }
///
/// impl StateBehavior<&'static str> for Counter {
///     fn handle_event(&self, event: &&'static str) -> EventReply {
///         match *event {
///             "click" => {
///                 self.clicks.set(self.clicks.get() + 1);
///                 EventReply::Handled
///             }
///             _ => EventReply::Unsupported,
///         }
///     }
/// }
///
/// let root = StateContext::<&'static str>::new();
/// root.switch_state(Some(State::with_behavior("Counting", Counter::default())));
/// assert_eq!(root.trigger_event(&"click"), Ok(true));
/// assert_eq!(root.trigger_event(&"scroll"), Ok(false));
/// ```
pub trait StateBehavior<E> {
    fn enter(&self) {}

    fn exit(&self) {}

    fn handle_event(&self, _event: &E) -> EventReply {
        EventReply::Unsupported
    }
}

type Hook = Rc<dyn Fn()>;
type EventHandler<E> = Rc<dyn Fn(&E) -> EventReply>;

/// A behavioral unit in the hierarchy.
pub struct State<E> {
    name: Cow<'static, str>,
    context: Rc<StateContext<E>>,
    enter_hooks: RefCell<Vec<Hook>>,
    exit_hooks: RefCell<Vec<Hook>>,
    handlers: RefCell<Vec<EventHandler<E>>>,
}

impl<E> State<E> {
    /// Name used in logs and diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The context holding this state's own active child.
    pub fn context(&self) -> &Rc<StateContext<E>> {
        &self.context
    }
}

impl<E: 'static> State<E> {
    /// Create a state with no hooks and no handlers.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Rc<Self> {
        Rc::new(State {
            name: name.into(),
            context: StateContext::new(),
            enter_hooks: RefCell::new(Vec::new()),
            exit_hooks: RefCell::new(Vec::new()),
            handlers: RefCell::new(Vec::new()),
        })
    }

    /// Create a state driven by a [`StateBehavior`].
    pub fn with_behavior<B>(name: impl Into<Cow<'static, str>>, behavior: B) -> Rc<Self>
    where
        B: StateBehavior<E> + 'static,
    {
        let state = Self::new(name);
        let behavior = Rc::new(behavior);

        let on_enter = Rc::clone(&behavior);
        state.on_enter(move || on_enter.enter());
        let on_exit = Rc::clone(&behavior);
        state.on_exit(move || on_exit.exit());
        state.on_event(move |event| behavior.handle_event(event));
        state
    }

    /// Register a hook run each time the state is entered.
    pub fn on_enter<F>(&self, hook: F)
    where
        F: Fn() + 'static,
    {
        self.enter_hooks.borrow_mut().push(Rc::new(hook));
    }

    /// Register a hook run each time the state is exited.
    pub fn on_exit<F>(&self, hook: F)
    where
        F: Fn() + 'static,
    {
        self.exit_hooks.borrow_mut().push(Rc::new(hook));
    }

    /// Register an event handler.
    ///
    /// Handlers are consulted in registration order; the first one that does
    /// not answer [`EventReply::Unsupported`] decides the reply.
    pub fn on_event<F>(&self, handler: F)
    where
        F: Fn(&E) -> EventReply + 'static,
    {
        self.handlers.borrow_mut().push(Rc::new(handler));
    }

    pub fn active_state(&self) -> Option<Rc<State<E>>> {
        self.context.active_state()
    }

    pub fn active_leaf_state(&self) -> Option<Rc<State<E>>> {
        self.context.active_leaf_state()
    }

    pub fn has_pending_transition(&self) -> bool {
        self.context.has_pending_transition()
    }

    pub fn switch_state(&self, new_state: Option<Rc<State<E>>>) {
        self.context.switch_state(new_state);
    }

    pub fn execute_next_transition(&self) -> Result<bool, TransitionError> {
        self.context.execute_next_transition()
    }

    pub fn on_leaf_changed<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(Option<&Rc<State<E>>>) + 'static,
    {
        self.context.on_leaf_changed(listener)
    }

    pub fn remove_leaf_listener(&self, id: ListenerId) -> bool {
        self.context.remove_leaf_listener(id)
    }

    pub fn trigger_event(&self, event: &E) -> Result<bool, TransitionError> {
        self.trigger_event_with(event, CommitPolicy::Allow)
    }

    /// Dispatch an event to this state's branch, then to the state itself.
    ///
    /// The active descendants see the event first. Only when none of them
    /// handled it does this state consult its own handlers; if one of them
    /// replied and `policy` allows, a pending transition is committed right
    /// away so a transition armed by this very handler can take effect.
    pub fn trigger_event_with(&self, event: &E, policy: CommitPolicy) -> Result<bool, TransitionError> {
        let mut handled = self.context.trigger_event_with(event, policy)?;
        if handled {
            return Ok(true);
        }

        match self.handle_event(event) {
            EventReply::Unsupported => {}
            reply => {
                handled = reply.is_handled();
                if policy.allows_commit() && self.context.execute_next_transition()? {
                    handled = true;
                }
            }
        }
        Ok(handled)
    }

    pub(crate) fn enter(&self) {
        tracing::trace!(state = %self.name, "enter");
        let hooks = self.enter_hooks.borrow().clone();
        for hook in hooks {
            hook();
        }
    }

    pub(crate) fn exit(&self) {
        tracing::trace!(state = %self.name, "exit");
        let hooks = self.exit_hooks.borrow().clone();
        for hook in hooks {
            hook();
        }
    }

    fn handle_event(&self, event: &E) -> EventReply {
        let handlers = self.handlers.borrow().clone();
        handlers
            .iter()
            .map(|handler| handler(event))
            .find(|reply| *reply != EventReply::Unsupported)
            .unwrap_or(EventReply::Unsupported)
    }
}

impl<E> fmt::Debug for State<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("name", &self.name)
            .field("context", &self.context)
            .finish()
    }
}
