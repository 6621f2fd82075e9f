//! Statetree: a hierarchical finite state machine core
//!
//! A machine is a tree of contexts. Each context owns at most one active
//! child state, and every state is itself a context, so states nest to any
//! depth. Events travel down the active branch to the deepest state first;
//! transitions armed while handling them are committed afterwards, exactly
//! one per dispatched event, nearest to the root first.
//!
//! # Core Concepts
//!
//! - **StateContext**: Tree node with an active child and a pending transition
//! - **State**: A context with enter/exit hooks and event handlers
//! - **Transition**: Deferred switch of one or more nesting levels
//! - **Trigger**: Narrow handle that can only arm a transition
//! - **Condition**: Predicate guarding a transition
//!
//! # Example
//!
//! ```rust
//! use statetree::{EventReply, State, StateContext, Transition};
//!
//! #[derive(Debug)]
//! enum Door {
//!     Open,
//!     Close,
//! }
//!
//! let root = StateContext::<Door>::new();
//! let closed = State::<Door>::new("Closed");
//! let opened = State::new("Opened");
//!
//! let open = Transition::new(&root);
//! open.add_target(&opened);
//!
//! let trigger = open.trigger();
//! closed.on_event(move |event| match event {
//!     Door::Open => {
//!         trigger.invoke();
//!         EventReply::Handled
//!     }
//!     _ => EventReply::Unsupported,
//! });
//!
//! root.switch_state(Some(closed));
//! assert_eq!(root.trigger_event(&Door::Close), Ok(false));
//! assert_eq!(root.trigger_event(&Door::Open), Ok(true));
//! assert_eq!(root.active_state().unwrap().name(), "Opened");
//! ```

pub mod builder;
pub mod core;
pub mod diagnostics;

// Re-export commonly used types
pub use core::{
    CommitPolicy, Condition, EventReply, HasContext, LeafListener, ListenerId, State,
    StateBehavior, StateContext, StateInput, Transition, TransitionError, Trigger,
};
