//! Core hierarchical state machine types.
//!
//! This module contains the dispatch protocol of the state tree:
//! - Contexts holding one active child and one pending transition
//! - States with lifecycle hooks and event handlers
//! - Transitions that arm on invoke and switch several levels on execute
//! - Triggers and conditions
//!
//! Everything here is single-threaded and synchronous. Nothing suspends, and
//! at most one transition commits per dispatched event.

mod condition;
mod context;
mod error;
mod input;
mod state;
mod transition;
mod trigger;

pub use condition::Condition;
pub use context::{CommitPolicy, HasContext, LeafListener, ListenerId, StateContext};
pub use error::TransitionError;
pub use input::StateInput;
pub use state::{EventReply, State, StateBehavior};
pub use transition::Transition;
pub use trigger::Trigger;

pub(crate) use transition::TargetAction;
