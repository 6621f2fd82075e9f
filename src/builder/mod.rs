//! Builder API for ergonomic transition construction.
//!
//! This module provides fluent builders and shortcuts over the core
//! registration calls (`add_target*`, `add_condition`).

pub mod error;
pub mod transition;

pub use error::BuildError;
pub use transition::TransitionBuilder;

use crate::core::{HasContext, State, Transition};
use std::rc::Rc;

/// Create an unconditional transition into a single state.
///
/// # Example
///
/// ```
/// use statetree::builder::transition_to;
/// use statetree::{State, StateContext};
///
/// let root = StateContext::<()>::new();
/// let idle = State::new("Idle");
/// let transition = transition_to(&root, &idle);
///
/// transition.execute().unwrap();
/// assert_eq!(root.active_state().unwrap().name(), "Idle");
/// ```
pub fn transition_to<E: 'static>(owner: &impl HasContext<E>, state: &Rc<State<E>>) -> Rc<Transition<E>> {
    let transition = Transition::new(owner);
    transition.add_target(state);
    transition
}

/// Create a transition into a single state guarded by a predicate.
///
/// # Example
///
/// ```
/// use statetree::builder::guarded_transition;
/// use statetree::{State, StateContext};
///
/// let root = StateContext::<()>::new();
/// let never = guarded_transition(&root, &State::new("Unreachable"), || false);
///
/// assert!(!never.invoke());
/// ```
pub fn guarded_transition<E, F>(owner: &impl HasContext<E>, state: &Rc<State<E>>, predicate: F) -> Rc<Transition<E>>
where
    E: 'static,
    F: Fn() -> bool + 'static,
{
    let transition = transition_to(owner, state);
    transition.add_condition(predicate);
    transition
}
