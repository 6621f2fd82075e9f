//! Narrow handles for arming transitions.

use super::transition::Transition;
use std::fmt;
use std::rc::Weak;

/// Handle that can arm a transition but not inspect or execute it.
///
/// Triggers hold their transition weakly, so a state's handler may keep a
/// trigger of an ancestor's transition without creating a reference cycle.
/// Invoking a trigger whose transition is gone does nothing.
///
/// ```compile_fail
/// use statetree::{StateContext, Transition};
///
/// let root = StateContext::<()>::new();
/// let trigger = Transition::new(&root).trigger();
/// trigger.is_bound();
/// ```
pub struct Trigger<E, I = ()> {
    transition: Weak<Transition<E, I>>,
}

impl<E, I> Trigger<E, I> {
    pub(crate) fn new(transition: Weak<Transition<E, I>>) -> Self {
        Trigger { transition }
    }

    pub(crate) fn is_bound(&self) -> bool {
        self.transition.strong_count() > 0
    }
}

impl<E: 'static> Trigger<E> {
    pub fn invoke(&self) {
        self.invoke_with(());
    }
}

impl<E: 'static, I: 'static> Trigger<E, I> {
    /// Arm the transition with `arg` if its conditions hold.
    pub fn invoke_with(&self, arg: I) {
        match self.transition.upgrade() {
            Some(transition) => {
                transition.invoke_with(arg);
            }
            None => tracing::trace!("trigger invoked after its transition was dropped"),
        }
    }
}

impl<E, I> Clone for Trigger<E, I> {
    fn clone(&self) -> Self {
        Trigger {
            transition: self.transition.clone(),
        }
    }
}

impl<E, I> fmt::Debug for Trigger<E, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("bound", &self.is_bound())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{State, StateContext, Transition};
    use std::rc::Rc;

    #[test]
    fn trigger_arms_its_transition() {
        let root = StateContext::<()>::new();
        let a = State::new("A");
        let transition = Transition::new(&root);
        transition.add_target(&a);

        let trigger = transition.trigger();
        trigger.invoke();

        assert!(root.has_pending_transition());
        assert!(root.active_state().is_none());
        root.execute_next_transition().unwrap();
        assert!(Rc::ptr_eq(&root.active_state().unwrap(), &a));
    }

    #[test]
    fn typed_trigger_stashes_input() {
        let root = StateContext::<()>::new();
        let seen = Rc::new(std::cell::Cell::new(0));
        let transition = Transition::<(), i32>::with_input(&root);
        let sink = Rc::clone(&seen);
        transition.add_target_input_action(&State::new("A"), move |n| sink.set(*n));

        transition.trigger().invoke_with(-4);
        root.execute_next_transition().unwrap();
        assert_eq!(seen.get(), -4);
    }

    #[test]
    fn trigger_outliving_its_transition_is_inert() {
        let root = StateContext::<()>::new();
        let trigger = {
            let owner = StateContext::<()>::new();
            let transition = Transition::new(&owner);
            transition.add_target(&State::new("A"));
            transition.trigger()
        };

        assert!(!trigger.is_bound());
        trigger.invoke();
        assert!(!root.has_pending_transition());
    }
}
