//! Input slots for states that expect data from an inbound transition.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Single-value slot a transition fills just before switching to a state.
///
/// The state reads it in its enter hook. Writing again before the value is
/// read replaces it.
///
/// # Example
///
/// ```rust
/// use statetree::{State, StateContext, StateInput, Transition};
///
/// let root = StateContext::<()>::new();
/// let level = StateInput::<u32>::new();
/// let playing = State::new("Playing");
///
/// let seen = level.clone();
/// playing.on_enter(move || assert_eq!(seen.get(), Some(3)));
///
/// let start = Transition::<(), u32>::with_input(&root);
/// start.add_target_input(&playing, &level);
/// start.execute_with(3u32).unwrap();
/// ```
pub struct StateInput<T> {
    slot: Rc<RefCell<Option<T>>>,
}

impl<T> StateInput<T> {
    pub fn new() -> Self {
        StateInput {
            slot: Rc::new(RefCell::new(None)),
        }
    }

    /// Store a value, replacing any previous one.
    pub fn set(&self, value: T) {
        *self.slot.borrow_mut() = Some(value);
    }

    /// Remove and return the stored value.
    pub fn take(&self) -> Option<T> {
        self.slot.borrow_mut().take()
    }

    pub fn is_set(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Run `f` against the stored value without removing it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.slot.borrow().as_ref().map(f)
    }
}

impl<T: Clone> StateInput<T> {
    pub fn get(&self) -> Option<T> {
        self.slot.borrow().clone()
    }
}

impl<T> Clone for StateInput<T> {
    fn clone(&self) -> Self {
        StateInput {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T> Default for StateInput<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for StateInput<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StateInput").field(&self.slot.borrow()).finish()
    }
}
