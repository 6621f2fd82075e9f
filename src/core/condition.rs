//! Conditions guarding transitions.
//!
//! A condition is a zero-argument predicate evaluated when a transition is
//! invoked. Conditions should be pure: they are evaluated in an unspecified
//! order and may be skipped once one of them fails.

use std::fmt;
use std::rc::Rc;

/// Zero-argument predicate that must hold for a transition to arm.
///
/// # Example
///
/// ```rust
/// use statetree::Condition;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let ready = Rc::new(Cell::new(false));
/// let flag = Rc::clone(&ready);
/// let condition = Condition::new(move || flag.get());
///
/// assert!(!condition.check());
/// ready.set(true);
/// assert!(condition.check());
/// ```
#[derive(Clone, Default)]
pub struct Condition {
    predicate: Option<Rc<dyn Fn() -> bool>>,
}

impl Condition {
    /// Create a condition from a predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn() -> bool + 'static,
    {
        Condition {
            predicate: Some(Rc::new(predicate)),
        }
    }

    /// A condition without a predicate. It always holds.
    pub fn always() -> Self {
        Condition { predicate: None }
    }

    /// Evaluate the condition.
    pub fn check(&self) -> bool {
        self.predicate.as_ref().map_or(true, |p| p())
    }
}

impl<F> From<F> for Condition
where
    F: Fn() -> bool + 'static,
{
    fn from(predicate: F) -> Self {
        Condition::new(predicate)
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("always", &self.predicate.is_none())
            .finish()
    }
}

/// Check that every condition holds. An empty list holds.
pub(crate) fn all_hold(conditions: &[Condition]) -> bool {
    conditions.iter().all(Condition::check)
}
