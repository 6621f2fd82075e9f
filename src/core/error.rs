//! Errors raised while executing transitions.

use thiserror::Error;

/// Errors that can occur when a transition is executed.
///
/// All of these are programming errors in how the machine was assembled.
/// A failing transition performs no state mutation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Attempt to execute an empty transition")]
    EmptyTransition,

    #[error("Transition owner context has been dropped")]
    OwnerDropped,

    #[error("Target state '{target}' requires transition input but none was supplied")]
    MissingInput { target: String },
}
