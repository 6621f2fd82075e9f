//! Builder for constructing transitions.

use crate::builder::error::BuildError;
use crate::core::{Condition, HasContext, State, StateContext, StateInput, TargetAction, Transition};
use std::rc::Rc;

/// Builder for constructing transitions with a fluent API.
///
/// # Example
///
/// ```rust
/// use statetree::builder::TransitionBuilder;
/// use statetree::{State, StateContext};
///
/// let root = StateContext::<()>::new();
/// let lobby = State::new("Lobby");
///
/// let enter_lobby = TransitionBuilder::new(&root)
///     .to(&lobby)
///     .when(|| true)
///     .build()
///     .unwrap();
///
/// enter_lobby.invoke();
/// root.execute_next_transition().unwrap();
/// assert_eq!(root.active_state().unwrap().name(), "Lobby");
/// ```
pub struct TransitionBuilder<E, I = ()> {
    owner: Rc<StateContext<E>>,
    targets: Vec<(Rc<State<E>>, TargetAction<I>)>,
    conditions: Vec<Condition>,
}

impl<E: 'static> TransitionBuilder<E> {
    /// Start a transition without input owned by `owner`.
    pub fn new(owner: &impl HasContext<E>) -> Self {
        Self::owned_by(owner)
    }
}

impl<E: 'static, I: 'static> TransitionBuilder<E, I> {
    /// Start a transition carrying input of type `I` owned by `owner`.
    pub fn with_input(owner: &impl HasContext<E>) -> Self {
        Self::owned_by(owner)
    }

    fn owned_by(owner: &impl HasContext<E>) -> Self {
        Self {
            owner: Rc::clone(owner.state_context()),
            targets: Vec::new(),
            conditions: Vec::new(),
        }
    }

    /// Append a target state.
    pub fn to(mut self, state: &Rc<State<E>>) -> Self {
        self.targets.push((Rc::clone(state), TargetAction::None));
        self
    }

    /// Append a target with an action run before it enters.
    pub fn to_with<F>(mut self, state: &Rc<State<E>>, action: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.targets
            .push((Rc::clone(state), TargetAction::Plain(Rc::new(action))));
        self
    }

    /// Append a target whose input comes from `source`.
    pub fn to_data<T, F>(self, state: &Rc<State<E>>, input: &StateInput<T>, source: F) -> Self
    where
        T: 'static,
        F: Fn() -> T + 'static,
    {
        let input = input.clone();
        self.to_with(state, move || input.set(source()))
    }

    /// Append a target whose input is converted from the transition input.
    pub fn to_input_map<T, F>(mut self, state: &Rc<State<E>>, input: &StateInput<T>, convert: F) -> Self
    where
        T: 'static,
        F: Fn(&I) -> T + 'static,
    {
        let input = input.clone();
        let action = move |arg: &I| input.set(convert(arg));
        self.targets
            .push((Rc::clone(state), TargetAction::WithInput(Rc::new(action))));
        self
    }

    /// Add a condition using a closure.
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn() -> bool + 'static,
    {
        self.conditions.push(Condition::new(predicate));
        self
    }

    /// Add a prepared condition.
    pub fn condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Build the transition and bind it to its owner.
    pub fn build(self) -> Result<Rc<Transition<E, I>>, BuildError> {
        if self.targets.is_empty() {
            return Err(BuildError::NoTargets);
        }

        let transition = Transition::with_input(&self.owner);
        for (state, action) in self.targets {
            transition.push_binding(&state, action);
        }
        for condition in self.conditions {
            transition.add_condition(condition);
        }
        Ok(transition)
    }
}

impl<E: 'static, I: Clone + 'static> TransitionBuilder<E, I> {
    /// Append a target that receives the transition input unchanged.
    pub fn to_input(self, state: &Rc<State<E>>, input: &StateInput<I>) -> Self {
        self.to_input_map(state, input, I::clone)
    }
}
