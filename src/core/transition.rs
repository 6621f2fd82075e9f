//! Deferred, multi-level transitions.
//!
//! A transition is bound to one owning context and holds an ordered chain of
//! target states. Invoking it only arms the owner's pending slot; the tree
//! changes when the transition is executed, normally by the dispatch loop
//! committing it after an event has been fully delivered.
//!
//! Executing a chain `[A, B, C]` makes `A` the owner's active child, `B` the
//! active child of `A`, and `C` the active child of `B`, in that order.

use super::condition::{self, Condition};
use super::context::{HasContext, StateContext};
use super::error::TransitionError;
use super::input::StateInput;
use super::state::State;
use super::trigger::Trigger;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Type-erased view of a transition stored in a context's pending slot.
pub(crate) trait PendingTransition {
    fn execute(&self) -> Result<(), TransitionError>;

    fn describe(&self) -> String;
}

/// Per-target action run right before the target is switched in.
pub(crate) enum TargetAction<I> {
    None,
    Plain(Rc<dyn Fn()>),
    WithInput(Rc<dyn Fn(&I)>),
}

impl<I> Clone for TargetAction<I> {
    fn clone(&self) -> Self {
        match self {
            TargetAction::None => TargetAction::None,
            TargetAction::Plain(action) => TargetAction::Plain(Rc::clone(action)),
            TargetAction::WithInput(action) => TargetAction::WithInput(Rc::clone(action)),
        }
    }
}

pub(crate) struct TargetBinding<E, I> {
    state: Rc<State<E>>,
    action: TargetAction<I>,
}

impl<E, I> TargetBinding<E, I> {
    fn needs_input(&self) -> bool {
        matches!(self.action, TargetAction::WithInput(_))
    }

    fn apply(&self, input: Option<&I>) {
        match (&self.action, input) {
            (TargetAction::Plain(action), _) => action(),
            (TargetAction::WithInput(action), Some(input)) => action(input),
            _ => {}
        }
    }
}

impl<E, I> Clone for TargetBinding<E, I> {
    fn clone(&self) -> Self {
        TargetBinding {
            state: Rc::clone(&self.state),
            action: self.action.clone(),
        }
    }
}

/// A conditional, deferred switch of one or more nesting levels.
///
/// `I` is the type of the optional input threaded through the chain; plain
/// transitions use `()`.
///
/// The owning context keeps every transition bound to it alive, and a
/// transition keeps its targets alive. A transition owned by a state's own
/// context that targets that same state therefore forms an `Rc` cycle, and
/// the state is never freed. Own such transitions from an ancestor instead.
///
/// # Example
///
/// ```rust
/// use statetree::{State, StateContext, Transition};
///
/// let root = StateContext::<()>::new();
/// let menu = State::new("Menu");
/// let game = State::new("Game");
/// let level = State::new("Level");
/// root.switch_state(Some(menu));
///
/// let start = Transition::new(&root);
/// start.add_target(&game);
/// start.add_target(&level);
///
/// assert!(start.invoke());
/// assert!(root.execute_next_transition().unwrap());
/// assert_eq!(root.active_leaf_state().unwrap().name(), "Level");
/// ```
pub struct Transition<E, I = ()> {
    this: Weak<Transition<E, I>>,
    owner: Weak<StateContext<E>>,
    targets: RefCell<Vec<TargetBinding<E, I>>>,
    conditions: RefCell<Vec<Condition>>,
    input: RefCell<Option<I>>,
}

impl<E: 'static> Transition<E> {
    /// Create a transition without input, owned by `owner`.
    pub fn new(owner: &impl HasContext<E>) -> Rc<Self> {
        Self::bind(owner.state_context())
    }

    /// Arm the transition if all conditions hold. Returns whether it armed.
    pub fn invoke(&self) -> bool {
        self.invoke_with(())
    }
}

impl<E: 'static, I: 'static> Transition<E, I> {
    /// Create a transition carrying input of type `I`, owned by `owner`.
    pub fn with_input(owner: &impl HasContext<E>) -> Rc<Self> {
        Self::bind(owner.state_context())
    }

    fn bind(owner: &Rc<StateContext<E>>) -> Rc<Self> {
        let transition = Rc::new_cyclic(|this| Transition {
            this: this.clone(),
            owner: Rc::downgrade(owner),
            targets: RefCell::new(Vec::new()),
            conditions: RefCell::new(Vec::new()),
            input: RefCell::new(None),
        });
        let owned: Rc<dyn PendingTransition> = transition.clone();
        owner.adopt(owned);
        transition
    }

    /// Append a target with no action.
    pub fn add_target(&self, state: &Rc<State<E>>) {
        self.push_binding(state, TargetAction::None);
    }

    /// Append a target with an action run just before it is switched in.
    pub fn add_target_action<F>(&self, state: &Rc<State<E>>, action: F)
    where
        F: Fn() + 'static,
    {
        self.push_binding(state, TargetAction::Plain(Rc::new(action)));
    }

    /// Append a target whose input is produced by `source` at execution.
    pub fn add_target_data<T, F>(&self, state: &Rc<State<E>>, input: &StateInput<T>, source: F)
    where
        T: 'static,
        F: Fn() -> T + 'static,
    {
        let input = input.clone();
        self.add_target_action(state, move || input.set(source()));
    }

    /// Append a target with an action receiving the transition input.
    pub fn add_target_input_action<F>(&self, state: &Rc<State<E>>, action: F)
    where
        F: Fn(&I) + 'static,
    {
        self.push_binding(state, TargetAction::WithInput(Rc::new(action)));
    }

    /// Append a target whose input is converted from the transition input.
    pub fn add_target_input_map<T, F>(&self, state: &Rc<State<E>>, input: &StateInput<T>, convert: F)
    where
        T: 'static,
        F: Fn(&I) -> T + 'static,
    {
        let input = input.clone();
        self.add_target_input_action(state, move |arg| input.set(convert(arg)));
    }

    /// Add a condition that must hold for the transition to arm.
    pub fn add_condition(&self, condition: impl Into<Condition>) {
        self.conditions.borrow_mut().push(condition.into());
    }

    /// Target states in execution order.
    pub fn targets(&self) -> Vec<Rc<State<E>>> {
        self.targets
            .borrow()
            .iter()
            .map(|binding| Rc::clone(&binding.state))
            .collect()
    }

    /// Whether every condition currently holds.
    pub fn can_invoke(&self) -> bool {
        let conditions = self.conditions.borrow().clone();
        condition::all_hold(&conditions)
    }

    /// Arm the transition with `arg` as its input if all conditions hold.
    ///
    /// Nothing changes when a condition fails. Arming again before execution
    /// overwrites the previously stashed input.
    pub fn invoke_with(&self, arg: I) -> bool {
        if !self.can_invoke() {
            tracing::trace!(transition = %self.describe(), "conditions not met");
            return false;
        }
        let (Some(owner), Some(this)) = (self.owner.upgrade(), self.this.upgrade()) else {
            return false;
        };

        owner.arm(this);
        *self.input.borrow_mut() = Some(arg);
        true
    }

    /// Switch the owner's subtree to the target chain immediately.
    ///
    /// Consumes the stashed input. Fails without touching the tree when the
    /// chain is empty, the owner is gone, or an input action has no input.
    pub fn execute(&self) -> Result<(), TransitionError> {
        let targets = self.targets.borrow().clone();
        if targets.is_empty() {
            return Err(TransitionError::EmptyTransition);
        }
        let owner = self.owner.upgrade().ok_or(TransitionError::OwnerDropped)?;

        let input = self.input.borrow_mut().take();
        if input.is_none() {
            if let Some(binding) = targets.iter().find(|binding| binding.needs_input()) {
                return Err(TransitionError::MissingInput {
                    target: binding.state.name().to_string(),
                });
            }
        }

        let mut context = owner;
        for binding in &targets {
            binding.apply(input.as_ref());
            context.switch_state(Some(Rc::clone(&binding.state)));
            context = Rc::clone(binding.state.context());
        }
        Ok(())
    }

    /// Stash `arg` as the input and execute immediately.
    pub fn execute_with(&self, arg: I) -> Result<(), TransitionError> {
        *self.input.borrow_mut() = Some(arg);
        self.execute()
    }

    /// Narrow handle that can only arm this transition.
    pub fn trigger(&self) -> Trigger<E, I> {
        Trigger::new(self.this.clone())
    }

    pub(crate) fn push_binding(&self, state: &Rc<State<E>>, action: TargetAction<I>) {
        self.targets.borrow_mut().push(TargetBinding {
            state: Rc::clone(state),
            action,
        });
    }

    fn describe(&self) -> String {
        let targets = self.targets.borrow();
        let names: Vec<&str> = targets.iter().map(|binding| binding.state.name()).collect();
        format!("[{}]", names.join(" > "))
    }
}

impl<E: 'static, I: Clone + 'static> Transition<E, I> {
    /// Append a target that receives the transition input unchanged.
    pub fn add_target_input(&self, state: &Rc<State<E>>, input: &StateInput<I>) {
        let input = input.clone();
        self.add_target_input_action(state, move |arg| input.set(arg.clone()));
    }
}

impl<E: 'static, I: 'static> PendingTransition for Transition<E, I> {
    fn execute(&self) -> Result<(), TransitionError> {
        Transition::execute(self)
    }

    fn describe(&self) -> String {
        Transition::describe(self)
    }
}

impl<E, I> fmt::Debug for Transition<E, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let targets = self.targets.borrow();
        let names: Vec<&str> = targets.iter().map(|binding| binding.state.name()).collect();
        f.debug_struct("Transition")
            .field("targets", &names)
            .field("conditions", &self.conditions.borrow().len())
            .field("has_input", &self.input.borrow().is_some())
            .finish()
    }
}
