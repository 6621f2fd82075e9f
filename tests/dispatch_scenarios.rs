//! End-to-end scenarios for event dispatch and transition commits.

use statetree::builder::TransitionBuilder;
use statetree::diagnostics::LeafRecorder;
use statetree::{
    CommitPolicy, EventReply, State, StateContext, StateInput, Transition, TransitionError,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Ping,
    Next,
    Escape,
    Unknown,
}

type Journal = Rc<RefCell<Vec<String>>>;

fn journaled(name: &'static str, journal: &Journal) -> Rc<State<Event>> {
    let state = State::new(name);
    let on_enter = Rc::clone(journal);
    state.on_enter(move || on_enter.borrow_mut().push(format!("enter {name}")));
    let on_exit = Rc::clone(journal);
    state.on_exit(move || on_exit.borrow_mut().push(format!("exit {name}")));
    state
}

/// Root with active composite `A`, whose active child is the leaf `A1`.
struct Fixture {
    journal: Journal,
    root: Rc<StateContext<Event>>,
    a: Rc<State<Event>>,
    a1: Rc<State<Event>>,
    a2: Rc<State<Event>>,
    b: Rc<State<Event>>,
}

impl Fixture {
    fn new() -> Self {
        let journal = Journal::default();
        let root = StateContext::new();
        let a = journaled("A", &journal);
        let a1 = journaled("A1", &journal);
        let a2 = journaled("A2", &journal);
        let b = journaled("B", &journal);

        root.switch_state(Some(a.clone()));
        a.switch_state(Some(a1.clone()));
        journal.borrow_mut().clear();

        Fixture {
            journal,
            root,
            a,
            a1,
            a2,
            b,
        }
    }

    fn journal(&self) -> Vec<String> {
        self.journal.borrow().clone()
    }

    fn leaf_name(&self) -> Option<String> {
        self.root
            .active_leaf_state()
            .map(|state| state.name().to_string())
    }
}

#[test]
fn unknown_event_is_unhandled_and_mutates_nothing() {
    let fx = Fixture::new();
    fx.a1.on_event(|event| match event {
        Event::Ping => EventReply::Handled,
        _ => EventReply::Unsupported,
    });

    assert_eq!(fx.root.trigger_event(&Event::Unknown), Ok(false));
    assert!(fx.journal().is_empty());
    assert_eq!(fx.leaf_name(), Some("A1".to_string()));
}

#[test]
fn leaf_handler_arms_sibling_transition() {
    let fx = Fixture::new();
    let to_a2 = Transition::new(&fx.a);
    to_a2.add_target(&fx.a2);

    let trigger = to_a2.trigger();
    fx.a1.on_event(move |event| match event {
        Event::Next => {
            trigger.invoke();
            EventReply::Handled
        }
        _ => EventReply::Unsupported,
    });

    assert_eq!(fx.root.trigger_event(&Event::Next), Ok(true));
    assert_eq!(fx.journal(), vec!["exit A1", "enter A2"]);
    assert_eq!(fx.leaf_name(), Some("A2".to_string()));
    assert!(!fx.a.has_pending_transition());
}

#[test]
fn transition_owned_by_root_exits_the_whole_branch() {
    let fx = Fixture::new();
    let b1 = journaled("B1", &fx.journal);
    let escape = Transition::new(&fx.root);
    escape.add_target(&fx.b);
    escape.add_target(&b1);

    let trigger = escape.trigger();
    fx.a1.on_event(move |event| match event {
        Event::Escape => {
            trigger.invoke();
            EventReply::Handled
        }
        _ => EventReply::Unsupported,
    });

    assert_eq!(fx.root.trigger_event(&Event::Escape), Ok(true));
    assert_eq!(
        fx.journal(),
        vec!["exit A1", "exit A", "enter B", "enter B1"]
    );
    assert_eq!(fx.leaf_name(), Some("B1".to_string()));
}

#[test]
fn root_most_armed_transition_wins() {
    let fx = Fixture::new();
    let inner = Transition::new(&fx.a);
    inner.add_target(&fx.a2);
    let outer = Transition::new(&fx.root);
    outer.add_target(&fx.b);

    let inner_trigger = inner.trigger();
    let outer_trigger = outer.trigger();
    fx.a1.on_event(move |_| {
        inner_trigger.invoke();
        outer_trigger.invoke();
        EventReply::Handled
    });

    assert_eq!(fx.root.trigger_event(&Event::Ping), Ok(true));
    assert_eq!(fx.leaf_name(), Some("B".to_string()));
    assert!(fx.a.has_pending_transition());
    assert!(!fx.root.has_pending_transition());
    assert!(!fx.journal().contains(&"enter A2".to_string()));
}

#[test]
fn only_one_transition_commits_per_event() {
    let fx = Fixture::new();
    let to_b = Transition::new(&fx.root);
    to_b.add_target(&fx.b);
    let to_a2 = Transition::new(&fx.a);
    to_a2.add_target(&fx.a2);

    to_a2.invoke();
    to_b.invoke();
    assert_eq!(fx.root.trigger_event(&Event::Unknown), Ok(true));
    assert_eq!(fx.leaf_name(), Some("B".to_string()));

    // A's transition stays armed even though A left the active branch.
    assert!(fx.a.has_pending_transition());
    assert_eq!(fx.root.trigger_event(&Event::Unknown), Ok(false));
}

#[test]
fn ancestor_state_handles_what_the_leaf_ignores() {
    let fx = Fixture::new();
    let to_a2 = Transition::new(&fx.a);
    to_a2.add_target(&fx.a2);

    let trigger = to_a2.trigger();
    fx.a.on_event(move |event| match event {
        Event::Next => {
            trigger.invoke();
            EventReply::Handled
        }
        _ => EventReply::Unsupported,
    });

    assert_eq!(fx.root.trigger_event(&Event::Next), Ok(true));
    assert_eq!(fx.journal(), vec!["exit A1", "enter A2"]);
}

#[test]
fn deferred_dispatch_leaves_transitions_armed() {
    let fx = Fixture::new();
    let to_a2 = Transition::new(&fx.a);
    to_a2.add_target(&fx.a2);
    let trigger = to_a2.trigger();
    fx.a1.on_event(move |_| {
        trigger.invoke();
        EventReply::Handled
    });

    assert_eq!(
        fx.root.trigger_event_with(&Event::Ping, CommitPolicy::Defer),
        Ok(true)
    );
    assert!(fx.a.has_pending_transition());
    assert_eq!(fx.leaf_name(), Some("A1".to_string()));

    assert_eq!(fx.root.execute_next_transition(), Ok(true));
    assert_eq!(fx.leaf_name(), Some("A2".to_string()));
}

#[test]
fn state_dispatch_commits_its_own_handler_transition() {
    let fx = Fixture::new();
    let to_a2 = Transition::new(&fx.a);
    to_a2.add_target(&fx.a2);
    let trigger = to_a2.trigger();
    fx.a.on_event(move |_| {
        trigger.invoke();
        EventReply::Declined
    });

    // The handler declined, but the transition it armed still commits.
    assert_eq!(fx.a.trigger_event(&Event::Ping), Ok(true));
    assert_eq!(fx.leaf_name(), Some("A2".to_string()));
}

#[test]
fn state_dispatch_commits_after_delegating() {
    let fx = Fixture::new();
    let to_a2 = Transition::new(&fx.a);
    to_a2.add_target(&fx.a2);
    to_a2.invoke();

    // No handler anywhere: A's own context still commits after delegation.
    assert_eq!(fx.a.trigger_event(&Event::Ping), Ok(true));
    assert_eq!(fx.leaf_name(), Some("A2".to_string()));
}

#[test]
fn rearming_the_committing_context_during_enter_is_discarded() {
    let fx = Fixture::new();
    let to_b = Transition::new(&fx.root);
    to_b.add_target(&fx.b);
    let back = Transition::new(&fx.root);
    back.add_target(&fx.a);

    let back_trigger = back.trigger();
    fx.b.on_enter(move || back_trigger.invoke());
    to_b.invoke();

    assert_eq!(fx.root.trigger_event(&Event::Unknown), Ok(true));
    assert_eq!(fx.leaf_name(), Some("B".to_string()));
    // The pending slot is cleared after the committed transition finished,
    // which drops the transition armed inside B's enter hook.
    assert!(!fx.root.has_pending_transition());
}

#[test]
fn transition_armed_by_child_enter_survives_commit() {
    let fx = Fixture::new();
    let a2_inner = journaled("A2x", &fx.journal);
    let to_a2 = Transition::new(&fx.a);
    to_a2.add_target(&fx.a2);
    let descend = Transition::new(&fx.a2);
    descend.add_target(&a2_inner);

    let descend_trigger = descend.trigger();
    fx.a2.on_enter(move || descend_trigger.invoke());
    to_a2.invoke();

    assert_eq!(fx.root.trigger_event(&Event::Unknown), Ok(true));
    assert_eq!(fx.leaf_name(), Some("A2".to_string()));
    assert!(fx.a2.has_pending_transition());

    assert_eq!(fx.root.trigger_event(&Event::Unknown), Ok(true));
    assert_eq!(fx.leaf_name(), Some("A2x".to_string()));
}

#[test]
fn failing_conditions_keep_handler_transition_disarmed() {
    let fx = Fixture::new();
    let allowed = Rc::new(Cell::new(false));
    let gate = Rc::clone(&allowed);
    let to_a2 = TransitionBuilder::new(&fx.a)
        .to(&fx.a2)
        .when(move || gate.get())
        .build()
        .unwrap();

    let trigger = to_a2.trigger();
    fx.a1.on_event(move |_| {
        trigger.invoke();
        EventReply::Handled
    });

    assert_eq!(fx.root.trigger_event(&Event::Next), Ok(true));
    assert_eq!(fx.leaf_name(), Some("A1".to_string()));

    allowed.set(true);
    assert_eq!(fx.root.trigger_event(&Event::Next), Ok(true));
    assert_eq!(fx.leaf_name(), Some("A2".to_string()));
}

#[test]
fn typed_trigger_delivers_input_to_nested_targets() {
    let fx = Fixture::new();
    let level = State::new("Level");
    let level_number = StateInput::<u32>::new();
    let level_title = StateInput::<String>::new();
    let entered_with = Rc::new(Cell::new(0));

    let reader = level_number.clone();
    let sink = Rc::clone(&entered_with);
    level.on_enter(move || sink.set(reader.get().unwrap_or_default()));

    let start = TransitionBuilder::<Event, u32>::with_input(&fx.root)
        .to_input_map(&fx.b, &level_title, |n| format!("World {n}"))
        .to_input(&level, &level_number)
        .build()
        .unwrap();

    let trigger = start.trigger();
    fx.a1.on_event(move |_| {
        trigger.invoke_with(4);
        EventReply::Handled
    });

    assert_eq!(fx.root.trigger_event(&Event::Ping), Ok(true));
    assert_eq!(entered_with.get(), 4);
    assert_eq!(level_title.get(), Some("World 4".to_string()));
    assert_eq!(fx.leaf_name(), Some("Level".to_string()));
}

#[test]
fn empty_transition_error_surfaces_from_dispatch() {
    let fx = Fixture::new();
    let broken = Transition::new(&fx.a);
    let trigger = broken.trigger();
    fx.a1.on_event(move |_| {
        trigger.invoke();
        EventReply::Handled
    });

    assert_eq!(
        fx.root.trigger_event(&Event::Ping),
        Err(TransitionError::EmptyTransition)
    );
    assert_eq!(fx.leaf_name(), Some("A1".to_string()));
    assert!(fx.journal().is_empty());
}

#[test]
fn leaf_changes_are_reported_to_the_root() {
    let fx = Fixture::new();
    let recorder = LeafRecorder::attach(&fx.root);
    let to_a2 = Transition::new(&fx.a);
    to_a2.add_target(&fx.a2);
    to_a2.invoke();

    fx.root.trigger_event(&Event::Unknown).unwrap();
    assert_eq!(recorder.path(), vec![Some("A2".to_string())]);
}

#[test]
#[should_panic(expected = "handler failure")]
fn handler_panics_propagate_to_the_caller() {
    let fx = Fixture::new();
    fx.a1.on_event(|_| panic!("handler failure"));
    let _ = fx.root.trigger_event(&Event::Ping);
}
