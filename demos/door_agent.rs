//! Door State Machine
//!
//! This example drives a small door controller with events.
//!
//! Key concepts:
//! - Events dispatched from the root context with `trigger_event`
//! - Handlers arming transitions through triggers
//! - Conditions reading shared application data
//! - Unsupported events leave the machine untouched
//!
//! Run with: cargo run --example door_agent

use statetree::builder::TransitionBuilder;
use statetree::{EventReply, State, StateContext, Transition};
use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug)]
enum DoorEvent {
    Open,
    Close,
    Lock,
    Unlock(u32),
}

const PIN: u32 = 1234;

fn door_state(name: &'static str) -> Rc<State<DoorEvent>> {
    let state = State::new(name);
    state.on_enter(move || println!("    enter {name}"));
    state.on_exit(move || println!("    exit  {name}"));
    state
}

fn main() {
    println!("=== Door State Machine ===\n");

    let root = StateContext::<DoorEvent>::new();
    let closed = door_state("Closed");
    let opened = door_state("Opened");
    let locked = door_state("Locked");

    // Transitions are owned by the root context
    let open = Transition::new(&root);
    open.add_target(&opened);
    let close = Transition::new(&root);
    close.add_target(&closed);
    let lock = Transition::new(&root);
    lock.add_target(&locked);

    let entered_pin = Rc::new(Cell::new(0u32));
    let pin = Rc::clone(&entered_pin);
    let unlock = TransitionBuilder::new(&root)
        .to(&closed)
        .when(move || pin.get() == PIN)
        .build()
        .unwrap();

    let open_trigger = open.trigger();
    let lock_trigger = lock.trigger();
    closed.on_event(move |event| match event {
        DoorEvent::Open => {
            open_trigger.invoke();
            EventReply::Handled
        }
        DoorEvent::Lock => {
            lock_trigger.invoke();
            EventReply::Handled
        }
        _ => EventReply::Unsupported,
    });

    let close_trigger = close.trigger();
    opened.on_event(move |event| match event {
        DoorEvent::Close => {
            close_trigger.invoke();
            EventReply::Handled
        }
        _ => EventReply::Unsupported,
    });

    let unlock_trigger = unlock.trigger();
    let keypad = Rc::clone(&entered_pin);
    locked.on_event(move |event| match event {
        DoorEvent::Unlock(code) => {
            keypad.set(*code);
            unlock_trigger.invoke();
            EventReply::Handled
        }
        _ => EventReply::Unsupported,
    });

    println!("Initial state:");
    root.switch_state(Some(Rc::clone(&closed)));

    let events = vec![
        DoorEvent::Open,
        DoorEvent::Lock,
        DoorEvent::Close,
        DoorEvent::Lock,
        DoorEvent::Open,
        DoorEvent::Unlock(1111),
        DoorEvent::Unlock(PIN),
    ];

    for event in events {
        println!("\n{event:?}");
        let handled = root.trigger_event(&event).unwrap();
        let state = root
            .active_state()
            .map(|s| s.name().to_string())
            .unwrap_or_default();
        println!("  handled: {handled}, state: {state}");
    }

    println!("\nKey Characteristics:");
    println!("- A wrong PIN is handled but the guarded transition never arms");
    println!("- Events a state does not support are reported as unhandled");
    println!("- Triggers hold their transitions weakly, so no cycles form");

    println!("\n=== Example Complete ===");
}
