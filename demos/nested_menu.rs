//! Nested Menu
//!
//! This example demonstrates a hierarchical menu with deep links.
//!
//! Key concepts:
//! - Composite states holding their own active child
//! - Multi-target transitions switching several levels at once
//! - Composite states handling what their children ignore
//! - Leaf-change listeners on the root context
//!
//! Run with: cargo run --example nested_menu

use statetree::{EventReply, State, StateContext, Transition, Trigger};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq)]
enum MenuEvent {
    Start,
    OpenAudio,
    Next,
    Pause,
    Back,
}

fn menu_state(name: &'static str) -> Rc<State<MenuEvent>> {
    let state = State::new(name);
    state.on_enter(move || println!("    enter {name}"));
    state.on_exit(move || println!("    exit  {name}"));
    state
}

/// Handle `wanted` by arming `trigger`; ignore everything else.
fn arm_on(state: &State<MenuEvent>, wanted: MenuEvent, trigger: Trigger<MenuEvent>) {
    state.on_event(move |event| {
        if *event == wanted {
            trigger.invoke();
            EventReply::Handled
        } else {
            EventReply::Unsupported
        }
    });
}

fn branch(root: &StateContext<MenuEvent>) -> String {
    let mut names = Vec::new();
    let mut state = root.active_state();
    while let Some(current) = state {
        names.push(current.name().to_string());
        state = current.active_state();
    }
    names.join(" > ")
}

fn main() {
    println!("=== Nested Menu Example ===\n");

    let root = StateContext::<MenuEvent>::new();
    let title = menu_state("Title");
    let settings = menu_state("Settings");
    let audio = menu_state("Audio");
    let video = menu_state("Video");
    let game = menu_state("Game");
    let paused = menu_state("Paused");

    root.on_leaf_changed(|leaf| {
        println!("    leaf is now {:?}", leaf.map(|s| s.name().to_string()));
    });

    // Deep link from the title screen straight into Settings > Audio
    let to_audio = Transition::new(&root);
    to_audio.add_target(&settings);
    to_audio.add_target(&audio);

    let to_title = Transition::new(&root);
    to_title.add_target(&title);

    let start = Transition::new(&root);
    start.add_target(&game);

    // Owned by the composite: only switches inside Settings
    let to_video = Transition::new(&settings);
    to_video.add_target(&video);

    let pause = Transition::new(&game);
    pause.add_target(&paused);

    arm_on(&title, MenuEvent::Start, start.trigger());
    arm_on(&title, MenuEvent::OpenAudio, to_audio.trigger());
    arm_on(&audio, MenuEvent::Next, to_video.trigger());
    arm_on(&settings, MenuEvent::Back, to_title.trigger());
    arm_on(&game, MenuEvent::Pause, pause.trigger());
    arm_on(&paused, MenuEvent::Back, to_title.trigger());

    println!("Initial state:");
    root.switch_state(Some(Rc::clone(&title)));

    let events = [
        MenuEvent::OpenAudio,
        MenuEvent::Next,
        MenuEvent::Next,
        MenuEvent::Back,
        MenuEvent::Start,
        MenuEvent::Pause,
        MenuEvent::Back,
    ];

    for event in events {
        println!("\n{event:?}");
        let handled = root.trigger_event(&event).unwrap();
        println!("  handled: {handled}, branch: {}", branch(&root));
    }

    println!("\nKey Characteristics:");
    println!("- Exits run from the leaf upwards, enters from the top down");
    println!("- Video ignores Next, so the second Next is unhandled");
    println!("- Back is handled by Settings even while Video is active");

    println!("\n=== Example Complete ===");
}
