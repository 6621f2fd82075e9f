//! Level Loader
//!
//! This example demonstrates transitions that carry input.
//!
//! Key concepts:
//! - Typed transitions armed with `invoke_with`
//! - `StateInput` slots read by target states on enter
//! - Input converted per target along a nested chain
//! - Recording leaf changes and exporting them as JSON
//!
//! Run with: RUST_LOG=statetree=trace cargo run --example level_loader

use statetree::builder::TransitionBuilder;
use statetree::diagnostics::{init_logging, LeafRecorder};
use statetree::{EventReply, State, StateContext, StateInput};

#[derive(Debug)]
enum GameEvent {
    Load(u32),
    Finish,
}

const LEVEL_COUNT: u32 = 3;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    println!("=== Level Loader Example ===\n");

    let root = StateContext::<GameEvent>::new();
    let lobby = State::<GameEvent>::new("Lobby");
    let world = State::<GameEvent>::new("World");
    let level = State::<GameEvent>::new("Level");
    let recorder = LeafRecorder::attach(&root);

    let world_title = StateInput::<String>::new();
    let level_number = StateInput::<u32>::new();

    let title = world_title.clone();
    world.on_enter(move || {
        println!("  entering {}", title.take().unwrap_or_default());
    });
    let number = level_number.clone();
    level.on_enter(move || {
        println!("  loading level {}", number.take().unwrap_or_default());
    });

    // One input fans out to both levels of the chain
    let load = TransitionBuilder::<GameEvent, u32>::with_input(&root)
        .to_input_map(&world, &world_title, |n| format!("World {}", (n + 1) / 2))
        .to_input(&level, &level_number)
        .build()?;

    let finish = TransitionBuilder::new(&root).to(&lobby).build()?;

    let load_trigger = load.trigger();
    lobby.on_event(move |event| match event {
        GameEvent::Load(n) if *n >= 1 && *n <= LEVEL_COUNT => {
            load_trigger.invoke_with(*n);
            EventReply::Handled
        }
        GameEvent::Load(_) => EventReply::Declined,
        _ => EventReply::Unsupported,
    });

    // Level ignores Finish; the enclosing World handles it
    let finish_trigger = finish.trigger();
    world.on_event(move |event| match event {
        GameEvent::Finish => {
            finish_trigger.invoke();
            EventReply::Handled
        }
        _ => EventReply::Unsupported,
    });

    root.switch_state(Some(lobby));

    for event in [
        GameEvent::Load(7),
        GameEvent::Load(2),
        GameEvent::Finish,
        GameEvent::Load(3),
    ] {
        println!("\n{event:?}");
        let handled = root.trigger_event(&event)?;
        let leaf = root
            .active_leaf_state()
            .map(|s| s.name().to_string())
            .unwrap_or_default();
        println!("  handled: {handled}, leaf: {leaf}");
    }

    println!("\nRecorded {} leaf changes:", recorder.len());
    println!("{}", recorder.to_json()?);

    println!("\n=== Example Complete ===");
    Ok(())
}
