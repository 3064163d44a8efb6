// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag, release, and render.
//!
//! Feeds a short drag that snaps back and a longer one that commits into a
//! [`CardStack`], printing the top layer's position, rotation, opacity, and
//! overlays every few frames.
//!
//! Run:
//! - `cargo run -p understory_demos --example drag_release`

use core::time::Duration;

use kurbo::{Point, Size, Vec2};
use tracing_subscriber::{EnvFilter, fmt};
use understory_card_stack::{
    CardStack, ConfigError, Deck, NoObserver, StackConfig, StackEvent, StackInput, paint_order,
};

const FRAME: Duration = Duration::from_millis(16);

fn print_top(stack: &CardStack<&'static str, NoObserver>, frame: usize) {
    let layers = stack.layers();
    let Some(top) = layers.first() else {
        println!("  [{frame:3}] (empty)");
        return;
    };
    let center = top.transform * Point::ORIGIN;
    let rotation = stack.session().channels().rotation.value();
    let overlays = top.overlays.unwrap_or_default();
    println!(
        "  [{frame:3}] {:<8} at ({:7.1}, {:7.1}) rot {:6.1} opacity {:.2} like {:.2} nope {:.2}",
        top.card, center.x, center.y, rotation, top.opacity, overlays.right, overlays.left
    );
}

fn drag(stack: &mut CardStack<&'static str, NoObserver>, to: Vec2, velocity: Vec2) {
    let session = stack.session_id();
    stack.handle(StackInput::GestureBegan { session });
    for step in 1..=5 {
        let translation = to * (f64::from(step) / 5.0);
        stack.handle(StackInput::GestureMoved {
            session,
            translation,
        });
    }
    print_top(stack, 0);
    stack.handle(StackInput::GestureEnded {
        session,
        translation: to,
        velocity,
    });

    let mut frame = 0;
    while !stack.is_settled() {
        frame += 1;
        for event in stack.handle(StackInput::Frame { dt: FRAME }) {
            println!("  event: {event:?}");
            if event == StackEvent::Exhausted {
                println!("  no more cards");
            }
        }
        if frame % 4 == 0 {
            print_top(stack, frame);
        }
    }
}

fn main() -> Result<(), ConfigError> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = StackConfig::for_viewport(Size::new(390.0, 844.0));
    let mut stack = CardStack::new(Deck::from(vec!["Ramen", "Tacos"]), NoObserver, config)?;

    println!("paint order (bottom first):");
    for layer in paint_order(&stack.layers()) {
        println!("  {} z={} opacity={:.2}", layer.card, layer.z_index, layer.opacity);
    }

    println!("short drag, slow release:");
    drag(&mut stack, Vec2::new(60.0, 30.0), Vec2::new(50.0, 0.0));

    println!("long drag to the right:");
    drag(&mut stack, Vec2::new(160.0, -20.0), Vec2::new(300.0, 0.0));

    println!("flick up:");
    drag(&mut stack, Vec2::new(5.0, -40.0), Vec2::new(0.0, -900.0));
    Ok(())
}
