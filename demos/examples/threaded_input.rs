// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Posting input from another thread.
//!
//! A gesture thread sends drag input and a clock thread sends frames through
//! [`InputSender`] handles. The stack owner drains the mailbox with `pump` and
//! handles everything serially.
//!
//! Run:
//! - `cargo run -p understory_demos --example threaded_input`

use core::time::Duration;
use std::thread;

use kurbo::Vec2;
use tracing_subscriber::{EnvFilter, fmt};
use understory_card_stack::{
    CardStack, Deck, Direction, InputSender, SendError, SessionId, StackConfig, StackInput,
    observer_fn,
};

fn gestures(sender: InputSender, session: SessionId) -> Result<(), SendError> {
    sender.send(StackInput::GestureBegan { session })?;
    for x in [40.0, 90.0, 140.0] {
        sender.send(StackInput::GestureMoved {
            session,
            translation: Vec2::new(-x, 5.0),
        })?;
    }
    sender.send(StackInput::GestureEnded {
        session,
        translation: Vec2::new(-140.0, 5.0),
        velocity: Vec2::new(-700.0, 0.0),
    })
}

fn clock(sender: InputSender, frames: usize) -> Result<(), SendError> {
    for _ in 0..frames {
        sender.send(StackInput::Frame {
            dt: Duration::from_millis(16),
        })?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let observer = observer_fn(|card: &&str, direction: Direction| {
        println!("swiped {card} {direction}");
    });
    let mut stack = CardStack::new(
        Deck::from(vec!["Pho", "Paella", "Pierogi"]),
        observer,
        StackConfig::default(),
    )?;

    let session = stack.session_id();
    let g = {
        let sender = stack.sender();
        thread::spawn(move || gestures(sender, session))
    };
    g.join().map_err(|_| "gesture thread panicked")??;

    let c = {
        let sender = stack.sender();
        thread::spawn(move || clock(sender, 30))
    };
    c.join().map_err(|_| "clock thread panicked")??;

    let events = stack.pump();
    tracing::info!(count = events.len(), remaining = stack.remaining(), "mailbox drained");
    for event in events {
        println!("event: {event:?}");
    }
    println!("top card is now {:?}", stack.current_card());
    Ok(())
}
