// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Card stack basics.
//!
//! Walks a three-card deck through left, right, and up swipes using the
//! cursor directly, then shows that rapid repeated commits land only once.
//!
//! Run:
//! - `cargo run -p understory_demos --example stack_basics`
//! - `RUST_LOG=debug cargo run -p understory_demos --example stack_basics` to see engine logs

use tracing_subscriber::{EnvFilter, fmt};
use understory_card_stack::{CommitStatus, Cursor, Deck, Direction, Outcome, observer_fn};

#[derive(Debug)]
struct Recipe {
    name: &'static str,
}

fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let deck = Deck::from(vec![
        Recipe { name: "Shakshuka" },
        Recipe { name: "Pad Thai" },
        Recipe { name: "Gumbo" },
    ]);
    let mut cursor = Cursor::new(deck, 2);
    let mut observer = observer_fn(|card: &Recipe, direction: Direction| {
        println!("  observer: {} -> {direction}", card.name);
    });

    let names = |c: &Cursor<Recipe>| -> Vec<&'static str> {
        c.visible_window().iter().map(|r| r.name).collect()
    };

    println!("visible: {:?}", names(&cursor));
    for outcome in [Outcome::Left, Outcome::Right, Outcome::Up] {
        let status = cursor.commit_now(outcome, &mut observer);
        println!("commit {outcome:?}: {status:?}; visible: {:?}", names(&cursor));
    }
    println!("has_more: {}", cursor.has_more());

    println!();
    println!("re-entrancy:");
    cursor.reset();
    let first = cursor.commit(Outcome::Right, &mut observer);
    let second = cursor.commit(Outcome::Right, &mut observer);
    assert!(matches!(first, CommitStatus::Accepted { .. }));
    println!("  first: {first:?}");
    println!("  second (before advance): {second:?}");
    cursor.finish_advance();
    println!("  head after advance: {}", cursor.head());
}
