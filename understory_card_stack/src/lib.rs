// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Card Stack: a toolkit-agnostic engine for swipeable card stacks.
//!
//! ## Overview
//!
//! A card stack presents an ordered [`Deck`](crate::deck::Deck) one card at a
//! time. The top card follows the user's drag; on release it either flies off
//! in a committed direction or springs back. Committed swipes are reported to a
//! [`SwipeObserver`](crate::cursor::SwipeObserver) with the card that was on
//! top, and the next card takes its place.
//!
//! The crate is split the way the work is:
//!
//! - [`deck`]: the immutable, shared card sequence. Cards are never removed;
//!   the stack only advances an index.
//! - [`cursor`]: the head index and its re-entrancy lock. At most one commit is
//!   in flight, so fast repeated input can never skip a card.
//! - [`layout`]: the render contract. Turns the visible window into
//!   [`Layer`](crate::layout::Layer)s with transforms, opacity, z-order, and
//!   overlay opacities.
//! - [`stack`]: [`CardStack`](crate::stack::CardStack), which owns all of the
//!   above plus the live [`GestureSession`](understory_swipe::session::GestureSession)
//!   and consumes gesture, frame, and completion messages serially.
//! - [`config`]: [`StackConfig`](crate::config::StackConfig) and its validation.
//!
//! Gesture classification and animation live in `understory_swipe`; the most
//! used types are re-exported here.
//!
//! ## Driving a stack
//!
//! A host toolkit does three things:
//!
//! 1) Paint [`CardStack::layers`](crate::stack::CardStack::layers) in
//!    [`paint_order`](crate::layout::paint_order), attaching its drag
//!    recognizer to the interactive layer only.
//! 2) Forward drag begin/move/end as [`StackInput`](crate::stack::StackInput)
//!    tagged with [`CardStack::session_id`](crate::stack::CardStack::session_id).
//! 3) Send a `Frame` input with the elapsed time on every frame.
//!
//! ```
//! use core::time::Duration;
//! use kurbo::Vec2;
//! use understory_card_stack::{CardStack, Deck, Direction, StackConfig, StackEvent, StackInput, observer_fn};
//!
//! let mut liked = Vec::new();
//! let observer = observer_fn(|card: &&str, d: Direction| {
//!     if d == Direction::Right {
//!         liked.push(*card);
//!     }
//! });
//! let mut stack = CardStack::new(Deck::from(vec!["ramen", "tacos", "curry"]), observer, StackConfig::default())?;
//! assert_eq!(stack.visible_window(), &["ramen", "tacos", "curry"]);
//!
//! let session = stack.session_id();
//! stack.handle(StackInput::GestureBegan { session });
//! stack.handle(StackInput::GestureMoved { session, translation: Vec2::new(180.0, 12.0) });
//! stack.handle(StackInput::GestureEnded {
//!     session,
//!     translation: Vec2::new(180.0, 12.0),
//!     velocity: Vec2::new(650.0, 0.0),
//! });
//! while !stack.is_settled() {
//!     for event in stack.handle(StackInput::Frame { dt: Duration::from_millis(16) }) {
//!         if let StackEvent::Advanced { head } = event {
//!             assert_eq!(head, 1);
//!         }
//!     }
//! }
//! assert_eq!(stack.current_card(), Some(&"tacos"));
//! drop(stack);
//! assert_eq!(liked, ["ramen"]);
//! # Ok::<(), understory_card_stack::ConfigError>(())
//! ```

pub mod config;
pub mod cursor;
pub mod deck;
pub mod layout;
pub mod stack;

pub use config::{ConfigError, StackConfig};
pub use cursor::{
    CommitStatus, Cursor, CursorPhase, FnObserver, IgnoreReason, NoObserver, SwipeObserver,
    TryFnObserver, observer_fn, try_observer_fn,
};
pub use deck::Deck;
pub use layout::{Layer, LayoutConfig, Overlays, background_transform, layers, paint_order};
pub use stack::{CardStack, InputSender, SendError, StackEvent, StackInput};

pub use understory_swipe::{
    Direction, MotionConfig, Outcome, SessionEvent, SessionId, SwipeConfig, SwipeDirections,
    Thresholds,
};
