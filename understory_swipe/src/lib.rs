// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Swipe: gesture resolution and per-card animation sessions for card stacks.
//!
//! ## Overview
//!
//! This crate holds the toolkit-independent half of a swipeable card stack:
//!
//! - [`resolver`]: pure functions that classify a released drag into an
//!   [`Outcome`](crate::types::Outcome) (`left`, `right`, `up`, `down`, or `none`)
//!   and compute where a committed card should fly to.
//! - [`motion`]: animated scalar [`Channel`](crate::motion::Channel)s with timing
//!   and spring motion, grouped into [`TransformChannels`](crate::motion::TransformChannels).
//! - [`session`]: the [`GestureSession`](crate::session::GestureSession) state
//!   machine that turns begin/update/end input into live transforms, exit
//!   animations, and snap-backs.
//! - [`types`]: directions, outcomes, direction masks, and thresholds.
//!
//! It does not own any cards and never decides when a stack advances. A
//! higher layer (for example `understory_card_stack`) owns the cursor, feeds
//! gesture input into the live session, ticks it once per frame, and commits
//! when the session reports [`SessionEvent::ExitFinished`](crate::session::SessionEvent::ExitFinished).
//!
//! ## Time
//!
//! Nothing here reads a clock. Callers pass elapsed time to `tick`, which keeps
//! sessions deterministic under test and lets a host drive them from whatever
//! frame source it has.
//!
//! ## Example
//!
//! ```
//! use kurbo::Vec2;
//! use understory_swipe::resolver::resolve;
//! use understory_swipe::types::{Outcome, Thresholds};
//!
//! let thresholds = Thresholds { position: 100.0, velocity: 400.0, ..Thresholds::default() };
//! // Mostly-vertical drag: the vertical axis is tested, and it commits downward.
//! assert_eq!(resolve(Vec2::new(20.0, 300.0), Vec2::ZERO, &thresholds), Outcome::Down);
//! ```

pub mod motion;
pub mod resolver;
pub mod session;
pub mod types;

pub use motion::{Channel, Easing, Motion, SpringConfig, TransformChannels};
pub use resolver::{Release, exit_target, release, release_in, resolve, resolve_in};
pub use session::{
    BridgeState, GestureSession, MotionConfig, ReleaseAction, SessionEvent, SessionId, SwipeConfig,
};
pub use types::{Direction, Outcome, SwipeDirections, Thresholds};
