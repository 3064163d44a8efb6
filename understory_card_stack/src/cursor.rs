// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Card stack cursor: the head index into a [`Deck`] and its re-entrancy lock.
//!
//! ## Invariants
//!
//! - `0 <= head <= deck.len()`.
//! - `head` grows by exactly one per accepted commit and only returns to zero
//!   through [`Cursor::reset`] or [`Cursor::replace_deck`].
//! - Between an accepted [`Cursor::commit`] and the matching
//!   [`Cursor::finish_advance`] the cursor is [`CursorPhase::Advancing`] and
//!   every further commit is ignored.
//!
//! ## Two-step advance
//!
//! `commit` notifies the observer with the pre-advance card and locks the
//! cursor; `finish_advance` moves the head and unlocks it. An engine may run a
//! short timer between the two. [`Cursor::commit_now`] does both at once.
//!
//! ```
//! use understory_card_stack::cursor::{CommitStatus, Cursor, observer_fn};
//! use understory_card_stack::deck::Deck;
//! use understory_swipe::types::{Direction, Outcome};
//!
//! let mut seen = Vec::new();
//! let mut observer = observer_fn(|card: &char, d: Direction| seen.push((*card, d)));
//! let mut cursor = Cursor::new(Deck::from(vec!['a', 'b', 'c']), 2);
//! assert_eq!(cursor.visible_window(), &['a', 'b']);
//!
//! assert!(matches!(cursor.commit(Outcome::Left, &mut observer), CommitStatus::Accepted { .. }));
//! // A second commit before the advance lands is ignored.
//! assert!(matches!(cursor.commit(Outcome::Left, &mut observer), CommitStatus::Ignored(_)));
//! cursor.finish_advance();
//! assert_eq!(cursor.visible_window(), &['b', 'c']);
//! drop(observer);
//! assert_eq!(seen, vec![('a', Direction::Left)]);
//! ```

use core::convert::Infallible;
use core::fmt;

use understory_swipe::types::{Direction, Outcome};

use crate::deck::Deck;

/// Receives one call per committed swipe.
///
/// Called with the card that was on top when the swipe committed. An error is
/// logged and otherwise ignored: the card has already left the screen, so the
/// stack advances regardless.
pub trait SwipeObserver<C> {
    /// Failure type reported by the observer.
    type Error: fmt::Display;

    /// Handle a committed swipe of `card` toward `direction`.
    fn on_swipe(&mut self, card: &C, direction: Direction) -> Result<(), Self::Error>;
}

/// An observer that ignores every swipe.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoObserver;

impl<C> SwipeObserver<C> for NoObserver {
    type Error = Infallible;

    #[inline]
    fn on_swipe(&mut self, _card: &C, _direction: Direction) -> Result<(), Infallible> {
        Ok(())
    }
}

/// Observer wrapping an infallible closure. Build with [`observer_fn`].
#[derive(Clone, Debug)]
pub struct FnObserver<F>(F);

/// Wrap a closure as a [`SwipeObserver`].
pub fn observer_fn<C, F>(f: F) -> FnObserver<F>
where
    F: FnMut(&C, Direction),
{
    FnObserver(f)
}

impl<C, F> SwipeObserver<C> for FnObserver<F>
where
    F: FnMut(&C, Direction),
{
    type Error = Infallible;

    fn on_swipe(&mut self, card: &C, direction: Direction) -> Result<(), Infallible> {
        (self.0)(card, direction);
        Ok(())
    }
}

/// Observer wrapping a fallible closure. Build with [`try_observer_fn`].
#[derive(Clone, Debug)]
pub struct TryFnObserver<F>(F);

/// Wrap a fallible closure as a [`SwipeObserver`].
pub fn try_observer_fn<C, E, F>(f: F) -> TryFnObserver<F>
where
    E: fmt::Display,
    F: FnMut(&C, Direction) -> Result<(), E>,
{
    TryFnObserver(f)
}

impl<C, E, F> SwipeObserver<C> for TryFnObserver<F>
where
    E: fmt::Display,
    F: FnMut(&C, Direction) -> Result<(), E>,
{
    type Error = E;

    fn on_swipe(&mut self, card: &C, direction: Direction) -> Result<(), E> {
        (self.0)(card, direction)
    }
}

/// Lock state of a [`Cursor`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum CursorPhase {
    /// Accepting commits.
    #[default]
    Ready,
    /// A commit was accepted and the head has not moved yet.
    Advancing {
        /// Direction of the pending commit.
        direction: Direction,
    },
}

/// Why a commit was not accepted.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum IgnoreReason {
    /// The outcome was [`Outcome::None`].
    NoOutcome,
    /// Another commit is still advancing.
    Busy,
    /// No card left to swipe.
    Exhausted,
}

/// Result of [`Cursor::commit`].
///
/// Ignored commits are expected under fast repeated input and are not errors.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CommitStatus {
    /// The commit was accepted.
    Accepted {
        /// Deck position of the swiped card.
        position: usize,
        /// Committed direction.
        direction: Direction,
    },
    /// The commit was dropped.
    Ignored(IgnoreReason),
}

impl CommitStatus {
    /// True for [`CommitStatus::Accepted`].
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Head index into a deck, with a commit lock.
#[derive(Clone, Debug)]
pub struct Cursor<C> {
    deck: Deck<C>,
    head: usize,
    phase: CursorPhase,
    max_visible: usize,
}

impl<C> Cursor<C> {
    /// A cursor at the start of `deck` showing up to `max_visible` cards.
    pub fn new(deck: Deck<C>, max_visible: usize) -> Self {
        Self {
            deck,
            head: 0,
            phase: CursorPhase::Ready,
            max_visible,
        }
    }

    /// The deck being traversed.
    pub fn deck(&self) -> &Deck<C> {
        &self.deck
    }

    /// Number of cards in the deck.
    pub fn len(&self) -> usize {
        self.deck.len()
    }

    /// True if the deck is empty.
    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }

    /// Index of the top card.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Maximum number of cards in the visible window.
    pub fn max_visible(&self) -> usize {
        self.max_visible
    }

    /// Change the window size.
    pub fn set_max_visible(&mut self, max_visible: usize) {
        self.max_visible = max_visible;
    }

    /// Current lock state.
    pub fn phase(&self) -> CursorPhase {
        self.phase
    }

    /// True between an accepted commit and its advance.
    pub fn is_animating(&self) -> bool {
        matches!(self.phase, CursorPhase::Advancing { .. })
    }

    /// Up to `max_visible` cards starting at the head, top first.
    ///
    /// Shorter near the end of the deck and empty once exhausted.
    pub fn visible_window(&self) -> &[C] {
        self.deck.window(self.head, self.max_visible)
    }

    /// The top card.
    pub fn current_card(&self) -> Option<&C> {
        self.deck.get(self.head)
    }

    /// The card under the top card.
    pub fn next_card(&self) -> Option<&C> {
        self.deck.get(self.head.checked_add(1)?)
    }

    /// True while cards remain.
    pub fn has_more(&self) -> bool {
        self.head < self.deck.len()
    }

    /// Cards left including the top card.
    pub fn remaining(&self) -> usize {
        self.deck.len().saturating_sub(self.head)
    }

    /// True if a commit would be accepted now.
    pub fn can_commit(&self) -> bool {
        !self.is_animating() && self.has_more()
    }

    /// Commit `outcome` for the top card.
    ///
    /// On acceptance `observer` is called with the top card, then the cursor
    /// locks. The head moves on [`Cursor::finish_advance`]. If the observer
    /// panics the cursor stays unlocked at the same head.
    pub fn commit<O: SwipeObserver<C>>(
        &mut self,
        outcome: Outcome,
        observer: &mut O,
    ) -> CommitStatus {
        let Some(direction) = outcome.direction() else {
            tracing::debug!(head = self.head, "commit ignored: no outcome");
            return CommitStatus::Ignored(IgnoreReason::NoOutcome);
        };
        if self.is_animating() {
            tracing::debug!(head = self.head, %direction, "commit ignored: swipe already in progress");
            return CommitStatus::Ignored(IgnoreReason::Busy);
        }
        let position = self.head;
        let Some(card) = self.deck.get(position) else {
            tracing::debug!(head = self.head, %direction, "commit ignored: deck exhausted");
            return CommitStatus::Ignored(IgnoreReason::Exhausted);
        };

        // Lock only once the observer returns; a panic leaves the cursor Ready.
        if let Err(err) = observer.on_swipe(card, direction) {
            tracing::warn!(position, %direction, error = %err, "swipe observer failed");
        }
        self.phase = CursorPhase::Advancing { direction };
        tracing::debug!(position, %direction, "swipe committed");
        CommitStatus::Accepted {
            position,
            direction,
        }
    }

    /// Move the head past the committed card and release the lock.
    ///
    /// Returns `false` if no commit was pending.
    pub fn finish_advance(&mut self) -> bool {
        if !self.is_animating() {
            return false;
        }
        self.head = (self.head + 1).min(self.deck.len());
        self.phase = CursorPhase::Ready;
        tracing::debug!(head = self.head, remaining = self.remaining(), "cursor advanced");
        true
    }

    /// [`Cursor::commit`] followed immediately by [`Cursor::finish_advance`].
    pub fn commit_now<O: SwipeObserver<C>>(
        &mut self,
        outcome: Outcome,
        observer: &mut O,
    ) -> CommitStatus {
        let status = self.commit(outcome, observer);
        if status.is_accepted() {
            self.finish_advance();
        }
        status
    }

    /// Return to the first card and clear the lock.
    pub fn reset(&mut self) {
        self.head = 0;
        self.phase = CursorPhase::Ready;
        tracing::debug!(len = self.deck.len(), "cursor reset");
    }

    /// Swap in a new deck and [`reset`](Self::reset).
    pub fn replace_deck(&mut self, deck: Deck<C>) {
        self.deck = deck;
        self.reset();
    }
}
