// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The card stack engine: one owner for cursor, gesture session, and observer.
//!
//! ## Mailbox
//!
//! Everything that changes the stack arrives as a message and is handled
//! serially by [`CardStack::handle`]:
//!
//! - [`StackInput`] from the toolkit's gesture recognizer and frame clock,
//!   either passed directly or posted from any thread through an
//!   [`InputSender`] and drained with [`CardStack::pump`];
//! - [`SessionEvent`] completions from the live [`GestureSession`], queued
//!   internally on the frame that produces them (or posted with
//!   [`CardStack::post`] when a toolkit runs its own animations).
//!
//! Gesture inputs and session events carry a [`SessionId`]. A new id is minted
//! whenever the top card changes, so messages addressed to a card that is no
//! longer on top are dropped instead of acting on its successor.
//!
//! ## Advancing
//!
//! When an exit animation finishes the engine commits the swipe on the
//! [`Cursor`], which notifies the observer and locks. After
//! [`StackConfig::advance_delay`] of frame time the head moves, a fresh session
//! is created for the new top card, and the lock is released. No gesture can
//! start in between.
//!
//! ```
//! use core::time::Duration;
//! use kurbo::Vec2;
//! use understory_card_stack::config::StackConfig;
//! use understory_card_stack::cursor::NoObserver;
//! use understory_card_stack::deck::Deck;
//! use understory_card_stack::stack::{CardStack, StackEvent, StackInput};
//! use understory_swipe::types::Direction;
//!
//! let mut stack = CardStack::new(Deck::from(vec!["a", "b"]), NoObserver, StackConfig::default())?;
//! let session = stack.session_id();
//! let flick = Vec2::new(200.0, 0.0);
//! stack.handle(StackInput::GestureBegan { session });
//! stack.handle(StackInput::GestureEnded { session, translation: flick, velocity: Vec2::ZERO });
//!
//! let mut events = Vec::new();
//! while stack.head() == 0 {
//!     events.extend(stack.handle(StackInput::Frame { dt: Duration::from_millis(16) }));
//! }
//! assert_eq!(events[0], StackEvent::Swiped { position: 0, direction: Direction::Right });
//! assert_eq!(stack.current_card(), Some(&"b"));
//! # Ok::<(), understory_card_stack::config::ConfigError>(())
//! ```

use core::time::Duration;
use std::collections::VecDeque;
use std::sync::mpsc;

use kurbo::Vec2;
use understory_swipe::session::{BridgeState, GestureSession, SessionEvent, SessionId};
use understory_swipe::types::Direction;

use crate::config::{ConfigError, StackConfig};
use crate::cursor::{CommitStatus, Cursor, SwipeObserver};
use crate::deck::Deck;
use crate::layout::{self, Layer};

/// Input delivered to a [`CardStack`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StackInput {
    /// A drag started on the top card.
    GestureBegan {
        /// Session the recognizer was attached to.
        session: SessionId,
    },
    /// The drag moved; `translation` is cumulative since it began.
    GestureMoved {
        /// Session the recognizer was attached to.
        session: SessionId,
        /// Cumulative translation.
        translation: Vec2,
    },
    /// The drag was released.
    GestureEnded {
        /// Session the recognizer was attached to.
        session: SessionId,
        /// Cumulative translation at release.
        translation: Vec2,
        /// Release velocity in units per second.
        velocity: Vec2,
    },
    /// The recognizer gave up on the drag.
    GestureCancelled {
        /// Session the recognizer was attached to.
        session: SessionId,
    },
    /// Time passed.
    Frame {
        /// Elapsed time since the previous frame.
        dt: Duration,
    },
}

impl StackInput {
    /// Session a gesture input is addressed to; `None` for frames.
    pub const fn session(&self) -> Option<SessionId> {
        match *self {
            Self::GestureBegan { session }
            | Self::GestureMoved { session, .. }
            | Self::GestureEnded { session, .. }
            | Self::GestureCancelled { session } => Some(session),
            Self::Frame { .. } => None,
        }
    }
}

/// Something observable that happened while handling input.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StackEvent {
    /// A swipe committed and the observer was notified.
    Swiped {
        /// Deck position of the swiped card.
        position: usize,
        /// Committed direction.
        direction: Direction,
    },
    /// The top card finished returning to center.
    SnappedBack,
    /// The head moved; a new session is live.
    Advanced {
        /// New head position.
        head: usize,
    },
    /// The last card was swiped. Emitted once until the stack is reset.
    Exhausted,
    /// A new deck was installed.
    DeckReplaced,
}

/// The [`CardStack`] that owned the mailbox is gone.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("card stack dropped; input {0:?} was not delivered")]
pub struct SendError(pub StackInput);

#[derive(Copy, Clone, Debug)]
enum Mail {
    Input(StackInput),
    /// End of the batch a single [`CardStack::pump`] handles.
    Mark,
}

/// Handle for posting [`StackInput`] to a [`CardStack`] from any thread.
///
/// Posted input is handled on the next [`CardStack::pump`].
#[derive(Clone, Debug)]
pub struct InputSender {
    tx: mpsc::Sender<Mail>,
}

impl InputSender {
    /// Queue `input` for the stack.
    pub fn send(&self, input: StackInput) -> Result<(), SendError> {
        self.tx.send(Mail::Input(input)).map_err(|_| SendError(input))
    }
}

/// Swipeable card stack.
///
/// `O` receives one [`SwipeObserver::on_swipe`] call per committed swipe.
#[derive(Debug)]
pub struct CardStack<C, O> {
    cursor: Cursor<C>,
    session: GestureSession,
    observer: O,
    config: StackConfig,
    advance_in: Option<Duration>,
    exhausted_reported: bool,
    messages: VecDeque<SessionEvent>,
    tx: mpsc::Sender<Mail>,
    rx: mpsc::Receiver<Mail>,
}

impl<C, O: SwipeObserver<C>> CardStack<C, O> {
    /// Build a stack over `deck` after validating `config`.
    pub fn new(deck: Deck<C>, observer: O, config: StackConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let (tx, rx) = mpsc::channel();
        Ok(Self {
            cursor: Cursor::new(deck, config.max_visible),
            session: GestureSession::new(SessionId::new(1), config.swipe),
            observer,
            config,
            advance_in: None,
            exhausted_reported: false,
            messages: VecDeque::new(),
            tx,
            rx,
        })
    }

    /// Handle one input and return what it caused, in order.
    pub fn handle(&mut self, input: StackInput) -> Vec<StackEvent> {
        let mut events = Vec::new();
        if let Some(session) = input.session()
            && session != self.session.id()
        {
            tracing::trace!(%session, live = %self.session.id(), ?input, "stale gesture input dropped");
            return events;
        }

        match input {
            StackInput::GestureBegan { .. } => {
                if self.can_commit() {
                    self.session.begin();
                } else {
                    tracing::debug!(
                        head = self.cursor.head(),
                        phase = ?self.cursor.phase(),
                        "gesture refused"
                    );
                }
            }
            StackInput::GestureMoved { translation, .. } => self.session.update(translation),
            StackInput::GestureEnded {
                translation,
                velocity,
                ..
            } => {
                let action = self.session.end(translation, velocity, self.can_commit());
                tracing::debug!(session = %self.session.id(), ?action, "gesture released");
            }
            StackInput::GestureCancelled { .. } => self.session.cancel(),
            StackInput::Frame { dt } => self.frame(dt, &mut events),
        }
        self.drain_messages(&mut events);
        events
    }

    /// Handle every input posted through an [`InputSender`] so far.
    ///
    /// Input posted while pumping, including from the observer, waits for the
    /// next call.
    pub fn pump(&mut self) -> Vec<StackEvent> {
        let mut events = Vec::new();
        if self.tx.send(Mail::Mark).is_err() {
            return events;
        }
        while let Ok(Mail::Input(input)) = self.rx.try_recv() {
            events.extend(self.handle(input));
        }
        events
    }

    /// A sender for posting input from other threads.
    pub fn sender(&self) -> InputSender {
        InputSender {
            tx: self.tx.clone(),
        }
    }

    /// Queue a session completion produced outside this stack.
    ///
    /// Processed on the next [`handle`](Self::handle); dropped then if its
    /// session is no longer live.
    pub fn post(&mut self, event: SessionEvent) {
        self.messages.push_back(event);
    }

    /// Install `deck`, returning to its first card.
    pub fn replace_deck(&mut self, deck: Deck<C>) -> Vec<StackEvent> {
        self.cursor.replace_deck(deck);
        self.restart();
        vec![StackEvent::DeckReplaced]
    }

    /// Return to the first card of the current deck.
    ///
    /// Cancels any pending advance and any animation in flight.
    pub fn reset(&mut self) {
        self.cursor.reset();
        self.restart();
    }

    /// Id of the live session; gesture input must carry it.
    pub fn session_id(&self) -> SessionId {
        self.session.id()
    }

    /// The live gesture session.
    pub fn session(&self) -> &GestureSession {
        &self.session
    }

    /// The cursor.
    pub fn cursor(&self) -> &Cursor<C> {
        &self.cursor
    }

    /// The deck.
    pub fn deck(&self) -> &Deck<C> {
        self.cursor.deck()
    }

    /// Configuration in use.
    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// The swipe observer.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// The swipe observer, mutably.
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Give up the stack, returning its observer.
    pub fn into_observer(self) -> O {
        self.observer
    }

    /// Index of the top card.
    pub fn head(&self) -> usize {
        self.cursor.head()
    }

    /// The top card.
    pub fn current_card(&self) -> Option<&C> {
        self.cursor.current_card()
    }

    /// The card under the top card.
    pub fn next_card(&self) -> Option<&C> {
        self.cursor.next_card()
    }

    /// True while cards remain.
    pub fn has_more(&self) -> bool {
        self.cursor.has_more()
    }

    /// Cards left including the top card.
    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    /// Visible cards, top first.
    pub fn visible_window(&self) -> &[C] {
        self.cursor.visible_window()
    }

    /// True between a committed swipe and the head moving.
    pub fn is_animating(&self) -> bool {
        self.cursor.is_animating()
    }

    /// True when nothing is moving: no drag, animation, or pending advance.
    pub fn is_settled(&self) -> bool {
        self.session.is_idle() && self.advance_in.is_none() && !self.cursor.is_animating()
    }

    /// True if a new gesture may start and commit.
    ///
    /// False from release of a committing drag until the next card is on top.
    pub fn can_commit(&self) -> bool {
        self.advance_in.is_none()
            && self.cursor.can_commit()
            && !matches!(self.session.state(), BridgeState::Committing(_))
    }

    /// Positioned layers for the visible window, top first.
    pub fn layers(&self) -> Vec<Layer<'_, C>> {
        layout::layers(
            self.cursor.visible_window(),
            self.cursor.head(),
            &self.session,
            &self.config.layout,
            self.config.overlay_min_travel,
        )
    }

    fn frame(&mut self, dt: Duration, events: &mut Vec<StackEvent>) {
        if let Some(remaining) = self.advance_in {
            if dt >= remaining {
                self.advance(events);
            } else {
                self.advance_in = Some(remaining - dt);
            }
        }
        if let Some(event) = self.session.tick(dt) {
            tracing::trace!(?event, "session event queued");
            self.messages.push_back(event);
        }
    }

    fn drain_messages(&mut self, events: &mut Vec<StackEvent>) {
        while let Some(event) = self.messages.pop_front() {
            if event.session() != self.session.id() {
                tracing::trace!(?event, live = %self.session.id(), "stale session event dropped");
                continue;
            }
            match event {
                SessionEvent::ExitFinished { direction, .. } => {
                    match self.cursor.commit(direction.into(), &mut self.observer) {
                        CommitStatus::Accepted {
                            position,
                            direction,
                        } => {
                            events.push(StackEvent::Swiped {
                                position,
                                direction,
                            });
                            if self.config.advance_delay.is_zero() {
                                self.advance(events);
                            } else {
                                self.advance_in = Some(self.config.advance_delay);
                            }
                        }
                        CommitStatus::Ignored(reason) => {
                            tracing::debug!(?reason, %direction, "exit finished without commit");
                        }
                    }
                }
                SessionEvent::SnapBackFinished { .. } => events.push(StackEvent::SnappedBack),
            }
        }
    }

    fn advance(&mut self, events: &mut Vec<StackEvent>) {
        self.advance_in = None;
        if !self.cursor.finish_advance() {
            return;
        }
        self.new_session();
        events.push(StackEvent::Advanced {
            head: self.cursor.head(),
        });
        if !self.cursor.has_more() && !self.exhausted_reported {
            self.exhausted_reported = true;
            tracing::debug!(len = self.cursor.len(), "deck exhausted");
            events.push(StackEvent::Exhausted);
        }
    }

    fn restart(&mut self) {
        self.advance_in = None;
        self.exhausted_reported = false;
        self.messages.clear();
        self.new_session();
    }

    fn new_session(&mut self) {
        let id = self.session.id().next();
        self.session = GestureSession::new(id, self.config.swipe);
        tracing::trace!(session = %id, head = self.cursor.head(), "new session");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::{NoObserver, observer_fn};

    const FRAME: StackInput = StackInput::Frame {
        dt: Duration::from_millis(16),
    };

    fn stack(cards: &[char]) -> CardStack<char, NoObserver> {
        CardStack::new(Deck::from(cards), NoObserver, StackConfig::default())
            .expect("default config is valid")
    }

    fn run(stack: &mut CardStack<char, NoObserver>, frames: usize) -> Vec<StackEvent> {
        (0..frames).flat_map(|_| stack.handle(FRAME)).collect()
    }

    fn flick(stack: &mut CardStack<char, NoObserver>, translation: Vec2) {
        let session = stack.session_id();
        stack.handle(StackInput::GestureBegan { session });
        stack.handle(StackInput::GestureMoved {
            session,
            translation,
        });
        stack.handle(StackInput::GestureEnded {
            session,
            translation,
            velocity: Vec2::ZERO,
        });
    }

    #[test]
    fn invalid_config_is_rejected() {
        let r = CardStack::new(
            Deck::from(vec!['a']),
            NoObserver,
            StackConfig::default().with_max_visible(0),
        );
        assert!(matches!(r, Err(ConfigError::NoVisibleCards)));
    }

    #[test]
    fn committed_swipe_advances_after_delay() {
        let mut s = stack(&['a', 'b', 'c']);
        let first = s.session_id();
        flick(&mut s, Vec2::new(-200.0, 0.0));
        assert!(!s.can_commit());

        let events = run(&mut s, 30);
        assert_eq!(
            events,
            vec![
                StackEvent::Swiped {
                    position: 0,
                    direction: Direction::Left
                },
                StackEvent::Advanced { head: 1 },
            ]
        );
        assert_ne!(s.session_id(), first);
        assert_eq!(s.visible_window(), &['b', 'c']);
        assert!(s.is_settled());
        assert!(s.can_commit());
    }

    #[test]
    fn short_drag_snaps_back_without_commit() {
        let mut s = stack(&['a', 'b']);
        let session = s.session_id();
        flick(&mut s, Vec2::new(30.0, 0.0));
        let events = run(&mut s, 200);
        assert_eq!(events, vec![StackEvent::SnappedBack]);
        assert_eq!(s.head(), 0);
        assert_eq!(s.session_id(), session);
    }

    #[test]
    fn gestures_are_refused_during_advance_delay() {
        let config = StackConfig::default().with_advance_delay(Duration::from_millis(500));
        let mut s = CardStack::new(Deck::from(vec!['a', 'b']), NoObserver, config)
            .expect("config is valid");
        flick(&mut s, Vec2::new(200.0, 0.0));
        let events = run(&mut s, 15);
        assert_eq!(events.len(), 1);
        assert!(s.is_animating());
        assert!(!s.can_commit());

        // Same session, but the cursor is locked.
        s.handle(StackInput::GestureBegan {
            session: s.session_id(),
        });
        assert!(s.session().is_idle());

        let events = run(&mut s, 40);
        assert_eq!(events, vec![StackEvent::Advanced { head: 1 }]);
    }

    #[test]
    fn zero_delay_advances_on_exit_frame() {
        let config = StackConfig::default().with_advance_delay(Duration::ZERO);
        let mut s = CardStack::new(Deck::from(vec!['a', 'b']), NoObserver, config)
            .expect("config is valid");
        flick(&mut s, Vec2::new(0.0, -300.0));
        let mut saw = Vec::new();
        while s.head() == 0 {
            let events = s.handle(FRAME);
            if !events.is_empty() {
                saw = events;
            }
        }
        assert_eq!(
            saw,
            vec![
                StackEvent::Swiped {
                    position: 0,
                    direction: Direction::Up
                },
                StackEvent::Advanced { head: 1 }
            ]
        );
    }

    #[test]
    fn stale_messages_are_dropped() {
        let mut s = stack(&['a', 'b', 'c']);
        let old = s.session_id();
        flick(&mut s, Vec2::new(200.0, 0.0));
        run(&mut s, 30);
        assert_eq!(s.head(), 1);

        s.post(SessionEvent::ExitFinished {
            session: old,
            direction: Direction::Right,
        });
        assert!(s.handle(FRAME).is_empty());
        s.handle(StackInput::GestureBegan { session: old });
        assert!(s.session().is_idle());
        assert_eq!(s.head(), 1);
    }

    #[test]
    fn exhausted_is_reported_once() {
        let mut s = stack(&['a']);
        flick(&mut s, Vec2::new(200.0, 0.0));
        let events = run(&mut s, 30);
        assert_eq!(events.last(), Some(&StackEvent::Exhausted));
        assert!(!s.has_more());
        assert!(!s.can_commit());
        assert!(s.layers().is_empty());

        flick(&mut s, Vec2::new(200.0, 0.0));
        assert!(run(&mut s, 30).is_empty());
    }

    #[test]
    fn observer_receives_swiped_card() {
        let mut seen = Vec::new();
        {
            let mut s = CardStack::new(
                Deck::from(vec!["x", "y"]),
                observer_fn(|card: &&str, d: Direction| seen.push((*card, d))),
                StackConfig::default(),
            )
            .expect("config is valid");
            let session = s.session_id();
            s.handle(StackInput::GestureBegan { session });
            s.handle(StackInput::GestureEnded {
                session,
                translation: Vec2::new(5.0, 0.0),
                velocity: Vec2::new(900.0, 0.0),
            });
            for _ in 0..30 {
                s.handle(FRAME);
            }
        }
        assert_eq!(seen, vec![("x", Direction::Right)]);
    }

    #[test]
    fn reset_and_replace_start_over() {
        let mut s = stack(&['a', 'b']);
        flick(&mut s, Vec2::new(200.0, 0.0));
        run(&mut s, 30);
        let before = s.session_id();
        s.reset();
        assert_eq!(s.head(), 0);
        assert_ne!(s.session_id(), before);
        assert!(s.is_settled());

        assert_eq!(
            s.replace_deck(Deck::from(vec!['z'])),
            vec![StackEvent::DeckReplaced]
        );
        assert_eq!(s.visible_window(), &['z']);
    }

    #[test]
    fn pump_drains_posted_input() {
        let mut s = stack(&['a', 'b']);
        let tx = s.sender();
        let session = s.session_id();
        tx.send(StackInput::GestureBegan { session })
            .expect("stack is alive");
        tx.send(StackInput::GestureEnded {
            session,
            translation: Vec2::new(-300.0, 0.0),
            velocity: Vec2::ZERO,
        })
        .expect("stack is alive");
        for _ in 0..30 {
            tx.send(FRAME).expect("stack is alive");
        }
        let events = s.pump();
        assert_eq!(events.last(), Some(&StackEvent::Advanced { head: 1 }));

        drop(s);
        assert_eq!(tx.send(FRAME), Err(SendError(FRAME)));
    }

    #[test]
    fn exit_in_flight_blocks_commit() {
        let mut s = stack(&['a', 'b']);
        flick(&mut s, Vec2::new(200.0, 0.0));
        assert_eq!(s.session().state(), BridgeState::Committing(Direction::Right));
        assert!(s.cursor().can_commit());
        assert!(!s.can_commit());
        assert!(!s.is_settled());

        s.handle(StackInput::GestureBegan {
            session: s.session_id(),
        });
        assert_eq!(s.session().state(), BridgeState::Committing(Direction::Right));
    }

    struct Refeed(Option<InputSender>);

    impl SwipeObserver<char> for Refeed {
        type Error = SendError;
        fn on_swipe(&mut self, _card: &char, _direction: Direction) -> Result<(), SendError> {
            if let Some(tx) = &self.0 {
                for _ in 0..40 {
                    tx.send(FRAME)?;
                }
            }
            Ok(())
        }
    }

    #[test]
    fn input_posted_while_pumping_waits_for_next_pump() {
        let mut s = CardStack::new(
            Deck::from(vec!['a', 'b', 'c']),
            Refeed(None),
            StackConfig::default(),
        )
        .expect("default config is valid");
        let tx = s.sender();
        s.observer_mut().0 = Some(tx.clone());

        let session = s.session_id();
        tx.send(StackInput::GestureBegan { session })
            .expect("stack is alive");
        tx.send(StackInput::GestureEnded {
            session,
            translation: Vec2::new(-300.0, 0.0),
            velocity: Vec2::ZERO,
        })
        .expect("stack is alive");
        for _ in 0..14 {
            tx.send(FRAME).expect("stack is alive");
        }

        assert_eq!(
            s.pump(),
            vec![StackEvent::Swiped {
                position: 0,
                direction: Direction::Left
            }]
        );
        assert_eq!(s.head(), 0);
        assert!(s.is_animating());

        assert_eq!(s.pump(), vec![StackEvent::Advanced { head: 1 }]);
        assert!(s.pump().is_empty());
    }
}
