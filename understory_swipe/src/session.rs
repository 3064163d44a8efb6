// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture session: the per-card bridge from drag input to exit or snap-back animation.
//!
//! ## Lifecycle
//!
//! A [`GestureSession`] is created for each card that becomes top and is
//! dropped when the top card changes. It owns its [`TransformChannels`], which
//! start at identity, so nothing from a previous card can leak onto the next.
//!
//! ```text
//! Idle ──begin──▶ Dragging ──end(commit)──▶ Committing ──tick…──▶ Idle  (emits ExitFinished)
//!   ▲                │  └──end(none)/cancel──▶ SnappingBack ──tick…──▶ Idle  (emits SnapBackFinished)
//!   └────────────────┘
//! ```
//!
//! ## Messages, not callbacks
//!
//! The session never touches stack state. Animation completion is reported by
//! [`GestureSession::tick`] as a [`SessionEvent`] tagged with the session's
//! [`SessionId`]; the owner of the stack consumes those events in order and
//! drops any whose id no longer matches the live session.
//!
//! ```
//! use core::time::Duration;
//! use kurbo::Vec2;
//! use understory_swipe::session::{GestureSession, ReleaseAction, SessionEvent, SessionId, SwipeConfig};
//! use understory_swipe::types::Direction;
//!
//! let mut s = GestureSession::new(SessionId::new(1), SwipeConfig::default());
//! assert!(s.begin());
//! s.update(Vec2::new(260.0, 10.0));
//! let action = s.end(Vec2::new(260.0, 10.0), Vec2::ZERO, true);
//! assert_eq!(action, ReleaseAction::Commit(Direction::Right));
//!
//! let mut done = None;
//! while done.is_none() {
//!     done = s.tick(Duration::from_millis(16));
//! }
//! assert_eq!(done, Some(SessionEvent::ExitFinished { session: SessionId::new(1), direction: Direction::Right }));
//! ```

use core::time::Duration;

use kurbo::{Affine, Size, Vec2};

use crate::motion::{Easing, Motion, SpringConfig, TransformChannels};
use crate::resolver::{exit_target, release_in};
use crate::types::{Direction, SwipeDirections, Thresholds};

/// Identity of one gesture session.
///
/// Ids increase monotonically within a stack; a new id is minted every time the top card changes.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SessionId(u64);

impl SessionId {
    /// Wrap a raw id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The id following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl core::fmt::Display for SessionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

/// Drag feel and exit/snap-back animation parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotionConfig {
    /// Rotation in degrees reached at half a viewport width of horizontal drag.
    pub max_rotation: f64,
    /// Factor applied to vertical drag before it reaches the card.
    pub vertical_damping: f64,
    /// Duration of the exit translation and scale animation.
    pub exit_duration: Duration,
    /// Fraction of [`Self::exit_duration`] over which the card fades out.
    pub exit_fade_ratio: f64,
    /// Scale the card shrinks to while leaving.
    pub exit_scale: f64,
    /// Exit distance as a multiple of the viewport dimension on the exit axis.
    pub exit_distance: f64,
    /// Easing used by the exit animation.
    pub exit_easing: Easing,
    /// Spring used to return the card to center.
    pub spring: SpringConfig,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            max_rotation: 20.0,
            vertical_damping: 0.5,
            exit_duration: Duration::from_millis(200),
            exit_fade_ratio: 0.8,
            exit_scale: 0.8,
            exit_distance: 1.5,
            exit_easing: Easing::EaseInOutQuad,
            spring: SpringConfig::default(),
        }
    }
}

impl MotionConfig {
    /// Duration of the exit fade.
    ///
    /// The ratio is clamped to `[0, 1]`; a non-finite ratio fades over the whole exit.
    pub fn fade_duration(&self) -> Duration {
        let ratio = if self.exit_fade_ratio.is_finite() {
            self.exit_fade_ratio.clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.exit_duration.mul_f64(ratio)
    }
}

/// Everything a session needs to interpret a drag.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SwipeConfig {
    /// Size of the area the stack occupies; exit distances and rotation scale with it.
    pub viewport: Size,
    /// Commit thresholds.
    pub thresholds: Thresholds,
    /// Directions that may commit.
    pub directions: SwipeDirections,
    /// Animation parameters.
    pub motion: MotionConfig,
}

impl SwipeConfig {
    /// Default viewport used when none is configured (a typical phone in points).
    pub const DEFAULT_VIEWPORT: Size = Size::new(390.0, 844.0);

    /// Config for `viewport` with thresholds scaled to it and default motion.
    pub fn for_viewport(viewport: Size) -> Self {
        Self {
            viewport,
            thresholds: Thresholds::for_viewport(viewport),
            directions: SwipeDirections::all(),
            motion: MotionConfig::default(),
        }
    }
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self::for_viewport(Self::DEFAULT_VIEWPORT)
    }
}

/// Bridge state of a session.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum BridgeState {
    /// No drag; the card is at rest.
    #[default]
    Idle,
    /// Following the finger.
    Dragging,
    /// Playing the exit animation for a committed direction.
    Committing(Direction),
    /// Springing back to center.
    SnappingBack,
}

/// What a release did.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ReleaseAction {
    /// Exit animation started for this direction.
    Commit(Direction),
    /// Snap-back started.
    SnapBack,
    /// The session was not dragging; nothing happened.
    Ignored,
}

/// Completion message emitted by [`GestureSession::tick`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SessionEvent {
    /// The exit animation finished; the owner should commit `direction`.
    ExitFinished {
        /// Session that produced the event.
        session: SessionId,
        /// Direction the card left in.
        direction: Direction,
    },
    /// The card is back at center.
    SnapBackFinished {
        /// Session that produced the event.
        session: SessionId,
    },
}

impl SessionEvent {
    /// Session that produced the event.
    pub const fn session(&self) -> SessionId {
        match *self {
            Self::ExitFinished { session, .. } | Self::SnapBackFinished { session } => session,
        }
    }
}

/// Interaction session for the current top card.
#[derive(Clone, Debug)]
pub struct GestureSession {
    id: SessionId,
    config: SwipeConfig,
    state: BridgeState,
    channels: TransformChannels,
    exit_velocity: Vec2,
}

impl GestureSession {
    /// Create a session at rest with identity channels.
    pub fn new(id: SessionId, config: SwipeConfig) -> Self {
        Self {
            id,
            config,
            state: BridgeState::Idle,
            channels: TransformChannels::identity(),
            exit_velocity: Vec2::ZERO,
        }
    }

    /// Session id.
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Current bridge state.
    pub const fn state(&self) -> BridgeState {
        self.state
    }

    /// Configuration the session was created with.
    pub const fn config(&self) -> &SwipeConfig {
        &self.config
    }

    /// Live transform channels.
    pub const fn channels(&self) -> &TransformChannels {
        &self.channels
    }

    /// Composite transform of the card.
    pub fn transform(&self) -> Affine {
        self.channels.transform()
    }

    /// Current opacity of the card.
    pub const fn opacity(&self) -> f64 {
        self.channels.opacity.value()
    }

    /// Effective release velocity of the last committed release, zero otherwise.
    pub const fn exit_velocity(&self) -> Vec2 {
        self.exit_velocity
    }

    /// True if the session is neither dragging nor animating.
    pub fn is_idle(&self) -> bool {
        self.state == BridgeState::Idle
    }

    /// Start a drag.
    ///
    /// Interrupts a snap-back in progress. Refused while the card is already
    /// leaving or a drag is active; returns whether a drag started.
    pub fn begin(&mut self) -> bool {
        match self.state {
            BridgeState::Idle | BridgeState::SnappingBack => {
                self.channels.cancel_all();
                self.state = BridgeState::Dragging;
                tracing::trace!(session = %self.id, "drag began");
                true
            }
            BridgeState::Dragging | BridgeState::Committing(_) => {
                tracing::trace!(session = %self.id, state = ?self.state, "begin ignored");
                false
            }
        }
    }

    /// Apply the cumulative drag translation since the gesture began.
    ///
    /// Ignored unless dragging.
    pub fn update(&mut self, translation: Vec2) {
        if self.state != BridgeState::Dragging || !translation.is_finite() {
            return;
        }
        let motion = &self.config.motion;
        let half_width = self.config.viewport.width / 2.0;
        let rotation = if half_width > 0.0 {
            (translation.x / half_width * motion.max_rotation)
                .clamp(-motion.max_rotation, motion.max_rotation)
        } else {
            0.0
        };
        self.channels.translate_x.set(translation.x);
        self.channels
            .translate_y
            .set(translation.y * motion.vertical_damping);
        self.channels.rotation.set(rotation);
    }

    /// Release the drag.
    ///
    /// `can_commit` reports whether the stack will accept a swipe; when it
    /// will not, a committing release snaps back instead so the card never
    /// leaves without a matching commit.
    pub fn end(&mut self, translation: Vec2, velocity: Vec2, can_commit: bool) -> ReleaseAction {
        if self.state != BridgeState::Dragging {
            tracing::trace!(session = %self.id, state = ?self.state, "release ignored");
            return ReleaseAction::Ignored;
        }
        self.update(translation);
        let release = release_in(
            translation,
            velocity,
            &self.config.thresholds,
            self.config.directions,
        );
        match release.outcome.direction() {
            Some(direction) if can_commit => {
                self.exit_velocity = release.velocity;
                self.start_exit(direction);
                ReleaseAction::Commit(direction)
            }
            Some(direction) => {
                tracing::debug!(session = %self.id, %direction, "stack busy, snapping back");
                self.start_snap_back();
                ReleaseAction::SnapBack
            }
            None => {
                self.start_snap_back();
                ReleaseAction::SnapBack
            }
        }
    }

    /// Abort the drag as if released below threshold.
    pub fn cancel(&mut self) {
        if self.state == BridgeState::Dragging {
            tracing::trace!(session = %self.id, "drag cancelled");
            self.start_snap_back();
        }
    }

    /// Advance running animations by `dt`.
    ///
    /// Returns the completion event on the tick an exit or snap-back finishes.
    pub fn tick(&mut self, dt: Duration) -> Option<SessionEvent> {
        match self.state {
            BridgeState::Committing(direction) => {
                if self.channels.tick(dt) || !self.channels.is_animating() {
                    self.state = BridgeState::Idle;
                    Some(SessionEvent::ExitFinished {
                        session: self.id,
                        direction,
                    })
                } else {
                    None
                }
            }
            BridgeState::SnappingBack => {
                if self.channels.tick(dt) || !self.channels.is_animating() {
                    self.state = BridgeState::Idle;
                    Some(SessionEvent::SnapBackFinished { session: self.id })
                } else {
                    None
                }
            }
            BridgeState::Idle | BridgeState::Dragging => None,
        }
    }

    /// Opacity of the overlay for `direction`.
    ///
    /// Zero until the card has travelled `min_travel` toward `direction`, rising
    /// linearly to one at the commit threshold and clamped there.
    pub fn overlay_opacity(&self, direction: Direction, min_travel: f64) -> f64 {
        let t = self.channels.translation();
        let travel = match direction {
            Direction::Left => -t.x,
            Direction::Right => t.x,
            Direction::Up => -t.y,
            Direction::Down => t.y,
        };
        let threshold = self.config.thresholds.position;
        if threshold <= min_travel {
            return if travel >= threshold { 1.0 } else { 0.0 };
        }
        ((travel - min_travel) / (threshold - min_travel)).clamp(0.0, 1.0)
    }

    fn start_exit(&mut self, direction: Direction) {
        let motion = self.config.motion;
        let target = exit_target(
            direction,
            self.channels.translation(),
            self.config.viewport,
            motion.exit_distance,
        );
        let timing = |to: f64, duration: Duration| Motion::Timing {
            to,
            duration,
            easing: motion.exit_easing,
        };
        self.channels
            .translate_x
            .animate(timing(target.x, motion.exit_duration));
        self.channels
            .translate_y
            .animate(timing(target.y, motion.exit_duration));
        self.channels
            .opacity
            .animate(timing(0.0, motion.fade_duration()));
        self.channels
            .scale
            .animate(timing(motion.exit_scale, motion.exit_duration));
        self.state = BridgeState::Committing(direction);
        tracing::debug!(session = %self.id, %direction, "exit animation started");
    }

    fn start_snap_back(&mut self) {
        let spring = Motion::Spring {
            to: 0.0,
            config: self.config.motion.spring,
        };
        self.channels.translate_x.animate(spring);
        self.channels.translate_y.animate(spring);
        self.channels.rotation.animate(spring);
        self.exit_velocity = Vec2::ZERO;
        self.state = BridgeState::SnappingBack;
    }
}
