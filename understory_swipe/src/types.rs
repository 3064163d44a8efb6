// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for swipe resolution: directions, outcomes, direction masks, and thresholds.
//!
//! ## Overview
//!
//! These types are shared by the [`resolver`](crate::resolver) and the
//! [`session`](crate::session) state machine, and are re-exported by downstream
//! card-stack engines so observers can name the direction of a swipe.

use kurbo::Size;

/// A committed swipe direction.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    /// Negative horizontal travel ("nope").
    Left,
    /// Positive horizontal travel ("like").
    Right,
    /// Negative vertical travel ("super like").
    Up,
    /// Positive vertical travel.
    Down,
}

impl Direction {
    /// All directions in declaration order.
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Up, Self::Down];

    /// True for [`Left`](Self::Left) and [`Right`](Self::Right).
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// The single-bit mask for this direction.
    pub const fn mask(self) -> SwipeDirections {
        match self {
            Self::Left => SwipeDirections::LEFT,
            Self::Right => SwipeDirections::RIGHT,
            Self::Up => SwipeDirections::UP,
            Self::Down => SwipeDirections::DOWN,
        }
    }

    /// Unit vector pointing along the direction in screen space (y grows downward).
    pub const fn unit(self) -> kurbo::Vec2 {
        match self {
            Self::Left => kurbo::Vec2::new(-1.0, 0.0),
            Self::Right => kurbo::Vec2::new(1.0, 0.0),
            Self::Up => kurbo::Vec2::new(0.0, -1.0),
            Self::Down => kurbo::Vec2::new(0.0, 1.0),
        }
    }
}

impl core::fmt::Display for Direction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        })
    }
}

/// Classified result of a released gesture.
///
/// Produced once per release by [`resolve`](crate::resolver::resolve) and consumed
/// exactly once by the session that released.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Outcome {
    /// Released below threshold; the card returns to center.
    #[default]
    None,
    /// Swipe to the left.
    Left,
    /// Swipe to the right.
    Right,
    /// Swipe upward.
    Up,
    /// Swipe downward.
    Down,
}

impl Outcome {
    /// The committed direction, or `None` for [`Outcome::None`].
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::None => None,
            Self::Left => Some(Direction::Left),
            Self::Right => Some(Direction::Right),
            Self::Up => Some(Direction::Up),
            Self::Down => Some(Direction::Down),
        }
    }

    /// True if this outcome commits a swipe.
    pub const fn is_swipe(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl From<Direction> for Outcome {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Left => Self::Left,
            Direction::Right => Self::Right,
            Direction::Up => Self::Up,
            Direction::Down => Self::Down,
        }
    }
}

bitflags::bitflags! {
    /// Set of directions a stack accepts.
    ///
    /// A release that resolves to a direction outside the set degrades to
    /// [`Outcome::None`] and snaps back.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SwipeDirections: u8 {
        /// Accept left swipes.
        const LEFT  = 0b0000_0001;
        /// Accept right swipes.
        const RIGHT = 0b0000_0010;
        /// Accept upward swipes.
        const UP    = 0b0000_0100;
        /// Accept downward swipes.
        const DOWN  = 0b0000_1000;
        /// Left and right only.
        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
        /// Up and down only.
        const VERTICAL = Self::UP.bits() | Self::DOWN.bits();
    }
}

impl Default for SwipeDirections {
    fn default() -> Self {
        Self::all()
    }
}

impl SwipeDirections {
    /// True if `direction` is enabled.
    pub const fn allows(self, direction: Direction) -> bool {
        self.contains(direction.mask())
    }
}

/// Commit thresholds used by the resolver.
///
/// Distances are in the same screen units as gesture translation; velocities in units per second.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Thresholds {
    /// Travel along the dominant axis beyond which a release commits.
    pub position: f64,
    /// Release speed along the dominant axis beyond which a release commits.
    pub velocity: f64,
    /// Release speeds below this are treated as noise and replaced by [`Self::decisive_velocity`].
    pub velocity_floor: f64,
    /// Synthetic exit speed used when the measured speed is below the floor.
    pub decisive_velocity: f64,
}

impl Thresholds {
    /// Fraction of the viewport width used as the position threshold by [`Self::for_viewport`].
    pub const VIEWPORT_FRACTION: f64 = 0.25;

    /// Thresholds scaled to a viewport: a quarter of its width for travel, defaults otherwise.
    pub fn for_viewport(viewport: Size) -> Self {
        Self {
            position: viewport.width * Self::VIEWPORT_FRACTION,
            ..Self::default()
        }
    }

    /// True if every field is finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        [
            self.position,
            self.velocity,
            self.velocity_floor,
            self.decisive_velocity,
        ]
        .iter()
        .all(|v| v.is_finite() && *v > 0.0)
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            position: 100.0,
            velocity: 400.0,
            velocity_floor: 100.0,
            decisive_velocity: 500.0,
        }
    }
}
