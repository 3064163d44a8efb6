// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Swipe resolver: classify a released gesture into an [`Outcome`].
//!
//! ## Classification
//!
//! 1) Pick the axis the gesture belongs to by comparing `|translation.x|` and
//!    `|translation.y|`. Equal travel is broken by the larger release speed,
//!    and a full tie goes to the horizontal axis.
//! 2) Test only that axis: it commits when its travel exceeds
//!    [`Thresholds::position`] or its release speed exceeds [`Thresholds::velocity`].
//! 3) The sign of the travel on that axis picks the direction. With zero travel
//!    (a pure flick) the sign of the velocity is used instead.
//!
//! Axis dominance is decided before thresholds, so a long diagonal drag that is
//! mostly vertical never commits horizontally even if its horizontal travel
//! alone would pass.
//!
//! ## Exit velocity
//!
//! A committed release whose speed on the committing axis is under
//! [`Thresholds::velocity_floor`] gets a synthetic speed of
//! [`Thresholds::decisive_velocity`] in the direction of travel, so slow drags
//! still leave the screen briskly.
//!
//! All functions here are pure.
//!
//! ```
//! use kurbo::Vec2;
//! use understory_swipe::resolver::resolve;
//! use understory_swipe::types::{Outcome, Thresholds};
//!
//! let t = Thresholds { position: 100.0, velocity: 400.0, ..Thresholds::default() };
//! assert_eq!(resolve(Vec2::new(300.0, 0.0), Vec2::ZERO, &t), Outcome::Right);
//! assert_eq!(resolve(Vec2::new(50.0, 0.0), Vec2::ZERO, &t), Outcome::None);
//! assert_eq!(resolve(Vec2::new(20.0, 300.0), Vec2::ZERO, &t), Outcome::Down);
//! ```

use kurbo::{Size, Vec2};

use crate::types::{Direction, Outcome, SwipeDirections, Thresholds};

/// Result of [`release`]: the outcome plus the effective exit velocity.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Release {
    /// Classified outcome.
    pub outcome: Outcome,
    /// Velocity to carry into the exit animation.
    ///
    /// Equal to the measured velocity except on the committing axis, where a
    /// sub-floor speed is replaced by the decisive speed. Zero for [`Outcome::None`].
    pub velocity: Vec2,
}

impl Release {
    const NONE: Self = Self {
        outcome: Outcome::None,
        velocity: Vec2::ZERO,
    };
}

/// Classify a release. See the [module docs](self) for the rules.
pub fn resolve(translation: Vec2, velocity: Vec2, thresholds: &Thresholds) -> Outcome {
    release(translation, velocity, thresholds).outcome
}

/// Classify a release, honoring a mask of enabled directions.
///
/// A direction outside `directions` yields [`Outcome::None`].
pub fn resolve_in(
    translation: Vec2,
    velocity: Vec2,
    thresholds: &Thresholds,
    directions: SwipeDirections,
) -> Outcome {
    release_in(translation, velocity, thresholds, directions).outcome
}

/// Classify a release and compute its effective exit velocity.
pub fn release(translation: Vec2, velocity: Vec2, thresholds: &Thresholds) -> Release {
    release_in(translation, velocity, thresholds, SwipeDirections::all())
}

/// [`release`] with a direction mask.
pub fn release_in(
    translation: Vec2,
    velocity: Vec2,
    thresholds: &Thresholds,
    directions: SwipeDirections,
) -> Release {
    if !(translation.is_finite() && velocity.is_finite()) {
        return Release::NONE;
    }

    let (tx, ty) = (translation.x.abs(), translation.y.abs());
    let horizontal = if tx == ty {
        velocity.x.abs() >= velocity.y.abs()
    } else {
        tx > ty
    };
    let (travel, speed) = if horizontal {
        (translation.x, velocity.x)
    } else {
        (translation.y, velocity.y)
    };

    let commits = travel.abs() > thresholds.position || speed.abs() > thresholds.velocity;
    if !commits {
        return Release::NONE;
    }

    let positive = if travel != 0.0 { travel > 0.0 } else { speed > 0.0 };
    let direction = match (horizontal, positive) {
        (true, true) => Direction::Right,
        (true, false) => Direction::Left,
        (false, true) => Direction::Down,
        (false, false) => Direction::Up,
    };
    if !directions.allows(direction) {
        return Release::NONE;
    }

    let axis_speed = if speed.abs() < thresholds.velocity_floor {
        if positive {
            thresholds.decisive_velocity
        } else {
            -thresholds.decisive_velocity
        }
    } else {
        speed
    };
    let velocity = if horizontal {
        Vec2::new(axis_speed, velocity.y)
    } else {
        Vec2::new(velocity.x, axis_speed)
    };

    Release {
        outcome: direction.into(),
        velocity,
    }
}

/// Where a committed card should travel to so it fully leaves the viewport.
///
/// Horizontal exits go to `±distance_factor · width` and keep the current
/// vertical offset. Vertical exits go to `±distance_factor · height` and carry
/// the horizontal drag on at twice its current offset.
pub fn exit_target(
    direction: Direction,
    translation: Vec2,
    viewport: Size,
    distance_factor: f64,
) -> Vec2 {
    match direction {
        Direction::Left => Vec2::new(-viewport.width * distance_factor, translation.y),
        Direction::Right => Vec2::new(viewport.width * distance_factor, translation.y),
        Direction::Up => Vec2::new(translation.x * 2.0, -viewport.height * distance_factor),
        Direction::Down => Vec2::new(translation.x * 2.0, viewport.height * distance_factor),
    }
}
