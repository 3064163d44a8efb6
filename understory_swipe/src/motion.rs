// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animated scalar channels and the per-card transform channel set.
//!
//! ## Overview
//!
//! A [`Channel`] is a scalar value with at most one running animation. Setting
//! the value directly cancels the animation. Animations are advanced explicitly
//! with [`Channel::tick`]; nothing here reads a clock.
//!
//! Two kinds of motion are supported:
//! - [`Motion::Timing`]: fixed duration with an [`Easing`] curve.
//! - [`Motion::Spring`]: damped spring integrated with fixed 1 ms substeps, so the
//!   same sequence of `tick` calls always produces the same values.
//!
//! [`TransformChannels`] groups the five channels that drive a card:
//! translation x/y, rotation (degrees), scale, and opacity.

use core::time::Duration;

use kurbo::{Affine, Vec2};

/// Easing curve for [`Motion::Timing`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Quadratic acceleration.
    EaseInQuad,
    /// Quadratic deceleration.
    EaseOutQuad,
    /// Quadratic acceleration then deceleration.
    #[default]
    EaseInOutQuad,
}

impl Easing {
    /// Map linear progress `t` in `[0, 1]` to eased progress.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseInQuad => t * t,
            Self::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u / 2.0
                }
            }
        }
    }
}

/// Damped spring parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpringConfig {
    /// Velocity damping coefficient.
    pub damping: f64,
    /// Spring constant.
    pub stiffness: f64,
    /// Mass of the animated value.
    pub mass: f64,
    /// Distance to target under which the spring may settle.
    pub rest_displacement: f64,
    /// Speed under which the spring may settle.
    pub rest_speed: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            damping: 15.0,
            stiffness: 100.0,
            mass: 1.0,
            rest_displacement: 0.01,
            rest_speed: 2.0,
        }
    }
}

impl SpringConfig {
    /// True if every field is finite and strictly positive and the spring is
    /// stable under the fixed 1 ms integration step.
    pub fn is_valid(&self) -> bool {
        let positive = [
            self.damping,
            self.stiffness,
            self.mass,
            self.rest_displacement,
            self.rest_speed,
        ]
        .iter()
        .all(|v| v.is_finite() && *v > 0.0);
        positive && self.is_stable()
    }

    /// True if semi-implicit Euler with 1 ms steps converges for this spring.
    ///
    /// With `a = h²·k/m` and `b = h·c/m` the step is stable when `b < 2` and
    /// `a + 2b < 4`.
    pub fn is_stable(&self) -> bool {
        let h = SPRING_STEP_SECS;
        let a = h * h * self.stiffness / self.mass;
        let b = h * self.damping / self.mass;
        a.is_finite() && b.is_finite() && b < 2.0 && a + 2.0 * b < 4.0
    }
}

/// Description of an animation toward a target value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Motion {
    /// Reach `to` after `duration`, following `easing`.
    Timing {
        /// Target value.
        to: f64,
        /// Total duration.
        duration: Duration,
        /// Progress curve.
        easing: Easing,
    },
    /// Spring toward `to`.
    Spring {
        /// Target value.
        to: f64,
        /// Spring parameters.
        config: SpringConfig,
    },
}

impl Motion {
    /// Target value of the motion.
    pub const fn target(&self) -> f64 {
        match *self {
            Self::Timing { to, .. } | Self::Spring { to, .. } => to,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Running {
    Timing {
        from: f64,
        to: f64,
        duration: Duration,
        elapsed: Duration,
        easing: Easing,
    },
    Spring {
        to: f64,
        velocity: f64,
        config: SpringConfig,
    },
}

const SPRING_STEP_NANOS: u128 = 1_000_000;
const SPRING_STEP_SECS: f64 = 1e-3;

/// A scalar with at most one running animation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Channel {
    value: f64,
    running: Option<Running>,
}

impl Channel {
    /// A channel resting at `value`.
    pub const fn at(value: f64) -> Self {
        Self {
            value,
            running: None,
        }
    }

    /// Current value.
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// True while an animation is running.
    pub const fn is_animating(&self) -> bool {
        self.running.is_some()
    }

    /// Set the value directly, cancelling any running animation.
    pub fn set(&mut self, value: f64) {
        self.running = None;
        self.value = value;
    }

    /// Cancel any running animation, leaving the value where it is.
    pub fn cancel(&mut self) {
        self.running = None;
    }

    /// Start `motion` from the current value, replacing any running animation.
    ///
    /// A zero-duration timing jumps to the target immediately.
    pub fn animate(&mut self, motion: Motion) {
        self.running = match motion {
            Motion::Timing { to, duration, .. } if duration.is_zero() => {
                self.value = to;
                None
            }
            Motion::Timing {
                to,
                duration,
                easing,
            } => Some(Running::Timing {
                from: self.value,
                to,
                duration,
                elapsed: Duration::ZERO,
                easing,
            }),
            Motion::Spring { to, config } => Some(Running::Spring {
                to,
                velocity: 0.0,
                config,
            }),
        };
    }

    /// Advance the running animation by `dt`.
    ///
    /// Returns `true` if an animation finished during this tick.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let Some(running) = self.running.as_mut() else {
            return false;
        };
        let done = match running {
            Running::Timing {
                from,
                to,
                duration,
                elapsed,
                easing,
            } => {
                *elapsed = elapsed.saturating_add(dt);
                let t = elapsed.as_secs_f64() / duration.as_secs_f64();
                if t >= 1.0 {
                    self.value = *to;
                    true
                } else {
                    self.value = *from + (*to - *from) * easing.apply(t);
                    false
                }
            }
            Running::Spring {
                to,
                velocity,
                config,
            } => {
                let mut remaining = dt.as_nanos();
                let mut settled = false;
                while remaining > 0 {
                    let step = remaining.min(SPRING_STEP_NANOS);
                    remaining -= step;
                    #[allow(
                        clippy::cast_precision_loss,
                        reason = "A substep is at most one millisecond of nanoseconds."
                    )]
                    let h = step as f64 * 1e-9;
                    let force = -config.stiffness * (self.value - *to) - config.damping * *velocity;
                    *velocity += force / config.mass * h;
                    self.value += *velocity * h;
                    if !(self.value.is_finite() && velocity.is_finite()) {
                        // Diverged; land on the target rather than animate forever.
                        self.value = *to;
                        settled = true;
                        break;
                    }
                    if (self.value - *to).abs() < config.rest_displacement
                        && velocity.abs() < config.rest_speed
                    {
                        self.value = *to;
                        settled = true;
                        break;
                    }
                }
                settled
            }
        };
        if done {
            self.running = None;
        }
        done
    }
}

/// Transform channels for one card.
///
/// Created at identity for each new top card and never shared between cards.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformChannels {
    /// Horizontal translation.
    pub translate_x: Channel,
    /// Vertical translation.
    pub translate_y: Channel,
    /// Rotation in degrees, clockwise-positive in screen space.
    pub rotation: Channel,
    /// Uniform scale.
    pub scale: Channel,
    /// Opacity in `[0, 1]`.
    pub opacity: Channel,
}

impl Default for TransformChannels {
    fn default() -> Self {
        Self::identity()
    }
}

impl TransformChannels {
    /// Channels at rest with an identity transform and full opacity.
    pub const fn identity() -> Self {
        Self {
            translate_x: Channel::at(0.0),
            translate_y: Channel::at(0.0),
            rotation: Channel::at(0.0),
            scale: Channel::at(1.0),
            opacity: Channel::at(1.0),
        }
    }

    fn channels_mut(&mut self) -> [&mut Channel; 5] {
        [
            &mut self.translate_x,
            &mut self.translate_y,
            &mut self.rotation,
            &mut self.scale,
            &mut self.opacity,
        ]
    }

    /// Current translation.
    pub fn translation(&self) -> Vec2 {
        Vec2::new(self.translate_x.value(), self.translate_y.value())
    }

    /// Composite transform: translate, then rotate, then scale.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.translation())
            * Affine::rotate(self.rotation.value().to_radians())
            * Affine::scale(self.scale.value())
    }

    /// True if any channel is animating.
    pub fn is_animating(&self) -> bool {
        self.translate_x.is_animating()
            || self.translate_y.is_animating()
            || self.rotation.is_animating()
            || self.scale.is_animating()
            || self.opacity.is_animating()
    }

    /// Cancel every running animation.
    pub fn cancel_all(&mut self) {
        for c in self.channels_mut() {
            c.cancel();
        }
    }

    /// Advance every channel by `dt`.
    ///
    /// Returns `true` when at least one channel was animating before the tick
    /// and none is animating after it.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let was_animating = self.is_animating();
        for c in self.channels_mut() {
            c.tick(dt);
        }
        was_animating && !self.is_animating()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    #[test]
    fn easing_endpoints() {
        for e in [
            Easing::Linear,
            Easing::EaseInQuad,
            Easing::EaseOutQuad,
            Easing::EaseInOutQuad,
        ] {
            assert_eq!(e.apply(0.0), 0.0);
            assert_eq!(e.apply(1.0), 1.0);
            assert_eq!(e.apply(2.0), 1.0);
        }
        assert_eq!(Easing::EaseInOutQuad.apply(0.5), 0.5);
        assert!(Easing::EaseInQuad.apply(0.25) < 0.25);
        assert!(Easing::EaseOutQuad.apply(0.25) > 0.25);
    }

    #[test]
    fn timing_reaches_target_after_duration() {
        let mut c = Channel::at(0.0);
        c.animate(Motion::Timing {
            to: 100.0,
            duration: Duration::from_millis(200),
            easing: Easing::Linear,
        });
        assert!(!c.tick(Duration::from_millis(100)));
        assert!((c.value() - 50.0).abs() < 1e-9);
        assert!(c.tick(Duration::from_millis(100)));
        assert_eq!(c.value(), 100.0);
        assert!(!c.is_animating());
        // Finished channels report nothing further.
        assert!(!c.tick(FRAME));
    }

    #[test]
    fn zero_duration_timing_jumps() {
        let mut c = Channel::at(3.0);
        c.animate(Motion::Timing {
            to: 7.0,
            duration: Duration::ZERO,
            easing: Easing::default(),
        });
        assert_eq!(c.value(), 7.0);
        assert!(!c.is_animating());
    }

    #[test]
    fn spring_settles_on_target() {
        let mut c = Channel::at(240.0);
        c.animate(Motion::Spring {
            to: 0.0,
            config: SpringConfig::default(),
        });
        let mut finished = false;
        for _ in 0..600 {
            if c.tick(FRAME) {
                finished = true;
                break;
            }
        }
        assert!(finished, "spring never settled");
        assert_eq!(c.value(), 0.0);
    }

    #[test]
    fn spring_is_deterministic_across_frame_splits() {
        let spring = Motion::Spring {
            to: 0.0,
            config: SpringConfig::default(),
        };
        let mut a = Channel::at(100.0);
        let mut b = Channel::at(100.0);
        a.animate(spring);
        b.animate(spring);
        a.tick(Duration::from_millis(32));
        b.tick(Duration::from_millis(16));
        b.tick(Duration::from_millis(16));
        assert!((a.value() - b.value()).abs() < 1e-9);
    }

    #[test]
    fn stiff_springs_are_rejected() {
        assert!(SpringConfig::default().is_valid());
        let stiff = SpringConfig {
            stiffness: 1e7,
            ..SpringConfig::default()
        };
        assert!(!stiff.is_stable());
        assert!(!stiff.is_valid());
        let overdamped = SpringConfig {
            damping: 2500.0,
            ..SpringConfig::default()
        };
        assert!(!overdamped.is_valid());
    }

    #[test]
    fn diverging_spring_lands_on_target() {
        let mut c = Channel::at(100.0);
        c.animate(Motion::Spring {
            to: 0.0,
            config: SpringConfig {
                stiffness: 1e7,
                ..SpringConfig::default()
            },
        });
        let finished = (0..1000).any(|_| c.tick(FRAME));
        assert!(finished, "unstable spring never finished");
        assert_eq!(c.value(), 0.0);
        assert!(!c.is_animating());
    }

    #[test]
    fn set_cancels_animation() {
        let mut c = Channel::at(0.0);
        c.animate(Motion::Spring {
            to: 10.0,
            config: SpringConfig::default(),
        });
        c.set(4.0);
        assert!(!c.is_animating());
        assert!(!c.tick(FRAME));
        assert_eq!(c.value(), 4.0);
    }

    #[test]
    fn identity_channels_compose_to_identity() {
        let ch = TransformChannels::identity();
        assert_eq!(ch.transform(), Affine::IDENTITY);
        assert_eq!(ch.translation(), Vec2::ZERO);
        assert!(!ch.is_animating());
    }

    #[test]
    fn channel_set_reports_completion_once() {
        let mut ch = TransformChannels::identity();
        ch.opacity.animate(Motion::Timing {
            to: 0.0,
            duration: Duration::from_millis(20),
            easing: Easing::Linear,
        });
        ch.translate_x.animate(Motion::Timing {
            to: 50.0,
            duration: Duration::from_millis(40),
            easing: Easing::Linear,
        });
        assert!(!ch.tick(Duration::from_millis(20)));
        assert!(ch.tick(Duration::from_millis(20)));
        assert!(!ch.tick(Duration::from_millis(20)));
    }
}
