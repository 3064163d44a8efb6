// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stack configuration and validation.

use core::time::Duration;

use kurbo::Size;
use understory_swipe::session::{MotionConfig, SwipeConfig};
use understory_swipe::types::{SwipeDirections, Thresholds};

use crate::layout::LayoutConfig;

/// A configuration value that cannot drive a stack.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// `max_visible` must show at least the top card.
    #[error("max_visible must be at least 1")]
    NoVisibleCards,

    /// Viewport dimensions must be finite and positive.
    #[error("viewport must be finite and positive, got {width}x{height}")]
    InvalidViewport {
        /// Configured width.
        width: f64,
        /// Configured height.
        height: f64,
    },

    /// Every threshold must be finite and positive.
    #[error("swipe thresholds must be finite and positive: {0:?}")]
    InvalidThresholds(Thresholds),

    /// Spring parameters must be finite, positive, and stable at the 1 ms step.
    #[error("snap-back spring parameters must be finite, positive, and stable")]
    InvalidSpring,

    /// Exit animation must take time and fade within it.
    #[error("exit animation needs a non-zero duration and a fade ratio in (0, 1], got {duration:?} / {fade_ratio}")]
    InvalidExit {
        /// Configured exit duration.
        duration: Duration,
        /// Configured fade ratio.
        fade_ratio: f64,
    },

    /// A named scalar is out of range.
    #[error("{name} out of range: {value}")]
    OutOfRange {
        /// Field name.
        name: &'static str,
        /// Configured value.
        value: f64,
    },

    /// No direction can commit.
    #[error("at least one swipe direction must be enabled")]
    NoDirections,
}

/// Everything a [`CardStack`](crate::stack::CardStack) needs besides its cards and observer.
///
/// Defaults follow a phone-sized viewport: three visible cards, a commit
/// threshold of a quarter of the width or 400 units/s, a 200 ms exit, and a
/// 50 ms pause before the next card takes the top.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StackConfig {
    /// Maximum number of cards laid out at once.
    pub max_visible: usize,
    /// Gesture interpretation and animation.
    pub swipe: SwipeConfig,
    /// Background card styling.
    pub layout: LayoutConfig,
    /// Delay between a committed swipe and the head moving.
    ///
    /// No gesture may start during the delay.
    pub advance_delay: Duration,
    /// Travel before directional overlays start to appear.
    pub overlay_min_travel: f64,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            max_visible: 3,
            swipe: SwipeConfig::default(),
            layout: LayoutConfig::default(),
            advance_delay: Duration::from_millis(50),
            overlay_min_travel: 0.0,
        }
    }
}

impl StackConfig {
    /// Default config sized for `viewport`, with thresholds scaled to it.
    pub fn for_viewport(viewport: Size) -> Self {
        Self {
            swipe: SwipeConfig::for_viewport(viewport),
            ..Self::default()
        }
    }

    /// Set the number of visible cards.
    #[must_use]
    pub fn with_max_visible(mut self, max_visible: usize) -> Self {
        self.max_visible = max_visible;
        self
    }

    /// Replace the commit thresholds.
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.swipe.thresholds = thresholds;
        self
    }

    /// Restrict the directions that may commit.
    #[must_use]
    pub fn with_directions(mut self, directions: SwipeDirections) -> Self {
        self.swipe.directions = directions;
        self
    }

    /// Replace the motion parameters.
    #[must_use]
    pub fn with_motion(mut self, motion: MotionConfig) -> Self {
        self.swipe.motion = motion;
        self
    }

    /// Set the advance delay.
    #[must_use]
    pub fn with_advance_delay(mut self, delay: Duration) -> Self {
        self.advance_delay = delay;
        self
    }

    /// Check every field, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_visible == 0 {
            return Err(ConfigError::NoVisibleCards);
        }
        let Size { width, height } = self.swipe.viewport;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidViewport { width, height });
        }
        if !self.swipe.thresholds.is_valid() {
            return Err(ConfigError::InvalidThresholds(self.swipe.thresholds));
        }
        if self.swipe.directions.is_empty() {
            return Err(ConfigError::NoDirections);
        }

        let motion = &self.swipe.motion;
        if !motion.spring.is_valid() {
            return Err(ConfigError::InvalidSpring);
        }
        if motion.exit_duration.is_zero()
            || !(motion.exit_fade_ratio > 0.0 && motion.exit_fade_ratio <= 1.0)
        {
            return Err(ConfigError::InvalidExit {
                duration: motion.exit_duration,
                fade_ratio: motion.exit_fade_ratio,
            });
        }
        check_range("max_rotation", motion.max_rotation, 0.0, 180.0)?;
        check_range("vertical_damping", motion.vertical_damping, 0.0, 1.0)?;
        check_range("exit_scale", motion.exit_scale, 0.0, 1.0)?;
        check_range("exit_distance", motion.exit_distance, 1.0, f64::MAX)?;

        let layout = &self.layout;
        check_range("scale_step", layout.scale_step, 0.0, 1.0)?;
        check_range("offset_step", layout.offset_step, f64::MIN, f64::MAX)?;
        check_range("background_opacity", layout.background_opacity, 0.0, 1.0)?;
        check_range("overlay_min_travel", self.overlay_min_travel, 0.0, f64::MAX)?;
        Ok(())
    }
}

fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { name, value })
    }
}
