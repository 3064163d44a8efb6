// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render contract: turn the visible window into positioned layers.
//!
//! ## Overview
//!
//! [`layers`] produces one [`Layer`] per visible card, top card first. The top
//! card carries the live transform and overlay opacities of the current
//! [`GestureSession`]; cards below it get a fixed offset derived only from
//! their depth:
//!
//! - `scale = 1 - scale_step * depth`
//! - `translate_y = offset_step * depth`
//!
//! A toolkit paints in [`paint_order`] (bottom first) and attaches its gesture
//! recognizer only to the layer with [`Layer::interactive`] set.

use core::iter::Rev;
use core::slice;

use kurbo::{Affine, Vec2};
use understory_swipe::session::GestureSession;
use understory_swipe::types::Direction;

/// Static styling for cards below the top.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutConfig {
    /// Scale lost per level of depth.
    pub scale_step: f64,
    /// Downward offset per level of depth.
    pub offset_step: f64,
    /// Opacity of every card below the top.
    pub background_opacity: f64,
    /// Z-index of the top card; each level below is one less.
    pub base_z: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            scale_step: 0.05,
            offset_step: 8.0,
            background_opacity: 0.95,
            base_z: 1000,
        }
    }
}

/// Directional overlay opacities for the top card, each in `[0, 1]`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Overlays {
    /// Left-swipe ("nope") overlay.
    pub left: f64,
    /// Right-swipe ("like") overlay.
    pub right: f64,
    /// Up-swipe ("super like") overlay.
    pub up: f64,
    /// Down-swipe overlay.
    pub down: f64,
}

impl Overlays {
    /// Overlay opacities for the session's current position.
    pub fn from_session(session: &GestureSession, min_travel: f64) -> Self {
        Self {
            left: session.overlay_opacity(Direction::Left, min_travel),
            right: session.overlay_opacity(Direction::Right, min_travel),
            up: session.overlay_opacity(Direction::Up, min_travel),
            down: session.overlay_opacity(Direction::Down, min_travel),
        }
    }

    /// Opacity of the overlay for `direction`.
    pub const fn get(&self, direction: Direction) -> f64 {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }
}

/// One positioned card.
#[derive(Debug)]
pub struct Layer<'a, C> {
    /// The card.
    pub card: &'a C,
    /// Absolute position of the card in the deck; stable across re-renders.
    pub position: usize,
    /// Depth in the stack; `0` is the top card.
    pub depth: usize,
    /// Transform relative to the stack's resting card frame.
    pub transform: Affine,
    /// Card opacity.
    pub opacity: f64,
    /// Paint priority; higher paints above.
    pub z_index: i32,
    /// Overlay opacities; present on the top card only.
    pub overlays: Option<Overlays>,
    /// True for the card that receives gestures.
    pub interactive: bool,
}

impl<C> Clone for Layer<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Layer<'_, C> {}

/// Fixed transform for a card `depth` levels below the top.
pub fn background_transform(depth: usize, config: &LayoutConfig) -> Affine {
    #[allow(clippy::cast_precision_loss, reason = "Visible depths are tiny.")]
    let d = depth as f64;
    let scale = (1.0 - config.scale_step * d).max(0.0);
    Affine::translate(Vec2::new(0.0, config.offset_step * d)) * Affine::scale(scale)
}

fn z_for(depth: usize, config: &LayoutConfig) -> i32 {
    let depth = i32::try_from(depth).unwrap_or(i32::MAX);
    config.base_z.saturating_sub(depth)
}

/// Lay out `window` (top first) whose first card sits at deck position `head`.
pub fn layers<'a, C>(
    window: &'a [C],
    head: usize,
    session: &GestureSession,
    config: &LayoutConfig,
    overlay_min_travel: f64,
) -> Vec<Layer<'a, C>> {
    window
        .iter()
        .enumerate()
        .map(|(depth, card)| {
            if depth == 0 {
                Layer {
                    card,
                    position: head,
                    depth,
                    transform: session.transform(),
                    opacity: session.opacity(),
                    z_index: z_for(depth, config),
                    overlays: Some(Overlays::from_session(session, overlay_min_travel)),
                    interactive: true,
                }
            } else {
                Layer {
                    card,
                    position: head + depth,
                    depth,
                    transform: background_transform(depth, config),
                    opacity: config.background_opacity,
                    z_index: z_for(depth, config),
                    overlays: None,
                    interactive: false,
                }
            }
        })
        .collect()
}

/// Layers in paint order: bottom card first, top card last.
pub fn paint_order<'l, 'a, C>(layers: &'l [Layer<'a, C>]) -> Rev<slice::Iter<'l, Layer<'a, C>>> {
    layers.iter().rev()
}
