// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The deck: an ordered, shared, immutable sequence of cards.

use std::sync::Arc;

/// Ordered cards for one discovery session.
///
/// The engine only reads from a deck. Cards are consumed by advancing an
/// index, never by removing or filtering elements, so the `n`th card stays the
/// `n`th card for the deck's whole lifetime. Clones share storage.
#[derive(Debug)]
pub struct Deck<C> {
    cards: Arc<[C]>,
}

impl<C> Clone for Deck<C> {
    fn clone(&self) -> Self {
        Self {
            cards: Arc::clone(&self.cards),
        }
    }
}

impl<C> Default for Deck<C> {
    fn default() -> Self {
        Self {
            cards: Arc::from(Vec::new()),
        }
    }
}

impl<C> Deck<C> {
    /// Build a deck from any owned sequence of cards.
    pub fn new(cards: impl Into<Arc<[C]>>) -> Self {
        Self {
            cards: cards.into(),
        }
    }

    /// Number of cards.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// True if the deck holds no cards.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Card at `position`, if any.
    pub fn get(&self, position: usize) -> Option<&C> {
        self.cards.get(position)
    }

    /// All cards in order.
    pub fn as_slice(&self) -> &[C] {
        &self.cards
    }

    /// Up to `max` cards starting at `start`; empty past the end.
    pub fn window(&self, start: usize, max: usize) -> &[C] {
        let start = start.min(self.cards.len());
        let end = start.saturating_add(max).min(self.cards.len());
        &self.cards[start..end]
    }

    /// True if both decks share the same storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cards, &other.cards)
    }
}

impl<C> From<Vec<C>> for Deck<C> {
    fn from(cards: Vec<C>) -> Self {
        Self::new(cards)
    }
}

impl<C: Clone> From<&[C]> for Deck<C> {
    fn from(cards: &[C]) -> Self {
        Self::new(cards)
    }
}

impl<C> FromIterator<C> for Deck<C> {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect::<Vec<_>>())
    }
}
