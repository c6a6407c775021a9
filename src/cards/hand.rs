//! A side's hand: an ordered multiset of card types.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::card_type::{CardType, TypeCounts};

/// Cards held by one side, in draw order.
///
/// Hands hold at most a handful of cards, so storage is inline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hand {
    cards: SmallVec<[CardType; 4]>,
}

impl Hand {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn cards(&self) -> &[CardType] {
        &self.cards
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<CardType> {
        self.cards.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = CardType> + '_ {
        self.cards.iter().copied()
    }

    /// Whether at least one card of this type is held.
    #[must_use]
    pub fn has(&self, card: CardType) -> bool {
        self.cards.contains(&card)
    }

    /// Whether at least `n` cards of this type are held.
    #[must_use]
    pub fn has_at_least(&self, card: CardType, n: usize) -> bool {
        self.count(card) >= n
    }

    #[must_use]
    pub fn count(&self, card: CardType) -> usize {
        self.cards.iter().filter(|&&c| c == card).count()
    }

    /// Position of the first card of this type.
    #[must_use]
    pub fn index_of(&self, card: CardType) -> Option<usize> {
        self.cards.iter().position(|&c| c == card)
    }

    /// Distinct types in order of first appearance.
    #[must_use]
    pub fn distinct(&self) -> SmallVec<[CardType; 4]> {
        let mut seen = SmallVec::new();
        for card in self.iter() {
            if !seen.contains(&card) {
                seen.push(card);
            }
        }
        seen
    }

    /// Number of Betrayal and Pollution cards held.
    #[must_use]
    pub fn attack_count(&self) -> usize {
        self.cards.iter().filter(|c| c.is_attack()).count()
    }

    /// Sum of per-card safety weights.
    #[must_use]
    pub fn quality(&self) -> i32 {
        self.cards.iter().map(|c| c.safety()).sum()
    }

    /// Add per-type counts of this hand into `counts`.
    pub fn tally_into(&self, counts: &mut TypeCounts) {
        for card in self.iter() {
            counts[card.index()] += 1;
        }
    }

    pub fn push(&mut self, card: CardType) {
        self.cards.push(card);
    }

    pub fn insert(&mut self, index: usize, card: CardType) {
        let index = index.min(self.cards.len());
        self.cards.insert(index, card);
    }

    /// Remove and return the card at `index`.
    pub fn take(&mut self, index: usize) -> Option<CardType> {
        if index < self.cards.len() {
            Some(self.cards.remove(index))
        } else {
            None
        }
    }

    /// Remove every card, returning them in order.
    pub fn drain(&mut self) -> SmallVec<[CardType; 4]> {
        std::mem::take(&mut self.cards)
    }
}

impl FromIterator<CardType> for Hand {
    fn from_iter<I: IntoIterator<Item = CardType>>(iter: I) -> Self {
        Self {
            cards: iter.into_iter().collect(),
        }
    }
}

impl From<&[CardType]> for Hand {
    fn from(cards: &[CardType]) -> Self {
        cards.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CardType::*;

    #[test]
    fn test_membership() {
        let hand: Hand = [Doubt, Betrayal, Doubt].as_slice().into();
        assert!(hand.has(Doubt));
        assert!(hand.has_at_least(Doubt, 2));
        assert!(!hand.has_at_least(Betrayal, 2));
        assert!(!hand.has(Recon));
        assert_eq!(hand.index_of(Betrayal), Some(1));
    }

    #[test]
    fn test_distinct_keeps_first_appearance() {
        let hand: Hand = [Pollution, Doubt, Pollution, Chaos].as_slice().into();
        assert_eq!(hand.distinct().as_slice(), &[Pollution, Doubt, Chaos]);
    }

    #[test]
    fn test_take_and_insert() {
        let mut hand: Hand = [Cooperation, Recon, Chaos].as_slice().into();
        assert_eq!(hand.take(1), Some(Recon));
        assert_eq!(hand.take(5), None);
        hand.insert(1, Interrupt);
        assert_eq!(hand.cards(), &[Cooperation, Interrupt, Chaos]);
    }

    #[test]
    fn test_grading() {
        let hand: Hand = [Doubt, Chaos, Betrayal, Pollution].as_slice().into();
        assert_eq!(hand.attack_count(), 2);
        assert_eq!(hand.quality(), 3 - 1 + 0 + 1);
    }
}
