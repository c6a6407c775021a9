//! The shared deck and discard pile.
//!
//! Both sides draw from one deck. Used and discarded cards go to a common
//! discard pile, which is shuffled back into the deck whenever a draw finds
//! the deck empty. Cards never leave the match: at every round boundary the
//! deck, the discard pile and both hands together hold the whole deck
//! composition.
//!
//! Draws take the top card (front of the deck). Cards put back by a draft
//! go to the bottom.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{CardType, Hand, TypeCounts};
use crate::core::{DeckComposition, GameRng};

/// Candidates offered to a drafting side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DraftOffer {
    /// Two candidates, the side picks one.
    Pair(CardType, CardType),
    /// Only one card could be found.
    Single(CardType),
    /// Deck and discard are both empty.
    Empty,
}

/// Which of two offered candidates a side keeps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DraftPick {
    First,
    Second,
}

impl DraftPick {
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            DraftPick::First => 0,
            DraftPick::Second => 1,
        }
    }

    /// Split an offered pair into (kept, returned).
    #[must_use]
    pub const fn split(self, first: CardType, second: CardType) -> (CardType, CardType) {
        match self {
            DraftPick::First => (first, second),
            DraftPick::Second => (second, first),
        }
    }
}

/// Deck plus discard pile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supply {
    deck: Vector<CardType>,
    discard: Vector<CardType>,
}

impl Supply {
    /// A shuffled deck with an empty discard pile.
    pub fn new(composition: &DeckComposition, rng: &mut GameRng) -> Self {
        let mut cards: Vec<CardType> = composition.cards().collect();
        rng.shuffle(&mut cards);
        Self {
            deck: cards.into_iter().collect(),
            discard: Vector::new(),
        }
    }

    /// A supply with the deck in exactly this order (top first).
    #[must_use]
    pub fn stacked(deck: impl IntoIterator<Item = CardType>) -> Self {
        Self {
            deck: deck.into_iter().collect(),
            discard: Vector::new(),
        }
    }

    #[must_use]
    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    #[must_use]
    pub fn discard_len(&self) -> usize {
        self.discard.len()
    }

    /// Cards in deck and discard together.
    #[must_use]
    pub fn len(&self) -> usize {
        self.deck.len() + self.discard.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deck cards top first, then the discard pile.
    pub fn cards(&self) -> impl Iterator<Item = CardType> + '_ {
        self.deck.iter().chain(self.discard.iter()).copied()
    }

    /// Top of the deck without drawing.
    #[must_use]
    pub fn peek(&self) -> Option<CardType> {
        self.deck.front().copied()
    }

    /// Add per-type counts of the deck (not the discard pile) into `counts`.
    pub fn tally_deck_into(&self, counts: &mut TypeCounts) {
        for card in self.deck.iter() {
            counts[card.index()] += 1;
        }
    }

    /// Move the discard pile into the deck and shuffle it.
    fn refill(&mut self, rng: &mut GameRng) {
        let mut cards: Vec<CardType> = std::mem::take(&mut self.discard).into_iter().collect();
        rng.shuffle(&mut cards);
        self.deck.extend(cards);
        tracing::trace!(target: "dilemma_duel::engine", deck = self.deck.len(), "discard reshuffled into deck");
    }

    /// Draw the top card, refilling from the discard pile if needed.
    ///
    /// `None` only when deck and discard are both empty.
    pub fn draw_one(&mut self, rng: &mut GameRng) -> Option<CardType> {
        if self.deck.is_empty() {
            if self.discard.is_empty() {
                return None;
            }
            self.refill(rng);
        }
        self.deck.pop_front()
    }

    /// Draw until `hand` holds `limit` cards or nothing is left.
    ///
    /// Never trims a hand already at or above the limit. Returns the number
    /// of cards drawn.
    pub fn replenish(&mut self, hand: &mut Hand, limit: usize, rng: &mut GameRng) -> usize {
        let mut drawn = 0;
        while hand.len() < limit {
            match self.draw_one(rng) {
                Some(card) => {
                    hand.push(card);
                    drawn += 1;
                }
                None => break,
            }
        }
        drawn
    }

    /// Remove the card at `index` from `hand` into the discard pile.
    pub fn use_card(&mut self, hand: &mut Hand, index: usize) -> Option<CardType> {
        let card = hand.take(index)?;
        self.discard.push_back(card);
        Some(card)
    }

    /// Discard the whole hand and redraw to `limit`.
    pub fn reset_hand(&mut self, hand: &mut Hand, limit: usize, rng: &mut GameRng) {
        for card in hand.drain() {
            self.discard.push_back(card);
        }
        self.replenish(hand, limit, rng);
    }

    pub fn discard(&mut self, card: CardType) {
        self.discard.push_back(card);
    }

    /// Take back the most recently discarded card of this type.
    pub fn reclaim(&mut self, card: CardType) -> bool {
        let mut found = None;
        for (i, &c) in self.discard.iter().enumerate() {
            if c == card {
                found = Some(i);
            }
        }
        match found {
            Some(i) => {
                self.discard.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn return_to_bottom(&mut self, card: CardType) {
        self.deck.push_back(card);
    }

    /// Draw two draft candidates, skipping `excluded` while anything else
    /// is available. Skipped cards go to the bottom of the deck.
    pub fn draft_offer(&mut self, excluded: Option<CardType>, rng: &mut GameRng) -> DraftOffer {
        let mut picked: SmallVec<[CardType; 2]> = SmallVec::new();
        let mut skipped: SmallVec<[CardType; 4]> = SmallVec::new();

        while picked.len() < 2 {
            match self.draw_one(rng) {
                Some(card) if Some(card) == excluded => skipped.push(card),
                Some(card) => picked.push(card),
                None => break,
            }
        }

        // Nothing but the excluded type remained.
        if picked.is_empty() && !skipped.is_empty() {
            picked.push(skipped.remove(0));
        }
        for card in skipped {
            self.return_to_bottom(card);
        }

        match picked.as_slice() {
            [first, second] => DraftOffer::Pair(*first, *second),
            [only] => DraftOffer::Single(*only),
            _ => DraftOffer::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CardType::*;

    #[test]
    fn test_new_supply_is_shuffled_composition() {
        let composition = DeckComposition::default();
        let mut rng = GameRng::new(5);
        let supply = Supply::new(&composition, &mut rng);

        let mut counts = [0; CardType::COUNT];
        supply.tally_deck_into(&mut counts);
        for t in CardType::ALL {
            assert_eq!(counts[t.index()], composition.count(t));
        }
        assert_eq!(supply.discard_len(), 0);
    }

    #[test]
    fn test_draw_takes_top_card() {
        let mut supply = Supply::stacked([Doubt, Chaos, Recon]);
        let mut rng = GameRng::new(1);
        assert_eq!(supply.draw_one(&mut rng), Some(Doubt));
        assert_eq!(supply.peek(), Some(Chaos));
    }

    #[test]
    fn test_draw_refills_from_discard() {
        let mut supply = Supply::stacked([]);
        let mut rng = GameRng::new(1);
        assert_eq!(supply.draw_one(&mut rng), None);

        supply.discard(Pollution);
        supply.discard(Pollution);
        assert_eq!(supply.draw_one(&mut rng), Some(Pollution));
        assert_eq!(supply.deck_len(), 1);
        assert_eq!(supply.discard_len(), 0);
    }

    #[test]
    fn test_replenish_never_trims() {
        let mut supply = Supply::stacked([Doubt, Doubt, Doubt]);
        let mut rng = GameRng::new(1);
        let mut hand: Hand = [Chaos, Chaos, Chaos].as_slice().into();
        assert_eq!(supply.replenish(&mut hand, 2, &mut rng), 0);
        assert_eq!(hand.len(), 3);

        let mut short = Hand::new();
        assert_eq!(supply.replenish(&mut short, 5, &mut rng), 3);
        assert_eq!(short.len(), 3);
    }

    #[test]
    fn test_use_and_reset() {
        let mut supply = Supply::stacked([Recon, Recon, Recon]);
        let mut rng = GameRng::new(1);
        let mut hand: Hand = [Cooperation, Betrayal].as_slice().into();

        assert_eq!(supply.use_card(&mut hand, 1), Some(Betrayal));
        assert_eq!(supply.use_card(&mut hand, 4), None);
        assert_eq!(supply.discard_len(), 1);

        supply.reset_hand(&mut hand, 2, &mut rng);
        assert_eq!(hand.cards(), &[Recon, Recon]);
        assert_eq!(supply.discard_len(), 2);
    }

    #[test]
    fn test_reclaim_takes_latest() {
        let mut supply = Supply::stacked([]);
        supply.discard(Doubt);
        supply.discard(Chaos);
        assert!(supply.reclaim(Doubt));
        assert!(!supply.reclaim(Doubt));
        assert_eq!(supply.discard_len(), 1);
    }

    #[test]
    fn test_draft_offer_skips_excluded() {
        let mut supply = Supply::stacked([Chaos, Doubt, Chaos, Betrayal, Recon]);
        let mut rng = GameRng::new(1);

        let offer = supply.draft_offer(Some(Chaos), &mut rng);
        assert_eq!(offer, DraftOffer::Pair(Doubt, Betrayal));
        // Recon stays on top, skipped Chaos cards go underneath
        assert_eq!(supply.peek(), Some(Recon));
        assert_eq!(supply.deck_len(), 3);
    }

    #[test]
    fn test_draft_offer_falls_back_to_excluded() {
        let mut supply = Supply::stacked([Chaos, Chaos]);
        let mut rng = GameRng::new(1);
        assert_eq!(supply.draft_offer(Some(Chaos), &mut rng), DraftOffer::Single(Chaos));
        assert_eq!(supply.deck_len(), 1);

        let mut empty = Supply::stacked([]);
        assert_eq!(empty.draft_offer(None, &mut rng), DraftOffer::Empty);
    }
}
