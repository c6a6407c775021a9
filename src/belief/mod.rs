//! Per-side belief snapshots.
//!
//! A `Belief` is everything one side may use to pick a card: its own hand,
//! the round context, the composition of cards it has not seen, a reveal
//! snapshot if one was granted last round, and the public disaster state.
//! Beliefs are plain values built from a `MatchState` before any mutation of
//! the round, so an agent can never observe a half-resolved state. The
//! match's payoff table travels with the belief so scoring agrees with
//! resolution.
//!
//! ## Unseen composition
//!
//! The unseen set is the deck plus the opponent's hand, counted by type.
//! The discard pile is public and excluded. The counts are ground truth: a
//! side knows the deck list and can track every card that has been played.

pub mod context;

pub use context::{History, RoundContext};

use serde::{Deserialize, Serialize};

use crate::cards::{CardType, Hand, TypeCounts};
use crate::rules::{Disaster, PayoffTable};

/// Per-type counts of the cards a side cannot see.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnseenSet {
    counts: TypeCounts,
}

impl UnseenSet {
    #[must_use]
    pub const fn from_counts(counts: TypeCounts) -> Self {
        Self { counts }
    }

    /// Counts of every card in `cards`.
    #[must_use]
    pub fn from_cards(cards: impl IntoIterator<Item = CardType>) -> Self {
        let mut counts = [0; CardType::COUNT];
        for card in cards {
            counts[card.index()] += 1;
        }
        Self { counts }
    }

    #[must_use]
    pub fn count(&self, card: CardType) -> u32 {
        self.counts[card.index()]
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Share of `card` among unseen cards, 0 when nothing is unseen.
    #[must_use]
    pub fn ratio(&self, card: CardType) -> f32 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.count(card) as f32 / total as f32
        }
    }

    /// All seven ratios in ordinal order.
    #[must_use]
    pub fn ratios(&self) -> [f32; CardType::COUNT] {
        CardType::ALL.map(|t| self.ratio(t))
    }

    /// Largest single ratio.
    #[must_use]
    pub fn max_ratio(&self) -> f32 {
        self.ratios().into_iter().fold(0.0, f32::max)
    }
}

/// Everything a side knows when choosing a card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Belief {
    pub hand: Hand,
    pub context: RoundContext,
    pub unseen: UnseenSet,
    /// Opponent's hand as revealed after last round.
    pub revealed: Option<Hand>,
    pub disaster: Disaster,
    /// Rounds before the disaster changes, `None` if it never will.
    pub disaster_change_in: Option<u32>,
    /// Current refill limit.
    pub hand_limit: usize,
    /// Payoff table of the match.
    #[serde(default)]
    pub payoff: PayoffTable,
}

impl Belief {
    /// A belief in Peace with no reveal, under the standard payoff table.
    #[must_use]
    pub fn new(hand: Hand, context: RoundContext, unseen: UnseenSet) -> Self {
        let hand_limit = hand.len().max(3);
        Self {
            hand,
            context,
            unseen,
            revealed: None,
            disaster: Disaster::Peace,
            disaster_change_in: None,
            hand_limit,
            payoff: PayoffTable::standard(),
        }
    }

    pub fn with_revealed(mut self, revealed: Hand) -> Self {
        self.revealed = Some(revealed);
        self
    }

    pub fn with_payoff(mut self, payoff: PayoffTable) -> Self {
        self.payoff = payoff;
        self
    }

    pub fn with_disaster(mut self, disaster: Disaster, change_in: Option<u32>) -> Self {
        self.disaster = disaster;
        self.disaster_change_in = change_in;
        self
    }

    #[must_use]
    pub fn has(&self, card: CardType) -> bool {
        self.hand.has(card)
    }

    #[must_use]
    pub fn ratio(&self, card: CardType) -> f32 {
        self.unseen.ratio(card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CardType::*;

    #[test]
    fn test_ratio_of_empty_set_is_zero() {
        let unseen = UnseenSet::default();
        for t in CardType::ALL {
            assert_eq!(unseen.ratio(t), 0.0);
        }
        assert_eq!(unseen.max_ratio(), 0.0);
    }

    #[test]
    fn test_ratios() {
        let unseen = UnseenSet::from_cards([Doubt, Doubt, Doubt, Betrayal]);
        assert_eq!(unseen.total(), 4);
        assert!((unseen.ratio(Doubt) - 0.75).abs() < 1e-6);
        assert!((unseen.ratio(Betrayal) - 0.25).abs() < 1e-6);
        assert_eq!(unseen.ratio(Recon), 0.0);
        assert!((unseen.ratios().iter().sum::<f32>() - 1.0).abs() < 1e-6);
        assert!((unseen.max_ratio() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_belief_builders() {
        let hand: Hand = [Doubt, Recon].as_slice().into();
        let belief = Belief::new(hand, RoundContext::opening(10, 10), UnseenSet::default())
            .with_revealed([Chaos].as_slice().into())
            .with_disaster(Disaster::Gale, Some(2));

        assert!(belief.has(Recon));
        assert!(!belief.has(Chaos));
        assert_eq!(belief.revealed.as_ref().map(Hand::len), Some(1));
        assert_eq!(belief.disaster, Disaster::Gale);
        assert_eq!(belief.hand_limit, 3);
    }
}
