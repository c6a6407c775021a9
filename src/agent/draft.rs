//! Two-card draft selection.
//!
//! When hands are refilled by drafting, each missing card is chosen from a
//! pair of candidates. The selector scores both by what the hand lacks and
//! what the round calls for, then breaks ties by safety weight and finally
//! by a coin flip on the agent's RNG.

use serde::{Deserialize, Serialize};

use crate::belief::Belief;
use crate::cards::CardType;
use crate::core::GameRng;
use crate::zones::DraftPick;

/// Weights for draft scoring.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DraftSelector {
    /// Attack card while the hand holds no Betrayal or Pollution.
    pub offense: f32,
    /// Guard card while the hand holds no Doubt or Interrupt.
    pub defense: f32,
    /// Guard card while a Betrayal this round could be lethal.
    pub survival: f32,
    /// Cooperation or Recon early, Betrayal or Pollution late.
    pub phase: f32,
    /// Card that beats the opponent's last card.
    pub counter: f32,
    /// Last round counted as early.
    pub early_until: u32,
    /// First round counted as late.
    pub late_from: u32,
}

impl Default for DraftSelector {
    fn default() -> Self {
        Self {
            offense: 1.0,
            defense: 1.0,
            survival: 2.0,
            phase: 0.5,
            counter: 0.75,
            early_until: 3,
            late_from: 7,
        }
    }
}

impl DraftSelector {
    /// Situational score of drafting `card`.
    #[must_use]
    pub fn score(&self, card: CardType, belief: &Belief) -> f32 {
        let hand = &belief.hand;
        let ctx = &belief.context;
        let round = ctx.round.max(1);
        let mut score = 0.0;

        if card.is_attack() && hand.attack_count() == 0 {
            score += self.offense;
        }
        let has_guard = hand.iter().any(CardType::is_guard);
        if card.is_guard() && !has_guard {
            score += self.defense;
        }
        if card.is_guard() && ctx.lethal_danger() {
            score += self.survival;
        }

        let early = round <= self.early_until;
        let late = round >= self.late_from;
        if (early && matches!(card, CardType::Cooperation | CardType::Recon))
            || (late && card.is_attack())
        {
            score += self.phase;
        }

        if let Some(last) = ctx.last_opp() {
            if belief.payoff.margin(card, last, round) > 0 {
                score += self.counter;
            }
        }

        score
    }

    /// Pick one of two candidates.
    pub fn choose(
        &self,
        first: CardType,
        second: CardType,
        belief: &Belief,
        rng: &mut GameRng,
    ) -> DraftPick {
        let a = self.score(first, belief);
        let b = self.score(second, belief);
        if a > b {
            return DraftPick::First;
        }
        if b > a {
            return DraftPick::Second;
        }
        match first.safety().cmp(&second.safety()) {
            std::cmp::Ordering::Greater => DraftPick::First,
            std::cmp::Ordering::Less => DraftPick::Second,
            std::cmp::Ordering::Equal => {
                if rng.chance(0.5) {
                    DraftPick::First
                } else {
                    DraftPick::Second
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::belief::{RoundContext, UnseenSet};
    use crate::cards::Hand;
    use CardType::*;

    fn belief(hand: &[CardType], round: u32, self_life: i32, last: Option<CardType>) -> Belief {
        let context = RoundContext {
            round,
            self_life,
            opp_life: 10,
            last_self: None,
            opp_recent: [last, None, None],
        };
        Belief::new(Hand::from(hand), context, UnseenSet::default())
    }

    #[test]
    fn test_missing_offense() {
        let selector = DraftSelector::default();
        let b = belief(&[Doubt, Cooperation], 5, 10, None);
        let mut rng = GameRng::new(0);
        assert_eq!(selector.choose(Chaos, Pollution, &b, &mut rng), DraftPick::Second);
    }

    #[test]
    fn test_survival_prefers_guard() {
        let selector = DraftSelector::default();
        let b = belief(&[Betrayal, Interrupt], 5, 3, None);
        let mut rng = GameRng::new(0);
        assert_eq!(selector.choose(Doubt, Cooperation, &b, &mut rng), DraftPick::First);
    }

    #[test]
    fn test_counter_last_card() {
        let selector = DraftSelector::default();
        let b = belief(&[Betrayal, Doubt], 5, 10, Some(Pollution));
        assert!(selector.score(Doubt, &b) > selector.score(Recon, &b));
    }

    #[test]
    fn test_counter_reads_the_match_table() {
        use crate::rules::{Effect, PayoffTable};

        let table = PayoffTable::from_entries(PayoffTable::standard().entries().map(
            |(pair, effect)| match pair {
                (Recon, Pollution) => (pair, Effect::flat(2, 0)),
                _ => (pair, effect),
            },
        ))
        .unwrap();
        let selector = DraftSelector::default();
        let standard = belief(&[Betrayal, Doubt], 5, 10, Some(Pollution));
        let custom = standard.clone().with_payoff(table);

        assert_eq!(selector.score(Recon, &standard), 0.0);
        assert_eq!(selector.score(Recon, &custom), selector.counter);
    }

    #[test]
    fn test_tie_breaks_on_safety() {
        let selector = DraftSelector {
            offense: 0.0,
            defense: 0.0,
            survival: 0.0,
            phase: 0.0,
            counter: 0.0,
            ..DraftSelector::default()
        };
        let b = belief(&[], 5, 10, None);
        let mut rng = GameRng::new(0);
        let before = rng.state();
        assert_eq!(selector.choose(Chaos, Doubt, &b, &mut rng), DraftPick::Second);
        assert_eq!(rng.state(), before);
    }

    #[test]
    fn test_full_tie_flips_coin() {
        let selector = DraftSelector::default();
        let b = belief(&[Doubt, Betrayal], 5, 10, None);
        let mut seen = [false; 2];
        for seed in 0..64 {
            let mut rng = GameRng::new(seed);
            seen[selector.choose(Recon, Recon, &b, &mut rng).index()] = true;
        }
        assert_eq!(seen, [true, true]);
    }
}
