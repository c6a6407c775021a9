//! Round resolution.
//!
//! `MatchState::resolve_round` takes both sides' submissions and applies one
//! full round:
//!
//! 1. reject the submissions (leaving the state untouched) if the match is
//!    over or a submission does not match the hand
//! 2. move both cards from hand to discard
//! 3. under Gale, each side may have its card swapped for a fresh draw; the
//!    submitted card goes back to its hand slot and the substitute is
//!    discarded after resolving. Substitutes never come from this round's
//!    submissions; with nothing left to draw the submission stands
//! 4. look up the payoff for the resolved pair at the current round and
//!    apply it, clamped to `[0, start_life]`
//! 5. apply hand resets
//! 6. apply upkeep and any Lightning strike, clamp, mark eliminated sides
//! 7. refill both hands unless someone was eliminated
//! 8. take reveal snapshots of the refilled hands
//! 9. record history, advance the round, rotate the disaster
//! 10. decide whether the match is over
//!
//! Resolution is a pure function of the state and its RNG streams, so a
//! fixed seed and fixed submissions replay identically.

use tracing::{debug, info};

use super::outcome::{MatchStatus, RoundOutcome, SideReport, Submission, Verdict};
use crate::belief::Belief;
use crate::cards::CardType;
use crate::core::{MatchState, Replenish, Side, SideMap, SubmissionError};
use crate::zones::{DraftOffer, DraftPick};

/// Picks between two draft candidates while a hand is being refilled.
pub trait Drafter {
    /// Choose which candidate `side` keeps. `belief` reflects the partly
    /// refilled hand.
    fn draft(&mut self, side: Side, first: CardType, second: CardType, belief: &Belief) -> DraftPick;
}

/// Always keeps the first candidate.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstCandidate;

impl Drafter for FirstCandidate {
    fn draft(&mut self, _side: Side, _first: CardType, _second: CardType, _belief: &Belief) -> DraftPick {
        DraftPick::First
    }
}

impl<F> Drafter for F
where
    F: FnMut(Side, CardType, CardType, &Belief) -> DraftPick,
{
    fn draft(&mut self, side: Side, first: CardType, second: CardType, belief: &Belief) -> DraftPick {
        self(side, first, second, belief)
    }
}

impl MatchState {
    /// Resolve one round. In draft mode every candidate pair keeps the
    /// first card; use `resolve_round_with` to let sides choose.
    pub fn resolve_round(
        &mut self,
        a: impl Into<Submission>,
        b: impl Into<Submission>,
    ) -> Result<RoundOutcome, SubmissionError> {
        self.resolve_round_with(a, b, &mut FirstCandidate)
    }

    /// Resolve one round, asking `drafter` for draft picks.
    pub fn resolve_round_with(
        &mut self,
        a: impl Into<Submission>,
        b: impl Into<Submission>,
        drafter: &mut dyn Drafter,
    ) -> Result<RoundOutcome, SubmissionError> {
        if self.is_over() {
            return Err(SubmissionError::MatchOver);
        }
        let indices = SideMap::new(
            self.locate(Side::A, a.into())?,
            self.locate(Side::B, b.into())?,
        );

        let round = self.round;
        let disaster = self.disasters.active();
        let limit = self.hand_limit();
        let life_before = self.life;

        self.revealed = SideMap::default();

        let submitted = SideMap::new(
            self.use_submission(Side::A, indices[Side::A])?,
            self.use_submission(Side::B, indices[Side::B])?,
        );
        let (resolved, swapped) = self.apply_gale(submitted, indices);

        // Payoff
        let effect = self.payoff.effect(resolved[Side::A], resolved[Side::B]);
        let payoff = SideMap::new(effect.actor.at(round), effect.opponent.at(round));
        for side in Side::BOTH {
            self.life[side] = self.clamp_life(self.life[side] + payoff[side]);
            if swapped[side] {
                self.supply.discard(resolved[side]);
            }
        }

        let resets = SideMap::new(effect.reset_actor, effect.reset_opponent);
        for side in Side::BOTH {
            if resets[side] {
                self.supply.reset_hand(&mut self.hands[side], limit, &mut self.deck_rng);
            }
        }

        // Attrition
        let burst = disaster
            .burst()
            .filter(|b| self.event_rng.chance(b.chance))
            .map_or(0, |b| b.amount);
        let attrition = disaster.upkeep() + burst;
        for side in Side::BOTH {
            self.life[side] = self.clamp_life(self.life[side] - attrition);
            self.lost[side] = self.life[side] <= 0;
        }

        if !self.lost.any(|&l| l) {
            for side in Side::BOTH {
                self.refill(side, limit, drafter);
            }
        }

        let reveals = SideMap::new(effect.reveal_actor, effect.reveal_opponent);
        for side in Side::BOTH {
            if reveals[side] {
                self.revealed[side] = Some(self.hands[side.opponent()].clone());
            }
        }

        self.history[Side::A].record(resolved[Side::A], resolved[Side::B]);
        self.history[Side::B].record(resolved[Side::B], resolved[Side::A]);
        self.round += 1;

        let disaster_entered = self.disasters.advance_round();
        if let Some(incoming) = disaster_entered {
            for side in Side::BOTH {
                self.life[side] = self.clamp_life(incoming.on_enter(self.life[side]));
                self.lost[side] = self.life[side] <= 0;
            }
            info!(
                target: "dilemma_duel::engine",
                round = self.round,
                disaster = %incoming,
                life_a = self.life[Side::A],
                life_b = self.life[Side::B],
                "disaster changed"
            );
        }

        self.status = if self.lost.any(|&l| l) || self.round > self.config.max_rounds {
            MatchStatus::Finished(Verdict::decide(self.lost, self.life))
        } else {
            MatchStatus::InProgress
        };

        let sides = SideMap::from_fn(|side| SideReport {
            submitted: submitted[side],
            resolved: resolved[side],
            swapped: swapped[side],
            payoff: payoff[side],
            attrition,
            life_before: life_before[side],
            life_after: self.life[side],
            hand_reset: resets[side],
            saw_opponent: reveals[side],
        });
        let outcome = RoundOutcome {
            round,
            sides,
            disaster,
            burst: burst > 0,
            disaster_entered,
            status: self.status,
        };

        debug!(
            target: "dilemma_duel::engine",
            round,
            a = %resolved[Side::A],
            b = %resolved[Side::B],
            swapped_a = swapped[Side::A],
            swapped_b = swapped[Side::B],
            life_a = self.life[Side::A],
            life_b = self.life[Side::B],
            disaster = %disaster,
            "round resolved"
        );
        if let MatchStatus::Finished(verdict) = self.status {
            info!(
                target: "dilemma_duel::engine",
                rounds = round,
                verdict = ?verdict,
                life_a = self.life[Side::A],
                life_b = self.life[Side::B],
                "match over"
            );
        }

        self.log.push_back(outcome.clone());
        Ok(outcome)
    }

    /// Hand position `submission` refers to, or why it would be rejected.
    pub fn check_submission(
        &self,
        side: Side,
        submission: impl Into<Submission>,
    ) -> Result<usize, SubmissionError> {
        if self.is_over() {
            return Err(SubmissionError::MatchOver);
        }
        self.locate(side, submission.into())
    }

    fn locate(&self, side: Side, submission: Submission) -> Result<usize, SubmissionError> {
        let hand = &self.hands[side];
        match submission {
            Submission::Index(index) if index < hand.len() => Ok(index),
            Submission::Index(index) => Err(SubmissionError::IndexOutOfRange {
                side,
                index,
                hand_size: hand.len(),
            }),
            Submission::Card(card) => hand
                .index_of(card)
                .ok_or(SubmissionError::NotInHand { side, card }),
        }
    }

    /// Move a located submission from hand to discard.
    fn use_submission(&mut self, side: Side, index: usize) -> Result<CardType, SubmissionError> {
        let hand_size = self.hands[side].len();
        self.supply
            .use_card(&mut self.hands[side], index)
            .ok_or(SubmissionError::IndexOutOfRange {
                side,
                index,
                hand_size,
            })
    }

    /// Gale swaps. Returns the resolved cards and which sides were swapped.
    fn apply_gale(
        &mut self,
        submitted: SideMap<CardType>,
        indices: SideMap<usize>,
    ) -> (SideMap<CardType>, SideMap<bool>) {
        let mut resolved = submitted;
        let mut swapped = SideMap::with_value(false);
        let chance = self.disasters.active().swap_chance();
        if chance <= 0.0 {
            return (resolved, swapped);
        }

        let mut rolled = SideMap::with_value(false);
        for side in Side::BOTH {
            rolled[side] = self.event_rng.chance(chance);
        }

        // This round's submissions stay off the discard pile while
        // substitutes are drawn, so a reshuffle cannot hand one out.
        let mut pulled = SideMap::with_value(false);
        for side in Side::BOTH {
            pulled[side] = self.supply.reclaim(submitted[side]);
        }

        for side in Side::BOTH {
            if !(rolled[side] && pulled[side]) {
                continue;
            }
            // With nothing to swap in, the submission stands.
            if let Some(substitute) = self.supply.draw_one(&mut self.deck_rng) {
                resolved[side] = substitute;
                swapped[side] = true;
            }
        }

        for side in Side::BOTH {
            if swapped[side] {
                self.hands[side].insert(indices[side], submitted[side]);
            } else if pulled[side] {
                self.supply.discard(submitted[side]);
            }
        }
        (resolved, swapped)
    }

    /// Refill a hand to `limit`, drafting if the match is configured to.
    fn refill(&mut self, side: Side, limit: usize, drafter: &mut dyn Drafter) {
        let excluded = match self.config.replenish {
            Replenish::Draw => {
                self.supply.replenish(&mut self.hands[side], limit, &mut self.deck_rng);
                return;
            }
            Replenish::Draft { excluded } => excluded,
        };

        while self.hands[side].len() < limit {
            match self.supply.draft_offer(excluded, &mut self.deck_rng) {
                DraftOffer::Pair(first, second) => {
                    let belief = self.belief(side);
                    let pick = drafter.draft(side, first, second, &belief);
                    let (kept, returned) = pick.split(first, second);
                    self.hands[side].push(kept);
                    self.supply.return_to_bottom(returned);
                }
                DraftOffer::Single(card) => self.hands[side].push(card),
                DraftOffer::Empty => break,
            }
        }
    }

    fn clamp_life(&self, life: i32) -> i32 {
        life.clamp(0, self.config.start_life)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MatchConfig, Preset};
    use CardType::*;

    fn peaceful(life: i32) -> MatchConfig {
        Preset::Quick.config().without_disasters().with_start_life(life)
    }

    #[test]
    fn test_mutual_cooperation_costs_only_upkeep() {
        let mut state = MatchState::with_stacked_deck(
            &peaceful(10),
            [Cooperation, Doubt, Doubt, Cooperation, Doubt, Doubt, Recon, Recon],
            1,
        )
        .unwrap();

        let outcome = state.resolve_round(Cooperation, Cooperation).unwrap();
        // Life is capped at the start value, then upkeep applies
        assert_eq!(state.life(Side::A), 9);
        assert_eq!(state.life(Side::B), 9);
        assert_eq!(outcome.side(Side::A).payoff, 1);
        assert_eq!(outcome.side(Side::A).attrition, 1);
        assert_eq!(state.round(), 2);
        assert_eq!(state.hand(Side::A).len(), 3);
        assert_eq!(state.hand(Side::B).len(), 3);
    }

    #[test]
    fn test_rejected_submission_leaves_state_untouched() {
        let mut state = MatchState::new(&Preset::Quick.config(), 3).unwrap();
        let before_hand = state.hand(Side::A).clone();
        let before_deck = state.deck_len();

        let err = state.resolve_round(7usize, 0usize).unwrap_err();
        assert_eq!(
            err,
            SubmissionError::IndexOutOfRange {
                side: Side::A,
                index: 7,
                hand_size: 3
            }
        );
        assert_eq!(state.hand(Side::A), &before_hand);
        assert_eq!(state.deck_len(), before_deck);
        assert_eq!(state.round(), 1);
        assert!(state.log().is_empty());
    }

    #[test]
    fn test_card_not_in_hand_rejected() {
        let mut state = MatchState::with_stacked_deck(
            &peaceful(10),
            [Doubt, Doubt, Doubt, Doubt, Doubt, Doubt],
            1,
        )
        .unwrap();
        assert_eq!(
            state.resolve_round(Doubt, Betrayal).unwrap_err(),
            SubmissionError::NotInHand {
                side: Side::B,
                card: Betrayal
            }
        );
    }

    #[test]
    fn test_draft_mode_asks_drafter() {
        let config = peaceful(10).with_replenish(crate::core::Replenish::draft());
        let mut state = MatchState::with_stacked_deck(
            &config,
            [Doubt, Doubt, Doubt, Doubt, Doubt, Doubt, Chaos, Recon, Betrayal, Pollution, Cooperation],
            1,
        )
        .unwrap();

        let mut asked = Vec::new();
        let mut second = |side: Side, first: CardType, other: CardType, _: &Belief| {
            asked.push((side, first, other));
            DraftPick::Second
        };
        state.resolve_round_with(0usize, 0usize, &mut second).unwrap();

        // Chaos is skipped, A is offered Recon/Betrayal and keeps Betrayal
        assert_eq!(asked[0], (Side::A, Recon, Betrayal));
        assert_eq!(state.hand(Side::A).cards(), &[Doubt, Doubt, Betrayal]);
        assert_eq!(state.cards_accounted(), state.card_total());
    }
}
