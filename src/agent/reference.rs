//! Hand-written personas.
//!
//! `Steady`, `Raider`, `Calculator` and `Tactician` play exactly like the
//! presets of the same name but are written as ordinary code against the
//! belief. They pin down what the rule data means: property tests check
//! that both forms agree on arbitrary beliefs. The scored personas share
//! their preset's `EvScorer` and only spell out the rules ahead of it.

use super::condition::ConditionContext;
use super::draft::DraftSelector;
use super::presets;
use super::scorer::EvScorer;
use super::strategy::Strategy;
use crate::belief::Belief;
use crate::cards::CardType::{self, *};
use crate::core::GameRng;
use crate::zones::DraftPick;

fn first_held(belief: &Belief, order: &[CardType]) -> Option<CardType> {
    order.iter().copied().find(|c| belief.has(*c))
}

/// Cooperative opener that punishes Pollution.
#[derive(Clone, Debug)]
pub struct Steady {
    draft: DraftSelector,
    rng: GameRng,
}

impl Steady {
    const FALLBACK: [CardType; 7] = [Cooperation, Recon, Doubt, Interrupt, Pollution, Betrayal, Chaos];

    pub fn new(seed: u64) -> Self {
        Self {
            draft: DraftSelector::default(),
            rng: GameRng::new(seed),
        }
    }

    fn rule_card(belief: &Belief) -> Option<CardType> {
        let s = &belief.context;
        let has = |c| belief.has(c);
        let round = s.round.max(1);
        let last = s.last_opp();

        if round <= 2 && has(Cooperation) {
            return Some(Cooperation);
        }
        if last == Some(Pollution) {
            if has(Doubt) {
                return Some(Doubt);
            }
            if has(Interrupt) {
                return Some(Interrupt);
            }
        }
        if last == Some(Cooperation) && s.self_life >= s.opp_life && has(Interrupt) {
            return Some(Interrupt);
        }
        if has(Recon) && (3..=7).contains(&round) && s.self_life >= s.opp_life {
            let urgent = last == Some(Pollution) && has(Doubt);
            let pc = belief.ratio(Cooperation);
            let mixed = pc > 0.22
                && pc < 0.48
                && belief.ratio(Doubt) < 0.30
                && belief.ratio(Pollution) < 0.35;
            if !urgent && mixed {
                return Some(Recon);
            }
        }
        if (belief.ratio(Cooperation) >= 0.33 || last == Some(Chaos)) && has(Pollution) {
            return Some(Pollution);
        }
        let farmed = last == Some(Cooperation) && s.last2_opp() == Some(Cooperation);
        if has(Betrayal)
            && (farmed || s.opp_in_reach(1))
            && belief.ratio(Doubt) < 0.20
        {
            return Some(Betrayal);
        }
        if s.self_life <= 4 && has(Chaos) {
            return Some(Chaos);
        }
        if belief.ratio(Pollution) >= 0.25 && has(Doubt) {
            return Some(Doubt);
        }
        None
    }
}

impl Strategy for Steady {
    fn name(&self) -> &str {
        "steady"
    }

    fn choose(&mut self, belief: &Belief) -> Option<CardType> {
        Self::rule_card(belief)
            .or_else(|| first_held(belief, &Self::FALLBACK))
            .or_else(|| belief.hand.get(0))
    }

    fn choose_draft(&mut self, first: CardType, second: CardType, belief: &Belief) -> DraftPick {
        self.draft.choose(first, second, belief, &mut self.rng)
    }
}

/// Attack-first persona that punishes repeated Cooperation.
#[derive(Clone, Debug)]
pub struct Raider {
    draft: DraftSelector,
    rng: GameRng,
}

impl Raider {
    const ORDER: [CardType; 7] = [Betrayal, Pollution, Chaos, Recon, Cooperation, Doubt, Interrupt];

    pub fn new(seed: u64) -> Self {
        Self {
            draft: DraftSelector::default(),
            rng: GameRng::new(seed),
        }
    }

    fn rule_card(belief: &Belief) -> Option<CardType> {
        let s = &belief.context;
        let has = |c| belief.has(c);
        let round = s.round.max(1);
        let last = s.last_opp();
        let in_danger = s.self_life <= s.scale();

        if in_danger
            && (last == Some(Betrayal) || belief.ratio(Betrayal) >= 0.28)
            && has(Doubt)
        {
            return Some(Doubt);
        }
        if s.opp_repeated() {
            if last == Some(Cooperation) && has(Betrayal) {
                return Some(Betrayal);
            }
            if last == Some(Pollution) {
                if in_danger && has(Doubt) {
                    return Some(Doubt);
                }
                if has(Pollution) {
                    return Some(Pollution);
                }
            }
        }
        let farmed = last == Some(Cooperation) && s.last2_opp() == Some(Cooperation);
        if round >= 3 && farmed && has(Betrayal) {
            return Some(Betrayal);
        }
        if belief.ratio(Cooperation) >= 0.40 && belief.ratio(Doubt) < 0.25 && has(Betrayal) {
            return Some(Betrayal);
        }
        if has(Betrayal) && s.opp_in_reach(1) {
            return Some(Betrayal);
        }
        if round <= 2 && has(Pollution) {
            return Some(Pollution);
        }
        if round >= 2
            && (s.life_margin() <= -2 || belief.hand.attack_count() <= 1)
            && has(Chaos)
        {
            return Some(Chaos);
        }
        if round >= 2 && last != Some(Doubt) && has(Pollution) {
            return Some(Pollution);
        }
        if has(Recon) && !has(Betrayal) && (last == Some(Cooperation) || s.self_life < s.opp_life)
        {
            return Some(Recon);
        }
        first_held(belief, &Self::ORDER)
    }
}

impl Strategy for Raider {
    fn name(&self) -> &str {
        "raider"
    }

    fn choose(&mut self, belief: &Belief) -> Option<CardType> {
        Self::rule_card(belief).or_else(|| belief.hand.get(0))
    }

    fn choose_draft(&mut self, first: CardType, second: CardType, belief: &Belief) -> DraftPick {
        self.draft.choose(first, second, belief, &mut self.rng)
    }
}

/// Expected-value persona that spends Recon on weak hands.
#[derive(Clone, Debug)]
pub struct Calculator {
    scorer: EvScorer,
    draft: DraftSelector,
    rng: GameRng,
}

impl Calculator {
    const FALLBACK: [CardType; 7] = [Betrayal, Pollution, Cooperation, Recon, Doubt, Chaos, Interrupt];

    pub fn new(seed: u64) -> Self {
        Self {
            scorer: presets::calculator_scorer(),
            draft: DraftSelector::default(),
            rng: GameRng::new(seed),
        }
    }

    fn hand_score(belief: &Belief) -> i32 {
        belief
            .hand
            .iter()
            .map(|card| match card {
                Betrayal => 3,
                Pollution => 2,
                Cooperation | Doubt => 1,
                Recon => 0,
                Chaos | Interrupt => -1,
            })
            .sum()
    }

    fn rule_card(belief: &Belief) -> Option<CardType> {
        let s = &belief.context;
        let has = |c| belief.has(c);
        let r = s.scale();

        if has(Betrayal) && s.opp_life <= r && belief.ratio(Doubt) < 0.33 {
            return Some(Betrayal);
        }
        if has(Doubt) && s.self_life <= r && belief.ratio(Betrayal) >= 0.28 {
            return Some(Doubt);
        }
        let poor_attack = !has(Betrayal) && !has(Pollution);
        if has(Recon) && (poor_attack || Self::hand_score(belief) <= 1) {
            return Some(Recon);
        }
        None
    }
}

impl Strategy for Calculator {
    fn name(&self) -> &str {
        "calculator"
    }

    fn choose(&mut self, belief: &Belief) -> Option<CardType> {
        Self::rule_card(belief)
            .or_else(|| self.scorer.pick(&mut ConditionContext::new(belief, &mut self.rng)))
            .or_else(|| first_held(belief, &Self::FALLBACK))
            .or_else(|| belief.hand.get(0))
    }

    fn choose_draft(&mut self, first: CardType, second: CardType, belief: &Belief) -> DraftPick {
        self.draft.choose(first, second, belief, &mut self.rng)
    }
}

/// Tactical persona reading a boosted opponent model.
#[derive(Clone, Debug)]
pub struct Tactician {
    scorer: EvScorer,
    draft: DraftSelector,
    rng: GameRng,
}

impl Tactician {
    const FALLBACK: [CardType; 6] = [Doubt, Interrupt, Betrayal, Cooperation, Pollution, Chaos];

    pub fn new(seed: u64) -> Self {
        Self {
            scorer: presets::tactician_scorer(),
            draft: DraftSelector::default(),
            rng: GameRng::new(seed),
        }
    }

    /// Unseen ratios without Recon, boosted in the preset's order, then
    /// normalized.
    fn model(belief: &Belief) -> [f32; CardType::COUNT] {
        let s = &belief.context;
        let first = s.is_first();
        let last = s.last_opp();
        let mut p = belief.unseen.ratios();
        p[Recon.index()] = 0.0;

        let mut boost = |card: CardType, when: bool, factor: f32| {
            if when {
                p[card.index()] *= factor;
            }
        };
        let farmed = last == Some(Cooperation) && s.last2_opp() == Some(Cooperation);
        boost(Cooperation, !first && farmed, 1.7);
        boost(Pollution, !first && last == Some(Pollution), 1.5);
        boost(Doubt, !first && last == Some(Doubt), 1.2);
        boost(Chaos, !first && s.round.max(1) % 3 == 0, 1.12);
        boost(Cooperation, s.opp_life <= 3, 1.15);
        boost(Pollution, s.opp_life <= 3, 1.08);
        boost(Doubt, s.self_life <= 3, 1.10);
        boost(Chaos, s.self_life <= 3, 1.08);
        boost(Interrupt, true, 1.0 + 0.4 * belief.ratio(Pollution));

        let sum: f32 = p.iter().sum();
        if sum > 0.0 {
            p = p.map(|w| w / sum);
        }
        p
    }

    fn rule_card(belief: &Belief) -> Option<CardType> {
        let s = &belief.context;
        let has = |c| belief.has(c);
        let first = s.is_first();
        let last = s.last_opp();
        let r = s.scale();
        let model = Self::model(belief);
        let p = |c: CardType| model[c.index()];

        if !first && matches!(last, Some(Pollution | Betrayal)) && has(Interrupt) {
            return Some(Interrupt);
        }
        if !first && last == Some(Pollution) && has(Doubt) {
            return Some(Doubt);
        }
        if has(Betrayal) && s.opp_life <= r && p(Doubt) < 0.30 {
            return Some(Betrayal);
        }
        if has(Doubt) && s.self_life <= r && p(Betrayal) >= 0.28 {
            return Some(Doubt);
        }
        let farmed = last == Some(Cooperation) && s.last2_opp() == Some(Cooperation);
        if has(Betrayal) && ((!first && farmed) || s.opp_in_reach(1)) && p(Doubt) < 0.33 {
            return Some(Betrayal);
        }
        if (p(Cooperation) >= 0.33 || (!first && last == Some(Chaos))) && has(Pollution) {
            return Some(Pollution);
        }
        let quality = belief.hand.quality();
        if has(Chaos) && (quality <= 2 || (s.round.max(1) % 3 == 0 && quality <= 3)) {
            return Some(Chaos);
        }
        None
    }
}

impl Strategy for Tactician {
    fn name(&self) -> &str {
        "tactician"
    }

    fn choose(&mut self, belief: &Belief) -> Option<CardType> {
        Self::rule_card(belief)
            .or_else(|| self.scorer.pick(&mut ConditionContext::new(belief, &mut self.rng)))
            .or_else(|| first_held(belief, &Self::FALLBACK))
            .or_else(|| belief.hand.get(0))
    }

    fn choose_draft(&mut self, first: CardType, second: CardType, belief: &Belief) -> DraftPick {
        self.draft.choose(first, second, belief, &mut self.rng)
    }
}
