//! Expected-value scoring.
//!
//! The scorer builds an opponent model from what the side cannot see, then
//! ranks each distinct held card by its expected life margin against that
//! model. Ranking is a pure function of the belief and the model; the only
//! randomness lives in the noise step, which runs after ranking on the
//! agent's own stream.
//!
//! ## Pipeline
//!
//! 1. Model (`ModelSpec`): unseen ratios, optionally blended with a reveal
//!    snapshot, multiplied by conditional boosts, normalized. Agents that
//!    carry a model also expose it to their rule conditions.
//! 2. Rank: base EV plus lethal, survival, reroll, minimax and disaster
//!    adjustments. Ties keep hand order.
//! 3. Guard: demote Betrayal when Doubt is likely.
//! 4. Noise: with some probability swap the top pick for a runner-up.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::condition::{Condition, ConditionContext, ConditionEvaluator};
use crate::belief::Belief;
use crate::cards::CardType;
use crate::core::GameRng;
use crate::rules::PayoffTable;

// =============================================================================
// Opponent Model
// =============================================================================

/// Which opponent card a boost scales.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoostTarget {
    Card(CardType),
    /// The opponent's last card; no effect before it has one.
    OppLast,
}

/// Conditional multiplier on one opponent card's weight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Boost {
    pub when: Condition,
    pub target: BoostTarget,
    pub factor: f32,
    /// Adds `slope * ratio(card)` to the factor.
    pub per_ratio: Option<(CardType, f32)>,
}

impl Boost {
    pub fn new(when: Condition, card: CardType, factor: f32) -> Self {
        Self {
            when,
            target: BoostTarget::Card(card),
            factor,
            per_ratio: None,
        }
    }

    pub fn opp_last(when: Condition, factor: f32) -> Self {
        Self {
            when,
            target: BoostTarget::OppLast,
            factor,
            per_ratio: None,
        }
    }

    pub fn with_per_ratio(mut self, card: CardType, slope: f32) -> Self {
        self.per_ratio = Some((card, slope));
        self
    }
}

/// How an agent estimates the opponent's next card: unseen ratios,
/// optionally blended with a reveal snapshot, with some cards left out and
/// conditional boosts applied in order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Opponent cards left out of the model.
    pub exclude: Vec<CardType>,
    pub boosts: Vec<Boost>,
    /// Weight of a reveal snapshot in the model, 0 to ignore reveals.
    pub reveal_weight: f32,
}

impl ModelSpec {
    pub fn with_boost(mut self, boost: Boost) -> Self {
        self.boosts.push(boost);
        self
    }

    pub fn with_reveal_weight(mut self, weight: f32) -> Self {
        self.reveal_weight = weight;
        self
    }

    pub fn excluding(mut self, cards: impl IntoIterator<Item = CardType>) -> Self {
        self.exclude.extend(cards);
        self
    }

    /// Opponent model for this belief. Boost conditions may consume the
    /// agent's RNG.
    pub fn build(&self, ctx: &mut ConditionContext<'_>) -> OpponentModel {
        let belief = ctx.belief;
        let mut weights = belief.unseen.ratios();

        if self.reveal_weight > 0.0 {
            if let Some(revealed) = belief.revealed.as_ref().filter(|h| !h.is_empty()) {
                let w = self.reveal_weight.clamp(0.0, 1.0);
                let size = revealed.len() as f32;
                for card in CardType::ALL {
                    let shown = revealed.count(card) as f32 / size;
                    weights[card.index()] = (1.0 - w) * weights[card.index()] + w * shown;
                }
            }
        }

        for card in &self.exclude {
            weights[card.index()] = 0.0;
        }

        for boost in &self.boosts {
            let target = match boost.target {
                BoostTarget::Card(card) => Some(card),
                BoostTarget::OppLast => belief.context.last_opp(),
            };
            let Some(target) = target else { continue };
            if !ConditionEvaluator::evaluate(&boost.when, ctx) {
                continue;
            }
            let factor = match boost.per_ratio {
                Some((card, slope)) => boost.factor + slope * belief.ratio(card),
                None => boost.factor,
            };
            weights[target.index()] *= factor;
        }

        OpponentModel::from_weights(weights)
    }
}

/// Estimated distribution of the opponent's next card.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OpponentModel {
    probs: [f32; CardType::COUNT],
}

impl OpponentModel {
    /// Build from raw weights. Weights are normalized; an all-zero model
    /// stays all zero.
    #[must_use]
    pub fn from_weights(weights: [f32; CardType::COUNT]) -> Self {
        let sum: f32 = weights.iter().sum();
        let probs = if sum > 0.0 {
            weights.map(|w| w / sum)
        } else {
            weights
        };
        Self { probs }
    }

    #[must_use]
    pub fn p(&self, card: CardType) -> f32 {
        self.probs[card.index()]
    }

    /// Cards with non-zero weight, most likely first. Ties keep ordinal
    /// order.
    #[must_use]
    pub fn most_likely(&self) -> Vec<CardType> {
        let mut cards: Vec<CardType> = CardType::ALL
            .into_iter()
            .filter(|c| self.p(*c) > 0.0)
            .collect();
        cards.sort_by(|a, b| self.p(*b).partial_cmp(&self.p(*a)).unwrap_or(Ordering::Equal));
        cards
    }
}

// =============================================================================
// Scorer
// =============================================================================

/// Demote Betrayal when the opponent is likely to answer with Doubt.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BetrayalGuard {
    pub doubt_at_least: f32,
    /// Only guard when own life is at most `round + margin`.
    pub self_life_margin: Option<i32>,
}

/// Occasional swap of the top pick for a runner-up.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Noise {
    pub probability: f64,
    /// Runner-ups must score within this much of the best. `None` accepts
    /// every other card.
    pub margin: Option<f32>,
}

/// One ranked card.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub card: CardType,
    /// Expected margin against the model, before adjustments.
    pub ev: f32,
    /// Adjusted score used for ranking.
    pub score: f32,
}

/// Expected-value card scorer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvScorer {
    pub opponent: ModelSpec,

    /// Betrayal bonus per unit of `p(Cooperation)` when the opponent is in
    /// reach.
    pub lethal_bonus: f32,
    pub lethal_margin: i32,
    /// Penalty per unit of `p(Betrayal)` when this side is in reach.
    pub survival_penalty: f32,
    /// Extra penalty for Pollution under the same condition.
    pub pollution_survival_penalty: f32,
    /// Chaos bonus when hand quality is at most the threshold.
    pub reroll_bonus: f32,
    pub hand_quality_threshold: i32,
    /// Weight of the worst margin among the `minimax_top` likeliest cards.
    pub minimax_weight: f32,
    pub minimax_top: usize,
    /// Shrink toward the worst case when the disaster changes within the
    /// horizon.
    pub disaster_derate: f32,
    pub disaster_horizon: u32,

    pub guard: Option<BetrayalGuard>,
    pub noise: Option<Noise>,
}

impl Default for EvScorer {
    fn default() -> Self {
        Self {
            opponent: ModelSpec::default(),
            lethal_bonus: 0.0,
            lethal_margin: 1,
            survival_penalty: 0.0,
            pollution_survival_penalty: 0.0,
            reroll_bonus: 0.0,
            hand_quality_threshold: i32::MIN,
            minimax_weight: 0.0,
            minimax_top: 2,
            disaster_derate: 0.0,
            disaster_horizon: 0,
            guard: None,
            noise: None,
        }
    }
}

impl EvScorer {
    pub fn with_opponent(mut self, opponent: ModelSpec) -> Self {
        self.opponent = opponent;
        self
    }

    pub fn with_boost(mut self, boost: Boost) -> Self {
        self.opponent.boosts.push(boost);
        self
    }

    pub fn with_lethal_bonus(mut self, bonus: f32, margin: i32) -> Self {
        self.lethal_bonus = bonus;
        self.lethal_margin = margin;
        self
    }

    pub fn with_survival_penalty(mut self, penalty: f32, pollution: f32) -> Self {
        self.survival_penalty = penalty;
        self.pollution_survival_penalty = pollution;
        self
    }

    pub fn with_reroll_bonus(mut self, bonus: f32, quality_at_most: i32) -> Self {
        self.reroll_bonus = bonus;
        self.hand_quality_threshold = quality_at_most;
        self
    }

    pub fn with_minimax(mut self, weight: f32, top: usize) -> Self {
        self.minimax_weight = weight;
        self.minimax_top = top;
        self
    }

    pub fn with_disaster_derate(mut self, derate: f32, horizon: u32) -> Self {
        self.disaster_derate = derate;
        self.disaster_horizon = horizon;
        self
    }

    pub fn with_guard(mut self, guard: BetrayalGuard) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn with_noise(mut self, noise: Noise) -> Self {
        self.noise = Some(noise);
        self
    }

    pub fn with_reveal_weight(mut self, weight: f32) -> Self {
        self.opponent.reveal_weight = weight;
        self
    }

    pub fn excluding(mut self, cards: impl IntoIterator<Item = CardType>) -> Self {
        self.opponent.exclude.extend(cards);
        self
    }

    /// Full pipeline: model, rank, guard, noise. `None` for an empty hand.
    pub fn pick(&self, ctx: &mut ConditionContext<'_>) -> Option<CardType> {
        let belief = ctx.belief;
        let model = self.model(ctx);
        let mut ranking = self.rank(belief, &model);
        self.guard(belief, &model, &mut ranking);
        self.apply_noise(&mut ranking, &mut *ctx.rng);
        ranking.first().map(|c| c.card)
    }

    // === Model ===

    /// Opponent model for this belief. Boost conditions may consume the
    /// agent's RNG.
    pub fn model(&self, ctx: &mut ConditionContext<'_>) -> OpponentModel {
        self.opponent.build(ctx)
    }

    // === Ranking ===

    fn expected(table: &PayoffTable, card: CardType, model: &OpponentModel, round: u32) -> f32 {
        CardType::ALL
            .into_iter()
            .map(|y| model.p(y) * table.margin(card, y, round) as f32)
            .sum()
    }

    /// Rank distinct held cards, best first. Deterministic.
    #[must_use]
    pub fn rank(&self, belief: &Belief, model: &OpponentModel) -> Vec<Candidate> {
        let ctx = &belief.context;
        let scale = ctx.scale();
        let round = scale as u32;
        let table = &belief.payoff;
        let likely = model.most_likely();
        let derating = self.disaster_derate > 0.0
            && belief
                .disaster_change_in
                .is_some_and(|left| left <= self.disaster_horizon);

        let mut ranking: Vec<Candidate> = belief
            .hand
            .distinct()
            .into_iter()
            .map(|card| {
                let ev = Self::expected(table, card, model, round);
                let mut score = ev;

                if card == CardType::Betrayal && ctx.opp_life <= scale + self.lethal_margin {
                    score += model.p(CardType::Cooperation) * self.lethal_bonus;
                }
                if ctx.self_life <= scale {
                    let threat = model.p(CardType::Betrayal);
                    score -= threat * self.survival_penalty;
                    if card == CardType::Pollution {
                        score -= threat * self.pollution_survival_penalty;
                    }
                }
                if card == CardType::Chaos && belief.hand.quality() <= self.hand_quality_threshold {
                    score += self.reroll_bonus;
                }

                let worst = likely
                    .iter()
                    .map(|y| table.margin(card, *y, round))
                    .min();
                if self.minimax_weight > 0.0 {
                    let top_worst = likely
                        .iter()
                        .take(self.minimax_top.max(1))
                        .map(|y| table.margin(card, *y, round))
                        .min();
                    if let Some(m) = top_worst {
                        score += self.minimax_weight * m as f32;
                    }
                }
                if derating {
                    if let Some(m) = worst {
                        let d = self.disaster_derate.clamp(0.0, 1.0);
                        score = score * (1.0 - d) + m as f32 * d;
                    }
                }

                Candidate { card, ev, score }
            })
            .collect();

        // stable: equal scores keep hand order
        ranking.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        ranking
    }

    /// Move the best non-Betrayal card by base EV to the front when the
    /// guard trips.
    pub fn guard(&self, belief: &Belief, model: &OpponentModel, ranking: &mut Vec<Candidate>) {
        let Some(guard) = self.guard else { return };
        if ranking.first().map(|c| c.card) != Some(CardType::Betrayal) {
            return;
        }
        if model.p(CardType::Doubt) < guard.doubt_at_least {
            return;
        }
        let ctx = &belief.context;
        if let Some(margin) = guard.self_life_margin {
            if ctx.self_life > ctx.scale() + margin {
                return;
            }
        }

        // first maximum in hand order
        let order = belief.hand.distinct();
        let mut best: Option<(usize, f32, usize)> = None;
        for (i, candidate) in ranking.iter().enumerate() {
            if candidate.card == CardType::Betrayal {
                continue;
            }
            let position = order.iter().position(|c| *c == candidate.card).unwrap_or(usize::MAX);
            let better = match best {
                None => true,
                Some((_, ev, pos)) => candidate.ev > ev || (candidate.ev == ev && position < pos),
            };
            if better {
                best = Some((i, candidate.ev, position));
            }
        }

        if let Some((i, _, _)) = best {
            let alt = ranking.remove(i);
            ranking.insert(0, alt);
        }
    }

    /// Noise step. Consumes one draw whenever noise is configured.
    pub fn apply_noise(&self, ranking: &mut [Candidate], rng: &mut GameRng) {
        let Some(noise) = self.noise else { return };
        if !rng.chance(noise.probability) || ranking.len() < 2 {
            return;
        }
        let best = ranking[0].score;
        let eligible: Vec<usize> = (1..ranking.len())
            .filter(|&i| noise.margin.map_or(true, |m| best - ranking[i].score <= m))
            .collect();
        if let Some(&i) = rng.choose(&eligible) {
            ranking.swap(0, i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::belief::{RoundContext, UnseenSet};
    use crate::cards::Hand;
    use CardType::*;

    fn belief(hand: &[CardType], unseen: &[CardType], self_life: i32, opp_life: i32) -> Belief {
        let context = RoundContext {
            round: 2,
            self_life,
            opp_life,
            last_self: None,
            opp_recent: [None; 3],
        };
        Belief::new(Hand::from(hand), context, UnseenSet::from_cards(unseen.iter().copied()))
    }

    fn model(scorer: &EvScorer, belief: &Belief) -> OpponentModel {
        let mut rng = GameRng::new(0);
        scorer.model(&mut ConditionContext::new(belief, &mut rng))
    }

    #[test]
    fn test_model_normalizes() {
        let b = belief(&[Doubt], &[Cooperation, Cooperation, Betrayal, Recon], 10, 10);
        let scorer = EvScorer::default()
            .excluding([Recon])
            .with_boost(Boost::new(Condition::Always, Betrayal, 2.0));
        let m = model(&scorer, &b);

        assert_eq!(m.p(Recon), 0.0);
        assert!((m.p(Cooperation) - 0.5).abs() < 1e-6);
        assert!((m.p(Betrayal) - 0.5).abs() < 1e-6);
        assert_eq!(m.most_likely(), vec![Cooperation, Betrayal]);
    }

    #[test]
    fn test_model_blends_reveal() {
        let b = belief(&[Doubt], &[Cooperation, Cooperation], 10, 10)
            .with_revealed(Hand::from([Betrayal, Betrayal].as_slice()));
        let half = EvScorer::default().with_reveal_weight(0.5);
        let m = model(&half, &b);
        assert!((m.p(Betrayal) - 0.5).abs() < 1e-6);

        let ignored = model(&EvScorer::default(), &b);
        assert_eq!(ignored.p(Betrayal), 0.0);
    }

    #[test]
    fn test_boost_on_opp_last_without_history() {
        let b = belief(&[Doubt], &[Cooperation, Doubt], 10, 10);
        let scorer = EvScorer::default().with_boost(Boost::opp_last(Condition::Always, 5.0));
        let m = model(&scorer, &b);
        assert!((m.p(Cooperation) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_rank_prefers_betrayal_against_cooperators() {
        let b = belief(&[Doubt, Betrayal, Cooperation], &[Cooperation; 4], 10, 10);
        let scorer = EvScorer::default();
        let m = model(&scorer, &b);
        let ranking = scorer.rank(&b, &m);

        assert_eq!(ranking.len(), 3);
        assert_eq!(ranking[0].card, Betrayal);
        assert!(ranking[0].score >= ranking[1].score);
    }

    #[test]
    fn test_rank_ties_keep_hand_order() {
        let b = belief(&[Chaos, Recon], &[], 10, 10);
        let scorer = EvScorer::default();
        let ranking = scorer.rank(&b, &OpponentModel::default());
        assert_eq!(ranking[0].card, Chaos);
        assert_eq!(ranking[1].card, Recon);
    }

    #[test]
    fn test_survival_penalty_hits_pollution() {
        let b = belief(&[Pollution, Doubt], &[Betrayal, Cooperation], 2, 10);
        let scorer = EvScorer::default().with_survival_penalty(3.0, 3.0);
        let m = model(&scorer, &b);
        let ranking = scorer.rank(&b, &m);
        let pollution = ranking.iter().find(|c| c.card == Pollution).unwrap();
        assert!(pollution.score < pollution.ev - 2.9);
    }

    #[test]
    fn test_reroll_bonus() {
        let b = belief(&[Chaos, Betrayal], &[Doubt, Doubt], 10, 10);
        let scorer = EvScorer::default().with_reroll_bonus(10.0, 2);
        let m = model(&scorer, &b);
        assert_eq!(scorer.rank(&b, &m)[0].card, Chaos);
    }

    #[test]
    fn test_minimax_adds_worst_margin_of_top_cards() {
        let unseen = [Cooperation, Cooperation, Cooperation, Betrayal, Betrayal];
        let b = belief(&[Doubt], &unseen, 10, 10);
        let table = &b.payoff;
        let plain = EvScorer::default();
        let m = model(&plain, &b);
        assert_eq!(m.most_likely(), vec![Cooperation, Betrayal]);

        let base = plain.rank(&b, &m)[0].score;
        let vs_coop = table.margin(Doubt, Cooperation, 2) as f32;
        let vs_betrayal = table.margin(Doubt, Betrayal, 2) as f32;

        let top_one = EvScorer::default().with_minimax(0.5, 1).rank(&b, &m)[0].score;
        assert!((top_one - (base + 0.5 * vs_coop)).abs() < 1e-5);

        let top_two = EvScorer::default().with_minimax(0.5, 2).rank(&b, &m)[0].score;
        assert!((top_two - (base + 0.5 * vs_coop.min(vs_betrayal))).abs() < 1e-5);
    }

    #[test]
    fn test_guard_demotes_betrayal() {
        let mut unseen = vec![Cooperation; 7];
        unseen.extend([Doubt; 3]);
        let b = belief(&[Betrayal, Doubt, Chaos], &unseen, 10, 10);
        let scorer = EvScorer::default().with_guard(BetrayalGuard {
            doubt_at_least: 0.25,
            self_life_margin: None,
        });
        let m = model(&scorer, &b);
        let mut ranking = scorer.rank(&b, &m);
        assert_eq!(ranking[0].card, Betrayal);

        scorer.guard(&b, &m, &mut ranking);
        assert_eq!(ranking[0].card, Doubt);
        assert_eq!(ranking.len(), 3);
    }

    #[test]
    fn test_guard_respects_life_margin() {
        let b = belief(&[Betrayal, Doubt], &[Cooperation, Cooperation, Doubt], 10, 10);
        let scorer = EvScorer::default().with_guard(BetrayalGuard {
            doubt_at_least: 0.3,
            self_life_margin: Some(1),
        });
        let m = model(&scorer, &b);
        let mut ranking = scorer.rank(&b, &m);
        scorer.guard(&b, &m, &mut ranking);
        assert_eq!(ranking[0].card, Betrayal);
    }

    #[test]
    fn test_noise_is_separate_from_ranking() {
        let b = belief(&[Betrayal, Doubt, Cooperation], &[Cooperation; 3], 10, 10);
        let scorer = EvScorer::default().with_noise(Noise {
            probability: 1.0,
            margin: None,
        });
        let m = model(&scorer, &b);
        let ranking = scorer.rank(&b, &m);
        assert_eq!(ranking, scorer.rank(&b, &m));

        let mut noisy = ranking.clone();
        scorer.apply_noise(&mut noisy, &mut GameRng::new(3));
        assert_ne!(noisy[0].card, ranking[0].card);
    }

    #[test]
    fn test_noise_margin_limits_runner_ups() {
        let b = belief(&[Betrayal, Doubt], &[Cooperation; 3], 10, 10);
        let scorer = EvScorer::default().with_noise(Noise {
            probability: 1.0,
            margin: Some(0.1),
        });
        let m = model(&scorer, &b);
        let mut ranking = scorer.rank(&b, &m);
        scorer.apply_noise(&mut ranking, &mut GameRng::new(3));
        assert_eq!(ranking[0].card, Betrayal);
    }

    #[test]
    fn test_rank_uses_the_match_table() {
        use crate::rules::Effect;

        let table = PayoffTable::from_entries(PayoffTable::standard().entries().map(
            |(pair, effect)| match pair {
                (Chaos, Cooperation) => (pair, Effect::flat(20, 0)),
                _ => (pair, effect),
            },
        ))
        .unwrap();
        let standard = belief(&[Betrayal, Chaos], &[Cooperation; 4], 10, 10);
        let custom = standard.clone().with_payoff(table);

        let scorer = EvScorer::default();
        let m = model(&scorer, &standard);
        assert_eq!(scorer.rank(&standard, &m)[0].card, Betrayal);

        let ranking = scorer.rank(&custom, &m);
        assert_eq!(ranking[0].card, Chaos);
        assert!((ranking[0].ev - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_pick_on_empty_hand() {
        let b = belief(&[], &[Cooperation], 10, 10);
        let mut rng = GameRng::new(1);
        assert_eq!(EvScorer::default().pick(&mut ConditionContext::new(&b, &mut rng)), None);
    }
}
