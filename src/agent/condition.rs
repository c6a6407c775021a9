//! Decision conditions.
//!
//! Conditions are predicates over a `Belief`. They are plain data so agent
//! personas can be written as configuration, and they are total: every
//! condition yields true or false for every belief, including the opening
//! round with no history.
//!
//! Model conditions read the agent's opponent model when it carries one and
//! fall back to the raw unseen ratio otherwise.
//!
//! `Chance` is the only condition that consumes randomness. Combinators
//! short-circuit left to right, so a `Chance` placed after a failing
//! condition in an `All` never rolls.

use serde::{Deserialize, Serialize};

use super::scorer::OpponentModel;
use crate::belief::Belief;
use crate::cards::CardType;
use crate::core::GameRng;
use crate::rules::Disaster;

/// A predicate over what a side knows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    // === Round ===

    /// First round of the match.
    FirstRound,

    /// Round counter at most N.
    RoundAtMost(u32),

    /// Round counter at least N.
    RoundAtLeast(u32),

    /// Round counter (never below 1) is exactly N.
    RoundIs(u32),

    /// Round counter (never below 1) is a multiple of N.
    RoundMultipleOf(u32),

    // === Own Hand ===

    /// At least one card of this type is held.
    Holds(CardType),

    /// At least N cards of this type are held.
    HoldsAtLeast(CardType, usize),

    /// No card of this type is held.
    Lacks(CardType),

    /// Any of these types is held.
    HoldsAny(Vec<CardType>),

    /// At most N Betrayal and Pollution cards held.
    AttackCountAtMost(usize),

    /// At most N distinct attack types held.
    AttackKindsAtMost(usize),

    /// Summed safety weight of the hand is at most N.
    HandQualityAtMost(i32),

    /// Hand scored with these per-type weights (unlisted types count 0) is
    /// at most `value`.
    HandScoreAtMost {
        weights: Vec<(CardType, i32)>,
        value: i32,
    },

    // === Opponent Pattern ===

    /// Opponent's last card was this type.
    OppLast(CardType),

    /// Opponent's last card was one of these types.
    OppLastIn(Vec<CardType>),

    /// Opponent's second most recent card was this type.
    OppLast2(CardType),

    /// Opponent played the same card twice in a row.
    OppRepeated,

    /// Opponent's last N cards (up to 3) were all this type.
    OppStreak { card: CardType, n: usize },

    /// This type is not among the opponent's last three cards.
    OppAbsentInLast3(CardType),

    /// Opponent's last card differs from the one before.
    OppChanged,

    // === Life ===

    /// Own life at most N.
    SelfLifeAtMost(i32),

    /// Opponent life at most N.
    OppLifeAtMost(i32),

    /// Own life minus opponent life at least N.
    MarginAtLeast(i32),

    /// Own life minus opponent life at most N.
    MarginAtMost(i32),

    /// Own life at most `round + offset` (round never below 1).
    SelfInReach { offset: i32 },

    /// Opponent life at most `round + offset` (round never below 1).
    OppInReach { offset: i32 },

    // === Unseen Ratios ===

    /// Unseen share of this type at least `value`.
    RatioAtLeast { card: CardType, value: f32 },

    /// Unseen share of this type strictly below `value`.
    RatioBelow { card: CardType, value: f32 },

    /// Unseen share strictly between `min` and `max`.
    RatioBetween { card: CardType, min: f32, max: f32 },

    /// Summed unseen share of these types at least `value`.
    RatioSumAtLeast { cards: Vec<CardType>, value: f32 },

    /// No single type has an unseen share of `value` or more.
    MaxRatioBelow(f32),

    // === Opponent Model ===

    /// Modeled probability of this type at least `value`.
    ModelAtLeast { card: CardType, value: f32 },

    /// Modeled probability of this type strictly below `value`.
    ModelBelow { card: CardType, value: f32 },

    // === Public Knowledge ===

    /// This disaster is active.
    DisasterIs(Disaster),

    /// The disaster changes within N rounds.
    DisasterChangeWithin(u32),

    /// The revealed opponent hand holds this type.
    RevealedHolds(CardType),

    // === Randomness ===

    /// True with this probability.
    Chance(f64),

    // === Combinators ===

    /// All conditions must be true.
    All(Vec<Condition>),

    /// At least one condition must be true.
    Any(Vec<Condition>),

    /// Condition must be false.
    Not(Box<Condition>),

    Always,

    Never,
}

impl Condition {
    /// Create an AND condition.
    pub fn all(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self::All(conditions.into_iter().collect())
    }

    /// Create an OR condition.
    pub fn any(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self::Any(conditions.into_iter().collect())
    }

    /// Negate this condition.
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    pub fn ratio_at_least(card: CardType, value: f32) -> Self {
        Self::RatioAtLeast { card, value }
    }

    pub fn ratio_below(card: CardType, value: f32) -> Self {
        Self::RatioBelow { card, value }
    }

    pub fn model_at_least(card: CardType, value: f32) -> Self {
        Self::ModelAtLeast { card, value }
    }

    pub fn model_below(card: CardType, value: f32) -> Self {
        Self::ModelBelow { card, value }
    }

    /// Add another condition with AND.
    pub fn and(self, other: Condition) -> Self {
        match self {
            Self::All(mut conditions) => {
                conditions.push(other);
                Self::All(conditions)
            }
            Self::Always => other,
            _ => Self::All(vec![self, other]),
        }
    }

    /// Add another condition with OR.
    pub fn or(self, other: Condition) -> Self {
        match self {
            Self::Any(mut conditions) => {
                conditions.push(other);
                Self::Any(conditions)
            }
            _ => Self::Any(vec![self, other]),
        }
    }
}

/// Context for evaluating conditions.
pub struct ConditionContext<'a> {
    pub belief: &'a Belief,
    /// The deciding agent's own stream.
    pub rng: &'a mut GameRng,
    /// The agent's opponent model for this decision, if it keeps one.
    pub model: Option<OpponentModel>,
}

impl<'a> ConditionContext<'a> {
    pub fn new(belief: &'a Belief, rng: &'a mut GameRng) -> Self {
        Self {
            belief,
            rng,
            model: None,
        }
    }

    pub fn with_model(mut self, model: OpponentModel) -> Self {
        self.model = Some(model);
        self
    }

    /// Modeled probability of `card`, or its unseen ratio without a model.
    #[must_use]
    pub fn p(&self, card: CardType) -> f32 {
        match &self.model {
            Some(model) => model.p(card),
            None => self.belief.ratio(card),
        }
    }
}

/// Evaluator for decision conditions.
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// Check if a condition is satisfied.
    pub fn evaluate(condition: &Condition, ctx: &mut ConditionContext<'_>) -> bool {
        let belief = ctx.belief;
        let round = &belief.context;
        let hand = &belief.hand;

        match condition {
            Condition::FirstRound => round.is_first(),

            Condition::RoundAtMost(n) => round.round.max(1) <= *n,

            Condition::RoundAtLeast(n) => round.round.max(1) >= *n,

            Condition::RoundIs(n) => round.round.max(1) == *n,

            Condition::RoundMultipleOf(n) => *n > 0 && round.round.max(1) % *n == 0,

            Condition::Holds(card) => hand.has(*card),

            Condition::HoldsAtLeast(card, n) => hand.has_at_least(*card, *n),

            Condition::Lacks(card) => !hand.has(*card),

            Condition::HoldsAny(cards) => cards.iter().any(|c| hand.has(*c)),

            Condition::AttackCountAtMost(n) => hand.attack_count() <= *n,

            Condition::AttackKindsAtMost(n) => {
                let kinds = [CardType::Betrayal, CardType::Pollution]
                    .into_iter()
                    .filter(|c| hand.has(*c))
                    .count();
                kinds <= *n
            }

            Condition::HandQualityAtMost(n) => hand.quality() <= *n,

            Condition::HandScoreAtMost { weights, value } => {
                let score: i32 = hand
                    .iter()
                    .map(|card| {
                        weights
                            .iter()
                            .find(|(weighted, _)| *weighted == card)
                            .map_or(0, |&(_, w)| w)
                    })
                    .sum();
                score <= *value
            }

            Condition::OppLast(card) => round.last_opp() == Some(*card),

            Condition::OppLastIn(cards) => round.last_opp().is_some_and(|c| cards.contains(&c)),

            Condition::OppLast2(card) => round.last2_opp() == Some(*card),

            Condition::OppRepeated => round.opp_repeated(),

            Condition::OppStreak { card, n } => round.opp_streak(*card, *n),

            Condition::OppAbsentInLast3(card) => round.opp_absent_in_last3(*card),

            Condition::OppChanged => round.opp_changed(),

            Condition::SelfLifeAtMost(n) => round.self_life <= *n,

            Condition::OppLifeAtMost(n) => round.opp_life <= *n,

            Condition::MarginAtLeast(n) => round.life_margin() >= *n,

            Condition::MarginAtMost(n) => round.life_margin() <= *n,

            Condition::SelfInReach { offset } => round.self_life <= round.scale() + *offset,

            Condition::OppInReach { offset } => round.opp_in_reach(*offset),

            Condition::RatioAtLeast { card, value } => belief.ratio(*card) >= *value,

            Condition::RatioBelow { card, value } => belief.ratio(*card) < *value,

            Condition::RatioBetween { card, min, max } => {
                let r = belief.ratio(*card);
                r > *min && r < *max
            }

            Condition::RatioSumAtLeast { cards, value } => {
                cards.iter().map(|c| belief.ratio(*c)).sum::<f32>() >= *value
            }

            Condition::MaxRatioBelow(value) => belief.unseen.max_ratio() < *value,

            Condition::ModelAtLeast { card, value } => ctx.p(*card) >= *value,

            Condition::ModelBelow { card, value } => ctx.p(*card) < *value,

            Condition::DisasterIs(disaster) => belief.disaster == *disaster,

            Condition::DisasterChangeWithin(n) => {
                belief.disaster_change_in.is_some_and(|left| left <= *n)
            }

            Condition::RevealedHolds(card) => {
                belief.revealed.as_ref().is_some_and(|h| h.has(*card))
            }

            Condition::Chance(p) => ctx.rng.chance(*p),

            Condition::All(conditions) => conditions.iter().all(|c| Self::evaluate(c, ctx)),

            Condition::Any(conditions) => conditions.iter().any(|c| Self::evaluate(c, ctx)),

            Condition::Not(inner) => !Self::evaluate(inner, ctx),

            Condition::Always => true,

            Condition::Never => false,
        }
    }
}
