//! Decision rules.
//!
//! A rule looks at a belief and either names a card the side holds or has
//! no opinion. Agents try their rules in order and play the first match.

use serde::{Deserialize, Serialize};

use super::condition::{Condition, ConditionContext, ConditionEvaluator};
use super::scorer::EvScorer;
use crate::cards::CardType;

/// Result of evaluating one rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleOutcome {
    /// Play this card. Always a card in hand.
    Matched(CardType),
    NoOpinion,
}

impl RuleOutcome {
    #[must_use]
    pub fn card(self) -> Option<CardType> {
        match self {
            RuleOutcome::Matched(card) => Some(card),
            RuleOutcome::NoOpinion => None,
        }
    }

    #[must_use]
    pub fn is_match(self) -> bool {
        matches!(self, RuleOutcome::Matched(_))
    }
}

/// One step of an agent's decision chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Rule {
    /// Play `card` when the condition holds and the card is in hand.
    Play { when: Condition, card: CardType },

    /// Play the opponent's last card if it is in hand.
    Mirror { when: Condition },

    /// Look up the opponent's last card in `responses` and play the paired
    /// card if held. Pairs are tried in order.
    Respond {
        when: Condition,
        responses: Vec<(CardType, CardType)>,
    },

    /// Play the first held card in `order`.
    Prefer { when: Condition, order: Vec<CardType> },

    /// Play a uniformly chosen held card from `pool`. An empty pool draws
    /// from the whole hand.
    Random { when: Condition, pool: Vec<CardType> },

    /// Defer to `then` or `otherwise`. A branch whose chosen arm has no
    /// opinion has no opinion.
    Branch {
        when: Condition,
        then: Box<Rule>,
        otherwise: Option<Box<Rule>>,
    },

    /// Expected-value scoring over the held cards.
    Score(EvScorer),
}

impl Rule {
    pub fn play(when: Condition, card: CardType) -> Self {
        Rule::Play { when, card }
    }

    pub fn prefer(when: Condition, order: impl IntoIterator<Item = CardType>) -> Self {
        Rule::Prefer {
            when,
            order: order.into_iter().collect(),
        }
    }

    pub fn respond(
        when: Condition,
        responses: impl IntoIterator<Item = (CardType, CardType)>,
    ) -> Self {
        Rule::Respond {
            when,
            responses: responses.into_iter().collect(),
        }
    }

    pub fn random(when: Condition, pool: impl IntoIterator<Item = CardType>) -> Self {
        Rule::Random {
            when,
            pool: pool.into_iter().collect(),
        }
    }

    pub fn branch(when: Condition, then: Rule, otherwise: Option<Rule>) -> Self {
        Rule::Branch {
            when,
            then: Box::new(then),
            otherwise: otherwise.map(Box::new),
        }
    }

    /// Evaluate this rule.
    pub fn evaluate(&self, ctx: &mut ConditionContext<'_>) -> RuleOutcome {
        let belief = ctx.belief;
        let hand = &belief.hand;
        let held = |card: CardType| {
            if hand.has(card) {
                RuleOutcome::Matched(card)
            } else {
                RuleOutcome::NoOpinion
            }
        };

        match self {
            Rule::Play { when, card } => {
                if hand.has(*card) && ConditionEvaluator::evaluate(when, ctx) {
                    RuleOutcome::Matched(*card)
                } else {
                    RuleOutcome::NoOpinion
                }
            }

            Rule::Mirror { when } => match belief.context.last_opp() {
                Some(last) if hand.has(last) && ConditionEvaluator::evaluate(when, ctx) => {
                    RuleOutcome::Matched(last)
                }
                _ => RuleOutcome::NoOpinion,
            },

            Rule::Respond { when, responses } => {
                let Some(last) = belief.context.last_opp() else {
                    return RuleOutcome::NoOpinion;
                };
                let answer = responses
                    .iter()
                    .find(|(seen, reply)| *seen == last && hand.has(*reply))
                    .map(|&(_, reply)| reply);
                match answer {
                    Some(reply) if ConditionEvaluator::evaluate(when, ctx) => held(reply),
                    _ => RuleOutcome::NoOpinion,
                }
            }

            Rule::Prefer { when, order } => match order.iter().copied().find(|c| hand.has(*c)) {
                Some(card) if ConditionEvaluator::evaluate(when, ctx) => RuleOutcome::Matched(card),
                _ => RuleOutcome::NoOpinion,
            },

            Rule::Random { when, pool } => {
                if !ConditionEvaluator::evaluate(when, ctx) {
                    return RuleOutcome::NoOpinion;
                }
                let choices: Vec<CardType> = if pool.is_empty() {
                    hand.cards().to_vec()
                } else {
                    let mut held_pool: Vec<CardType> = Vec::with_capacity(pool.len());
                    for card in pool.iter().copied() {
                        if hand.has(card) && !held_pool.contains(&card) {
                            held_pool.push(card);
                        }
                    }
                    held_pool
                };
                match ctx.rng.choose(&choices) {
                    Some(&card) => RuleOutcome::Matched(card),
                    None => RuleOutcome::NoOpinion,
                }
            }

            Rule::Branch {
                when,
                then,
                otherwise,
            } => {
                if ConditionEvaluator::evaluate(when, ctx) {
                    then.evaluate(ctx)
                } else {
                    match otherwise {
                        Some(rule) => rule.evaluate(ctx),
                        None => RuleOutcome::NoOpinion,
                    }
                }
            }

            Rule::Score(scorer) => match scorer.pick(ctx) {
                Some(card) => held(card),
                None => RuleOutcome::NoOpinion,
            },
        }
    }
}
