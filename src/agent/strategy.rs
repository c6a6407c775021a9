//! Strategies and the data-driven agent.
//!
//! Anything that can play a seat implements `Strategy`. `Agent` is the
//! general implementation: an ordered rule chain, a fallback priority and a
//! draft selector, all described by a serializable `AgentSpec`.

use serde::{Deserialize, Serialize};

use super::condition::ConditionContext;
use super::draft::DraftSelector;
use super::rule::{Rule, RuleOutcome};
use super::scorer::ModelSpec;
use crate::belief::Belief;
use crate::cards::CardType;
use crate::core::GameRng;
use crate::zones::DraftPick;

// =============================================================================
// Strategy
// =============================================================================

/// Decision policy for one seat.
pub trait Strategy: Send {
    /// Display name.
    fn name(&self) -> &str;

    /// Pick a card to submit. `None` only for an empty hand.
    fn choose(&mut self, belief: &Belief) -> Option<CardType>;

    /// Pick one of two draft candidates.
    fn choose_draft(&mut self, first: CardType, second: CardType, belief: &Belief) -> DraftPick;
}

// =============================================================================
// Agent
// =============================================================================

/// Serializable description of an agent.
///
/// ```
/// use dilemma_duel::agent::{AgentSpec, Condition, Rule};
/// use dilemma_duel::cards::CardType;
///
/// let spec = AgentSpec::new("cautious")
///     .with_rule(Rule::play(Condition::ratio_at_least(CardType::Betrayal, 0.3), CardType::Doubt))
///     .with_fallback([CardType::Cooperation]);
/// assert_eq!(spec.rules.len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub name: String,
    pub rules: Vec<Rule>,
    /// Played when no rule matches: the first type here that is held.
    pub fallback: Vec<CardType>,
    #[serde(default)]
    pub draft: DraftSelector,
    /// Opponent model built once per decision and exposed to rule
    /// conditions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelSpec>,
}

impl AgentSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
            fallback: Vec::new(),
            draft: DraftSelector::default(),
            model: None,
        }
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn with_fallback(mut self, fallback: impl IntoIterator<Item = CardType>) -> Self {
        self.fallback = fallback.into_iter().collect();
        self
    }

    pub fn with_draft(mut self, draft: DraftSelector) -> Self {
        self.draft = draft;
        self
    }

    pub fn with_model(mut self, model: ModelSpec) -> Self {
        self.model = Some(model);
        self
    }
}

/// Where a decision came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecisionSource {
    /// The rule at this position in the chain.
    Rule(usize),
    Fallback,
    FirstInHand,
}

/// A chosen card and how it was chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    pub card: CardType,
    pub source: DecisionSource,
}

/// Rule-chain agent with its own RNG stream.
#[derive(Clone, Debug)]
pub struct Agent {
    spec: AgentSpec,
    rng: GameRng,
}

impl Agent {
    pub fn from_spec(spec: AgentSpec, seed: u64) -> Self {
        Self {
            spec,
            rng: GameRng::new(seed),
        }
    }

    pub fn with_rng(spec: AgentSpec, rng: GameRng) -> Self {
        Self { spec, rng }
    }

    #[must_use]
    pub fn spec(&self) -> &AgentSpec {
        &self.spec
    }

    #[must_use]
    pub fn rng(&self) -> &GameRng {
        &self.rng
    }

    /// First matching rule, else the first held fallback type, else the
    /// first card in hand.
    pub fn decide(&mut self, belief: &Belief) -> Option<Decision> {
        let mut ctx = ConditionContext::new(belief, &mut self.rng);
        if let Some(model) = &self.spec.model {
            ctx.model = Some(model.build(&mut ctx));
        }

        for (i, rule) in self.spec.rules.iter().enumerate() {
            let RuleOutcome::Matched(card) = rule.evaluate(&mut ctx) else {
                continue;
            };
            debug_assert!(
                belief.has(card),
                "rule {i} of {} chose {card} not in hand",
                self.spec.name
            );
            if belief.has(card) {
                tracing::trace!(
                    target: "dilemma_duel::agent",
                    agent = %self.spec.name,
                    rule = i,
                    ?card,
                    "rule matched"
                );
                return Some(Decision {
                    card,
                    source: DecisionSource::Rule(i),
                });
            }
            tracing::warn!(
                target: "dilemma_duel::agent",
                agent = %self.spec.name,
                rule = i,
                ?card,
                "rule chose a card not in hand"
            );
        }

        if let Some(card) = self.spec.fallback.iter().copied().find(|c| belief.has(*c)) {
            return Some(Decision {
                card,
                source: DecisionSource::Fallback,
            });
        }

        belief.hand.get(0).map(|card| Decision {
            card,
            source: DecisionSource::FirstInHand,
        })
    }
}

impl Strategy for Agent {
    fn name(&self) -> &str {
        &self.spec.name
    }

    fn choose(&mut self, belief: &Belief) -> Option<CardType> {
        self.decide(belief).map(|d| d.card)
    }

    fn choose_draft(&mut self, first: CardType, second: CardType, belief: &Belief) -> DraftPick {
        self.spec.draft.choose(first, second, belief, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Condition;
    use crate::belief::{RoundContext, UnseenSet};
    use crate::cards::Hand;
    use CardType::*;

    fn belief(hand: &[CardType]) -> Belief {
        Belief::new(
            Hand::from(hand),
            RoundContext::opening(10, 10),
            UnseenSet::from_cards(CardType::ALL),
        )
    }

    fn spec() -> AgentSpec {
        AgentSpec::new("test")
            .with_rule(Rule::play(Condition::Always, Betrayal))
            .with_rule(Rule::play(Condition::FirstRound, Recon))
            .with_fallback([Doubt, Cooperation])
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let mut agent = Agent::from_spec(spec(), 1);
        let decision = agent.decide(&belief(&[Recon, Betrayal])).unwrap();
        assert_eq!(decision.card, Betrayal);
        assert_eq!(decision.source, DecisionSource::Rule(0));

        let decision = agent.decide(&belief(&[Doubt, Recon])).unwrap();
        assert_eq!(decision.card, Recon);
        assert_eq!(decision.source, DecisionSource::Rule(1));
    }

    #[test]
    fn test_fallback_then_first_in_hand() {
        let mut agent = Agent::from_spec(spec(), 1);
        let decision = agent.decide(&belief(&[Chaos, Cooperation])).unwrap();
        assert_eq!(decision.card, Cooperation);
        assert_eq!(decision.source, DecisionSource::Fallback);

        let decision = agent.decide(&belief(&[Chaos, Pollution])).unwrap();
        assert_eq!(decision.card, Chaos);
        assert_eq!(decision.source, DecisionSource::FirstInHand);
    }

    #[test]
    fn test_empty_hand() {
        let mut agent = Agent::from_spec(spec(), 1);
        assert_eq!(agent.choose(&belief(&[])), None);
    }

    #[test]
    fn test_strategy_object() {
        let mut seat: Box<dyn Strategy> = Box::new(Agent::from_spec(spec(), 1));
        assert_eq!(seat.name(), "test");
        assert_eq!(seat.choose(&belief(&[Doubt])), Some(Doubt));
        let pick = seat.choose_draft(Chaos, Doubt, &belief(&[Betrayal]));
        assert_eq!(pick, DraftPick::Second);
    }

    #[test]
    fn test_spec_serialization() {
        let spec = spec();
        let json = serde_json::to_string(&spec).unwrap();
        let back: AgentSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(spec, back);
    }
}
