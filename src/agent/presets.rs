//! Built-in agent personas.
//!
//! Each persona is plain `AgentSpec` data: a rule chain, a fallback order
//! and the default draft selector. `Roster` looks personas up by name.
//!
//! | name         | style                                                   |
//! |--------------|---------------------------------------------------------|
//! | `steady`     | cooperative opener, punishes Pollution, cautious Recon  |
//! | `raider`     | attack first, punishes repeated Cooperation             |
//! | `berserker`  | early rush, counters the last card                      |
//! | `reader`     | pattern reader, cooperative when ahead                  |
//! | `calculator` | expected-value scorer                                   |
//! | `strategist` | long-game positioning, Recon early                      |
//! | `rusher`     | kill windows and early pressure                         |
//! | `guardian`   | defensive, mirrors the opponent                         |
//! | `gambler`    | randomized counters and attacks                         |
//! | `tactician`  | tactics on a boosted model, then a noisy EV scorer      |
//! | `aesthete`   | plays by card preference only                           |

use rustc_hash::FxHashMap;

use super::condition::Condition;
use super::rule::Rule;
use super::scorer::{BetrayalGuard, Boost, EvScorer, ModelSpec, Noise};
use super::strategy::AgentSpec;
use crate::cards::CardType::{self, *};

/// Names of the built-in personas.
pub const PERSONAS: [&str; 11] = [
    "steady",
    "raider",
    "berserker",
    "reader",
    "calculator",
    "strategist",
    "rusher",
    "guardian",
    "gambler",
    "tactician",
    "aesthete",
];

// === Shorthand ===

fn all<const N: usize>(conditions: [Condition; N]) -> Condition {
    Condition::all(conditions)
}

fn any<const N: usize>(conditions: [Condition; N]) -> Condition {
    Condition::any(conditions)
}

fn opp_last(card: CardType) -> Condition {
    Condition::OppLast(card)
}

fn ratio_at_least(card: CardType, value: f32) -> Condition {
    Condition::ratio_at_least(card, value)
}

fn ratio_below(card: CardType, value: f32) -> Condition {
    Condition::ratio_below(card, value)
}

fn model_at_least(card: CardType, value: f32) -> Condition {
    Condition::model_at_least(card, value)
}

fn model_below(card: CardType, value: f32) -> Condition {
    Condition::model_below(card, value)
}

fn not_first() -> Condition {
    Condition::FirstRound.negate()
}

/// Own life within this round's Betrayal loss.
fn in_danger() -> Condition {
    Condition::SelfInReach { offset: 0 }
}

fn opp_in_reach(offset: i32) -> Condition {
    Condition::OppInReach { offset }
}

/// Opponent played Cooperation the last two rounds.
fn opp_cooperated_twice() -> Condition {
    all([opp_last(Cooperation), Condition::OppLast2(Cooperation)])
}

fn play(when: Condition, card: CardType) -> Rule {
    Rule::play(when, card)
}

// === Personas ===

/// Agent with no rules and a cooperative fallback.
pub fn default(name: &str) -> AgentSpec {
    AgentSpec::new(name).with_fallback([Cooperation, Doubt, Pollution, Betrayal, Chaos])
}

pub fn steady() -> AgentSpec {
    let recon_window = all([
        Condition::RoundAtLeast(3),
        Condition::RoundAtMost(7),
        Condition::MarginAtLeast(0),
        all([opp_last(Pollution), Condition::Holds(Doubt)]).negate(),
        Condition::RatioBetween {
            card: Cooperation,
            min: 0.22,
            max: 0.48,
        },
        ratio_below(Doubt, 0.30),
        ratio_below(Pollution, 0.35),
    ]);

    AgentSpec::new("steady")
        .with_rules([
            play(Condition::RoundAtMost(2), Cooperation),
            play(opp_last(Pollution), Doubt),
            play(all([opp_last(Pollution), Condition::Lacks(Doubt)]), Interrupt),
            play(all([opp_last(Cooperation), Condition::MarginAtLeast(0)]), Interrupt),
            play(recon_window, Recon),
            play(any([ratio_at_least(Cooperation, 0.33), opp_last(Chaos)]), Pollution),
            play(
                all([
                    any([opp_cooperated_twice(), opp_in_reach(1)]),
                    ratio_below(Doubt, 0.20),
                ]),
                Betrayal,
            ),
            play(Condition::SelfLifeAtMost(4), Chaos),
            play(ratio_at_least(Pollution, 0.25), Doubt),
        ])
        .with_fallback([Cooperation, Recon, Doubt, Interrupt, Pollution, Betrayal, Chaos])
}

pub fn raider() -> AgentSpec {
    let order = [Betrayal, Pollution, Chaos, Recon, Cooperation, Doubt, Interrupt];
    AgentSpec::new("raider")
        .with_rules([
            play(
                all([in_danger(), any([opp_last(Betrayal), ratio_at_least(Betrayal, 0.28)])]),
                Doubt,
            ),
            play(all([Condition::OppRepeated, opp_last(Cooperation)]), Betrayal),
            play(all([Condition::OppRepeated, opp_last(Pollution), in_danger()]), Doubt),
            play(all([Condition::OppRepeated, opp_last(Pollution)]), Pollution),
            play(all([Condition::RoundAtLeast(3), opp_cooperated_twice()]), Betrayal),
            play(
                all([ratio_at_least(Cooperation, 0.40), ratio_below(Doubt, 0.25)]),
                Betrayal,
            ),
            play(opp_in_reach(1), Betrayal),
            play(Condition::RoundAtMost(2), Pollution),
            play(
                all([
                    Condition::RoundAtLeast(2),
                    any([Condition::MarginAtMost(-2), Condition::AttackCountAtMost(1)]),
                ]),
                Chaos,
            ),
            play(all([Condition::RoundAtLeast(2), opp_last(Doubt).negate()]), Pollution),
            play(
                all([
                    Condition::Lacks(Betrayal),
                    any([opp_last(Cooperation), Condition::MarginAtMost(-1)]),
                ]),
                Recon,
            ),
            Rule::prefer(Condition::Always, order),
        ])
        .with_fallback(order)
}

pub fn berserker() -> AgentSpec {
    let order = [Betrayal, Pollution, Interrupt, Chaos, Doubt, Recon, Cooperation];
    AgentSpec::new("berserker")
        .with_rules([
            play(opp_in_reach(0), Betrayal),
            Rule::prefer(Condition::RoundAtMost(3), [Betrayal, Pollution]),
            play(opp_last(Cooperation), Betrayal),
            play(opp_last(Pollution), Doubt),
            play(opp_last(Betrayal), Interrupt),
            play(Condition::Holds(Pollution), Betrayal),
            play(Condition::RoundMultipleOf(3), Chaos),
            Rule::prefer(Condition::Always, order),
        ])
        .with_fallback(order)
}

pub fn reader() -> AgentSpec {
    AgentSpec::new("reader")
        .with_rules([
            Rule::prefer(Condition::FirstRound, [Cooperation, Recon, Pollution]),
            play(all([opp_in_reach(0), ratio_below(Doubt, 0.30)]), Betrayal),
            play(
                all([
                    any([in_danger(), Condition::MarginAtMost(-2)]),
                    ratio_at_least(Betrayal, 0.25),
                ]),
                Doubt,
            ),
            Rule::respond(
                Condition::OppRepeated,
                [
                    (Cooperation, Pollution),
                    (Betrayal, Doubt),
                    (Pollution, Doubt),
                    (Doubt, Cooperation),
                    (Chaos, Cooperation),
                ],
            ),
            play(all([opp_last(Cooperation), Condition::MarginAtLeast(0)]), Cooperation),
            play(
                all([
                    opp_last(Cooperation),
                    any([Condition::MarginAtMost(-1), ratio_at_least(Cooperation, 0.35)]),
                ]),
                Pollution,
            ),
            play(ratio_at_least(Betrayal, 0.30), Doubt),
            play(Condition::RoundAtMost(2), Cooperation),
            play(
                all([Condition::RoundAtLeast(3), Condition::AttackKindsAtMost(1)]),
                Chaos,
            ),
            play(
                all([Condition::MaxRatioBelow(0.35), Condition::MarginAtMost(-1)]),
                Recon,
            ),
            Rule::prefer(
                Condition::Always,
                [Pollution, Cooperation, Doubt, Betrayal, Recon, Chaos, Interrupt],
            ),
        ])
        .with_fallback([Pollution, Cooperation, Doubt, Betrayal, Recon, Chaos])
}

/// Hand weights the calculator uses to judge whether its hand is worth
/// spending a Recon on.
pub const CALCULATOR_HAND_WEIGHTS: [(CardType, i32); 7] = [
    (Betrayal, 3),
    (Pollution, 2),
    (Cooperation, 1),
    (Doubt, 1),
    (Recon, 0),
    (Chaos, -1),
    (Interrupt, -1),
];

/// The calculator's EV scorer over raw unseen ratios.
pub fn calculator_scorer() -> EvScorer {
    EvScorer::default()
        .with_lethal_bonus(2.5, 1)
        .with_survival_penalty(3.0, 0.0)
        .with_guard(BetrayalGuard {
            doubt_at_least: 0.34,
            self_life_margin: None,
        })
        .with_reveal_weight(0.5)
        .with_disaster_derate(0.3, 1)
}

pub fn calculator() -> AgentSpec {
    let weak_hand = any([
        Condition::AttackCountAtMost(0),
        Condition::HandScoreAtMost {
            weights: CALCULATOR_HAND_WEIGHTS.to_vec(),
            value: 1,
        },
    ]);

    AgentSpec::new("calculator")
        .with_rules([
            play(all([opp_in_reach(0), ratio_below(Doubt, 0.33)]), Betrayal),
            play(all([in_danger(), ratio_at_least(Betrayal, 0.28)]), Doubt),
            play(weak_hand, Recon),
            Rule::Score(calculator_scorer()),
        ])
        .with_fallback([Betrayal, Pollution, Cooperation, Recon, Doubt, Chaos, Interrupt])
}

pub fn strategist() -> AgentSpec {
    AgentSpec::new("strategist")
        .with_rules([
            play(
                all([in_danger(), any([ratio_at_least(Betrayal, 0.28), opp_last(Betrayal)])]),
                Doubt,
            ),
            Rule::respond(
                Condition::OppRepeated,
                [
                    (Cooperation, Betrayal),
                    (Betrayal, Doubt),
                    (Pollution, Doubt),
                    (Chaos, Cooperation),
                    (Interrupt, Pollution),
                ],
            ),
            play(
                all([
                    Condition::RoundAtMost(4),
                    Condition::MarginAtLeast(-1),
                    ratio_below(Betrayal, 0.27),
                    Condition::Lacks(Betrayal),
                ]),
                Recon,
            ),
            play(
                all([
                    any([ratio_at_least(Cooperation, 0.32), opp_last(Chaos)]),
                    ratio_below(Doubt, 0.29),
                ]),
                Pollution,
            ),
            play(
                all([ratio_below(Betrayal, 0.23), Condition::MarginAtLeast(-1)]),
                Cooperation,
            ),
            play(all([opp_in_reach(1), ratio_below(Doubt, 0.32)]), Betrayal),
            play(any([opp_last(Pollution), ratio_at_least(Pollution, 0.30)]), Doubt),
            play(
                any([
                    Condition::AttackKindsAtMost(1),
                    all([Condition::OppRepeated, Condition::RoundAtLeast(4)]),
                ]),
                Chaos,
            ),
            play(
                all([
                    ratio_below(Cooperation, 0.26),
                    Condition::RatioSumAtLeast {
                        cards: vec![Betrayal, Pollution],
                        value: 0.45,
                    },
                ]),
                Interrupt,
            ),
            Rule::prefer(
                Condition::Always,
                [Pollution, Cooperation, Betrayal, Recon, Doubt, Chaos, Interrupt],
            ),
        ])
        .with_fallback([Pollution, Cooperation, Betrayal, Doubt, Chaos, Interrupt, Recon])
}

pub fn rusher() -> AgentSpec {
    let order = [Betrayal, Pollution, Chaos, Recon, Cooperation, Doubt, Interrupt];
    AgentSpec::new("rusher")
        .with_rules([
            play(opp_in_reach(1), Betrayal),
            play(opp_in_reach(0), Pollution),
            play(Condition::RoundAtMost(2), Betrayal),
            play(Condition::RoundAtMost(2), Pollution),
            play(opp_cooperated_twice(), Betrayal),
            play(
                all([ratio_at_least(Cooperation, 0.35), ratio_below(Doubt, 0.25)]),
                Betrayal,
            ),
            play(
                all([
                    Condition::RoundAtLeast(2),
                    any([Condition::MarginAtMost(-2), Condition::AttackCountAtMost(1)]),
                ]),
                Chaos,
            ),
            play(all([Condition::RoundAtLeast(2), opp_last(Doubt).negate()]), Pollution),
            play(
                all([
                    Condition::Lacks(Betrayal),
                    any([opp_last(Cooperation), Condition::MarginAtMost(-1)]),
                ]),
                Recon,
            ),
            play(
                all([in_danger(), any([opp_last(Betrayal), ratio_at_least(Betrayal, 0.28)])]),
                Doubt,
            ),
            play(all([Condition::OppRepeated, opp_last(Cooperation)]), Betrayal),
            play(all([Condition::OppRepeated, opp_last(Pollution), in_danger()]), Doubt),
            play(all([Condition::OppRepeated, opp_last(Pollution)]), Pollution),
            Rule::prefer(Condition::Always, order),
        ])
        .with_fallback(order)
}

pub fn guardian() -> AgentSpec {
    AgentSpec::new("guardian")
        .with_rules([
            play(opp_last(Pollution), Doubt),
            play(Condition::OppLastIn(vec![Pollution, Betrayal]), Interrupt),
            play(any([in_danger(), ratio_at_least(Betrayal, 0.28)]), Doubt),
            Rule::Mirror {
                when: Condition::Always,
            },
            play(Condition::MarginAtMost(-1), Cooperation),
            play(
                all([
                    any([ratio_at_least(Cooperation, 0.35), opp_last(Cooperation)]),
                    ratio_below(Doubt, 0.25),
                ]),
                Pollution,
            ),
            play(
                any([Condition::AttackKindsAtMost(0), Condition::OppRepeated]),
                Chaos,
            ),
            play(
                all([
                    Condition::Lacks(Betrayal),
                    any([
                        Condition::MarginAtMost(0),
                        Condition::RatioBetween {
                            card: Cooperation,
                            min: 0.28,
                            max: 0.45,
                        },
                    ]),
                ]),
                Recon,
            ),
            play(all([opp_in_reach(0), ratio_below(Doubt, 0.25)]), Betrayal),
        ])
        .with_fallback([Doubt, Cooperation, Interrupt, Pollution, Recon, Chaos, Betrayal])
}

pub fn gambler() -> AgentSpec {
    let counters = Rule::respond(
        Condition::Always,
        [
            (Cooperation, Betrayal),
            (Pollution, Doubt),
            (Betrayal, Interrupt),
            (Doubt, Cooperation),
            (Interrupt, Pollution),
            (Chaos, Cooperation),
        ],
    );
    let mirror = Rule::Mirror {
        when: Condition::Always,
    };
    let opening_attacks = [Chaos, Pollution, Betrayal];

    AgentSpec::new("gambler")
        .with_rules([
            play(all([opp_in_reach(0), ratio_below(Doubt, 0.33)]), Betrayal),
            Rule::branch(
                Condition::OppRepeated,
                Rule::branch(Condition::Chance(0.5), counters, Some(mirror)),
                None,
            ),
            Rule::random(
                all([
                    Condition::FirstRound,
                    Condition::HoldsAny(opening_attacks.to_vec()),
                    Condition::Chance(0.7),
                ]),
                opening_attacks,
            ),
            Rule::random(Condition::FirstRound, []),
            play(any([Condition::RoundMultipleOf(3), Condition::Chance(0.18)]), Chaos),
            play(all([opp_last(Cooperation), Condition::Chance(0.65)]), Betrayal),
            play(all([opp_last(Pollution), Condition::Chance(0.60)]), Doubt),
            play(
                all([
                    any([Condition::MarginAtMost(-1), Condition::RoundAtLeast(2)]),
                    Condition::Chance(0.12),
                ]),
                Recon,
            ),
            Rule::random(
                all([
                    Condition::HoldsAny(vec![Betrayal, Pollution]),
                    Condition::Chance(0.55),
                ]),
                [Betrayal, Pollution],
            ),
            Rule::Mirror {
                when: all([
                    Condition::FirstRound.negate(),
                    Condition::RoundMultipleOf(2).negate(),
                    Condition::Chance(0.5),
                ]),
            },
            Rule::random(Condition::Chance(0.10), []),
        ])
        .with_fallback([Pollution, Betrayal, Interrupt, Doubt, Cooperation, Chaos, Recon])
}

/// The tactician's opponent model: unseen ratios without Recon, boosted by
/// recent patterns and life totals.
pub fn tactician_model() -> ModelSpec {
    ModelSpec::default()
        .excluding([Recon])
        .with_boost(Boost::new(all([not_first(), opp_cooperated_twice()]), Cooperation, 1.7))
        .with_boost(Boost::new(all([not_first(), opp_last(Pollution)]), Pollution, 1.5))
        .with_boost(Boost::new(all([not_first(), opp_last(Doubt)]), Doubt, 1.2))
        .with_boost(Boost::new(
            all([not_first(), Condition::RoundMultipleOf(3)]),
            Chaos,
            1.12,
        ))
        .with_boost(Boost::new(Condition::OppLifeAtMost(3), Cooperation, 1.15))
        .with_boost(Boost::new(Condition::OppLifeAtMost(3), Pollution, 1.08))
        .with_boost(Boost::new(Condition::SelfLifeAtMost(3), Doubt, 1.10))
        .with_boost(Boost::new(Condition::SelfLifeAtMost(3), Chaos, 1.08))
        .with_boost(Boost::new(Condition::Always, Interrupt, 1.0).with_per_ratio(Pollution, 0.4))
}

/// The tactician's noisy EV scorer over its boosted model.
pub fn tactician_scorer() -> EvScorer {
    EvScorer::default()
        .with_opponent(tactician_model())
        .with_survival_penalty(3.5, 3.5)
        .with_reroll_bonus(2.0, 2)
        .with_lethal_bonus(3.0, 1)
        .with_guard(BetrayalGuard {
            doubt_at_least: 0.30,
            self_life_margin: Some(1),
        })
        .with_noise(Noise {
            probability: 0.07,
            margin: None,
        })
}

pub fn tactician() -> AgentSpec {
    AgentSpec::new("tactician")
        .with_model(tactician_model())
        .with_rules([
            play(
                all([not_first(), Condition::OppLastIn(vec![Pollution, Betrayal])]),
                Interrupt,
            ),
            play(all([not_first(), opp_last(Pollution)]), Doubt),
            play(all([opp_in_reach(0), model_below(Doubt, 0.30)]), Betrayal),
            play(all([in_danger(), model_at_least(Betrayal, 0.28)]), Doubt),
            play(
                all([
                    any([all([not_first(), opp_cooperated_twice()]), opp_in_reach(1)]),
                    model_below(Doubt, 0.33),
                ]),
                Betrayal,
            ),
            play(
                any([
                    model_at_least(Cooperation, 0.33),
                    all([not_first(), opp_last(Chaos)]),
                ]),
                Pollution,
            ),
            play(
                any([
                    Condition::HandQualityAtMost(2),
                    all([Condition::RoundMultipleOf(3), Condition::HandQualityAtMost(3)]),
                ]),
                Chaos,
            ),
            Rule::Score(tactician_scorer()),
        ])
        .with_fallback([Doubt, Interrupt, Betrayal, Cooperation, Pollution, Chaos])
}

pub fn aesthete() -> AgentSpec {
    let order = [Cooperation, Recon, Doubt, Chaos, Pollution, Interrupt, Betrayal];
    AgentSpec::new("aesthete")
        .with_rule(Rule::prefer(Condition::Always, order))
        .with_fallback(order)
}

/// Built-in persona by name.
pub fn by_name(name: &str) -> Option<AgentSpec> {
    let spec = match name {
        "steady" => steady(),
        "raider" => raider(),
        "berserker" => berserker(),
        "reader" => reader(),
        "calculator" => calculator(),
        "strategist" => strategist(),
        "rusher" => rusher(),
        "guardian" => guardian(),
        "gambler" => gambler(),
        "tactician" => tactician(),
        "aesthete" => aesthete(),
        _ => return None,
    };
    Some(spec)
}

// =============================================================================
// Roster
// =============================================================================

/// Named agent specs.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    specs: FxHashMap<String, AgentSpec>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roster of every built-in persona.
    pub fn standard() -> Self {
        let mut roster = Self::new();
        for spec in PERSONAS.iter().filter_map(|name| by_name(name)) {
            roster.insert(spec);
        }
        roster
    }

    /// Add or replace a spec under its own name.
    pub fn insert(&mut self, spec: AgentSpec) -> Option<AgentSpec> {
        self.specs.insert(spec.name.clone(), spec)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AgentSpec> {
        self.specs.get(name)
    }

    /// The named spec, or a default agent under that name.
    #[must_use]
    pub fn spec_or_default(&self, name: &str) -> AgentSpec {
        self.get(name).cloned().unwrap_or_else(|| default(name))
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.specs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_persona_resolves() {
        for name in PERSONAS {
            let spec = by_name(name).unwrap();
            assert_eq!(spec.name, name);
            assert!(!spec.fallback.is_empty());
        }
        assert!(by_name("nobody").is_none());
    }

    #[test]
    fn test_roster() {
        let mut roster = Roster::standard();
        assert_eq!(roster.len(), PERSONAS.len());
        assert_eq!(roster.names()[0], "aesthete");
        assert_eq!(roster.get("raider").map(|s| s.rules.len()), Some(raider().rules.len()));

        let stranger = roster.spec_or_default("stranger");
        assert_eq!(stranger.name, "stranger");
        assert!(stranger.rules.is_empty());

        assert!(roster.insert(default("raider")).is_some());
        assert!(roster.get("raider").unwrap().rules.is_empty());
    }

    #[test]
    fn test_presets_serialize() {
        for name in PERSONAS {
            let spec = by_name(name).unwrap();
            let json = serde_json::to_string(&spec).unwrap();
            let back: AgentSpec = serde_json::from_str(&json).unwrap();
            assert_eq!(spec, back);
        }
    }
}
