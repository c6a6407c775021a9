//! Agent decision engine.
//!
//! ## Overview
//!
//! An agent turns a `Belief` into a card. The general `Agent` is built from
//! composable data:
//!
//! - **Conditions**: predicates over the belief (`Condition`)
//! - **Rules**: ordered chain, first match wins (`Rule`)
//! - **Scorer**: expected-value ranking with a separate noise step
//!   (`EvScorer`)
//! - **Fallback**: priority order used when no rule matches
//! - **Draft selector**: two-card choice when hands are drafted
//!
//! All randomness comes from the agent's own `GameRng`, so an agent seeded
//! the same way replays the same decisions.
//!
//! ## Usage
//!
//! ```rust
//! use dilemma_duel::agent::{presets, Agent, Strategy};
//! use dilemma_duel::core::{MatchState, Preset, Side};
//!
//! let state = MatchState::new(&Preset::Quick.config(), 7).unwrap();
//! let mut agent = Agent::from_spec(presets::steady(), 7);
//!
//! let belief = state.belief(Side::A);
//! let card = agent.choose(&belief).unwrap();
//! assert!(state.hand(Side::A).has(card));
//! ```

pub mod condition;
pub mod draft;
pub mod presets;
pub mod reference;
pub mod rule;
pub mod scorer;
pub mod strategy;

pub use condition::{Condition, ConditionContext, ConditionEvaluator};
pub use draft::DraftSelector;
pub use presets::{Roster, PERSONAS};
pub use reference::{Calculator, Raider, Steady, Tactician};
pub use rule::{Rule, RuleOutcome};
pub use scorer::{
    BetrayalGuard, Boost, BoostTarget, Candidate, EvScorer, ModelSpec, Noise, OpponentModel,
};
pub use strategy::{Agent, AgentSpec, Decision, DecisionSource, Strategy};
