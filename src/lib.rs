//! # dilemma-duel
//!
//! Round-resolution and agent decision engine for a two-sided card duel.
//! Each round both sides secretly pick one card from a small hand; a payoff
//! table turns the pair into life changes, and the match runs until a side
//! is eliminated or the round cap is hit.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: every random event draws from a named stream of
//!    the match seed. A seed and a list of submissions replay exactly.
//!
//! 2. **Snapshots, not shared state**: agents decide from a `Belief` built
//!    before the round mutates anything.
//!
//! 3. **Agents as data**: personas are `AgentSpec` values built from
//!    conditions, rules and an EV scorer, so they can be serialized,
//!    compared and tested.
//!
//! ## Modules
//!
//! - `core`: sides, RNG, configuration, errors, match state
//! - `cards`: card types and hands
//! - `zones`: deck and discard pile, draft offers
//! - `rules`: payoff table, disasters, round resolution, outcomes
//! - `belief`: what one side knows when it decides
//! - `agent`: conditions, rules, EV scoring, drafting, personas
//! - `driver`: runs a match between agent or external seats
//!
//! ## Example
//!
//! ```rust
//! use dilemma_duel::agent::presets;
//! use dilemma_duel::core::Preset;
//! use dilemma_duel::driver::MatchDriver;
//!
//! let config = Preset::Quick.config();
//! let mut driver =
//!     MatchDriver::between(&config, 42, presets::steady(), presets::raider()).unwrap();
//! let report = driver.play_to_end().unwrap();
//!
//! assert!(report.verdict.is_some());
//! assert!(report.rounds <= config.max_rounds);
//! ```

pub mod core;
pub mod cards;
pub mod zones;
pub mod rules;
pub mod belief;
pub mod agent;
pub mod driver;

// Re-export commonly used types
pub use crate::core::{
    ConfigError, DeckComposition, DriverError, GameRng, GameRngState, MatchConfig, MatchState,
    PayoffError, Preset, Replenish, Side, SideMap, SubmissionError,
};

pub use crate::cards::{CardType, Hand};

pub use crate::zones::{DraftPick, Supply};

pub use crate::rules::{
    Disaster, DisasterSchedule, Drafter, Effect, MatchStatus, PayoffTable, RoundOutcome,
    SideReport, Submission, Verdict,
};

pub use crate::belief::{Belief, RoundContext, UnseenSet};

pub use crate::agent::{
    Agent, AgentSpec, Condition, DraftSelector, EvScorer, Roster, Rule, RuleOutcome, Strategy,
};

pub use crate::driver::{MatchDriver, MatchReport, Progress, Seat};
