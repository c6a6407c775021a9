//! Core engine types: sides, RNG, configuration, errors and match state.

pub mod config;
pub mod error;
pub mod rng;
pub mod side;
pub mod state;

pub use config::{DeckComposition, MatchConfig, Preset, Replenish};
pub use error::{ConfigError, DriverError, PayoffError, SubmissionError};
pub use rng::{GameRng, GameRngState};
pub use side::{Side, SideMap};
pub use state::MatchState;
