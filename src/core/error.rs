//! Error types.
//!
//! Only caller mistakes are errors: a bad configuration, or a submission the
//! engine cannot resolve. Deck exhaustion, double elimination and running
//! out of disasters are ordinary game states.

use thiserror::Error;

use super::side::Side;
use crate::cards::CardType;
use crate::rules::Disaster;

/// Rejected match configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("starting life must be positive")]
    ZeroLife,

    #[error("hand size must be positive")]
    ZeroHandSize,

    #[error("round cap must be positive")]
    ZeroRounds,

    #[error("deck holds {available} cards but {needed} are needed to deal both hands")]
    DeckTooSmall { needed: u32, available: u32 },

    #[error("disaster pool lists {0} more than once")]
    DuplicateDisaster(Disaster),

    #[error("Peace is the absence of a disaster and cannot be pooled")]
    PeaceInPool,
}

/// Rejected round submission. The match state is left exactly as it was.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("the match is already over")]
    MatchOver,

    #[error("{side} submitted hand index {index} but holds {hand_size} cards")]
    IndexOutOfRange {
        side: Side,
        index: usize,
        hand_size: usize,
    },

    #[error("{side} does not hold {card}")]
    NotInHand { side: Side, card: CardType },
}

/// Why a driven match cannot advance.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DriverError {
    #[error("{0} is waiting for an external submission")]
    AwaitingExternal(Side),

    #[error("{0} has no card to submit")]
    EmptyHand(Side),

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// Rejected custom payoff table.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PayoffError {
    #[error("no payoff entry for {actor} against {opponent}")]
    Missing { actor: CardType, opponent: CardType },

    #[error("payoff entry for {actor} against {opponent} given twice")]
    Duplicate { actor: CardType, opponent: CardType },
}
