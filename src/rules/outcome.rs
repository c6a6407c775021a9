//! Round outcomes, match status and verdicts.

use serde::{Deserialize, Serialize};

use super::disaster::Disaster;
use crate::cards::CardType;
use crate::core::{Side, SideMap};

/// Result of a finished match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Winner(Side),
    Draw,
}

impl Verdict {
    /// Decide a finished match.
    ///
    /// Elimination decides first: both sides out is a draw, one side out
    /// loses. Otherwise the higher life wins and equal life is a draw.
    #[must_use]
    pub fn decide(lost: SideMap<bool>, life: SideMap<i32>) -> Self {
        match (lost[Side::A], lost[Side::B]) {
            (true, true) => Verdict::Draw,
            (true, false) => Verdict::Winner(Side::B),
            (false, true) => Verdict::Winner(Side::A),
            (false, false) => match life[Side::A].cmp(&life[Side::B]) {
                std::cmp::Ordering::Greater => Verdict::Winner(Side::A),
                std::cmp::Ordering::Less => Verdict::Winner(Side::B),
                std::cmp::Ordering::Equal => Verdict::Draw,
            },
        }
    }

    #[must_use]
    pub fn is_winner(&self, side: Side) -> bool {
        matches!(self, Verdict::Winner(s) if *s == side)
    }
}

/// Whether the match continues.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStatus {
    #[default]
    InProgress,
    Finished(Verdict),
}

impl MatchStatus {
    #[must_use]
    pub fn is_over(&self) -> bool {
        matches!(self, MatchStatus::Finished(_))
    }

    #[must_use]
    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            MatchStatus::Finished(v) => Some(*v),
            MatchStatus::InProgress => None,
        }
    }
}

/// A card submitted for resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Submission {
    /// Position in the submitting side's hand.
    Index(usize),
    /// First card of this type in the submitting side's hand.
    Card(CardType),
}

impl From<usize> for Submission {
    fn from(index: usize) -> Self {
        Submission::Index(index)
    }
}

impl From<CardType> for Submission {
    fn from(card: CardType) -> Self {
        Submission::Card(card)
    }
}

/// What happened to one side during a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideReport {
    /// Card the side submitted.
    pub submitted: CardType,
    /// Card that actually resolved (differs under a Gale swap).
    pub resolved: CardType,
    pub swapped: bool,
    /// Life change from the payoff table, before clamping.
    pub payoff: i32,
    /// Upkeep and burst loss.
    pub attrition: i32,
    pub life_before: i32,
    pub life_after: i32,
    pub hand_reset: bool,
    /// The side was shown the opponent's hand.
    pub saw_opponent: bool,
}

/// Full record of one resolved round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub round: u32,
    pub sides: SideMap<SideReport>,
    /// Disaster active while the round resolved.
    pub disaster: Disaster,
    /// Lightning struck this round.
    pub burst: bool,
    /// Disaster that took over after the round.
    pub disaster_entered: Option<Disaster>,
    pub status: MatchStatus,
}

impl RoundOutcome {
    #[must_use]
    pub fn side(&self, side: Side) -> &SideReport {
        &self.sides[side]
    }

    /// Resolved cards as (A, B).
    #[must_use]
    pub fn resolved_pair(&self) -> (CardType, CardType) {
        (self.sides[Side::A].resolved, self.sides[Side::B].resolved)
    }
}
