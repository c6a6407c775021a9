//! Match summaries.

use serde::{Deserialize, Serialize};

use crate::cards::CardType;
use crate::core::{MatchState, Side, SideMap};
use crate::rules::{Disaster, Verdict};

/// Summary of a played match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    pub seed: u64,
    /// `None` while the match is still running.
    pub verdict: Option<Verdict>,
    pub rounds: u32,
    pub lives: SideMap<i32>,
    /// Submitted cards per round as (A, B).
    pub submissions: Vec<(CardType, CardType)>,
    /// Disaster active in each round.
    pub disasters: Vec<Disaster>,
}

impl MatchReport {
    #[must_use]
    pub fn from_state(state: &MatchState) -> Self {
        let log = state.log();
        Self {
            seed: state.seed(),
            verdict: state.verdict(),
            rounds: state.rounds_played(),
            lives: state.lives(),
            submissions: log
                .iter()
                .map(|r| (r.sides[Side::A].submitted, r.sides[Side::B].submitted))
                .collect(),
            disasters: log.iter().map(|r| r.disaster).collect(),
        }
    }

    /// Distinct disasters in the order they appeared, Peace excluded.
    #[must_use]
    pub fn disaster_sequence(&self) -> Vec<Disaster> {
        let mut sequence = Vec::new();
        for &disaster in &self.disasters {
            if disaster != Disaster::Peace && sequence.last() != Some(&disaster) {
                sequence.push(disaster);
            }
        }
        sequence
    }

    #[must_use]
    pub fn winner(&self) -> Option<Side> {
        match self.verdict? {
            Verdict::Winner(side) => Some(side),
            Verdict::Draw => None,
        }
    }
}
