//! The 7×7 payoff table.
//!
//! Every ordered pair of submissions maps to an `Effect`, read from the
//! actor's point of view: the actor is the side whose card indexes the row,
//! the opponent's card indexes the column. Deltas may scale with the round
//! counter `R`.
//!
//! ## Validation
//!
//! `PayoffTable::standard()` is built from an exhaustive match, so a missing
//! pair does not compile. Custom tables go through `from_entries`, which
//! rejects missing and duplicated pairs before a match can start.

use serde::{Deserialize, Serialize};

use crate::cards::CardType;
use crate::core::PayoffError;

/// A life change, possibly scaled by the round counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Delta {
    Flat(i32),
    /// `per_round * R + offset`
    Scaled { per_round: i32, offset: i32 },
}

impl Delta {
    pub const ZERO: Delta = Delta::Flat(0);

    /// `-R`
    pub const MINUS_R: Delta = Delta::Scaled {
        per_round: -1,
        offset: 0,
    };

    /// Value at round `round`.
    #[must_use]
    pub const fn at(self, round: u32) -> i32 {
        match self {
            Delta::Flat(v) => v,
            Delta::Scaled { per_round, offset } => per_round * round as i32 + offset,
        }
    }
}

/// Outcome of one ordered pair of submissions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Effect {
    pub actor: Delta,
    pub opponent: Delta,
    /// Actor discards its hand and redraws.
    pub reset_actor: bool,
    /// Opponent discards its hand and redraws.
    pub reset_opponent: bool,
    /// Actor sees the opponent's hand after the round.
    pub reveal_actor: bool,
    /// Opponent sees the actor's hand after the round.
    pub reveal_opponent: bool,
}

impl Effect {
    #[must_use]
    pub const fn new(actor: Delta, opponent: Delta) -> Self {
        Self {
            actor,
            opponent,
            reset_actor: false,
            reset_opponent: false,
            reveal_actor: false,
            reveal_opponent: false,
        }
    }

    #[must_use]
    pub const fn flat(actor: i32, opponent: i32) -> Self {
        Self::new(Delta::Flat(actor), Delta::Flat(opponent))
    }

    #[must_use]
    pub const fn reset_actor(mut self) -> Self {
        self.reset_actor = true;
        self
    }

    #[must_use]
    pub const fn reset_opponent(mut self) -> Self {
        self.reset_opponent = true;
        self
    }

    #[must_use]
    pub const fn reveal_actor(mut self) -> Self {
        self.reveal_actor = true;
        self
    }

    #[must_use]
    pub const fn reveal_opponent(mut self) -> Self {
        self.reveal_opponent = true;
        self
    }

    /// The same effect seen from the other side.
    #[must_use]
    pub const fn swapped(self) -> Self {
        Self {
            actor: self.opponent,
            opponent: self.actor,
            reset_actor: self.reset_opponent,
            reset_opponent: self.reset_actor,
            reveal_actor: self.reveal_opponent,
            reveal_opponent: self.reveal_actor,
        }
    }
}

const fn scaled(per_round: i32, offset: i32) -> Delta {
    Delta::Scaled { per_round, offset }
}

/// The standard effect of `actor` played against `opponent`.
const fn standard_effect(actor: CardType, opponent: CardType) -> Effect {
    use CardType::*;

    let r_plus_1 = scaled(1, 1);
    let minus_r_plus_1 = scaled(-1, -1);
    let minus_2r = scaled(-2, 0);

    match (actor, opponent) {
        (Cooperation, Cooperation) => Effect::flat(1, 1),
        (Cooperation, Doubt) => Effect::flat(1, 0),
        (Cooperation, Betrayal) => Effect::new(Delta::MINUS_R, Delta::Flat(1)).reset_actor(),
        (Cooperation, Chaos) => Effect::flat(1, 0).reset_opponent(),
        (Cooperation, Pollution) => Effect::flat(-1, 1),
        (Cooperation, Interrupt) => Effect::flat(1, -1),
        (Cooperation, Recon) => Effect::flat(1, 0).reveal_opponent(),

        (Doubt, Cooperation) => Effect::flat(0, 1),
        (Doubt, Doubt) => Effect::flat(0, 0),
        (Doubt, Betrayal) => Effect::new(r_plus_1, minus_r_plus_1),
        (Doubt, Chaos) => Effect::flat(0, 0).reset_opponent(),
        (Doubt, Pollution) => Effect::flat(0, -1),
        (Doubt, Interrupt) => Effect::flat(-1, 1),
        (Doubt, Recon) => Effect::flat(0, 0).reveal_opponent(),

        (Betrayal, Cooperation) => Effect::new(Delta::Flat(1), Delta::MINUS_R).reset_opponent(),
        (Betrayal, Doubt) => Effect::new(minus_r_plus_1, r_plus_1),
        (Betrayal, Betrayal) => Effect::new(minus_2r, minus_2r),
        (Betrayal, Chaos) => Effect::new(Delta::Flat(1), Delta::MINUS_R).reset_opponent(),
        (Betrayal, Pollution) => Effect::new(Delta::Flat(1), Delta::MINUS_R),
        (Betrayal, Interrupt) => Effect::flat(-1, 1),
        (Betrayal, Recon) => Effect::new(Delta::Flat(1), Delta::MINUS_R).reveal_opponent(),

        (Chaos, Cooperation) => Effect::flat(0, 1).reset_actor(),
        (Chaos, Doubt) => Effect::flat(0, 0).reset_actor(),
        (Chaos, Betrayal) => Effect::new(Delta::MINUS_R, Delta::Flat(1)).reset_actor(),
        (Chaos, Chaos) => Effect::flat(0, 0).reset_actor().reset_opponent(),
        (Chaos, Pollution) => Effect::flat(0, 0).reset_actor(),
        (Chaos, Interrupt) => Effect::flat(0, -1).reset_actor(),
        (Chaos, Recon) => Effect::flat(0, 0).reset_actor().reveal_opponent(),

        (Pollution, Cooperation) => Effect::flat(1, -1),
        (Pollution, Doubt) => Effect::flat(-1, 0),
        (Pollution, Betrayal) => Effect::new(Delta::MINUS_R, Delta::Flat(1)),
        (Pollution, Chaos) => Effect::flat(0, 0).reset_opponent(),
        (Pollution, Pollution) => Effect::flat(-1, -1),
        (Pollution, Interrupt) => Effect::flat(-1, 1),
        (Pollution, Recon) => Effect::flat(0, -1).reveal_opponent(),

        (Interrupt, Cooperation) => Effect::flat(-1, 1),
        (Interrupt, Doubt) => Effect::flat(1, -1),
        (Interrupt, Betrayal) => Effect::flat(1, -1),
        (Interrupt, Chaos) => Effect::flat(-1, 0).reset_opponent(),
        (Interrupt, Pollution) => Effect::flat(1, -1),
        (Interrupt, Interrupt) => Effect::flat(0, 0),
        (Interrupt, Recon) => Effect::flat(1, 0).reveal_opponent(),

        (Recon, Cooperation) => Effect::flat(0, 1).reveal_actor(),
        (Recon, Doubt) => Effect::flat(0, 0).reveal_actor(),
        (Recon, Betrayal) => Effect::new(Delta::MINUS_R, Delta::Flat(1)).reveal_actor(),
        (Recon, Chaos) => Effect::flat(0, 0).reset_opponent().reveal_actor(),
        (Recon, Pollution) => Effect::flat(-1, 0).reveal_actor(),
        (Recon, Interrupt) => Effect::flat(0, 1).reveal_actor(),
        (Recon, Recon) => Effect::flat(0, 0).reveal_actor().reveal_opponent(),
    }
}

/// Dense payoff lookup indexed by card ordinal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayoffTable {
    entries: [[Effect; CardType::COUNT]; CardType::COUNT],
}

impl Default for PayoffTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl PayoffTable {
    /// The standard duel table.
    #[must_use]
    pub fn standard() -> Self {
        let mut entries = [[Effect::flat(0, 0); CardType::COUNT]; CardType::COUNT];
        for actor in CardType::ALL {
            for opponent in CardType::ALL {
                entries[actor.index()][opponent.index()] = standard_effect(actor, opponent);
            }
        }
        Self { entries }
    }

    /// Build a custom table. Every ordered pair must appear exactly once.
    pub fn from_entries(
        entries: impl IntoIterator<Item = ((CardType, CardType), Effect)>,
    ) -> Result<Self, PayoffError> {
        let mut slots: [[Option<Effect>; CardType::COUNT]; CardType::COUNT] =
            [[None; CardType::COUNT]; CardType::COUNT];

        for ((actor, opponent), effect) in entries {
            let slot = &mut slots[actor.index()][opponent.index()];
            if slot.is_some() {
                return Err(PayoffError::Duplicate { actor, opponent });
            }
            *slot = Some(effect);
        }

        let mut table = [[Effect::flat(0, 0); CardType::COUNT]; CardType::COUNT];
        for actor in CardType::ALL {
            for opponent in CardType::ALL {
                table[actor.index()][opponent.index()] = slots[actor.index()][opponent.index()]
                    .ok_or(PayoffError::Missing { actor, opponent })?;
            }
        }
        Ok(Self { entries: table })
    }

    /// Every entry as `((actor, opponent), effect)`, row by row.
    pub fn entries(&self) -> impl Iterator<Item = ((CardType, CardType), Effect)> + '_ {
        CardType::ALL.into_iter().flat_map(move |actor| {
            CardType::ALL
                .into_iter()
                .map(move |opponent| ((actor, opponent), self.effect(actor, opponent)))
        })
    }

    #[must_use]
    pub fn effect(&self, actor: CardType, opponent: CardType) -> Effect {
        self.entries[actor.index()][opponent.index()]
    }

    /// Actor's life change minus the opponent's at `round`.
    #[must_use]
    pub fn margin(&self, actor: CardType, opponent: CardType, round: u32) -> i32 {
        let effect = self.effect(actor, opponent);
        effect.actor.at(round) - effect.opponent.at(round)
    }

    /// Whether each entry agrees with its transposed entry seen from the
    /// other side.
    #[must_use]
    pub fn is_mirror_consistent(&self) -> bool {
        self.entries()
            .all(|((a, b), effect)| self.effect(b, a) == effect.swapped())
    }
}
