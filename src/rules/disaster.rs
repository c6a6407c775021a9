//! Disasters: global modifiers that rotate through the match.
//!
//! ## Effects
//!
//! | Disaster  | Effect |
//! |-----------|--------|
//! | Peace     | none |
//! | Meteorite | on entering, both lives become `life * 2 / 3` (floor) |
//! | Heatwave  | end-of-round upkeep is 2 instead of 1 |
//! | Lightning | each round, 25% chance both sides lose 3 more life |
//! | Gale      | each round, 25% chance per side that its submission is swapped for a fresh draw |
//! | ColdWave  | hands refill to one card fewer than the hand size |
//!
//! ## Schedule
//!
//! The pool is shuffled once per match. The match opens in Peace; every
//! `span` resolved rounds the next disaster of the order takes over. Once
//! the order is used up the schedule stays in Peace.

use serde::{Deserialize, Serialize};

use crate::core::GameRng;

/// A global round modifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Disaster {
    #[default]
    Peace,
    Meteorite,
    Heatwave,
    Lightning,
    Gale,
    ColdWave,
}

/// Extra life loss rolled once per round.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Burst {
    pub chance: f64,
    pub amount: i32,
}

impl Disaster {
    /// Every real disaster, the default pool.
    pub const POOL: [Disaster; 5] = [
        Disaster::Meteorite,
        Disaster::Heatwave,
        Disaster::Lightning,
        Disaster::Gale,
        Disaster::ColdWave,
    ];

    /// Life after this disaster takes over.
    #[must_use]
    pub const fn on_enter(self, life: i32) -> i32 {
        match self {
            Disaster::Meteorite => life * 2 / 3,
            _ => life,
        }
    }

    /// Flat life loss applied to both sides at the end of every round.
    #[must_use]
    pub const fn upkeep(self) -> i32 {
        match self {
            Disaster::Heatwave => 2,
            _ => 1,
        }
    }

    #[must_use]
    pub const fn burst(self) -> Option<Burst> {
        match self {
            Disaster::Lightning => Some(Burst {
                chance: 0.25,
                amount: 3,
            }),
            _ => None,
        }
    }

    /// Per-side probability that a submission is swapped.
    #[must_use]
    pub const fn swap_chance(self) -> f64 {
        match self {
            Disaster::Gale => 0.25,
            _ => 0.0,
        }
    }

    /// Refill limit given the configured hand size.
    #[must_use]
    pub fn hand_limit(self, hand_size: usize) -> usize {
        match self {
            Disaster::ColdWave => hand_size.saturating_sub(1).max(1),
            _ => hand_size,
        }
    }
}

impl std::fmt::Display for Disaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Disaster::Peace => "Peace",
            Disaster::Meteorite => "Meteorite",
            Disaster::Heatwave => "Heatwave",
            Disaster::Lightning => "Lightning",
            Disaster::Gale => "Gale",
            Disaster::ColdWave => "ColdWave",
        };
        f.write_str(name)
    }
}

/// The match's disaster rotation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisasterSchedule {
    order: Vec<Disaster>,
    next: usize,
    active: Disaster,
    span: u32,
    elapsed: u32,
}

impl DisasterSchedule {
    /// Shuffle `pool` into a fresh schedule.
    pub fn new(pool: &[Disaster], span: u32, rng: &mut GameRng) -> Self {
        let mut order = pool.to_vec();
        rng.shuffle(&mut order);
        Self {
            order,
            next: 0,
            active: Disaster::Peace,
            span,
            elapsed: 0,
        }
    }

    /// A schedule that never leaves Peace.
    #[must_use]
    pub fn peaceful() -> Self {
        Self {
            order: Vec::new(),
            next: 0,
            active: Disaster::Peace,
            span: 0,
            elapsed: 0,
        }
    }

    #[must_use]
    pub fn active(&self) -> Disaster {
        self.active
    }

    /// The full shuffled order.
    #[must_use]
    pub fn order(&self) -> &[Disaster] {
        &self.order
    }

    /// Rounds left before the next change, `None` if no change is coming.
    #[must_use]
    pub fn rounds_until_change(&self) -> Option<u32> {
        if self.span == 0 {
            return None;
        }
        let pending = self.next < self.order.len();
        // Leaving the last disaster still counts as a change.
        if pending || self.active != Disaster::Peace {
            Some(self.span - self.elapsed)
        } else {
            None
        }
    }

    /// Count one resolved round. Returns the disaster that takes over, if
    /// the span just elapsed.
    pub fn advance_round(&mut self) -> Option<Disaster> {
        if self.span == 0 {
            return None;
        }
        self.elapsed += 1;
        if self.elapsed < self.span {
            return None;
        }
        self.elapsed = 0;

        let incoming = match self.order.get(self.next) {
            Some(&d) => {
                self.next += 1;
                d
            }
            None => Disaster::Peace,
        };
        if incoming == self.active {
            return None;
        }
        self.active = incoming;
        Some(incoming)
    }
}
