//! Match configuration.
//!
//! A `MatchConfig` fixes everything about a match except the seed: deck
//! composition, hand size, starting life, round cap, the disaster pool and
//! how hands are refilled. Three presets cover the usual match lengths.
//!
//! ```
//! use dilemma_duel::core::{MatchConfig, Preset};
//!
//! let config = Preset::Common.config().with_max_rounds(12);
//! assert_eq!(config.start_life, 20);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::cards::{CardType, TypeCounts};
use crate::rules::Disaster;

/// Named match lengths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Preset {
    #[default]
    Quick,
    Common,
    Extended,
}

impl Preset {
    /// Full configuration for this preset.
    #[must_use]
    pub fn config(self) -> MatchConfig {
        let (start_life, max_rounds, disaster_span) = match self {
            Preset::Quick => (10, 10, 3),
            Preset::Common => (20, 15, 3),
            Preset::Extended => (30, 20, 4),
        };
        MatchConfig {
            preset: self,
            deck: DeckComposition::default(),
            hand_size: 3,
            start_life,
            max_rounds,
            disaster_pool: Disaster::POOL.to_vec(),
            disaster_span,
            replenish: Replenish::Draw,
        }
    }
}

/// Number of cards of each type in the shared deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeckComposition {
    counts: TypeCounts,
}

impl Default for DeckComposition {
    fn default() -> Self {
        Self::empty()
            .with(CardType::Cooperation, 20)
            .with(CardType::Doubt, 20)
            .with(CardType::Betrayal, 3)
            .with(CardType::Chaos, 7)
            .with(CardType::Pollution, 10)
            .with(CardType::Interrupt, 6)
            .with(CardType::Recon, 6)
    }
}

impl DeckComposition {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            counts: [0; CardType::COUNT],
        }
    }

    /// Composition of an explicit list of cards.
    #[must_use]
    pub fn from_cards(cards: impl IntoIterator<Item = CardType>) -> Self {
        let mut counts = [0; CardType::COUNT];
        for card in cards {
            counts[card.index()] += 1;
        }
        Self { counts }
    }

    /// Set the count for one type.
    #[must_use]
    pub fn with(mut self, card: CardType, count: u32) -> Self {
        self.counts[card.index()] = count;
        self
    }

    #[must_use]
    pub const fn count(&self, card: CardType) -> u32 {
        self.counts[card.index()]
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Every card of the deck, grouped by type in ordinal order.
    pub fn cards(&self) -> impl Iterator<Item = CardType> + '_ {
        CardType::ALL
            .into_iter()
            .flat_map(move |t| std::iter::repeat(t).take(self.count(t) as usize))
    }
}

/// How hands are refilled after a round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Replenish {
    /// Draw from the top of the deck.
    #[default]
    Draw,
    /// Each missing card is picked from two offered candidates. Offers skip
    /// `excluded` while any other card remains.
    Draft { excluded: Option<CardType> },
}

impl Replenish {
    /// Draft mode with the usual exclusion of Chaos.
    #[must_use]
    pub const fn draft() -> Self {
        Replenish::Draft {
            excluded: Some(CardType::Chaos),
        }
    }
}

/// Full configuration of one match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Which preset this config started from.
    pub preset: Preset,

    pub deck: DeckComposition,

    /// Starting hand size, and the refill limit outside ColdWave.
    pub hand_size: usize,

    /// Starting life, also the life cap.
    pub start_life: i32,

    /// The match ends once this many rounds have been resolved.
    pub max_rounds: u32,

    /// Disasters shuffled into the match's disaster order.
    pub disaster_pool: Vec<Disaster>,

    /// Rounds between disaster changes (0 disables disasters).
    pub disaster_span: u32,

    pub replenish: Replenish,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Preset::default().config()
    }
}

impl MatchConfig {
    pub fn with_deck(mut self, deck: DeckComposition) -> Self {
        self.deck = deck;
        self
    }

    pub fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.hand_size = hand_size;
        self
    }

    pub fn with_start_life(mut self, life: i32) -> Self {
        self.start_life = life;
        self
    }

    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = rounds;
        self
    }

    pub fn with_disasters(mut self, pool: impl IntoIterator<Item = Disaster>, span: u32) -> Self {
        self.disaster_pool = pool.into_iter().collect();
        self.disaster_span = span;
        self
    }

    /// No disasters: Peace for the whole match.
    pub fn without_disasters(self) -> Self {
        self.with_disasters([], 0)
    }

    pub fn with_replenish(mut self, replenish: Replenish) -> Self {
        self.replenish = replenish;
        self
    }

    /// Check the configuration can start a match.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_life <= 0 {
            return Err(ConfigError::ZeroLife);
        }
        if self.hand_size == 0 {
            return Err(ConfigError::ZeroHandSize);
        }
        if self.max_rounds == 0 {
            return Err(ConfigError::ZeroRounds);
        }

        let needed = (self.hand_size * 2) as u32;
        let available = self.deck.total();
        if available < needed {
            return Err(ConfigError::DeckTooSmall { needed, available });
        }

        for (i, disaster) in self.disaster_pool.iter().enumerate() {
            if *disaster == Disaster::Peace {
                return Err(ConfigError::PeaceInPool);
            }
            if self.disaster_pool[..i].contains(disaster) {
                return Err(ConfigError::DuplicateDisaster(*disaster));
            }
        }

        Ok(())
    }
}
