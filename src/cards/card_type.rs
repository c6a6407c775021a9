//! The seven card types of the duel.
//!
//! Every card in the shared deck carries exactly one `CardType`. Types are
//! ordered by a fixed ordinal so tables (payoff matrix, unseen counts) can be
//! dense arrays indexed by `CardType::index()`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A card type.
///
/// The absence of a card (no history yet) is `Option<CardType>::None`, never
/// a variant of this enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CardType {
    Cooperation,
    Doubt,
    Betrayal,
    Chaos,
    Pollution,
    Interrupt,
    Recon,
}

impl CardType {
    /// Number of card types.
    pub const COUNT: usize = 7;

    /// All card types in ordinal order.
    pub const ALL: [CardType; CardType::COUNT] = [
        CardType::Cooperation,
        CardType::Doubt,
        CardType::Betrayal,
        CardType::Chaos,
        CardType::Pollution,
        CardType::Interrupt,
        CardType::Recon,
    ];

    /// Dense ordinal in `0..COUNT`.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Inverse of `index`.
    #[must_use]
    pub fn from_index(index: usize) -> Option<CardType> {
        Self::ALL.get(index).copied()
    }

    /// Betrayal and Pollution: the cards that take life from the opponent.
    #[must_use]
    pub const fn is_attack(self) -> bool {
        matches!(self, CardType::Betrayal | CardType::Pollution)
    }

    /// Doubt and Interrupt: the cards that punish attacks.
    #[must_use]
    pub const fn is_guard(self) -> bool {
        matches!(self, CardType::Doubt | CardType::Interrupt)
    }

    /// How comfortable a card is to hold, used to grade hands and break
    /// draft ties. Higher is safer.
    #[must_use]
    pub const fn safety(self) -> i32 {
        match self {
            CardType::Doubt => 3,
            CardType::Cooperation => 2,
            CardType::Pollution | CardType::Interrupt => 1,
            CardType::Betrayal | CardType::Recon => 0,
            CardType::Chaos => -1,
        }
    }

    /// Short display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            CardType::Cooperation => "Cooperation",
            CardType::Doubt => "Doubt",
            CardType::Betrayal => "Betrayal",
            CardType::Chaos => "Chaos",
            CardType::Pollution => "Pollution",
            CardType::Interrupt => "Interrupt",
            CardType::Recon => "Recon",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognized card type name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown card type `{0}`")]
pub struct UnknownCardType(pub String);

impl FromStr for CardType {
    type Err = UnknownCardType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CardType::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCardType(s.to_string()))
    }
}

/// Per-type counters, indexed by ordinal.
pub type TypeCounts = [u32; CardType::COUNT];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for (i, t) in CardType::ALL.iter().enumerate() {
            assert_eq!(t.index(), i);
            assert_eq!(CardType::from_index(i), Some(*t));
        }
        assert_eq!(CardType::from_index(CardType::COUNT), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!("betrayal".parse::<CardType>(), Ok(CardType::Betrayal));
        assert_eq!("Recon".parse::<CardType>(), Ok(CardType::Recon));
        assert!("None".parse::<CardType>().is_err());
    }

    #[test]
    fn test_groups() {
        let attacks: Vec<_> = CardType::ALL.iter().filter(|t| t.is_attack()).collect();
        assert_eq!(attacks, vec![&CardType::Betrayal, &CardType::Pollution]);
        assert!(CardType::Doubt.is_guard());
        assert!(!CardType::Chaos.is_guard());
    }
}
