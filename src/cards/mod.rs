//! Card types and hands.
//!
//! Cards carry no identity beyond their type: the deck is a multiset of the
//! seven `CardType`s and a hand is an ordered list of them.

pub mod card_type;
pub mod hand;

pub use card_type::{CardType, TypeCounts, UnknownCardType};
pub use hand::Hand;
