//! Card locations outside the hands: the shared deck and discard pile.

pub mod supply;

pub use supply::{DraftOffer, DraftPick, Supply};
