//! The two sides of a duel and per-side data storage.
//!
//! ## Side
//!
//! `Side::A` and `Side::B`. Payoff rows are always read from the acting
//! side's point of view, so most engine code works with a side and its
//! `opponent()`.
//!
//! ## SideMap
//!
//! Fixed two-slot storage indexed by `Side`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two seats in a duel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// Both sides, A first.
    pub const BOTH: [Side; 2] = [Side::A, Side::B];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }

    #[must_use]
    pub const fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::A => write!(f, "Side A"),
            Side::B => write!(f, "Side B"),
        }
    }
}

/// Per-side data with O(1) access.
///
/// ## Example
///
/// ```
/// use dilemma_duel::core::{Side, SideMap};
///
/// let mut life: SideMap<i32> = SideMap::with_value(10);
/// life[Side::B] -= 3;
/// assert_eq!(life[Side::A], 10);
/// assert_eq!(life[Side::B], 7);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMap<T> {
    data: [T; 2],
}

impl<T> SideMap<T> {
    /// Build from explicit values for A and B.
    pub const fn new(a: T, b: T) -> Self {
        Self { data: [a, b] }
    }

    /// Build with a factory called once per side.
    pub fn from_fn(mut factory: impl FnMut(Side) -> T) -> Self {
        let a = factory(Side::A);
        let b = factory(Side::B);
        Self { data: [a, b] }
    }

    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(value.clone(), value)
    }

    #[must_use]
    pub fn get(&self, side: Side) -> &T {
        &self.data[side.index()]
    }

    pub fn get_mut(&mut self, side: Side) -> &mut T {
        &mut self.data[side.index()]
    }

    /// Iterate over (Side, &T) pairs, A first.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::BOTH.into_iter().zip(self.data.iter())
    }

    /// Apply `f` to both entries.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> SideMap<U> {
        let [a, b] = self.data;
        SideMap::new(f(a), f(b))
    }

    /// Whether `pred` holds for either side.
    pub fn any(&self, mut pred: impl FnMut(&T) -> bool) -> bool {
        self.data.iter().any(|v| pred(v))
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &Self::Output {
        self.get(side)
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        self.get_mut(side)
    }
}
