//! Deterministic random number generation with named streams.
//!
//! ## Key Features
//!
//! - **Deterministic**: same seed, same match
//! - **Context streams**: deck shuffles, disaster order, chance events and
//!   each agent draw from independent sequences, so adding a roll in one
//!   place never shifts the others
//! - **Forkable**: derive per-match seeds from a series seed
//! - **Serializable**: O(1) state capture and restore
//!
//! ```
//! use dilemma_duel::core::GameRng;
//!
//! let root = GameRng::new(42);
//! let mut deck = root.for_context("deck");
//! let mut events = root.for_context("events");
//!
//! // Same context from the same seed gives the same stream
//! let mut deck_again = GameRng::new(42).for_context("deck");
//! assert_eq!(deck.index(100), deck_again.index(100));
//! # let _ = events.chance(0.5);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Deterministic ChaCha8-backed RNG.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Seed this RNG was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Derive an independent RNG, advancing this one's fork counter.
    ///
    /// Successive forks differ; the n-th fork of a given seed is always the
    /// same.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self
            .seed
            .wrapping_add(self.fork_counter.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        Self::new(fork_seed)
    }

    /// Independent stream for a named purpose.
    ///
    /// Depends only on the seed and the name, never on how much of this RNG
    /// has been consumed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// True with the given probability, clamped to `[0, 1]`.
    ///
    /// Always consumes one draw, whatever the probability, so stream
    /// positions do not depend on the odds.
    pub fn chance(&mut self, probability: f64) -> bool {
        let roll = self.inner.gen::<f64>();
        !probability.is_nan() && roll < probability.clamp(0.0, 1.0)
    }

    /// Uniform index in `0..len`, `None` when `len` is 0.
    pub fn index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.inner.gen_range(0..len))
        }
    }

    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        self.index(slice.len()).map(|i| &slice[i])
    }

    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
            fork_counter: self.fork_counter,
        }
    }

    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
            fork_counter: state.fork_counter,
        }
    }
}

/// Serializable RNG checkpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
    pub fork_counter: u64,
}
