//! Match state.
//!
//! `MatchState` owns everything about one match: lives and elimination
//! flags, both hands, the shared supply, the round counter, the disaster
//! schedule, what each side remembers, reveal snapshots, the round log and
//! the RNG streams. Round resolution lives in `rules::engine`; this module
//! covers construction and read-only views.
//!
//! ## RNG streams
//!
//! Three independent streams are derived from the match seed:
//! - `deck`: initial shuffle and every reshuffle of the discard pile
//! - `disaster`: the disaster order
//! - `events`: Gale swaps and Lightning strikes
//!
//! ## Cloning
//!
//! The deck and the round log are persistent vectors, so cloning a state to
//! explore a different continuation is cheap.

use im::Vector;

use super::config::{DeckComposition, MatchConfig};
use super::error::ConfigError;
use super::rng::GameRng;
use super::side::{Side, SideMap};
use crate::belief::{Belief, History, RoundContext, UnseenSet};
use crate::cards::{CardType, Hand};
use crate::rules::{Disaster, DisasterSchedule, MatchStatus, PayoffTable, RoundOutcome, Verdict};
use crate::zones::Supply;

/// Complete state of one match.
#[derive(Clone, Debug)]
pub struct MatchState {
    pub(crate) config: MatchConfig,
    pub(crate) payoff: PayoffTable,
    pub(crate) seed: u64,

    /// Round about to be resolved, starting at 1.
    pub(crate) round: u32,
    pub(crate) life: SideMap<i32>,
    pub(crate) lost: SideMap<bool>,
    pub(crate) status: MatchStatus,

    pub(crate) hands: SideMap<Hand>,
    pub(crate) supply: Supply,
    pub(crate) card_total: usize,

    pub(crate) disasters: DisasterSchedule,
    pub(crate) history: SideMap<History>,
    /// Opponent hand shown to each side after the last round.
    pub(crate) revealed: SideMap<Option<Hand>>,
    pub(crate) log: Vector<RoundOutcome>,

    pub(crate) deck_rng: GameRng,
    pub(crate) event_rng: GameRng,
}

impl MatchState {
    /// Start a match: shuffle the deck, deal both hands, roll the disaster
    /// order.
    pub fn new(config: &MatchConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_payoff(config, PayoffTable::standard(), seed)
    }

    /// Start a match with a custom payoff table.
    pub fn with_payoff(
        config: &MatchConfig,
        payoff: PayoffTable,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let root = GameRng::new(seed);
        let mut deck_rng = root.for_context("deck");
        let supply = Supply::new(&config.deck, &mut deck_rng);
        Ok(Self::deal(config.clone(), payoff, seed, supply, deck_rng))
    }

    /// Start a match with the deck in a fixed order (top first). The deck
    /// composition in `config` is replaced by the stacked cards.
    pub fn with_stacked_deck(
        config: &MatchConfig,
        deck: impl IntoIterator<Item = CardType>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let supply = Supply::stacked(deck);
        let config = config
            .clone()
            .with_deck(DeckComposition::from_cards(supply.cards()));
        config.validate()?;

        let deck_rng = GameRng::new(seed).for_context("deck");
        Ok(Self::deal(config, PayoffTable::standard(), seed, supply, deck_rng))
    }

    fn deal(
        config: MatchConfig,
        payoff: PayoffTable,
        seed: u64,
        mut supply: Supply,
        mut deck_rng: GameRng,
    ) -> Self {
        let root = GameRng::new(seed);
        let mut disaster_rng = root.for_context("disaster");
        let disasters = if config.disaster_span == 0 || config.disaster_pool.is_empty() {
            DisasterSchedule::peaceful()
        } else {
            DisasterSchedule::new(&config.disaster_pool, config.disaster_span, &mut disaster_rng)
        };

        let card_total = supply.len();
        let mut hands: SideMap<Hand> = SideMap::default();
        for side in Side::BOTH {
            supply.replenish(&mut hands[side], config.hand_size, &mut deck_rng);
        }

        tracing::debug!(
            target: "dilemma_duel::engine",
            seed,
            preset = ?config.preset,
            life = config.start_life,
            rounds = config.max_rounds,
            disasters = ?disasters.order(),
            "match started"
        );

        Self {
            life: SideMap::with_value(config.start_life),
            config,
            payoff,
            seed,
            round: 1,
            lost: SideMap::with_value(false),
            status: MatchStatus::InProgress,
            hands,
            supply,
            card_total,
            disasters,
            history: SideMap::default(),
            revealed: SideMap::default(),
            log: Vector::new(),
            deck_rng,
            event_rng: root.for_context("events"),
        }
    }

    // === Match Progress ===

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn payoff(&self) -> &PayoffTable {
        &self.payoff
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Round about to be resolved. Exceeds `max_rounds` once the cap ends
    /// the match.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Rounds resolved so far.
    #[must_use]
    pub fn rounds_played(&self) -> u32 {
        self.round - 1
    }

    #[must_use]
    pub fn status(&self) -> MatchStatus {
        self.status
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.status.is_over()
    }

    #[must_use]
    pub fn verdict(&self) -> Option<Verdict> {
        self.status.verdict()
    }

    /// Every resolved round, oldest first.
    #[must_use]
    pub fn log(&self) -> &Vector<RoundOutcome> {
        &self.log
    }

    // === Sides ===

    #[must_use]
    pub fn life(&self, side: Side) -> i32 {
        self.life[side]
    }

    #[must_use]
    pub fn lives(&self) -> SideMap<i32> {
        self.life
    }

    #[must_use]
    pub fn has_lost(&self, side: Side) -> bool {
        self.lost[side]
    }

    #[must_use]
    pub fn hand(&self, side: Side) -> &Hand {
        &self.hands[side]
    }

    /// Opponent hand shown to `side` after the last round.
    #[must_use]
    pub fn revealed(&self, side: Side) -> Option<&Hand> {
        self.revealed[side].as_ref()
    }

    #[must_use]
    pub fn history(&self, side: Side) -> History {
        self.history[side]
    }

    // === Cards ===

    #[must_use]
    pub fn deck_len(&self) -> usize {
        self.supply.deck_len()
    }

    #[must_use]
    pub fn discard_len(&self) -> usize {
        self.supply.discard_len()
    }

    /// Number of cards the match was dealt with.
    #[must_use]
    pub fn card_total(&self) -> usize {
        self.card_total
    }

    /// Cards currently in deck, discard and both hands.
    #[must_use]
    pub fn cards_accounted(&self) -> usize {
        self.supply.len() + self.hands[Side::A].len() + self.hands[Side::B].len()
    }

    // === Disasters ===

    #[must_use]
    pub fn disaster(&self) -> Disaster {
        self.disasters.active()
    }

    #[must_use]
    pub fn disaster_schedule(&self) -> &DisasterSchedule {
        &self.disasters
    }

    /// Refill limit under the active disaster.
    #[must_use]
    pub fn hand_limit(&self) -> usize {
        self.disasters.active().hand_limit(self.config.hand_size)
    }

    // === Beliefs ===

    #[must_use]
    pub fn context(&self, side: Side) -> RoundContext {
        RoundContext::new(
            self.round,
            self.life[side],
            self.life[side.opponent()],
            self.history[side],
        )
    }

    /// Deck plus the opponent's hand, by type.
    #[must_use]
    pub fn unseen(&self, side: Side) -> UnseenSet {
        let mut counts = [0; CardType::COUNT];
        self.supply.tally_deck_into(&mut counts);
        self.hands[side.opponent()].tally_into(&mut counts);
        UnseenSet::from_counts(counts)
    }

    /// Snapshot of what `side` knows right now.
    #[must_use]
    pub fn belief(&self, side: Side) -> Belief {
        Belief {
            hand: self.hands[side].clone(),
            context: self.context(side),
            unseen: self.unseen(side),
            revealed: self.revealed[side].clone(),
            disaster: self.disasters.active(),
            disaster_change_in: self.disasters.rounds_until_change(),
            hand_limit: self.hand_limit(),
            payoff: self.payoff,
        }
    }
}
