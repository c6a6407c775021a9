//! Match driver.
//!
//! `MatchDriver` owns one `MatchState` and two seats. Agent seats decide on
//! their own; external seats (a human, a remote client) submit through
//! `submit`, and the driver reports which side it is waiting for instead of
//! blocking.
//!
//! ## Round flow
//!
//! 1. Both agent seats choose from belief snapshots taken before anything
//!    in the round changes.
//! 2. External seats are asked for in order, A before B.
//! 3. Once both submissions are in, the round resolves. Draft picks are
//!    routed to the seat that owns the hand.
//!
//! ## Seeding
//!
//! Agents built by the driver draw from named streams of the match seed
//! (`agent-a`, `agent-b`), so a seed reproduces the whole match.

mod report;

pub use report::MatchReport;

use std::fmt;

use tracing::{debug, info};

use crate::agent::{Agent, AgentSpec, DraftSelector, Strategy};
use crate::belief::Belief;
use crate::cards::CardType;
use crate::core::{
    ConfigError, DriverError, GameRng, MatchConfig, MatchState, Side, SideMap, SubmissionError,
};
use crate::rules::{Drafter, RoundOutcome, Submission};
use crate::zones::DraftPick;

/// Who plays a side.
pub enum Seat {
    Agent(Box<dyn Strategy>),
    /// Submissions arrive through `MatchDriver::submit`.
    External,
}

impl Seat {
    pub fn agent(strategy: impl Strategy + 'static) -> Self {
        Seat::Agent(Box::new(strategy))
    }

    #[must_use]
    pub fn is_external(&self) -> bool {
        matches!(self, Seat::External)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Seat::Agent(strategy) => strategy.name(),
            Seat::External => "external",
        }
    }
}

impl fmt::Debug for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seat::Agent(strategy) => f.debug_tuple("Agent").field(&strategy.name()).finish(),
            Seat::External => f.write_str("External"),
        }
    }
}

/// Where the driver stands after a call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Progress {
    /// This external side still has to submit.
    Awaiting(Side),
    Resolved(RoundOutcome),
}

/// Routes draft picks to the seat that owns the hand.
struct SeatDrafter<'a> {
    seats: &'a mut SideMap<Seat>,
    selector: &'a DraftSelector,
    rng: &'a mut GameRng,
}

impl Drafter for SeatDrafter<'_> {
    fn draft(&mut self, side: Side, first: CardType, second: CardType, belief: &Belief) -> DraftPick {
        match &mut self.seats[side] {
            Seat::Agent(strategy) => strategy.choose_draft(first, second, belief),
            Seat::External => self.selector.choose(first, second, belief, self.rng),
        }
    }
}

/// Runs one match between two seats.
#[derive(Debug)]
pub struct MatchDriver {
    state: MatchState,
    seats: SideMap<Seat>,
    pending: SideMap<Option<Submission>>,
    /// Drafts on behalf of external seats.
    selector: DraftSelector,
    draft_rng: GameRng,
}

impl MatchDriver {
    pub fn new(state: MatchState, a: Seat, b: Seat) -> Self {
        let draft_rng = GameRng::new(state.seed()).for_context("external-draft");
        Self {
            state,
            seats: SideMap::new(a, b),
            pending: SideMap::default(),
            selector: DraftSelector::default(),
            draft_rng,
        }
    }

    /// Start a match between two agents seeded from the match seed.
    pub fn between(
        config: &MatchConfig,
        seed: u64,
        a: AgentSpec,
        b: AgentSpec,
    ) -> Result<Self, ConfigError> {
        let state = MatchState::new(config, seed)?;
        let root = GameRng::new(seed);
        let a = Agent::with_rng(a, root.for_context("agent-a"));
        let b = Agent::with_rng(b, root.for_context("agent-b"));
        Ok(Self::new(state, Seat::agent(a), Seat::agent(b)))
    }

    #[must_use]
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    #[must_use]
    pub fn seat(&self, side: Side) -> &Seat {
        &self.seats[side]
    }

    /// Submission already queued for `side`.
    #[must_use]
    pub fn pending(&self, side: Side) -> Option<Submission> {
        self.pending[side]
    }

    /// First external side without a queued submission.
    #[must_use]
    pub fn awaiting(&self) -> Option<Side> {
        if self.state.is_over() {
            return None;
        }
        Side::BOTH
            .into_iter()
            .find(|&side| self.seats[side].is_external() && self.pending[side].is_none())
    }

    /// Queue a submission for `side`. An invalid submission is rejected and
    /// clears whatever was queued for that side.
    pub fn submit(
        &mut self,
        side: Side,
        submission: impl Into<Submission>,
    ) -> Result<Progress, DriverError> {
        let submission = submission.into();
        if let Err(err) = self.state.check_submission(side, submission) {
            self.pending[side] = None;
            debug!(target: "dilemma_duel::driver", %side, ?submission, %err, "submission rejected");
            return Err(err.into());
        }
        self.pending[side] = Some(submission);
        self.step()
    }

    /// Fill agent choices and resolve the round if both sides are in.
    pub fn step(&mut self) -> Result<Progress, DriverError> {
        if self.state.is_over() {
            return Err(SubmissionError::MatchOver.into());
        }

        let beliefs = SideMap::from_fn(|side| self.state.belief(side));
        for side in Side::BOTH {
            if self.pending[side].is_some() {
                continue;
            }
            if let Seat::Agent(strategy) = &mut self.seats[side] {
                let card = strategy
                    .choose(&beliefs[side])
                    .ok_or(DriverError::EmptyHand(side))?;
                self.pending[side] = Some(Submission::Card(card));
            }
        }

        // agent seats are filled, so a gap is an external seat
        let (a, b) = match (self.pending[Side::A], self.pending[Side::B]) {
            (Some(a), Some(b)) => (a, b),
            (None, _) => return Ok(Progress::Awaiting(Side::A)),
            (_, None) => return Ok(Progress::Awaiting(Side::B)),
        };
        self.pending = SideMap::default();

        let mut drafter = SeatDrafter {
            seats: &mut self.seats,
            selector: &self.selector,
            rng: &mut self.draft_rng,
        };
        let outcome = self.state.resolve_round_with(a, b, &mut drafter)?;
        Ok(Progress::Resolved(outcome))
    }

    /// Play until the match ends. Fails if a seat is external.
    pub fn play_to_end(&mut self) -> Result<MatchReport, DriverError> {
        while !self.state.is_over() {
            if let Progress::Awaiting(side) = self.step()? {
                return Err(DriverError::AwaitingExternal(side));
            }
        }

        let report = self.report();
        info!(
            target: "dilemma_duel::driver",
            a = self.seats[Side::A].name(),
            b = self.seats[Side::B].name(),
            verdict = ?report.verdict,
            rounds = report.rounds,
            "match finished"
        );
        Ok(report)
    }

    /// Summary of the match so far.
    #[must_use]
    pub fn report(&self) -> MatchReport {
        MatchReport::from_state(&self.state)
    }

    pub fn into_state(self) -> MatchState {
        self.state
    }
}
