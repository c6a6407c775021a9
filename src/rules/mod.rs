//! Game rules: payoff table, disasters and round resolution.

pub mod disaster;
pub mod engine;
pub mod outcome;
pub mod payoff;

pub use disaster::{Burst, Disaster, DisasterSchedule};
pub use engine::{Drafter, FirstCandidate};
pub use outcome::{MatchStatus, RoundOutcome, SideReport, Submission, Verdict};
pub use payoff::{Delta, Effect, PayoffTable};
