//! What a side remembers about the rounds so far.

use serde::{Deserialize, Serialize};

use crate::cards::CardType;

/// Recent submissions seen by one side.
///
/// Cards are the ones that actually resolved, so a Gale substitute is what
/// the opponent remembers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct History {
    pub last_self: Option<CardType>,
    /// Opponent's cards, most recent first.
    pub opp_recent: [Option<CardType>; 3],
}

impl History {
    /// Record a resolved round.
    pub fn record(&mut self, own: CardType, opponent: CardType) {
        self.last_self = Some(own);
        self.opp_recent = [Some(opponent), self.opp_recent[0], self.opp_recent[1]];
    }
}

/// Round information a side decides on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundContext {
    /// Round about to be resolved, starting at 1.
    pub round: u32,
    pub self_life: i32,
    pub opp_life: i32,
    pub last_self: Option<CardType>,
    /// Opponent's last three cards, most recent first.
    pub opp_recent: [Option<CardType>; 3],
}

impl RoundContext {
    /// Context for the first round.
    #[must_use]
    pub fn opening(self_life: i32, opp_life: i32) -> Self {
        Self {
            round: 1,
            self_life,
            opp_life,
            last_self: None,
            opp_recent: [None; 3],
        }
    }

    /// Context at `round` with the given history.
    #[must_use]
    pub fn new(round: u32, self_life: i32, opp_life: i32, history: History) -> Self {
        Self {
            round,
            self_life,
            opp_life,
            last_self: history.last_self,
            opp_recent: history.opp_recent,
        }
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.round <= 1
    }

    #[must_use]
    pub fn last_opp(&self) -> Option<CardType> {
        self.opp_recent[0]
    }

    #[must_use]
    pub fn last2_opp(&self) -> Option<CardType> {
        self.opp_recent[1]
    }

    #[must_use]
    pub fn last3_opp(&self) -> Option<CardType> {
        self.opp_recent[2]
    }

    /// The round counter as a life amount, never below 1.
    #[must_use]
    pub fn scale(&self) -> i32 {
        self.round.max(1) as i32
    }

    /// A Betrayal landing this round could finish this side.
    #[must_use]
    pub fn lethal_danger(&self) -> bool {
        self.self_life <= self.scale()
    }

    /// Opponent life is within `scale + offset`.
    #[must_use]
    pub fn opp_in_reach(&self, offset: i32) -> bool {
        self.opp_life <= self.scale() + offset
    }

    /// Own life minus opponent life.
    #[must_use]
    pub fn life_margin(&self) -> i32 {
        self.self_life - self.opp_life
    }

    /// The opponent played the same card twice in a row.
    #[must_use]
    pub fn opp_repeated(&self) -> bool {
        matches!(self.opp_recent, [Some(a), Some(b), _] if a == b)
    }

    /// The opponent's last `n` cards (up to 3) were all `card`.
    #[must_use]
    pub fn opp_streak(&self, card: CardType, n: usize) -> bool {
        n <= 3 && self.opp_recent[..n].iter().all(|&c| c == Some(card))
    }

    /// `card` does not appear among the opponent's last three cards.
    #[must_use]
    pub fn opp_absent_in_last3(&self, card: CardType) -> bool {
        !self.opp_recent.contains(&Some(card))
    }

    /// The opponent's last card differs from the one before.
    #[must_use]
    pub fn opp_changed(&self) -> bool {
        matches!(self.opp_recent, [Some(a), Some(b), _] if a != b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CardType::*;

    fn with_recent(recent: [Option<CardType>; 3]) -> RoundContext {
        RoundContext {
            round: 4,
            self_life: 5,
            opp_life: 7,
            last_self: Some(Doubt),
            opp_recent: recent,
        }
    }

    #[test]
    fn test_history_shifts() {
        let mut history = History::default();
        history.record(Doubt, Cooperation);
        history.record(Chaos, Pollution);
        history.record(Recon, Betrayal);
        history.record(Doubt, Interrupt);

        assert_eq!(history.last_self, Some(Doubt));
        assert_eq!(history.opp_recent, [Some(Interrupt), Some(Betrayal), Some(Pollution)]);
    }

    #[test]
    fn test_opening_context() {
        let ctx = RoundContext::opening(10, 10);
        assert!(ctx.is_first());
        assert_eq!(ctx.last_opp(), None);
        assert!(!ctx.opp_repeated());
        assert!(!ctx.opp_changed());
        assert!(ctx.opp_absent_in_last3(Doubt));
    }

    #[test]
    fn test_patterns() {
        let ctx = with_recent([Some(Cooperation), Some(Cooperation), Some(Doubt)]);
        assert!(ctx.opp_repeated());
        assert!(ctx.opp_streak(Cooperation, 2));
        assert!(!ctx.opp_streak(Cooperation, 3));
        assert!(!ctx.opp_absent_in_last3(Doubt));
        assert!(ctx.opp_absent_in_last3(Betrayal));

        let ctx = with_recent([Some(Chaos), Some(Doubt), None]);
        assert!(ctx.opp_changed());
        assert!(!ctx.opp_repeated());
    }

    #[test]
    fn test_life_helpers() {
        let ctx = with_recent([None; 3]);
        assert_eq!(ctx.scale(), 4);
        assert!(!ctx.lethal_danger());
        assert!(ctx.opp_in_reach(3));
        assert!(!ctx.opp_in_reach(2));
        assert_eq!(ctx.life_margin(), -2);

        let round_zero = RoundContext { round: 0, ..ctx };
        assert_eq!(round_zero.scale(), 1);
    }
}
