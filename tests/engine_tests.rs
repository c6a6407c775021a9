//! Round resolution tests.
//!
//! Every scenario stacks the deck so the hands and every refill are known
//! in advance. Quick preset, start life 10, disasters off unless a test
//! turns one on.

use dilemma_duel::cards::CardType::{self, *};
use dilemma_duel::core::{MatchConfig, MatchState, Preset, Side, SubmissionError};
use dilemma_duel::rules::{Disaster, MatchStatus, PayoffTable, Verdict};

fn peaceful() -> MatchConfig {
    Preset::Quick.config().without_disasters()
}

fn stacked(config: &MatchConfig, deck: &[CardType]) -> MatchState {
    MatchState::with_stacked_deck(config, deck.iter().copied(), 1).unwrap()
}

/// Play Doubt against Doubt until `round` is next.
fn doubt_until(state: &mut MatchState, round: u32) {
    while state.round() < round {
        state.resolve_round(Doubt, Doubt).unwrap();
    }
}

// =============================================================================
// Payoff scenarios
// =============================================================================

#[test]
fn test_cooperation_against_cooperation() {
    let mut state = stacked(&peaceful(), &[Cooperation, Doubt, Doubt, Cooperation, Doubt, Doubt, Doubt, Doubt]);

    let outcome = state.resolve_round(Cooperation, Cooperation).unwrap();
    for side in Side::BOTH {
        let report = outcome.side(side);
        assert_eq!(report.payoff, 1);
        assert!(!report.hand_reset);
        assert!(!report.saw_opponent);
        // capped at 10 before upkeep
        assert_eq!(report.life_after, 9);
    }
    assert!(state.revealed(Side::A).is_none());
    assert!(state.revealed(Side::B).is_none());
}

#[test]
fn test_cooperation_against_betrayal_scales_with_round() {
    let mut state = stacked(
        &peaceful(),
        &[Cooperation, Doubt, Doubt, Betrayal, Doubt, Doubt, Doubt, Doubt, Doubt, Doubt],
    );
    doubt_until(&mut state, 3);
    assert_eq!(state.lives().get(Side::A), &8);

    let outcome = state.resolve_round(Cooperation, Betrayal).unwrap();
    assert_eq!(outcome.round, 3);
    assert_eq!(outcome.side(Side::A).payoff, -3);
    assert_eq!(outcome.side(Side::B).payoff, 1);
    assert!(outcome.side(Side::A).hand_reset);
    assert!(!outcome.side(Side::B).hand_reset);

    assert_eq!(state.life(Side::A), 8 - 3 - 1);
    assert_eq!(state.life(Side::B), 8 + 1 - 1);
    assert_eq!(state.hand(Side::A).len(), 3);
    assert_eq!(state.cards_accounted(), state.card_total());
}

#[test]
fn test_betrayal_against_betrayal_costs_both_two_r() {
    let mut state = stacked(
        &peaceful(),
        &[Betrayal, Doubt, Doubt, Betrayal, Doubt, Doubt, Doubt, Doubt, Doubt, Doubt],
    );
    doubt_until(&mut state, 3);

    let outcome = state.resolve_round(Betrayal, Betrayal).unwrap();
    for side in Side::BOTH {
        assert_eq!(outcome.side(side).payoff, -6);
        assert_eq!(state.life(side), 8 - 6 - 1);
    }
    assert!(!state.is_over());
}

#[test]
fn test_doubt_punishes_betrayal() {
    let mut state = stacked(
        &peaceful(),
        &[Doubt, Doubt, Doubt, Betrayal, Doubt, Doubt, Doubt, Doubt, Doubt, Doubt],
    );
    doubt_until(&mut state, 3);

    let outcome = state.resolve_round(Doubt, Betrayal).unwrap();
    assert_eq!(outcome.side(Side::A).payoff, 4);
    assert_eq!(outcome.side(Side::B).payoff, -4);
    // 8 + 4 is capped at 10
    assert_eq!(state.life(Side::A), 9);
    assert_eq!(state.life(Side::B), 3);
}

#[test]
fn test_recon_reveals_refilled_hand() {
    let mut state = stacked(
        &peaceful(),
        &[Cooperation, Doubt, Doubt, Recon, Doubt, Doubt, Chaos, Pollution, Doubt, Doubt],
    );

    let outcome = state.resolve_round(Cooperation, Recon).unwrap();
    assert!(outcome.side(Side::B).saw_opponent);
    assert!(!outcome.side(Side::A).saw_opponent);

    // A refilled with Chaos before the snapshot was taken
    let seen = state.revealed(Side::B).unwrap();
    assert_eq!(seen, state.hand(Side::A));
    assert!(seen.has(Chaos));
    assert!(state.revealed(Side::A).is_none());
    assert_eq!(state.belief(Side::B).revealed.as_ref(), Some(seen));

    // The snapshot lasts one round
    state.resolve_round(Doubt, Doubt).unwrap();
    assert!(state.revealed(Side::B).is_none());
}

#[test]
fn test_payoff_table_is_complete() {
    let table = PayoffTable::standard();
    assert_eq!(table.entries().count(), 49);
    assert!(table.is_mirror_consistent());
    assert_eq!(PayoffTable::from_entries(table.entries()), Ok(table));

    let missing: Vec<_> = table.entries().skip(1).collect();
    assert!(PayoffTable::from_entries(missing).is_err());
}

// =============================================================================
// Termination
// =============================================================================

#[test]
fn test_elimination_ends_match_immediately() {
    let config = peaceful().with_start_life(3);
    let mut state = stacked(
        &config,
        &[Pollution, Pollution, Doubt, Doubt, Doubt, Doubt, Doubt, Doubt, Doubt, Doubt],
    );

    state.resolve_round(Pollution, Doubt).unwrap();
    assert_eq!(state.life(Side::A), 1);
    assert_eq!(state.life(Side::B), 2);

    let outcome = state.resolve_round(Pollution, Doubt).unwrap();
    assert_eq!(state.life(Side::A), 0);
    assert!(state.has_lost(Side::A));
    assert!(!state.has_lost(Side::B));
    assert_eq!(outcome.status, MatchStatus::Finished(Verdict::Winner(Side::B)));
    assert_eq!(state.verdict(), Some(Verdict::Winner(Side::B)));
    // no refill once someone is out
    assert_eq!(state.hand(Side::A).len(), 2);

    assert_eq!(state.resolve_round(0usize, 0usize), Err(SubmissionError::MatchOver));
    assert_eq!(state.log().len(), 2);
}

#[test]
fn test_double_elimination_is_draw() {
    let config = peaceful().with_start_life(2);
    let mut state = stacked(&config, &[Betrayal, Doubt, Doubt, Betrayal, Doubt, Doubt, Doubt]);

    state.resolve_round(Betrayal, Betrayal).unwrap();
    assert!(state.has_lost(Side::A));
    assert!(state.has_lost(Side::B));
    assert_eq!(state.verdict(), Some(Verdict::Draw));
}

#[test]
fn test_round_cap_higher_life_wins() {
    let config = peaceful().with_max_rounds(2);
    let mut state = stacked(
        &config,
        &[Interrupt, Doubt, Doubt, Cooperation, Doubt, Doubt, Doubt, Doubt, Doubt, Doubt],
    );

    state.resolve_round(Interrupt, Cooperation).unwrap();
    assert!(!state.is_over());
    state.resolve_round(Doubt, Doubt).unwrap();

    assert_eq!(state.life(Side::A), 7);
    assert_eq!(state.life(Side::B), 8);
    assert_eq!(state.rounds_played(), 2);
    assert_eq!(state.verdict(), Some(Verdict::Winner(Side::B)));
}

#[test]
fn test_round_cap_equal_life_is_draw() {
    let config = peaceful().with_max_rounds(1);
    let mut state = stacked(&config, &[Doubt; 8]);
    state.resolve_round(Doubt, Doubt).unwrap();
    assert_eq!(state.verdict(), Some(Verdict::Draw));
}

// =============================================================================
// Rejected submissions
// =============================================================================

#[test]
fn test_rejected_submission_is_a_no_op() {
    let mut state = stacked(&peaceful(), &[Doubt, Doubt, Doubt, Chaos, Chaos, Chaos, Recon]);
    let hand_b = state.hand(Side::B).clone();

    assert_eq!(
        state.resolve_round(Doubt, Betrayal),
        Err(SubmissionError::NotInHand {
            side: Side::B,
            card: Betrayal
        })
    );
    assert_eq!(
        state.resolve_round(0usize, 3usize),
        Err(SubmissionError::IndexOutOfRange {
            side: Side::B,
            index: 3,
            hand_size: 3
        })
    );
    assert_eq!(state.check_submission(Side::A, Doubt), Ok(0));
    assert_eq!(state.hand(Side::B), &hand_b);
    assert_eq!(state.round(), 1);
    assert_eq!(state.life(Side::A), 10);

    // resubmitting works
    state.resolve_round(Doubt, Chaos).unwrap();
    assert_eq!(state.round(), 2);
}

// =============================================================================
// Disasters
// =============================================================================

fn with_disaster(disaster: Disaster) -> MatchConfig {
    Preset::Quick.config().with_disasters([disaster], 1)
}

#[test]
fn test_meteorite_cuts_life_on_entry() {
    let mut state = stacked(&with_disaster(Disaster::Meteorite), &[Doubt; 12]);
    assert_eq!(state.disaster(), Disaster::Peace);

    let outcome = state.resolve_round(Doubt, Doubt).unwrap();
    assert_eq!(outcome.disaster, Disaster::Peace);
    assert_eq!(outcome.disaster_entered, Some(Disaster::Meteorite));
    assert_eq!(state.disaster(), Disaster::Meteorite);
    // 9 * 2 / 3
    assert_eq!(state.life(Side::A), 6);
    assert_eq!(state.life(Side::B), 6);

    // pool exhausted, back to Peace
    let outcome = state.resolve_round(Doubt, Doubt).unwrap();
    assert_eq!(outcome.disaster_entered, Some(Disaster::Peace));
    assert_eq!(state.life(Side::A), 5);
}

#[test]
fn test_heatwave_doubles_upkeep() {
    let mut state = stacked(&with_disaster(Disaster::Heatwave), &[Doubt; 12]);
    state.resolve_round(Doubt, Doubt).unwrap();
    assert_eq!(state.disaster(), Disaster::Heatwave);

    let outcome = state.resolve_round(Doubt, Doubt).unwrap();
    assert_eq!(outcome.side(Side::A).attrition, 2);
    assert_eq!(state.life(Side::A), 7);
    assert_eq!(state.life(Side::B), 7);
}

#[test]
fn test_coldwave_shrinks_refills() {
    let mut state = stacked(&with_disaster(Disaster::ColdWave), &[Doubt; 12]);
    state.resolve_round(Doubt, Doubt).unwrap();
    assert_eq!(state.disaster(), Disaster::ColdWave);
    assert_eq!(state.hand_limit(), 2);
    assert_eq!(state.belief(Side::A).hand_limit, 2);

    state.resolve_round(Doubt, Doubt).unwrap();
    assert_eq!(state.hand(Side::A).len(), 2);
    assert_eq!(state.hand(Side::B).len(), 2);

    // Peace again: refills go back to 3
    state.resolve_round(Doubt, Doubt).unwrap();
    assert_eq!(state.hand(Side::A).len(), 3);
}

#[test]
fn test_lightning_strikes_both_sides() {
    let mut strikes = 0;
    let mut misses = 0;
    for seed in 0..40 {
        let config = with_disaster(Disaster::Lightning);
        let mut state = MatchState::with_stacked_deck(&config, [Doubt; 12], seed).unwrap();
        state.resolve_round(Doubt, Doubt).unwrap();

        let outcome = state.resolve_round(Doubt, Doubt).unwrap();
        assert_eq!(outcome.disaster, Disaster::Lightning);
        let attrition = outcome.side(Side::A).attrition;
        assert_eq!(attrition, outcome.side(Side::B).attrition);
        if outcome.burst {
            strikes += 1;
            assert_eq!(attrition, 4);
            assert_eq!(state.life(Side::A), 5);
        } else {
            misses += 1;
            assert_eq!(attrition, 1);
        }
    }
    assert!(strikes > 0);
    assert!(misses > 0);
}

#[test]
fn test_gale_swaps_keep_submitted_card() {
    let mut swaps = 0;
    for seed in 0..40 {
        let config = with_disaster(Disaster::Gale);
        let deck = [Cooperation, Cooperation, Cooperation, Cooperation, Cooperation, Cooperation]
            .into_iter()
            .chain(std::iter::repeat(Doubt).take(8));
        let mut state = MatchState::with_stacked_deck(&config, deck, seed).unwrap();
        state.resolve_round(Cooperation, Cooperation).unwrap();
        assert_eq!(state.disaster(), Disaster::Gale);

        let outcome = state.resolve_round(Cooperation, Cooperation).unwrap();
        let report = outcome.side(Side::A);
        assert_eq!(report.submitted, Cooperation);
        if report.swapped {
            swaps += 1;
            assert_eq!(report.resolved, Doubt);
            assert_eq!(state.hand(Side::A).count(Cooperation), 2);
        } else {
            assert_eq!(report.resolved, Cooperation);
            assert_eq!(state.hand(Side::A).count(Cooperation), 1);
        }
        // the substitute is discarded, so nothing is lost
        assert_eq!(state.cards_accounted(), state.card_total());
    }
    assert!(swaps > 0);
}

#[test]
fn test_gale_with_empty_deck_keeps_submissions() {
    let config = with_disaster(Disaster::Gale);
    for seed in 0..400 {
        let deck = [Doubt, Doubt, Doubt, Cooperation, Cooperation, Cooperation];
        let mut state = MatchState::with_stacked_deck(&config, deck, seed).unwrap();
        state.resolve_round(Doubt, Cooperation).unwrap();
        assert_eq!(state.disaster(), Disaster::Gale);
        assert_eq!(state.deck_len(), 0);

        // every other card is in a hand, so nothing can be swapped in
        let outcome = state.resolve_round(0usize, 0usize).unwrap();
        for side in Side::BOTH {
            let report = outcome.side(side);
            assert!(!report.swapped, "seed {seed}");
            assert_eq!(report.resolved, report.submitted);
            assert_eq!(state.hand(side).len(), 3);
        }
        assert_eq!(state.cards_accounted(), state.card_total(), "seed {seed}");
    }
}

#[test]
fn test_gale_reshuffles_keep_every_card() {
    let config = with_disaster(Disaster::Gale);
    let mut swaps = 0;
    for seed in 0..200 {
        let deck = [Doubt, Doubt, Doubt, Cooperation, Cooperation, Cooperation, Recon, Chaos];
        let mut state = MatchState::with_stacked_deck(&config, deck, seed).unwrap();
        while !state.is_over() {
            let outcome = state.resolve_round(0usize, 0usize).unwrap();
            swaps += Side::BOTH
                .into_iter()
                .filter(|side| outcome.side(*side).swapped)
                .count();
            assert_eq!(
                state.cards_accounted(),
                state.card_total(),
                "seed {seed} round {}",
                outcome.round
            );
        }
    }
    assert!(swaps > 0);
}

#[test]
fn test_clone_forks_trajectory() {
    let mut state = MatchState::new(&Preset::Common.config(), 11).unwrap();
    state.resolve_round(0usize, 0usize).unwrap();

    let mut fork = state.clone();
    let a = state.resolve_round(1usize, 2usize).unwrap();
    let b = fork.resolve_round(1usize, 2usize).unwrap();
    assert_eq!(a, b);
    assert_eq!(state.log(), fork.log());
}
