//! Rating engine trait and the pairwise-decomposition ELO implementation
//!
//! The engine is pure computation: given every participant's pre-game ratings
//! and the declared winner, it produces a signed delta per participant. It
//! never reads or writes storage.

use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use skillratings::elo::{expected_score, EloRating};

/// Pre-game ratings for one participant, parallel to the submission order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRatings {
    /// The player's overall rating
    pub player_rating: f64,
    /// The rating of the (player, deck) pair they are piloting
    pub deck_rating: f64,
}

/// Signed rating deltas for one participant, parallel to the input order.
///
/// Deltas are raw (unrounded); the submission service rounds them once at
/// the persistence boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticipantDeltas {
    pub player_delta: f64,
    pub deck_delta: f64,
}

/// Trait for computing rating changes after a game
pub trait RatingEngine: Send + Sync {
    /// Compute deltas for all participants of one game.
    ///
    /// # Arguments
    /// * `participants` - pre-game ratings, one entry per participant
    /// * `winner_index` - index of the declared winner within `participants`
    /// * `k_factor` - K scaling constant for this computation
    ///
    /// # Returns
    /// One delta pair per participant, in input order.
    fn compute(
        &self,
        participants: &[ParticipantRatings],
        winner_index: usize,
        k_factor: f64,
    ) -> Result<Vec<ParticipantDeltas>>;
}

/// Multiplayer generalization of pairwise ELO.
///
/// The winner is scored pairwise against every loser: for loser `i` the
/// winner's expected score is `E_i = 1 / (1 + 10^((Rl_i - Rw) / 400))`, its
/// pairwise gain is `K * (1 - E_i)` and the loser's loss is `-K * E_i`. The
/// winner's total delta is the arithmetic mean of the pairwise gains; each
/// loser keeps its full independent pairwise loss. The scheme is therefore
/// not zero-sum across all participants.
#[derive(Debug, Clone, Copy, Default)]
pub struct PairwiseEloEngine;

impl PairwiseEloEngine {
    pub fn new() -> Self {
        Self
    }

    /// Winner's expected score against a single loser, strictly inside (0, 1)
    fn winner_expectation(winner_rating: f64, loser_rating: f64) -> f64 {
        let (winner_expected, _) = expected_score(
            &EloRating {
                rating: winner_rating,
            },
            &EloRating {
                rating: loser_rating,
            },
        );
        winner_expected
    }

    /// Deltas for a single rating scope (overall or per-deck), in input order
    fn compute_scoped(ratings: &[f64], winner_index: usize, k_factor: f64) -> Vec<f64> {
        let winner_rating = ratings[winner_index];
        let loser_count = (ratings.len() - 1) as f64;

        let mut deltas = vec![0.0; ratings.len()];
        let mut gain_sum = 0.0;
        for (index, &rating) in ratings.iter().enumerate() {
            if index == winner_index {
                continue;
            }
            let expected = Self::winner_expectation(winner_rating, rating);
            gain_sum += k_factor * (1.0 - expected);
            deltas[index] = -k_factor * expected;
        }
        deltas[winner_index] = gain_sum / loser_count;
        deltas
    }
}

impl RatingEngine for PairwiseEloEngine {
    fn compute(
        &self,
        participants: &[ParticipantRatings],
        winner_index: usize,
        k_factor: f64,
    ) -> Result<Vec<ParticipantDeltas>> {
        if participants.len() < 2 {
            return Err(LedgerError::RatingCalculationFailed {
                reason: format!(
                    "need at least 2 participants, got {}",
                    participants.len()
                ),
            }
            .into());
        }
        if winner_index >= participants.len() {
            return Err(LedgerError::RatingCalculationFailed {
                reason: format!(
                    "winner index {} out of range for {} participants",
                    winner_index,
                    participants.len()
                ),
            }
            .into());
        }
        if k_factor <= 0.0 {
            return Err(LedgerError::RatingCalculationFailed {
                reason: format!("K-factor must be positive, got {}", k_factor),
            }
            .into());
        }

        let player_ratings: Vec<f64> = participants.iter().map(|p| p.player_rating).collect();
        let deck_ratings: Vec<f64> = participants.iter().map(|p| p.deck_rating).collect();

        let player_deltas = Self::compute_scoped(&player_ratings, winner_index, k_factor);
        let deck_deltas = Self::compute_scoped(&deck_ratings, winner_index, k_factor);

        Ok(player_deltas
            .into_iter()
            .zip(deck_deltas)
            .map(|(player_delta, deck_delta)| ParticipantDeltas {
                player_delta,
                deck_delta,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::round_to_places;

    fn flat(ratings: &[f64]) -> Vec<ParticipantRatings> {
        ratings
            .iter()
            .map(|&r| ParticipantRatings {
                player_rating: r,
                deck_rating: r,
            })
            .collect()
    }

    #[test]
    fn test_two_player_equal_ratings() {
        let engine = PairwiseEloEngine::new();
        let deltas = engine.compute(&flat(&[1500.0, 1500.0]), 0, 32.0).unwrap();

        assert_eq!(deltas[0].player_delta, 16.0);
        assert_eq!(deltas[1].player_delta, -16.0);
        assert_eq!(deltas[0].deck_delta, 16.0);
        assert_eq!(deltas[1].deck_delta, -16.0);
    }

    #[test]
    fn test_two_player_pairwise_formulas() {
        // Winner favored at 1600 vs 1500: gain K*(1-E), loss -K*E with the
        // winner's expectation E.
        let engine = PairwiseEloEngine::new();
        let deltas = engine.compute(&flat(&[1600.0, 1500.0]), 0, 32.0).unwrap();

        let expected = 1.0 / (1.0 + 10f64.powf((1500.0 - 1600.0) / 400.0));
        assert!((deltas[0].player_delta - 32.0 * (1.0 - expected)).abs() < 1e-9);
        assert!((deltas[1].player_delta + 32.0 * expected).abs() < 1e-9);

        assert_eq!(round_to_places(deltas[0].player_delta, 2), 11.52);
        assert_eq!(round_to_places(deltas[1].player_delta, 2), -20.48);
    }

    #[test]
    fn test_four_player_documented_scenario() {
        // Winner at 1400 against losers at 1500, 1600 and 1400 with K=32.
        let engine = PairwiseEloEngine::new();
        let deltas = engine
            .compute(&flat(&[1400.0, 1500.0, 1600.0, 1400.0]), 0, 32.0)
            .unwrap();

        assert_eq!(round_to_places(deltas[0].player_delta, 2), 20.26);
        assert_eq!(round_to_places(deltas[1].player_delta, 2), -11.52);
        assert_eq!(round_to_places(deltas[2].player_delta, 2), -7.69);
        assert_eq!(round_to_places(deltas[3].player_delta, 2), -16.0);
    }

    #[test]
    fn test_winner_delta_is_mean_of_pairwise_gains() {
        let engine = PairwiseEloEngine::new();
        let ratings = [1450.0, 1500.0, 1600.0, 1700.0];
        let deltas = engine.compute(&flat(&ratings), 1, 32.0).unwrap();

        let winner = ratings[1];
        let mut gains = Vec::new();
        for (index, &loser) in ratings.iter().enumerate() {
            if index == 1 {
                continue;
            }
            let expected = 1.0 / (1.0 + 10f64.powf((loser - winner) / 400.0));
            gains.push(32.0 * (1.0 - expected));
        }
        let mean: f64 = gains.iter().sum::<f64>() / gains.len() as f64;
        assert!((deltas[1].player_delta - mean).abs() < 1e-9);
    }

    #[test]
    fn test_loser_losses_are_independent_of_co_losers() {
        // A loser's delta against the same winner must not change when more
        // losers join the game.
        let engine = PairwiseEloEngine::new();
        let small = engine.compute(&flat(&[1400.0, 1500.0]), 0, 32.0).unwrap();
        let large = engine
            .compute(&flat(&[1400.0, 1500.0, 1650.0, 1200.0, 1800.0]), 0, 32.0)
            .unwrap();

        assert!((small[1].player_delta - large[1].player_delta).abs() < 1e-12);
    }

    #[test]
    fn test_deck_deltas_track_deck_ratings() {
        // A player with a high overall rating but an unproven deck gains more
        // deck rating than player rating when winning.
        let engine = PairwiseEloEngine::new();
        let participants = vec![
            ParticipantRatings {
                player_rating: 1700.0,
                deck_rating: 1000.0,
            },
            ParticipantRatings {
                player_rating: 1500.0,
                deck_rating: 1500.0,
            },
        ];
        let deltas = engine.compute(&participants, 0, 32.0).unwrap();

        assert!(deltas[0].deck_delta > deltas[0].player_delta);
        assert!(deltas[1].player_delta < 0.0);
        assert!(deltas[1].deck_delta < 0.0);
    }

    #[test]
    fn test_skewed_ratings_stay_bounded() {
        let engine = PairwiseEloEngine::new();
        let deltas = engine.compute(&flat(&[3000.0, 100.0]), 0, 32.0).unwrap();

        // Expectation approaches 1 but never reaches it, so the winner still
        // gains a strictly positive sliver and the loser loses less than K.
        assert!(deltas[0].player_delta > 0.0);
        assert!(deltas[1].player_delta < 0.0);
        assert!(deltas[1].player_delta > -32.0);
    }

    #[test]
    fn test_rejects_single_participant() {
        let engine = PairwiseEloEngine::new();
        assert!(engine.compute(&flat(&[1500.0]), 0, 32.0).is_err());
    }

    #[test]
    fn test_rejects_winner_index_out_of_range() {
        let engine = PairwiseEloEngine::new();
        assert!(engine.compute(&flat(&[1500.0, 1500.0]), 2, 32.0).is_err());
    }

    #[test]
    fn test_rejects_non_positive_k() {
        let engine = PairwiseEloEngine::new();
        assert!(engine.compute(&flat(&[1500.0, 1500.0]), 0, 0.0).is_err());
    }
}
