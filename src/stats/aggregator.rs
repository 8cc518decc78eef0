//! Read-side statistics aggregator
//!
//! Every query here is answered from a fresh fold or scan of the ledger, the
//! single source of truth. There is no incrementally patched summary state,
//! so aggregator outputs agree with a full ledger replay at all times. Full
//! scans are acceptable at the roster sizes this system serves.

use crate::error::Result;
use crate::ledger::GameLedger;
use crate::types::{DeckId, GameRecord, PlayerId, RatingTarget};
use crate::utils::win_rate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

/// Granularity of a leaderboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaderboardScope {
    Player,
    PlayerDeck,
}

/// One leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub target: RatingTarget,
    pub rating: f64,
}

/// Per-deck slice of a player summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckBreakdown {
    pub deck_id: DeckId,
    pub rating: f64,
    pub games_played: u64,
    pub wins: u64,
    pub win_rate: f64,
}

/// Summary of one player's record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub player_id: PlayerId,
    pub current_rating: f64,
    pub games_played: u64,
    pub wins: u64,
    pub win_rate: f64,
    pub decks: Vec<DeckBreakdown>,
}

/// Direction of a streak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreakKind {
    Win,
    Loss,
}

/// A run of consecutive results of one kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub kind: StreakKind,
    pub length: u64,
}

/// Current and longest streaks for one player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreakSummary {
    /// `None` when the player has no games; a valid empty state, not an error
    pub current: Option<Streak>,
    pub longest_win: u64,
    pub longest_loss: u64,
}

/// Head-to-head statistics between two players
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupSummary {
    pub player_id: PlayerId,
    pub opponent_id: PlayerId,
    /// Wins of `player_id` within the filtered games
    pub wins: u64,
    pub win_rate: f64,
    /// Sum of `player_id`'s overall-rating deltas across the filtered games
    pub rating_delta_sum: f64,
    /// The shared games, in ledger order
    pub games: Vec<GameRecord>,
}

/// Read-side aggregator over the game ledger
pub struct StatsAggregator {
    ledger: Arc<dyn GameLedger>,
    baseline: f64,
}

impl StatsAggregator {
    pub fn new(ledger: Arc<dyn GameLedger>, baseline: f64) -> Self {
        Self { ledger, baseline }
    }

    /// Leaderboard at the requested granularity, sorted by rating descending
    /// with ties broken by entity identifier ascending for determinism.
    pub fn leaderboard(&self, scope: LeaderboardScope) -> Result<Vec<LeaderboardRow>> {
        let mut rows: Vec<LeaderboardRow> = match scope {
            LeaderboardScope::Player => self
                .fold_player_ratings()?
                .into_iter()
                .map(|(player_id, rating)| LeaderboardRow {
                    target: RatingTarget::Player(player_id),
                    rating,
                })
                .collect(),
            LeaderboardScope::PlayerDeck => self
                .fold_deck_ratings()?
                .into_iter()
                .map(|((player_id, deck_id), rating)| LeaderboardRow {
                    target: RatingTarget::PlayerDeck(player_id, deck_id),
                    rating,
                })
                .collect(),
        };

        rows.sort_by(|a, b| {
            b.rating
                .partial_cmp(&a.rating)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.target.to_string().cmp(&b.target.to_string()))
        });
        Ok(rows)
    }

    /// Summary for one player; a player with no games yields the empty
    /// summary at baseline rather than an error.
    pub fn player_summary(&self, player_id: &str) -> Result<PlayerSummary> {
        let games = self.ledger.by_player(player_id)?;

        let mut rating = self.baseline;
        let mut wins = 0u64;
        let mut deck_rating: HashMap<DeckId, f64> = HashMap::new();
        let mut deck_games: HashMap<DeckId, u64> = HashMap::new();
        let mut deck_wins: HashMap<DeckId, u64> = HashMap::new();

        for game in &games {
            let entry = match game.participant(player_id) {
                Some(entry) => entry,
                None => continue,
            };
            rating += entry.player_delta;
            *deck_rating
                .entry(entry.deck_id.clone())
                .or_insert(self.baseline) += entry.deck_delta;
            *deck_games.entry(entry.deck_id.clone()).or_insert(0) += 1;
            if game.won_by(player_id) {
                wins += 1;
                *deck_wins.entry(entry.deck_id.clone()).or_insert(0) += 1;
            }
        }

        let mut decks: Vec<DeckBreakdown> = deck_rating
            .into_iter()
            .map(|(deck_id, rating)| {
                let games_played = deck_games.get(&deck_id).copied().unwrap_or(0);
                let wins = deck_wins.get(&deck_id).copied().unwrap_or(0);
                DeckBreakdown {
                    rating,
                    games_played,
                    wins,
                    win_rate: win_rate(wins, games_played),
                    deck_id,
                }
            })
            .collect();
        decks.sort_by(|a, b| a.deck_id.cmp(&b.deck_id));

        let games_played = games.len() as u64;
        Ok(PlayerSummary {
            player_id: player_id.to_string(),
            current_rating: rating,
            games_played,
            wins,
            win_rate: win_rate(wins, games_played),
            decks,
        })
    }

    /// Current and longest streaks from one chronological scan of the
    /// player's games.
    pub fn streaks(&self, player_id: &str) -> Result<StreakSummary> {
        let games = self.ledger.by_player(player_id)?;

        let mut longest_win = 0u64;
        let mut longest_loss = 0u64;
        let mut current: Option<Streak> = None;

        for game in &games {
            let kind = if game.won_by(player_id) {
                StreakKind::Win
            } else {
                StreakKind::Loss
            };
            current = Some(match current {
                Some(streak) if streak.kind == kind => Streak {
                    kind,
                    length: streak.length + 1,
                },
                _ => Streak { kind, length: 1 },
            });
            if let Some(streak) = current {
                match streak.kind {
                    StreakKind::Win => longest_win = longest_win.max(streak.length),
                    StreakKind::Loss => longest_loss = longest_loss.max(streak.length),
                }
            }
        }

        Ok(StreakSummary {
            current,
            longest_win,
            longest_loss,
        })
    }

    /// Head-to-head statistics over games where both players participated.
    ///
    /// "Opponent" means co-participant: in a multiplayer game the opponent
    /// need not be the direct winner or loser against `player_id`. When
    /// `deck_filter` is set, only games where the opponent piloted that deck
    /// are counted.
    pub fn matchup(
        &self,
        player_id: &str,
        opponent_id: &str,
        deck_filter: Option<&str>,
    ) -> Result<MatchupSummary> {
        let games: Vec<GameRecord> = self
            .ledger
            .by_player(player_id)?
            .into_iter()
            .filter(|game| match (game.participant(opponent_id), deck_filter) {
                (Some(entry), Some(deck_id)) => entry.deck_id == deck_id,
                (Some(_), None) => true,
                (None, _) => false,
            })
            .collect();

        let mut wins = 0u64;
        let mut rating_delta_sum = 0.0;
        for game in &games {
            if game.won_by(player_id) {
                wins += 1;
            }
            if let Some(entry) = game.participant(player_id) {
                rating_delta_sum += entry.player_delta;
            }
        }

        Ok(MatchupSummary {
            player_id: player_id.to_string(),
            opponent_id: opponent_id.to_string(),
            wins,
            win_rate: win_rate(wins, games.len() as u64),
            rating_delta_sum,
            games,
        })
    }

    fn fold_player_ratings(&self) -> Result<HashMap<PlayerId, f64>> {
        let mut ratings: HashMap<PlayerId, f64> = HashMap::new();
        for record in self.ledger.records()? {
            for participant in &record.participants {
                *ratings
                    .entry(participant.player_id.clone())
                    .or_insert(self.baseline) += participant.player_delta;
            }
        }
        Ok(ratings)
    }

    fn fold_deck_ratings(&self) -> Result<HashMap<(PlayerId, DeckId), f64>> {
        let mut ratings: HashMap<(PlayerId, DeckId), f64> = HashMap::new();
        for record in self.ledger.records()? {
            for participant in &record.participants {
                *ratings
                    .entry((participant.player_id.clone(), participant.deck_id.clone()))
                    .or_insert(self.baseline) += participant.deck_delta;
            }
        }
        Ok(ratings)
    }
}
