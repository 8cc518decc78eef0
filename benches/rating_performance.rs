//! Performance benchmarks for rating calculations and ledger folds

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pod_ledger::ledger::{GameLedger, InMemoryGameLedger};
use pod_ledger::rating::{PairwiseEloEngine, ParticipantRatings, RatingEngine};
use pod_ledger::stats::{LeaderboardScope, StatsAggregator};
use pod_ledger::types::{GameDraft, Participant};
use std::sync::Arc;

fn bench_participants(count: usize) -> Vec<ParticipantRatings> {
    (0..count)
        .map(|i| ParticipantRatings {
            player_rating: 1400.0 + (i as f64) * 37.0,
            deck_rating: 1000.0 + (i as f64) * 21.0,
        })
        .collect()
}

fn bench_rating_calculations(c: &mut Criterion) {
    let engine = PairwiseEloEngine::new();

    let two = bench_participants(2);
    c.bench_function("compute_2_players", |b| {
        b.iter(|| engine.compute(black_box(&two), 0, 32.0).unwrap())
    });

    let four = bench_participants(4);
    c.bench_function("compute_4_players", |b| {
        b.iter(|| engine.compute(black_box(&four), 0, 32.0).unwrap())
    });

    let six = bench_participants(6);
    c.bench_function("compute_6_players", |b| {
        b.iter(|| engine.compute(black_box(&six), 0, 32.0).unwrap())
    });
}

fn bench_leaderboard_fold(c: &mut Criterion) {
    let ledger = Arc::new(InMemoryGameLedger::new());
    let players = ["alice", "bob", "carol", "dave", "erin", "frank"];
    for game in 0..1000 {
        let winner = players[game % players.len()];
        ledger
            .append(GameDraft {
                date: chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                submitted_at: chrono::Utc::now(),
                participants: players
                    .iter()
                    .map(|player| Participant {
                        player_id: player.to_string(),
                        deck_id: format!("{}-deck", player),
                        player_delta: if *player == winner { 16.0 } else { -3.2 },
                        deck_delta: if *player == winner { 16.0 } else { -3.2 },
                    })
                    .collect(),
                winner_id: winner.to_string(),
            })
            .unwrap();
    }

    let aggregator = StatsAggregator::new(ledger, 1000.0);
    c.bench_function("leaderboard_1000_games", |b| {
        b.iter(|| aggregator.leaderboard(black_box(LeaderboardScope::Player)).unwrap())
    });
    c.bench_function("streaks_1000_games", |b| {
        b.iter(|| aggregator.streaks(black_box("alice")).unwrap())
    });
}

criterion_group!(benches, bench_rating_calculations, bench_leaderboard_fold);
criterion_main!(benches);
