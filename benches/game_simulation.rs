//! Benchmarks for complete AI games and battles.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use city_deck::ai::{AiPolicy, Personality};
use city_deck::cards::CardCatalog;
use city_deck::core::GameConfig;
use city_deck::rules::TurnEngine;
use city_deck::tournament::{run_battle, BattleConfig};

fn play(catalog: &CardCatalog, seed: u64, seats: &[Personality]) -> u32 {
    let mut engine = TurnEngine::new(catalog, GameConfig::default(), seed);
    for (i, &p) in seats.iter().enumerate() {
        engine
            .add_player(format!("AI-{i}"), AiPolicy::new(p, 1.0))
            .expect("table has room");
    }
    engine.run().map(|report| report.turns).unwrap_or(0)
}

fn bench_single_game(c: &mut Criterion) {
    let catalog = CardCatalog::embedded().expect("built-in catalog");
    let seats = [Personality::Aggressive, Personality::Economic];

    c.bench_function("single_game_2p", |b| {
        b.iter(|| black_box(play(&catalog, black_box(42), &seats)));
    });
}

fn bench_single_game_5p(c: &mut Criterion) {
    let catalog = CardCatalog::embedded().expect("built-in catalog");

    c.bench_function("single_game_5p", |b| {
        b.iter(|| black_box(play(&catalog, black_box(42), &Personality::ALL)));
    });
}

fn bench_battle(c: &mut Criterion) {
    let catalog = CardCatalog::embedded().expect("built-in catalog");
    let config = BattleConfig::new().with_games(10).with_seed(7);

    c.bench_function("battle_10_games", |b| {
        b.iter(|| black_box(run_battle(&catalog, &Personality::ALL, black_box(&config))));
    });
}

criterion_group!(benches, bench_single_game, bench_single_game_5p, bench_battle);
criterion_main!(benches);
