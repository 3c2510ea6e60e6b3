//! Benchmarks for dealing decks and snapshotting state
//!
//! Run with: cargo bench --bench deck_build

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use memory_match::{Deck, GameRng, GameState, LevelCatalog};
use std::hint::black_box;

fn bench_deal(c: &mut Criterion) {
    let mut group = c.benchmark_group("deal");
    let catalog = LevelCatalog::standard();

    for level in 1..=4u32 {
        group.bench_with_input(BenchmarkId::from_parameter(level), &level, |b, &level| {
            let mut rng = GameRng::new(42);
            let definition = catalog.get(level);
            b.iter(|| black_box(Deck::deal(definition, &mut rng)));
        });
    }

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let catalog = LevelCatalog::standard();
    let deck = Deck::deal(catalog.get(4), &mut GameRng::new(42));
    let state = GameState::playing(1, 4, deck);

    c.bench_function("snapshot", |b| b.iter(|| black_box(state.clone())));
}

criterion_group!(benches, bench_deal, bench_snapshot);
criterion_main!(benches);
