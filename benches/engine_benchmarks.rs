//! Benchmarks for Ataxx engine performance.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use ataxx_engine::board::search::{mcts, search, MctsLimits, MctsStrategy, SearchLimits};
use ataxx_engine::board::Position;
use ataxx_engine::perft::perft;
use ataxx_engine::sync::StopFlag;
use ataxx_engine::TranspositionCache;

const GAPPED_FEN: &str = "x5o/7/2-1-2/7/2-1-2/7/o5x x 0 1";
const MIDGAME_FEN: &str = "x1oo2o/1xxo3/2xoo2/3x3/2oxx2/1o3x1/o3x1x o 0 12";

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");

    let mut startpos = Position::new();
    for depth in 1..=4 {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| perft(None, &mut startpos, black_box(depth)))
        });
    }

    let mut gapped = Position::from_fen(GAPPED_FEN);
    for depth in 1..=3 {
        group.bench_with_input(BenchmarkId::new("gapped", depth), &depth, |b, &depth| {
            b.iter(|| perft(None, &mut gapped, black_box(depth)))
        });
    }

    // Cached counts, starting cold each iteration
    group.bench_function("startpos_cached_4", |b| {
        b.iter(|| {
            let cache = TranspositionCache::new(16);
            perft(Some(&cache), &mut startpos, black_box(4))
        })
    });

    group.finish();
}

fn bench_movegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");

    for (name, fen) in [("startpos", None), ("gapped", Some(GAPPED_FEN)), ("midgame", Some(MIDGAME_FEN))] {
        let pos = fen.map_or_else(Position::new, Position::from_fen);
        group.bench_function(name, |b| b.iter(|| black_box(pos.generate_moves())));
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10); // Fewer samples for slower benchmarks

    let stop = StopFlag::new();

    for depth in [2, 3, 4] {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| {
                let cache = TranspositionCache::new(16);
                search(&Position::new(), &cache, SearchLimits::Depth(depth), &stop, |_| {})
            })
        });
    }

    let midgame = Position::from_fen(MIDGAME_FEN);
    for depth in [2, 3] {
        group.bench_with_input(BenchmarkId::new("midgame", depth), &depth, |b, &depth| {
            b.iter(|| {
                let cache = TranspositionCache::new(16);
                search(&midgame, &cache, SearchLimits::Depth(depth), &stop, |_| {})
            })
        });
    }

    group.finish();
}

fn bench_mcts(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts");
    group.sample_size(10);

    let pos = Position::new();
    for strategy in [MctsStrategy::Pure, MctsStrategy::Uct] {
        group.bench_function(format!("{strategy:?}_500"), |b| {
            b.iter(|| {
                let mut rng = StdRng::seed_from_u64(7);
                mcts(&pos, strategy, MctsLimits::Simulations(500), 300, &mut rng)
            })
        });
    }

    group.finish();
}

fn bench_eval(c: &mut Criterion) {
    let mut group = c.benchmark_group("eval");

    for (name, fen) in [("gapped", GAPPED_FEN), ("midgame", MIDGAME_FEN)] {
        let pos = Position::from_fen(fen);
        group.bench_with_input(BenchmarkId::new("position", name), &pos, |b, pos| {
            b.iter(|| black_box(pos.evaluate()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_perft,
    bench_movegen,
    bench_search,
    bench_mcts,
    bench_eval
);
criterion_main!(benches);
