use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use rayon::ThreadPoolBuilder;
use std::hint::black_box;
use term_2048::engine::{Board, Move};
use term_2048::expectimax::{Expectimax, ExpectimaxConfig, ExpectimaxParallel};

fn corpus() -> Vec<Board> {
    let mut rng = StdRng::seed_from_u64(4242);
    let mut boards = Vec::new();
    let mut b = Board::new_game(&mut rng);
    boards.push(b);
    let seq = [Move::Left, Move::Up, Move::Right, Move::Down];
    for i in 0..16 {
        b = b.make_move(seq[i % seq.len()], &mut rng);
        boards.push(b);
    }
    boards
}

fn bench_seq(c: &mut Criterion) {
    let boards = corpus();
    let cfg = ExpectimaxConfig { depth: 2, ..Default::default() };
    let mut ex = Expectimax::with_seed(cfg, 1);

    c.bench_function("expectimax_seq/best_move", |bch| {
        bch.iter(|| {
            let mut acc = 0usize;
            for &bd in &boards { acc ^= ex.best_move(bd).index(); }
            black_box(acc)
        })
    });
}

fn bench_par(c: &mut Criterion) {
    // Pin a small pool for stability
    let pool = ThreadPoolBuilder::new().num_threads(4).build().unwrap();
    let boards = corpus();
    let cfg = ExpectimaxConfig { depth: 3, parallel: true, ..Default::default() };
    let mut ex = ExpectimaxParallel::with_seed(cfg, 1);

    c.bench_function("expectimax_par/best_move", |bch| {
        bch.iter(|| pool.install(|| {
            let mut acc = 0usize;
            for &bd in &boards { acc ^= ex.best_move(bd).index(); }
            black_box(acc)
        }))
    });
}

criterion_group!(expectimax, bench_seq, bench_par);
criterion_main!(expectimax);
