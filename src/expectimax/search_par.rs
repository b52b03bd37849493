use std::sync::atomic::{AtomicU64, Ordering};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::engine::{Board, Move};

use super::heuristic::score_state;
use super::{log_branches, no_op_penalty, pick_best, BranchEval, ExpectimaxConfig, SearchStats};

/// Parallel sampling expectimax using rayon.
///
/// Moves and spawn samples are independent branches; each one draws from a
/// private `StdRng` seeded up front by its parent, so results do not depend
/// on how rayon schedules the work.
pub struct ExpectimaxParallel {
    cfg: ExpectimaxConfig,
    stats: SearchStats,
    rng: StdRng,
}

impl ExpectimaxParallel {
    pub fn new() -> Self { Self::with_config(ExpectimaxConfig::default()) }

    pub fn with_config(cfg: ExpectimaxConfig) -> Self {
        Self { cfg, stats: SearchStats::default(), rng: StdRng::from_entropy() }
    }

    pub fn with_seed(cfg: ExpectimaxConfig, seed: u64) -> Self {
        Self { cfg, stats: SearchStats::default(), rng: StdRng::seed_from_u64(seed) }
    }

    #[inline]
    pub fn config(&self) -> &ExpectimaxConfig { &self.cfg }

    /// Pick the move with the best sampled score.
    ///
    /// This is a convenience wrapper around `branch_evals` that just picks the best move.
    #[inline]
    pub fn best_move(&mut self, board: Board) -> Move {
        let branches = self.branch_evals(board);
        let choice = pick_best(&branches);
        log_branches("expectimax_par", &branches, choice);
        choice
    }

    /// Core function: score each direction in parallel.
    ///
    /// Returns a fixed array in order: `[Up, Down, Left, Right]` and marks
    /// no-op moves as `legal=false`.
    pub fn branch_evals(&mut self, board: Board) -> [BranchEval; 4] {
        let depth = self.cfg.depth.max(1);
        let seeds: [u64; 4] = std::array::from_fn(|_| self.rng.gen());
        let nodes = AtomicU64::new(0);
        let cfg = &self.cfg;
        let out_vec: Vec<BranchEval> = Move::ALL
            .par_iter()
            .zip(seeds.par_iter())
            .map(|(&dir, &seed)| evaluate_move(cfg, board, dir, depth, seed, &nodes))
            .collect();
        self.stats.record(nodes.load(Ordering::Relaxed));
        std::array::from_fn(|i| out_vec[i])
    }

    /// Statistics collected from the last call to [`Self::best_move`] or
    /// [`Self::branch_evals`].
    #[inline]
    pub fn last_stats(&self) -> SearchStats { self.stats }

    /// Reset accumulated stats to zero.
    #[inline]
    pub fn reset_stats(&mut self) { self.stats = SearchStats::default(); }
}

impl Default for ExpectimaxParallel { fn default() -> Self { Self::new() } }

fn evaluate_move(cfg: &ExpectimaxConfig, board: Board, dir: Move, depth: u32, seed: u64, nodes: &AtomicU64) -> BranchEval {
    nodes.fetch_add(1, Ordering::Relaxed);
    if board.collapse(dir) == board {
        return BranchEval { dir, ev: no_op_penalty(depth), legal: false };
    }
    let samples = cfg.samples.max(1);
    let mut rng = StdRng::seed_from_u64(seed);
    let draws: Vec<(Board, u64)> = (0..samples).map(|_| (board.make_move(dir, &mut rng), rng.gen())).collect();
    let score_sample = |&(sample, child_seed): &(Board, u64)| {
        if depth <= 1 {
            nodes.fetch_add(1, Ordering::Relaxed);
            score_state(&sample)
        } else {
            best_score(cfg, sample, depth - 1, child_seed, nodes)
        }
    };
    // collect before summing so the float result is independent of the split
    let scores: Vec<f64> = if depth >= cfg.par_min_depth {
        draws.par_iter().map(score_sample).collect()
    } else {
        draws.iter().map(score_sample).collect()
    };
    BranchEval { dir, ev: scores.iter().sum::<f64>() / samples as f64, legal: true }
}

fn best_score(cfg: &ExpectimaxConfig, board: Board, depth: u32, seed: u64, nodes: &AtomicU64) -> f64 {
    let mut rng = StdRng::seed_from_u64(seed);
    let seeds: [u64; 4] = std::array::from_fn(|_| rng.gen());
    if depth >= cfg.par_min_depth {
        Move::ALL
            .par_iter()
            .zip(seeds.par_iter())
            .map(|(&dir, &s)| evaluate_move(cfg, board, dir, depth, s, nodes).ev)
            .reduce(|| f64::NEG_INFINITY, f64::max)
    } else {
        Move::ALL
            .iter()
            .zip(seeds.iter())
            .fold(f64::NEG_INFINITY, |acc, (&dir, &s)| acc.max(evaluate_move(cfg, board, dir, depth, s, nodes).ev))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expectimax::NO_OP_PENALTY;

    fn cfg(depth: u32) -> ExpectimaxConfig {
        ExpectimaxConfig { depth, parallel: true, par_min_depth: 1, ..Default::default() }
    }

    #[test]
    fn it_returns_first_move_when_stuck() {
        let stuck = Board::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        let mut ex = ExpectimaxParallel::with_seed(cfg(3), 3);
        for b in ex.branch_evals(stuck) {
            assert!(!b.legal);
            assert_eq!(b.ev, NO_OP_PENALTY - 3.0);
        }
        assert_eq!(ex.best_move(stuck), Move::Up);
    }

    #[test]
    fn it_keeps_branch_order() {
        let board = Board::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let branches = ExpectimaxParallel::with_seed(cfg(2), 9).branch_evals(board);
        let dirs: Vec<Move> = branches.iter().map(|b| b.dir).collect();
        assert_eq!(dirs, Move::ALL.to_vec());
        let legal: Vec<bool> = branches.iter().map(|b| b.legal).collect();
        assert_eq!(legal, vec![false, true, false, true]);
    }

    #[test]
    fn it_is_reproducible_with_seed() {
        let board = Board::from_rows([[2, 0, 4, 0], [0, 8, 0, 2], [4, 0, 0, 0], [0, 2, 0, 16]]);
        let a = ExpectimaxParallel::with_seed(cfg(2), 42).branch_evals(board);
        let b = ExpectimaxParallel::with_seed(cfg(2), 42).branch_evals(board);
        assert_eq!(a, b);
    }

    #[test]
    fn it_prefers_corners() {
        let board = Board::from_rows([[0, 512, 0, 0], [0; 4], [0; 4], [0; 4]]);
        for seed in 0..10 {
            let m = ExpectimaxParallel::with_seed(cfg(1), seed).best_move(board);
            assert!(m == Move::Left || m == Move::Right, "picked {m}");
        }
    }

    #[test]
    fn it_counts_nodes_like_sequential() {
        let board = Board::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let mut ex = ExpectimaxParallel::with_seed(cfg(1), 0);
        ex.branch_evals(board);
        assert_eq!(ex.last_stats().nodes, 4 + 2 * 4);
    }
}
