use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engine::{Board, Move};

use super::heuristic::score_state;
use super::{log_branches, no_op_penalty, pick_best, BranchEval, ExpectimaxConfig, SearchStats};

/// Single-threaded sampling expectimax.
///
/// Owns the RNG used to sample spawn positions; seed it with
/// [`Expectimax::with_seed`] for reproducible decisions.
pub struct Expectimax {
    cfg: ExpectimaxConfig,
    stats: SearchStats,
    rng: StdRng,
}

impl Expectimax {
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
    /// Always returns a move: on a stuck board every branch carries the same
    /// penalty and the first move wins.
    ///
    /// Example
    /// ```
    /// use term_2048::engine::{Board, Move};
    /// use term_2048::expectimax::{Expectimax, ExpectimaxConfig};
    /// let stuck = Board::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
    /// let mut ex = Expectimax::with_seed(ExpectimaxConfig::default(), 1);
    /// assert_eq!(ex.best_move(stuck), Move::Up);
    /// ```
    pub fn best_move(&mut self, board: Board) -> Move {
        let branches = self.branch_evals(board);
        let choice = pick_best(&branches);
        log_branches("expectimax", &branches, choice);
        choice
    }

    /// Score every direction at the root.
    ///
    /// Returns a fixed array in order: `[Up, Down, Left, Right]` and marks
    /// no-op moves as `legal=false`.
    pub fn branch_evals(&mut self, board: Board) -> [BranchEval; 4] {
        let depth = self.cfg.depth.max(1);
        let mut nodes = 0u64;
        let out = Move::ALL.map(|dir| self.evaluate_move(board, dir, depth, &mut nodes));
        self.stats.record(nodes);
        out
    }

    /// Statistics collected from the last call to [`Self::best_move`] or
    /// [`Self::branch_evals`].
    #[inline]
    pub fn last_stats(&self) -> SearchStats { self.stats }

    /// Reset accumulated stats to zero.
    #[inline]
    pub fn reset_stats(&mut self) { self.stats = SearchStats::default(); }

    fn evaluate_move(&mut self, board: Board, dir: Move, depth: u32, nodes: &mut u64) -> BranchEval {
        *nodes += 1;
        if board.collapse(dir) == board {
            return BranchEval { dir, ev: no_op_penalty(depth), legal: false };
        }
        let samples = self.cfg.samples.max(1);
        let mut total = 0.0;
        for _ in 0..samples {
            // every call re-rolls the spawn position
            let sample = board.make_move(dir, &mut self.rng);
            total += if depth <= 1 {
                *nodes += 1;
                score_state(&sample)
            } else {
                self.best_score(sample, depth - 1, nodes)
            };
        }
        BranchEval { dir, ev: total / samples as f64, legal: true }
    }

    fn best_score(&mut self, board: Board, depth: u32, nodes: &mut u64) -> f64 {
        let mut best = f64::NEG_INFINITY;
        for dir in Move::ALL {
            best = best.max(self.evaluate_move(board, dir, depth, nodes).ev);
        }
        best
    }
}

impl Default for Expectimax { fn default() -> Self { Self::new() } }

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expectimax::NO_OP_PENALTY;

    fn cfg(depth: u32) -> ExpectimaxConfig { ExpectimaxConfig { depth, ..Default::default() } }

    #[test]
    fn it_returns_first_move_when_stuck() {
        let stuck = Board::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        let mut ex = Expectimax::with_seed(cfg(2), 3);
        let branches = ex.branch_evals(stuck);
        for b in branches {
            assert!(!b.legal);
            assert_eq!(b.ev, NO_OP_PENALTY - 2.0);
        }
        assert_eq!(ex.best_move(stuck), Move::Up);
    }

    #[test]
    fn it_only_picks_changing_moves() {
        // only Up and Left change this board
        let board = Board::from_rows([[0, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        for seed in 0..10 {
            let mut ex = Expectimax::with_seed(cfg(2), seed);
            let m = ex.best_move(board);
            assert!(m == Move::Up || m == Move::Left, "picked {m}");
        }
        let branches = Expectimax::with_seed(cfg(1), 0).branch_evals(board);
        let legal: Vec<Move> = branches.iter().filter(|b| b.legal).map(|b| b.dir).collect();
        assert_eq!(legal, vec![Move::Up, Move::Left]);
    }

    #[test]
    fn it_prefers_corners() {
        let board = Board::from_rows([[0, 512, 0, 0], [0; 4], [0; 4], [0; 4]]);
        for seed in 0..10 {
            let mut ex = Expectimax::with_seed(cfg(1), seed);
            let m = ex.best_move(board);
            assert!(m == Move::Left || m == Move::Right, "picked {m}");
        }
    }

    #[test]
    fn it_is_reproducible_with_seed() {
        let board = Board::from_rows([[2, 0, 4, 0], [0, 8, 0, 2], [4, 0, 0, 0], [0, 2, 0, 16]]);
        let a = Expectimax::with_seed(cfg(2), 42).branch_evals(board);
        let b = Expectimax::with_seed(cfg(2), 42).branch_evals(board);
        assert_eq!(a, b);
    }

    #[test]
    fn it_counts_nodes() {
        let board = Board::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let mut ex = Expectimax::with_seed(cfg(1), 0);
        ex.branch_evals(board);
        // 4 root branches, 2 legal with 4 scored samples each
        assert_eq!(ex.last_stats().nodes, 4 + 2 * 4);
        assert_eq!(ex.last_stats().peak_nodes, 12);
        ex.reset_stats();
        assert_eq!(ex.last_stats(), SearchStats::default());
    }
}
