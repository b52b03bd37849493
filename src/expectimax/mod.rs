//! Sampling expectimax policy (single-threaded and parallel) for 2048.
//!
//! The search looks `depth` moves ahead. For every move that changes the
//! board it draws `samples` independent spawn outcomes, recurses on each,
//! and averages: the expectation is over where the new tile lands, not over
//! an opponent. Leaves are scored with [`score_state`], a corner-weighted
//! heuristic. Moves that leave the board untouched get a large negative
//! score so they only win when nothing else is possible.
//!
//! Two implementations share the same surface:
//! - [`Expectimax`]: single-threaded.
//! - [`ExpectimaxParallel`]: rayon-based; every branch samples from its own
//!   seeded RNG, so a seeded search is reproducible.
//!
//! Cost grows as `(4 * samples)^depth`; keep `depth` small for interactive
//! play.
//!
//! Quick start
//! ```
//! use term_2048::engine::Board;
//! use term_2048::expectimax::{Expectimax, ExpectimaxConfig, ExpectimaxParallel};
//!
//! let b = Board::from_rows([[2, 2, 0, 0], [0; 4], [0, 4, 0, 0], [0; 4]]);
//! let cfg = ExpectimaxConfig { depth: 2, ..Default::default() };
//!
//! let mut ex = Expectimax::with_seed(cfg.clone(), 7);
//! let m = ex.best_move(b);
//! assert_ne!(b.collapse(m), b);
//!
//! let mut ex_par = ExpectimaxParallel::with_seed(cfg, 7);
//! let m_par = ex_par.best_move(b);
//! assert_ne!(b.collapse(m_par), b);
//! ```

use serde::{Deserialize, Serialize};

use crate::engine::Move;

mod heuristic;
mod search_par;
mod search_seq;

pub use heuristic::score_state;
pub use search_par::ExpectimaxParallel;
pub use search_seq::Expectimax;

/// Base score of a move that does not change the board.
pub const NO_OP_PENALTY: f64 = -1e10;

/// Configurable knobs for the search.
///
/// - `depth`: moves to look ahead (at least 1).
/// - `samples`: spawn outcomes drawn per move and level.
/// - `parallel`: pick [`ExpectimaxParallel`] over [`Expectimax`] when a
///   player builds its engine from this config.
/// - `par_min_depth`: the parallel search only fans out at levels with at
///   least this much remaining depth; shallower levels run inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpectimaxConfig {
    pub depth: u32,
    pub samples: usize,
    pub parallel: bool,
    pub par_min_depth: u32,
}

impl Default for ExpectimaxConfig {
    fn default() -> Self {
        Self { depth: 3, samples: 4, parallel: false, par_min_depth: 2 }
    }
}

/// Per-branch score at the root.
///
/// - `ev` is the averaged sampled score for taking `dir`.
/// - `legal` is false when the move is a no-op for the current board; `ev`
///   then holds the no-op penalty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchEval {
    pub dir: Move,
    pub ev: f64,
    pub legal: bool,
}

/// Basic search stats for a single evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub peak_nodes: u64,
}

impl SearchStats {
    fn record(&mut self, nodes: u64) {
        self.nodes = nodes;
        self.peak_nodes = self.peak_nodes.max(nodes);
    }
}

/// Penalty for a no-op move with `depth` levels left to search.
///
/// Deeper no-ops are penalised slightly more, so a subtree that ends up
/// stuck sooner still compares as worse.
#[inline]
pub(crate) fn no_op_penalty(depth: u32) -> f64 { NO_OP_PENALTY - depth as f64 }

/// Highest `ev` wins; ties go to the earliest move in [`Move::ALL`] order.
pub(crate) fn pick_best(branches: &[BranchEval; 4]) -> Move {
    let mut best = branches[0];
    for branch in &branches[1..] {
        if branch.ev > best.ev {
            best = *branch;
        }
    }
    best.dir
}

pub(crate) fn log_branches(label: &str, branches: &[BranchEval; 4], choice: Move) {
    if log::log_enabled!(log::Level::Debug) {
        let evs: Vec<String> = branches
            .iter()
            .map(|b| if b.legal { format!("{}={:.1}", b.dir, b.ev) } else { format!("{}=noop", b.dir) })
            .collect();
        log::debug!("{label}: [{}] -> {choice}", evs.join(", "));
    }
}
