//! term-2048: the 2048 sliding-tile game for the terminal, with a sampling
//! expectimax AI.
//!
//! This crate provides:
//! - A `Board` value type with the game rules (`collapse`, `make_move`, `outcome`, ...)
//! - A sampling expectimax AI (`expectimax` module) with single-threaded and parallel variants
//! - A turn loop (`game`) driven by pluggable players (`player`) and renderers (`render`)
//! - TOML configuration (`config`) and error types (`error`)
//!
//! Quick start:
//! ```
//! use term_2048::engine::{Board, Move, Outcome};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic board initialization with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let b0 = Board::new_game(&mut rng);
//! let b1 = b0.collapse(Move::Left);
//! assert_eq!(b1.tile_sum(), b0.tile_sum());
//! assert_eq!(b0.outcome(), Outcome::Ongoing);
//! ```
//!
//! Note: there are also free functions mirroring the `Board` methods
//! (e.g., `engine::collapse`, `engine::make_move`) that use thread-local RNG
//! where relevant. Prefer the methods when you need determinism.
//!
//! Full loop (simplest possible)
//! ```
//! use term_2048::engine::Outcome;
//! use term_2048::expectimax::ExpectimaxConfig;
//! use term_2048::game::{Game, GameOptions};
//! use term_2048::player::SearchPlayer;
//! use term_2048::render::TerminalRenderer;
//!
//! // 1) Seeded game and a shallow search player
//! let mut game = Game::with_seed(123);
//! let cfg = ExpectimaxConfig { depth: 1, ..Default::default() };
//! let mut player = SearchPlayer::with_seed(cfg, 123);
//!
//! // 2) Render into a buffer instead of the terminal, and cap the run
//! let mut renderer = TerminalRenderer::new(Vec::new(), false);
//! let opts = GameOptions { max_turns: Some(20) };
//! let summary = game.run(&mut player, &mut renderer, opts).unwrap();
//!
//! // 3) Inspect the result
//! assert!(summary.turns <= 20);
//! assert!(summary.highest_tile >= 2);
//! ```
//!
pub mod config;
pub mod engine;
pub mod error;
pub mod expectimax;
pub mod game;
pub mod player;
pub mod render;
