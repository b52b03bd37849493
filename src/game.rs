//! Turn loop: ask a [`Player`] for a move, apply it, redraw, repeat until the
//! board is won or lost.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engine::{Board, Move, Outcome};
use crate::error::PlayError;
use crate::player::Player;
use crate::render::Renderer;

/// Knobs for a single run of the loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameOptions {
    /// Stop after this many turns; the summary then reports `Ongoing`.
    pub max_turns: Option<u64>,
}

/// What a finished (or stopped) game looked like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    pub outcome: Outcome,
    /// Moves requested from the player, no-ops included.
    pub turns: u64,
    /// Moves that changed the board.
    pub moves_applied: u64,
    pub highest_tile: u32,
    pub tile_sum: u64,
}

/// A game in progress. Owns the board and the RNG that places new tiles.
pub struct Game {
    board: Board,
    rng: StdRng,
    turns: u64,
    moves_applied: u64,
}

impl Game {
    /// Start from a fresh two-tile board.
    pub fn new(mut rng: StdRng) -> Self {
        let board = Board::new_game(&mut rng);
        Self::from_board(board, rng)
    }

    pub fn with_seed(seed: u64) -> Self { Self::new(StdRng::seed_from_u64(seed)) }

    /// Resume from an arbitrary board.
    pub fn from_board(board: Board, rng: StdRng) -> Self {
        Game { board, rng, turns: 0, moves_applied: 0 }
    }

    #[inline]
    pub fn board(&self) -> &Board { &self.board }

    #[inline]
    pub fn outcome(&self) -> Outcome { self.board.outcome() }

    #[inline]
    pub fn turns(&self) -> u64 { self.turns }

    /// Play one turn. Returns true if the move changed the board.
    ///
    /// A no-op move still uses up the turn, but nothing spawns.
    pub fn step(&mut self, dir: Move) -> bool {
        self.turns += 1;
        let next = self.board.make_move(dir, &mut self.rng);
        let changed = next != self.board;
        if changed {
            self.moves_applied += 1;
            self.board = next;
            log::debug!("turn {}: {dir}, highest tile {}", self.turns, self.board.highest_tile());
        } else {
            log::trace!("turn {}: {dir} changed nothing", self.turns);
        }
        changed
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            outcome: self.outcome(),
            turns: self.turns,
            moves_applied: self.moves_applied,
            highest_tile: self.board.highest_tile(),
            tile_sum: self.board.tile_sum(),
        }
    }

    /// Drive the game to a terminal outcome (or the turn cap), rendering
    /// after every turn and announcing the result at the end.
    ///
    /// A [`PlayError::Quit`] from the player stops the loop immediately and
    /// is returned as-is; nothing is announced.
    ///
    /// ```
    /// use term_2048::engine::{Board, Outcome};
    /// use term_2048::game::{Game, GameOptions};
    /// use term_2048::player::RandomPlayer;
    /// use term_2048::render::TerminalRenderer;
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let mut game = Game::new(StdRng::seed_from_u64(3));
    /// let mut player = RandomPlayer::with_seed(4);
    /// let mut renderer = TerminalRenderer::new(Vec::new(), false);
    /// let summary = game.run(&mut player, &mut renderer, GameOptions::default()).unwrap();
    /// assert_ne!(summary.outcome, Outcome::Ongoing);
    /// ```
    pub fn run<P, R>(&mut self, player: &mut P, renderer: &mut R, options: GameOptions) -> Result<GameSummary, PlayError>
    where
        P: Player + ?Sized,
        R: Renderer + ?Sized,
    {
        log::info!("starting game with {} player", player.name());
        renderer.render(&self.board)?;
        while self.outcome() == Outcome::Ongoing {
            if options.max_turns.is_some_and(|cap| self.turns >= cap) {
                log::info!("turn cap of {} reached", self.turns);
                break;
            }
            let dir = player.next_move(&self.board)?;
            self.step(dir);
            renderer.render(&self.board)?;
        }
        let summary = self.summary();
        log::info!(
            "game over: {:?} after {} turns ({} moves), highest tile {}",
            summary.outcome,
            summary.turns,
            summary.moves_applied,
            summary.highest_tile
        );
        renderer.announce(&summary)?;
        Ok(summary)
    }
}
