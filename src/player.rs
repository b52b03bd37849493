//! Move sources: keyboard, search AI, and random play.

use std::io;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::{Board, Move};
use crate::error::PlayError;
use crate::expectimax::{Expectimax, ExpectimaxConfig, ExpectimaxParallel};

/// Anything that can choose the next move for a board.
pub trait Player {
    /// Choose a move. May block (keyboard) or compute (search).
    ///
    /// Returns [`PlayError::Quit`] when the player wants to leave.
    fn next_move(&mut self, board: &Board) -> Result<Move, PlayError>;

    /// Player name for display and logs.
    fn name(&self) -> &str;
}

/// What a key press means to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Move(Move),
    Quit,
}

/// Map a key press to an action; `None` for keys the game ignores.
///
/// `w`/`a`/`s`/`d` and the arrow keys move, `q` and Ctrl-C quit.
pub fn key_action(key: KeyEvent) -> Option<KeyAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(KeyAction::Quit);
    }
    let dir = match key.code {
        KeyCode::Char('w') | KeyCode::Up => Move::Up,
        KeyCode::Char('s') | KeyCode::Down => Move::Down,
        KeyCode::Char('a') | KeyCode::Left => Move::Left,
        KeyCode::Char('d') | KeyCode::Right => Move::Right,
        KeyCode::Char('q') => return Some(KeyAction::Quit),
        _ => return None,
    };
    Some(KeyAction::Move(dir))
}

/// Keeps the terminal in raw mode while alive.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(RawModeGuard)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Reads single key presses from the terminal.
///
/// Raw mode is only held while waiting for a key, so rendering in between
/// behaves like normal line output.
#[derive(Debug, Default)]
pub struct KeyboardPlayer;

impl KeyboardPlayer {
    pub fn new() -> Self { KeyboardPlayer }
}

impl Player for KeyboardPlayer {
    fn next_move(&mut self, _board: &Board) -> Result<Move, PlayError> {
        let _raw = RawModeGuard::enable()?;
        loop {
            let Event::Key(key) = event::read()? else { continue };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key_action(key) {
                Some(KeyAction::Move(dir)) => return Ok(dir),
                Some(KeyAction::Quit) => return Err(PlayError::Quit),
                None => log::trace!("ignoring key {:?}", key.code),
            }
        }
    }

    fn name(&self) -> &str { "Human" }
}

enum SearchEngine {
    Sequential(Expectimax),
    Parallel(ExpectimaxParallel),
}

/// Plays the move chosen by the sampling expectimax search.
pub struct SearchPlayer {
    engine: SearchEngine,
    delay: Duration,
}

impl SearchPlayer {
    /// Build the sequential or parallel engine as `cfg.parallel` asks.
    pub fn new(cfg: ExpectimaxConfig) -> Self {
        let engine = if cfg.parallel {
            SearchEngine::Parallel(ExpectimaxParallel::with_config(cfg))
        } else {
            SearchEngine::Sequential(Expectimax::with_config(cfg))
        };
        SearchPlayer { engine, delay: Duration::ZERO }
    }

    pub fn with_seed(cfg: ExpectimaxConfig, seed: u64) -> Self {
        let engine = if cfg.parallel {
            SearchEngine::Parallel(ExpectimaxParallel::with_seed(cfg, seed))
        } else {
            SearchEngine::Sequential(Expectimax::with_seed(cfg, seed))
        };
        SearchPlayer { engine, delay: Duration::ZERO }
    }

    /// Sleep this long after each decision.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Nodes visited by the most recent decision.
    pub fn last_nodes(&self) -> u64 {
        match &self.engine {
            SearchEngine::Sequential(ex) => ex.last_stats().nodes,
            SearchEngine::Parallel(ex) => ex.last_stats().nodes,
        }
    }
}

impl Player for SearchPlayer {
    fn next_move(&mut self, board: &Board) -> Result<Move, PlayError> {
        let dir = match &mut self.engine {
            SearchEngine::Sequential(ex) => ex.best_move(*board),
            SearchEngine::Parallel(ex) => ex.best_move(*board),
        };
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        Ok(dir)
    }

    fn name(&self) -> &str {
        match self.engine {
            SearchEngine::Sequential(_) => "Expectimax",
            SearchEngine::Parallel(_) => "Expectimax (parallel)",
        }
    }
}

/// Picks a uniformly random move every turn.
pub struct RandomPlayer {
    rng: StdRng,
    delay: Duration,
}

impl RandomPlayer {
    pub fn new() -> Self {
        RandomPlayer { rng: StdRng::from_entropy(), delay: Duration::ZERO }
    }

    pub fn with_seed(seed: u64) -> Self {
        RandomPlayer { rng: StdRng::seed_from_u64(seed), delay: Duration::ZERO }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Default for RandomPlayer {
    fn default() -> Self { Self::new() }
}

impl Player for RandomPlayer {
    fn next_move(&mut self, _board: &Board) -> Result<Move, PlayError> {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        Ok(Move::ALL[self.rng.gen_range(0..Move::ALL.len())])
    }

    fn name(&self) -> &str { "Random" }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

    #[test]
    fn test_key_mapping() {
        assert_eq!(key_action(press(KeyCode::Char('w'))), Some(KeyAction::Move(Move::Up)));
        assert_eq!(key_action(press(KeyCode::Up)), Some(KeyAction::Move(Move::Up)));
        assert_eq!(key_action(press(KeyCode::Char('s'))), Some(KeyAction::Move(Move::Down)));
        assert_eq!(key_action(press(KeyCode::Down)), Some(KeyAction::Move(Move::Down)));
        assert_eq!(key_action(press(KeyCode::Char('a'))), Some(KeyAction::Move(Move::Left)));
        assert_eq!(key_action(press(KeyCode::Left)), Some(KeyAction::Move(Move::Left)));
        assert_eq!(key_action(press(KeyCode::Char('d'))), Some(KeyAction::Move(Move::Right)));
        assert_eq!(key_action(press(KeyCode::Right)), Some(KeyAction::Move(Move::Right)));
    }

    #[test]
    fn test_quit_and_ignored_keys() {
        assert_eq!(key_action(press(KeyCode::Char('q'))), Some(KeyAction::Quit));
        assert_eq!(key_action(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)), Some(KeyAction::Quit));
        assert_eq!(key_action(KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL)), None);
        assert_eq!(key_action(press(KeyCode::Char('x'))), None);
        assert_eq!(key_action(press(KeyCode::Enter)), None);
    }

    #[test]
    fn test_random_player_is_seeded() {
        let board = Board::EMPTY;
        let mut a = RandomPlayer::with_seed(12);
        let mut b = RandomPlayer::with_seed(12);
        for _ in 0..50 {
            assert_eq!(a.next_move(&board).unwrap(), b.next_move(&board).unwrap());
        }
        assert_eq!(a.name(), "Random");
    }

    #[test]
    fn test_search_player_picks_engine() {
        let seq = SearchPlayer::with_seed(ExpectimaxConfig::default(), 1);
        assert_eq!(seq.name(), "Expectimax");
        let par = SearchPlayer::with_seed(ExpectimaxConfig { parallel: true, ..Default::default() }, 1);
        assert_eq!(par.name(), "Expectimax (parallel)");
    }

    #[test]
    fn test_search_player_moves_legally() {
        let cfg = ExpectimaxConfig { depth: 1, ..Default::default() };
        let mut player = SearchPlayer::with_seed(cfg, 4);
        let board = Board::from_rows([[0, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        let dir = player.next_move(&board).unwrap();
        assert_ne!(board.collapse(dir), board);
        assert!(player.last_nodes() > 0);
    }
}
