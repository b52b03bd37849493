use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Side length of the (fixed) board.
pub const SIZE: usize = 4;
/// Tile value that wins the game.
pub const WIN_TILE: u32 = 2048;
/// The only value ever spawned.
pub const SPAWN_TILE: u32 = 2;

/// A single grid position: `None` is empty, otherwise a power of two.
pub type Cell = Option<u32>;
type Line = [Cell; SIZE];

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Every move, in the order the search iterates (and breaks ties) over them.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// True if the slide axis is the rows (horizontal moves).
    #[inline]
    pub fn row_wise(self) -> bool { matches!(self, Move::Left | Move::Right) }

    /// True if tiles travel toward index 0 along the slide axis.
    #[inline]
    pub fn toward_zero(self) -> bool { matches!(self, Move::Up | Move::Left) }

    /// Position of this move in [`Move::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Move::Up => 0,
            Move::Down => 1,
            Move::Left => 2,
            Move::Right => 3,
        }
    }

    #[inline]
    pub fn from_index(idx: usize) -> Option<Move> { Move::ALL.get(idx).copied() }

    pub fn name(self) -> &'static str {
        match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

/// A numeric move code outside `0..4`.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unknown move code {0}")]
pub struct UnknownMove(pub u8);

impl TryFrom<u8> for Move {
    type Error = UnknownMove;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Move::from_index(code as usize).ok_or(UnknownMove(code))
    }
}

/// Where a board stands in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Ongoing,
    Won,
    Lost,
}

impl Outcome {
    #[inline]
    pub fn is_terminal(self) -> bool { !matches!(self, Outcome::Ongoing) }
}

/// A 4x4 2048 board.
///
/// Boards are small `Copy` values: collapsing and spawning return a new
/// board and never touch the one the caller still holds for comparison.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cells: [Line; SIZE],
}

impl Board {
    /// A constant empty board.
    pub const EMPTY: Board = Board { cells: [[None; SIZE]; SIZE] };

    /// Build a board from plain values, `0` meaning empty.
    ///
    /// Intended for fixtures; real games only ever see values produced by
    /// [`Board::new_game`], spawning and collapsing.
    ///
    /// ```
    /// use term_2048::engine::Board;
    /// let b = Board::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0, 0, 0, 4]]);
    /// assert_eq!(b.get(0, 0), Some(2));
    /// assert_eq!(b.get(3, 3), Some(4));
    /// assert_eq!(b.count_empty(), 14);
    /// ```
    pub fn from_rows(rows: [[u32; SIZE]; SIZE]) -> Self {
        let mut cells = [[None; SIZE]; SIZE];
        for (out_row, row) in cells.iter_mut().zip(rows) {
            for (cell, val) in out_row.iter_mut().zip(row) {
                *cell = (val != 0).then_some(val);
            }
        }
        Board { cells }
    }

    /// Plain values, `0` for empty cells. Inverse of [`Board::from_rows`].
    pub fn to_rows(&self) -> [[u32; SIZE]; SIZE] {
        self.cells.map(|row| row.map(|cell| cell.unwrap_or(0)))
    }

    /// Starting board: keep writing a 2 into a uniformly random cell until
    /// exactly two cells hold a 2.
    ///
    /// Picking a cell that already holds a 2 is a no-op write and the loop
    /// simply rolls again.
    ///
    /// ```
    /// use term_2048::engine::Board;
    /// use rand::{rngs::StdRng, SeedableRng};
    /// let mut rng = StdRng::seed_from_u64(42);
    /// let b = Board::new_game(&mut rng);
    /// assert_eq!(b.tile_count(), 2);
    /// assert_eq!(b.tile_sum(), 4);
    /// ```
    pub fn new_game<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut board = Board::EMPTY;
        while board.count_value(SPAWN_TILE) < 2 {
            let (row, col) = (rng.gen_range(0..SIZE), rng.gen_range(0..SIZE));
            board.cells[row][col] = Some(SPAWN_TILE);
        }
        board
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Cell { self.cells[row][col] }

    /// Borrow the rows, top to bottom.
    #[inline]
    pub fn rows(&self) -> &[Line; SIZE] { &self.cells }

    /// Iterate `(row, col, value)` over occupied cells in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = (usize, usize, u32)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter().enumerate().filter_map(move |(c, cell)| cell.map(|v| (r, c, v)))
        })
    }

    /// True iff at least one cell of this board is empty.
    #[inline]
    pub fn has_space(&self) -> bool { self.cells.iter().flatten().any(Option::is_none) }

    pub fn count_empty(&self) -> usize { self.cells.iter().flatten().filter(|c| c.is_none()).count() }

    pub fn tile_count(&self) -> usize { SIZE * SIZE - self.count_empty() }

    /// Sum of all tile values. Collapsing never changes it; spawning adds 2.
    pub fn tile_sum(&self) -> u64 { self.tiles().map(|(_, _, v)| v as u64).sum() }

    /// Highest tile value on the board, 0 when empty.
    pub fn highest_tile(&self) -> u32 { self.tiles().map(|(_, _, v)| v).max().unwrap_or(0) }

    fn count_value(&self, value: u32) -> usize {
        self.cells.iter().flatten().filter(|&&c| c == Some(value)).count()
    }

    pub fn transpose(&self) -> Board {
        let mut cells = [[None; SIZE]; SIZE];
        for (r, row) in self.cells.iter().enumerate() {
            for (c, &cell) in row.iter().enumerate() {
                cells[c][r] = cell;
            }
        }
        Board { cells }
    }

    /// Return the board resulting from sliding/merging tiles in `dir` (no spawn).
    ///
    /// ```
    /// use term_2048::engine::{Board, Move};
    /// let b = Board::from_rows([[2, 2, 2, 2], [0; 4], [0; 4], [0; 4]]);
    /// assert_eq!(b.collapse(Move::Left).to_rows()[0], [4, 4, 0, 0]);
    /// assert_eq!(b.collapse(Move::Right).to_rows()[0], [0, 0, 4, 4]);
    /// ```
    pub fn collapse(self, dir: Move) -> Board {
        let oriented = if dir.row_wise() { self } else { self.transpose() };
        let collapsed = Board { cells: oriented.cells.map(|line| collapse_line(line, dir.toward_zero())) };
        if dir.row_wise() { collapsed } else { collapsed.transpose() }
    }

    /// Put a 2 into a uniformly random empty cell.
    ///
    /// Samples random coordinates until an empty one comes up.
    ///
    /// # Panics
    /// If the board has no empty cell.
    pub fn with_spawned_tile<R: Rng + ?Sized>(self, rng: &mut R) -> Board {
        assert!(self.has_space(), "spawn requested on a full board");
        let mut board = self;
        loop {
            let (row, col) = (rng.gen_range(0..SIZE), rng.gen_range(0..SIZE));
            if board.cells[row][col].is_none() {
                board.cells[row][col] = Some(SPAWN_TILE);
                return board;
            }
        }
    }

    /// Perform a move, then spawn a tile if the move changed the board and
    /// left room for one.
    ///
    /// A no-op move returns the board untouched: no tile is spawned.
    ///
    /// ```
    /// use term_2048::engine::{Board, Move};
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(1);
    /// let b = Board::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
    /// assert_eq!(b.make_move(Move::Left, &mut rng), b);
    /// assert_eq!(b.make_move(Move::Right, &mut rng).tile_count(), 2);
    /// ```
    pub fn make_move<R: Rng + ?Sized>(self, dir: Move, rng: &mut R) -> Board {
        let moved = self.collapse(dir);
        if moved != self && moved.has_space() { moved.with_spawned_tile(rng) } else { moved }
    }

    /// Classify the board as won, lost, or still in play.
    pub fn outcome(&self) -> Outcome {
        if self.cells.iter().flatten().any(|&c| c == Some(WIN_TILE)) {
            return Outcome::Won;
        }
        if self.has_space() {
            return Outcome::Ongoing;
        }
        // full, but a merge may still be available
        for board in [*self, self.transpose()] {
            for row in board.cells.iter() {
                if row.windows(2).any(|pair| pair[0] == pair[1]) {
                    return Outcome::Ongoing;
                }
            }
        }
        Outcome::Lost
    }

    /// Return true if no move changes the board.
    #[inline]
    pub fn is_stuck(&self) -> bool { Move::ALL.iter().all(|&dir| self.collapse(dir) == *self) }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:?})", self.to_rows())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.iter() {
            let line: Vec<String> = row.iter().map(format_cell).collect();
            writeln!(f, "{}", line.join("\t"))?;
        }
        Ok(())
    }
}

/// Text for a cell: the value, or `.` when empty.
pub fn format_cell(cell: &Cell) -> String {
    match cell {
        Some(v) => v.to_string(),
        None => String::from("."),
    }
}

/// Starting board using the thread-local RNG.
pub fn new_game() -> Board {
    let mut rng = rand::thread_rng();
    Board::new_game(&mut rng)
}

/// Slide/merge tiles in the given direction. No randomness.
pub fn collapse(board: Board, direction: Move) -> Board { board.collapse(direction) }

/// Perform a move then spawn a tile if the move changed the board (uses thread RNG).
///
/// For reproducible behavior, prefer `Board::make_move(dir, &mut impl Rng)`.
pub fn make_move(board: Board, direction: Move) -> Board {
    let mut rng = rand::thread_rng();
    board.make_move(direction, &mut rng)
}

pub fn outcome(board: Board) -> Outcome { board.outcome() }

fn collapse_line(line: Line, toward_zero: bool) -> Line {
    let mut tiles: Vec<u32> = line.iter().flatten().copied().collect();
    if !toward_zero {
        tiles.reverse();
    }
    let mut merged: Vec<u32> = Vec::with_capacity(SIZE);
    let mut prev = None;
    for tile in tiles {
        if prev == Some(tile) {
            // a merged tile never merges again in the same pass
            if let Some(last) = merged.last_mut() {
                *last = tile * 2;
            }
            prev = None;
        } else {
            merged.push(tile);
            prev = Some(tile);
        }
    }
    let mut out: Line = [None; SIZE];
    for (slot, tile) in out.iter_mut().zip(merged) {
        *slot = Some(tile);
    }
    if !toward_zero {
        out.reverse();
    }
    out
}
