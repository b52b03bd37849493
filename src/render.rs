//! Drawing boards and results on a terminal.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::queue;

use crate::engine::{format_cell, Board, Outcome};
use crate::game::GameSummary;

/// Output side of the game loop.
pub trait Renderer {
    /// Show the current board.
    fn render(&mut self, board: &Board) -> io::Result<()>;

    /// Report how the game ended.
    fn announce(&mut self, summary: &GameSummary) -> io::Result<()>;
}

/// Presentation color for a tile value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileColor {
    Plain,
    Green,
    Red,
    Blue,
    Yellow,
    Magenta,
    Gray,
    Cyan,
}

/// Color for a tile value; values without an entry are drawn plain.
pub fn tile_color(value: u32) -> TileColor {
    match value {
        2 | 256 => TileColor::Green,
        4 | 1024 => TileColor::Red,
        8 => TileColor::Blue,
        16 | 2048 => TileColor::Yellow,
        32 | 512 => TileColor::Magenta,
        64 => TileColor::Gray,
        128 => TileColor::Cyan,
        _ => TileColor::Plain,
    }
}

impl TileColor {
    fn terminal_color(self) -> Option<Color> {
        match self {
            TileColor::Plain => None,
            TileColor::Green => Some(Color::DarkGreen),
            TileColor::Red => Some(Color::DarkRed),
            TileColor::Blue => Some(Color::DarkBlue),
            TileColor::Yellow => Some(Color::DarkYellow),
            TileColor::Magenta => Some(Color::DarkMagenta),
            TileColor::Gray => Some(Color::Grey),
            TileColor::Cyan => Some(Color::DarkCyan),
        }
    }
}

/// Draws nothing. For headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _board: &Board) -> io::Result<()> { Ok(()) }

    fn announce(&mut self, _summary: &GameSummary) -> io::Result<()> { Ok(()) }
}

/// Line-oriented renderer: one row per line, tab-separated cells.
pub struct TerminalRenderer<W: Write> {
    out: W,
    clear: bool,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout(clear: bool) -> Self { Self::new(io::stdout(), clear) }
}

impl<W: Write> TerminalRenderer<W> {
    /// `clear` wipes the screen and homes the cursor before each board.
    pub fn new(out: W, clear: bool) -> Self { TerminalRenderer { out, clear } }

    pub fn into_inner(self) -> W { self.out }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, board: &Board) -> io::Result<()> {
        if self.clear {
            queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        for row in board.rows() {
            for cell in row {
                let text = format_cell(cell);
                match cell.and_then(|v| tile_color(v).terminal_color()) {
                    Some(color) => queue!(self.out, SetForegroundColor(color), Print(text), ResetColor)?,
                    None => queue!(self.out, Print(text))?,
                }
                queue!(self.out, Print("\t"))?;
            }
            queue!(self.out, Print("\n"))?;
        }
        queue!(self.out, Print("\n\n"))?;
        self.out.flush()
    }

    fn announce(&mut self, summary: &GameSummary) -> io::Result<()> {
        match summary.outcome {
            Outcome::Won => writeln!(self.out, "YOU WIN!!!!!")?,
            Outcome::Lost => writeln!(self.out, "GAME OVER, MAN!")?,
            Outcome::Ongoing => writeln!(self.out, "Stopped after {} turns.", summary.turns)?,
        }
        self.out.flush()
    }
}
