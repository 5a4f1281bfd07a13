//! TicTacToe game implementation for the search engine
//!
//! This crate provides a small reference implementation of the
//! [`GameState`] contract. It is cheap to clone and has a tiny action space,
//! which makes it the workhorse for search tests and benchmarks.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::GameState;
//! use games_tictactoe::{Cell, TicTacToe};
//!
//! let mut state = TicTacToe::new();
//! assert_eq!(state.legal_moves().len(), 9);
//!
//! state.do_move(&Cell(4)).unwrap();
//! assert!(state.do_move(&Cell(4)).is_err());
//! ```

use std::fmt;

use engine_core::game_utils::{result_for, Outcome};
use engine_core::{AdapterError, GameMove, GameState, Player};

/// Place a mark on board position 0-8 (row-major).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell(pub u8);

impl GameMove for Cell {}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell {}", self.0)
    }
}

// Winning positions (rows, columns, diagonals)
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// TicTacToe game state
///
/// Player One plays X and moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicTacToe {
    board: [Option<Player>; 9],
    current: Player,
    outcome: Option<Outcome>,
}

impl TicTacToe {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            board: [None; 9],
            current: Player::One,
            outcome: None,
        }
    }

    /// Play a sequence of cells from the empty board.
    pub fn from_cells(cells: &[u8]) -> Result<Self, AdapterError> {
        let mut state = Self::new();
        for &cell in cells {
            state.do_move(&Cell(cell))?;
        }
        Ok(state)
    }

    /// Mark at a board position, if any.
    pub fn at(&self, cell: u8) -> Option<Player> {
        self.board.get(cell as usize).copied().flatten()
    }

    /// How the game ended, `None` while it is running.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    fn check_outcome(board: &[Option<Player>; 9]) -> Option<Outcome> {
        for [a, b, c] in LINES {
            if let Some(player) = board[a] {
                if board[b] == Some(player) && board[c] == Some(player) {
                    return Some(Outcome::Winner(player));
                }
            }
        }

        // Board full but no winner
        if board.iter().all(Option::is_some) {
            return Some(Outcome::Draw);
        }

        None
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState for TicTacToe {
    type Move = Cell;

    fn current_player(&self) -> Player {
        self.current
    }

    fn player_just_moved(&self) -> Player {
        self.current.opponent()
    }

    fn legal_moves(&self) -> Vec<Cell> {
        if self.outcome.is_some() {
            return Vec::new();
        }
        (0..9u8)
            .filter(|&pos| self.board[pos as usize].is_none())
            .map(Cell)
            .collect()
    }

    fn do_move(&mut self, mv: &Cell) -> Result<(), AdapterError> {
        if self.outcome.is_some() {
            return Err(AdapterError::illegal(mv, "game is over"));
        }
        let Some(slot) = self.board.get_mut(mv.0 as usize) else {
            return Err(AdapterError::illegal(mv, "position out of range"));
        };
        if slot.is_some() {
            return Err(AdapterError::illegal(mv, "position occupied"));
        }

        *slot = Some(self.current);
        self.outcome = Self::check_outcome(&self.board);
        self.current = self.current.opponent();
        Ok(())
    }

    fn result(&self, perspective: Player) -> f64 {
        result_for(self.outcome, perspective)
    }

    fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }
}

impl fmt::Display for TicTacToe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            let marks: Vec<&str> = (0..3)
                .map(|col| match self.board[row * 3 + col] {
                    Some(Player::One) => "X",
                    Some(Player::Two) => "O",
                    None => ".",
                })
                .collect();
            writeln!(f, "{}", marks.join(" "))?;
        }
        Ok(())
    }
}
