//! The game state contract consumed by the search
//!
//! A rules engine implements [`GameState`] for its state type. The search only
//! ever clones states, enumerates and applies moves, and reads terminal results;
//! everything else about the game stays behind this trait.

use std::fmt;

use crate::error::AdapterError;

/// One of the two seats at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// Both players, in seating order.
    pub const ALL: [Player; 2] = [Player::One, Player::Two];

    /// The other player.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Zero-based seat index, handy for indexing per-player arrays.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "player 1"),
            Player::Two => write!(f, "player 2"),
        }
    }
}

/// Move types usable as tree edges.
///
/// The search treats moves as opaque tokens: it stores them, compares them and
/// hands them back to the state. The single thing it asks of a move is whether
/// it closes a decision context.
pub trait GameMove: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Whether this move deterministically ends a decision context (for example
    /// ending a turn or starting the match).
    ///
    /// Nodes reached through such a move get an empty untried list, so the tree
    /// does not fan out over the many symmetric follow-up states; they are
    /// evaluated by rollouts only.
    fn closes_decision(&self) -> bool {
        false
    }
}

/// Main trait for rules engines driven by the search
///
/// # Contract
///
/// * `clone()` returns a fully independent state. Mutating a clone must never
///   affect the source. Immutable shared data (a card catalogue behind an `Arc`)
///   is fine; shared *mutable* data is a contract violation. Cloning should cost
///   O(state size), never O(game history), since it happens once per iteration.
/// * `legal_moves()` is deterministic for identical state content and returns an
///   empty vector exactly when the state is terminal. Randomness already revealed
///   into the state (a shuffled library, an embedded generator) is part of that
///   content.
/// * `do_move()` is atomic: it either applies the move completely or returns
///   [`AdapterError::IllegalMove`] with the state untouched.
/// * `result()` is only meaningful on terminal states and returns 1.0 for a win,
///   0.0 for a loss and 0.5 for a draw from `perspective`'s point of view.
/// * No I/O and no side effects beyond mutating `self`.
pub trait GameState: Clone + Send + Sync + fmt::Debug + 'static {
    /// Move type for this game
    type Move: GameMove;

    /// The player to act next.
    fn current_player(&self) -> Player;

    /// The player who made the most recent move.
    ///
    /// At the start of a game this is the player who does *not* move first.
    fn player_just_moved(&self) -> Player;

    /// All legal moves, in a deterministic order.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Apply a move in place.
    fn do_move(&mut self, mv: &Self::Move) -> Result<(), AdapterError>;

    /// Terminal result from `perspective`'s point of view, in `[0.0, 1.0]`.
    fn result(&self, perspective: Player) -> f64;

    /// Whether the game is over.
    ///
    /// Rules engines with a cheaper terminal test should override this, keeping
    /// it consistent with `legal_moves()`.
    fn is_terminal(&self) -> bool {
        self.legal_moves().is_empty()
    }
}
