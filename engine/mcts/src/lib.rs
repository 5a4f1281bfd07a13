//! Anytime UCT Monte Carlo Tree Search.
//!
//! This crate provides a game-agnostic UCT implementation that works with any
//! game implementing the `engine-core` [`GameState`](engine_core::GameState) trait.
//!
//! # Overview
//!
//! UCT builds a search tree by running iterations. Each iteration consists of
//! four phases:
//!
//! 1. **Selection**: Traverse the tree using UCB1 to balance exploration and
//!    exploitation, replaying moves on a clone of the root state
//! 2. **Expansion**: Pick one untried move and build a child for it
//! 3. **Simulation**: Play random moves (or a custom [`RolloutPolicy`]) until
//!    the game ends
//! 4. **Backpropagation**: Update visit counts and results along the path from
//!    leaf to root, each node from the point of view of the player who moved
//!    into it
//!
//! The final move is the most visited root child (robust child). The search is
//! anytime: it can be stopped by its time budget or a [`CancelToken`] at any
//! iteration boundary and still answers.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mcts::{run_uct, MctsConfig, UniformRollout};
//! use rand_chacha::ChaCha20Rng;
//! use rand::SeedableRng;
//!
//! let state = games_tictactoe::TicTacToe::new();
//! let config = MctsConfig::default().with_iterations(1_000);
//!
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//! let result = run_uct(&state, &UniformRollout, config, &mut rng, None).unwrap();
//!
//! println!("{}", result);
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `budget`: wall-clock time or a fixed iteration count (default: 1 second)
//! - `exploration`: UCB1 exploration constant C (default: √2)
//! - `max_rollout_moves`: rollout length cap (default: 10 000)
//! - `workers`: number of root-parallel searches (default: 1)
//! - `verify_adapter`: run state contract checks while searching (default: on)
//!
//! # Errors
//!
//! An illegal move inside an iteration discards that iteration and leaves the
//! tree untouched. Contract violations and configuration problems surface as
//! [`SearchError`].

pub mod config;
pub mod node;
pub mod parallel;
pub mod report;
pub mod rollout;
pub mod search;
pub mod tree;

#[cfg(test)]
mod test_games;

// Re-export main types
pub use config::{MctsConfig, SearchBudget};
pub use node::{MctsNode, NodeId};
pub use parallel::run_root_parallel;
pub use report::ChildStats;
pub use rollout::{RolloutPolicy, UniformRollout};
pub use search::{
    run_uct, CancelToken, IterationOutcome, SearchError, SearchResult, SearchStats, UctSearch,
};
pub use tree::{MctsTree, TreeStats};
