//! Core traits and types shared by the search engine and the rules engines
//!
//! This crate provides the boundary between the UCT search and any game it plays:
//! - `GameState`: the clone / enumerate / apply / evaluate contract a rules engine exposes
//! - `GameMove`: the move-level hook the search needs to bound branching
//! - `Move`: the card duel's closed set of move kinds
//! - `AdapterError`: illegal moves and contract violations
//! - `contract`: runtime checks for the invariants the search relies on

pub mod action;
pub mod contract;
pub mod error;
pub mod game;
pub mod game_utils;

// Re-export main types for convenience
pub use action::{CardId, HeroClass, Move, MoveKind};
pub use error::AdapterError;
pub use game::{GameMove, GameState, Player};

#[cfg(test)]
mod contract_tests;
