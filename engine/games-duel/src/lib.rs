//! Two-player card duel for the search engine
//!
//! A match has two phases. In the draft each player picks a hero class and
//! then a deck from that class's collection, one card per move; the second
//! player closes the draft with [`Move::StartMatch`](engine_core::Move). The
//! play phase is a simplified classic card battler: mana crystals, minions
//! with taunt and charge, spells, weapons, one hero ability per turn, fatigue
//! and overdraw.
//!
//! [`DuelState`] implements [`GameState`](engine_core::GameState) with
//! [`Move`](engine_core::Move) as its move type. Randomness (library shuffle,
//! random missiles) comes from a generator embedded in the state and seeded
//! from [`DuelConfig::seed`], so clones replay identically.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::{GameState, HeroClass, Move};
//! use games_duel::{DuelConfig, DuelState, Phase};
//!
//! let mut state = DuelState::new(DuelConfig::default());
//! assert_eq!(state.legal_moves().len(), HeroClass::ALL.len());
//!
//! state.do_move(&Move::ChooseHero(HeroClass::Mage)).unwrap();
//! assert_eq!(state.phase(), Phase::Draft);
//! ```

pub mod cards;
mod rules;
mod state;

pub use cards::{CardDef, CardKind, Effect, Rarity, CATALOGUE};
pub use rules::{ability_needs_target, Character, ABILITY_COST};
pub use state::{
    DuelConfig, DuelState, Minion, Phase, Side, Weapon, MAX_BOARD, MAX_DECK_SIZE, MAX_HAND,
    MAX_MANA,
};
